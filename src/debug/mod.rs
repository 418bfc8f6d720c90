pub mod count_gates;
pub mod graphviz;
