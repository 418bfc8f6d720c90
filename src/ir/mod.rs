pub mod circuit;
pub mod variable;
