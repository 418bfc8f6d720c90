pub mod lean;
