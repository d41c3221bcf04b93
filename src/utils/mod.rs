//! Utility functions

pub mod code_gen;

pub use code_gen::{CodeFormat, CodeLookup, generate_code, generate_unique_code, generate_unique_code_with};
