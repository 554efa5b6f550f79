//! Application state module

mod wizard;

pub use wizard::*;
