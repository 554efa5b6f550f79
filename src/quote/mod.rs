//! Quote submission module

mod client;
mod traits;

pub use client::*;
pub use traits::*;
