//! Diagnostics service wire types and HTTP client.

mod client;
mod types;

pub use client::*;
pub use types::*;
