//! blogmeta utilities

pub mod error;

pub use error::*;
