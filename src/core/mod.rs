//! Core types, errors, and logging

pub mod types;
pub mod error;
pub mod logging;

pub use error::Error;
pub use types::Result;
