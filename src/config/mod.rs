//! Configuration module.

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::*;
pub use types::*;
