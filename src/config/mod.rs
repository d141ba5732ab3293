//! Configuration model for planlock.
//!
//! This module defines the Config struct that represents
//! `{data_dir}/config.yaml`. Parsing is forward-compatible (unknown fields are
//! ignored), every field has a default, and values are validated on load.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
pub use types::LogLevel;
