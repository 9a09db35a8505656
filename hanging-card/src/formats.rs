//! Loading tuning from JSON documents.

pub mod config;
mod json;

pub use config::{parse_config, ConfigParseError};
pub use self::json::JsonError;
