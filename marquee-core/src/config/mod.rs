//! Configuration types
//!
//! Board configuration is written as TOML, embedded in the firmware image
//! and parsed once at boot.

pub mod parse;
pub mod types;

pub use parse::{check_targets, parse_config};
pub use types::*;
