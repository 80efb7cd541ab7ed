//! Board-agnostic core of the Marquee message board
//!
//! This crate contains everything that does not depend on the board:
//!
//! - Collaborator traits (display, transport, data sources, board services)
//! - Fixed-grid text layout
//! - Display modes and the registry that owns them
//! - Command routing
//! - The scheduler that drives polling and refreshing
//! - Configuration types and the TOML-subset parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod context;
pub mod layout;
pub mod modes;
pub mod router;
pub mod scheduler;
pub mod startup;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;
