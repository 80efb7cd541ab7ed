//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in marquee-core for the board's peripherals:
//!
//! - Character LCD (HD44780 behind a PCF8574 I2C backpack)
//! - Temperature sensors (RP2040 on-die sensor)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod lcd;
pub mod sensor;
