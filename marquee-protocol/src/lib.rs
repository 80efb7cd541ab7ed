//! Marquee Link Protocol
//!
//! This crate defines the UART protocol between the board (RP2040 driving the
//! LCD) and the bridge, a host process that talks to the chat service, the
//! weather API and the sentence feed on the board's behalf.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CRC-8    │
//! │ 0x7E  │ 1B     │ 1B   │ 0–250B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! The board only ever asks; the bridge only ever answers. Every request the
//! bridge cannot serve is answered with [`BridgeMessage::Unavailable`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{crc8, Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use messages::{BridgeMessage, ChatMessage, DeviceMessage, Forecast};
