//! Remote message transport trait
//!
//! The transport is whatever carries chat messages to and from the board.
//! The engine polls it for at most one message per poll interval and uses
//! it to deliver log lines to the operator.

use alloc::string::String;

/// Errors that can occur talking to the remote side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Link to the remote side is not up
    LinkDown,
    /// No answer within the transport's deadline
    Timeout,
    /// Outbound queue is full
    Busy,
    /// Remote side answered with something we could not decode
    Malformed,
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransportError::LinkDown => f.write_str("link down"),
            TransportError::Timeout => f.write_str("timed out"),
            TransportError::Busy => f.write_str("outbound queue full"),
            TransportError::Malformed => f.write_str("malformed reply"),
        }
    }
}

/// A text message received from a chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub text: String,
    /// "First Last" as reported by the chat service, or "Unknown"
    pub sender_name: String,
    /// Chat the message came from
    pub sender_id: i64,
}

/// Result of one fetch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Update {
    /// Cursor to pass to the next fetch; never moves backwards
    pub cursor: Option<u64>,
    /// Newest message after the previous cursor, if any
    pub message: Option<InboundMessage>,
}

impl Update {
    /// Nothing new; keeps the caller's cursor
    pub fn idle(cursor: Option<u64>) -> Self {
        Self {
            cursor,
            message: None,
        }
    }
}

/// Trait for the remote message transport
pub trait Transport {
    /// Bring the link up
    ///
    /// Called once before the main loop starts. Failure is fatal.
    fn connect(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Fetch the newest message after `cursor`
    ///
    /// Must not block beyond the transport's own deadline. Returns
    /// [`Update::idle`] when nothing new has arrived.
    fn fetch_latest(&mut self, cursor: Option<u64>) -> Result<Update, TransportError>;

    /// Send `text` to chat `target_id`, best effort
    fn send(&mut self, target_id: i64, text: &str) -> Result<(), TransportError>;
}
