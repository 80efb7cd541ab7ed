//! Message types for the link protocol
//!
//! Message types are divided into two categories:
//! - Device → Bridge: requests (0x01..=0x1F)
//! - Bridge → Device: answers (0x20..=0x3F)
//!
//! Integers are little-endian. Strings are a one-byte length followed by
//! UTF-8 bytes; text that does not fit the frame is cut at a char boundary.

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use heapless::Vec;

// Message type IDs: Device → Bridge
pub const MSG_HELLO: u8 = 0x01;
pub const MSG_POLL: u8 = 0x02;
pub const MSG_SEND: u8 = 0x03;
pub const MSG_WEATHER_REQUEST: u8 = 0x04;
pub const MSG_SENTENCE_REQUEST: u8 = 0x05;

// Message type IDs: Bridge → Device
pub const MSG_WELCOME: u8 = 0x20;
pub const MSG_UPDATE: u8 = 0x21;
pub const MSG_WEATHER: u8 = 0x22;
pub const MSG_SENTENCE: u8 = 0x23;
pub const MSG_UNAVAILABLE: u8 = 0x24;

/// Revision sent in [`DeviceMessage::Hello`]
pub const PROTOCOL_VERSION: u8 = 1;

/// Longest sender name carried in an update
pub const MAX_SENDER_NAME: usize = 48;

/// Messages from the board to the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMessage<'a> {
    /// First frame after power-up; answered with `Welcome`
    Hello { version: u8 },
    /// Ask for the newest chat message after `cursor`
    Poll { cursor: Option<u64> },
    /// Deliver text to a chat
    Send { chat_id: i64, text: &'a str },
    /// Ask for a forecast; `day` is 0 for today, 1 for tomorrow
    WeatherRequest { day: u8, lat_e4: i32, lon_e4: i32 },
    /// Ask for one random sentence
    SentenceRequest,
}

/// A chat message as carried in an update
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChatMessage<'a> {
    pub sender_id: i64,
    pub sender_name: &'a str,
    pub text: &'a str,
}

/// One day of weather; temperatures in tenths of a degree Celsius
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Forecast {
    pub day: u8,
    pub current_x10: i16,
    pub current_code: u8,
    pub max_x10: i16,
    pub min_x10: i16,
    pub day_code: u8,
}

/// Messages from the bridge to the board
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeMessage<'a> {
    /// Link is up; carries the wall clock
    Welcome { unix_ms: u64 },
    /// Answer to `Poll`
    Update {
        cursor: Option<u64>,
        message: Option<ChatMessage<'a>>,
    },
    /// Answer to `WeatherRequest`
    Weather(Forecast),
    /// Answer to `SentenceRequest`
    Sentence { text: &'a str },
    /// The request of type `request` could not be served
    Unavailable { request: u8 },
}

impl<'a> DeviceMessage<'a> {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let mut w = PayloadWriter::new();
        let msg_type = match self {
            DeviceMessage::Hello { version } => {
                w.u8(*version)?;
                MSG_HELLO
            }
            DeviceMessage::Poll { cursor } => {
                w.opt_u64(*cursor)?;
                MSG_POLL
            }
            DeviceMessage::Send { chat_id, text } => {
                w.bytes(&chat_id.to_le_bytes())?;
                w.str(text, MAX_PAYLOAD_SIZE)?;
                MSG_SEND
            }
            DeviceMessage::WeatherRequest { day, lat_e4, lon_e4 } => {
                w.u8(*day)?;
                w.bytes(&lat_e4.to_le_bytes())?;
                w.bytes(&lon_e4.to_le_bytes())?;
                MSG_WEATHER_REQUEST
            }
            DeviceMessage::SentenceRequest => MSG_SENTENCE_REQUEST,
        };
        Frame::new(msg_type, &w.payload)
    }

    /// Parse a message from a frame
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        let mut r = PayloadReader::new(&frame.payload);
        let message = match frame.msg_type {
            MSG_HELLO => DeviceMessage::Hello { version: r.u8()? },
            MSG_POLL => DeviceMessage::Poll {
                cursor: r.opt_u64()?,
            },
            MSG_SEND => DeviceMessage::Send {
                chat_id: i64::from_le_bytes(r.array()?),
                text: r.str()?,
            },
            MSG_WEATHER_REQUEST => DeviceMessage::WeatherRequest {
                day: r.u8()?,
                lat_e4: i32::from_le_bytes(r.array()?),
                lon_e4: i32::from_le_bytes(r.array()?),
            },
            MSG_SENTENCE_REQUEST => DeviceMessage::SentenceRequest,
            other => return Err(FrameError::UnknownType(other)),
        };
        Ok(message)
    }
}

impl<'a> BridgeMessage<'a> {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let mut w = PayloadWriter::new();
        let msg_type = match self {
            BridgeMessage::Welcome { unix_ms } => {
                w.bytes(&unix_ms.to_le_bytes())?;
                MSG_WELCOME
            }
            BridgeMessage::Update { cursor, message } => {
                w.opt_u64(*cursor)?;
                match message {
                    Some(m) => {
                        w.u8(1)?;
                        w.bytes(&m.sender_id.to_le_bytes())?;
                        w.str(m.sender_name, MAX_SENDER_NAME)?;
                        w.str(m.text, MAX_PAYLOAD_SIZE)?;
                    }
                    None => w.u8(0)?,
                }
                MSG_UPDATE
            }
            BridgeMessage::Weather(f) => {
                w.u8(f.day)?;
                w.bytes(&f.current_x10.to_le_bytes())?;
                w.u8(f.current_code)?;
                w.bytes(&f.max_x10.to_le_bytes())?;
                w.bytes(&f.min_x10.to_le_bytes())?;
                w.u8(f.day_code)?;
                MSG_WEATHER
            }
            BridgeMessage::Sentence { text } => {
                w.str(text, MAX_PAYLOAD_SIZE)?;
                MSG_SENTENCE
            }
            BridgeMessage::Unavailable { request } => {
                w.u8(*request)?;
                MSG_UNAVAILABLE
            }
        };
        Frame::new(msg_type, &w.payload)
    }

    /// Parse a message from a frame
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        let mut r = PayloadReader::new(&frame.payload);
        let message = match frame.msg_type {
            MSG_WELCOME => BridgeMessage::Welcome {
                unix_ms: u64::from_le_bytes(r.array()?),
            },
            MSG_UPDATE => {
                let cursor = r.opt_u64()?;
                let message = match r.u8()? {
                    0 => None,
                    1 => Some(ChatMessage {
                        sender_id: i64::from_le_bytes(r.array()?),
                        sender_name: r.str()?,
                        text: r.str()?,
                    }),
                    _ => return Err(FrameError::InvalidFrame),
                };
                BridgeMessage::Update { cursor, message }
            }
            MSG_WEATHER => BridgeMessage::Weather(Forecast {
                day: r.u8()?,
                current_x10: i16::from_le_bytes(r.array()?),
                current_code: r.u8()?,
                max_x10: i16::from_le_bytes(r.array()?),
                min_x10: i16::from_le_bytes(r.array()?),
                day_code: r.u8()?,
            }),
            MSG_SENTENCE => BridgeMessage::Sentence { text: r.str()? },
            MSG_UNAVAILABLE => BridgeMessage::Unavailable { request: r.u8()? },
            other => return Err(FrameError::UnknownType(other)),
        };
        Ok(message)
    }
}

/// Longest prefix of `text` that is at most `max` bytes and ends on a char
/// boundary
pub fn truncate_utf8(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

struct PayloadWriter {
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl PayloadWriter {
    fn new() -> Self {
        Self {
            payload: Vec::new(),
        }
    }

    fn u8(&mut self, value: u8) -> Result<(), FrameError> {
        self.payload
            .push(value)
            .map_err(|_| FrameError::PayloadTooLarge)
    }

    fn bytes(&mut self, bytes: &[u8]) -> Result<(), FrameError> {
        self.payload
            .extend_from_slice(bytes)
            .map_err(|_| FrameError::PayloadTooLarge)
    }

    fn opt_u64(&mut self, value: Option<u64>) -> Result<(), FrameError> {
        match value {
            Some(v) => {
                self.u8(1)?;
                self.bytes(&v.to_le_bytes())
            }
            None => self.u8(0),
        }
    }

    /// Length-prefixed string, cut to `max` bytes and to whatever room is left
    fn str(&mut self, text: &str, max: usize) -> Result<(), FrameError> {
        let room = (MAX_PAYLOAD_SIZE - self.payload.len())
            .checked_sub(1)
            .ok_or(FrameError::PayloadTooLarge)?;
        let text = truncate_utf8(text, max.min(room).min(u8::MAX as usize));
        self.u8(text.len() as u8)?;
        self.bytes(text.as_bytes())
    }
}

struct PayloadReader<'a> {
    data: &'a [u8],
}

impl<'a> PayloadReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], FrameError> {
        if self.data.len() < n {
            return Err(FrameError::Incomplete);
        }
        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        Ok(head)
    }

    fn u8(&mut self) -> Result<u8, FrameError> {
        Ok(self.take(1)?[0])
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], FrameError> {
        self.take(N)?
            .try_into()
            .map_err(|_| FrameError::Incomplete)
    }

    fn opt_u64(&mut self) -> Result<Option<u64>, FrameError> {
        match self.u8()? {
            0 => Ok(None),
            1 => Ok(Some(u64::from_le_bytes(self.array()?))),
            _ => Err(FrameError::InvalidFrame),
        }
    }

    fn str(&mut self) -> Result<&'a str, FrameError> {
        let len = self.u8()? as usize;
        core::str::from_utf8(self.take(len)?).map_err(|_| FrameError::InvalidFrame)
    }
}
