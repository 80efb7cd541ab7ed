//! Inter-task communication channels
//!
//! Defines the static channels used between the link tasks and the
//! controller. Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicBool;

use marquee_core::traits::Update;
use marquee_protocol::{Forecast, Frame};

/// Frames waiting to go out on the link
const OUTBOUND_CHANNEL_SIZE: usize = 8;

/// Poll answers not yet picked up by the controller
const UPDATE_CHANNEL_SIZE: usize = 2;

/// Weather and sentence answers not yet picked up
const REPLY_CHANNEL_SIZE: usize = 4;

/// Frames for the bridge (polls, sends, data requests, log lines)
pub static OUTBOUND: Channel<CriticalSectionRawMutex, Frame, OUTBOUND_CHANNEL_SIZE> =
    Channel::new();

/// Answers to `Poll`
pub static UPDATES: Channel<CriticalSectionRawMutex, Update, UPDATE_CHANNEL_SIZE> =
    Channel::new();

/// Answers to `WeatherRequest`
pub static WEATHER_REPLIES: Channel<CriticalSectionRawMutex, WeatherReply, REPLY_CHANNEL_SIZE> =
    Channel::new();

/// Answers to `SentenceRequest`
pub static SENTENCE_REPLIES: Channel<CriticalSectionRawMutex, SentenceReply, REPLY_CHANNEL_SIZE> =
    Channel::new();

/// Bridge wall clock (Unix ms) from the latest `Welcome`
pub static WELCOME: Signal<CriticalSectionRawMutex, u64> = Signal::new();

/// Set once the bridge has said `Welcome`
pub static LINK_UP: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy)]
pub enum WeatherReply {
    Report(Forecast),
    Unavailable,
}

#[derive(Debug, Clone)]
pub enum SentenceReply {
    Text(heapless::String<{ marquee_protocol::MAX_PAYLOAD_SIZE }>),
    Unavailable,
}
