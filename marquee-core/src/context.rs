//! Per-call access to the collaborators
//!
//! A [`Context`] is assembled by the caller for every tick and lent to the
//! router and the modes. It borrows everything; nothing in it outlives the
//! call.

use alloc::format;
use chrono::{DateTime, NaiveDateTime};

use crate::traits::{
    CharDisplay, CharDisplayExt, Clock, DisplayError, Logger, SentenceSource, System,
    TemperatureSensor, WeatherSource,
};

/// Blink cycles for `/blink` and timer expiry
pub const BLINK_CYCLES: u8 = 5;

/// Half period of one blink cycle
pub const BLINK_HALF_PERIOD_MS: u32 = 500;

pub struct Context<'a> {
    pub display: &'a mut dyn CharDisplay,
    pub logger: &'a mut dyn Logger,
    pub clock: &'a dyn Clock,
    pub system: &'a mut dyn System,
    pub weather: &'a mut dyn WeatherSource,
    pub sentences: &'a mut dyn SentenceSource,
    pub sensor: &'a mut dyn TemperatureSensor,
    /// Local time offset from UTC
    pub utc_offset_minutes: i32,
}

impl Context<'_> {
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Current local wall-clock time
    pub fn local_time(&self) -> NaiveDateTime {
        local_time(self.now_ms(), self.utc_offset_minutes)
    }

    pub fn log(&mut self, message: &str) {
        self.logger.log(message);
    }

    /// Lay out and write `message` on the whole panel
    ///
    /// Without a panel the message goes to the log instead.
    pub fn show(&mut self, message: &str, word_wrap: bool) -> Result<(), DisplayError> {
        if !self.display.is_present() {
            self.logger
                .log(&format!("LCD not available, message: {}", message));
            return Ok(());
        }
        self.display.show(message, word_wrap)
    }

    /// Flash the backlight, leaving it on
    pub fn blink(&mut self) -> Result<(), DisplayError> {
        for _ in 0..BLINK_CYCLES {
            self.system.feed_watchdog();
            self.system.sleep_ms(BLINK_HALF_PERIOD_MS);
            self.display.backlight(false)?;
            self.system.sleep_ms(BLINK_HALF_PERIOD_MS);
            self.display.backlight(true)?;
        }
        Ok(())
    }
}

/// Convert Unix milliseconds to local time
///
/// Timestamps chrono cannot represent collapse to the epoch.
pub fn local_time(now_ms: u64, utc_offset_minutes: i32) -> NaiveDateTime {
    let local_ms = now_ms as i64 + i64::from(utc_offset_minutes) * 60_000;
    DateTime::from_timestamp_millis(local_ms)
        .unwrap_or_default()
        .naive_utc()
}
