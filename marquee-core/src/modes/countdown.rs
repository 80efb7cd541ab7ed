//! Countdown to a calendar date

use alloc::format;
use alloc::string::String;
use chrono::{NaiveDate, NaiveTime};

use super::{Mode, ModeError, ModeKind, ModeParams, Rendered};
use crate::context::Context;

pub const COUNTDOWN_USAGE: &str = "Invalid date format. Use: /countdown YYYY-MM-DD";

/// Earliest and latest years a countdown may target
const YEARS: core::ops::RangeInclusive<i32> = 2025..=2100;

/// Counts down to local midnight at the start of the target date
#[derive(Debug, Default)]
pub struct CountdownMode;

impl CountdownMode {
    pub fn new() -> Self {
        Self
    }
}

/// Parse `YYYY-MM-DD`, accepting only real dates within [`YEARS`]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split('-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || !YEARS.contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Time left split into display units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Remaining {
    days: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
}

impl Remaining {
    fn from_seconds(total: i64) -> Self {
        Self {
            days: total / 86_400,
            hours: total % 86_400 / 3_600,
            minutes: total % 3_600 / 60,
            seconds: total % 60,
        }
    }
}

/// Whole seconds from `now_ms` to local midnight of `target`
///
/// Negative once the date has started.
fn seconds_until(target: NaiveDate, now_ms: u64, utc_offset_minutes: i32) -> i64 {
    let target_ms = target.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    let local_now_ms = now_ms as i64 + i64::from(utc_offset_minutes) * 60_000;
    (target_ms - local_now_ms) / 1000
}

impl Mode for CountdownMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Countdown
    }

    fn prepare(&mut self, raw: Option<&str>, _now_ms: u64) -> ModeParams {
        match raw.and_then(parse_date) {
            Some(date) => ModeParams::Date(date),
            None => ModeParams::Rejected(String::from(raw.unwrap_or_default())),
        }
    }

    fn validate(&self, params: &ModeParams) -> Result<(), ModeError> {
        match params {
            ModeParams::Date(_) => Ok(()),
            _ => Err(ModeError::InvalidParams(COUNTDOWN_USAGE)),
        }
    }

    fn render(
        &mut self,
        ctx: &mut Context<'_>,
        params: &ModeParams,
    ) -> Result<Rendered, ModeError> {
        let ModeParams::Date(target) = params else {
            return Err(ModeError::InvalidParams(COUNTDOWN_USAGE));
        };

        let left = seconds_until(*target, ctx.now_ms(), ctx.utc_offset_minutes);
        let message = if left < 0 {
            format!("Date has passed!\n{}", target)
        } else {
            let r = Remaining::from_seconds(left);
            format!(
                "Countdown to:\n{}\n\n{}d {:02}:{:02}:{:02}",
                target, r.days, r.hours, r.minutes, r.seconds
            )
        };

        ctx.show(&message, false)?;
        Ok(Rendered::Drawn)
    }
}
