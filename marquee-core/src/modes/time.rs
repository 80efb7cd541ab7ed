//! Date and wall-clock time

use alloc::format;
use alloc::string::String;
use chrono::{Datelike, NaiveDateTime, Timelike};

use super::{Mode, ModeError, ModeKind, ModeParams, Rendered};
use crate::context::Context;
use crate::layout::center;

pub const TIME_USAGE: &str = "Invalid time format. Use: /time [m|s|ms]";

/// How much of the time of day to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Minutes,
    Seconds,
    Millis,
}

impl Precision {
    fn from_params(params: &ModeParams) -> Option<Self> {
        match params {
            ModeParams::None => Some(Precision::Minutes),
            ModeParams::Text(text) => match text.as_str() {
                "m" => Some(Precision::Minutes),
                "s" => Some(Precision::Seconds),
                "ms" => Some(Precision::Millis),
                _ => None,
            },
            _ => None,
        }
    }

    fn format(self, time: &NaiveDateTime) -> String {
        match self {
            Precision::Minutes => format!("{:02}:{:02}", time.hour(), time.minute()),
            Precision::Seconds => format!(
                "{:02}:{:02}:{:02}",
                time.hour(),
                time.minute(),
                time.second()
            ),
            Precision::Millis => format!(
                "{:02}:{:02}:{:02}.{:03}",
                time.hour(),
                time.minute(),
                time.second(),
                time.nanosecond() / 1_000_000
            ),
        }
    }
}

#[derive(Debug, Default)]
pub struct TimeMode;

impl TimeMode {
    pub fn new() -> Self {
        Self
    }
}

impl Mode for TimeMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Time
    }

    fn validate(&self, params: &ModeParams) -> Result<(), ModeError> {
        Precision::from_params(params)
            .map(|_| ())
            .ok_or(ModeError::InvalidParams(TIME_USAGE))
    }

    fn render(
        &mut self,
        ctx: &mut Context<'_>,
        params: &ModeParams,
    ) -> Result<Rendered, ModeError> {
        let precision =
            Precision::from_params(params).ok_or(ModeError::InvalidParams(TIME_USAGE))?;
        let now = ctx.local_time();
        let width = ctx.display.geometry().cols as usize;

        let date = format!("{:04}-{:02}-{:02}", now.year(), now.month(), now.day());
        let message = format!(
            "{}\n{}",
            center(&date, width),
            center(&precision.format(&now), width)
        );

        ctx.show(&message, false)?;
        Ok(Rendered::Drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Rig;

    // 2025-12-24 10:30:00.123 UTC
    const MORNING: u64 = 1_766_572_200_123;

    fn render(rig: &mut Rig, params: ModeParams) -> Vec<String> {
        rig.clock.now = MORNING;
        TimeMode::new().render(&mut rig.ctx(), &params).unwrap();
        rig.display.frame()
    }

    #[test]
    fn test_default_shows_minutes() {
        let mut rig = Rig::new();
        let frame = render(&mut rig, ModeParams::None);
        assert_eq!(frame[0], "     2025-12-24     ");
        assert_eq!(frame[1], "       10:30        ");
    }

    #[test]
    fn test_seconds_and_millis() {
        let mut rig = Rig::new();
        let frame = render(&mut rig, ModeParams::Text("s".into()));
        assert_eq!(frame[1].trim(), "10:30:00");

        let frame = render(&mut rig, ModeParams::Text("ms".into()));
        assert_eq!(frame[1].trim(), "10:30:00.123");
    }

    #[test]
    fn test_validate() {
        let mode = TimeMode::new();
        assert!(mode.validate(&ModeParams::None).is_ok());
        assert!(mode.validate(&ModeParams::Text("ms".into())).is_ok());
        assert_eq!(
            mode.validate(&ModeParams::Text("hours".into())),
            Err(ModeError::InvalidParams(TIME_USAGE))
        );
    }

    #[test]
    fn test_local_offset_applies() {
        let mut rig = Rig::new();
        rig.clock.now = MORNING;
        let mut ctx = rig.ctx();
        ctx.utc_offset_minutes = -90;
        TimeMode::new().render(&mut ctx, &ModeParams::None).unwrap();
        assert_eq!(rig.display.frame()[1].trim(), "09:00");
    }
}
