//! Kitchen timer

use alloc::format;
use alloc::string::String;

use super::{Mode, ModeError, ModeKind, ModeParams, Rendered};
use crate::context::Context;

pub const TIMER_USAGE: &str = "Invalid timer duration. Use: /timer <minutes>";

/// Minutes used by a bare `/timer`
pub const DEFAULT_MINUTES: &str = "5";

/// How long "Timer set!" stays lit before the backlight goes off
pub const ANNOUNCE_HOLD_MS: u32 = 2_000;

/// Timer with a dark panel while it runs
///
/// The timer is armed by `prepare`, not by switching: a render of a disarmed
/// timer does nothing. The first render announces the timer and turns the
/// backlight off; later renders keep it off until the deadline, when the
/// panel shows "Time is up!" and blinks.
#[derive(Debug, Default)]
pub struct TimerMode {
    running: bool,
    announced: bool,
}

impl TimerMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Mode for TimerMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Timer
    }

    fn prepare(&mut self, raw: Option<&str>, now_ms: u64) -> ModeParams {
        let text = raw.unwrap_or(DEFAULT_MINUTES);
        match text.parse::<u32>() {
            Ok(minutes) => {
                self.running = true;
                self.announced = false;
                ModeParams::Deadline(now_ms + u64::from(minutes) * 60_000)
            }
            Err(_) => ModeParams::Rejected(String::from(text)),
        }
    }

    fn validate(&self, params: &ModeParams) -> Result<(), ModeError> {
        match params {
            ModeParams::Deadline(_) => Ok(()),
            _ => Err(ModeError::InvalidParams(TIMER_USAGE)),
        }
    }

    fn render(
        &mut self,
        ctx: &mut Context<'_>,
        params: &ModeParams,
    ) -> Result<Rendered, ModeError> {
        if !self.running {
            return Ok(Rendered::Idle);
        }
        let ModeParams::Deadline(deadline) = *params else {
            return Err(ModeError::InvalidParams(TIMER_USAGE));
        };

        if !self.announced {
            self.announced = true;
            ctx.show("Timer set!", false)?;
            ctx.log("Timer set!");
            ctx.system.sleep_ms(ANNOUNCE_HOLD_MS);
            ctx.display.backlight(false)?;
            return Ok(Rendered::Drawn);
        }

        ctx.display.backlight(false)?;

        let now = ctx.now_ms();
        if now >= deadline {
            self.running = false;
            self.announced = false;
            ctx.show("Time is up!", false)?;
            ctx.log("Time is up!");
            ctx.blink()?;
            Ok(Rendered::Drawn)
        } else {
            ctx.logger.trace(&format!(
                "Timer running. Finishing in {} seconds...",
                (deadline - now) / 1000
            ));
            Ok(Rendered::Idle)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Rig;

    #[test]
    fn test_prepare_arms_with_default_minutes() {
        let mut timer = TimerMode::new();
        assert!(!timer.is_running());

        let params = timer.prepare(None, 1_000);
        assert_eq!(params, ModeParams::Deadline(1_000 + 5 * 60_000));
        assert!(timer.is_running());
    }

    #[test]
    fn test_invalid_minutes_rejected() {
        let mut timer = TimerMode::new();
        let params = timer.prepare(Some("ten"), 0);
        assert_eq!(params, ModeParams::Rejected("ten".into()));
        assert_eq!(
            timer.validate(&params),
            Err(ModeError::InvalidParams(TIMER_USAGE))
        );
        assert!(!timer.is_running());
    }

    #[test]
    fn test_disarmed_timer_is_idle() {
        let mut rig = Rig::new();
        let result = TimerMode::new().render(&mut rig.ctx(), &ModeParams::Deadline(0));
        assert_eq!(result, Ok(Rendered::Idle));
        assert_eq!(rig.display.writes, 0);
    }

    #[test]
    fn test_full_run() {
        let mut rig = Rig::new();
        let mut timer = TimerMode::new();
        let params = timer.prepare(Some("1"), 0);

        // Announcement
        timer.render(&mut rig.ctx(), &params).unwrap();
        assert_eq!(rig.display.trimmed()[0], "Timer set!");
        assert_eq!(rig.logger.lines, vec!["Timer set!"]);
        assert_eq!(rig.system.slept_ms, 2_000);
        assert_eq!(rig.display.backlight_changes, vec![false]);

        // Running
        rig.clock.now = 30_000;
        let result = timer.render(&mut rig.ctx(), &params);
        assert_eq!(result, Ok(Rendered::Idle));
        assert_eq!(
            rig.logger.traces.last().map(String::as_str),
            Some("Timer running. Finishing in 30 seconds...")
        );

        // Expiry
        rig.clock.now = 60_000;
        timer.render(&mut rig.ctx(), &params).unwrap();
        assert_eq!(rig.display.trimmed()[0], "Time is up!");
        assert_eq!(rig.logger.lines, vec!["Timer set!", "Time is up!"]);
        assert_eq!(rig.display.backlight_changes.last(), Some(&true));
        assert!(!timer.is_running());

        // Spent
        rig.clock.now = 90_000;
        assert_eq!(timer.render(&mut rig.ctx(), &params), Ok(Rendered::Idle));
    }

    #[test]
    fn test_rearm_announces_again() {
        let mut rig = Rig::new();
        let mut timer = TimerMode::new();
        let first = timer.prepare(Some("10"), 0);
        timer.render(&mut rig.ctx(), &first).unwrap();

        let second = timer.prepare(Some("2"), 5_000);
        timer.render(&mut rig.ctx(), &second).unwrap();
        assert_eq!(rig.logger.lines, vec!["Timer set!", "Timer set!"]);
    }
}
