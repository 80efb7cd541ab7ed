//! The one set of mode instances
//!
//! Built once at startup from the configuration. Stateful modes (auto-cycle,
//! timer) keep their state here for the life of the board.
//!
//! A composite's target is prepared when the composite first picks it and
//! again only when the pick changes, so stateful targets such as the timer
//! are not re-armed on every refresh.

use alloc::format;

use super::ascii::AsciiMode;
use super::auto::AutoMode;
use super::countdown::CountdownMode;
use super::daily::DailyMode;
use super::phrases::PhraseMode;
use super::sentences::SentencesMode;
use super::temperature::TemperatureMode;
use super::time::TimeMode;
use super::timer::TimerMode;
use super::weather::WeatherMode;
use super::{Mode, ModeError, ModeKind, ModeParams, Rendered};
use crate::config::{check_targets, Config, ConfigError, ModeEntry};
use crate::context::Context;

pub struct Modes {
    weather: WeatherMode,
    ascii: AsciiMode,
    countdown: CountdownMode,
    timer: TimerMode,
    time: TimeMode,
    auto: AutoMode,
    greetings: PhraseMode,
    quotes: PhraseMode,
    daily: DailyMode,
    temperature: TemperatureMode,
    sentences: SentencesMode,
    delegated: Option<Delegation>,
}

/// Target last picked by a composite, with the params it was prepared with
#[derive(Debug)]
struct Delegation {
    composite: ModeKind,
    entry: ModeEntry,
    params: ModeParams,
}

impl Modes {
    /// Build every mode
    ///
    /// Fails if the auto sequence or daily schedule names a composite mode.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        check_targets(config)?;

        Ok(Self {
            weather: WeatherMode::new(),
            ascii: AsciiMode::new(),
            countdown: CountdownMode::new(),
            timer: TimerMode::new(),
            time: TimeMode::new(),
            auto: AutoMode::new(config.auto.clone()),
            greetings: PhraseMode::greetings(),
            quotes: PhraseMode::quotes(),
            daily: DailyMode::new(config.daily.clone()),
            temperature: TemperatureMode::new(),
            sentences: SentencesMode::new(),
            delegated: None,
        })
    }

    pub fn get(&self, kind: ModeKind) -> &dyn Mode {
        match kind {
            ModeKind::Weather => &self.weather,
            ModeKind::Ascii => &self.ascii,
            ModeKind::Countdown => &self.countdown,
            ModeKind::Timer => &self.timer,
            ModeKind::Time => &self.time,
            ModeKind::Auto => &self.auto,
            ModeKind::Greetings => &self.greetings,
            ModeKind::Quotes => &self.quotes,
            ModeKind::Daily => &self.daily,
            ModeKind::Temperature => &self.temperature,
            ModeKind::Sentences => &self.sentences,
        }
    }

    pub fn get_mut(&mut self, kind: ModeKind) -> &mut dyn Mode {
        match kind {
            ModeKind::Weather => &mut self.weather,
            ModeKind::Ascii => &mut self.ascii,
            ModeKind::Countdown => &mut self.countdown,
            ModeKind::Timer => &mut self.timer,
            ModeKind::Time => &mut self.time,
            ModeKind::Auto => &mut self.auto,
            ModeKind::Greetings => &mut self.greetings,
            ModeKind::Quotes => &mut self.quotes,
            ModeKind::Daily => &mut self.daily,
            ModeKind::Temperature => &mut self.temperature,
            ModeKind::Sentences => &mut self.sentences,
        }
    }

    pub fn timer(&self) -> &TimerMode {
        &self.timer
    }

    pub fn auto(&self) -> &AutoMode {
        &self.auto
    }

    /// Prepare and validate params for `kind`
    ///
    /// Starts a new session, so the next composite pick is prepared afresh.
    pub fn prepare(
        &mut self,
        kind: ModeKind,
        raw: Option<&str>,
        now_ms: u64,
    ) -> Result<ModeParams, ModeError> {
        self.delegated = None;
        self.prepare_target(kind, raw, now_ms)
    }

    fn prepare_target(
        &mut self,
        kind: ModeKind,
        raw: Option<&str>,
        now_ms: u64,
    ) -> Result<ModeParams, ModeError> {
        let mode = self.get_mut(kind);
        let params = mode.prepare(raw, now_ms);
        mode.validate(&params)?;
        Ok(params)
    }

    /// Render `kind`, running the target when it delegates
    ///
    /// Never fails: errors are logged and reported as [`Rendered::Idle`].
    /// The result is never [`Rendered::Delegate`].
    pub fn render(
        &mut self,
        ctx: &mut Context<'_>,
        kind: ModeKind,
        params: &ModeParams,
    ) -> Rendered {
        match self.render_composite(ctx, kind, params) {
            Ok(rendered) => rendered,
            Err(e) => {
                ctx.log(&format!("Error displaying {}: {}", kind, e));
                Rendered::Idle
            }
        }
    }

    fn render_composite(
        &mut self,
        ctx: &mut Context<'_>,
        kind: ModeKind,
        params: &ModeParams,
    ) -> Result<Rendered, ModeError> {
        let entry = match self.get_mut(kind).render(ctx, params)? {
            Rendered::Delegate(entry) => entry,
            rendered => return Ok(rendered),
        };
        if entry.mode.is_composite() {
            return Err(ModeError::DelegationDepth);
        }
        let target = entry.mode;

        match self.render_target(ctx, kind, entry) {
            Ok(rendered) => Ok(rendered),
            Err(e) => {
                ctx.log(&format!(
                    "Error displaying {} in {} mode: {}",
                    target, kind, e
                ));
                Ok(Rendered::Idle)
            }
        }
    }

    fn render_target(
        &mut self,
        ctx: &mut Context<'_>,
        composite: ModeKind,
        entry: ModeEntry,
    ) -> Result<Rendered, ModeError> {
        let cached = match &self.delegated {
            Some(d) if d.composite == composite && d.entry == entry => Some(d.params.clone()),
            _ => None,
        };
        let params = match cached {
            Some(params) => params,
            None => {
                self.delegated = None;
                let params = self.prepare_target(entry.mode, entry.params(), ctx.now_ms())?;
                self.delegated = Some(Delegation {
                    composite,
                    entry: entry.clone(),
                    params: params.clone(),
                });
                params
            }
        };
        match self.get_mut(entry.mode).render(ctx, &params)? {
            Rendered::Delegate(_) => Err(ModeError::DelegationDepth),
            rendered => Ok(rendered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AutoConfig, ModeEntry, ScheduleEntry};
    use crate::modes::timer::ANNOUNCE_HOLD_MS;
    use crate::testing::Rig;
    use crate::traits::SourceError;

    // 2025-12-24 10:30 UTC
    const MORNING: u64 = 1_766_572_200_000;

    #[test]
    fn test_lookup_is_consistent() {
        let mut modes = Modes::new(&Config::default()).unwrap();
        for kind in ModeKind::ALL {
            assert_eq!(modes.get(kind).kind(), kind);
            assert_eq!(modes.get_mut(kind).kind(), kind);
        }
    }

    #[test]
    fn test_composite_target_rejected() {
        let mut config = Config::default();
        config
            .auto
            .sequence
            .push(ModeEntry::new(ModeKind::Daily))
            .unwrap();
        assert_eq!(
            Modes::new(&config).err(),
            Some(ConfigError::CompositeTarget(ModeKind::Daily))
        );
    }

    #[test]
    fn test_prepare_reports_validation_failure() {
        let mut modes = Modes::new(&Config::default()).unwrap();
        assert!(modes.prepare(ModeKind::Countdown, Some("2026-01-01"), 0).is_ok());
        assert!(matches!(
            modes.prepare(ModeKind::Countdown, Some("soon"), 0),
            Err(ModeError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_render_error_is_logged() {
        let mut rig = Rig::new();
        rig.weather.today = Err(SourceError::Unavailable);
        let mut modes = Modes::new(&Config::default()).unwrap();

        let rendered = modes.render(&mut rig.ctx(), ModeKind::Weather, &ModeParams::None);
        assert_eq!(rendered, Rendered::Idle);
        assert_eq!(
            rig.logger.lines,
            vec!["Error displaying weather: source unavailable"]
        );
    }

    #[test]
    fn test_daily_runs_scheduled_mode() {
        let mut rig = Rig::new();
        rig.clock.now = MORNING;
        let mut modes = Modes::new(&Config::default()).unwrap();

        let rendered = modes.render(&mut rig.ctx(), ModeKind::Daily, &ModeParams::None);
        assert_eq!(rendered, Rendered::Drawn);
        assert!(rig.display.writes > 0);
        assert!(rig.logger.lines.is_empty());
    }

    #[test]
    fn test_auto_target_failure_names_both_modes() {
        let mut rig = Rig::new();
        rig.clock.now = MORNING;
        rig.weather.today = Err(SourceError::Pending);
        let mut modes = Modes::new(&Config::default()).unwrap();

        let rendered = modes.render(&mut rig.ctx(), ModeKind::Auto, &ModeParams::None);
        assert_eq!(rendered, Rendered::Idle);
        assert_eq!(
            rig.logger.lines,
            vec!["Error displaying weather in auto mode: no data yet"]
        );
        // The cycle moved on regardless
        assert_eq!(modes.auto().index(), 1);
    }

    #[test]
    fn test_target_params_are_validated() {
        let mut rig = Rig::new();
        let mut config = Config::default();
        config.daily.clear();
        config
            .daily
            .push(ScheduleEntry {
                minute_of_day: 0,
                entry: ModeEntry::new(ModeKind::Countdown),
            })
            .unwrap();
        let mut modes = Modes::new(&config).unwrap();

        modes.render(&mut rig.ctx(), ModeKind::Daily, &ModeParams::None);
        assert_eq!(
            rig.logger.lines,
            vec!["Error displaying countdown in daily mode: Invalid date format. Use: /countdown YYYY-MM-DD"]
        );
        assert_eq!(rig.display.writes, 0);
    }

    fn timer_all_day(minutes: &str) -> Config {
        let mut config = Config::default();
        config.daily.clear();
        config
            .daily
            .push(ScheduleEntry {
                minute_of_day: 0,
                entry: ModeEntry::with_params(ModeKind::Timer, minutes).unwrap(),
            })
            .unwrap();
        config
    }

    #[test]
    fn test_daily_timer_armed_once_and_expires() {
        let mut rig = Rig::new();
        let mut modes = Modes::new(&timer_all_day("1")).unwrap();

        for minute in 0..5u64 {
            rig.clock.now = minute * 60_000;
            modes.render(&mut rig.ctx(), ModeKind::Daily, &ModeParams::None);
        }

        assert_eq!(rig.logger.lines, vec!["Timer set!", "Time is up!"]);
        assert_eq!(rig.system.slept_ms, u64::from(ANNOUNCE_HOLD_MS) + 5 * 1_000);
        assert!(!modes.timer().is_running());
    }

    #[test]
    fn test_new_session_prepares_target_again() {
        let mut rig = Rig::new();
        let mut modes = Modes::new(&timer_all_day("1")).unwrap();

        modes.render(&mut rig.ctx(), ModeKind::Daily, &ModeParams::None);
        assert!(modes.prepare(ModeKind::Daily, None, 0).is_ok());
        modes.render(&mut rig.ctx(), ModeKind::Daily, &ModeParams::None);

        assert_eq!(rig.logger.lines, vec!["Timer set!", "Timer set!"]);
    }

    #[test]
    fn test_changed_slot_prepares_target_again() {
        let mut rig = Rig::new();
        let mut config = timer_all_day("1");
        config
            .daily
            .push(ScheduleEntry {
                minute_of_day: 60,
                entry: ModeEntry::new(ModeKind::Greetings),
            })
            .unwrap();
        let mut modes = Modes::new(&config).unwrap();

        // 00:00 timer, 01:00 greetings, next day 00:00 timer again
        for now in [0, 60 * 60_000, 24 * 60 * 60_000] {
            rig.clock.now = now;
            modes.render(&mut rig.ctx(), ModeKind::Daily, &ModeParams::None);
        }

        assert_eq!(rig.logger.lines, vec!["Timer set!", "Timer set!"]);
        assert!(modes.timer().is_running());
    }

    #[test]
    fn test_nested_composite_stopped_at_run_time() {
        let mut rig = Rig::new();
        rig.clock.now = MORNING;
        let mut modes = Modes::new(&Config::default()).unwrap();
        let mut sequence = heapless::Vec::new();
        sequence.push(ModeEntry::new(ModeKind::Daily)).unwrap();
        modes.auto = AutoMode::new(AutoConfig {
            interval_s: 1,
            sequence,
        });

        modes.render(&mut rig.ctx(), ModeKind::Auto, &ModeParams::None);
        assert_eq!(
            rig.logger.lines,
            vec!["Error displaying auto: composite modes cannot be nested"]
        );
    }
}
