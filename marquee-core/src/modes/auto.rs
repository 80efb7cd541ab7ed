//! Auto-cycle: step through a fixed sequence of modes

use alloc::string::String;

use super::{Mode, ModeError, ModeKind, ModeParams, Rendered};
use crate::config::AutoConfig;
use crate::context::Context;

pub const AUTO_USAGE: &str = "Invalid interval. Use: /auto <seconds>";

/// Cycles through the configured sequence
///
/// Keeps its position across switches: leaving auto mode and coming back
/// continues the cycle where it stopped.
#[derive(Debug)]
pub struct AutoMode {
    config: AutoConfig,
    index: usize,
    last_switch_ms: u64,
}

impl AutoMode {
    pub fn new(config: AutoConfig) -> Self {
        Self {
            config,
            index: 0,
            last_switch_ms: 0,
        }
    }

    pub fn config(&self) -> &AutoConfig {
        &self.config
    }

    /// Position in the sequence of the entry shown last
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn last_switch_ms(&self) -> u64 {
        self.last_switch_ms
    }

    fn interval_ms(&self, params: &ModeParams) -> u64 {
        let seconds = match params {
            ModeParams::Seconds(seconds) => *seconds,
            _ => self.config.interval_s,
        };
        u64::from(seconds) * 1000
    }
}

impl Mode for AutoMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Auto
    }

    fn prepare(&mut self, raw: Option<&str>, _now_ms: u64) -> ModeParams {
        let Some(raw) = raw else {
            return ModeParams::None;
        };
        match raw.parse::<u32>() {
            Ok(seconds) if seconds > 0 => ModeParams::Seconds(seconds),
            _ => ModeParams::Rejected(String::from(raw)),
        }
    }

    fn validate(&self, params: &ModeParams) -> Result<(), ModeError> {
        match params {
            ModeParams::None | ModeParams::Seconds(_) => Ok(()),
            _ => Err(ModeError::InvalidParams(AUTO_USAGE)),
        }
    }

    fn render(
        &mut self,
        ctx: &mut Context<'_>,
        params: &ModeParams,
    ) -> Result<Rendered, ModeError> {
        if self.config.sequence.is_empty() {
            ctx.log("Auto mode sequence is empty");
            return Ok(Rendered::Idle);
        }

        let now = ctx.now_ms();
        if now.saturating_sub(self.last_switch_ms) < self.interval_ms(params) {
            ctx.logger.trace("Auto mode: waiting to switch modes");
            return Ok(Rendered::Idle);
        }

        self.index = (self.index + 1) % self.config.sequence.len();
        self.last_switch_ms = now;
        Ok(Rendered::Delegate(self.config.sequence[self.index].clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModeEntry;
    use crate::testing::Rig;

    fn entry(rendered: Rendered) -> ModeEntry {
        match rendered {
            Rendered::Delegate(entry) => entry,
            other => panic!("expected delegation, got {:?}", other),
        }
    }

    #[test]
    fn test_first_render_moves_to_second_entry() {
        let mut rig = Rig::new();
        rig.clock.now = 1_766_572_200_000;
        let mut auto = AutoMode::new(AutoConfig::default());

        let target = entry(auto.render(&mut rig.ctx(), &ModeParams::None).unwrap());
        assert_eq!(target.mode, ModeKind::Weather);
        assert_eq!(auto.index(), 1);
        assert_eq!(auto.last_switch_ms(), 1_766_572_200_000);
    }

    #[test]
    fn test_advances_once_per_interval() {
        let mut rig = Rig::new();
        let start = 1_766_572_200_000;
        rig.clock.now = start;
        let mut auto = AutoMode::new(AutoConfig::default());
        auto.render(&mut rig.ctx(), &ModeParams::None).unwrap();

        rig.clock.now = start + 29_999;
        let result = auto.render(&mut rig.ctx(), &ModeParams::None);
        assert_eq!(result, Ok(Rendered::Idle));
        assert_eq!(auto.index(), 1);
        assert_eq!(auto.last_switch_ms(), start);

        rig.clock.now = start + 30_000;
        let target = entry(auto.render(&mut rig.ctx(), &ModeParams::None).unwrap());
        assert_eq!(target.params(), Some("tomorrow"));
        assert_eq!(auto.index(), 2);
        assert_eq!(auto.last_switch_ms(), start + 30_000);
    }

    #[test]
    fn test_wraps_around() {
        let mut rig = Rig::new();
        let mut auto = AutoMode::new(AutoConfig::default());
        let len = auto.config().sequence.len();

        for step in 1..=len {
            rig.clock.now = step as u64 * 30_000;
            auto.render(&mut rig.ctx(), &ModeParams::None).unwrap();
        }
        assert_eq!(auto.index(), 0);
    }

    #[test]
    fn test_seconds_override_interval() {
        let mut rig = Rig::new();
        let mut auto = AutoMode::new(AutoConfig::default());
        let params = auto.prepare(Some("5"), 0);
        assert_eq!(params, ModeParams::Seconds(5));

        rig.clock.now = 5_000;
        auto.render(&mut rig.ctx(), &params).unwrap();
        rig.clock.now = 10_000;
        auto.render(&mut rig.ctx(), &params).unwrap();
        assert_eq!(auto.index(), 2);
    }

    #[test]
    fn test_invalid_interval() {
        let mut auto = AutoMode::new(AutoConfig::default());
        for raw in ["0", "-3", "soon"] {
            let params = auto.prepare(Some(raw), 0);
            assert_eq!(
                auto.validate(&params),
                Err(ModeError::InvalidParams(AUTO_USAGE))
            );
        }
    }

    #[test]
    fn test_empty_sequence_logs() {
        let mut rig = Rig::new();
        let mut auto = AutoMode::new(AutoConfig {
            interval_s: 30,
            sequence: heapless::Vec::new(),
        });
        let result = auto.render(&mut rig.ctx(), &ModeParams::None);
        assert_eq!(result, Ok(Rendered::Idle));
        assert_eq!(rig.logger.lines, vec!["Auto mode sequence is empty"]);
    }
}
