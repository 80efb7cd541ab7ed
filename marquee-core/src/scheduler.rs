//! The main loop body
//!
//! The board calls [`Scheduler::tick`] every [`TICK_INTERVAL_MS`]. Each tick
//! does at most two things:
//!
//! - re-renders the current mode when its refresh interval has passed
//! - polls the transport for one message when the poll interval has passed
//!
//! The two timers are independent. A mode switch resets the refresh timer
//! so the frame drawn by the switch is not redrawn straight away.

use alloc::format;

use crate::config::{Config, ConfigError};
use crate::context::Context;
use crate::modes::{ModeParams, Modes, SessionMode};
use crate::router::{route, Intervals, Switch};
use crate::traits::Transport;

/// Pause between ticks
pub const TICK_INTERVAL_MS: u64 = 10;

/// What is on screen and when things last happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub mode: SessionMode,
    pub params: ModeParams,
    pub last_refresh_ms: u64,
    pub last_poll_ms: u64,
    /// Transport cursor; only moves forward
    pub cursor: Option<u64>,
}

impl Session {
    pub fn new(mode: SessionMode) -> Self {
        Self {
            mode,
            params: ModeParams::None,
            last_refresh_ms: 0,
            last_poll_ms: 0,
            cursor: None,
        }
    }

    fn adopt(&mut self, switch: Switch) {
        self.mode = switch.mode;
        self.params = switch.params;
        self.last_refresh_ms = switch.refreshed_at_ms;
    }
}

pub struct Scheduler {
    modes: Modes,
    intervals: Intervals,
    session: Session,
}

impl Scheduler {
    /// Scheduler sitting in the configured default mode
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            modes: Modes::new(config)?,
            intervals: Intervals::from_config(config),
            session: Session::new(config.default_mode),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn intervals(&self) -> &Intervals {
        &self.intervals
    }

    pub fn modes(&self) -> &Modes {
        &self.modes
    }

    /// Run one iteration of the main loop
    pub fn tick(&mut self, ctx: &mut Context<'_>, transport: &mut dyn Transport) {
        ctx.system.feed_watchdog();
        self.refresh(ctx);

        ctx.system.feed_watchdog();
        self.poll(ctx, transport);
    }

    fn refresh(&mut self, ctx: &mut Context<'_>) {
        let Some(kind) = self.session.mode.kind() else {
            return;
        };
        let Some(interval_ms) = self.intervals.refresh_ms(self.session.mode) else {
            return;
        };

        let now = ctx.now_ms();
        if now.saturating_sub(self.session.last_refresh_ms) < interval_ms {
            return;
        }

        self.modes.render(ctx, kind, &self.session.params);
        self.session.last_refresh_ms = now;
    }

    fn poll(&mut self, ctx: &mut Context<'_>, transport: &mut dyn Transport) {
        let now = ctx.now_ms();
        if now.saturating_sub(self.session.last_poll_ms) < self.intervals.poll_ms() {
            return;
        }
        self.session.last_poll_ms = now;

        ctx.logger.trace("Polling for new messages...");
        let update = match transport.fetch_latest(self.session.cursor) {
            Ok(update) => update,
            Err(e) => {
                ctx.log(&format!("Error polling messages: {}", e));
                return;
            }
        };
        self.session.cursor = self.session.cursor.max(update.cursor);

        let Some(message) = update.message else {
            return;
        };
        ctx.log(&format!(
            "New message from {}:\n{}",
            message.sender_name, message.text
        ));

        if let Some(switch) = route(
            ctx,
            &mut self.modes,
            &mut self.intervals,
            &message.text,
            self.session.mode,
            message.sender_id,
        ) {
            self.session.adopt(switch);
        }
    }
}
