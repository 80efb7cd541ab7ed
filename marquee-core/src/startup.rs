//! Boot sequence

use alloc::format;

use crate::config::{Config, ConfigError};
use crate::context::Context;
use crate::scheduler::Scheduler;
use crate::traits::{Transport, TransportError};

/// Shown while the link comes up
pub const BOOT_MESSAGE: &str = "Pico started!\n\nConnecting to\nbridge...";

/// Shown when the link cannot be brought up
pub const CONNECTION_FAILED: &str = "Connection failed!";

/// Errors that stop the board from starting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupError {
    /// The transport could not connect
    Connectivity(TransportError),
    /// The mode registry rejected the configuration
    Config(ConfigError),
}

impl core::fmt::Display for StartupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StartupError::Connectivity(e) => write!(f, "connection failed: {}", e),
            StartupError::Config(e) => write!(f, "bad configuration: {}", e),
        }
    }
}

/// Build the scheduler and bring the transport up
///
/// The panel shows [`BOOT_MESSAGE`] while connecting and
/// [`CONNECTION_FAILED`] if that does not work out.
pub fn boot(
    ctx: &mut Context<'_>,
    transport: &mut dyn Transport,
    config: &Config,
) -> Result<Scheduler, StartupError> {
    let scheduler = Scheduler::new(config).map_err(StartupError::Config)?;

    if let Err(e) = ctx.show(BOOT_MESSAGE, false) {
        ctx.logger.trace(&format!("Boot message not shown: {}", e));
    }

    if let Err(e) = transport.connect() {
        if let Err(e) = ctx.show(CONNECTION_FAILED, false) {
            ctx.logger.trace(&format!("Failure message not shown: {}", e));
        }
        return Err(StartupError::Connectivity(e));
    }

    ctx.log("Bot started");
    Ok(scheduler)
}
