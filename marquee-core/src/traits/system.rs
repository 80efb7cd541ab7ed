//! Board services: time, logging, liveness

/// Wall-clock time source
pub trait Clock {
    /// Milliseconds since the Unix epoch (UTC)
    fn now_ms(&self) -> u64;
}

/// Operator-facing log channel
///
/// `log` lines are meant for the operator and may leave the board (the
/// firmware forwards them to the log chat). `trace` lines stay local.
pub trait Logger {
    fn log(&mut self, message: &str);

    fn trace(&mut self, _message: &str) {}
}

/// Board control
pub trait System {
    /// Block for `ms` milliseconds
    fn sleep_ms(&mut self, ms: u32);

    /// Pet the hardware watchdog
    fn feed_watchdog(&mut self);

    /// Reset the board
    fn reboot(&mut self);
}
