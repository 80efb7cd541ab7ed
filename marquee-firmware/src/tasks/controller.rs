//! Main controller task
//!
//! Brings the bridge link up, boots the engine and runs its tick loop.
//! The engine itself is synchronous; this task only paces it.

use defmt::*;
use embassy_time::{with_timeout, Duration, Instant, Ticker, Timer};

use marquee_core::config::Config;
use marquee_core::scheduler::TICK_INTERVAL_MS;
use marquee_core::startup::{self, BOOT_MESSAGE};
use marquee_core::traits::System;
use marquee_protocol::messages::PROTOCOL_VERSION;
use marquee_protocol::DeviceMessage;

use crate::board::Board;
use crate::channels::WELCOME;
use crate::link::{self, LinkTransport};

/// Give up on the bridge after this long and let boot report the failure
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Pause between `Hello` frames while waiting
const HELLO_INTERVAL: Duration = Duration::from_secs(2);

/// How long "Connection failed!" stays up before the board restarts
const RESTART_DELAY: Duration = Duration::from_secs(10);

/// Controller task - main coordination loop
#[embassy_executor::task]
pub async fn controller_task(mut board: Board, config: &'static Config) {
    info!("Controller task started");

    let mut transport = LinkTransport::new();

    if let Err(e) = board.ctx().show(BOOT_MESSAGE, false) {
        warn!("Boot message not shown: {}", e);
    }
    match wait_for_bridge(&mut board).await {
        Some(unix_ms) => board.clock.sync(unix_ms),
        None => warn!("Bridge did not answer"),
    }

    let mut scheduler = match startup::boot(&mut board.ctx(), &mut transport, config) {
        Ok(scheduler) => scheduler,
        Err(e) => {
            error!("Startup failed: {}", e);
            wait_fed(&mut board, RESTART_DELAY).await;
            board.system.reboot();
            return;
        }
    };

    board.weather.prefetch();
    board.sentences.prefetch();
    info!("Entering main loop in {}", scheduler.session().mode.name());

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));
    loop {
        // The bridge says Welcome again after it restarts
        if let Some(unix_ms) = WELCOME.try_take() {
            board.clock.sync(unix_ms);
        }

        scheduler.tick(&mut board.ctx(), &mut transport);
        ticker.next().await;
    }
}

/// Send `Hello` until the bridge answers, returning its clock
async fn wait_for_bridge(board: &mut Board) -> Option<u64> {
    let deadline = Instant::now() + CONNECT_TIMEOUT;

    while Instant::now() < deadline {
        board.system.feed_watchdog();

        let hello = DeviceMessage::Hello {
            version: PROTOCOL_VERSION,
        };
        if let Err(e) = link::enqueue(&hello) {
            warn!("Hello not queued: {}", e);
        }

        if let Ok(unix_ms) = with_timeout(HELLO_INTERVAL, WELCOME.wait()).await {
            return Some(unix_ms);
        }
        debug!("No answer from bridge yet");
    }
    None
}

/// Sleep without starving the watchdog
async fn wait_fed(board: &mut Board, total: Duration) {
    let deadline = Instant::now() + total;
    while Instant::now() < deadline {
        board.system.feed_watchdog();
        Timer::after(Duration::from_secs(1)).await;
    }
}
