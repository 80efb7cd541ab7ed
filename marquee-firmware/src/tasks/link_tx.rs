//! Link UART transmit task
//!
//! Writes queued frames to the bridge.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use marquee_protocol::frame::MAX_FRAME_SIZE;

use crate::channels::OUTBOUND;

/// Link TX task - drains the outbound queue onto the wire
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    let mut buf = [0u8; MAX_FRAME_SIZE];

    loop {
        let frame = OUTBOUND.receive().await;

        let len = match frame.encode(&mut buf) {
            Ok(len) => len,
            Err(e) => {
                warn!("Failed to encode frame 0x{:02x}: {:?}", frame.msg_type, e);
                continue;
            }
        };

        if let Err(e) = tx.write_all(&buf[..len]).await {
            warn!("UART write error: {:?}", e);
        } else {
            trace!("TX: frame 0x{:02x}, {} bytes", frame.msg_type, len);
        }
    }
}
