//! Link UART receive task
//!
//! Receives frames from the bridge and routes each answer to the channel
//! its consumer reads.

use alloc::string::String;
use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;
use portable_atomic::Ordering;

use marquee_core::traits::{InboundMessage, Update};
use marquee_protocol::messages::{MSG_SENTENCE_REQUEST, MSG_WEATHER_REQUEST};
use marquee_protocol::{BridgeMessage, FrameParser};

use crate::channels::{
    SentenceReply, WeatherReply, LINK_UP, SENTENCE_REPLIES, UPDATES, WEATHER_REPLIES, WELCOME,
};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Link RX task - receives and parses frames from the bridge
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        let n = match rx.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                warn!("UART read error: {:?}", e);
                continue;
            }
        };
        trace!("RX: {} bytes", n);

        for &byte in &buf[..n] {
            match parser.feed(byte) {
                Ok(Some(frame)) => match BridgeMessage::from_frame(&frame) {
                    Ok(message) => handle_bridge_message(message),
                    Err(e) => warn!("Failed to parse bridge message: {:?}", e),
                },
                Ok(None) => {}
                Err(e) => warn!("Frame parse error: {:?}", e),
            }
        }
    }
}

fn handle_bridge_message(message: BridgeMessage<'_>) {
    match message {
        BridgeMessage::Welcome { unix_ms } => {
            info!("Bridge connected");
            LINK_UP.store(true, Ordering::Release);
            WELCOME.signal(unix_ms);
        }
        BridgeMessage::Update { cursor, message } => {
            let update = Update {
                cursor,
                message: message.map(|m| InboundMessage {
                    text: String::from(m.text),
                    sender_name: String::from(m.sender_name),
                    sender_id: m.sender_id,
                }),
            };
            if UPDATES.try_send(update).is_err() {
                warn!("Update channel full, dropping update");
            }
        }
        BridgeMessage::Weather(forecast) => {
            debug!("Forecast for day {}", forecast.day);
            if WEATHER_REPLIES.try_send(WeatherReply::Report(forecast)).is_err() {
                warn!("Weather channel full, dropping forecast");
            }
        }
        BridgeMessage::Sentence { text } => {
            let mut owned = heapless::String::new();
            // Fits: the text came out of one frame payload
            let _ = owned.push_str(text);
            if SENTENCE_REPLIES.try_send(SentenceReply::Text(owned)).is_err() {
                warn!("Sentence channel full, dropping sentence");
            }
        }
        BridgeMessage::Unavailable { request } => {
            debug!("Bridge could not serve request 0x{:02x}", request);
            let delivered = match request {
                MSG_WEATHER_REQUEST => WEATHER_REPLIES.try_send(WeatherReply::Unavailable).is_ok(),
                MSG_SENTENCE_REQUEST => {
                    SENTENCE_REPLIES.try_send(SentenceReply::Unavailable).is_ok()
                }
                _ => true,
            };
            if !delivered {
                warn!("Reply channel full, dropping unavailable notice");
            }
        }
    }
}
