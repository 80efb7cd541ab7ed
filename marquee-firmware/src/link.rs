//! Engine-side ends of the bridge link
//!
//! The engine's traits are synchronous, the link is not. Everything here
//! queues a request frame for the TX task and answers from whatever the RX
//! task has already delivered, so no call ever waits on the bridge.

use alloc::string::String;
use defmt::*;
use embassy_time::{Duration, Instant};
use portable_atomic::Ordering;

use marquee_core::config::LocationConfig;
use marquee_core::traits::{
    ForecastDay, Logger, SentenceSource, SourceError, Transport, TransportError, Update,
    WeatherReport, WeatherSource,
};
use marquee_protocol::DeviceMessage;

use crate::channels::{
    SentenceReply, WeatherReply, LINK_UP, OUTBOUND, SENTENCE_REPLIES, UPDATES, WEATHER_REPLIES,
};

/// A poll with no answer after this long counts as lost
const POLL_TIMEOUT: Duration = Duration::from_secs(10);

/// Forecasts older than this are re-requested
const WEATHER_MAX_AGE: Duration = Duration::from_secs(10 * 60);

/// Unanswered data requests are repeated after this long
const REQUEST_RETRY: Duration = Duration::from_secs(30);

/// Queue `message` for the TX task
pub fn enqueue(message: &DeviceMessage<'_>) -> Result<(), TransportError> {
    let frame = message.to_frame().map_err(|_| TransportError::Malformed)?;
    OUTBOUND.try_send(frame).map_err(|_| TransportError::Busy)
}

fn due(requested: Option<Instant>) -> bool {
    requested.map_or(true, |at| at.elapsed() >= REQUEST_RETRY)
}

/// Chat transport over the bridge
///
/// At most one poll is in flight. An answer is handed out on the next
/// fetch, which also sends the following poll so the answer after that is
/// waiting by the time the scheduler asks again.
pub struct LinkTransport {
    poll_sent: Option<Instant>,
}

impl LinkTransport {
    pub fn new() -> Self {
        Self { poll_sent: None }
    }

    fn request(&mut self, cursor: Option<u64>) -> Result<(), TransportError> {
        enqueue(&DeviceMessage::Poll { cursor })?;
        self.poll_sent = Some(Instant::now());
        Ok(())
    }
}

impl Transport for LinkTransport {
    fn connect(&mut self) -> Result<(), TransportError> {
        if LINK_UP.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(TransportError::LinkDown)
        }
    }

    fn fetch_latest(&mut self, cursor: Option<u64>) -> Result<Update, TransportError> {
        if let Ok(update) = UPDATES.try_receive() {
            self.poll_sent = None;
            if let Err(e) = self.request(cursor.max(update.cursor)) {
                warn!("Next poll not queued: {}", e);
            }
            return Ok(update);
        }

        match self.poll_sent {
            Some(sent) if sent.elapsed() < POLL_TIMEOUT => Ok(Update::idle(cursor)),
            Some(_) => {
                self.poll_sent = None;
                Err(TransportError::Timeout)
            }
            None => {
                self.request(cursor)?;
                Ok(Update::idle(cursor))
            }
        }
    }

    fn send(&mut self, target_id: i64, text: &str) -> Result<(), TransportError> {
        enqueue(&DeviceMessage::Send {
            chat_id: target_id,
            text,
        })
    }
}

/// defmt log that also forwards `log` lines to the log chat
pub struct LinkLogger {
    chat_id: i64,
}

impl LinkLogger {
    /// `chat_id` 0 keeps everything local
    pub fn new(chat_id: i64) -> Self {
        Self { chat_id }
    }
}

impl Logger for LinkLogger {
    fn log(&mut self, message: &str) {
        info!("{=str}", message);

        if self.chat_id == 0 || !LINK_UP.load(Ordering::Acquire) {
            return;
        }
        let forwarded = enqueue(&DeviceMessage::Send {
            chat_id: self.chat_id,
            text: message,
        });
        if let Err(e) = forwarded {
            warn!("Log line not forwarded: {}", e);
        }
    }

    fn trace(&mut self, message: &str) {
        trace!("{=str}", message);
    }
}

#[derive(Default)]
struct ForecastSlot {
    report: Option<(WeatherReport, Instant)>,
    requested: Option<Instant>,
    unavailable: bool,
}

/// Forecasts for today and tomorrow, cached from bridge answers
pub struct WeatherLink {
    lat_e4: i32,
    lon_e4: i32,
    slots: [ForecastSlot; 2],
}

impl WeatherLink {
    pub fn new(location: &LocationConfig) -> Self {
        Self {
            lat_e4: (location.latitude * 10_000.0) as i32,
            lon_e4: (location.longitude * 10_000.0) as i32,
            slots: Default::default(),
        }
    }

    /// Ask for both days ahead of the first render
    pub fn prefetch(&mut self) {
        self.request(ForecastDay::Today);
        self.request(ForecastDay::Tomorrow);
    }

    fn request(&mut self, day: ForecastDay) {
        let slot = &mut self.slots[day.offset() as usize];
        if !due(slot.requested) {
            return;
        }
        let queued = enqueue(&DeviceMessage::WeatherRequest {
            day: day.offset(),
            lat_e4: self.lat_e4,
            lon_e4: self.lon_e4,
        });
        match queued {
            Ok(()) => slot.requested = Some(Instant::now()),
            Err(e) => warn!("Weather request not queued: {}", e),
        }
    }

    fn drain(&mut self) {
        while let Ok(reply) = WEATHER_REPLIES.try_receive() {
            match reply {
                WeatherReply::Report(f) => {
                    let Some(slot) = self.slots.get_mut(f.day as usize) else {
                        warn!("Forecast for day {} ignored", f.day);
                        continue;
                    };
                    let report = WeatherReport {
                        current_x10: f.current_x10,
                        current_code: f.current_code,
                        max_x10: f.max_x10,
                        min_x10: f.min_x10,
                        day_code: f.day_code,
                    };
                    slot.report = Some((report, Instant::now()));
                    slot.requested = None;
                    slot.unavailable = false;
                }
                // Not tagged with a day; fails whatever is outstanding
                WeatherReply::Unavailable => {
                    for slot in self.slots.iter_mut().filter(|s| s.requested.is_some()) {
                        slot.requested = None;
                        slot.unavailable = true;
                    }
                }
            }
        }
    }
}

impl WeatherSource for WeatherLink {
    /// Latest forecast for `day`, possibly stale; a refresh is requested
    /// when it is
    fn forecast(&mut self, day: ForecastDay) -> Result<WeatherReport, SourceError> {
        self.drain();

        let slot = &self.slots[day.offset() as usize];
        let fresh = matches!(slot.report, Some((_, at)) if at.elapsed() < WEATHER_MAX_AGE);
        if !fresh {
            self.request(day);
        }

        let slot = &self.slots[day.offset() as usize];
        match slot.report {
            Some((report, _)) => Ok(report),
            None if slot.unavailable => Err(SourceError::Unavailable),
            None => Err(SourceError::Pending),
        }
    }
}

/// One sentence kept in reserve, replaced as soon as it is used
pub struct SentenceLink {
    ready: Option<String>,
    requested: Option<Instant>,
    unavailable: bool,
}

impl SentenceLink {
    pub fn new() -> Self {
        Self {
            ready: None,
            requested: None,
            unavailable: false,
        }
    }

    pub fn prefetch(&mut self) {
        self.request();
    }

    fn request(&mut self) {
        if !due(self.requested) {
            return;
        }
        match enqueue(&DeviceMessage::SentenceRequest) {
            Ok(()) => self.requested = Some(Instant::now()),
            Err(e) => warn!("Sentence request not queued: {}", e),
        }
    }

    fn drain(&mut self) {
        while let Ok(reply) = SENTENCE_REPLIES.try_receive() {
            self.requested = None;
            match reply {
                SentenceReply::Text(text) => {
                    self.ready = Some(String::from(text.as_str()));
                    self.unavailable = false;
                }
                SentenceReply::Unavailable => self.unavailable = true,
            }
        }
    }
}

impl SentenceSource for SentenceLink {
    fn sentence(&mut self) -> Result<String, SourceError> {
        self.drain();

        let next = self.ready.take();
        self.request();
        match next {
            Some(text) => Ok(text),
            None if self.unavailable => Err(SourceError::Unavailable),
            None => Err(SourceError::Pending),
        }
    }
}
