//! Test doubles for the collaborator traits

use std::collections::VecDeque;

use crate::context::Context;
use crate::traits::{
    CharDisplay, Clock, DisplayError, ForecastDay, Geometry, InboundMessage, Logger,
    SensorError, SentenceSource, SourceError, System, TemperatureSensor, Transport,
    TransportError, Update, WeatherReport, WeatherSource,
};

/// Character grid that remembers what was written to it
pub struct RecordingDisplay {
    geometry: Geometry,
    grid: Vec<Vec<char>>,
    cursor: (usize, usize),
    pub present: bool,
    /// Every clear and write fails with a bus error while set
    pub bus_error: bool,
    pub writes: usize,
    pub clears: usize,
    pub backlight_changes: Vec<bool>,
}

impl RecordingDisplay {
    pub fn new(cols: u8, rows: u8) -> Self {
        Self {
            geometry: Geometry { cols, rows },
            grid: vec![vec![' '; cols as usize]; rows as usize],
            cursor: (0, 0),
            present: true,
            bus_error: false,
            writes: 0,
            clears: 0,
            backlight_changes: Vec::new(),
        }
    }

    /// Every row, full width
    pub fn frame(&self) -> Vec<String> {
        self.grid.iter().map(|row| row.iter().collect()).collect()
    }

    /// Every row with trailing blanks removed
    pub fn trimmed(&self) -> Vec<String> {
        self.frame()
            .into_iter()
            .map(|row| row.trim_end().to_string())
            .collect()
    }
}

impl CharDisplay for RecordingDisplay {
    fn clear(&mut self) -> Result<(), DisplayError> {
        if self.bus_error {
            return Err(DisplayError::Bus);
        }
        for row in &mut self.grid {
            row.fill(' ');
        }
        self.cursor = (0, 0);
        self.clears += 1;
        Ok(())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        if col >= self.geometry.cols || row >= self.geometry.rows {
            return Err(DisplayError::InvalidPosition);
        }
        self.cursor = (col as usize, row as usize);
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<(), DisplayError> {
        if self.bus_error {
            return Err(DisplayError::Bus);
        }
        let (mut col, row) = self.cursor;
        for c in text.chars() {
            if col < self.geometry.cols as usize {
                self.grid[row][col] = c;
            }
            col += 1;
        }
        self.cursor = (col, row);
        self.writes += 1;
        Ok(())
    }

    fn backlight(&mut self, on: bool) -> Result<(), DisplayError> {
        self.backlight_changes.push(on);
        Ok(())
    }

    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn is_present(&self) -> bool {
        self.present
    }
}

#[derive(Default)]
pub struct RecordingLogger {
    pub lines: Vec<String>,
    pub traces: Vec<String>,
}

impl Logger for RecordingLogger {
    fn log(&mut self, message: &str) {
        self.lines.push(message.to_string());
    }

    fn trace(&mut self, message: &str) {
        self.traces.push(message.to_string());
    }
}

#[derive(Default)]
pub struct ManualClock {
    pub now: u64,
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now
    }
}

#[derive(Default)]
pub struct FakeSystem {
    pub slept_ms: u64,
    pub feeds: u32,
    pub reboots: u32,
}

impl System for FakeSystem {
    fn sleep_ms(&mut self, ms: u32) {
        self.slept_ms += u64::from(ms);
    }

    fn feed_watchdog(&mut self) {
        self.feeds += 1;
    }

    fn reboot(&mut self) {
        self.reboots += 1;
    }
}

pub struct FakeWeather {
    pub today: Result<WeatherReport, SourceError>,
    pub tomorrow: Result<WeatherReport, SourceError>,
}

impl Default for FakeWeather {
    fn default() -> Self {
        let report = WeatherReport {
            current_x10: 180,
            current_code: 1,
            max_x10: 220,
            min_x10: 120,
            day_code: 2,
        };
        Self {
            today: Ok(report),
            tomorrow: Ok(report),
        }
    }
}

impl WeatherSource for FakeWeather {
    fn forecast(&mut self, day: ForecastDay) -> Result<WeatherReport, SourceError> {
        match day {
            ForecastDay::Today => self.today,
            ForecastDay::Tomorrow => self.tomorrow,
        }
    }
}

pub struct FakeSentences {
    pub next: Result<String, SourceError>,
}

impl Default for FakeSentences {
    fn default() -> Self {
        Self {
            next: Ok("The quick brown fox jumps over the lazy dog.".to_string()),
        }
    }
}

impl SentenceSource for FakeSentences {
    fn sentence(&mut self) -> Result<String, SourceError> {
        self.next.clone()
    }
}

pub struct FakeSensor {
    pub reading: Result<i16, SensorError>,
}

impl Default for FakeSensor {
    fn default() -> Self {
        Self { reading: Ok(250) }
    }
}

impl TemperatureSensor for FakeSensor {
    fn read_celsius_x10(&mut self) -> Result<i16, SensorError> {
        self.reading
    }
}

/// Transport that replays queued fetch results
#[derive(Default)]
pub struct ScriptedTransport {
    pub connect_error: Option<TransportError>,
    pub replies: VecDeque<Result<Update, TransportError>>,
    /// Cursor passed to every fetch
    pub fetches: Vec<Option<u64>>,
}

impl ScriptedTransport {
    /// Queue one message from Ada in chat 42
    pub fn push_message(&mut self, cursor: u64, text: &str) {
        self.replies.push_back(Ok(Update {
            cursor: Some(cursor),
            message: Some(InboundMessage {
                text: text.to_string(),
                sender_name: "Ada Lovelace".to_string(),
                sender_id: 42,
            }),
        }));
    }
}

impl Transport for ScriptedTransport {
    fn connect(&mut self) -> Result<(), TransportError> {
        match self.connect_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fetch_latest(&mut self, cursor: Option<u64>) -> Result<Update, TransportError> {
        self.fetches.push(cursor);
        self.replies
            .pop_front()
            .unwrap_or_else(|| Ok(Update::idle(cursor)))
    }

    fn send(&mut self, _target_id: i64, _text: &str) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Every collaborator a [`Context`] needs, owned in one place
pub struct Rig {
    pub display: RecordingDisplay,
    pub logger: RecordingLogger,
    pub clock: ManualClock,
    pub system: FakeSystem,
    pub weather: FakeWeather,
    pub sentences: FakeSentences,
    pub sensor: FakeSensor,
}

impl Rig {
    /// 20×4 panel, clock at the epoch
    pub fn new() -> Self {
        Self {
            display: RecordingDisplay::new(20, 4),
            logger: RecordingLogger::default(),
            clock: ManualClock::default(),
            system: FakeSystem::default(),
            weather: FakeWeather::default(),
            sentences: FakeSentences::default(),
            sensor: FakeSensor::default(),
        }
    }

    /// No panel attached
    pub fn headless() -> Self {
        let mut rig = Self::new();
        rig.display.present = false;
        rig
    }

    /// Context in UTC
    pub fn ctx(&mut self) -> Context<'_> {
        Context {
            display: &mut self.display,
            logger: &mut self.logger,
            clock: &self.clock,
            system: &mut self.system,
            weather: &mut self.weather,
            sentences: &mut self.sentences,
            sensor: &mut self.sensor,
            utc_offset_minutes: 0,
        }
    }
}
