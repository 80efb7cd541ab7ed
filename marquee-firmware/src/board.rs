//! Board services behind the engine's collaborator traits

use cortex_m::peripheral::SCB;
use embassy_rp::adc::{self, Adc};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_rp::watchdog::Watchdog;
use embassy_time::{block_for, Delay, Duration, Instant};

use marquee_core::context::Context;
use marquee_core::traits::{CharDisplay, Clock, DisplayError, Geometry, Headless, System};
use marquee_drivers::lcd::Hd44780;
use marquee_drivers::sensor::{AdcReader, DieTempSensor};

use crate::link::{LinkLogger, SentenceLink, WeatherLink};

/// Watchdog period; the RP2040 tops out a little above 8 s
pub const WATCHDOG_PERIOD: Duration = Duration::from_secs(8);

/// Wall clock derived from the bridge's `Welcome` and the uptime timer
pub struct BoardClock {
    epoch_ms: u64,
}

impl BoardClock {
    /// Clock that reads as uptime until synced
    pub fn new() -> Self {
        Self { epoch_ms: 0 }
    }

    pub fn sync(&mut self, unix_ms: u64) {
        self.epoch_ms = unix_ms.saturating_sub(Instant::now().as_millis());
    }
}

impl Clock for BoardClock {
    fn now_ms(&self) -> u64 {
        self.epoch_ms + Instant::now().as_millis()
    }
}

pub struct BoardSystem {
    watchdog: Option<Watchdog>,
}

impl BoardSystem {
    /// `watchdog` is fed on every tick when present
    pub fn new(watchdog: Option<Watchdog>) -> Self {
        Self { watchdog }
    }
}

impl System for BoardSystem {
    fn sleep_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(u64::from(ms)));
    }

    fn feed_watchdog(&mut self) {
        if let Some(watchdog) = &mut self.watchdog {
            watchdog.feed();
        }
    }

    fn reboot(&mut self) {
        SCB::sys_reset();
    }
}

/// ADC channel 4 (on-die sensor), read blocking
pub struct DieAdc {
    adc: Adc<'static, adc::Blocking>,
    channel: adc::Channel<'static>,
}

impl DieAdc {
    pub fn new(adc: Adc<'static, adc::Blocking>, channel: adc::Channel<'static>) -> Self {
        Self { adc, channel }
    }
}

impl AdcReader for DieAdc {
    fn read(&mut self) -> Result<u16, ()> {
        self.adc.blocking_read(&mut self.channel).map_err(|_| ())
    }
}

pub type Lcd = Hd44780<I2c<'static, I2C0, i2c::Blocking>, Delay>;

/// The LCD if it answered at boot, otherwise nothing
pub enum Panel {
    Lcd(Lcd),
    Headless(Headless),
}

impl Panel {
    /// Initialise the LCD, falling back to headless if it does not answer
    pub fn probe(mut lcd: Lcd, geometry: Geometry) -> Self {
        match lcd.init() {
            Ok(()) => Panel::Lcd(lcd),
            Err(e) => {
                defmt::warn!("LCD not found: {}", e);
                Panel::Headless(Headless::new(geometry))
            }
        }
    }

    fn inner(&mut self) -> &mut dyn CharDisplay {
        match self {
            Panel::Lcd(lcd) => lcd,
            Panel::Headless(headless) => headless,
        }
    }
}

impl CharDisplay for Panel {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.inner().clear()
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        self.inner().set_cursor(col, row)
    }

    fn write(&mut self, text: &str) -> Result<(), DisplayError> {
        self.inner().write(text)
    }

    fn backlight(&mut self, on: bool) -> Result<(), DisplayError> {
        self.inner().backlight(on)
    }

    fn geometry(&self) -> Geometry {
        match self {
            Panel::Lcd(lcd) => lcd.geometry(),
            Panel::Headless(headless) => headless.geometry(),
        }
    }

    fn is_present(&self) -> bool {
        matches!(self, Panel::Lcd(_))
    }
}

/// Everything a tick needs, owned by the controller task
pub struct Board {
    pub display: Panel,
    pub logger: LinkLogger,
    pub clock: BoardClock,
    pub system: BoardSystem,
    pub weather: WeatherLink,
    pub sentences: SentenceLink,
    pub sensor: DieTempSensor<DieAdc>,
    pub utc_offset_minutes: i32,
}

impl Board {
    pub fn ctx(&mut self) -> Context<'_> {
        Context {
            display: &mut self.display,
            logger: &mut self.logger,
            clock: &self.clock,
            system: &mut self.system,
            weather: &mut self.weather,
            sentences: &mut self.sentences,
            sensor: &mut self.sensor,
            utc_offset_minutes: self.utc_offset_minutes,
        }
    }
}
