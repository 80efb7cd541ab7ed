//! Marquee - Character LCD Message Board Firmware
//!
//! Main firmware binary for RP2040-based boards driving an HD44780 panel.
//! Messages and commands arrive from a chat through a bridge process on
//! the other end of UART0; everything shown is decided by marquee-core.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc};
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_rp::watchdog::Watchdog;
use embassy_time::Delay;
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use marquee_core::config::{parse_config, Config};
use marquee_drivers::lcd::Hd44780;
use marquee_drivers::sensor::DieTempSensor;

use crate::board::{Board, BoardClock, BoardSystem, DieAdc, Panel, WATCHDOG_PERIOD};
use crate::link::{LinkLogger, SentenceLink, WeatherLink};

// Heap for message text and layout
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 64KB
const HEAP_SIZE: usize = 64 * 1024;

/// Embedded configuration (compiled into firmware)
/// Edit marquee.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../marquee.toml");

mod board;
mod channels;
mod link;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 512]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

static CONFIG: StaticCell<Config> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Marquee firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config: &'static Config = CONFIG.init(load_config());

    // Bridge link on UART0 (GPIO0 TX, GPIO1 RX), 115200 baud
    let tx_buf = TX_BUF.init([0u8; 512]);
    let rx_buf = RX_BUF.init([0u8; 512]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized for bridge link");

    // LCD backpack on I2C0 (GPIO4 SDA, GPIO5 SCL)
    let geometry = config.display.geometry();
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c::Config::default());
    let lcd = Hd44780::new(i2c, Delay, config.display.i2c_address, geometry);
    let display = Panel::probe(lcd, geometry);

    // On-die temperature sensor
    let adc = Adc::new_blocking(p.ADC, adc::Config::default());
    let channel = adc::Channel::new_temp_sensor(p.ADC_TEMP_SENSOR);
    let sensor = DieTempSensor::new(DieAdc::new(adc, channel));

    let watchdog = if config.watchdog {
        let mut watchdog = Watchdog::new(p.WATCHDOG);
        watchdog.start(WATCHDOG_PERIOD);
        info!("Watchdog armed");
        Some(watchdog)
    } else {
        None
    };

    let board = Board {
        display,
        logger: LinkLogger::new(config.log_chat_id),
        clock: BoardClock::new(),
        system: BoardSystem::new(watchdog),
        weather: WeatherLink::new(&config.location),
        sentences: SentenceLink::new(),
        sensor,
        utc_offset_minutes: config.utc_offset_minutes,
    };

    spawner.spawn(tasks::link_rx_task(rx)).unwrap();
    spawner.spawn(tasks::link_tx_task(tx)).unwrap();
    spawner.spawn(tasks::controller_task(board, config)).unwrap();

    info!("All tasks spawned, firmware running");
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}

/// Parse the embedded marquee.toml
///
/// build.rs has already checked it, so failure here means the on-board
/// parser disagrees with the `toml` crate; the defaults keep the board up.
fn load_config() -> Config {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            error!("Using built-in defaults");
            Config::default()
        }
    }
}
