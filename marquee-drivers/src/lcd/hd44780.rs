//! HD44780 character LCD behind a PCF8574 I2C backpack
//!
//! The backpack maps the expander's eight outputs onto the LCD's control
//! lines and upper data nibble:
//!
//! ```text
//! P7 P6 P5 P4 P3 P2 P1 P0
//! D7 D6 D5 D4 BL EN RW RS
//! ```
//!
//! so every byte is sent as two 4-bit halves, each latched by a pulse on EN.
//! RW is never raised; the driver waits out command times instead of
//! reading the busy flag.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use marquee_core::traits::{CharDisplay, DisplayError, Geometry};

/// DDRAM address of the first cell of each row
pub const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

// Expander bits
const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

// Instructions
const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x04;
const CMD_DISPLAY_CONTROL: u8 = 0x08;
const CMD_FUNCTION_SET: u8 = 0x20;
const CMD_SET_DDRAM: u8 = 0x80;

const ENTRY_LEFT: u8 = 0x02;
const DISPLAY_ON: u8 = 0x04;
const FUNCTION_2LINE: u8 = 0x08;

/// HD44780 driver
pub struct Hd44780<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    geometry: Geometry,
    backlight: bool,
}

impl<I2C: I2c, D: DelayNs> Hd44780<I2C, D> {
    /// Create a driver; nothing is sent until [`init`](Self::init)
    pub fn new(i2c: I2C, delay: D, address: u8, geometry: Geometry) -> Self {
        Self {
            i2c,
            delay,
            address,
            geometry,
            backlight: true,
        }
    }

    /// Put the controller into 4-bit mode and clear the panel
    ///
    /// Fails with [`DisplayError::Bus`] when nothing answers at the address,
    /// which is how a missing panel is detected.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_ms(50);
        self.expander(0)?;

        // Power-on reset by instruction: three times 8-bit, then 4-bit
        self.write_nibble(0x03, 0)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x03, 0)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x03, 0)?;
        self.delay.delay_us(150);
        self.write_nibble(0x02, 0)?;

        self.command(CMD_FUNCTION_SET | FUNCTION_2LINE)?;
        self.command(CMD_DISPLAY_CONTROL | DISPLAY_ON)?;
        self.clear()?;
        self.command(CMD_ENTRY_MODE | ENTRY_LEFT)
    }

    /// Give the bus and delay back
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn expander(&mut self, bits: u8) -> Result<(), DisplayError> {
        let byte = if self.backlight { bits | BACKLIGHT } else { bits };
        self.i2c
            .write(self.address, &[byte])
            .map_err(|_| DisplayError::Bus)
    }

    fn write_nibble(&mut self, nibble: u8, mode: u8) -> Result<(), DisplayError> {
        let bits = (nibble << 4) | mode;
        self.expander(bits | EN)?;
        self.delay.delay_us(1);
        self.expander(bits)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn send(&mut self, byte: u8, mode: u8) -> Result<(), DisplayError> {
        self.write_nibble(byte >> 4, mode)?;
        self.write_nibble(byte & 0x0F, mode)
    }

    fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.send(cmd, 0)
    }
}

/// Map a char onto the controller's A00 character ROM
///
/// Printable ASCII is stored as-is; everything else shows as `?`.
fn rom_code(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        _ => b'?',
    }
}

impl<I2C: I2c, D: DelayNs> CharDisplay for Hd44780<I2C, D> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        if col >= self.geometry.cols || row >= self.geometry.rows {
            return Err(DisplayError::InvalidPosition);
        }
        let offset = ROW_OFFSETS
            .get(row as usize)
            .ok_or(DisplayError::InvalidPosition)?;
        self.command(CMD_SET_DDRAM | (offset + col))
    }

    fn write(&mut self, text: &str) -> Result<(), DisplayError> {
        for c in text.chars() {
            self.send(rom_code(c), RS)?;
        }
        Ok(())
    }

    fn backlight(&mut self, on: bool) -> Result<(), DisplayError> {
        self.backlight = on;
        self.expander(0)
    }

    fn geometry(&self) -> Geometry {
        self.geometry
    }
}
