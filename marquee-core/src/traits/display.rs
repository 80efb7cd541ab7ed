//! Character display trait

use crate::layout::layout;

/// Errors that can occur while driving the character display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transaction failed (NACK, arbitration loss)
    Bus,
    /// Cursor position outside the panel
    InvalidPosition,
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DisplayError::Bus => f.write_str("display bus error"),
            DisplayError::InvalidPosition => f.write_str("cursor outside display"),
        }
    }
}

/// Panel size in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    pub cols: u8,
    pub rows: u8,
}

/// Trait for fixed-grid character displays
///
/// The panel is a dumb grid: the engine lays text out itself and writes
/// whole padded lines, so implementations only need cursor addressing.
pub trait CharDisplay {
    /// Clear the entire screen and home the cursor
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Move the cursor
    ///
    /// - `col`: Column number (0-based)
    /// - `row`: Row number (0-based)
    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError>;

    /// Write text at the cursor
    fn write(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Switch the backlight on or off
    fn backlight(&mut self, on: bool) -> Result<(), DisplayError>;

    /// Get the panel size
    fn geometry(&self) -> Geometry;

    /// Check if a physical panel is attached
    fn is_present(&self) -> bool {
        true
    }
}

/// Helper trait for writing laid-out text
pub trait CharDisplayExt: CharDisplay {
    /// Lay `message` out on the full panel and write every line
    fn show(&mut self, message: &str, word_wrap: bool) -> Result<(), DisplayError> {
        let Geometry { cols, rows } = self.geometry();
        let lines = layout(message, cols as usize, rows as usize, word_wrap);
        for (row, line) in lines.iter().enumerate() {
            self.set_cursor(0, row as u8)?;
            self.write(line)?;
        }
        Ok(())
    }
}

// Blanket implementation for all CharDisplay types
impl<T: CharDisplay + ?Sized> CharDisplayExt for T {}

/// Stand-in used when no panel answers on the bus
///
/// Every operation succeeds and does nothing, so the engine keeps running
/// (and logging) without a display attached.
#[derive(Debug, Clone, Copy)]
pub struct Headless {
    geometry: Geometry,
}

impl Headless {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }
}

impl CharDisplay for Headless {
    fn clear(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn set_cursor(&mut self, _col: u8, _row: u8) -> Result<(), DisplayError> {
        Ok(())
    }

    fn write(&mut self, _text: &str) -> Result<(), DisplayError> {
        Ok(())
    }

    fn backlight(&mut self, _on: bool) -> Result<(), DisplayError> {
        Ok(())
    }

    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn is_present(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingDisplay;

    #[test]
    fn test_show_writes_every_row() {
        let mut display = RecordingDisplay::new(20, 4);
        display.show("Hello\nworld", false).unwrap();

        let frame = display.frame();
        assert_eq!(frame.len(), 4);
        assert_eq!(frame[0], "Hello               ");
        assert_eq!(frame[1], "world               ");
        assert_eq!(frame[3], " ".repeat(20));
    }

    #[test]
    fn test_show_through_trait_object() {
        let mut display = RecordingDisplay::new(16, 2);
        let dyn_display: &mut dyn CharDisplay = &mut display;
        dyn_display.show("one two three four five", true).unwrap();
        assert_eq!(display.frame()[0], "one two three   ");
        assert_eq!(display.frame()[1], "four five       ");
    }

    #[test]
    fn test_headless_accepts_everything() {
        let mut display = Headless::new(Geometry { cols: 20, rows: 4 });
        assert!(display.show("ignored", true).is_ok());
        assert!(display.backlight(false).is_ok());
        assert!(!display.is_present());
    }
}
