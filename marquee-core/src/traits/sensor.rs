//! Temperature sensor trait

/// Errors that can occur with temperature sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Reading out of expected range
    OutOfRange,
    /// ADC conversion error
    ConversionError,
}

impl core::fmt::Display for SensorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SensorError::OutOfRange => f.write_str("temperature out of range"),
            SensorError::ConversionError => f.write_str("ADC conversion failed"),
        }
    }
}

/// Trait for temperature sensors
pub trait TemperatureSensor {
    /// Read the current temperature in degrees Celsius
    ///
    /// Returns a fixed-point value with 0.1°C resolution.
    /// For example, 27.5°C is returned as 275.
    ///
    /// Takes `&mut self` because ADC reads typically require mutable access.
    fn read_celsius_x10(&mut self) -> Result<i16, SensorError>;

    /// Read the current temperature in whole degrees Celsius
    fn read_celsius(&mut self) -> Result<i16, SensorError> {
        self.read_celsius_x10().map(|t| t / 10)
    }
}
