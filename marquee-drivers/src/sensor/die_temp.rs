//! RP2040 on-die temperature sensor
//!
//! The sensor is a biased diode on ADC channel 4. Per the RP2040 datasheet:
//!
//! ```text
//! T = 27 - (V - 0.706) / 0.001721
//! ```
//!
//! with V the ADC voltage against a 3.3 V reference. The conversion here is
//! done in microvolts with integer math.

use marquee_core::traits::{SensorError, TemperatureSensor};

/// ADC reference voltage in microvolts
const VREF_UV: i64 = 3_300_000;

/// 12-bit ADC full scale
const ADC_STEPS: i64 = 4096;

/// Diode voltage at 27°C, microvolts
const V27_UV: i64 = 706_000;

/// Slope, microvolts per degree
const SLOPE_UV: i64 = 1_721;

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read ADC value (12-bit, 0-4095)
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

/// On-die sensor read through an [`AdcReader`]
pub struct DieTempSensor<ADC> {
    adc: ADC,
}

impl<ADC> DieTempSensor<ADC> {
    pub fn new(adc: ADC) -> Self {
        Self { adc }
    }

    /// Convert a raw reading to tenths of a degree, rounded to nearest
    pub fn raw_to_temp_x10(raw: u16) -> Result<i16, SensorError> {
        // Rails mean a floating or shorted input, not a temperature
        if raw == 0 || raw as i64 >= ADC_STEPS - 1 {
            return Err(SensorError::OutOfRange);
        }

        let uv = raw as i64 * VREF_UV / ADC_STEPS;
        let delta = (uv - V27_UV) * 10;
        let half = if delta < 0 { -SLOPE_UV / 2 } else { SLOPE_UV / 2 };
        let temp = 270 - (delta + half) / SLOPE_UV;

        i16::try_from(temp).map_err(|_| SensorError::OutOfRange)
    }
}

impl<ADC: AdcReader> TemperatureSensor for DieTempSensor<ADC> {
    fn read_celsius_x10(&mut self) -> Result<i16, SensorError> {
        let raw = self.adc.read().map_err(|_| SensorError::ConversionError)?;
        Self::raw_to_temp_x10(raw)
    }
}
