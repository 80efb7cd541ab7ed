//! Upstream data sources used by individual modes

use alloc::string::String;

/// Errors reported by a data source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceError {
    /// Source is unreachable
    Unavailable,
    /// Request sent, no answer yet
    Pending,
    /// Answer could not be decoded
    Malformed,
}

impl core::fmt::Display for SourceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SourceError::Unavailable => f.write_str("source unavailable"),
            SourceError::Pending => f.write_str("no data yet"),
            SourceError::Malformed => f.write_str("malformed data"),
        }
    }
}

/// Which day a forecast is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ForecastDay {
    Today,
    Tomorrow,
}

impl ForecastDay {
    /// Day offset from today
    pub fn offset(self) -> u8 {
        match self {
            ForecastDay::Today => 0,
            ForecastDay::Tomorrow => 1,
        }
    }
}

/// Weather for one day
///
/// Temperatures are fixed-point with 0.1°C resolution. Weather codes are
/// WMO 4677 codes as used by Open-Meteo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WeatherReport {
    pub current_x10: i16,
    pub current_code: u8,
    pub max_x10: i16,
    pub min_x10: i16,
    pub day_code: u8,
}

/// Trait for weather forecast providers
pub trait WeatherSource {
    fn forecast(&mut self, day: ForecastDay) -> Result<WeatherReport, SourceError>;
}

/// Trait for providers of short free-form sentences
pub trait SentenceSource {
    fn sentence(&mut self) -> Result<String, SourceError>;
}
