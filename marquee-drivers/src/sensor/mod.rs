//! Temperature sensor implementations

pub mod die_temp;

pub use die_temp::{AdcReader, DieTempSensor};
