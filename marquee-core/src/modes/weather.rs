//! Weather for today or tomorrow

use alloc::format;
use alloc::string::String;

use super::{Mode, ModeError, ModeKind, ModeParams, Rendered};
use crate::context::Context;
use crate::traits::ForecastDay;

/// Shows the forecast from the [`WeatherSource`](crate::traits::WeatherSource)
///
/// `tomorrow` selects the next day; any other parameter shows today.
#[derive(Debug, Default)]
pub struct WeatherMode;

impl WeatherMode {
    pub fn new() -> Self {
        Self
    }
}

/// Short Portuguese description of a WMO weather code
pub fn describe(code: u8) -> &'static str {
    match code {
        0 | 1 => "limpo",
        2 => "parcialmente nublado",
        3 => "nublado",
        45 | 48 => "nevoeiro",
        51 | 53 | 55 => "chuvisco",
        61 | 63 | 65 => "chuva",
        71 | 73 | 75 => "neve",
        80..=82 => "aguaceiros",
        95 | 96 | 99 => "trovoada",
        _ => "?",
    }
}

/// Whole degrees from tenths, rounding halves away from zero
fn whole_degrees(x10: i16) -> i16 {
    let x10 = i32::from(x10);
    let rounded = if x10 >= 0 { (x10 + 5) / 10 } else { (x10 - 5) / 10 };
    rounded as i16
}

impl Mode for WeatherMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Weather
    }

    fn render(
        &mut self,
        ctx: &mut Context<'_>,
        params: &ModeParams,
    ) -> Result<Rendered, ModeError> {
        let day = match params.text() {
            Some("tomorrow") => ForecastDay::Tomorrow,
            _ => ForecastDay::Today,
        };
        let report = ctx.weather.forecast(day)?;

        let (heading, second): (String, String) = match day {
            ForecastDay::Today => (
                format!("Hoje: {}", describe(report.day_code)),
                format!("Agora: {} C", whole_degrees(report.current_x10)),
            ),
            ForecastDay::Tomorrow => (
                format!("Amanha: {}", describe(report.day_code)),
                String::new(),
            ),
        };
        let message = format!(
            "{}\n{}\nMax: {} C\nMin: {} C",
            heading,
            second,
            whole_degrees(report.max_x10),
            whole_degrees(report.min_x10)
        );

        ctx.show(&message, false)?;
        ctx.logger.trace("Weather displayed on LCD");
        Ok(Rendered::Drawn)
    }
}
