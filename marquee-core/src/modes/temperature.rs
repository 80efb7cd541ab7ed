//! Board temperature

use alloc::format;

use super::{Mode, ModeError, ModeKind, ModeParams, Rendered};
use crate::context::Context;

#[derive(Debug, Default)]
pub struct TemperatureMode;

impl TemperatureMode {
    pub fn new() -> Self {
        Self
    }
}

/// Format tenths of a degree as `12.3`
struct Tenths(i16);

impl core::fmt::Display for Tenths {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{}", sign, abs / 10, abs % 10)
    }
}

impl Mode for TemperatureMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Temperature
    }

    fn render(
        &mut self,
        ctx: &mut Context<'_>,
        _params: &ModeParams,
    ) -> Result<Rendered, ModeError> {
        let celsius = Tenths(ctx.sensor.read_celsius_x10()?);

        ctx.show(&format!("Pico temperature\n{} C", celsius), false)?;
        ctx.log(&format!("Temperature: {}C", celsius));
        Ok(Rendered::Drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Rig;
    use crate::traits::SensorError;

    #[test]
    fn test_render() {
        let mut rig = Rig::new();
        rig.sensor.reading = Ok(284);

        TemperatureMode::new()
            .render(&mut rig.ctx(), &ModeParams::None)
            .unwrap();
        assert_eq!(rig.display.trimmed()[..2], ["Pico temperature", "28.4 C"]);
        assert_eq!(rig.logger.lines, vec!["Temperature: 28.4C"]);
    }

    #[test]
    fn test_sensor_failure() {
        let mut rig = Rig::new();
        rig.sensor.reading = Err(SensorError::ConversionError);

        let result = TemperatureMode::new().render(&mut rig.ctx(), &ModeParams::None);
        assert_eq!(result, Err(ModeError::Sensor(SensorError::ConversionError)));
        assert!(rig.logger.lines.is_empty());
    }

    #[test]
    fn test_tenths_formatting() {
        assert_eq!(Tenths(0).to_string(), "0.0");
        assert_eq!(Tenths(-5).to_string(), "-0.5");
        assert_eq!(Tenths(-123).to_string(), "-12.3");
    }
}
