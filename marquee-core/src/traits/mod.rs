//! Collaborator traits
//!
//! These traits define the interface between the engine and everything
//! outside it: the panel, the chat link, data sources and the board.

pub mod display;
pub mod sensor;
pub mod source;
pub mod system;
pub mod transport;

pub use display::{CharDisplay, CharDisplayExt, DisplayError, Geometry, Headless};
pub use sensor::{SensorError, TemperatureSensor};
pub use source::{ForecastDay, SentenceSource, SourceError, WeatherReport, WeatherSource};
pub use system::{Clock, Logger, System};
pub use transport::{InboundMessage, Transport, TransportError, Update};
