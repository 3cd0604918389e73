//! 1-Wire bus access through the kernel's sysfs interface.
//!
//! The `w1` subsystem exposes every bus master as a directory containing a
//! listing of attached slaves, and every slave as a directory of attribute
//! files. This module reads the listing and the per-sensor `temperature`
//! attribute. It knows nothing about metrics.

mod error;
mod file;
mod listing;
mod sensor;

pub use error::BusError;
pub use listing::{parse_listing, read_listing, LISTING_FILE};
pub use sensor::{parse_temperature, read_sensor, SensorId, SensorReading, TEMPERATURE_FILE};
