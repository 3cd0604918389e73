//! Errors raised while reading the bus.

use super::SensorId;
use std::io;
use std::num::ParseFloatError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading the sensor listing or a sensor.
///
/// None of these is fatal to a scrape: a listing failure yields an empty
/// result set and a sensor failure drops that sensor only.
#[derive(Debug, Error)]
pub enum BusError {
    /// The bus master's slave listing could not be read.
    #[error("failed to read sensor listing {path}: {source}")]
    DirectoryRead {
        /// Path of the listing file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A sensor's value file could not be read.
    #[error("failed to read sensor {id} at {path}: {source}")]
    SensorRead {
        /// Sensor whose value file failed.
        id: SensorId,
        /// Path of the value file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A sensor's value file did not contain a number.
    #[error("failed to parse temperature {content:?} of sensor {id}: {source}")]
    Parse {
        /// Sensor whose value failed to parse.
        id: SensorId,
        /// Content after the trailing terminator was stripped.
        content: String,
        /// Underlying parse error.
        #[source]
        source: ParseFloatError,
    },

    /// The scrape deadline passed before a read completed.
    #[error("deadline exceeded while reading {path}")]
    Timeout {
        /// Path of the file being read.
        path: PathBuf,
    },
}
