//! Per-sensor temperature reads.

use super::file::{read_to_string_until, ReadFailure};
use super::BusError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tokio::time::Instant;

/// Name of the attribute file holding a sensor's temperature.
pub const TEMPERATURE_FILE: &str = "temperature";

/// Identifier of a slave on the bus, taken verbatim from the listing.
///
/// Usually of the `family-serial` form (`28-0316a2795bff`), but nothing
/// about its structure is checked. A stale or malformed ID surfaces as a
/// read failure for that sensor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorId(String);

impl SensorId {
    /// Creates an ID from a listing entry.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as it appeared in the listing.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SensorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A successfully read and parsed temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    /// Sensor that produced the value.
    pub sensor_id: SensorId,
    /// Temperature in degrees Celsius.
    pub temperature_celsius: f64,
}

/// Parses the content of a `temperature` file into degrees Celsius.
///
/// The kernel writes milli-degrees followed by a single newline. Exactly
/// one trailing `\n` is stripped; anything else left over makes the parse
/// fail.
pub fn parse_temperature(id: &SensorId, content: &str) -> Result<f64, BusError> {
    let raw = content.strip_suffix('\n').unwrap_or(content);

    let milli_degrees: f64 = raw.parse().map_err(|source| BusError::Parse {
        id: id.clone(),
        content: raw.to_string(),
        source,
    })?;

    Ok(milli_degrees / 1000.0)
}

/// Reads and parses `<base>/<id>/temperature`.
pub async fn read_sensor(
    base: &Path,
    id: &SensorId,
    deadline: Instant,
) -> Result<SensorReading, BusError> {
    let path = base.join(id.as_str()).join(TEMPERATURE_FILE);

    tracing::debug!(sensor = %id, path = %path.display(), "Reading sensor");

    let content = read_to_string_until(&path, deadline)
        .await
        .map_err(|failure| match failure {
            ReadFailure::Io(source) => BusError::SensorRead {
                id: id.clone(),
                path: path.clone(),
                source,
            },
            ReadFailure::Elapsed => BusError::Timeout { path: path.clone() },
        })?;

    let temperature_celsius = parse_temperature(id, &content)?;

    Ok(SensorReading {
        sensor_id: id.clone(),
        temperature_celsius,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    fn deadline() -> Instant {
        Instant::now() + Duration::from_secs(5)
    }

    #[test]
    fn test_parse_milli_degrees() {
        let id = SensorId::from("10-0001");
        let value = parse_temperature(&id, "23250\n").unwrap();
        assert!((value - 23.25).abs() < 1e-9);
    }

    #[test]
    fn test_parse_negative() {
        let id = SensorId::from("28-0000");
        let value = parse_temperature(&id, "-10625\n").unwrap();
        assert!((value + 10.625).abs() < 1e-9);
    }

    #[test]
    fn test_parse_strips_only_one_terminator() {
        let id = SensorId::from("28-0000");
        assert!(matches!(
            parse_temperature(&id, "23250\n\n"),
            Err(BusError::Parse { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let id = SensorId::from("10-0001");
        match parse_temperature(&id, "notanumber\n") {
            Err(BusError::Parse { id: failed, content, .. }) => {
                assert_eq!(failed, id);
                assert_eq!(content, "notanumber");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_empty() {
        let id = SensorId::from("10-0001");
        assert!(parse_temperature(&id, "").is_err());
        assert!(parse_temperature(&id, "\n").is_err());
    }

    #[tokio::test]
    async fn test_read_sensor() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("10-0002")).unwrap();
        std::fs::write(dir.path().join("10-0002").join(TEMPERATURE_FILE), "18900\n").unwrap();

        let reading = read_sensor(dir.path(), &SensorId::from("10-0002"), deadline())
            .await
            .unwrap();
        assert_eq!(reading.sensor_id.as_str(), "10-0002");
        assert!((reading.temperature_celsius - 18.9).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_read_missing_sensor() {
        let dir = tempfile::tempdir().unwrap();

        let result = read_sensor(dir.path(), &SensorId::from("28-gone"), deadline()).await;
        assert!(matches!(result, Err(BusError::SensorRead { .. })));
    }

    proptest! {
        #[test]
        fn prop_parse_divides_by_thousand(raw in -55_000i64..=125_000i64) {
            let id = SensorId::from("28-prop");
            let value = parse_temperature(&id, &format!("{}\n", raw)).unwrap();
            prop_assert!((value - raw as f64 / 1000.0).abs() < 1e-9);
        }
    }
}
