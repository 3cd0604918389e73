//! Conversion of readings into gauge observations.

use super::ReadingSink;
use crate::bus::SensorReading;

/// One gauge observation for the temperature metric.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureSample {
    /// Value of the `sensor_id` label.
    pub sensor_id: String,
    /// Value of the `sensor_name` label.
    pub sensor_name: String,
    /// Temperature in degrees Celsius.
    pub value: f64,
}

impl From<SensorReading> for TemperatureSample {
    fn from(reading: SensorReading) -> Self {
        // The bus has no naming source, so the name is the ID.
        let sensor_id = reading.sensor_id.as_str().to_string();
        Self {
            sensor_name: sensor_id.clone(),
            sensor_id,
            value: reading.temperature_celsius,
        }
    }
}

/// Publishes a reading to the session sink.
///
/// Safe to call from any number of workers at once.
pub fn emit(sink: &ReadingSink, reading: SensorReading) {
    let sample = TemperatureSample::from(reading);
    tracing::trace!(sensor = %sample.sensor_id, value = sample.value, "Emitting sample");
    sink.send(sample);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::SensorId;
    use crate::scrape::ScrapeSession;

    #[test]
    fn test_labels_duplicate_sensor_id() {
        let sample = TemperatureSample::from(SensorReading {
            sensor_id: SensorId::from("10-0001"),
            temperature_celsius: 23.25,
        });

        assert_eq!(sample.sensor_id, "10-0001");
        assert_eq!(sample.sensor_name, "10-0001");
        assert_eq!(sample.value, 23.25);
    }

    #[test]
    fn test_emit_reaches_session() {
        let mut session = ScrapeSession::new();
        emit(
            &session.sink(),
            SensorReading {
                sensor_id: SensorId::from("10-0002"),
                temperature_celsius: 18.9,
            },
        );
        session.finish();

        assert_eq!(session.samples().len(), 1);
        assert_eq!(session.samples()[0].sensor_id, "10-0002");
    }
}
