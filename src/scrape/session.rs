//! Request-scoped scrape state.

use super::TemperatureSample;
use crate::bus::SensorId;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

/// Producer side of a session's result queue.
///
/// Cloned into every worker. Sends never block.
#[derive(Debug, Clone)]
pub struct ReadingSink {
    tx: UnboundedSender<TemperatureSample>,
}

impl ReadingSink {
    /// Enqueues a sample for the owning session.
    pub fn send(&self, sample: TemperatureSample) {
        if let Err(e) = self.tx.send(sample) {
            tracing::debug!(sensor = %e.0.sensor_id, "Scrape session gone, sample dropped");
        }
    }
}

/// State of exactly one scrape.
///
/// Created per request and dropped once the response is rendered. Samples
/// become visible through [`samples`](Self::samples) only after the
/// scraper has joined every worker and called `finish`.
#[derive(Debug)]
pub struct ScrapeSession {
    sensors: Vec<SensorId>,
    tx: UnboundedSender<TemperatureSample>,
    rx: UnboundedReceiver<TemperatureSample>,
    samples: Vec<TemperatureSample>,
    complete: bool,
}

impl ScrapeSession {
    /// Creates an empty session.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            sensors: Vec::new(),
            tx,
            rx,
            samples: Vec::new(),
            complete: false,
        }
    }

    /// Returns a producer handle for a worker.
    pub fn sink(&self) -> ReadingSink {
        ReadingSink {
            tx: self.tx.clone(),
        }
    }

    pub(crate) fn set_sensors(&mut self, sensors: Vec<SensorId>) {
        self.sensors = sensors;
    }

    /// Sensors discovered on the bus during this scrape.
    pub fn sensors(&self) -> &[SensorId] {
        &self.sensors
    }

    /// Drains the queue and marks the result set final.
    ///
    /// Must only be called once no worker can still send.
    pub(crate) fn finish(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(sample) => self.samples.push(sample),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        self.complete = true;
    }

    /// Whether the scrape has finished.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Final samples, in no particular order. Empty until complete.
    pub fn samples(&self) -> &[TemperatureSample] {
        &self.samples
    }

    /// Consumes the session, yielding its samples.
    pub fn into_samples(self) -> Vec<TemperatureSample> {
        self.samples
    }
}

impl Default for ScrapeSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str, value: f64) -> TemperatureSample {
        TemperatureSample {
            sensor_id: id.to_string(),
            sensor_name: id.to_string(),
            value,
        }
    }

    #[test]
    fn test_samples_hidden_until_finished() {
        let mut session = ScrapeSession::new();
        session.sink().send(sample("28-aa", 21.0));

        assert!(!session.is_complete());
        assert!(session.samples().is_empty());

        session.finish();
        assert!(session.is_complete());
        assert_eq!(session.samples(), &[sample("28-aa", 21.0)]);
    }

    #[test]
    fn test_sessions_do_not_share_sinks() {
        let mut first = ScrapeSession::new();
        let mut second = ScrapeSession::new();

        first.sink().send(sample("28-aa", 1.0));
        second.sink().send(sample("28-bb", 2.0));
        second.sink().send(sample("28-cc", 3.0));

        first.finish();
        second.finish();
        assert_eq!(first.into_samples().len(), 1);
        assert_eq!(second.into_samples().len(), 2);
    }
}
