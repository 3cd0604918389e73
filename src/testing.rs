//! Fake sysfs trees for tests.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A devices directory laid out like `/sys/bus/w1/devices`.
pub(crate) struct FakeBus {
    dir: TempDir,
}

impl FakeBus {
    /// Creates a bus whose listing file holds `listing` verbatim.
    pub(crate) fn with_listing(listing: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let master = dir.path().join("w1_bus_master1");
        fs::create_dir(&master).unwrap();
        fs::write(master.join("w1_master_slaves"), listing).unwrap();
        Self { dir }
    }

    /// Creates a bus with no listing file at all.
    pub(crate) fn without_listing() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Writes a sensor's `temperature` file.
    pub(crate) fn sensor(self, id: &str, content: &str) -> Self {
        let sensor = self.dir.path().join(id);
        fs::create_dir_all(&sensor).unwrap();
        fs::write(sensor.join("temperature"), content).unwrap();
        self
    }

    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }
}
