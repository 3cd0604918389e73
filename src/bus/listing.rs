//! Bus master slave listing.

use super::file::{read_to_string_until, ReadFailure};
use super::{BusError, SensorId};
use std::collections::HashSet;
use std::path::Path;
use tokio::time::Instant;

/// Listing file relative to the devices directory.
pub const LISTING_FILE: &str = "w1_bus_master1/w1_master_slaves";

/// Splits listing content into sensor IDs.
///
/// One ID per line, in listing order. Blank lines (including the empty
/// entry after the trailing newline) are skipped and a repeated ID is only
/// returned once.
pub fn parse_listing(content: &str) -> Vec<SensorId> {
    let mut seen = HashSet::new();

    content
        .lines()
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .map(SensorId::from)
        .collect()
}

/// Reads `<base>/w1_bus_master1/w1_master_slaves` and returns the listed IDs.
pub async fn read_listing(base: &Path, deadline: Instant) -> Result<Vec<SensorId>, BusError> {
    let path = base.join(LISTING_FILE);

    let content = read_to_string_until(&path, deadline)
        .await
        .map_err(|failure| match failure {
            ReadFailure::Io(source) => BusError::DirectoryRead {
                path: path.clone(),
                source,
            },
            ReadFailure::Elapsed => BusError::Timeout { path: path.clone() },
        })?;

    Ok(parse_listing(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    fn ids(listing: &[SensorId]) -> Vec<&str> {
        listing.iter().map(SensorId::as_str).collect()
    }

    #[test]
    fn test_trailing_newline_discarded() {
        let listing = parse_listing("28-0316a2795bff\n28-0416a27c91ff\n");
        assert_eq!(ids(&listing), vec!["28-0316a2795bff", "28-0416a27c91ff"]);
    }

    #[test]
    fn test_trailing_blank_line_discarded() {
        let listing = parse_listing("10-0001\n10-0002\n\n");
        assert_eq!(ids(&listing), vec!["10-0001", "10-0002"]);
    }

    #[test]
    fn test_last_entry_without_terminator_kept() {
        let listing = parse_listing("10-0001\n10-0002");
        assert_eq!(ids(&listing), vec!["10-0001", "10-0002"]);
    }

    #[test]
    fn test_crlf_and_duplicates() {
        let listing = parse_listing("10-0001\r\n10-0002\r\n10-0001\r\n");
        assert_eq!(ids(&listing), vec!["10-0001", "10-0002"]);
    }

    #[test]
    fn test_empty_listing() {
        assert!(parse_listing("").is_empty());
        assert!(parse_listing("\n").is_empty());
    }

    #[tokio::test]
    async fn test_read_listing_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);

        let result = read_listing(dir.path(), deadline).await;
        assert!(matches!(result, Err(BusError::DirectoryRead { .. })));
    }

    #[tokio::test]
    async fn test_read_listing() {
        let dir = tempfile::tempdir().unwrap();
        let master = dir.path().join("w1_bus_master1");
        std::fs::create_dir(&master).unwrap();
        std::fs::write(master.join("w1_master_slaves"), "28-aa\n28-bb\n").unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let listing = read_listing(dir.path(), deadline).await.unwrap();
        assert_eq!(ids(&listing), vec!["28-aa", "28-bb"]);
    }

    proptest! {
        #[test]
        fn prop_no_empty_ids(content in "[0-9a-f\\-\n]{0,64}") {
            for id in parse_listing(&content) {
                prop_assert!(!id.as_str().is_empty());
            }
        }
    }
}
