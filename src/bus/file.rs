//! Deadline-bounded file reads.

use std::future::Future;
use std::io;
use std::path::Path;
use tokio::time::{timeout_at, Instant};

/// Outcome of a bounded read that did not produce content.
#[derive(Debug)]
pub(crate) enum ReadFailure {
    /// The read itself failed.
    Io(io::Error),
    /// The deadline passed first.
    Elapsed,
}

/// Reads `path` to a string, giving up at `deadline`.
///
/// A read stalled in the kernel (a hung bus, a wedged slave) keeps its
/// blocking thread, but the caller is released at the deadline.
pub(crate) async fn read_to_string_until(
    path: &Path,
    deadline: Instant,
) -> Result<String, ReadFailure> {
    read_to_string_by(deadline, tokio::fs::read_to_string(path.to_path_buf())).await
}

/// Drives a read future to completion unless `deadline` passes first.
pub(crate) async fn read_to_string_by<F>(deadline: Instant, read: F) -> Result<String, ReadFailure>
where
    F: Future<Output = io::Result<String>>,
{
    match timeout_at(deadline, read).await {
        Ok(Ok(content)) => Ok(content),
        Ok(Err(e)) => Err(ReadFailure::Io(e)),
        Err(_) => Err(ReadFailure::Elapsed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_read_within_deadline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("value");
        std::fs::write(&path, "42\n").unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let content = read_to_string_until(&path, deadline).await.unwrap();
        assert_eq!(content, "42\n");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);

        let result = read_to_string_until(&dir.path().join("absent"), deadline).await;
        assert!(matches!(result, Err(ReadFailure::Io(_))));
    }

    #[tokio::test]
    async fn test_stalled_read_hits_deadline() {
        let deadline = Instant::now() + Duration::from_millis(20);
        let stalled = std::future::pending::<io::Result<String>>();

        let result = read_to_string_by(deadline, stalled).await;
        assert!(matches!(result, Err(ReadFailure::Elapsed)));
    }
}
