//! Image ingestion
//!
//! Turns a user-chosen file into a [`DataUrl`]. Reads run on a background thread and
//! are polled by the single-threaded owner. Only the most recently started read can
//! ever deliver a result.

mod payload;

pub use payload::{detect_mime, encode_bytes, DataUrl, ImageSource, FALLBACK_MIME};

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while ingesting an image file
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read image {}: {source}", path.display())]
    ImageReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image reader thread terminated unexpectedly")]
    WorkerLost,
}

/// Read a file and encode it as a data URL
pub fn encode_file(path: &Path) -> Result<DataUrl, IngestError> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::ImageReadFailure {
        path: path.to_path_buf(),
        source,
    })?;

    let mime = detect_mime(path, &bytes);
    log::debug!("Encoded {} ({} bytes, {})", path.display(), bytes.len(), mime);
    Ok(encode_bytes(&bytes, mime))
}

/// Identifies one ingestion request. Later requests have larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IngestTicket(u64);

/// A finished ingestion
#[derive(Debug)]
pub struct IngestOutcome {
    pub ticket: IngestTicket,
    pub result: Result<DataUrl, IngestError>,
}

/// Background image reader that only ever reports the latest request
#[derive(Default)]
pub struct Ingestor {
    /// Sequence number of the last started request
    sequence: u64,
    /// Receiver for the latest request; older receivers are dropped
    pending: Option<(IngestTicket, Receiver<Result<DataUrl, IngestError>>)>,
}

impl Ingestor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start reading `path` in the background
    pub fn start(&mut self, path: PathBuf) -> IngestTicket {
        log::info!("Reading image: {}", path.display());
        self.start_with(move || encode_file(&path))
    }

    /// Start an arbitrary ingestion job in the background.
    ///
    /// Any request still in flight is superseded: its result is discarded when it arrives.
    pub fn start_with<F>(&mut self, job: F) -> IngestTicket
    where
        F: FnOnce() -> Result<DataUrl, IngestError> + Send + 'static,
    {
        self.sequence += 1;
        let ticket = IngestTicket(self.sequence);

        if let Some((stale, _)) = self.pending.take() {
            log::debug!("Ingestion {:?} superseded by {:?}", stale, ticket);
        }

        let (tx, rx) = mpsc::channel();
        self.pending = Some((ticket, rx));

        thread::spawn(move || {
            // The receiver is gone if a newer request replaced this one
            let _ = tx.send(job());
        });

        ticket
    }

    /// Forget the request in flight, if any. Its result will never be reported.
    pub fn cancel(&mut self) {
        if let Some((ticket, _)) = self.pending.take() {
            log::debug!("Ingestion {:?} cancelled", ticket);
        }
    }

    /// Is a request still in flight?
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Ticket of the request that is allowed to deliver a result
    pub fn latest(&self) -> Option<IngestTicket> {
        self.pending.as_ref().map(|(ticket, _)| *ticket)
    }

    /// Check for a finished result without blocking.
    ///
    /// Each request yields at most one outcome.
    pub fn poll(&mut self) -> Option<IngestOutcome> {
        let (ticket, receiver) = self.pending.as_ref()?;
        let ticket = *ticket;

        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(IngestError::WorkerLost),
        };

        self.pending = None;
        Some(IngestOutcome { ticket, result })
    }

    /// Block until the latest request finishes or `timeout` elapses
    pub fn wait(&mut self, timeout: Duration) -> Option<IngestOutcome> {
        let (ticket, receiver) = self.pending.as_ref()?;
        let ticket = *ticket;

        let result = match receiver.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => return None,
            Err(RecvTimeoutError::Disconnected) => Err(IngestError::WorkerLost),
        };

        self.pending = None;
        Some(IngestOutcome { ticket, result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::mpsc::channel;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_encode_file() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"fake png body").unwrap();

        let url = encode_file(file.path()).unwrap();
        assert_eq!(url.mime(), "image/png");
        assert_eq!(url.to_bytes().unwrap(), b"fake png body");
    }

    #[test]
    fn test_encode_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.jpg");

        match encode_file(&missing) {
            Err(IngestError::ImageReadFailure { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected read failure, got {:?}", other),
        }
    }

    #[test]
    fn test_poll_delivers_once() {
        let mut ingestor = Ingestor::new();
        assert!(ingestor.poll().is_none());

        let ticket = ingestor.start_with(|| Ok(encode_bytes(b"a", "image/png")));
        let outcome = ingestor.wait(TIMEOUT).expect("ingestion should finish");

        assert_eq!(outcome.ticket, ticket);
        assert!(outcome.result.is_ok());
        assert!(!ingestor.is_pending());
        assert!(ingestor.poll().is_none());
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut ingestor = Ingestor::new();
        let (release_first, gate) = channel::<()>();

        let first = ingestor.start_with(move || {
            let _ = gate.recv();
            Ok(encode_bytes(b"old", "image/png"))
        });
        let second = ingestor.start_with(|| Ok(encode_bytes(b"new", "image/png")));
        assert!(second > first);
        assert_eq!(ingestor.latest(), Some(second));

        let outcome = ingestor.wait(TIMEOUT).expect("second ingestion should finish");
        release_first.send(()).unwrap();

        assert_eq!(outcome.ticket, second);
        assert_eq!(outcome.result.unwrap().to_bytes().unwrap(), b"new");
        assert!(ingestor.wait(Duration::from_millis(100)).is_none());
    }

    #[test]
    fn test_worker_panic_reports_lost() {
        let mut ingestor = Ingestor::new();
        ingestor.start_with(|| panic!("reader crashed"));

        let outcome = ingestor.wait(TIMEOUT).expect("disconnect should be reported");
        assert!(matches!(outcome.result, Err(IngestError::WorkerLost)));
    }
}
