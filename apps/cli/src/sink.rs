//! # Receipt Sinks
//!
//! Where rendered receipts go, and how they are found again.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DocumentSink                                                           │
//! │  ├── store(bill, text)   write once per sale                            │
//! │  ├── fetch(bill)         Ok(None) when the document is gone             │
//! │  ├── remove(bill)        undo a store whose sale failed to commit       │
//! │  └── show(bill)          hand the document to a viewer, if any          │
//! │                                                                         │
//! │  DirectorySink   <bills_dir>/<bill_no>.txt, optional viewer command     │
//! │  MemorySink      HashMap, can be told to refuse writes                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::thread::JoinHandle;

use shopkeep_core::BillNumber;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot start viewer '{command}': {reason}")]
    Viewer { command: String, reason: String },

    #[error("Receipt storage unavailable: {0}")]
    Unavailable(String),
}

pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for receipt documents, keyed by bill number.
pub trait DocumentSink: Send + Sync {
    /// Stores the receipt; returns a human-readable location.
    fn store(&self, bill_no: BillNumber, text: &str) -> SinkResult<String>;

    fn fetch(&self, bill_no: BillNumber) -> SinkResult<Option<String>>;

    /// Removing a document that does not exist is not an error.
    fn remove(&self, bill_no: BillNumber) -> SinkResult<()>;

    /// Opens the document in a viewer. Default: nothing to open.
    fn show(&self, _bill_no: BillNumber) -> SinkResult<()> {
        Ok(())
    }
}

// =============================================================================
// Directory Sink
// =============================================================================

#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    viewer: Option<String>,
}

impl DirectorySink {
    /// Creates `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>, viewer: Option<String>) -> SinkResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| SinkError::Io {
            path: dir.clone(),
            source,
        })?;

        Ok(DirectorySink { dir, viewer })
    }

    pub fn path_for(&self, bill_no: BillNumber) -> PathBuf {
        self.dir.join(format!("{}.txt", bill_no))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Starts the viewer on the bill's receipt. The returned thread waits
    /// for the viewer to exit so it never lingers as a zombie.
    ///
    /// `Ok(None)` when no viewer is configured.
    pub fn open_viewer(
        &self,
        bill_no: BillNumber,
    ) -> SinkResult<Option<JoinHandle<Option<ExitStatus>>>> {
        let Some(viewer) = self.viewer.as_deref() else {
            return Ok(None);
        };

        let mut parts = viewer.split_whitespace();
        let Some(program) = parts.next() else {
            return Ok(None);
        };

        let path = self.path_for(bill_no);
        info!(viewer = %viewer, path = %path.display(), "Opening receipt");

        let mut child = Command::new(program)
            .args(parts)
            .arg(&path)
            .spawn()
            .map_err(|e| SinkError::Viewer {
                command: viewer.to_string(),
                reason: e.to_string(),
            })?;

        let reaper = std::thread::Builder::new()
            .name("receipt-viewer".into())
            .spawn(move || match child.wait() {
                Ok(status) => {
                    debug!(%status, "Receipt viewer exited");
                    Some(status)
                }
                Err(e) => {
                    warn!(error = %e, "Could not wait for receipt viewer");
                    None
                }
            })
            .map_err(|e| SinkError::Viewer {
                command: viewer.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Some(reaper))
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> SinkError + '_ {
    move |source| SinkError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl DocumentSink for DirectorySink {
    fn store(&self, bill_no: BillNumber, text: &str) -> SinkResult<String> {
        let path = self.path_for(bill_no);
        let partial = self.dir.join(format!("{}.txt.partial", bill_no));

        // Write then rename, so a crash never leaves a truncated receipt.
        std::fs::write(&partial, text).map_err(io_err(&partial))?;
        std::fs::rename(&partial, &path).map_err(io_err(&path))?;

        debug!(path = %path.display(), "Receipt written");
        Ok(path.display().to_string())
    }

    fn fetch(&self, bill_no: BillNumber) -> SinkResult<Option<String>> {
        let path = self.path_for(bill_no);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(&path)(e)),
        }
    }

    fn remove(&self, bill_no: BillNumber) -> SinkResult<()> {
        let path = self.path_for(bill_no);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(&path)(e)),
        }
    }

    fn show(&self, bill_no: BillNumber) -> SinkResult<()> {
        self.open_viewer(bill_no).map(|_reaper| ())
    }
}

// =============================================================================
// Memory Sink
// =============================================================================

/// Keeps receipts in memory. Used when no bills directory is wanted.
#[derive(Debug, Default)]
pub struct MemorySink {
    documents: Mutex<HashMap<BillNumber, String>>,
    refuse_writes: AtomicBool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, `store` fails with `Unavailable`.
    pub fn set_refuse_writes(&self, refuse: bool) {
        self.refuse_writes.store(refuse, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.documents.lock().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn documents(&self) -> SinkResult<std::sync::MutexGuard<'_, HashMap<BillNumber, String>>> {
        self.documents
            .lock()
            .map_err(|_| SinkError::Unavailable("receipt store lock poisoned".into()))
    }
}

impl DocumentSink for MemorySink {
    fn store(&self, bill_no: BillNumber, text: &str) -> SinkResult<String> {
        if self.refuse_writes.load(Ordering::SeqCst) {
            return Err(SinkError::Unavailable("writes refused".into()));
        }

        self.documents()?.insert(bill_no, text.to_string());
        Ok(format!("memory:{}", bill_no))
    }

    fn fetch(&self, bill_no: BillNumber) -> SinkResult<Option<String>> {
        Ok(self.documents()?.get(&bill_no).cloned())
    }

    fn remove(&self, bill_no: BillNumber) -> SinkResult<()> {
        self.documents()?.remove(&bill_no);
        Ok(())
    }
}
