//! Background scans.
//!
//! [`ScanHandle::spawn`] runs a [`DuplicateFinder`] on its own thread and
//! hands back a handle the caller can poll without blocking. Live counters
//! are kept in atomics and read through [`ScanHandle::progress`]; the final
//! outcome arrives over a channel exactly once.
//!
//! ```rust,no_run
//! use dupscan::duplicates::FinderConfig;
//! use dupscan::task::ScanHandle;
//! use std::time::Duration;
//!
//! let mut handle = ScanHandle::spawn("/data".into(), FinderConfig::default());
//! while !handle.is_finished() {
//!     let p = handle.progress();
//!     println!("{} files hashed", p.files_hashed);
//!     std::thread::sleep(Duration::from_millis(100));
//! }
//! let result = handle.wait().unwrap();
//! println!("{} duplicate groups", result.groups.len());
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::duplicates::{DuplicateFinder, FinderConfig, FinderError, ScanResult};
use crate::progress::ProgressCallback;

/// Point-in-time view of a running scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Files yielded by the walk so far
    pub files_seen: usize,
    /// Files hashed successfully so far
    pub files_hashed: usize,
    /// Bytes hashed so far
    pub bytes_hashed: u64,
}

/// Atomic counters fed by the finder, forwarding to an optional inner callback.
struct Counters {
    files_seen: AtomicUsize,
    files_hashed: AtomicUsize,
    bytes_hashed: AtomicU64,
    inner: Option<Arc<dyn ProgressCallback>>,
}

impl Counters {
    fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            files_seen: self.files_seen.load(Ordering::Relaxed),
            files_hashed: self.files_hashed.load(Ordering::Relaxed),
            bytes_hashed: self.bytes_hashed.load(Ordering::Relaxed),
        }
    }
}

impl ProgressCallback for Counters {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if let Some(ref inner) = self.inner {
            inner.on_phase_start(phase, total);
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        self.files_seen.store(current, Ordering::Relaxed);
        if let Some(ref inner) = self.inner {
            inner.on_progress(current, path);
        }
    }

    fn on_item_completed(&self, bytes: u64) {
        self.files_hashed.fetch_add(1, Ordering::Relaxed);
        self.bytes_hashed.fetch_add(bytes, Ordering::Relaxed);
        if let Some(ref inner) = self.inner {
            inner.on_item_completed(bytes);
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if let Some(ref inner) = self.inner {
            inner.on_phase_end(phase);
        }
    }

    fn on_message(&self, message: &str) {
        if let Some(ref inner) = self.inner {
            inner.on_message(message);
        }
    }
}

/// Handle to a scan running on a background thread.
pub struct ScanHandle {
    receiver: Receiver<Result<ScanResult, FinderError>>,
    counters: Arc<Counters>,
    cancel: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    done: Option<Result<ScanResult, FinderError>>,
}

impl ScanHandle {
    /// Start scanning `root` on a new thread.
    ///
    /// The config's shutdown flag, if any, doubles as the cancel flag so a
    /// Ctrl+C handler and [`cancel`](Self::cancel) stop the same scan. Its
    /// progress callback keeps receiving events.
    #[must_use]
    pub fn spawn(root: PathBuf, config: FinderConfig) -> Self {
        let cancel = config
            .shutdown_flag
            .clone()
            .unwrap_or_else(|| Arc::new(AtomicBool::new(false)));
        let counters = Arc::new(Counters {
            files_seen: AtomicUsize::new(0),
            files_hashed: AtomicUsize::new(0),
            bytes_hashed: AtomicU64::new(0),
            inner: config.progress_callback.clone(),
        });

        let config = config
            .with_shutdown_flag(cancel.clone())
            .with_progress_callback(counters.clone());

        let (tx, rx) = mpsc::channel();
        let thread = std::thread::spawn(move || {
            log::debug!("Background scan of {} started", root.display());
            let outcome = DuplicateFinder::new(config).find_duplicates(&root);
            // The receiver is gone only if the handle was dropped.
            let _ = tx.send(outcome);
        });

        Self {
            receiver: rx,
            counters,
            cancel,
            thread: Some(thread),
            done: None,
        }
    }

    /// Current counters. Never blocks.
    #[must_use]
    pub fn progress(&self) -> ProgressSnapshot {
        self.counters.snapshot()
    }

    /// Ask the scan to stop at the next file or read chunk.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Whether the outcome is available.
    pub fn is_finished(&mut self) -> bool {
        self.poll();
        self.done.is_some()
    }

    /// Take the outcome if the scan has finished, without blocking.
    ///
    /// Returns `None` while running, and after the outcome was taken once.
    pub fn try_result(&mut self) -> Option<Result<ScanResult, FinderError>> {
        self.poll();
        let outcome = self.done.take();
        if outcome.is_some() {
            self.join();
        }
        outcome
    }

    /// Block until the scan finishes and return its outcome.
    ///
    /// # Errors
    ///
    /// Returns the scan's [`FinderError`]. A worker that died without
    /// reporting yields [`FinderError::Interrupted`].
    pub fn wait(mut self) -> Result<ScanResult, FinderError> {
        let outcome = match self.done.take() {
            Some(outcome) => outcome,
            None => self.receiver.recv().unwrap_or_else(|_| {
                log::error!("Scan thread exited without a result");
                Err(FinderError::Interrupted)
            }),
        };
        self.join();
        outcome
    }

    fn poll(&mut self) {
        if self.done.is_some() {
            return;
        }
        match self.receiver.try_recv() {
            Ok(outcome) => self.done = Some(outcome),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                if self.thread.is_some() {
                    log::error!("Scan thread exited without a result");
                    self.done = Some(Err(FinderError::Interrupted));
                }
            }
        }
    }

    fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Scan thread panicked");
            }
        }
    }
}
