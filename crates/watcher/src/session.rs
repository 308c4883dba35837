//! Watch session: baseline snapshot, polling thread and its lifecycle
//!
//! ```text
//! Stopped --start()--> Running --stop()--> Stopped
//! ```
//!
//! `start()` captures the baseline synchronously and spawns one polling
//! thread. Each tick sleeps for the poll interval, captures a new
//! snapshot, diffs it against the baseline, replaces the baseline and
//! dispatches the changes one after another. `stop()` clears the run flag,
//! wakes the sleeping thread and joins it; a script already running is
//! allowed to finish first.

use crate::diff::diff;
use crate::dispatch::{Dispatcher, Launcher};
use crate::error::WatchError;
use crate::exclude::ExcludeRules;
use crate::sink::{LogSink, StdoutSink};
use crate::snapshot::Snapshot;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use pollwatch_core::HandlerRegistry;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fixed delay between snapshots
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Builder for [`Watcher`]
pub struct WatcherBuilder {
    root: PathBuf,
    recursive: bool,
    sink: Arc<dyn LogSink>,
    launcher: Option<Box<dyn Launcher>>,
    exclude: Vec<String>,
    poll_interval: Duration,
}

impl WatcherBuilder {
    /// Descend into subdirectories (default: off)
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Send operator log lines to `sink` instead of stdout
    pub fn sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Run handler scripts through `launcher`
    pub fn launcher(mut self, launcher: impl Launcher + 'static) -> Self {
        self.launcher = Some(Box::new(launcher));
        self
    }

    /// Gitignore-style patterns to leave out of snapshots
    pub fn exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Override the delay between snapshots (default: [`POLL_INTERVAL`])
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Build a stopped watcher routing changes to `registry`
    pub fn build(self, registry: HandlerRegistry) -> Result<Watcher, WatchError> {
        let exclude = ExcludeRules::new(&self.root, self.exclude.as_slice())?;

        let mut dispatcher = Dispatcher::new(registry, self.root.clone(), Arc::clone(&self.sink));
        if let Some(launcher) = self.launcher {
            dispatcher = dispatcher.with_launcher(launcher);
        }

        Ok(Watcher {
            root: self.root,
            recursive: self.recursive,
            exclude,
            poll_interval: self.poll_interval,
            sink: self.sink,
            dispatcher: Arc::new(Mutex::new(dispatcher)),
            running: None,
        })
    }
}

/// Polling directory watcher
pub struct Watcher {
    root: PathBuf,
    recursive: bool,
    exclude: ExcludeRules,
    poll_interval: Duration,
    sink: Arc<dyn LogSink>,
    dispatcher: Arc<Mutex<Dispatcher>>,
    running: Option<RunningLoop>,
}

/// Handles to a live polling thread
struct RunningLoop {
    run_flag: Arc<AtomicBool>,
    wake_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl Watcher {
    /// Start configuring a watcher for `root`
    pub fn builder(root: impl Into<PathBuf>) -> WatcherBuilder {
        WatcherBuilder {
            root: root.into(),
            recursive: false,
            sink: Arc::new(StdoutSink),
            launcher: None,
            exclude: Vec::new(),
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Watched root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether subdirectories are watched
    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// Whether the polling thread is live
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Capture the baseline and launch the polling thread
    ///
    /// Fails without side effects if already running or if the baseline
    /// snapshot cannot be taken.
    pub fn start(&mut self) -> Result<(), WatchError> {
        if self.running.is_some() {
            return Err(WatchError::AlreadyRunning);
        }

        let baseline = Snapshot::capture_with(&self.root, self.recursive, &self.exclude)?;
        info!(
            "Watching {} ({} entries, recursive: {})",
            self.root.display(),
            baseline.len(),
            self.recursive
        );

        let run_flag = Arc::new(AtomicBool::new(true));
        let (wake_tx, wake_rx) = crossbeam_channel::bounded(1);

        let poll_loop = PollLoop {
            root: self.root.clone(),
            recursive: self.recursive,
            exclude: self.exclude.clone(),
            interval: self.poll_interval,
            baseline,
            dispatcher: Arc::clone(&self.dispatcher),
            sink: Arc::clone(&self.sink),
            run_flag: Arc::clone(&run_flag),
            wake_rx,
        };

        let handle = std::thread::Builder::new()
            .name("pollwatch-poll".to_string())
            .spawn(move || poll_loop.run())
            .map_err(WatchError::Spawn)?;

        self.running = Some(RunningLoop {
            run_flag,
            wake_tx,
            handle,
        });
        Ok(())
    }

    /// Stop the polling thread and wait for it to exit
    ///
    /// A script that is already running is not interrupted; this returns
    /// once it and the rest of its dispatch step have finished.
    pub fn stop(&mut self) -> Result<(), WatchError> {
        let running = self.running.take().ok_or(WatchError::NotRunning)?;

        running.run_flag.store(false, Ordering::Release);
        // Disconnecting the channel wakes a sleeping loop
        drop(running.wake_tx);

        running.handle.join().map_err(|_| WatchError::WorkerPanicked)?;
        info!("Stopped watching {}", self.root.display());
        Ok(())
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        if self.running.is_some() {
            if let Err(e) = self.stop() {
                warn!("Error stopping watcher on drop: {}", e);
            }
        }
    }
}

/// State owned by the polling thread
struct PollLoop {
    root: PathBuf,
    recursive: bool,
    exclude: ExcludeRules,
    interval: Duration,
    baseline: Snapshot,
    dispatcher: Arc<Mutex<Dispatcher>>,
    sink: Arc<dyn LogSink>,
    run_flag: Arc<AtomicBool>,
    wake_rx: Receiver<()>,
}

impl PollLoop {
    fn run(mut self) {
        while self.run_flag.load(Ordering::Acquire) {
            match self.wake_rx.recv_timeout(self.interval) {
                Err(RecvTimeoutError::Timeout) => {}
                // Woken or disconnected: stop() was called
                _ => break,
            }
            if !self.run_flag.load(Ordering::Acquire) {
                break;
            }
            self.tick();
        }
        debug!("Polling loop for {} exited", self.root.display());
    }

    fn tick(&mut self) {
        let current = match Snapshot::capture_with(&self.root, self.recursive, &self.exclude) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                // Baseline stays as-is; the next tick diffs against it
                warn!("Snapshot failed, skipping tick: {}", e);
                self.sink
                    .write_line(&format!("snapshot failed, skipping tick: {}", e));
                return;
            }
        };

        let changes = diff(&self.baseline, &current);
        self.baseline = current;

        if changes.is_empty() {
            return;
        }

        info!("Detected {} changes under {}", changes.len(), self.root.display());
        self.sink
            .write_line(&format!("changes detected ({})", changes.len()));

        let fired = self.dispatcher.lock().dispatch_all(&changes);
        debug!("Tick dispatched {} handler runs", fired);
    }
}
