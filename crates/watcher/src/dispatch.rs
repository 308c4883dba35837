//! Routing change records to handlers and running their scripts
//!
//! For every change, each registered rule whose pattern matches the path
//! and whose action set accepts the change's action is run in turn:
//!
//! 1. log `File <ACTION>: <path>`
//! 2. skip silently if the rule fired for this path within the debounce window
//! 3. run the script with the changed path as its only argument and wait
//! 4. log the exit code and any captured stdout/stderr
//!
//! A script that cannot be launched is logged and otherwise ignored.

use crate::debounce::Debouncer;
use crate::diff::ChangeRecord;
use crate::sink::LogSink;
use pollwatch_core::HandlerRegistry;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Captured result of a script run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

/// Runs a handler script to completion
pub trait Launcher: Send {
    /// Run `script` with `arg` as its sole argument, waiting for it to exit
    fn launch(&self, script: &Path, arg: &Path) -> std::io::Result<ScriptOutput>;
}

impl<L: Launcher + ?Sized> Launcher for Box<L> {
    fn launch(&self, script: &Path, arg: &Path) -> std::io::Result<ScriptOutput> {
        (**self).launch(script, arg)
    }
}

/// Launches scripts as child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptLauncher;

impl Launcher for ScriptLauncher {
    fn launch(&self, script: &Path, arg: &Path) -> std::io::Result<ScriptOutput> {
        let output = Command::new(script)
            .arg(arg)
            .stdin(Stdio::null())
            .output()?;

        Ok(ScriptOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Routes changes to matching handlers
pub struct Dispatcher {
    registry: HandlerRegistry,
    root: PathBuf,
    launcher: Box<dyn Launcher>,
    sink: Arc<dyn LogSink>,
    debouncer: Debouncer,
}

impl Dispatcher {
    /// Create a dispatcher for changes under `root`
    pub fn new(registry: HandlerRegistry, root: impl Into<PathBuf>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            registry,
            root: root.into(),
            launcher: Box::new(ScriptLauncher),
            sink,
            debouncer: Debouncer::new(),
        }
    }

    /// Replace the script launcher
    pub fn with_launcher(mut self, launcher: impl Launcher + 'static) -> Self {
        self.launcher = Box::new(launcher);
        self
    }

    /// Handler rules this dispatcher routes to
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Dispatch every change of one poll tick, sequentially
    ///
    /// Returns the number of handler runs attempted.
    pub fn dispatch_all(&mut self, changes: &[ChangeRecord]) -> usize {
        self.debouncer.prune(Instant::now());
        changes.iter().map(|change| self.dispatch(change)).sum()
    }

    /// Dispatch one change
    ///
    /// Returns the number of handler runs attempted, including runs whose
    /// script failed to launch.
    pub fn dispatch(&mut self, change: &ChangeRecord) -> usize {
        let mut fired = 0;
        let mut matched = false;

        for (index, rule) in self.registry.resolve(&change.path) {
            if !rule.accepts(change.action) {
                continue;
            }
            matched = true;

            self.sink
                .write_line(&format!("File {}: {}", change.action, change.path));

            if !self.debouncer.try_fire(index, &change.rel_path, Instant::now()) {
                continue;
            }

            let arg = self.root.join(&change.rel_path);
            run_script(&*self.launcher, &*self.sink, rule.script(), &arg);
            fired += 1;
        }

        if !matched {
            debug!("No handler for {}", change);
        }

        fired
    }
}

/// Run one script and report its result to the sink
fn run_script(launcher: &dyn Launcher, sink: &dyn LogSink, script: &Path, arg: &Path) {
    match launcher.launch(script, arg) {
        Ok(output) => {
            match output.code {
                Some(code) => sink.write_line(&format!("finished with code {}", code)),
                None => sink.write_line("terminated by signal"),
            }
            if !output.stdout.is_empty() {
                sink.write_line(&format!("output: \n{}", output.stdout));
            }
            if !output.stderr.is_empty() {
                sink.write_line(&format!("error: \n{}", output.stderr));
            }
        }
        Err(e) => {
            warn!("Failed to launch {}: {}", script.display(), e);
            sink.write_line(&format!("failed to launch {}: {}", script.display(), e));
        }
    }
}
