//! Progress reporting and cooperative cancellation.

use tokio_util::sync::CancellationToken;

/// Receives progress updates from long-running analyses.
///
/// Cancellation is polled between top-level units of work (components,
/// resolution groups); work already collected is kept.
pub trait ProgressMonitor {
    /// Start a task with the given amount of work.
    fn begin_task(&mut self, _name: &str, _total_work: usize) {}

    /// Name the unit of work currently being processed.
    fn sub_task(&mut self, _name: &str) {}

    /// Record completed work.
    fn worked(&mut self, _work: usize) {}

    /// Whether the caller asked to stop.
    fn is_cancelled(&self) -> bool;

    /// Mark the task as finished.
    fn done(&mut self) {}
}

/// A monitor that ignores progress and is never cancelled.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullProgress;

impl ProgressMonitor for NullProgress {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A monitor backed by a [`CancellationToken`] that tracks completed work.
#[derive(Clone, Debug, Default)]
pub struct CancellableProgress {
    cancel: CancellationToken,
    task: Option<String>,
    current: Option<String>,
    total: usize,
    completed: usize,
}

impl CancellableProgress {
    /// Create a monitor observing the given token.
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            ..Self::default()
        }
    }

    /// The token observed by this monitor.
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Completed work units.
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Total work units announced by `begin_task`.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Name of the current sub task, if any.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

impl ProgressMonitor for CancellableProgress {
    fn begin_task(&mut self, name: &str, total_work: usize) {
        self.task = Some(name.to_string());
        self.total = total_work;
        self.completed = 0;
    }

    fn sub_task(&mut self, name: &str) {
        tracing::trace!(task = ?self.task, "{}", name);
        self.current = Some(name.to_string());
    }

    fn worked(&mut self, work: usize) {
        self.completed += work;
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn done(&mut self) {
        self.current = None;
        self.completed = self.total.max(self.completed);
    }
}

/// A child monitor for nested work on a monitor owned by the caller.
///
/// Task boundaries and work units stay local, so the parent's counts keep
/// tracking its own units. Task and sub task names are forwarded to the
/// parent as sub tasks.
pub struct SubProgress<'p> {
    parent: &'p mut dyn ProgressMonitor,
    interruptible: bool,
    total: usize,
    completed: usize,
}

impl<'p> SubProgress<'p> {
    /// A child that reports the parent's cancellation.
    pub fn new(parent: &'p mut dyn ProgressMonitor) -> Self {
        Self {
            parent,
            interruptible: true,
            total: 0,
            completed: 0,
        }
    }

    /// A child that runs to completion whatever the parent's state.
    pub fn uninterruptible(parent: &'p mut dyn ProgressMonitor) -> Self {
        Self {
            interruptible: false,
            ..Self::new(parent)
        }
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

impl ProgressMonitor for SubProgress<'_> {
    fn begin_task(&mut self, name: &str, total_work: usize) {
        self.total = total_work;
        self.completed = 0;
        self.parent.sub_task(name);
    }

    fn sub_task(&mut self, name: &str) {
        self.parent.sub_task(name);
    }

    fn worked(&mut self, work: usize) {
        self.completed += work;
    }

    fn is_cancelled(&self) -> bool {
        self.interruptible && self.parent.is_cancelled()
    }

    fn done(&mut self) {
        self.completed = self.total.max(self.completed);
    }
}
