//! Progress listener interface
//!
//! Fire-and-forget notifications raised while a job is turned into G-code.
//! Implementations must return quickly; the driver never waits on them.

/// Listener trait for job progress
///
/// Implement this trait to receive notifications while a job is processed.
pub trait ProgressListener {
    /// Called when overall progress changes (0..=100)
    fn progress_changed(&self, _percent: u8) {}

    /// Called when the driver starts a new task
    fn task_changed(&self, _label: &str) {}
}

/// A listener that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressListener for NoProgress {}
