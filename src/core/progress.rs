use std::sync::Arc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Callback a compression collaborator invokes with a percentage (0-100).
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// Progress message type
#[derive(Debug, Deserialize, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ProgressType {
    Start,
    Progress,
    Complete,
    Error,
}

/// Progress of the in-flight compression attempt.
///
/// Purely observational: nothing in the workflow branches on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Progress type (start, progress, complete, error)
    pub progress_type: ProgressType,
    /// Progress percentage (0-100)
    pub progress_percentage: u8,
    /// Current status message
    pub status: String,
    /// Name of the file being compressed
    #[serde(default)]
    pub file_name: Option<String>,
}

impl Progress {
    /// Create a new Progress instance with basic information
    pub fn new(progress_type: ProgressType, progress_percentage: u8, status: &str) -> Self {
        Self {
            progress_type,
            progress_percentage: progress_percentage.min(100),
            status: status.to_string(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// Keeps the most recent [`Progress`] and hands out collaborator callbacks
/// that feed it.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    latest: Arc<Mutex<Option<Progress>>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, progress: Progress) {
        debug!(
            "Progress {:?}: {}% ({})",
            progress.progress_type, progress.progress_percentage, progress.status
        );
        *self.latest.lock() = Some(progress);
    }

    pub fn latest(&self) -> Option<Progress> {
        self.latest.lock().clone()
    }

    pub fn clear(&self) {
        *self.latest.lock() = None;
    }

    /// Builds a callback that records each percentage as a `Progress` update.
    pub fn callback(&self, file_name: &str) -> ProgressCallback {
        let tracker = self.clone();
        let file_name = file_name.to_string();
        Arc::new(move |percent: u8| {
            tracker.report(
                Progress::new(ProgressType::Progress, percent, "compressing")
                    .with_file_name(file_name.as_str()),
            );
        })
    }
}
