//! Workflow controller: drives a [`Session`] through upload, configure and done.

use std::sync::atomic::{AtomicBool, Ordering};
use parking_lot::Mutex;
use tracing::{debug, error, warn};
use crate::core::{
    CompressionParams, CompressionSummary, ImagePayload, Phase, Preset, PreviewRegistry,
    Progress, ProgressTracker, ProgressType, QualityPercent, Session, SessionSnapshot,
};
use crate::processing::{CompressionOptions, Compressor};

/// What a compress request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressOutcome {
    /// The session moved to `Done`
    Compressed(CompressionSummary),
    /// The collaborator failed; the session is back in `Upload`
    Failed,
    /// Nothing happened: another attempt was in flight or there was no file
    Skipped,
}

/// Owns one session and the collaborator that compresses for it.
///
/// Every method takes `&self`, so a controller can be shared with a
/// long-running compress call still in flight; the `is_compressing` flag keeps
/// a second attempt from starting meanwhile.
pub struct WorkflowController<C> {
    compressor: C,
    pub(super) session: Mutex<Session>,
    previews: PreviewRegistry,
    progress: ProgressTracker,
    is_compressing: AtomicBool,
}

/// Clears the in-flight flag when the compress call finishes or is dropped.
struct CompressingGuard<'a>(&'a AtomicBool);

impl Drop for CompressingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<C: Compressor> WorkflowController<C> {
    pub fn new(compressor: C) -> Self {
        Self::with_previews(compressor, PreviewRegistry::new())
    }

    /// Creates a controller issuing previews from an existing registry.
    pub fn with_previews(compressor: C, previews: PreviewRegistry) -> Self {
        Self {
            compressor,
            session: Mutex::new(Session::new()),
            previews,
            progress: ProgressTracker::new(),
            is_compressing: AtomicBool::new(false),
        }
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    pub fn compressor(&self) -> &C {
        &self.compressor
    }

    pub fn phase(&self) -> Phase {
        self.session.lock().phase()
    }

    /// True only while a compress call is awaiting the collaborator.
    pub fn is_compressing(&self) -> bool {
        self.is_compressing.load(Ordering::SeqCst)
    }

    /// Latest progress reported for the current or last attempt.
    pub fn last_progress(&self) -> Option<Progress> {
        self.progress.latest()
    }

    /// Parameters the next compress call would use.
    pub fn params(&self) -> CompressionParams {
        self.session.lock().params()
    }

    /// Runs `f` against the session under the lock.
    pub fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&self.session.lock())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let progress = self
            .progress
            .latest()
            .filter(|_| self.is_compressing())
            .map(|p| p.progress_percentage);
        self.session.lock().snapshot(self.is_compressing(), progress)
    }

    /// `Upload → Configure` for an accepted file; a rejected one stays in
    /// `Upload` with the validation message set.
    pub fn select_file(&self, file: ImagePayload) -> Phase {
        let mut session = self.session.lock();
        if session.phase() != Phase::Upload {
            warn!("Ignoring file selection in the {:?} phase", session.phase());
            return session.phase();
        }

        match session.select_file(file, &self.previews) {
            Ok(phase) => {
                debug!("Upload -> Configure");
                phase
            }
            Err(e) => {
                warn!("File rejected: {}", e);
                session.phase()
            }
        }
    }

    /// Changes the preset. Only applies in `Configure`.
    pub fn set_preset(&self, preset: Preset) -> bool {
        let mut session = self.session.lock();
        if session.phase() != Phase::Configure {
            warn!("Ignoring preset change in the {:?} phase", session.phase());
            return false;
        }
        session.set_preset(preset);
        debug!("Preset -> {} ({:?})", preset, session.params());
        true
    }

    /// [`set_preset`](Self::set_preset) by name; unknown names select medium.
    pub fn set_preset_name(&self, name: &str) -> bool {
        self.set_preset(Preset::from_name(name))
    }

    /// Changes the custom quality, clamped to `1..=100`. Only applies in `Configure`.
    pub fn set_custom_quality(&self, percent: u8) -> bool {
        let quality = QualityPercent::clamped(percent);
        if quality.get() != percent {
            warn!("Custom quality {} out of range, using {}", percent, quality.get());
        }

        let mut session = self.session.lock();
        if session.phase() != Phase::Configure {
            warn!("Ignoring quality change in the {:?} phase", session.phase());
            return false;
        }
        session.set_custom_quality(quality);
        debug!("Custom quality -> {}%", quality.get());
        true
    }

    /// `Configure → Done`, or back to `Upload` if the collaborator fails.
    ///
    /// A request made while another one is in flight returns
    /// [`CompressOutcome::Skipped`] without calling the collaborator.
    pub async fn compress(&self) -> CompressOutcome {
        if self.is_compressing.swap(true, Ordering::SeqCst) {
            warn!("Compression already in progress, ignoring request");
            return CompressOutcome::Skipped;
        }
        let _guard = CompressingGuard(&self.is_compressing);

        let (file, params) = {
            let session = self.session.lock();
            match (session.phase(), session.original_file()) {
                (Phase::Configure, Some(file)) => (file.clone(), session.params()),
                (phase, _) => {
                    warn!("Nothing to compress in the {:?} phase", phase);
                    return CompressOutcome::Skipped;
                }
            }
        };

        let file_name = file.name().to_string();
        self.progress.report(
            Progress::new(ProgressType::Start, 0, "starting").with_file_name(file_name.as_str()),
        );
        debug!(
            "Compressing '{}' ({} bytes) with {:?}",
            file_name,
            file.size(),
            params
        );

        let options = CompressionOptions::new(params, self.progress.callback(&file_name));
        let result = self.compressor.compress(file, options).await;

        let mut session = self.session.lock();
        let outcome = match result {
            Ok(compressed) => match session.complete(compressed, &self.previews) {
                Ok(summary) => {
                    debug!(
                        "Configure -> Done: '{}' {} -> {} bytes ({}% saved)",
                        file_name, summary.original_size, summary.compressed_size, summary.saved_percent
                    );
                    CompressOutcome::Compressed(summary)
                }
                Err(e) => {
                    error!("Could not store compressed '{}': {}", file_name, e);
                    session.fail_compression();
                    CompressOutcome::Failed
                }
            },
            Err(e) => {
                error!("Compression failed for '{}': {}", file_name, e);
                session.fail_compression();
                CompressOutcome::Failed
            }
        };

        let (progress_type, status) = match outcome {
            CompressOutcome::Compressed(_) => (ProgressType::Complete, "complete"),
            _ => (ProgressType::Error, "error"),
        };
        self.progress
            .report(Progress::new(progress_type, 100, status).with_file_name(file_name));
        outcome
    }

    /// Full reset to `Upload`, releasing every preview.
    ///
    /// Refused while a compress call is in flight.
    pub fn reset(&self) -> bool {
        if self.is_compressing() {
            warn!("Ignoring reset while compressing");
            return false;
        }
        let mut session = self.session.lock();
        let from = session.phase();
        session.reset();
        self.progress.clear();
        debug!("{:?} -> Upload (reset)", from);
        true
    }
}
