//! Revocable preview handles.
//!
//! A [`PreviewHandle`] is the non-browser stand-in for an object URL: a short
//! `preview://<id>` reference that resolves to image bytes while the handle is
//! alive. Handles are not `Clone`, and releasing one consumes it, so a handle
//! can only ever be released once. Dropping a handle releases it as well.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::trace;
use crate::core::ImagePayload;

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    live: HashMap<u64, Arc<[u8]>>,
    created: u64,
    released: u64,
}

/// Counters describing handle lifecycle so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreviewStats {
    pub created: u64,
    pub released: u64,
    pub live: usize,
}

/// Issues preview handles and resolves their URLs.
#[derive(Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle that resolves to the payload's bytes until released.
    pub fn create(&self, payload: &ImagePayload) -> PreviewHandle {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        inner.created += 1;
        let id = inner.next_id;
        inner.live.insert(id, payload.shared_bytes());
        trace!("Created preview {} for '{}'", id, payload.name());

        PreviewHandle {
            id,
            url: format!("preview://{id}"),
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Resolves a preview URL to its bytes, or `None` once it has been released.
    pub fn resolve(&self, url: &str) -> Option<Arc<[u8]>> {
        let id = url.strip_prefix("preview://")?.parse::<u64>().ok()?;
        self.inner.lock().live.get(&id).cloned()
    }

    pub fn stats(&self) -> PreviewStats {
        let inner = self.inner.lock();
        PreviewStats {
            created: inner.created,
            released: inner.released,
            live: inner.live.len(),
        }
    }
}

impl fmt::Debug for PreviewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PreviewRegistry").field(&self.stats()).finish()
    }
}

/// A live reference to previewable image bytes.
pub struct PreviewHandle {
    id: u64,
    url: String,
    registry: Weak<Mutex<RegistryInner>>,
}

impl PreviewHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Releases the handle. Equivalent to dropping it.
    pub fn release(self) {}
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        let Some(inner) = self.registry.upgrade() else {
            return;
        };
        let mut inner = inner.lock();
        if inner.live.remove(&self.id).is_some() {
            inner.released += 1;
            trace!("Released preview {}", self.id);
        }
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle").field("url", &self.url).finish()
    }
}
