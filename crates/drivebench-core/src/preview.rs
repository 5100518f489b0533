//! Local preview resources bound to queued files.
//!
//! A [`PreviewHandle`] plays the role of a browser object URL: it keeps the
//! picked file's bytes reachable until it is released. Release happens
//! exactly once, either through [`PreviewHandle::release`] or when the
//! handle is dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    live: HashMap<u64, Arc<[u8]>>,
    released: u64,
}

/// Owner of every live preview resource.
#[derive(Debug, Default)]
pub struct PreviewStore {
    registry: Mutex<Registry>,
}

impl PreviewStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register `content` and hand back the handle that owns it.
    pub fn create(self: &Arc<Self>, content: Vec<u8>) -> PreviewHandle {
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.live.insert(id, Arc::from(content));

        PreviewHandle {
            id,
            url: format!("blob:drivebench/{id}"),
            store: Arc::clone(self),
            released: false,
        }
    }

    /// Number of handles not yet released.
    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    /// Number of releases performed so far.
    pub fn released_count(&self) -> u64 {
        self.lock().released
    }

    fn contents(&self, id: u64) -> Option<Arc<[u8]>> {
        self.lock().live.get(&id).cloned()
    }

    fn revoke(&self, id: u64) {
        let mut registry = self.lock();
        if registry.live.remove(&id).is_some() {
            registry.released += 1;
        } else {
            tracing::warn!("Preview {} revoked twice", id);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Exclusive owner of one preview resource.
#[derive(Debug)]
pub struct PreviewHandle {
    id: u64,
    url: String,
    store: Arc<PreviewStore>,
    released: bool,
}

impl PreviewHandle {
    /// Locator of the resource, stable for the handle's lifetime.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The bytes behind this preview.
    pub fn contents(&self) -> Option<Arc<[u8]>> {
        self.store.contents(self.id)
    }

    /// Release the resource now. Consuming `self` rules out a second release.
    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if !self.released {
            self.released = true;
            self.store.revoke(self.id);
            tracing::trace!("Released preview {}", self.url);
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.release_once();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_exposes_content_until_released() {
        let store = PreviewStore::new();
        let handle = store.create(b"pixels".to_vec());
        assert_eq!(handle.contents().as_deref(), Some(&b"pixels"[..]));
        assert_eq!(store.live_count(), 1);

        handle.release();
        assert_eq!(store.live_count(), 0);
        assert_eq!(store.released_count(), 1);
    }

    #[test]
    fn explicit_release_is_not_repeated_on_drop() {
        let store = PreviewStore::new();
        let handle = store.create(Vec::new());
        handle.release();
        assert_eq!(store.released_count(), 1);
    }

    #[test]
    fn dropping_a_handle_releases_it() {
        let store = PreviewStore::new();
        {
            let _a = store.create(vec![1]);
            let _b = store.create(vec![2]);
            assert_eq!(store.live_count(), 2);
        }
        assert_eq!(store.live_count(), 0);
        assert_eq!(store.released_count(), 2);
    }

    #[test]
    fn urls_are_distinct() {
        let store = PreviewStore::new();
        let a = store.create(Vec::new());
        let b = store.create(Vec::new());
        assert_ne!(a.url(), b.url());
    }
}
