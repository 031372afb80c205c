//! Value cells with a shadow of the persisted value.
//!
//! `current` is what the rest of the firmware reads. `stored` is what the
//! store is believed to hold; writes equal to it are skipped. A store
//! failure keeps the new in-memory value and leaves the shadow stale so the
//! next update retries.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::store::{decode_u32, encode_u32, SettingsStore, StoreError};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn persist(store: &dyn SettingsStore, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
    store.write(key, bytes)?;
    store.commit()
}

/// 32-bit scalar published through a single atomic store
pub(crate) struct ScalarCell {
    current: AtomicU32,
    stored: Mutex<Option<u32>>,
}

impl ScalarCell {
    pub(crate) fn new(bits: u32) -> Self {
        Self {
            current: AtomicU32::new(bits),
            stored: Mutex::new(None),
        }
    }

    #[inline]
    pub(crate) fn get(&self) -> u32 {
        self.current.load(Ordering::Acquire)
    }

    /// Populate from the store. An absent key means the default is in effect
    /// and counts as stored; unreadable or invalid bytes fall back to the
    /// default with an unknown shadow.
    pub(crate) fn load(
        &self,
        store: &dyn SettingsStore,
        key: &str,
        default: u32,
        valid: impl Fn(u32) -> bool,
    ) {
        let (current, stored) = match store.read(key) {
            Ok(None) => (default, Some(default)),
            Ok(Some(bytes)) => match decode_u32(&bytes).filter(|bits| valid(*bits)) {
                Some(bits) => (bits, Some(bits)),
                None => {
                    log::warn!("setting {}: stored value rejected, using default", key);
                    (default, None)
                }
            },
            Err(e) => {
                log::error!("setting {}: load failed: {}", key, e);
                (default, None)
            }
        };
        self.current.store(current, Ordering::Release);
        *lock(&self.stored) = stored;
    }

    /// Publish an already validated value, then persist it if it differs
    /// from the shadow.
    pub(crate) fn publish(&self, store: &dyn SettingsStore, key: &str, bits: u32) {
        self.current.store(bits, Ordering::Release);

        let mut stored = lock(&self.stored);
        if *stored == Some(bits) {
            return;
        }
        match persist(store, key, &encode_u32(bits)) {
            Ok(()) => *stored = Some(bits),
            Err(e) => log::error!("setting {}: store write failed: {}", key, e),
        }
    }
}

/// Variable-length text published by swapping an `Arc<str>`
pub(crate) struct TextCell {
    current: RwLock<Arc<str>>,
    stored: Mutex<Option<String>>,
}

impl TextCell {
    pub(crate) fn new(value: &str) -> Self {
        Self {
            current: RwLock::new(Arc::from(value)),
            stored: Mutex::new(None),
        }
    }

    pub(crate) fn get(&self) -> Arc<str> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn swap(&self, value: Arc<str>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = value;
    }

    pub(crate) fn load(
        &self,
        store: &dyn SettingsStore,
        key: &str,
        default: &str,
        valid: impl Fn(&str) -> bool,
    ) {
        let (current, stored) = match store.read(key) {
            Ok(None) => (default.to_string(), Some(default.to_string())),
            Ok(Some(bytes)) => match String::from_utf8(bytes) {
                Ok(text) if valid(&text) => (text.clone(), Some(text)),
                _ => {
                    log::warn!("setting {}: stored text rejected, using default", key);
                    (default.to_string(), None)
                }
            },
            Err(e) => {
                log::error!("setting {}: load failed: {}", key, e);
                (default.to_string(), None)
            }
        };
        self.swap(Arc::from(current));
        *lock(&self.stored) = stored;
    }

    pub(crate) fn publish(&self, store: &dyn SettingsStore, key: &str, value: &str) {
        // Build the new value completely before it becomes visible.
        self.swap(Arc::from(value));

        let mut stored = lock(&self.stored);
        if stored.as_deref() == Some(value) {
            return;
        }
        match persist(store, key, value.as_bytes()) {
            Ok(()) => *stored = Some(value.to_string()),
            Err(e) => log::error!("setting {}: store write failed: {}", key, e),
        }
    }
}
