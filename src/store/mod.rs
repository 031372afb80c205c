//! Non-volatile key/value storage consumed by the settings registry
//!
//! The registry owns key naming and byte layout; drivers only move bytes.
//! Writes become durable at `commit()` granularity.

pub mod memory;
#[cfg(target_os = "espidf")]
pub mod nvs;

pub use memory::MemoryStore;
#[cfg(target_os = "espidf")]
pub use nvs::NvsStore;

use thiserror::Error;

/// Store driver failure
#[derive(Debug, Error)]
pub enum StoreError {
    /// Driver could not be opened
    #[error("store init failed: {0}")]
    InitFailed(String),
    /// Read, write or commit failed
    #[error("store i/o failed on '{key}': {reason}")]
    Io { key: String, reason: String },
    /// Stored blob larger than the read buffer
    #[error("value for '{0}' too large")]
    TooLarge(String),
}

/// Entry usage reported by `$NVS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    pub used: usize,
    pub free: usize,
    pub total: usize,
}

/// Key -> bytes persistence
pub trait SettingsStore: Send + Sync {
    /// Bytes stored under `key`, `None` when absent
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stage `bytes` under `key`
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Remove `key`; absent keys are not an error
    fn erase(&self, key: &str) -> Result<(), StoreError>;

    /// Make staged writes durable
    fn commit(&self) -> Result<(), StoreError>;

    /// Usage statistics, when the driver can report them
    fn stats(&self) -> Option<StoreStats> {
        None
    }
}

/// Encode a 32-bit pattern in the on-store layout
pub(crate) fn encode_u32(bits: u32) -> [u8; 4] {
    bits.to_le_bytes()
}

/// Decode a 32-bit pattern; anything but exactly 4 bytes is treated as absent
pub(crate) fn decode_u32(bytes: &[u8]) -> Option<u32> {
    let raw: [u8; 4] = bytes.try_into().ok()?;
    Some(u32::from_le_bytes(raw))
}
