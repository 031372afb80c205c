//! ESP-IDF NVS driver for the settings store.
//!
//! One namespace holds every setting. NVS keys are limited to 15 bytes, so
//! longer setting names are folded into a prefix plus a stable hash.

use std::sync::{Mutex, MutexGuard, PoisonError};

use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
use esp_idf_svc::sys::EspError;

use super::{SettingsStore, StoreError, StoreStats};

/// NVS namespace for all settings
pub const NVS_NAMESPACE: &str = "grbl";

/// Maximum NVS key length (excluding terminator)
const MAX_KEY_LEN: usize = 15;

/// Largest blob read back (startup lines, SSIDs, passwords)
const MAX_BLOB_LEN: usize = 512;

/// NVS-backed store
pub struct NvsStore {
    nvs: Mutex<EspNvs<NvsDefault>>,
}

impl NvsStore {
    /// Open the settings namespace on the default partition
    pub fn open(partition: EspDefaultNvsPartition) -> Result<Self, StoreError> {
        let nvs = EspNvs::new(partition, NVS_NAMESPACE, true)
            .map_err(|e| StoreError::InitFailed(e.to_string()))?;
        Ok(Self { nvs: Mutex::new(nvs) })
    }

    fn lock(&self) -> MutexGuard<'_, EspNvs<NvsDefault>> {
        self.nvs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn io_error(key: &str, err: EspError) -> StoreError {
    StoreError::Io {
        key: key.to_string(),
        reason: err.to_string(),
    }
}

impl SettingsStore for NvsStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let nvs_key = nvs_key(key);
        let nvs = self.lock();
        let mut buf = [0u8; MAX_BLOB_LEN];
        match nvs.blob_len(&nvs_key).map_err(|e| io_error(key, e))? {
            None => Ok(None),
            Some(len) if len > MAX_BLOB_LEN => Err(StoreError::TooLarge(key.to_string())),
            Some(_) => Ok(nvs
                .get_raw(&nvs_key, &mut buf)
                .map_err(|e| io_error(key, e))?
                .map(|bytes| bytes.to_vec())),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.lock()
            .set_raw(&nvs_key(key), bytes)
            .map(|_| ())
            .map_err(|e| io_error(key, e))
    }

    fn erase(&self, key: &str) -> Result<(), StoreError> {
        self.lock()
            .remove(&nvs_key(key))
            .map(|_| ())
            .map_err(|e| io_error(key, e))
    }

    fn commit(&self) -> Result<(), StoreError> {
        // EspNvs commits after every set_raw/remove.
        Ok(())
    }

    fn stats(&self) -> Option<StoreStats> {
        let mut stats = esp_idf_svc::sys::nvs_stats_t::default();
        // SAFETY: null partition name selects the default partition;
        // `stats` outlives the call.
        let err = unsafe { esp_idf_svc::sys::nvs_get_stats(core::ptr::null(), &mut stats) };
        if err != esp_idf_svc::sys::ESP_OK {
            log::warn!("nvs_get_stats failed: {}", err);
            return None;
        }
        Some(StoreStats {
            used: stats.used_entries as usize,
            free: stats.free_entries as usize,
            total: stats.total_entries as usize,
        })
    }
}

/// Fold a setting name into a valid NVS key.
///
/// Names within the limit are used verbatim; longer ones become the first
/// six bytes, `~`, and the 8-digit FNV-1a hash of the full name.
pub fn nvs_key(name: &str) -> String {
    if name.len() <= MAX_KEY_LEN {
        return name.to_string();
    }
    let prefix: String = name.chars().take(6).collect();
    let hash = name
        .bytes()
        .fold(0x811c_9dc5u32, |h, b| (h ^ b as u32).wrapping_mul(0x0100_0193));
    format!("{}~{:08x}", prefix, hash)
}
