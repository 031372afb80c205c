//! User build-info string (`$I=`), persisted with a Grbl-style checksum.
//!
//! Layout: UTF-8 text, a zero terminator, one checksum byte.

use crate::store::{SettingsStore, StoreError};

const KEY: &str = "Build/Text";

/// Longest accepted build-info text
pub const MAX_LEN: usize = 80;

/// Rotate-left-then-add over every byte
fn checksum(bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(0u8, |sum, b| sum.rotate_left(1).wrapping_add(*b))
}

/// Stored text, or empty when absent or corrupt
pub fn read(store: &dyn SettingsStore) -> String {
    let bytes = match store.read(KEY) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return String::new(),
        Err(e) => {
            log::error!("build info read failed: {}", e);
            return String::new();
        }
    };
    match bytes.as_slice() {
        [text @ .., 0, sum] if checksum(text) == *sum => {
            String::from_utf8_lossy(text).into_owned()
        }
        _ => {
            log::warn!("build info checksum mismatch");
            String::new()
        }
    }
}

pub fn write(store: &dyn SettingsStore, text: &str) -> Result<(), StoreError> {
    let mut bytes = Vec::with_capacity(text.len() + 2);
    bytes.extend_from_slice(text.as_bytes());
    bytes.push(0);
    bytes.push(checksum(text.as_bytes()));
    store.write(KEY, &bytes)?;
    store.commit()
}

/// Overwrite with the empty record (terminator plus zero checksum)
pub fn clear(store: &dyn SettingsStore) {
    if let Err(e) = store.write(KEY, &[0, 0]).and_then(|_| store.commit()) {
        log::error!("build info clear failed: {}", e);
    }
}
