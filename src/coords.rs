//! Stored coordinate systems (G54..G59, G28, G30).
//!
//! Each system is one store key holding `axis_count` little-endian floats.
//! Missing or malformed entries read as all-zero.

use core::fmt::Write;

use crate::store::{decode_u32, encode_u32, SettingsStore, StoreError};

/// Persisted coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordSystem {
    G54,
    G55,
    G56,
    G57,
    G58,
    G59,
    G28,
    G30,
}

impl CoordSystem {
    pub const ALL: [CoordSystem; 8] = [
        CoordSystem::G54,
        CoordSystem::G55,
        CoordSystem::G56,
        CoordSystem::G57,
        CoordSystem::G58,
        CoordSystem::G59,
        CoordSystem::G28,
        CoordSystem::G30,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CoordSystem::G54 => "G54",
            CoordSystem::G55 => "G55",
            CoordSystem::G56 => "G56",
            CoordSystem::G57 => "G57",
            CoordSystem::G58 => "G58",
            CoordSystem::G59 => "G59",
            CoordSystem::G28 => "G28",
            CoordSystem::G30 => "G30",
        }
    }

    fn key(self) -> String {
        format!("Coord/{}", self.name())
    }
}

/// Stored offsets for `system`
pub fn read(store: &dyn SettingsStore, system: CoordSystem, axis_count: usize) -> Vec<f32> {
    let mut values = vec![0.0; axis_count];
    match store.read(&system.key()) {
        Ok(Some(bytes)) if bytes.len() == axis_count * 4 => {
            for (v, chunk) in values.iter_mut().zip(bytes.chunks_exact(4)) {
                *v = decode_u32(chunk).map(f32::from_bits).unwrap_or(0.0);
            }
        }
        Ok(Some(_)) => log::warn!("{}: stored size mismatch, reading zeros", system.name()),
        Ok(None) => {}
        Err(e) => log::error!("{}: read failed: {}", system.name(), e),
    }
    values
}

/// Persist offsets for `system`
pub fn write(store: &dyn SettingsStore, system: CoordSystem, values: &[f32]) -> Result<(), StoreError> {
    let bytes: Vec<u8> = values.iter().flat_map(|v| encode_u32(v.to_bits())).collect();
    store.write(&system.key(), &bytes)?;
    store.commit()
}

/// Zero every coordinate system by dropping its record
pub fn clear_all(store: &dyn SettingsStore) {
    for system in CoordSystem::ALL {
        if let Err(e) = store.erase(&system.key()) {
            log::error!("{}: clear failed: {}", system.name(), e);
        }
    }
    if let Err(e) = store.commit() {
        log::error!("coordinate clear commit failed: {}", e);
    }
}

/// `$#` report, one `[Gxx:a,b,c]` line per system
pub fn report(store: &dyn SettingsStore, axis_count: usize, out: &mut dyn Write) {
    for system in CoordSystem::ALL {
        let values: Vec<String> = read(store, system, axis_count)
            .into_iter()
            .map(|v| format!("{:.3}", v))
            .collect();
        let _ = write!(out, "[{}:{}]\r\n", system.name(), values.join(","));
    }
}
