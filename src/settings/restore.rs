//! Restore-to-defaults scopes

use bitflags::bitflags;

use super::MachineSettings;
use crate::store::SettingsStore;
use crate::{build_info, coords};

bitflags! {
    /// Bitmask of independent restore scopes
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RestoreFlags: u8 {
        /// Every setting without a UI name, startup lines excepted
        const DEFAULTS = 1 << 0;
        /// Stored coordinate systems
        const PARAMETERS = 1 << 1;
        const STARTUP_LINES = 1 << 2;
        const BUILD_INFO = 1 << 3;
        /// Network credentials and radio settings
        const WIFI = 1 << 4;
        const ALL = 0xFF;
    }
}

impl MachineSettings {
    /// Apply every scope selected by `flags`. Scopes are independent, so
    /// order does not matter.
    pub fn restore(&self, store: &dyn SettingsStore, flags: RestoreFlags) {
        log::info!("restore scopes {:#04x}", flags.bits());

        if flags.contains(RestoreFlags::WIFI) {
            for setting in &self.network {
                setting.set_default(store);
            }
        }
        if flags.contains(RestoreFlags::DEFAULTS) {
            self.registry
                .restore_defaults(store, |e| self.is_startup_line(e.meta().name()));
        }
        if flags.contains(RestoreFlags::STARTUP_LINES) {
            for line in &self.startup_lines {
                line.set_default(store);
            }
        }
        if flags.contains(RestoreFlags::PARAMETERS) {
            coords::clear_all(store);
        }
        if flags.contains(RestoreFlags::BUILD_INFO) {
            build_info::clear(store);
        }
    }
}
