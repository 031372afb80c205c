//! Ordered, append-only registry of settings and commands.
//!
//! Populated once by `register_all()`. Entries are never removed or
//! reordered; enumeration follows registration order.

use std::sync::Arc;

use thiserror::Error;

use super::webui::UiSink;
use super::{Entry, Group, Setting};
use crate::store::SettingsStore;

/// Registration failure, fatal at startup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Name or legacy alias already taken (case-insensitive)
    #[error("duplicate setting name '{0}'")]
    DuplicateName(String),
    /// Default violates the setting's own constraints
    #[error("invalid default for '{0}'")]
    InvalidDefault(String),
    /// `settings::init()` called twice
    #[error("settings already initialized")]
    AlreadyInitialized,
}

/// The registry
#[derive(Default)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, returning the caller's typed handle back.
    pub fn register<T>(&mut self, item: T) -> Result<Arc<T>, RegistryError>
    where
        Arc<T>: Into<Entry>,
    {
        let handle = Arc::new(item);
        self.push(Arc::clone(&handle).into())?;
        Ok(handle)
    }

    /// Append an already wrapped entry
    pub fn push(&mut self, entry: Entry) -> Result<(), RegistryError> {
        let meta = entry.meta();
        let aliases = std::iter::once(meta.name()).chain(meta.legacy_name());
        for alias in aliases {
            if self.entries.iter().any(|e| e.meta().matches(alias).is_some()) {
                return Err(RegistryError::DuplicateName(alias.to_string()));
            }
        }
        if let Some(setting) = entry.as_setting() {
            if !setting.default_is_valid() {
                return Err(RegistryError::InvalidDefault(meta.name().to_string()));
            }
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Entries of exactly `group`
    pub fn in_group(&self, group: Group) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(move |e| e.meta().group() == group)
    }

    /// Entries at or below [`Group::PUBLIC_MAX`]
    pub fn public(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.meta().group().is_public())
    }

    /// Entries above [`Group::PUBLIC_MAX`] (UI and administrative commands)
    pub fn restricted(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.meta().group().is_public())
    }

    /// Settings in `group`, split by whether they carry an axis tag
    pub fn settings_in(&self, group: Group, axis: bool) -> impl Iterator<Item = &Setting> {
        self.in_group(group)
            .filter(move |e| e.meta().axis_tag().is_some() == axis)
            .filter_map(Entry::as_setting)
    }

    /// First public setting matching `key`, with the alias that matched
    pub fn find_public_setting(&self, key: &str) -> Option<(&Setting, String)> {
        self.public().find_map(|e| {
            let alias = e.meta().matches(key)?;
            e.as_setting().map(|s| (s, alias.to_string()))
        })
    }

    /// First restricted entry matching `key`
    pub fn find_restricted(&self, key: &str) -> Option<&Entry> {
        self.restricted().find(|e| e.meta().matches(key).is_some())
    }

    /// Any entry by name or alias
    pub fn find(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.meta().matches(key).is_some())
    }

    /// Setting with the given UI name (case-insensitive)
    pub fn find_by_ui_name(&self, ui_name: &str) -> Option<&Setting> {
        self.entries
            .iter()
            .filter_map(Entry::as_setting)
            .find(|s| s.meta().ui_name().is_some_and(|n| n.eq_ignore_ascii_case(ui_name)))
    }

    /// Populate every setting from the store
    pub fn load(&self, store: &dyn SettingsStore) {
        for entry in &self.entries {
            entry.load(store);
        }
        log::info!("loaded {} registry entries", self.entries.len());
    }

    /// Reset every entry without a UI name, except those `skip` selects
    pub fn restore_defaults(&self, store: &dyn SettingsStore, skip: impl Fn(&Entry) -> bool) {
        for entry in &self.entries {
            if entry.meta().ui_name().is_none() && !skip(entry) {
                entry.set_default(store);
            }
        }
    }

    /// Describe every UI-visible setting
    pub fn add_webui(&self, sink: &mut dyn UiSink) {
        for setting in self.entries.iter().filter_map(Entry::as_setting) {
            setting.add_webui(sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{EntryMeta, FlagSetting, IntSetting};
    use crate::store::MemoryStore;

    #[test]
    fn test_register_preserves_order() {
        let mut reg = Registry::new();
        reg.register(IntSetting::new(EntryMeta::new(Group::Grbl, "b"), 0, 0, 1)).unwrap();
        reg.register(IntSetting::new(EntryMeta::new(Group::Grbl, "a"), 0, 0, 1)).unwrap();
        let names: Vec<_> = reg.iter().map(|e| e.meta().name().to_string()).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn test_duplicate_names_rejected_case_insensitive() {
        let mut reg = Registry::new();
        reg.register(FlagSetting::new(EntryMeta::new(Group::Grbl, "Homing/Enable").legacy("22"), false))
            .unwrap();
        let dup = reg.register(FlagSetting::new(EntryMeta::new(Group::Grbl, "HOMING/ENABLE"), false));
        assert!(matches!(dup, Err(RegistryError::DuplicateName(_))));
        let dup_legacy = reg.register(FlagSetting::new(EntryMeta::new(Group::Grbl, "x").legacy("22"), false));
        assert!(matches!(dup_legacy, Err(RegistryError::DuplicateName(_))));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_invalid_default_rejected() {
        let mut reg = Registry::new();
        let bad = reg.register(IntSetting::new(EntryMeta::new(Group::Grbl, "i"), 50, 0, 10));
        assert_eq!(bad.err(), Some(RegistryError::InvalidDefault("i".into())));
    }

    #[test]
    fn test_restore_skips_ui_entries() {
        let store = MemoryStore::new();
        let mut reg = Registry::new();
        let core = reg.register(IntSetting::new(EntryMeta::new(Group::Grbl, "core"), 1, 0, 9)).unwrap();
        let ui = reg
            .register(IntSetting::new(EntryMeta::new(Group::WebUi, "ui").ui("UI"), 1, 0, 9))
            .unwrap();
        core.set_string_value(&store, "5").unwrap();
        ui.set_string_value(&store, "5").unwrap();

        reg.restore_defaults(&store, |_| false);
        assert_eq!(core.get(), 1);
        assert_eq!(ui.get(), 5);
    }
}
