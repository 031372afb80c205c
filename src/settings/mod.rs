//! Module: settings
//!
//! Purpose: Typed, persisted settings registry.
//!
//! Architecture:
//! - Every setting and UI command is an [`Entry`] in one [`Registry`]
//! - Entries are appended once by [`register_all`] and never removed
//! - Scalar values live in atomics; strings are published by swapping an `Arc`
//! - A shadow of the stored value skips redundant flash writes
//!
//! Safety: other subsystems may read values concurrently with the command
//! path; every update replaces the value in one visible step.

mod cell;
pub mod command;
pub mod definitions;
pub mod entry;
pub mod profile;
pub mod registry;
pub mod restore;
pub mod typed;
pub mod webui;

use std::sync::OnceLock;

pub use command::{ActionCommand, CommandFn};
pub use definitions::{register_all, AxisSettings, MachineSettings};
pub use entry::{Entry, Setting};
pub use profile::MachineProfile;
pub use registry::{Registry, RegistryError};
pub use restore::RestoreFlags;
pub use typed::{
    EnumOptions, EnumSetting, FlagSetting, FloatSetting, IntSetting, IpAddrSetting,
    StringSetting, MAX_SETTING_STRING,
};
pub use webui::{JsonUiSink, UiItem, UiKind, UiSink};

use crate::store::SettingsStore;

/// Validator run on the raw text before parsing. `true` accepts.
pub type Checker = fn(&str) -> bool;

/// Visibility / authorization tier, most core first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Group {
    /// Classic Grbl `$n` settings
    Grbl,
    /// Firmware extensions without a Grbl number
    Extended,
    /// Settings surfaced to the web UI
    WebUi,
    /// UI commands open to everyone
    WebNoAuth,
    /// UI commands, user read
    WebCmdRu,
    /// UI commands, user write
    WebCmdWu,
    /// UI commands, admin write
    WebCmdWa,
}

impl Group {
    /// Highest group reachable as a plain setting and listed by `$S`
    pub const PUBLIC_MAX: Group = Group::WebUi;

    pub fn is_public(self) -> bool {
        self <= Self::PUBLIC_MAX
    }

    /// Access level needed to invoke an entry of this group
    pub fn required_level(self) -> AuthLevel {
        match self {
            Group::Grbl | Group::Extended | Group::WebUi | Group::WebNoAuth => AuthLevel::Guest,
            Group::WebCmdRu | Group::WebCmdWu => AuthLevel::User,
            Group::WebCmdWa => AuthLevel::Admin,
        }
    }
}

/// Caller access level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AuthLevel {
    Guest,
    User,
    Admin,
}

/// Machine axis tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    A,
    B,
    C,
}

impl Axis {
    /// All axes in Grbl numbering order
    pub const ALL: [Axis; 6] = [Axis::X, Axis::Y, Axis::Z, Axis::A, Axis::B, Axis::C];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn letter(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
            Axis::A => 'A',
            Axis::B => 'B',
            Axis::C => 'C',
        }
    }
}

/// Names, group and axis shared by settings and commands
#[derive(Debug, Clone)]
pub struct EntryMeta {
    name: String,
    legacy_name: Option<String>,
    ui_name: Option<String>,
    group: Group,
    axis: Option<Axis>,
}

impl EntryMeta {
    pub fn new(group: Group, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            legacy_name: None,
            ui_name: None,
            group,
            axis: None,
        }
    }

    /// Short protocol alias (`$100`, `ESP120`)
    pub fn legacy(mut self, legacy_name: impl Into<String>) -> Self {
        self.legacy_name = Some(legacy_name.into());
        self
    }

    /// Label in the UI description; absent means not UI-visible
    pub fn ui(mut self, ui_name: impl Into<String>) -> Self {
        self.ui_name = Some(ui_name.into());
        self
    }

    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Canonical name, also the store key
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn legacy_name(&self) -> Option<&str> {
        self.legacy_name.as_deref()
    }

    pub fn ui_name(&self) -> Option<&str> {
        self.ui_name.as_deref()
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn axis_tag(&self) -> Option<Axis> {
        self.axis
    }

    /// Case-insensitive match on the internal or legacy name.
    ///
    /// Returns the alias that matched.
    pub fn matches(&self, key: &str) -> Option<&str> {
        if self.name.eq_ignore_ascii_case(key) {
            return Some(self.name.as_str());
        }
        self.legacy_name
            .as_deref()
            .filter(|legacy| legacy.eq_ignore_ascii_case(key))
    }
}

static SETTINGS: OnceLock<MachineSettings> = OnceLock::new();

/// Build the process-wide registry and load it from `store`.
///
/// Runs once at startup; a second call fails with
/// [`RegistryError::AlreadyInitialized`].
pub fn init(
    profile: &'static MachineProfile,
    store: &dyn SettingsStore,
) -> Result<&'static MachineSettings, RegistryError> {
    if SETTINGS.get().is_some() {
        return Err(RegistryError::AlreadyInitialized);
    }
    let settings = register_all(profile)?;
    settings.registry.load(store);
    SETTINGS
        .set(settings)
        .map_err(|_| RegistryError::AlreadyInitialized)?;
    log::info!("settings initialized for {}", profile.name);
    SETTINGS.get().ok_or(RegistryError::AlreadyInitialized)
}

/// The process-wide settings, once [`init`] has run
pub fn get() -> Option<&'static MachineSettings> {
    SETTINGS.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_ordering_and_threshold() {
        assert!(Group::Grbl < Group::Extended);
        assert!(Group::WebUi.is_public());
        assert!(!Group::WebNoAuth.is_public());
        assert_eq!(Group::WebCmdWa.required_level(), AuthLevel::Admin);
    }

    #[test]
    fn test_meta_matches_either_alias() {
        let meta = EntryMeta::new(Group::Grbl, "Stepper/Pulse").legacy("0");
        assert_eq!(meta.matches("stepper/pulse"), Some("Stepper/Pulse"));
        assert_eq!(meta.matches("0"), Some("0"));
        assert_eq!(meta.matches("1"), None);
    }
}
