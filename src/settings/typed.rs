//! Typed setting variants.
//!
//! Each variant validates in the same order: optional checker on the raw
//! text, then type-specific parsing, then range/length. Any failure returns
//! [`Status::InvalidArgument`] and leaves the current value untouched.

use std::net::Ipv4Addr;
use std::sync::Arc;

use super::cell::{ScalarCell, TextCell};
use super::webui::{UiItem, UiKind, UiSink};
use super::{Checker, EntryMeta, RegistryError};
use crate::status::{CommandResult, Status};
use crate::store::SettingsStore;

/// Longest text a string setting accepts
pub const MAX_SETTING_STRING: usize = 256;

/// Case-insensitive name -> ordinal table for enum settings
pub type EnumOptions = &'static [(&'static str, i8)];

fn check(checker: Option<Checker>, text: &str) -> CommandResult {
    match checker {
        Some(accepts) if !accepts(text) => Err(Status::InvalidArgument),
        _ => Ok(()),
    }
}

fn emit_ui(meta: &EntryMeta, value: String, kind: UiKind<'_>, sink: &mut dyn UiSink) {
    if let Some(ui_name) = meta.ui_name() {
        sink.setting(UiItem {
            ui_name,
            name: meta.name(),
            value,
            kind,
        });
    }
}

// --- Integer ---

/// 32-bit signed integer with inclusive bounds
pub struct IntSetting {
    meta: EntryMeta,
    checker: Option<Checker>,
    default: i32,
    min: i32,
    max: i32,
    value: ScalarCell,
}

impl IntSetting {
    pub fn new(meta: EntryMeta, default: i32, min: i32, max: i32) -> Self {
        Self {
            meta,
            checker: None,
            default,
            min,
            max,
            value: ScalarCell::new(default as u32),
        }
    }

    pub fn with_checker(mut self, checker: Checker) -> Self {
        self.checker = Some(checker);
        self
    }

    pub fn meta(&self) -> &EntryMeta {
        &self.meta
    }

    /// Current value
    #[inline]
    pub fn get(&self) -> i32 {
        self.value.get() as i32
    }

    pub fn default_value(&self) -> i32 {
        self.default
    }

    pub fn range(&self) -> (i32, i32) {
        (self.min, self.max)
    }

    fn in_range(&self, v: i32) -> bool {
        (self.min..=self.max).contains(&v)
    }

    pub(crate) fn default_is_valid(&self) -> bool {
        self.in_range(self.default)
    }

    pub fn load(&self, store: &dyn SettingsStore) {
        self.value.load(store, self.meta.name(), self.default as u32, |bits| {
            self.in_range(bits as i32)
        });
    }

    pub fn set_default(&self, store: &dyn SettingsStore) {
        self.value.publish(store, self.meta.name(), self.default as u32);
    }

    pub fn set_string_value(&self, store: &dyn SettingsStore, text: &str) -> CommandResult {
        check(self.checker, text)?;
        let v: i32 = text.trim().parse().map_err(|_| Status::InvalidArgument)?;
        if !self.in_range(v) {
            return Err(Status::InvalidArgument);
        }
        self.value.publish(store, self.meta.name(), v as u32);
        Ok(())
    }

    pub fn string_value(&self) -> String {
        self.get().to_string()
    }

    pub fn add_webui(&self, sink: &mut dyn UiSink) {
        let kind = UiKind::Integer { min: self.min, max: self.max };
        emit_ui(&self.meta, self.string_value(), kind, sink);
    }
}

// --- Float ---

/// Three decimals like Grbl, unless that would not read back exactly.
pub(crate) fn format_float(v: f32) -> String {
    let fixed = format!("{:.3}", v);
    if fixed.parse::<f32>().map(f32::to_bits) == Ok(v.to_bits()) {
        fixed
    } else {
        v.to_string()
    }
}

/// 32-bit float with inclusive bounds
pub struct FloatSetting {
    meta: EntryMeta,
    checker: Option<Checker>,
    default: f32,
    min: f32,
    max: f32,
    value: ScalarCell,
}

impl FloatSetting {
    pub fn new(meta: EntryMeta, default: f32, min: f32, max: f32) -> Self {
        Self {
            meta,
            checker: None,
            default,
            min,
            max,
            value: ScalarCell::new(default.to_bits()),
        }
    }

    pub fn with_checker(mut self, checker: Checker) -> Self {
        self.checker = Some(checker);
        self
    }

    pub fn meta(&self) -> &EntryMeta {
        &self.meta
    }

    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.value.get())
    }

    pub fn default_value(&self) -> f32 {
        self.default
    }

    pub fn range(&self) -> (f32, f32) {
        (self.min, self.max)
    }

    fn in_range(&self, v: f32) -> bool {
        v.is_finite() && v >= self.min && v <= self.max
    }

    pub(crate) fn default_is_valid(&self) -> bool {
        self.in_range(self.default)
    }

    pub fn load(&self, store: &dyn SettingsStore) {
        self.value.load(store, self.meta.name(), self.default.to_bits(), |bits| {
            self.in_range(f32::from_bits(bits))
        });
    }

    pub fn set_default(&self, store: &dyn SettingsStore) {
        self.value.publish(store, self.meta.name(), self.default.to_bits());
    }

    pub fn set_string_value(&self, store: &dyn SettingsStore, text: &str) -> CommandResult {
        check(self.checker, text)?;
        let v: f32 = text.trim().parse().map_err(|_| Status::InvalidArgument)?;
        if !self.in_range(v) {
            return Err(Status::InvalidArgument);
        }
        self.value.publish(store, self.meta.name(), v.to_bits());
        Ok(())
    }

    pub fn string_value(&self) -> String {
        format_float(self.get())
    }

    /// Floats are not exposed to the web UI
    pub fn add_webui(&self, _sink: &mut dyn UiSink) {}
}

// --- String ---

/// UTF-8 text with length bounds (in characters)
pub struct StringSetting {
    meta: EntryMeta,
    checker: Option<Checker>,
    default: String,
    min_len: usize,
    max_len: usize,
    value: TextCell,
}

impl StringSetting {
    pub fn new(meta: EntryMeta, default: &str) -> Self {
        Self {
            meta,
            checker: None,
            default: default.to_string(),
            min_len: 0,
            max_len: MAX_SETTING_STRING,
            value: TextCell::new(default),
        }
    }

    pub fn with_length(mut self, min_len: usize, max_len: usize) -> Self {
        self.min_len = min_len;
        self.max_len = max_len.min(MAX_SETTING_STRING);
        self
    }

    pub fn with_checker(mut self, checker: Checker) -> Self {
        self.checker = Some(checker);
        self
    }

    pub fn meta(&self) -> &EntryMeta {
        &self.meta
    }

    /// Current value; the handle stays valid across later updates
    pub fn get(&self) -> Arc<str> {
        self.value.get()
    }

    pub fn default_value(&self) -> &str {
        &self.default
    }

    fn length_ok(&self, text: &str) -> bool {
        (self.min_len..=self.max_len).contains(&text.chars().count())
    }

    pub(crate) fn default_is_valid(&self) -> bool {
        self.length_ok(&self.default)
    }

    pub fn load(&self, store: &dyn SettingsStore) {
        self.value
            .load(store, self.meta.name(), &self.default, |text| self.length_ok(text));
    }

    pub fn set_default(&self, store: &dyn SettingsStore) {
        self.value.publish(store, self.meta.name(), &self.default);
    }

    pub fn set_string_value(&self, store: &dyn SettingsStore, text: &str) -> CommandResult {
        check(self.checker, text)?;
        if !self.length_ok(text) {
            return Err(Status::InvalidArgument);
        }
        self.value.publish(store, self.meta.name(), text);
        Ok(())
    }

    pub fn string_value(&self) -> String {
        self.get().to_string()
    }

    pub fn add_webui(&self, sink: &mut dyn UiSink) {
        let kind = UiKind::Text { min_len: self.min_len, max_len: self.max_len };
        emit_ui(&self.meta, self.string_value(), kind, sink);
    }
}

// --- Enum ---

/// One of a fixed set of named ordinals
pub struct EnumSetting {
    meta: EntryMeta,
    default: i8,
    options: EnumOptions,
    value: ScalarCell,
}

impl EnumSetting {
    pub fn new(meta: EntryMeta, default: i8, options: EnumOptions) -> Self {
        Self {
            meta,
            default,
            options,
            value: ScalarCell::new(default as u32),
        }
    }

    pub fn meta(&self) -> &EntryMeta {
        &self.meta
    }

    /// Current ordinal
    #[inline]
    pub fn get(&self) -> i8 {
        self.value.get() as i8
    }

    pub fn options(&self) -> EnumOptions {
        self.options
    }

    fn is_option(&self, ordinal: i8) -> bool {
        self.options.iter().any(|(_, v)| *v == ordinal)
    }

    pub(crate) fn default_is_valid(&self) -> bool {
        self.is_option(self.default)
    }

    /// Resolve a name (case-insensitive), or a bare ordinal as the UI sends it
    fn resolve(&self, text: &str) -> Option<i8> {
        let text = text.trim();
        if let Some((_, v)) = self.options.iter().find(|(n, _)| n.eq_ignore_ascii_case(text)) {
            return Some(*v);
        }
        text.parse::<i8>().ok().filter(|v| self.is_option(*v))
    }

    pub fn load(&self, store: &dyn SettingsStore) {
        self.value.load(store, self.meta.name(), self.default as u32, |bits| {
            i8::try_from(bits as i32).is_ok_and(|v| self.is_option(v))
        });
    }

    pub fn set_default(&self, store: &dyn SettingsStore) {
        self.value.publish(store, self.meta.name(), self.default as u32);
    }

    pub fn set_string_value(&self, store: &dyn SettingsStore, text: &str) -> CommandResult {
        let v = self.resolve(text).ok_or(Status::InvalidArgument)?;
        self.value.publish(store, self.meta.name(), v as u32);
        Ok(())
    }

    pub fn string_value(&self) -> String {
        let current = self.get();
        self.options
            .iter()
            .find(|(_, v)| *v == current)
            .map(|(n, _)| n.to_string())
            .unwrap_or_default()
    }

    pub fn add_webui(&self, sink: &mut dyn UiSink) {
        emit_ui(&self.meta, self.get().to_string(), UiKind::Select(self.options), sink);
    }
}

// --- Flag ---

const TRUTHY: [&str; 3] = ["1", "true", "on"];
const FALSY: [&str; 3] = ["0", "false", "off"];

/// Boolean; accepts `1/true/on` and `0/false/off`, case-insensitive
pub struct FlagSetting {
    meta: EntryMeta,
    checker: Option<Checker>,
    default: bool,
    value: ScalarCell,
}

impl FlagSetting {
    pub fn new(meta: EntryMeta, default: bool) -> Self {
        Self {
            meta,
            checker: None,
            default,
            value: ScalarCell::new(default as u32),
        }
    }

    pub fn with_checker(mut self, checker: Checker) -> Self {
        self.checker = Some(checker);
        self
    }

    pub fn meta(&self) -> &EntryMeta {
        &self.meta
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.value.get() != 0
    }

    pub fn default_value(&self) -> bool {
        self.default
    }

    pub fn load(&self, store: &dyn SettingsStore) {
        self.value
            .load(store, self.meta.name(), self.default as u32, |bits| bits <= 1);
    }

    pub fn set_default(&self, store: &dyn SettingsStore) {
        self.value.publish(store, self.meta.name(), self.default as u32);
    }

    pub fn set_string_value(&self, store: &dyn SettingsStore, text: &str) -> CommandResult {
        check(self.checker, text)?;
        let text = text.trim();
        let v = if TRUTHY.iter().any(|t| t.eq_ignore_ascii_case(text)) {
            true
        } else if FALSY.iter().any(|f| f.eq_ignore_ascii_case(text)) {
            false
        } else {
            return Err(Status::InvalidArgument);
        };
        self.value.publish(store, self.meta.name(), v as u32);
        Ok(())
    }

    pub fn string_value(&self) -> String {
        let text = if self.get() { "On" } else { "Off" };
        text.to_string()
    }

    /// Booleans reach the UI as enum settings instead
    pub fn add_webui(&self, _sink: &mut dyn UiSink) {}
}

// --- IPv4 address ---

/// Dotted-quad IPv4 address packed as `u32::from(Ipv4Addr)`
pub struct IpAddrSetting {
    meta: EntryMeta,
    checker: Option<Checker>,
    default: u32,
    value: ScalarCell,
}

impl IpAddrSetting {
    /// Default given already packed
    pub fn new(meta: EntryMeta, default: u32) -> Self {
        Self {
            meta,
            checker: None,
            default,
            value: ScalarCell::new(default),
        }
    }

    /// Default given as dotted-quad text
    pub fn from_text(meta: EntryMeta, default: &str) -> Result<Self, RegistryError> {
        let addr: Ipv4Addr = default
            .trim()
            .parse()
            .map_err(|_| RegistryError::InvalidDefault(meta.name().to_string()))?;
        Ok(Self::new(meta, u32::from(addr)))
    }

    pub fn with_checker(mut self, checker: Checker) -> Self {
        self.checker = Some(checker);
        self
    }

    pub fn meta(&self) -> &EntryMeta {
        &self.meta
    }

    #[inline]
    pub fn get(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.value.get())
    }

    pub fn load(&self, store: &dyn SettingsStore) {
        self.value.load(store, self.meta.name(), self.default, |_| true);
    }

    pub fn set_default(&self, store: &dyn SettingsStore) {
        self.value.publish(store, self.meta.name(), self.default);
    }

    pub fn set_string_value(&self, store: &dyn SettingsStore, text: &str) -> CommandResult {
        check(self.checker, text)?;
        let addr: Ipv4Addr = text.trim().parse().map_err(|_| Status::InvalidArgument)?;
        self.value.publish(store, self.meta.name(), u32::from(addr));
        Ok(())
    }

    pub fn string_value(&self) -> String {
        self.get().to_string()
    }

    pub fn add_webui(&self, sink: &mut dyn UiSink) {
        emit_ui(&self.meta, self.string_value(), UiKind::Address, sink);
    }
}
