//! Closed sum types over every registrable kind.

use core::fmt::Write;
use std::sync::Arc;

use super::typed::{
    EnumSetting, FlagSetting, FloatSetting, IntSetting, IpAddrSetting, StringSetting,
};
use super::webui::UiSink;
use super::{ActionCommand, EntryMeta};
use crate::dispatch::Context;
use crate::status::CommandResult;
use crate::store::SettingsStore;

/// Handle to one typed setting
#[derive(Clone)]
pub enum Setting {
    Int(Arc<IntSetting>),
    Float(Arc<FloatSetting>),
    String(Arc<StringSetting>),
    Enum(Arc<EnumSetting>),
    Flag(Arc<FlagSetting>),
    IpAddr(Arc<IpAddrSetting>),
}

macro_rules! each_variant {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Setting::Int($s) => $body,
            Setting::Float($s) => $body,
            Setting::String($s) => $body,
            Setting::Enum($s) => $body,
            Setting::Flag($s) => $body,
            Setting::IpAddr($s) => $body,
        }
    };
}

impl Setting {
    pub fn meta(&self) -> &EntryMeta {
        each_variant!(self, s => s.meta())
    }

    /// Validate, publish and persist a new value given as text
    pub fn set_string_value(&self, store: &dyn SettingsStore, text: &str) -> CommandResult {
        each_variant!(self, s => s.set_string_value(store, text))
    }

    /// Current value in its native text form
    pub fn string_value(&self) -> String {
        each_variant!(self, s => s.string_value())
    }

    pub fn load(&self, store: &dyn SettingsStore) {
        each_variant!(self, s => s.load(store))
    }

    pub fn set_default(&self, store: &dyn SettingsStore) {
        each_variant!(self, s => s.set_default(store))
    }

    pub fn add_webui(&self, sink: &mut dyn UiSink) {
        each_variant!(self, s => s.add_webui(sink))
    }

    pub(crate) fn default_is_valid(&self) -> bool {
        match self {
            Setting::Int(s) => s.default_is_valid(),
            Setting::Float(s) => s.default_is_valid(),
            Setting::String(s) => s.default_is_valid(),
            Setting::Enum(s) => s.default_is_valid(),
            Setting::Flag(_) | Setting::IpAddr(_) => true,
        }
    }

    /// Empty value shows the setting, anything else sets it
    pub fn action(&self, value: &str, ctx: &mut Context<'_>) -> CommandResult {
        if value.is_empty() {
            let _ = write!(ctx.out, "{}={}\r\n", self.meta().name(), self.string_value());
            Ok(())
        } else {
            self.set_string_value(ctx.store, value)
        }
    }
}

/// Anything the registry holds
#[derive(Clone)]
pub enum Entry {
    Setting(Setting),
    Command(Arc<ActionCommand>),
}

impl Entry {
    pub fn meta(&self) -> &EntryMeta {
        match self {
            Entry::Setting(s) => s.meta(),
            Entry::Command(c) => c.meta(),
        }
    }

    pub fn as_setting(&self) -> Option<&Setting> {
        match self {
            Entry::Setting(s) => Some(s),
            Entry::Command(_) => None,
        }
    }

    pub fn load(&self, store: &dyn SettingsStore) {
        if let Entry::Setting(s) = self {
            s.load(store);
        }
    }

    pub fn set_default(&self, store: &dyn SettingsStore) {
        if let Entry::Setting(s) = self {
            s.set_default(store);
        }
    }

    /// Invoke with a verbatim argument (`""` when none was given)
    pub fn action(&self, value: &str, ctx: &mut Context<'_>) -> CommandResult {
        match self {
            Entry::Setting(s) => s.action(value, ctx),
            Entry::Command(c) => c.invoke(value, ctx),
        }
    }
}

macro_rules! entry_from {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<Arc<$ty>> for Setting {
                fn from(s: Arc<$ty>) -> Self {
                    Setting::$variant(s)
                }
            }

            impl From<Arc<$ty>> for Entry {
                fn from(s: Arc<$ty>) -> Self {
                    Entry::Setting(Setting::$variant(s))
                }
            }
        )*
    };
}

entry_from! {
    IntSetting => Int,
    FloatSetting => Float,
    StringSetting => String,
    EnumSetting => Enum,
    FlagSetting => Flag,
    IpAddrSetting => IpAddr,
}

impl From<Arc<ActionCommand>> for Entry {
    fn from(c: Arc<ActionCommand>) -> Self {
        Entry::Command(c)
    }
}

impl From<Setting> for Entry {
    fn from(s: Setting) -> Self {
        Entry::Setting(s)
    }
}
