//! Module: dispatch
//!
//! Purpose: Resolve one `$`/`[` command line against the bare command
//! table, the settings registry and the UI command tier.
//!
//! Architecture:
//! - [`parser`] splits the line, [`tables`] holds bare commands
//! - Resolution order, first match wins:
//!   1. value absent and key in the bare table
//!   2. public setting by name or alias (query or set)
//!   3. restore key with a non-empty scope token
//!   4. restricted entry, gated by the caller's [`AuthLevel`]
//! - Nothing else resolves; the result is `InvalidStatement`
//!
//! Every error path returns before any state change.

pub mod actions;
pub mod parser;
pub mod reports;
pub mod tables;
pub mod web;

use core::fmt::Write;

use crate::machine::{Client, Machine};
use crate::settings::{AuthLevel, MachineSettings};
use crate::status::{CommandResult, Status};
use crate::store::SettingsStore;

pub use parser::{normalize_key, parse_line, ParsedLine};
pub use tables::{DollarCommand, DOLLAR_COMMANDS, RESTORE_KEY};

/// Everything a handler may touch while serving one line
pub struct Context<'a> {
    pub settings: &'a MachineSettings,
    pub store: &'a dyn SettingsStore,
    pub machine: &'a mut dyn Machine,
    pub out: &'a mut dyn Write,
    pub client: Client,
    pub auth: AuthLevel,
}

impl<'a> Context<'a> {
    /// Local serial caller with full access
    pub fn new(
        settings: &'a MachineSettings,
        store: &'a dyn SettingsStore,
        machine: &'a mut dyn Machine,
        out: &'a mut dyn Write,
    ) -> Self {
        Self {
            settings,
            store,
            machine,
            out,
            client: Client::Serial,
            auth: AuthLevel::Admin,
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_auth(mut self, auth: AuthLevel) -> Self {
        self.auth = auth;
        self
    }
}

/// Execute one `[NAME]value`, `$NAME` or `$NAME=value` line
pub fn execute_line(line: &str, ctx: &mut Context<'_>) -> CommandResult {
    let parsed = parse_line(line)?;
    log::debug!("dispatch key='{}' value={:?}", parsed.key, parsed.value);
    resolve(parsed, ctx)
}

fn resolve(parsed: ParsedLine<'_>, ctx: &mut Context<'_>) -> CommandResult {
    let settings = ctx.settings;
    let query = parsed.is_query();
    let ParsedLine { key, value } = parsed;

    if value.is_none() {
        if let Some(cmd) = tables::find_dollar(key) {
            return (cmd.handler)(ctx);
        }
    }

    if let Some((setting, alias)) = settings.registry.find_public_setting(key) {
        if !query {
            return setting.set_string_value(ctx.store, value.unwrap_or(""));
        }
        let _ = write!(ctx.out, "{}={}\r\n", alias, setting.string_value());
        return Ok(());
    }

    if !query && key.eq_ignore_ascii_case(RESTORE_KEY) {
        let token = value.unwrap_or("");
        let flags = tables::find_restore(token).ok_or(Status::InvalidStatement)?;
        settings.restore(ctx.store, flags);
        return Ok(());
    }

    if let Some(entry) = settings.registry.find_restricted(key) {
        let required = entry.meta().group().required_level();
        if ctx.auth < required {
            log::warn!("'{}' needs {:?}, caller is {:?}", key, required, ctx.auth);
            return Err(Status::AuthenticationFailed);
        }
        return entry.action(value.unwrap_or(""), ctx);
    }

    Err(Status::InvalidStatement)
}

/// Key with no bracket or `=` processing: bare command, else a setting
/// query
pub fn execute_bare(key: &str, ctx: &mut Context<'_>) -> CommandResult {
    let key = normalize_key(key);
    if let Some(cmd) = tables::find_dollar(key) {
        return (cmd.handler)(ctx);
    }
    let settings = ctx.settings;
    let (setting, alias) = settings
        .registry
        .find_public_setting(key)
        .ok_or(Status::InvalidStatement)?;
    let _ = write!(ctx.out, "{}={}\r\n", alias, setting.string_value());
    Ok(())
}
