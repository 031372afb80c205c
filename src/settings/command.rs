//! Named actions registered alongside settings

use super::EntryMeta;
use crate::dispatch::Context;
use crate::status::CommandResult;

/// Handler taking the verbatim argument text
pub type CommandFn = fn(&str, &mut Context<'_>) -> CommandResult;

/// Invocable entry with no persisted value of its own
pub struct ActionCommand {
    meta: EntryMeta,
    action: CommandFn,
}

impl ActionCommand {
    pub fn new(meta: EntryMeta, action: CommandFn) -> Self {
        Self { meta, action }
    }

    pub fn meta(&self) -> &EntryMeta {
        &self.meta
    }

    pub fn invoke(&self, value: &str, ctx: &mut Context<'_>) -> CommandResult {
        (self.action)(value, ctx)
    }
}
