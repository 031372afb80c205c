//! `ESPnnn` commands used by the web UI

use core::fmt::Write;

use super::Context;
use crate::settings::JsonUiSink;
use crate::status::{CommandResult, Status};
use crate::VERSION;

/// `[ESP400]`: UI-visible settings as one JSON document
pub fn list_settings_json(_value: &str, ctx: &mut Context<'_>) -> CommandResult {
    let mut sink = JsonUiSink::new();
    ctx.settings.registry.add_webui(&mut sink);
    let _ = write!(ctx.out, "{}\r\n", sink.into_value());
    Ok(())
}

/// Offset just past `tag`, where the tag opens the line or follows whitespace
fn tag_offset(args: &str, tag: &str) -> Option<usize> {
    args.match_indices(tag)
        .find(|(i, _)| *i == 0 || args[..*i].ends_with(char::is_whitespace))
        .map(|(i, _)| i + tag.len())
}

/// `X=` marker opening the next parameter
fn starts_tag(s: &str) -> bool {
    matches!(s.as_bytes(), [c, b'=', ..] if c.is_ascii_uppercase())
}

/// Value of a `TAG=` parameter, up to the whitespace before the next
/// `X=` marker. UI names such as `Station SSID` keep their spaces.
fn param<'a>(args: &'a str, tag: &str) -> Option<&'a str> {
    let rest = &args[tag_offset(args, tag)?..];
    let end = rest
        .char_indices()
        .find(|(i, _)| rest[..*i].ends_with(char::is_whitespace) && starts_tag(&rest[*i..]))
        .map_or(rest.len(), |(i, _)| i);
    Some(rest[..end].trim_end())
}

/// Everything after `V=`, so values may contain spaces
fn value_param(args: &str) -> Option<&str> {
    tag_offset(args, "V=").map(|i| &args[i..])
}

/// `[ESP401]P=<ui name> V=<value>`
pub fn set_by_ui_name(value: &str, ctx: &mut Context<'_>) -> CommandResult {
    let name = param(value, "P=").ok_or(Status::InvalidArgument)?;
    let text = value_param(value).ok_or(Status::InvalidArgument)?.trim_end();
    let settings = ctx.settings;
    let setting = settings
        .registry
        .find_by_ui_name(name)
        .or_else(|| settings.registry.find(name).and_then(|e| e.as_setting()))
        .ok_or(Status::InvalidStatement)?;
    setting.set_string_value(ctx.store, text)
}

/// `[ESP444]`
pub fn restart(_value: &str, ctx: &mut Context<'_>) -> CommandResult {
    let _ = write!(ctx.out, "[MSG:Restart ongoing]\r\n");
    ctx.machine.request_restart();
    Ok(())
}

/// `[ESP800]`
pub fn firmware_info(_value: &str, ctx: &mut Context<'_>) -> CommandResult {
    let _ = write!(
        ctx.out,
        "FW version:{} # FW target:grbl-embedded # FW HW:No SD # primary sd:none # secondary sd:none # authentication:yes # hostname:{} # axis:{}\r\n",
        VERSION,
        ctx.settings.hostname.get(),
        ctx.settings.axis_count()
    );
    Ok(())
}
