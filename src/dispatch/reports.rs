//! Read-only `$` reports

use core::fmt::Write;

use super::Context;
use crate::settings::{Group, Setting};
use crate::status::{CommandResult, Status};
use crate::{build_info, coords, VERSION};

pub fn help(ctx: &mut Context<'_>) -> CommandResult {
    let _ = write!(
        ctx.out,
        "[HLP:$$ $+ $# $S $G $I $N $NVS $x=val $Nx=line $J=line $SLP $C $X $H $RST=$ $RST=# $RST=* $RST=@ ~ ! ? ctrl-x]\r\n"
    );
    Ok(())
}

/// `$$`
pub fn grbl_settings(ctx: &mut Context<'_>) -> CommandResult {
    show_grbl_settings(ctx, &[Group::Grbl]);
    Ok(())
}

/// `$+`
pub fn extended_settings(ctx: &mut Context<'_>) -> CommandResult {
    show_grbl_settings(ctx, &[Group::Grbl, Group::Extended]);
    Ok(())
}

/// Numbered listing: non-axis settings of each group, then axis ones.
/// Flags print as `1`/`0` for senders that expect Grbl numbers.
fn show_grbl_settings(ctx: &mut Context<'_>, groups: &[Group]) {
    let registry = &ctx.settings.registry;
    for &group in groups {
        for axis in [false, true] {
            for setting in registry.settings_in(group, axis) {
                let meta = setting.meta();
                let name = meta.legacy_name().unwrap_or(meta.name());
                let _ = write!(ctx.out, "${}={}\r\n", name, grbl_value(setting));
            }
        }
    }
}

fn grbl_value(setting: &Setting) -> String {
    match setting {
        Setting::Flag(f) => String::from(if f.get() { "1" } else { "0" }),
        other => other.string_value(),
    }
}

/// `$S`: every public setting by internal name
pub fn all_settings(ctx: &mut Context<'_>) -> CommandResult {
    let registry = &ctx.settings.registry;
    for setting in registry.public().filter_map(|e| e.as_setting()) {
        let _ = write!(ctx.out, "${}={}\r\n", setting.meta().name(), setting.string_value());
    }
    Ok(())
}

/// `$N`
pub fn startup_lines(ctx: &mut Context<'_>) -> CommandResult {
    for (i, line) in ctx.settings.startup_lines.iter().enumerate() {
        let _ = write!(ctx.out, "$N{}={}\r\n", i, line.get());
    }
    Ok(())
}

/// `$NVS`
pub fn store_usage(ctx: &mut Context<'_>) -> CommandResult {
    let stats = ctx.store.stats().ok_or(Status::SettingDisabled)?;
    let _ = write!(
        ctx.out,
        "[MSG: NVS Used:{} Free:{} Total:{}]\r\n",
        stats.used, stats.free, stats.total
    );
    Ok(())
}

/// `$I`
pub fn version_info(ctx: &mut Context<'_>) -> CommandResult {
    let info = build_info::read(ctx.store);
    let _ = write!(ctx.out, "[VER:{}:{}]\r\n", VERSION, info);
    Ok(())
}

/// `$#`
pub fn coordinates(ctx: &mut Context<'_>) -> CommandResult {
    coords::report(ctx.store, ctx.settings.axis_count(), ctx.out);
    Ok(())
}

/// `$G`
pub fn gcode_modes(ctx: &mut Context<'_>) -> CommandResult {
    ctx.machine.report_gcode_modes(ctx.out);
    Ok(())
}
