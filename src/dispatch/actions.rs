//! Commands with machine side effects: homing, unlock, check mode, sleep,
//! jog, startup lines and the build-info text.

use core::fmt::Write;

use super::Context;
use crate::build_info;
use crate::machine::{HomingCycle, MachineState};
use crate::settings::Axis;
use crate::status::{CommandResult, Status};

/// Homing gate and sequence. Gating failures leave the machine untouched.
fn home(ctx: &mut Context<'_>, cycle: HomingCycle) -> CommandResult {
    if !ctx.settings.homing_enable.get() {
        return Err(Status::SettingDisabled);
    }
    if ctx.machine.door_ajar() {
        return Err(Status::DoorBlocked);
    }
    if let HomingCycle::Axis(axis) = cycle {
        if axis.index() >= ctx.settings.axis_count() {
            return Err(Status::InvalidStatement);
        }
    }

    ctx.machine.set_state(MachineState::Homing);
    ctx.machine.homing_cycle(cycle);
    if ctx.machine.abort_requested() {
        log::warn!("homing {:?} aborted", cycle);
        return Ok(());
    }
    ctx.machine.set_state(MachineState::Idle);
    ctx.machine.steppers_idle();
    if cycle == HomingCycle::All {
        execute_startup_lines(ctx);
    }
    Ok(())
}

pub fn home_all(ctx: &mut Context<'_>) -> CommandResult {
    home(ctx, HomingCycle::All)
}

pub fn home_x(ctx: &mut Context<'_>) -> CommandResult {
    home(ctx, HomingCycle::Axis(Axis::X))
}

pub fn home_y(ctx: &mut Context<'_>) -> CommandResult {
    home(ctx, HomingCycle::Axis(Axis::Y))
}

pub fn home_z(ctx: &mut Context<'_>) -> CommandResult {
    home(ctx, HomingCycle::Axis(Axis::Z))
}

pub fn home_a(ctx: &mut Context<'_>) -> CommandResult {
    home(ctx, HomingCycle::Axis(Axis::A))
}

pub fn home_b(ctx: &mut Context<'_>) -> CommandResult {
    home(ctx, HomingCycle::Axis(Axis::B))
}

pub fn home_c(ctx: &mut Context<'_>) -> CommandResult {
    home(ctx, HomingCycle::Axis(Axis::C))
}

/// `$X`: leave alarm only with the door closed. Outside alarm it is a no-op.
pub fn unlock(ctx: &mut Context<'_>) -> CommandResult {
    if ctx.machine.state() == MachineState::Alarm {
        if ctx.machine.door_ajar() {
            return Err(Status::DoorBlocked);
        }
        let _ = write!(ctx.out, "[MSG:Caution: Unlocked]\r\n");
        ctx.machine.set_state(MachineState::Idle);
    }
    Ok(())
}

/// `$C`
pub fn toggle_check_mode(ctx: &mut Context<'_>) -> CommandResult {
    match ctx.machine.state() {
        MachineState::CheckMode => {
            ctx.machine.set_state(MachineState::Idle);
            let _ = write!(ctx.out, "[MSG:Disabled]\r\n");
        }
        MachineState::Idle => {
            ctx.machine.set_state(MachineState::CheckMode);
            let _ = write!(ctx.out, "[MSG:Enabled]\r\n");
        }
        _ => return Err(Status::IdleStateRequired),
    }
    Ok(())
}

/// `$SLP`
pub fn sleep(ctx: &mut Context<'_>) -> CommandResult {
    ctx.machine.request_sleep();
    Ok(())
}

/// `$J=<line>`: forwarded with its prefix restored
pub fn jog(value: &str, ctx: &mut Context<'_>) -> CommandResult {
    if !matches!(ctx.machine.state(), MachineState::Idle | MachineState::Jog) {
        return Err(Status::IdleStateRequired);
    }
    if value.is_empty() {
        return Err(Status::InvalidStatement);
    }
    let line = format!("$J={}", value);
    ctx.machine.execute_line(&line, ctx.client)
}

/// `$I=<text>`
pub fn store_build_info(value: &str, ctx: &mut Context<'_>) -> CommandResult {
    if value.len() > build_info::MAX_LEN {
        return Err(Status::LineLengthExceeded);
    }
    if let Err(e) = build_info::write(ctx.store, value) {
        log::error!("build info write failed: {}", e);
    }
    Ok(())
}

/// Run every non-empty startup line, echoing `>line:ok` or `>line:error:N`
pub fn execute_startup_lines(ctx: &mut Context<'_>) {
    let settings = ctx.settings;
    for slot in &settings.startup_lines {
        let line = slot.get();
        if line.is_empty() {
            continue;
        }
        match ctx.machine.execute_line(&line, ctx.client) {
            Ok(()) => {
                let _ = write!(ctx.out, ">{}:ok\r\n", line);
            }
            Err(status) => {
                let _ = write!(ctx.out, ">{}:error:{}\r\n", line, status.code());
            }
        }
    }
}
