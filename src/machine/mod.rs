//! Module: machine
//!
//! Purpose: The motion/interpreter side as seen by the command layer.
//!
//! Architecture:
//! - [`Machine`] is the seam to the real controller; this crate never plans
//!   or steps motion itself
//! - [`SimMachine`] records every call for the host console and tests

mod sim;

use core::fmt::Write;

pub use sim::SimMachine;

use crate::settings::Axis;
use crate::status::CommandResult;

/// Controller state, as reported in `<...>` status lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MachineState {
    #[default]
    Idle,
    Alarm,
    CheckMode,
    Homing,
    Cycle,
    Hold,
    Jog,
    SafetyDoor,
    Sleep,
}

/// Which axes a homing request covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomingCycle {
    /// Configured homing sequence for every axis
    All,
    Axis(Axis),
}

/// Transport a line arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Client {
    #[default]
    Serial,
    Bluetooth,
    WebUi,
    Telnet,
}

/// Motion and interpreter entry points consumed by the dispatcher
pub trait Machine {
    fn state(&self) -> MachineState;

    fn set_state(&mut self, state: MachineState);

    /// Hand one G-code line to the interpreter
    fn execute_line(&mut self, line: &str, client: Client) -> CommandResult;

    /// Run a homing cycle to completion (or until aborted)
    fn homing_cycle(&mut self, cycle: HomingCycle);

    /// Reset or abort raised while the last blocking operation ran
    fn abort_requested(&self) -> bool;

    /// Safety interlock open
    fn door_ajar(&self) -> bool;

    /// Apply the stepper idle-lock policy
    fn steppers_idle(&mut self);

    fn request_sleep(&mut self);

    fn request_restart(&mut self);

    /// Parser modal state, `$G`
    fn report_gcode_modes(&self, out: &mut dyn Write);
}
