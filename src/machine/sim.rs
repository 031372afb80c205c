//! Recording stand-in for the motion controller

use core::fmt::Write;

use super::{Client, HomingCycle, Machine, MachineState};
use crate::status::{CommandResult, Status};

/// Host-side machine: no motion, every request is recorded
#[derive(Debug, Default)]
pub struct SimMachine {
    state: MachineState,
    /// Lines handed to the interpreter, in order
    pub executed: Vec<(String, Client)>,
    pub homing_cycles: Vec<HomingCycle>,
    /// Interlock input
    pub door_open: bool,
    /// Raised abort flag seen after the next blocking call
    pub abort: bool,
    /// Interpreter code returned for every line when set
    pub fail_code: Option<u8>,
    pub steppers_idled: u32,
    pub sleep_requested: bool,
    pub restart_requested: bool,
}

impl SimMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: MachineState) -> Self {
        Self { state, ..Self::default() }
    }

    /// Executed lines without their client tag
    pub fn lines(&self) -> Vec<&str> {
        self.executed.iter().map(|(l, _)| l.as_str()).collect()
    }
}

impl Machine for SimMachine {
    fn state(&self) -> MachineState {
        self.state
    }

    fn set_state(&mut self, state: MachineState) {
        log::debug!("state {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    fn execute_line(&mut self, line: &str, client: Client) -> CommandResult {
        if let Some(code) = self.fail_code {
            return Err(Status::from_code(code));
        }
        self.executed.push((line.to_string(), client));
        Ok(())
    }

    fn homing_cycle(&mut self, cycle: HomingCycle) {
        self.homing_cycles.push(cycle);
    }

    fn abort_requested(&self) -> bool {
        self.abort
    }

    fn door_ajar(&self) -> bool {
        self.door_open
    }

    fn steppers_idle(&mut self) {
        self.steppers_idled += 1;
    }

    fn request_sleep(&mut self) {
        self.sleep_requested = true;
        self.state = MachineState::Sleep;
    }

    fn request_restart(&mut self) {
        self.restart_requested = true;
    }

    fn report_gcode_modes(&self, out: &mut dyn Write) {
        let _ = write!(out, "[GC:G0 G54 G17 G21 G90 G94 M5 M9 T0 F0 S0]\r\n");
    }
}
