//! Shared fixture: a loaded registry, an in-memory store and a simulated
//! machine.

#![allow(dead_code)]

use grbl_settings::settings::{register_all, AuthLevel};
use grbl_settings::{
    execute_bare, execute_line, CommandResult, Context, MachineProfile, MachineSettings,
    MemoryStore, SimMachine,
};

pub static GENERIC: MachineProfile = MachineProfile::generic();

pub struct Rig {
    pub settings: MachineSettings,
    pub store: MemoryStore,
    pub machine: SimMachine,
    pub out: String,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_profile(&GENERIC)
    }

    pub fn with_profile(profile: &'static MachineProfile) -> Self {
        let settings = register_all(profile).unwrap();
        let store = MemoryStore::new();
        settings.registry.load(&store);
        Self {
            settings,
            store,
            machine: SimMachine::new(),
            out: String::new(),
        }
    }

    pub fn run(&mut self, line: &str) -> CommandResult {
        self.run_as(line, AuthLevel::Admin)
    }

    pub fn run_as(&mut self, line: &str, auth: AuthLevel) -> CommandResult {
        let mut ctx = Context::new(&self.settings, &self.store, &mut self.machine, &mut self.out)
            .with_auth(auth);
        execute_line(line, &mut ctx)
    }

    pub fn bare(&mut self, key: &str) -> CommandResult {
        let mut ctx = Context::new(&self.settings, &self.store, &mut self.machine, &mut self.out);
        execute_bare(key, &mut ctx)
    }

    /// Output written since the last call
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.out)
    }

    /// Run a line and return only what it printed
    pub fn query(&mut self, line: &str) -> String {
        self.take_output();
        self.run(line).unwrap();
        self.take_output()
    }
}
