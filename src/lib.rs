//! # grbl-settings
//!
//! Typed settings registry and `$`-command dispatcher for a Grbl-style CNC
//! controller on ESP32.
//!
//! ## Architecture
//!
//! Every configuration value is a typed [`settings::Setting`] in one
//! append-only [`settings::Registry`], built once by
//! [`settings::register_all`]:
//! - Values persist through a [`store::SettingsStore`] (NVS on target)
//! - Lines from any transport go through [`dispatch::execute_line`]
//! - Motion and G-code stay behind the [`machine::Machine`] trait
//!
//! Other subsystems read setting values concurrently with the command path;
//! every update is published in one atomic step.

pub mod build_info;
pub mod console;
pub mod coords;
pub mod dispatch;
pub mod machine;
pub mod settings;
pub mod status;
pub mod store;

pub use console::{Console, VERSION};
pub use dispatch::{execute_bare, execute_line, Context};
pub use machine::{Client, Machine, MachineState, SimMachine};
pub use settings::{MachineProfile, MachineSettings, RestoreFlags};
pub use status::{CommandResult, Status};
pub use store::{MemoryStore, SettingsStore, StoreError};
