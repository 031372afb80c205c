//! Grbl settings console
//!
//! Reads the Grbl line protocol from stdin (UART0 on ESP-IDF) and answers
//! on stdout. Motion is simulated; only the settings and `$` commands are
//! real.

use std::fmt::Write as _;
use std::io::{self, Read, Write as _};

use grbl_settings::dispatch::actions;
use grbl_settings::{
    settings, Console, Context, MachineProfile, MachineSettings, MachineState, SettingsStore,
    SimMachine, StoreError,
};

static PROFILE: MachineProfile = MachineProfile::selected();

#[cfg(target_os = "espidf")]
fn open_store() -> Result<Box<dyn SettingsStore>, StoreError> {
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use grbl_settings::store::NvsStore;

    let partition =
        EspDefaultNvsPartition::take().map_err(|e| StoreError::InitFailed(e.to_string()))?;
    Ok(Box::new(NvsStore::open(partition)?))
}

#[cfg(not(target_os = "espidf"))]
fn open_store() -> Result<Box<dyn SettingsStore>, StoreError> {
    Ok(Box::new(grbl_settings::MemoryStore::new()))
}

fn init_logging() {
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();
    }
    #[cfg(not(target_os = "espidf"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn restart() {
    #[cfg(target_os = "espidf")]
    unsafe {
        esp_idf_svc::sys::esp_restart();
    }
}

fn flush(out: &mut String) {
    if out.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = stdout.write_all(out.as_bytes());
    let _ = stdout.flush();
    out.clear();
}

/// Alarm at boot when homing is required, else run the startup lines
fn boot(
    settings: &MachineSettings,
    store: &dyn SettingsStore,
    machine: &mut SimMachine,
    console: &Console,
    out: &mut String,
) {
    let mut ctx = Context::new(settings, store, machine, out);
    console.print_banner(&mut ctx);
    if settings.homing_enable.get() {
        ctx.machine.set_state(MachineState::Alarm);
        let _ = write!(ctx.out, "[MSG:'$H'|'$X' to unlock]\r\n");
    } else {
        actions::execute_startup_lines(&mut ctx);
    }
}

fn main() {
    init_logging();

    let store = match open_store() {
        Ok(store) => store,
        Err(e) => {
            log::error!("store unavailable: {}", e);
            return;
        }
    };
    let settings = match settings::init(&PROFILE, store.as_ref()) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("settings registration failed: {}", e);
            return;
        }
    };

    let mut machine = SimMachine::new();
    let mut console = Console::new();
    let mut out = String::new();
    boot(settings, store.as_ref(), &mut machine, &console, &mut out);
    flush(&mut out);

    let mut stdin = io::stdin().lock();
    let mut byte = [0u8; 1];
    loop {
        match stdin.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                let mut ctx = Context::new(settings, store.as_ref(), &mut machine, &mut out);
                console.process_byte(byte[0], &mut ctx);
            }
            Err(e) => {
                log::error!("stdin read failed: {}", e);
                break;
            }
        }
        flush(&mut out);

        if machine.restart_requested {
            log::info!("restart requested");
            restart();
            break;
        }
    }
}
