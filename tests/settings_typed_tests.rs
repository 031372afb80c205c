//! Typed setting contracts over every registered setting

mod common;

use common::{Rig, GENERIC};
use grbl_settings::settings::{self, register_all, RegistryError, Setting};
use grbl_settings::{MemoryStore, SettingsStore, Status};

#[test]
fn test_out_of_range_rejected_and_value_kept() {
    let rig = Rig::new();
    for setting in rig.settings.registry.iter().filter_map(|e| e.as_setting()) {
        let (too_big, too_small) = match setting {
            Setting::Int(s) => {
                let (min, max) = s.range();
                (i64::from(max) + 1, i64::from(min) - 1)
            }
            Setting::Float(s) => {
                let (min, max) = s.range();
                (f64::from(max).floor() as i64 + 1, f64::from(min).ceil() as i64 - 1)
            }
            _ => continue,
        };
        let before = setting.string_value();
        for bad in [too_big, too_small] {
            assert_eq!(
                setting.set_string_value(&rig.store, &bad.to_string()),
                Err(Status::InvalidArgument),
                "{} accepted {}",
                setting.meta().name(),
                bad
            );
            assert_eq!(setting.string_value(), before);
        }
    }
}

#[test]
fn test_round_trip_is_noop_without_store_write() {
    let rig = Rig::new();
    let writes = rig.store.writes();
    let commits = rig.store.commits();
    for setting in rig.settings.registry.iter().filter_map(|e| e.as_setting()) {
        let text = setting.string_value();
        assert_eq!(
            setting.set_string_value(&rig.store, &text),
            Ok(()),
            "{} rejected its own value '{}'",
            setting.meta().name(),
            text
        );
        assert_eq!(setting.string_value(), text);
    }
    assert_eq!(rig.store.writes(), writes);
    assert_eq!(rig.store.commits(), commits);
}

#[test]
fn test_round_trip_after_change_does_not_rewrite() {
    let rig = Rig::new();
    let pulloff = &rig.settings.homing_pulloff;
    pulloff.set_string_value(&rig.store, "2.5").unwrap();
    let writes = rig.store.writes();
    pulloff.set_string_value(&rig.store, &pulloff.string_value()).unwrap();
    assert_eq!(rig.store.writes(), writes);
}

#[test]
fn test_set_default_restores_text_and_coalesces() {
    let rig = Rig::new();
    let pulse = &rig.settings.step_pulse_us;
    let commits = rig.store.commits();
    pulse.set_string_value(&rig.store, "10").unwrap();
    assert_eq!(pulse.string_value(), "10");
    assert_eq!(rig.store.commits(), commits + 1);

    pulse.set_default(&rig.store);
    assert_eq!(pulse.string_value(), GENERIC.step_pulse_us.to_string());
    assert_eq!(rig.store.commits(), commits + 2);

    let writes = rig.store.writes();
    pulse.set_default(&rig.store);
    assert_eq!(rig.store.writes(), writes);
    assert_eq!(rig.store.commits(), commits + 2);
}

#[test]
fn test_enum_names_are_identity() {
    let rig = Rig::new();
    let spindle = &rig.settings.spindle_type;
    assert_eq!(spindle.set_string_value(&rig.store, "BogusName"), Err(Status::InvalidArgument));
    assert_eq!(spindle.string_value(), "PWM");

    for (name, _) in spindle.options() {
        spindle.set_string_value(&rig.store, name).unwrap();
        assert_eq!(spindle.string_value(), *name);
    }
}

#[test]
fn test_flag_reads_on_off() {
    let rig = Rig::new();
    let flag = &rig.settings.soft_limits;
    flag.set_string_value(&rig.store, "TRUE").unwrap();
    assert_eq!(flag.string_value(), "On");
    flag.set_string_value(&rig.store, "0").unwrap();
    assert_eq!(flag.string_value(), "Off");
    assert_eq!(flag.set_string_value(&rig.store, "maybe"), Err(Status::InvalidArgument));
}

#[test]
fn test_values_survive_reload() {
    let store = MemoryStore::new();
    {
        let first = register_all(&GENERIC).unwrap();
        first.registry.load(&store);
        first.axes[0].steps_per_mm.set_string_value(&store, "80").unwrap();
        first.hostname.set_string_value(&store, "router").unwrap();
    }
    let second = register_all(&GENERIC).unwrap();
    second.registry.load(&store);
    assert_eq!(second.axes[0].steps_per_mm.get(), 80.0);
    assert_eq!(&*second.hostname.get(), "router");
}

#[test]
fn test_failed_write_keeps_value_and_retries() {
    let rig = Rig::new();
    let pulse = &rig.settings.step_pulse_us;

    rig.store.set_fail_writes(true);
    assert_eq!(pulse.set_string_value(&rig.store, "12"), Ok(()));
    assert_eq!(pulse.get(), 12);
    assert_eq!(rig.store.get("Stepper/Pulse"), None);

    rig.store.set_fail_writes(false);
    pulse.set_string_value(&rig.store, "12").unwrap();
    assert_eq!(rig.store.get("Stepper/Pulse"), Some(12u32.to_le_bytes().to_vec()));
}

#[test]
fn test_corrupt_stored_value_falls_back_to_default() {
    let store = MemoryStore::new();
    store.write("Stepper/Pulse", &5000u32.to_le_bytes()).unwrap();
    let settings = register_all(&GENERIC).unwrap();
    settings.registry.load(&store);
    assert_eq!(settings.step_pulse_us.get(), GENERIC.step_pulse_us);
}

#[test]
fn test_ip_setting_text() {
    let rig = Rig::new();
    let ip = rig
        .settings
        .registry
        .find("Sta/IP")
        .and_then(|e| e.as_setting())
        .unwrap();
    ip.set_string_value(&rig.store, "10.0.0.42").unwrap();
    assert_eq!(ip.string_value(), "10.0.0.42");
    assert_eq!(ip.set_string_value(&rig.store, "10.0.0"), Err(Status::InvalidArgument));
}

#[test]
fn test_init_only_once() {
    let store = MemoryStore::new();
    let first = settings::init(&GENERIC, &store).unwrap();
    assert!(std::ptr::eq(first, settings::get().unwrap()));
    assert!(matches!(settings::init(&GENERIC, &store), Err(RegistryError::AlreadyInitialized)));
}
