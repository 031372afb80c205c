//! Line dispatcher: grammar, precedence, reports and actions

mod common;

use common::Rig;
use grbl_settings::coords::{self, CoordSystem};
use grbl_settings::machine::{HomingCycle, MachineState};
use grbl_settings::settings::{AuthLevel, Axis};
use grbl_settings::{Machine, Status, VERSION};

#[test]
fn test_set_by_legacy_then_query() {
    let mut rig = Rig::new();
    assert_eq!(rig.run("$0=200"), Ok(()));
    assert_eq!(rig.query("$0"), "0=200\r\n");
    assert_eq!(rig.settings.step_pulse_us.get(), 200);
}

#[test]
fn test_query_echoes_matched_alias() {
    let mut rig = Rig::new();
    assert_eq!(rig.query("$stepper/pulse"), "Stepper/Pulse=3\r\n");
    assert_eq!(rig.query("$22"), "22=Off\r\n");
    assert_eq!(rig.query("$Homing/Enable="), "Homing/Enable=Off\r\n");
}

#[test]
fn test_unknown_key_is_invalid_statement() {
    let mut rig = Rig::new();
    assert_eq!(rig.run("$BOGUS"), Err(Status::InvalidStatement));
    assert_eq!(rig.run("$BOGUS=1"), Err(Status::InvalidStatement));
    assert!(rig.take_output().is_empty());
}

#[test]
fn test_unclosed_bracket_rejected_before_lookup() {
    let mut rig = Rig::new();
    assert_eq!(rig.run("[ESP120"), Err(Status::InvalidStatement));
    assert!(rig.take_output().is_empty());
}

#[test]
fn test_bracket_form_queries_and_sets() {
    let mut rig = Rig::new();
    assert_eq!(rig.query("[ESP120]"), "ESP120=Enable\r\n");
    assert_eq!(rig.run("[ESP120]disable"), Ok(()));
    assert_eq!(rig.query("$Http/Enable"), "Http/Enable=Disable\r\n");
}

#[test]
fn test_rejected_value_leaves_setting() {
    let mut rig = Rig::new();
    assert_eq!(rig.run("$0=5000"), Err(Status::InvalidArgument));
    assert_eq!(rig.run("$0=abc"), Err(Status::InvalidArgument));
    assert_eq!(rig.settings.step_pulse_us.get(), 3);
}

#[test]
fn test_grbl_report_maps_flags_to_numbers() {
    let mut rig = Rig::new();
    let out = rig.query("$$");
    assert!(out.starts_with("$0=3\r\n$1=250\r\n"));
    assert!(out.contains("$22=0\r\n"));
    assert!(out.contains("$100=100.000\r\n"));
    assert!(!out.contains("Spindle/Type"));

    rig.run("$22=on").unwrap();
    assert!(rig.query("$$").contains("$22=1\r\n"));
}

#[test]
fn test_non_axis_settings_listed_before_axis_settings() {
    let mut rig = Rig::new();
    let out = rig.query("$$");
    let last_core = out.find("$32=").unwrap();
    let first_axis = out.find("$100=").unwrap();
    assert!(last_core < first_axis);
}

#[test]
fn test_extended_report_includes_extended_group() {
    let mut rig = Rig::new();
    let out = rig.query("$+");
    assert!(out.contains("$0=3\r\n"));
    assert!(out.contains("$Spindle/Type=PWM\r\n"));
    assert!(out.contains("$X/Microsteps=16\r\n"));
    assert!(!out.contains("Hostname"));
}

#[test]
fn test_settings_listing_by_name() {
    let mut rig = Rig::new();
    let out = rig.query("$S");
    assert!(out.contains("$Stepper/Pulse=3\r\n"));
    assert!(out.contains("$Hostname=grblesp\r\n"));
    assert!(!out.contains("ESP400"));
    assert!(!out.contains("WebUI/List"));
}

#[test]
fn test_startup_lines_report_and_checker() {
    let mut rig = Rig::new();
    assert_eq!(rig.query("$N"), "$N0=\r\n$N1=\r\n");
    rig.run("$N0=G21 G54").unwrap();
    assert_eq!(rig.query("$N"), "$N0=G21 G54\r\n$N1=\r\n");
    assert_eq!(rig.run("$N1=$H"), Err(Status::InvalidArgument));
    assert_eq!(rig.run("$N1=[ESP444]"), Err(Status::InvalidArgument));
}

#[test]
fn test_store_usage_report() {
    let mut rig = Rig::new();
    rig.run("$0=10").unwrap();
    assert_eq!(rig.query("$NVS"), "[MSG: NVS Used:1 Free:503 Total:504]\r\n");
}

#[test]
fn test_build_info_store_and_report() {
    let mut rig = Rig::new();
    assert_eq!(rig.query("$I"), format!("[VER:{}:]\r\n", VERSION));
    rig.run("$I=bench mill").unwrap();
    assert_eq!(rig.query("$i"), format!("[VER:{}:bench mill]\r\n", VERSION));
    let long = format!("$I={}", "x".repeat(81));
    assert_eq!(rig.run(&long), Err(Status::LineLengthExceeded));
}

#[test]
fn test_parameters_report() {
    let mut rig = Rig::new();
    coords::write(&rig.store, CoordSystem::G55, &[1.0, 2.0, 3.0]).unwrap();
    let out = rig.query("$#");
    assert!(out.starts_with("[G54:0.000,0.000,0.000]\r\n[G55:1.000,2.000,3.000]\r\n"));
    assert!(out.ends_with("[G30:0.000,0.000,0.000]\r\n"));
}

#[test]
fn test_gcode_modes_and_help() {
    let mut rig = Rig::new();
    assert!(rig.query("$G").starts_with("[GC:"));
    assert!(rig.query("$").starts_with("[HLP:"));
}

#[test]
fn test_restore_all_resets_values_and_build_info() {
    let mut rig = Rig::new();
    rig.run("$0=10").unwrap();
    rig.run("$Spindle/Type=Laser").unwrap();
    rig.run("$N0=G20").unwrap();
    rig.run("$Hostname=shop").unwrap();
    rig.run("$I=custom").unwrap();

    assert_eq!(rig.run("$RST=all"), Ok(()));

    assert_eq!(rig.query("$0"), "0=3\r\n");
    assert_eq!(rig.settings.spindle_type.string_value(), "PWM");
    assert_eq!(&*rig.settings.startup_lines[0].get(), "");
    assert_eq!(&*rig.settings.hostname.get(), "grblesp");
    assert_eq!(rig.store.get("Build/Text"), Some(vec![0, 0]));
}

#[test]
fn test_restore_defaults_keeps_startup_lines_and_network() {
    let mut rig = Rig::new();
    rig.run("$0=10").unwrap();
    rig.run("$N0=G20").unwrap();
    rig.run("$Hostname=shop").unwrap();

    rig.run("$RST=$").unwrap();

    assert_eq!(rig.settings.step_pulse_us.get(), 3);
    assert_eq!(&*rig.settings.startup_lines[0].get(), "G20");
    assert_eq!(&*rig.settings.hostname.get(), "shop");
}

#[test]
fn test_restore_wifi_only_touches_network() {
    let mut rig = Rig::new();
    rig.run("$0=10").unwrap();
    rig.run("$Hostname=shop").unwrap();
    rig.run("$RST=@").unwrap();
    assert_eq!(rig.settings.step_pulse_us.get(), 10);
    assert_eq!(&*rig.settings.hostname.get(), "grblesp");
}

#[test]
fn test_restore_parameters_zeroes_coordinates() {
    let mut rig = Rig::new();
    coords::write(&rig.store, CoordSystem::G54, &[5.0, 5.0, 5.0]).unwrap();
    rig.run("$RST=#").unwrap();
    assert_eq!(coords::read(&rig.store, CoordSystem::G54, 3), vec![0.0; 3]);
}

#[test]
fn test_restore_unknown_scope() {
    let mut rig = Rig::new();
    assert_eq!(rig.run("$RST=everything"), Err(Status::InvalidStatement));
    assert_eq!(rig.run("$RST="), Err(Status::InvalidStatement));
}

#[test]
fn test_homing_disabled_has_no_side_effects() {
    let mut rig = Rig::new();
    assert_eq!(rig.run("$H"), Err(Status::SettingDisabled));
    assert!(rig.machine.homing_cycles.is_empty());
    assert_eq!(rig.machine.state(), MachineState::Idle);
}

#[test]
fn test_homing_blocked_by_door() {
    let mut rig = Rig::new();
    rig.run("$22=1").unwrap();
    rig.machine.door_open = true;
    assert_eq!(rig.run("$H"), Err(Status::DoorBlocked));
    assert!(rig.machine.homing_cycles.is_empty());
}

#[test]
fn test_home_all_runs_startup_lines() {
    let mut rig = Rig::new();
    rig.run("$22=1").unwrap();
    rig.run("$N0=G21").unwrap();
    rig.take_output();

    assert_eq!(rig.run("$H"), Ok(()));
    assert_eq!(rig.machine.homing_cycles, vec![HomingCycle::All]);
    assert_eq!(rig.machine.state(), MachineState::Idle);
    assert_eq!(rig.machine.steppers_idled, 1);
    assert_eq!(rig.machine.lines(), vec!["G21"]);
    assert_eq!(rig.take_output(), ">G21:ok\r\n");
}

#[test]
fn test_single_axis_homing() {
    let mut rig = Rig::new();
    rig.run("$22=1").unwrap();
    rig.run("$N0=G21").unwrap();
    assert_eq!(rig.run("$hy"), Ok(()));
    assert_eq!(rig.machine.homing_cycles, vec![HomingCycle::Axis(Axis::Y)]);
    assert!(rig.machine.executed.is_empty());
    assert_eq!(rig.run("$HA"), Err(Status::InvalidStatement));
}

#[test]
fn test_aborted_homing_stays_in_homing() {
    let mut rig = Rig::new();
    rig.run("$22=1").unwrap();
    rig.machine.abort = true;
    assert_eq!(rig.run("$H"), Ok(()));
    assert_eq!(rig.machine.state(), MachineState::Homing);
    assert_eq!(rig.machine.steppers_idled, 0);
}

#[test]
fn test_startup_line_failure_is_reported() {
    let mut rig = Rig::new();
    rig.run("$22=1").unwrap();
    rig.run("$N1=G99").unwrap();
    rig.machine.fail_code = Some(20);
    rig.take_output();
    rig.run("$H").unwrap();
    assert_eq!(rig.take_output(), ">G99:error:20\r\n");
}

#[test]
fn test_unlock() {
    let mut rig = Rig::new();
    rig.machine.set_state(MachineState::Alarm);
    rig.machine.door_open = true;
    assert_eq!(rig.run("$X"), Err(Status::DoorBlocked));
    assert_eq!(rig.machine.state(), MachineState::Alarm);

    rig.machine.door_open = false;
    assert_eq!(rig.query("$X"), "[MSG:Caution: Unlocked]\r\n");
    assert_eq!(rig.machine.state(), MachineState::Idle);
}

#[test]
fn test_check_mode_toggle() {
    let mut rig = Rig::new();
    assert_eq!(rig.query("$C"), "[MSG:Enabled]\r\n");
    assert_eq!(rig.machine.state(), MachineState::CheckMode);
    assert_eq!(rig.query("$C"), "[MSG:Disabled]\r\n");
    assert_eq!(rig.machine.state(), MachineState::Idle);

    rig.machine.set_state(MachineState::Alarm);
    assert_eq!(rig.run("$C"), Err(Status::IdleStateRequired));
}

#[test]
fn test_jog_forwarded_when_idle() {
    let mut rig = Rig::new();
    assert_eq!(rig.run("$J=G91 X1 F100"), Ok(()));
    assert_eq!(rig.machine.lines(), vec!["$J=G91 X1 F100"]);

    rig.machine.set_state(MachineState::Cycle);
    assert_eq!(rig.run("$J=G91 X1 F100"), Err(Status::IdleStateRequired));
    assert_eq!(rig.machine.executed.len(), 1);
}

#[test]
fn test_sleep() {
    let mut rig = Rig::new();
    rig.run("$SLP").unwrap();
    assert!(rig.machine.sleep_requested);
}

#[test]
fn test_ui_commands_gated_by_auth_level() {
    let mut rig = Rig::new();
    assert_eq!(
        rig.run_as("[ESP401]P=Hostname V=lathe", AuthLevel::Guest),
        Err(Status::AuthenticationFailed)
    );
    assert_eq!(
        rig.run_as("[ESP401]P=Hostname V=lathe", AuthLevel::User),
        Err(Status::AuthenticationFailed)
    );
    assert_eq!(&*rig.settings.hostname.get(), "grblesp");

    assert_eq!(rig.run_as("[ESP401]P=Hostname V=lathe", AuthLevel::Admin), Ok(()));
    assert_eq!(&*rig.settings.hostname.get(), "lathe");

    assert_eq!(rig.run_as("[ESP800]", AuthLevel::Guest), Ok(()));
    assert_eq!(rig.run_as("[ESP400]", AuthLevel::Guest), Err(Status::AuthenticationFailed));
    assert_eq!(rig.run_as("$J=G91 X1", AuthLevel::Guest), Err(Status::AuthenticationFailed));
}

#[test]
fn test_settings_json_lists_ui_settings() {
    let mut rig = Rig::new();
    let out = rig.query("[ESP400]");
    let doc: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
    let items = doc["EEPROM"].as_array().unwrap();
    assert!(items.iter().any(|i| i["P"] == "Hostname" && i["V"] == "grblesp"));
    assert!(items.iter().all(|i| i["P"] != "Stepper/Pulse"));
}

#[test]
fn test_set_by_ui_name_validates() {
    let mut rig = Rig::new();
    assert_eq!(rig.run("[ESP401]P=Hostname V=-bad"), Err(Status::InvalidArgument));
    assert_eq!(rig.run("[ESP401]V=x"), Err(Status::InvalidArgument));
    assert_eq!(rig.run("[ESP401]P=Nope V=x"), Err(Status::InvalidStatement));
}

#[test]
fn test_set_by_multi_word_ui_name() {
    let mut rig = Rig::new();
    assert_eq!(rig.run("[ESP401]P=Station SSID V=home"), Ok(()));
    let ssid = rig.settings.registry.find("Sta/SSID").and_then(|e| e.as_setting()).unwrap();
    assert_eq!(ssid.string_value(), "home");

    assert_eq!(rig.run("[ESP401]P=HTTP Port T=I V=8080"), Ok(()));
    assert_eq!(rig.settings.http_port.get(), 8080);
}

#[test]
fn test_restart_and_firmware_info() {
    let mut rig = Rig::new();
    assert_eq!(rig.query("[ESP444]"), "[MSG:Restart ongoing]\r\n");
    assert!(rig.machine.restart_requested);
    let info = rig.query("[ESP800]");
    assert!(info.contains("hostname:grblesp"));
    assert!(info.contains("axis:3"));
}

#[test]
fn test_bare_entry_point() {
    let mut rig = Rig::new();
    assert_eq!(rig.bare("22"), Ok(()));
    assert_eq!(rig.take_output(), "22=Off\r\n");
    assert_eq!(rig.bare(" G "), Ok(()));
    assert!(rig.take_output().starts_with("[GC:"));
    assert_eq!(rig.bare("ESP400"), Err(Status::InvalidStatement));
    assert_eq!(rig.bare("nope"), Err(Status::InvalidStatement));
}
