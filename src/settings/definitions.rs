//! Every setting and UI command, registered in one fixed order:
//!
//! 1. Grbl core settings (`$0`..`$32`)
//! 2. Per-axis settings for each configured axis
//! 3. Extended settings (spindle, startup lines)
//! 4. Network settings (UI-visible, `ESPnnn`)
//! 5. UI and administrative commands

use std::sync::Arc;

use super::typed::EnumOptions;
use super::{
    ActionCommand, Axis, CommandFn, EntryMeta, EnumSetting, FlagSetting, FloatSetting, Group, IntSetting,
    IpAddrSetting, MachineProfile, Registry, RegistryError, Setting, StringSetting,
};
use crate::dispatch::{actions, web};

/// Longest startup line
pub const STARTUP_LINE_LEN: usize = 80;

pub const SPINDLE_TYPES: EnumOptions = &[
    ("None", 0),
    ("PWM", 1),
    ("Relay", 2),
    ("Laser", 3),
    ("DAC", 4),
    ("HuanYang", 5),
    ("BESC", 6),
    ("10V", 7),
];

pub const RADIO_MODES: EnumOptions = &[("None", 0), ("STA", 1), ("AP", 2), ("BT", 3)];

pub const IP_MODES: EnumOptions = &[("DHCP", 0), ("Static", 1)];

pub const ON_OFF: EnumOptions = &[("Disable", 0), ("Enable", 1)];

/// Handles for one axis
pub struct AxisSettings {
    pub axis: Axis,
    pub steps_per_mm: Arc<FloatSetting>,
    pub max_rate: Arc<FloatSetting>,
    pub acceleration: Arc<FloatSetting>,
    pub max_travel: Arc<FloatSetting>,
    pub run_current: Arc<FloatSetting>,
    pub hold_current: Arc<FloatSetting>,
    pub microsteps: Arc<IntSetting>,
    pub stallguard: Arc<IntSetting>,
}

/// The registry plus typed handles for the values other subsystems read
pub struct MachineSettings {
    pub registry: Registry,
    pub profile: &'static MachineProfile,
    pub step_pulse_us: Arc<IntSetting>,
    pub stepper_idle_lock_ms: Arc<IntSetting>,
    pub step_invert_mask: Arc<IntSetting>,
    pub dir_invert_mask: Arc<IntSetting>,
    pub invert_stepper_enable: Arc<FlagSetting>,
    pub invert_limit_pins: Arc<FlagSetting>,
    pub invert_probe_pin: Arc<FlagSetting>,
    pub status_report_mask: Arc<IntSetting>,
    pub junction_deviation: Arc<FloatSetting>,
    pub arc_tolerance: Arc<FloatSetting>,
    pub report_inches: Arc<FlagSetting>,
    pub soft_limits: Arc<FlagSetting>,
    pub hard_limits: Arc<FlagSetting>,
    pub homing_enable: Arc<FlagSetting>,
    pub homing_dir_mask: Arc<IntSetting>,
    pub homing_feed_rate: Arc<FloatSetting>,
    pub homing_seek_rate: Arc<FloatSetting>,
    pub homing_debounce_ms: Arc<IntSetting>,
    pub homing_pulloff: Arc<FloatSetting>,
    pub spindle_rpm_max: Arc<FloatSetting>,
    pub spindle_rpm_min: Arc<FloatSetting>,
    pub laser_mode: Arc<FlagSetting>,
    pub axes: Vec<AxisSettings>,
    pub spindle_type: Arc<EnumSetting>,
    pub spindle_pwm_freq: Arc<FloatSetting>,
    pub startup_lines: [Arc<StringSetting>; 2],
    pub laser_full_power: Arc<IntSetting>,
    pub hostname: Arc<StringSetting>,
    pub radio_mode: Arc<EnumSetting>,
    pub http_port: Arc<IntSetting>,
    /// Reset by the WiFi restore scope
    pub network: Vec<Setting>,
}

impl MachineSettings {
    /// Number of configured axes
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// True for the startup-line slots the defaults sweep normally keeps
    pub fn is_startup_line(&self, name: &str) -> bool {
        self.startup_lines.iter().any(|s| s.meta().name() == name)
    }
}

fn startup_line_ok(text: &str) -> bool {
    !text.chars().any(|c| c == '$' || c == '[')
}

fn hostname_ok(text: &str) -> bool {
    !text.starts_with('-') && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn password_ok(text: &str) -> bool {
    text.is_empty() || text.len() >= 8
}

fn grbl(name: &str, legacy: &str) -> EntryMeta {
    EntryMeta::new(Group::Grbl, name).legacy(legacy)
}

fn net(name: &str, legacy: &str, ui: &str) -> EntryMeta {
    EntryMeta::new(Group::WebUi, name).legacy(legacy).ui(ui)
}

/// Build the complete registry for `profile`. Values are still defaults;
/// call [`Registry::load`] afterwards.
pub fn register_all(profile: &'static MachineProfile) -> Result<MachineSettings, RegistryError> {
    let mut reg = Registry::new();
    let p = profile;

    // 1. Grbl core
    let step_pulse_us = reg.register(IntSetting::new(grbl("Stepper/Pulse", "0"), p.step_pulse_us, 3, 1000))?;
    let stepper_idle_lock_ms =
        reg.register(IntSetting::new(grbl("Stepper/IdleTime", "1"), p.stepper_idle_lock_ms, 0, 255))?;
    let step_invert_mask = reg.register(IntSetting::new(grbl("Stepper/StepInvert", "2"), p.step_invert_mask, 0, 63))?;
    let dir_invert_mask = reg.register(IntSetting::new(grbl("Stepper/DirInvert", "3"), p.dir_invert_mask, 0, 63))?;
    let invert_stepper_enable =
        reg.register(FlagSetting::new(grbl("Stepper/EnableInvert", "4"), p.invert_stepper_enable))?;
    let invert_limit_pins = reg.register(FlagSetting::new(grbl("Limits/Invert", "5"), p.invert_limit_pins))?;
    let invert_probe_pin = reg.register(FlagSetting::new(grbl("Probe/Invert", "6"), p.invert_probe_pin))?;
    let status_report_mask = reg.register(IntSetting::new(grbl("Report/Status", "10"), p.status_report_mask, 0, 3))?;
    let junction_deviation =
        reg.register(FloatSetting::new(grbl("GCode/JunctionDeviation", "11"), p.junction_deviation, 0.0, 10.0))?;
    let arc_tolerance = reg.register(FloatSetting::new(grbl("GCode/ArcTolerance", "12"), p.arc_tolerance, 0.0, 1.0))?;
    let report_inches = reg.register(FlagSetting::new(grbl("Report/Inches", "13"), p.report_inches))?;
    let soft_limits = reg.register(FlagSetting::new(grbl("Limits/Soft", "20"), p.soft_limits))?;
    let hard_limits = reg.register(FlagSetting::new(grbl("Limits/Hard", "21"), p.hard_limits))?;
    let homing_enable = reg.register(FlagSetting::new(grbl("Homing/Enable", "22"), p.homing_enable))?;
    let homing_dir_mask = reg.register(IntSetting::new(grbl("Homing/DirInvert", "23"), p.homing_dir_mask, 0, 63))?;
    let homing_feed_rate = reg.register(FloatSetting::new(grbl("Homing/Feed", "24"), p.homing_feed_rate, 0.0, 10000.0))?;
    let homing_seek_rate = reg.register(FloatSetting::new(grbl("Homing/Seek", "25"), p.homing_seek_rate, 0.0, 10000.0))?;
    let homing_debounce_ms =
        reg.register(IntSetting::new(grbl("Homing/Debounce", "26"), p.homing_debounce_ms, 0, 10000))?;
    let homing_pulloff = reg.register(FloatSetting::new(grbl("Homing/Pulloff", "27"), p.homing_pulloff, 0.0, 1000.0))?;
    let spindle_rpm_max = reg.register(FloatSetting::new(grbl("GCode/MaxS", "30"), p.spindle_rpm_max, 0.0, 100000.0))?;
    let spindle_rpm_min = reg.register(FloatSetting::new(grbl("GCode/MinS", "31"), p.spindle_rpm_min, 0.0, 100000.0))?;
    let laser_mode = reg.register(FlagSetting::new(grbl("GCode/LaserMode", "32"), p.laser_mode))?;

    // 2. Per axis
    let mut axes = Vec::with_capacity(p.axis_count);
    for (i, axis) in Axis::ALL.into_iter().take(p.axis_count).enumerate() {
        let d = &p.axes[i];
        let l = axis.letter();
        let axis_meta = |group: Group, what: &str| EntryMeta::new(group, format!("{}/{}", l, what)).axis(axis);
        let numbered = |base: usize, what: &str| axis_meta(Group::Grbl, what).legacy((base + i).to_string());

        axes.push(AxisSettings {
            axis,
            steps_per_mm: reg.register(FloatSetting::new(numbered(100, "StepsPerMm"), d.steps_per_mm, 1.0, 100000.0))?,
            max_rate: reg.register(FloatSetting::new(numbered(110, "MaxRate"), d.max_rate, 1.0, 100000.0))?,
            acceleration: reg.register(FloatSetting::new(numbered(120, "Acceleration"), d.acceleration, 1.0, 100000.0))?,
            max_travel: reg.register(FloatSetting::new(numbered(130, "MaxTravel"), d.max_travel, 0.0, 100000.0))?,
            run_current: reg.register(FloatSetting::new(
                axis_meta(Group::Extended, "Current/Run"),
                d.run_current,
                0.05,
                20.0,
            ))?,
            hold_current: reg.register(FloatSetting::new(
                axis_meta(Group::Extended, "Current/Hold"),
                d.hold_current,
                0.0,
                100.0,
            ))?,
            microsteps: reg.register(IntSetting::new(axis_meta(Group::Extended, "Microsteps"), d.microsteps, 1, 256))?,
            stallguard: reg.register(IntSetting::new(axis_meta(Group::Extended, "StallGuard"), d.stallguard, -64, 63))?,
        });
    }

    // 3. Extended
    let spindle_type = reg.register(EnumSetting::new(
        EntryMeta::new(Group::Extended, "Spindle/Type"),
        p.spindle_type,
        SPINDLE_TYPES,
    ))?;
    let spindle_pwm_freq = reg.register(FloatSetting::new(
        EntryMeta::new(Group::Extended, "Spindle/PWM/Frequency"),
        5000.0,
        0.0,
        100000.0,
    ))?;
    let startup_line = |n: usize| {
        StringSetting::new(
            EntryMeta::new(Group::Extended, format!("GCode/Line{}", n)).legacy(format!("N{}", n)),
            "",
        )
        .with_length(0, STARTUP_LINE_LEN)
        .with_checker(startup_line_ok)
    };
    let startup_lines = [reg.register(startup_line(0))?, reg.register(startup_line(1))?];
    let laser_full_power = reg.register(IntSetting::new(
        EntryMeta::new(Group::Extended, "Laser/FullPower"),
        1000,
        1,
        100000,
    ))?;

    // 4. Network
    let hostname = reg.register(
        StringSetting::new(net("Hostname", "ESP112", "Hostname"), "grblesp")
            .with_length(1, 32)
            .with_checker(hostname_ok),
    )?;
    let radio_mode = reg.register(EnumSetting::new(net("WiFi/Mode", "ESP110", "Radio mode"), 2, RADIO_MODES))?;
    let sta_ssid = reg.register(StringSetting::new(net("Sta/SSID", "ESP100", "Station SSID"), "").with_length(0, 32))?;
    let sta_password = reg.register(
        StringSetting::new(net("Sta/Password", "ESP101", "Station Password"), "")
            .with_length(0, 64)
            .with_checker(password_ok),
    )?;
    let sta_ip_mode = reg.register(EnumSetting::new(net("Sta/IPMode", "ESP102", "Station IP Mode"), 0, IP_MODES))?;
    let sta_ip = reg.register(IpAddrSetting::new(net("Sta/IP", "ESP103", "Station Static IP"), 0))?;
    let sta_gateway = reg.register(IpAddrSetting::new(
        EntryMeta::new(Group::WebUi, "Sta/Gateway").ui("Station Static Gateway"),
        0,
    ))?;
    let sta_netmask = reg.register(IpAddrSetting::from_text(
        EntryMeta::new(Group::WebUi, "Sta/Netmask").ui("Station Static Mask"),
        "255.255.255.0",
    )?)?;
    let ap_ssid = reg.register(StringSetting::new(net("AP/SSID", "ESP105", "AP SSID"), "GRBL_ESP").with_length(1, 32))?;
    let ap_password = reg.register(
        StringSetting::new(net("AP/Password", "ESP106", "AP Password"), "12345678")
            .with_length(0, 64)
            .with_checker(password_ok),
    )?;
    let ap_ip = reg.register(IpAddrSetting::from_text(net("AP/IP", "ESP107", "AP Static IP"), "192.168.0.1")?)?;
    let ap_channel = reg.register(IntSetting::new(net("AP/Channel", "ESP108", "AP Channel"), 1, 1, 14))?;
    let http_enable = reg.register(EnumSetting::new(net("Http/Enable", "ESP120", "HTTP protocol"), 1, ON_OFF))?;
    let http_port = reg.register(IntSetting::new(net("Http/Port", "ESP121", "HTTP Port"), 80, 1, 65001))?;
    let telnet_enable = reg.register(EnumSetting::new(net("Telnet/Enable", "ESP130", "Telnet protocol"), 1, ON_OFF))?;
    let telnet_port = reg.register(IntSetting::new(net("Telnet/Port", "ESP131", "Telnet Port"), 23, 1, 65001))?;

    let network: Vec<Setting> = vec![
        Arc::clone(&hostname).into(),
        Arc::clone(&radio_mode).into(),
        sta_ssid.into(),
        sta_password.into(),
        sta_ip_mode.into(),
        sta_ip.into(),
        sta_gateway.into(),
        sta_netmask.into(),
        ap_ssid.into(),
        ap_password.into(),
        ap_ip.into(),
        ap_channel.into(),
        http_enable.into(),
        Arc::clone(&http_port).into(),
        telnet_enable.into(),
        telnet_port.into(),
    ];

    // 5. Commands
    let command = |group: Group, name: &str, legacy: &str, action: CommandFn| {
        ActionCommand::new(EntryMeta::new(group, name).legacy(legacy), action)
    };
    reg.register(command(Group::WebCmdRu, "WebUI/List", "ESP400", web::list_settings_json))?;
    reg.register(command(Group::WebCmdWa, "WebUI/Set", "ESP401", web::set_by_ui_name))?;
    reg.register(command(Group::WebCmdWa, "System/Restart", "ESP444", web::restart))?;
    reg.register(command(Group::WebNoAuth, "Firmware/Info", "ESP800", web::firmware_info))?;
    reg.register(command(Group::WebCmdWu, "Jog", "J", actions::jog))?;
    reg.register(command(Group::WebCmdWa, "Build/Info", "I", actions::store_build_info))?;

    Ok(MachineSettings {
        registry: reg,
        profile,
        step_pulse_us,
        stepper_idle_lock_ms,
        step_invert_mask,
        dir_invert_mask,
        invert_stepper_enable,
        invert_limit_pins,
        invert_probe_pin,
        status_report_mask,
        junction_deviation,
        arc_tolerance,
        report_inches,
        soft_limits,
        hard_limits,
        homing_enable,
        homing_dir_mask,
        homing_feed_rate,
        homing_seek_rate,
        homing_debounce_ms,
        homing_pulloff,
        spindle_rpm_max,
        spindle_rpm_min,
        laser_mode,
        axes,
        spindle_type,
        spindle_pwm_freq,
        startup_lines,
        laser_full_power,
        hostname,
        radio_mode,
        http_port,
        network,
    })
}
