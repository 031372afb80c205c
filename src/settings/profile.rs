//! Machine profiles: compile-time default sets for `register_all()`.
//!
//! A profile mirrors a machine definition header: axis count plus every
//! default the registry is built with. The binary picks one by feature.

/// Per-axis defaults
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisDefaults {
    pub steps_per_mm: f32,
    /// mm/min
    pub max_rate: f32,
    /// mm/s^2
    pub acceleration: f32,
    /// mm, positive
    pub max_travel: f32,
    /// Amps
    pub run_current: f32,
    /// Percent of run current
    pub hold_current: f32,
    pub microsteps: i32,
    pub stallguard: i32,
}

impl AxisDefaults {
    pub const GENERIC: AxisDefaults = AxisDefaults {
        steps_per_mm: 100.0,
        max_rate: 1000.0,
        acceleration: 200.0,
        max_travel: 300.0,
        run_current: 0.25,
        hold_current: 50.0,
        microsteps: 16,
        stallguard: 16,
    };
}

/// Defaults for one machine
#[derive(Debug, Clone, PartialEq)]
pub struct MachineProfile {
    pub name: &'static str,
    /// Number of configured axes, 3..=6
    pub axis_count: usize,
    pub step_pulse_us: i32,
    pub stepper_idle_lock_ms: i32,
    pub step_invert_mask: i32,
    pub dir_invert_mask: i32,
    pub invert_stepper_enable: bool,
    pub invert_limit_pins: bool,
    pub invert_probe_pin: bool,
    pub status_report_mask: i32,
    pub junction_deviation: f32,
    pub arc_tolerance: f32,
    pub report_inches: bool,
    pub soft_limits: bool,
    pub hard_limits: bool,
    pub homing_enable: bool,
    pub homing_dir_mask: i32,
    pub homing_feed_rate: f32,
    pub homing_seek_rate: f32,
    pub homing_debounce_ms: i32,
    pub homing_pulloff: f32,
    pub spindle_rpm_max: f32,
    pub spindle_rpm_min: f32,
    pub laser_mode: bool,
    /// Ordinal into the spindle type table
    pub spindle_type: i8,
    pub axes: [AxisDefaults; 6],
}

impl MachineProfile {
    /// Stock Grbl defaults on a 3-axis board
    pub const fn generic() -> Self {
        Self {
            name: "Generic 3 Axis",
            axis_count: 3,
            step_pulse_us: 3,
            stepper_idle_lock_ms: 250,
            step_invert_mask: 0,
            dir_invert_mask: 0,
            invert_stepper_enable: false,
            invert_limit_pins: false,
            invert_probe_pin: false,
            status_report_mask: 1,
            junction_deviation: 0.01,
            arc_tolerance: 0.002,
            report_inches: false,
            soft_limits: false,
            hard_limits: false,
            homing_enable: false,
            homing_dir_mask: 3,
            homing_feed_rate: 200.0,
            homing_seek_rate: 2000.0,
            homing_debounce_ms: 250,
            homing_pulloff: 1.0,
            spindle_rpm_max: 1000.0,
            spindle_rpm_min: 0.0,
            laser_mode: false,
            spindle_type: 1,
            axes: [AxisDefaults::GENERIC; 6],
        }
    }

    /// External 4 Axis Driver Board V2 (Huanyang VFD spindle)
    pub const fn four_axis_external_driver() -> Self {
        let axis = AxisDefaults {
            steps_per_mm: 200.0,
            max_rate: 2000.0,
            acceleration: 200.0,
            max_travel: 300.0,
            ..AxisDefaults::GENERIC
        };
        Self {
            name: "External 4 Axis Driver Board V2",
            axis_count: 4,
            invert_limit_pins: true,
            homing_dir_mask: 3,
            homing_seek_rate: 1000.0,
            homing_pulloff: 3.0,
            spindle_type: 5,
            axes: [axis; 6],
            ..Self::generic()
        }
    }

    /// Pen/laser plotter with servo-driven Y and Z
    pub const fn servo_axis() -> Self {
        let x = AxisDefaults {
            steps_per_mm: 40.0,
            max_rate: 2000.0,
            acceleration: 50.0,
            max_travel: 300.0,
            ..AxisDefaults::GENERIC
        };
        let y = AxisDefaults { steps_per_mm: 100.0, max_travel: 100.0, ..x };
        let z = AxisDefaults { steps_per_mm: 100.0, max_travel: 100.0, ..x };
        Self {
            name: "MACHINE_SERVO_AXIS",
            axis_count: 3,
            stepper_idle_lock_ms: 250,
            invert_limit_pins: true,
            homing_seek_rate: 1000.0,
            homing_pulloff: 3.0,
            homing_dir_mask: 0,
            axes: [x, y, z, AxisDefaults::GENERIC, AxisDefaults::GENERIC, AxisDefaults::GENERIC],
            ..Self::generic()
        }
    }

    /// Profile selected by cargo feature
    pub const fn selected() -> Self {
        if cfg!(feature = "machine-4axis-external") {
            Self::four_axis_external_driver()
        } else if cfg!(feature = "machine-servo-axis") {
            Self::servo_axis()
        } else {
            Self::generic()
        }
    }
}

impl Default for MachineProfile {
    fn default() -> Self {
        Self::generic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_have_valid_axis_counts() {
        for p in [
            MachineProfile::generic(),
            MachineProfile::four_axis_external_driver(),
            MachineProfile::servo_axis(),
        ] {
            assert!((3..=6).contains(&p.axis_count), "{}", p.name);
        }
    }

    #[test]
    fn test_servo_axis_defaults() {
        let p = MachineProfile::servo_axis();
        assert_eq!(p.axes[0].steps_per_mm, 40.0);
        assert_eq!(p.axes[1].max_travel, 100.0);
        assert!(p.invert_limit_pins);
    }
}
