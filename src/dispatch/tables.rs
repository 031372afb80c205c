//! Bare `$` commands and restore scope tokens

use super::{actions, reports, Context};
use crate::settings::RestoreFlags;
use crate::status::CommandResult;

/// Zero-argument command descriptor
pub struct DollarCommand {
    pub key: &'static str,
    pub brief: &'static str,
    pub handler: fn(&mut Context<'_>) -> CommandResult,
}

/// All bare commands, matched case-insensitively
pub static DOLLAR_COMMANDS: &[DollarCommand] = &[
    DollarCommand { key: "", brief: "Show help", handler: reports::help },
    DollarCommand { key: "$", brief: "Grbl settings", handler: reports::grbl_settings },
    DollarCommand { key: "+", brief: "Grbl and extended settings", handler: reports::extended_settings },
    DollarCommand { key: "S", brief: "All public settings by name", handler: reports::all_settings },
    DollarCommand { key: "G", brief: "G-code modal state", handler: reports::gcode_modes },
    DollarCommand { key: "C", brief: "Toggle check mode", handler: actions::toggle_check_mode },
    DollarCommand { key: "N", brief: "Startup lines", handler: reports::startup_lines },
    DollarCommand { key: "NVS", brief: "Store usage", handler: reports::store_usage },
    DollarCommand { key: "X", brief: "Clear alarm lock", handler: actions::unlock },
    DollarCommand { key: "#", brief: "Coordinate parameters", handler: reports::coordinates },
    DollarCommand { key: "H", brief: "Home all axes", handler: actions::home_all },
    DollarCommand { key: "HX", brief: "Home X", handler: actions::home_x },
    DollarCommand { key: "HY", brief: "Home Y", handler: actions::home_y },
    DollarCommand { key: "HZ", brief: "Home Z", handler: actions::home_z },
    DollarCommand { key: "HA", brief: "Home A", handler: actions::home_a },
    DollarCommand { key: "HB", brief: "Home B", handler: actions::home_b },
    DollarCommand { key: "HC", brief: "Home C", handler: actions::home_c },
    DollarCommand { key: "SLP", brief: "Sleep", handler: actions::sleep },
    DollarCommand { key: "I", brief: "Build info", handler: reports::version_info },
];

/// Key whose value selects restore scopes
pub const RESTORE_KEY: &str = "RST";

/// Restore scope token pair
pub struct RestoreScope {
    pub symbol: &'static str,
    pub word: &'static str,
    pub flags: RestoreFlags,
}

pub static RESTORE_SCOPES: &[RestoreScope] = &[
    RestoreScope { symbol: "$", word: "settings", flags: RestoreFlags::DEFAULTS },
    RestoreScope { symbol: "#", word: "gcode", flags: RestoreFlags::PARAMETERS },
    RestoreScope { symbol: "*", word: "all", flags: RestoreFlags::ALL },
    RestoreScope { symbol: "@", word: "wifi", flags: RestoreFlags::WIFI },
];

pub fn find_dollar(key: &str) -> Option<&'static DollarCommand> {
    DOLLAR_COMMANDS.iter().find(|c| c.key.eq_ignore_ascii_case(key))
}

pub fn find_restore(token: &str) -> Option<RestoreFlags> {
    RESTORE_SCOPES
        .iter()
        .find(|s| s.symbol == token || s.word.eq_ignore_ascii_case(token))
        .map(|s| s.flags)
}
