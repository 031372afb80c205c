//! Status codes returned by every command path
//!
//! Numbers follow the Grbl `error:N` vocabulary so senders keep working.

use thiserror::Error;

/// Non-OK outcome of a dispatched line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Status {
    /// error:3 - unparseable line or unknown key
    #[error("invalid statement")]
    InvalidStatement,
    /// error:5 - feature gated off by another setting
    #[error("setting disabled")]
    SettingDisabled,
    /// error:8 - machine must be idle (or jogging)
    #[error("idle state required")]
    IdleStateRequired,
    /// error:11 - console line longer than the input buffer
    #[error("line overflow")]
    Overflow,
    /// error:13 - safety door open
    #[error("safety door ajar")]
    DoorBlocked,
    /// error:14 - stored text longer than its slot
    #[error("line length exceeded")]
    LineLengthExceeded,
    /// error:80 - value rejected by validator, parser or range check
    #[error("invalid value")]
    InvalidArgument,
    /// error:110 - caller lacks the access level for this command
    #[error("authentication failed")]
    AuthenticationFailed,
    /// Code passed through from the G-code interpreter
    #[error("interpreter error {0}")]
    Interpreter(u8),
}

impl Status {
    /// Numeric Grbl code
    pub fn code(&self) -> u8 {
        match self {
            Self::InvalidStatement => 3,
            Self::SettingDisabled => 5,
            Self::IdleStateRequired => 8,
            Self::Overflow => 11,
            Self::DoorBlocked => 13,
            Self::LineLengthExceeded => 14,
            Self::InvalidArgument => 80,
            Self::AuthenticationFailed => 110,
            Self::Interpreter(code) => *code,
        }
    }

    /// Map a raw interpreter code back onto the shared vocabulary
    pub fn from_code(code: u8) -> Self {
        match code {
            3 => Self::InvalidStatement,
            5 => Self::SettingDisabled,
            8 => Self::IdleStateRequired,
            11 => Self::Overflow,
            13 => Self::DoorBlocked,
            14 => Self::LineLengthExceeded,
            80 => Self::InvalidArgument,
            110 => Self::AuthenticationFailed,
            other => Self::Interpreter(other),
        }
    }
}

/// Result of dispatching one line
pub type CommandResult = Result<(), Status>;

/// Write the protocol acknowledgement for a finished line
pub fn write_status(out: &mut dyn core::fmt::Write, result: CommandResult) {
    let _ = match result {
        Ok(()) => write!(out, "ok\r\n"),
        Err(status) => write!(out, "error:{}\r\n", status.code()),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for status in [
            Status::InvalidStatement,
            Status::SettingDisabled,
            Status::IdleStateRequired,
            Status::Overflow,
            Status::DoorBlocked,
            Status::LineLengthExceeded,
            Status::InvalidArgument,
            Status::AuthenticationFailed,
            Status::Interpreter(22),
        ] {
            assert_eq!(Status::from_code(status.code()), status);
        }
    }

    #[test]
    fn test_write_status() {
        let mut out = String::new();
        write_status(&mut out, Ok(()));
        write_status(&mut out, Err(Status::DoorBlocked));
        assert_eq!(out, "ok\r\nerror:13\r\n");
    }
}
