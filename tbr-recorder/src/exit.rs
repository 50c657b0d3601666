//! Process exit codes.
//!
//! 0: clean shutdown (SIGINT). 1: startup failure before capture was live.
//! 2: the capture handle died mid-run after a successful start.

use crate::recorder::CommandError;

/// Clean shutdown.
pub const SUCCESS: u8 = 0;

/// Bad arguments, capture could not be opened, or the log could not be
/// created.
pub const STARTUP_ERROR: u8 = 1;

/// The capture handle failed after startup.
pub const CAPTURE_RUNTIME_ERROR: u8 = 2;

/// Map a command error to its process exit code.
pub fn exit_code(error: &CommandError) -> u8 {
    match error {
        CommandError::InvalidArgument(_) => STARTUP_ERROR,
        CommandError::CaptureStart(_) => STARTUP_ERROR,
        CommandError::SinkOpen(_) => STARTUP_ERROR,
        CommandError::CaptureRuntime(_) => CAPTURE_RUNTIME_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliError;
    use tbr_capture::CaptureError;
    use tbr_fs::SinkError;

    #[test]
    fn test_invalid_argument_is_startup_error() {
        let error = CommandError::InvalidArgument(CliError::InvalidPort(0));
        assert_eq!(exit_code(&error), STARTUP_ERROR);
    }

    #[test]
    fn test_capture_start_is_startup_error() {
        let error = CommandError::CaptureStart(CaptureError::NoDevice);
        assert_eq!(exit_code(&error), STARTUP_ERROR);
    }

    #[test]
    fn test_sink_open_is_startup_error() {
        let error = CommandError::SinkOpen(SinkError::PermissionDenied);
        assert_eq!(exit_code(&error), STARTUP_ERROR);
    }

    #[test]
    fn test_capture_runtime_is_runtime_error() {
        let error = CommandError::CaptureRuntime(CaptureError::Read("handle closed".into()));
        assert_eq!(exit_code(&error), CAPTURE_RUNTIME_ERROR);
    }

    #[test]
    fn test_codes_are_distinct() {
        assert_ne!(SUCCESS, STARTUP_ERROR);
        assert_ne!(STARTUP_ERROR, CAPTURE_RUNTIME_ERROR);
        assert_ne!(SUCCESS, CAPTURE_RUNTIME_ERROR);
    }
}
