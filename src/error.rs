/// Application-level failure: a process exit code plus a message for stderr.
///
/// The engine itself never returns errors; only ingest, exports, and the CLI do.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    /// Exit code for input/config problems (missing file, bad JSON, bad flag value).
    pub const INPUT: u8 = 2;
    /// Exit code when inputs parse but leave nothing to report.
    pub const NO_DATA: u8 = 3;
    /// Exit code for failures writing exports.
    pub const OUTPUT: u8 = 4;

    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(Self::INPUT, message)
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(Self::NO_DATA, message)
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::new(Self::OUTPUT, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_carry_exit_codes() {
        let err = AppError::no_data("No observations found in any series.");
        assert_eq!(err.to_string(), "No observations found in any series.");
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.message(), "No observations found in any series.");
        assert!(format!("{err:?}").contains("exit_code: 3"));

        assert_eq!(AppError::input("x").exit_code(), AppError::INPUT);
        assert_eq!(AppError::output("x").exit_code(), AppError::OUTPUT);
    }
}
