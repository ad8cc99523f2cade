use std::num::ParseFloatError;

use thiserror::Error;

// type alias for Result for use across the library
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Path data could not be scanned; `index` is the char offset of the failure
    #[error("Invalid path data at index {index}: {reason}")]
    InvalidPathSyntax { index: usize, reason: String },

    /// Path data did not start with a moveto command
    #[error("Path data must start with a moveto ('M' or 'm') command")]
    MissingMoveto,

    /// Matrix construction from an array or transform string failed
    #[error("Invalid matrix input: {0}")]
    InvalidMatrixInput(String),

    /// Shape record could not be converted to a path
    #[error("Unsupported shape: {0}")]
    UnsupportedShape(String),

    #[error("Invalid value for {0}: '{1}'")]
    InvalidValue(String, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Cli(String),

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn from_err<T>(err: T) -> Error
    where
        T: std::error::Error + Send + Sync + 'static,
    {
        Error::Other(Box::new(err))
    }

    pub(crate) fn syntax(index: usize, reason: impl Into<String>) -> Error {
        Error::InvalidPathSyntax {
            index,
            reason: reason.into(),
        }
    }
}

impl From<ParseFloatError> for Error {
    fn from(err: ParseFloatError) -> Error {
        Error::InvalidValue("number".to_string(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::syntax(4, "illegal number");
        assert_eq!(err.to_string(), "Invalid path data at index 4: illegal number");
        assert_eq!(
            Error::MissingMoveto.to_string(),
            "Path data must start with a moveto ('M' or 'm') command"
        );
        let err: Error = "x1.5".parse::<f64>().unwrap_err().into();
        assert!(matches!(err, Error::InvalidValue(..)));
    }
}
