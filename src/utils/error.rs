use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration parse error in {field}: {message}")]
    ConfigParseError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("A stream run is already in progress on this instance")]
    StreamBusy,

    #[error("Worker thread failed: {message}")]
    WorkerFailed { message: String },

    #[error("Prime sink failed: {message}")]
    SinkFailed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Concurrency,
    Output,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl StreamError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StreamError::ConfigParseError { .. } | StreamError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            StreamError::StreamBusy | StreamError::WorkerFailed { .. } => {
                ErrorCategory::Concurrency
            }
            StreamError::SinkFailed { .. } | StreamError::SerializationError(_) => {
                ErrorCategory::Output
            }
            StreamError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            StreamError::StreamBusy => ErrorSeverity::Medium,
            StreamError::ConfigParseError { .. }
            | StreamError::InvalidConfigValueError { .. }
            | StreamError::SinkFailed { .. }
            | StreamError::SerializationError(_) => ErrorSeverity::High,
            StreamError::WorkerFailed { .. } | StreamError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            StreamError::ConfigParseError { .. } => {
                "Check that the configuration file is valid TOML".to_string()
            }
            StreamError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' in the config file or on the command line", field)
            }
            StreamError::StreamBusy => {
                "Wait for the running stream to finish before starting another".to_string()
            }
            StreamError::WorkerFailed { .. } => {
                "Re-run with --verbose to see where the worker stopped".to_string()
            }
            StreamError::SinkFailed { .. } | StreamError::IoError(_) => {
                "Check that the output stream is still open and writable".to_string()
            }
            StreamError::SerializationError(_) => {
                "Report this as a bug, the value could not be serialized".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            StreamError::ConfigParseError { message, .. } => {
                format!("Could not read the configuration: {}", message)
            }
            StreamError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is not valid: {}", field, reason)
            }
            StreamError::StreamBusy => "The prime stream is already running".to_string(),
            StreamError::WorkerFailed { .. } => "The prime worker stopped unexpectedly".to_string(),
            StreamError::SinkFailed { message } => format!("Could not deliver a prime: {}", message),
            StreamError::IoError(e) => format!("Output error: {}", e),
            StreamError::SerializationError(e) => format!("Could not encode output: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, StreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_is_retryable() {
        let err = StreamError::StreamBusy;
        assert_eq!(err.category(), ErrorCategory::Concurrency);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_invalid_value_mentions_field() {
        let err = StreamError::InvalidConfigValueError {
            field: "stream.report_every".to_string(),
            value: "0".to_string(),
            reason: "Value must be at least 1".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.recovery_suggestion().contains("stream.report_every"));
        assert!(err.to_string().contains("'0'"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: StreamError = io.into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
