use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Pin {pin} is not an output of the pin map")]
    UnknownOutput { pin: String },

    #[error("Line {pin} failed: {message}")]
    LineError { pin: String, message: String },

    #[error("Invalid fault '{spec}': {reason}")]
    FaultSpecError { spec: String, reason: String },
}

impl ClipError {
    pub fn line(pin: impl ToString, message: impl Into<String>) -> Self {
        ClipError::LineError {
            pin: pin.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClipError>;
