use std::fmt;
use std::error::Error;

pub type RotResult<T> = Result<T, ConfigError>;

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    UnknownArgument(String),
    MissingValue(String),
    InvalidNumber(String, String),
}
impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownArgument(arg) => {
                write!(f, "Unknown argument '{arg}'")
            }
            ConfigError::MissingValue(flag) => {
                write!(f, "Missing value for '{flag}'")
            }
            ConfigError::InvalidNumber(flag, value) => {
                write!(f, "Invalid number '{value}' for '{flag}'")
            }
        }
    }
}
impl Error for ConfigError {}
