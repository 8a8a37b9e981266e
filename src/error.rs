use std::fmt;

#[derive(Debug)]
pub enum LineworkError {
    InvalidConfiguration(String),
    Io(std::io::Error),
}

impl fmt::Display for LineworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineworkError::InvalidConfiguration(message) => {
                write!(f, "invalid configuration: {}", message)
            }
            LineworkError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for LineworkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LineworkError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LineworkError {
    fn from(value: std::io::Error) -> Self {
        LineworkError::Io(value)
    }
}
