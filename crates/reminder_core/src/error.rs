use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("invalid_input - {0}")]
    InvalidInput(String),
    #[error("invalid_data - {0}")]
    InvalidData(String),
    #[error("io_error - {0}")]
    Io(String),
    #[error("unsupported - {0}")]
    Unsupported(String),
}

impl AppError {
    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn unsupported<M: Into<String>>(message: M) -> Self {
        Self::Unsupported(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::Io(_) => "io_error",
            Self::Unsupported(_) => "unsupported",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(message)
            | Self::InvalidData(message)
            | Self::Io(message)
            | Self::Unsupported(message) => message,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}
