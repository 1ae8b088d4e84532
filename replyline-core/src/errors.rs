use thiserror::Error;

/// Result type used across the ReplyLine core crate.
pub type Result<T> = std::result::Result<T, ReplyLineError>;

/// Errors raised by the shared logging and rendering helpers.
#[derive(Debug, Error)]
pub enum ReplyLineError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("{0}")]
    General(String),
}

/// Dedicated configuration error used by the configuration module.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable is missing: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("failed to read config file {path}: {message}")]
    File { path: String, message: String },
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_name_the_offending_key() {
        let err = ConfigError::invalid("REPLYLINE_API_URL", "relative URL without a base");
        assert_eq!(
            err.to_string(),
            "invalid value for REPLYLINE_API_URL: relative URL without a base"
        );
    }
}
