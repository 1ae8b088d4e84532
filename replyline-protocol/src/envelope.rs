use std::fmt;

use serde::{Deserialize, Serialize};

/// Response envelope returned by every automation API call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Splits the envelope on its `success` flag.
    pub fn into_result(self) -> Result<Option<T>, Rejected> {
        if self.success {
            Ok(self.data)
        } else {
            Err(Rejected {
                message: self
                    .message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| Rejected::DEFAULT_MESSAGE.to_string()),
            })
        }
    }
}

/// A `success: false` answer from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub message: String,
}

impl Rejected {
    pub const DEFAULT_MESSAGE: &'static str = "The request was rejected by the server.";
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
