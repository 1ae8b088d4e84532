use replyline_protocol::envelope::Rejected;
use replyline_protocol::types::ActivationStatus;
use replyline_rules::{DraftError, HydrateError};
use thiserror::Error;

use crate::lifecycle::LifecycleAction;

/// Failures talking to the automation backend.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid automation service url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("automation HTTP request failed: {0}")]
    Http(String),
    #[error("automation service returned unexpected status {status}: {body}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to decode automation response: {0}")]
    Decode(String),
    #[error("automation service rejected the request: {message}")]
    Rejected { message: String },
    #[error("{total} file batch failed to upload")]
    BatchFailed { total: usize },
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}

impl ClientError {
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Rejected { message } => message.clone(),
            ClientError::BatchFailed { .. } => {
                "Some files could not be uploaded. Please try again.".to_string()
            }
            ClientError::Http(_) | ClientError::UnexpectedStatus { .. } => {
                "Could not reach the automation service. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<Rejected> for ClientError {
    fn from(value: Rejected) -> Self {
        ClientError::Rejected {
            message: value.message,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        ClientError::Http(value.to_string())
    }
}

/// Failures of a lifecycle action or a submission.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("automation not found: {0}")]
    NotFound(String),
    #[error("cannot {action} automation {automation_id} while it is {from}")]
    InvalidTransition {
        automation_id: String,
        from: ActivationStatus,
        action: LifecycleAction,
    },
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Hydrate(#[from] HydrateError),
    #[error(transparent)]
    Remote(#[from] ClientError),
}

impl LifecycleError {
    pub fn user_message(&self) -> String {
        match self {
            LifecycleError::NotFound(_) => {
                "That automation no longer exists. Refresh the list.".to_string()
            }
            LifecycleError::Draft(err) => err.user_message(),
            LifecycleError::Hydrate(err) => err.user_message(),
            LifecycleError::Remote(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}
