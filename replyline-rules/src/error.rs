use std::path::PathBuf;

use replyline_protocol::types::{AutomationKind, TemplateType};
use thiserror::Error;

use crate::validator::ValidationError;

/// Draft cannot be expressed in the payload of the requested rule kind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializeError {
    #[error("{kind} automations cannot send a {template:?} template")]
    UnsupportedTemplate {
        kind: AutomationKind,
        template: TemplateType,
    },
    #[error("{kind} automations apply to every conversation and cannot be scoped to posts")]
    ScopeNotSupported { kind: AutomationKind },
}

impl SerializeError {
    pub fn user_message(&self) -> String {
        match self {
            SerializeError::UnsupportedTemplate { .. } => {
                "Comment replies can only send a plain text message.".to_string()
            }
            SerializeError::ScopeNotSupported { .. } => {
                "DM automations cannot be limited to specific posts.".to_string()
            }
        }
    }
}

/// Wire record that cannot be turned back into a draft.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HydrateError {
    #[error("reply template of type {declared:?} carries content of another shape")]
    TemplateMismatch { declared: TemplateType },
    #[error("reply template of type {0:?} has no content")]
    MissingTemplateContent(TemplateType),
    #[error("delayed schedule has no delay")]
    MissingDelay,
}

impl HydrateError {
    pub fn user_message(&self) -> String {
        format!("The automation could not be opened for editing: {self}.")
    }
}

/// Errors returned when loading draft documents from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("drafts path does not exist: {0}")]
    MissingPath(String),
    #[error("failed to read drafts from {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse drafts from {path}: {message}")]
    Parse { path: String, message: String },
    #[error("duplicate automation name detected: {name}")]
    DuplicateName { name: String },
}

impl LoadError {
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into().display().to_string(),
            source,
        }
    }

    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        LoadError::Parse {
            path: path.into().display().to_string(),
            message: message.into(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            LoadError::Io { path, source } => format!("Could not read {path}: {source}"),
            other => other.to_string(),
        }
    }
}

/// Anything that stops a draft from becoming a submission payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Serialize(#[from] SerializeError),
}

impl DraftError {
    pub fn user_message(&self) -> String {
        match self {
            DraftError::Validation(err) => err.user_message(),
            DraftError::Serialize(err) => err.user_message(),
        }
    }
}
