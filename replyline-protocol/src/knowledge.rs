use serde::{Deserialize, Serialize};

/// One knowledge-base document sent for retrieval-augmented replies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeUploadRequest {
    pub platform_user_id: String,
    pub file_name: String,
    /// Standard base64 of the raw file bytes.
    pub content_base64: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeUploadResponse {
    pub file_id: String,
    #[serde(default)]
    pub file_name: Option<String>,
}
