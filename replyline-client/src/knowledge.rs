use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures::future::join_all;
use replyline_protocol::knowledge::{KnowledgeUploadRequest, KnowledgeUploadResponse};
use tracing::{debug, warn};

use crate::api::AutomationApi;
use crate::error::ClientError;

/// A document to add to the account's knowledge base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl KnowledgeDocument {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ClientError> {
        let bytes = fs::read(path).map_err(|err| ClientError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(file_name, bytes))
    }

    fn to_request(&self, platform_user_id: &str) -> KnowledgeUploadRequest {
        KnowledgeUploadRequest {
            platform_user_id: platform_user_id.to_string(),
            file_name: self.file_name.clone(),
            content_base64: STANDARD.encode(&self.bytes),
        }
    }
}

/// Uploads every document concurrently. The batch succeeds only if every
/// upload does; otherwise it fails as a whole.
pub async fn upload_batch<A>(
    api: &A,
    platform_user_id: &str,
    documents: &[KnowledgeDocument],
) -> Result<Vec<KnowledgeUploadResponse>, ClientError>
where
    A: AutomationApi + ?Sized,
{
    let requests: Vec<KnowledgeUploadRequest> = documents
        .iter()
        .map(|document| document.to_request(platform_user_id))
        .collect();
    let results = join_all(requests.iter().map(|request| api.upload_knowledge(request))).await;

    let mut uploaded = Vec::with_capacity(results.len());
    let mut failed = 0usize;
    for (request, result) in requests.iter().zip(results) {
        match result.and_then(|envelope| envelope.into_result().map_err(ClientError::from)) {
            Ok(Some(response)) => uploaded.push(response),
            Ok(None) => {
                failed += 1;
                warn!(file = %request.file_name, "knowledge upload returned no file");
            }
            Err(err) => {
                failed += 1;
                warn!(file = %request.file_name, error = %err, "knowledge upload failed");
            }
        }
    }

    if failed > 0 {
        return Err(ClientError::BatchFailed {
            total: documents.len(),
        });
    }
    debug!(count = uploaded.len(), "knowledge batch uploaded");
    Ok(uploaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HttpAutomationClient;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn documents() -> Vec<KnowledgeDocument> {
        vec![
            KnowledgeDocument::new("faq.txt", b"Opening hours: 9-17".to_vec()),
            KnowledgeDocument::new("prices.txt", b"Shirts: 20".to_vec()),
        ]
    }

    #[tokio::test]
    async fn uploads_every_document() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/knowledge-base/files"))
            .and(body_partial_json(json!({
                "file_name": "faq.txt",
                "content_base64": STANDARD.encode("Opening hours: 9-17")
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"success": true, "data": {"file_id": "f-1", "file_name": "faq.txt"}}),
            ))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/knowledge-base/files"))
            .and(body_partial_json(json!({"file_name": "prices.txt"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"success": true, "data": {"file_id": "f-2"}}),
            ))
            .mount(&server)
            .await;

        let client = HttpAutomationClient::with_base_url(&server.uri()).expect("client");
        let uploaded = upload_batch(&client, "ig-1", &documents())
            .await
            .expect("batch");
        assert_eq!(uploaded.len(), 2);
        assert_eq!(uploaded[0].file_id, "f-1");
    }

    #[tokio::test]
    async fn one_failure_fails_the_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/knowledge-base/files"))
            .and(body_partial_json(json!({"file_name": "faq.txt"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"success": true, "data": {"file_id": "f-1"}}),
            ))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/knowledge-base/files"))
            .and(body_partial_json(json!({"file_name": "prices.txt"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"success": false, "message": "File too large"}),
            ))
            .mount(&server)
            .await;

        let client = HttpAutomationClient::with_base_url(&server.uri()).expect("client");
        let err = upload_batch(&client, "ig-1", &documents())
            .await
            .expect_err("batch fails");
        assert!(matches!(err, ClientError::BatchFailed { total: 2 }));
        assert_eq!(
            err.user_message(),
            "Some files could not be uploaded. Please try again."
        );
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let client = HttpAutomationClient::with_base_url("http://127.0.0.1:9").expect("client");
        let uploaded = upload_batch(&client, "ig-1", &[]).await.expect("empty batch");
        assert!(uploaded.is_empty());
    }
}
