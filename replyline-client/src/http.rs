use async_trait::async_trait;
use replyline_core::ClientConfig;
use replyline_protocol::envelope::ApiEnvelope;
use replyline_protocol::knowledge::{KnowledgeUploadRequest, KnowledgeUploadResponse};
use replyline_protocol::payload::SubmitPayload;
use replyline_protocol::record::DeployedRuleRecord;
use replyline_protocol::types::AutomationKind;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::{ParseError, Url};

use crate::api::{ActivationAction, AutomationApi};
use crate::error::ClientError;

/// reqwest implementation of [`AutomationApi`].
#[derive(Clone)]
pub struct HttpAutomationClient {
    http: reqwest::Client,
    base_url: Url,
    api_token: Option<String>,
}

impl HttpAutomationClient {
    /// Creates a client bound to the configured base URL, timeout and token.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: with_trailing_slash(config.api_url.clone()),
            api_token: config.api_token.clone(),
        })
    }

    /// Client against `base_url` with default settings.
    pub fn with_base_url(base_url: &str) -> Result<Self, ClientError> {
        let url = Url::parse(base_url).map_err(|err| ClientError::InvalidUrl {
            url: base_url.to_string(),
            source: err,
        })?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: with_trailing_slash(url),
            api_token: None,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
                source: err,
            })
    }

    /// `automations/{kind}/{id}[/{action}]`, with each segment percent-encoded.
    fn automation_url(
        &self,
        kind: AutomationKind,
        automation_id: &str,
        action: Option<ActivationAction>,
    ) -> Result<Url, ClientError> {
        let mut url = self.endpoint("automations/")?;
        {
            let mut segments = url.path_segments_mut().map_err(|()| ClientError::InvalidUrl {
                url: self.base_url.to_string(),
                source: ParseError::RelativeUrlWithCannotBeABaseBase,
            })?;
            segments
                .pop_if_empty()
                .push(kind.path_segment())
                .push(automation_id);
            if let Some(action) = action {
                segments.push(action.path_segment());
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "automation request");
        let builder = self.http.request(method, url);
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let mut path = url.path().trim_end_matches('/').to_string();
        path.push('/');
        url.set_path(&path);
    }
    url
}

async fn parse_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<ApiEnvelope<T>, ClientError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<ApiEnvelope<T>>()
            .await
            .map_err(|err| ClientError::Decode(err.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    if let Ok(envelope) = serde_json::from_str::<ApiEnvelope<Value>>(&body) {
        if let Err(rejected) = envelope.into_result() {
            return Err(rejected.into());
        }
    }
    Err(ClientError::UnexpectedStatus { status, body })
}

#[async_trait]
impl AutomationApi for HttpAutomationClient {
    async fn submit(
        &self,
        payload: &SubmitPayload,
    ) -> Result<ApiEnvelope<DeployedRuleRecord>, ClientError> {
        let url = self.endpoint(&format!("automations/{}", payload.kind().path_segment()))?;
        let response = self.request(Method::POST, url).json(payload).send().await?;
        parse_response(response).await
    }

    async fn list(
        &self,
        platform_user_id: &str,
    ) -> Result<ApiEnvelope<Vec<DeployedRuleRecord>>, ClientError> {
        let mut url = self.endpoint("automations")?;
        url.query_pairs_mut()
            .append_pair("platform_user_id", platform_user_id);
        let response = self.request(Method::GET, url).send().await?;
        parse_response(response).await
    }

    async fn set_activation(
        &self,
        kind: AutomationKind,
        automation_id: &str,
        action: ActivationAction,
    ) -> Result<ApiEnvelope<Value>, ClientError> {
        let url = self.automation_url(kind, automation_id, Some(action))?;
        let response = self.request(Method::POST, url).send().await?;
        parse_response(response).await
    }

    async fn delete(
        &self,
        kind: AutomationKind,
        automation_id: &str,
    ) -> Result<ApiEnvelope<Value>, ClientError> {
        let url = self.automation_url(kind, automation_id, None)?;
        let response = self.request(Method::DELETE, url).send().await?;
        parse_response(response).await
    }

    async fn upload_knowledge(
        &self,
        request: &KnowledgeUploadRequest,
    ) -> Result<ApiEnvelope<KnowledgeUploadResponse>, ClientError> {
        let url = self.endpoint("knowledge-base/files")?;
        let response = self.request(Method::POST, url).json(request).send().await?;
        parse_response(response).await
    }
}
