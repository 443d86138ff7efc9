use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, error};

use crate::config::LlmConfig;
use crate::llm::error::GatewayError;
use crate::llm::types::{ChatRequest, ChatResponse, Completion};
use crate::llm::ModelGateway;

#[derive(Debug, Clone)]
pub struct OpenAIClient {
    pub base_url: String,
    api_key: String,
    pub(crate) inner: reqwest::Client,
}

impl OpenAIClient {
    #[cfg(test)]
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        Self::with_llm_config(base_url, api_key, LlmConfig::default())
    }

    pub fn with_llm_config(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        cfg: LlmConfig,
    ) -> Result<Self, GatewayError> {
        let inner = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(cfg.connect_timeout_ms))
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            inner,
        })
    }

    pub(crate) fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let base = base.strip_suffix("/v1").unwrap_or(base).trim_end_matches('/');
        format!("{base}/v1/chat/completions")
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        // A key that is not a valid header value is sent without auth; the API answers 401.
        if let Ok(v) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, v);
        }
        headers
    }
}

#[async_trait]
impl ModelGateway for OpenAIClient {
    async fn complete(&self, req: ChatRequest) -> Result<Completion, GatewayError> {
        let url = self.endpoint();
        if let Ok(payload) = serde_json::to_string_pretty(&req) {
            debug!(payload=%payload, endpoint=%url, "sending chat.completions payload");
        }

        let resp = self
            .inner
            .post(&url)
            .headers(self.headers())
            .json(&req)
            .send()
            .await
            .inspect_err(|e| error!(err=%e, "llm chat send error"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(status=%status.as_u16(), body=%body, "llm chat non-success status");
            return Err(GatewayError::Status { status, body });
        }

        let text = resp.text().await?;
        let body: ChatResponse = serde_json::from_str(&text)
            .inspect_err(|e| error!(err=%e, "llm chat deserialize error"))?;

        if let Some(usage) = &body.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "llm token usage"
            );
        }

        let msg = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or(GatewayError::NoChoices)?;
        Ok(Completion {
            text: msg.content.unwrap_or_default(),
            tool_calls: msg.tool_calls,
        })
    }
}
