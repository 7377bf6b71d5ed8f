//! Chat-completion-style client for the cloud vision gateway.
//!
//! Every request passes the guard first: validation rejection and local
//! rate-limit denial both short-circuit before any network traffic. Remote
//! failures map to the fixed [`CloudError`] codes; response text is passed
//! through the TTS sanitizer because it is speech-bound by contract.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use refind_guard::{CloudRequest, RateLimiter, keys, sanitize_input, sanitize_tts_output, validate};
use refind_settings::{CloudSettings, RefindSettings};

use crate::errors::{CloudError, Result};
use crate::prompts::{SYSTEM_PROMPT, prompt_for};

/// Fallback spoken text when the gateway returns an empty choice.
const EMPTY_RESPONSE_TEXT: &str = "Unable to analyze image.";

/// Base64-encode raw JPEG bytes for the image attachment.
#[must_use]
pub fn encode_image_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text {
        text: String,
    },
    ImageUrl {
        image_url: ImageUrl,
    },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Guarded client for the multimodal gateway.
pub struct CloudVisionClient {
    http: reqwest::Client,
    config: CloudSettings,
    api_key: Option<String>,
    limiter: Arc<RateLimiter>,
}

impl CloudVisionClient {
    /// Build a client from settings. `api_key` is sent as a bearer token
    /// when present.
    pub fn new(
        config: CloudSettings,
        api_key: Option<String>,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            http,
            config,
            api_key,
            limiter,
        })
    }

    /// Build a client from the loaded settings, with the cloud-request
    /// limiter configured from the `limits` section.
    pub fn from_settings(settings: &RefindSettings, api_key: Option<String>) -> Result<Self> {
        let limit = &settings.limits.cloud_requests;
        let limiter = Arc::new(RateLimiter::new(
            limit.max_calls,
            Duration::from_secs(limit.window_secs),
        ));
        Self::new(settings.cloud.clone(), api_key, limiter)
    }

    /// Submit a request, optionally attaching a base64 JPEG frame.
    ///
    /// Returns the response text, already passed through the TTS sanitizer.
    pub async fn request(
        &self,
        request: &CloudRequest,
        image_base64: Option<&str>,
    ) -> Result<String> {
        let validation = validate(request);
        if !validation.valid {
            let reason = validation
                .reason
                .unwrap_or_else(|| "request rejected".to_owned());
            info!(task = %request.task, reason, "cloud request rejected by guard");
            return Err(CloudError::Rejected { reason });
        }

        if !self.limiter.is_allowed(keys::CLOUD_REQUESTS) {
            return Err(CloudError::RateLimited);
        }

        let prompt = prompt_for(&request.task, &sanitize_input(&request.input));
        let body = self.build_body(&prompt, image_base64);

        let url = format!("{}/chat/completions", self.config.base_url);
        debug!(%url, task = %request.task, "dispatching cloud request");

        let mut builder = self.http.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            // raw bodies stay in the logs, never in the returned error
            error!(status = status.as_u16(), body = %text, "cloud gateway error");
            return Err(match status.as_u16() {
                429 => CloudError::RateLimited,
                402 => CloudError::PaymentRequired,
                _ => CloudError::ServiceError,
            });
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!(error = %e, "cloud response parse failed");
            CloudError::ServiceError
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_else(|| EMPTY_RESPONSE_TEXT.to_owned());

        Ok(sanitize_tts_output(&content))
    }

    fn build_body<'a>(
        &'a self,
        prompt: &str,
        image_base64: Option<&str>,
    ) -> ChatCompletionRequest<'a> {
        let user_content = match image_base64 {
            Some(data) => MessageContent::Parts(vec![
                ContentPart::Text {
                    text: prompt.to_owned(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: format!("data:image/jpeg;base64,{data}"),
                    },
                },
            ]),
            None => MessageContent::Text(prompt.to_owned()),
        };

        ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(SYSTEM_PROMPT.to_owned()),
                },
                ChatMessage {
                    role: "user",
                    content: user_content,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }
}
