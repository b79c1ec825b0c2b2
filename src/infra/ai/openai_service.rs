use crate::domain::ports::LlmService;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{error, info, warn, instrument};
use std::time::Duration;
use tokio::time::sleep;

const MAX_RETRIES: u32 = 2;
const INITIAL_BACKOFF_MS: u64 = 500;

/// Client for OpenAI-compatible chat completion endpoints.
pub struct OpenAiService {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiService {
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_url,
            api_key,
            model,
        }
    }

    async fn send_request_with_retry(&self, payload: &Value) -> Result<String, AppError> {
        let mut retries = 0;
        let mut backoff = INITIAL_BACKOFF_MS;

        loop {
            let res = self.client.post(&self.api_url)
                .bearer_auth(&self.api_key)
                .json(payload)
                .send()
                .await;

            match res {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body: Value = response.json().await.map_err(|e| {
                            error!("Failed to parse completion response JSON: {:?}", e);
                            AppError::Internal
                        })?;
                        return extract_content(&body);
                    } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        if retries >= MAX_RETRIES {
                            error!("Completion API failed after {} retries. Status: {}", retries, status);
                            let text = response.text().await.unwrap_or_default();
                            return Err(AppError::InternalWithMsg(format!("AI Provider Error: {} - {}", status, text)));
                        }
                        warn!("Completion API transient error {}. Retrying in {}ms...", status, backoff);
                    } else {
                        let text = response.text().await.unwrap_or_default();
                        error!("Completion API terminal error {}: {}", status, text);
                        return Err(AppError::InternalWithMsg(format!("AI Request Rejected: {} - {}", status, text)));
                    }
                },
                Err(e) => {
                    if retries >= MAX_RETRIES {
                        error!("Completion network error after {} retries: {:?}", retries, e);
                        return Err(AppError::InternalWithMsg(format!("AI Network Error: {}", e)));
                    }
                    warn!("Completion network error. Retrying in {}ms... {:?}", backoff, e);
                }
            }

            sleep(Duration::from_millis(backoff)).await;
            retries += 1;
            backoff *= 2;
        }
    }
}

fn extract_content(body: &Value) -> Result<String, AppError> {
    if let Some(choice) = body.get("choices").and_then(|c| c.as_array()).and_then(|c| c.first()) {
        if let Some(reason) = choice.get("finish_reason").and_then(|r| r.as_str())
            && reason == "content_filter" {
            warn!("Completion blocked by provider content filter");
            return Err(AppError::InternalWithMsg("AI response blocked by content filter".to_string()));
        }

        if let Some(text) = choice.get("message")
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            && !text.trim().is_empty() {
            return Ok(text.trim().to_string());
        }
    }

    error!("Invalid or unexpected completion response structure: {:?}", body);
    Err(AppError::InternalWithMsg("AI response missing content".to_string()))
}

#[async_trait]
impl LlmService for OpenAiService {
    #[instrument(skip_all, fields(prompt_len = prompt.len(), model = %self.model))]
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str
    ) -> Result<String, AppError> {
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_instruction },
                { "role": "user", "content": prompt }
            ],
            "temperature": 0.3
        });

        info!("Sending completion request...");
        let result = self.send_request_with_retry(&payload).await?;
        info!("Completion received.");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_first_choice() {
        let body = json!({
            "choices": [{ "message": { "role": "assistant", "content": "  We open at 9am.  " }, "finish_reason": "stop" }]
        });
        assert_eq!(extract_content(&body).unwrap(), "We open at 9am.");
    }

    #[test]
    fn test_rejects_filtered_or_empty_responses() {
        let filtered = json!({ "choices": [{ "message": { "content": "x" }, "finish_reason": "content_filter" }] });
        assert!(extract_content(&filtered).is_err());

        let empty = json!({ "choices": [] });
        assert!(extract_content(&empty).is_err());

        let blank = json!({ "choices": [{ "message": { "content": "   " } }] });
        assert!(extract_content(&blank).is_err());
    }
}
