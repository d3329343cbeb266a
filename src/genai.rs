use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GenAiConfig;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[async_trait]
pub trait GenAi: Send + Sync {
    /// Run one completion. `Ok(None)` means the API answered without any
    /// candidate content; transport and HTTP failures are `Err`.
    async fn generate(&self, prompt: &str) -> anyhow::Result<Option<String>>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GenAiConfig,
}

impl GeminiClient {
    pub fn new(config: GenAiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl GenAi for GeminiClient {
    async fn generate(&self, prompt: &str) -> anyhow::Result<Option<String>> {
        let url = format!(
            "{API_BASE}/models/{}:generateContent?key={}",
            self.config.model, self.config.api_key
        );
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        let resp = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("genai request")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("genai API error: {status}: {body}");
        }

        let reply: GenerateResponse = resp.json().await.context("decode genai response")?;
        let text = first_candidate_text(reply);
        debug!(model = %self.config.model, has_text = text.is_some(), "genai reply received");
        Ok(text)
    }
}

fn first_candidate_text(reply: GenerateResponse) -> Option<String> {
    let parts = reply
        .candidates?
        .into_iter()
        .next()?
        .content?
        .parts?;
    let text: String = parts.into_iter().filter_map(|p| p.text).collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_candidate_text() {
        let reply: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "hello "}, {"text": "world"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(first_candidate_text(reply).as_deref(), Some("hello world"));
    }

    #[test]
    fn empty_candidates_yield_none() {
        let reply: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(first_candidate_text(reply).is_none());

        let reply: GenerateResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(first_candidate_text(reply).is_none());
    }

    #[test]
    fn candidate_without_content_yields_none() {
        let reply: GenerateResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert!(first_candidate_text(reply).is_none());
    }

    #[test]
    fn request_body_uses_camel_case_config() {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: "hi" }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: 64,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 64);
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
    }
}
