//! services/api/src/adapters/raw_llm.rs
//!
//! Adapter for raw text-completion providers that take a single `inputs`
//! string (Hugging Face inference style).

use async_trait::async_trait;
use itinerary_core::ports::{
    ensure_prompt, ProviderError, ProviderResult, TextGenerationProvider,
};
use serde::{Deserialize, Serialize};

use crate::adapters::http::ProviderHttp;

#[derive(Serialize)]
struct RawCompletionRequest<'a> {
    inputs: &'a str,
    parameters: RawCompletionParameters,
}

#[derive(Serialize)]
struct RawCompletionParameters {
    /// Without this the provider echoes the prompt in front of the answer.
    return_full_text: bool,
}

/// Text-generation replies come back either as a list or as a single object.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCompletionReply {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: Option<String>,
}

impl RawCompletionReply {
    fn into_text(self) -> Option<String> {
        let first = match self {
            Self::Batch(items) => items.into_iter().next()?,
            Self::Single(item) => item,
        };
        first
            .generated_text
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}

/// An adapter that implements `TextGenerationProvider` against a raw completion endpoint.
#[derive(Clone)]
pub struct RawCompletionProvider {
    http: ProviderHttp,
    endpoint: String,
}

impl RawCompletionProvider {
    /// Creates a provider posting to `{base_url}/models/{model}`.
    pub fn new(http: ProviderHttp, base_url: &str, model: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/models/{}", base_url.trim_end_matches('/'), model),
        }
    }
}

#[async_trait]
impl TextGenerationProvider for RawCompletionProvider {
    async fn generate(&self, prompt: &str) -> ProviderResult<String> {
        let prompt = ensure_prompt(prompt)?;
        let request = RawCompletionRequest {
            inputs: prompt,
            parameters: RawCompletionParameters {
                return_full_text: false,
            },
        };

        let body = self.http.post_json(&self.endpoint, &request).await?;

        RawCompletionReply::deserialize(&body)
            .ok()
            .and_then(RawCompletionReply::into_text)
            .ok_or_else(|| ProviderError::no_itinerary().with_raw(body))
    }
}
