//! services/api/src/adapters/chat_llm.rs
//!
//! This module contains the adapter for chat-completion style providers
//! (OpenAI and compatible APIs). It implements the `TextGenerationProvider`
//! port from the `core` crate.

use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use itinerary_core::ports::{
    ensure_prompt, ProviderError, ProviderResult, TextGenerationProvider,
};
use serde::Deserialize;

use crate::adapters::http::ProviderHttp;

//=========================================================================================
// Reply Shape
//=========================================================================================

/// The part of a chat-completion reply the adapter reads.
///
/// Compatible servers often leave out `id`, `created` or `choices[].index`,
/// so only the path to the content is required.
#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl ChatReply {
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()?
            .message?
            .content
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TextGenerationProvider` using an OpenAI-compatible chat API.
#[derive(Clone)]
pub struct ChatCompletionProvider {
    http: ProviderHttp,
    endpoint: String,
    model: String,
    system_prompt: String,
}

impl ChatCompletionProvider {
    /// Creates a new `ChatCompletionProvider` posting to `{base_url}/chat/completions`.
    pub fn new(http: ProviderHttp, base_url: &str, model: String, system_prompt: String) -> Self {
        Self {
            http,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model,
            system_prompt,
        }
    }

    fn build_request(&self, prompt: &str) -> ProviderResult<CreateChatCompletionRequest> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt.as_str())
                .build()
                .map_err(|e| ProviderError::validation(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| ProviderError::validation(e.to_string()))?
                .into(),
        ];

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| ProviderError::validation(e.to_string()))
    }
}

//=========================================================================================
// `TextGenerationProvider` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextGenerationProvider for ChatCompletionProvider {
    /// Sends the prompt as the user turn of a chat and returns the first choice's text.
    async fn generate(&self, prompt: &str) -> ProviderResult<String> {
        let prompt = ensure_prompt(prompt)?;
        let request = self.build_request(prompt)?;

        let body = self.http.post_json(&self.endpoint, &request).await?;

        ChatReply::deserialize(&body)
            .ok()
            .and_then(ChatReply::into_text)
            .ok_or_else(|| ProviderError::no_itinerary().with_raw(body))
    }
}
