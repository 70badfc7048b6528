pub mod chat_llm;
pub mod favorites_file;
pub mod http;
pub mod raw_llm;

pub use chat_llm::ChatCompletionProvider;
pub use favorites_file::JsonFileSlot;
pub use http::ProviderHttp;
pub use raw_llm::RawCompletionProvider;

use std::sync::Arc;

use itinerary_core::ports::TextGenerationProvider;

use crate::config::{Config, ProviderKind};
use crate::error::ApiError;

/// Builds the generation provider selected by `PROVIDER`.
pub fn build_provider(config: &Config) -> Result<Arc<dyn TextGenerationProvider>, ApiError> {
    let http = ProviderHttp::new(config.require_api_key()?, config.request_timeout)?;

    let provider: Arc<dyn TextGenerationProvider> = match config.provider {
        ProviderKind::Chat => Arc::new(ChatCompletionProvider::new(
            http,
            &config.provider_base_url,
            config.model_id.clone(),
            config.system_prompt.clone(),
        )),
        ProviderKind::Raw => Arc::new(RawCompletionProvider::new(
            http,
            &config.provider_base_url,
            &config.model_id,
        )),
    };
    Ok(provider)
}
