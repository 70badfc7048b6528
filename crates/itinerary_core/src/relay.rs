//! crates/itinerary_core/src/relay.rs
//!
//! The itinerary relay: validates an incoming request, derives the prompt and
//! hands it to the configured `TextGenerationProvider`.
//!
//! The relay holds nothing but the provider handle, so any number of requests
//! may run through one instance concurrently.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::domain::{ItineraryRequest, ItineraryResult};
use crate::ports::{ProviderError, ProviderResult, TextGenerationProvider};

#[derive(Clone)]
pub struct ItineraryRelay {
    provider: Arc<dyn TextGenerationProvider>,
}

impl ItineraryRelay {
    pub fn new(provider: Arc<dyn TextGenerationProvider>) -> Self {
        Self { provider }
    }

    /// Relays one request to the provider and normalizes the outcome.
    pub async fn handle(&self, request: &ItineraryRequest) -> ProviderResult<ItineraryResult> {
        let prompt = request.resolve_prompt().map_err(|e| {
            warn!(kind = %e.kind, "Rejected itinerary request: {}", e.message);
            e
        })?;

        match self.provider.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => {
                let result = ItineraryResult::new(text);
                info!(
                    prompt_len = prompt.len(),
                    itinerary_len = result.text.len(),
                    generated_at = %result.generated_at,
                    "Itinerary generated"
                );
                Ok(result)
            }
            Ok(_) => {
                let e = ProviderError::no_itinerary();
                error!(kind = %e.kind, "Provider returned blank text");
                Err(e)
            }
            Err(e) => {
                error!(kind = %e.kind, raw = ?e.raw, "Itinerary generation failed: {}", e.message);
                Err(e)
            }
        }
    }

    /// Like `handle`, but gives up as soon as `cancel` fires.
    ///
    /// A cancelled caller gets `None`; the in-flight provider call is dropped.
    pub async fn handle_until_cancelled(
        &self,
        request: &ItineraryRequest,
        cancel: &CancellationToken,
    ) -> Option<ProviderResult<ItineraryResult>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Itinerary request cancelled by caller");
                None
            }
            outcome = self.handle(request) => Some(outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StructuredFields;
    use crate::ports::{ensure_prompt, ProviderErrorKind};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Echoes the prompt back and records every call.
    #[derive(Default)]
    struct RecordingProvider {
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl TextGenerationProvider for RecordingProvider {
        async fn generate(&self, prompt: &str) -> ProviderResult<String> {
            let prompt = ensure_prompt(prompt)?;
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(format!("itinerary for: {prompt}"))
        }
    }

    struct FailingProvider(ProviderError);

    #[async_trait]
    impl TextGenerationProvider for FailingProvider {
        async fn generate(&self, _prompt: &str) -> ProviderResult<String> {
            Err(self.0.clone())
        }
    }

    struct BlankProvider;

    #[async_trait]
    impl TextGenerationProvider for BlankProvider {
        async fn generate(&self, _prompt: &str) -> ProviderResult<String> {
            Ok("  \n".to_string())
        }
    }

    #[tokio::test]
    async fn structured_request_sends_derived_prompt() {
        let provider = Arc::new(RecordingProvider::default());
        let relay = ItineraryRelay::new(provider.clone());

        let request = ItineraryRequest::from_fields(StructuredFields {
            destination: "Paris".to_string(),
            days: 3,
            interests: "food".to_string(),
        });
        let result = relay.handle(&request).await.unwrap();

        assert_eq!(
            provider.prompts.lock().unwrap().as_slice(),
            ["Create a 3-day itinerary for a trip to Paris focusing on food."]
        );
        assert_eq!(
            result.text,
            "itinerary for: Create a 3-day itinerary for a trip to Paris focusing on food."
        );
    }

    #[tokio::test]
    async fn blank_prompt_never_reaches_provider() {
        let provider = Arc::new(RecordingProvider::default());
        let relay = ItineraryRelay::new(provider.clone());

        let err = relay
            .handle(&ItineraryRequest::from_prompt("   "))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ProviderErrorKind::Validation);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn one_request_makes_one_call() {
        let provider = Arc::new(RecordingProvider::default());
        let relay = ItineraryRelay::new(provider.clone());

        relay
            .handle(&ItineraryRequest::from_prompt("A weekend in Lisbon"))
            .await
            .unwrap();

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn provider_failure_is_passed_through() {
        let upstream = ProviderError::upstream(
            "rate limited",
            serde_json::json!({ "error": "rate limited" }),
        );
        let relay = ItineraryRelay::new(Arc::new(FailingProvider(upstream)));

        let err = relay
            .handle(&ItineraryRequest::from_prompt("Tokyo"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ProviderErrorKind::Upstream);
        assert_eq!(err.message, "rate limited");
        assert!(err.raw.is_some());
    }

    #[tokio::test]
    async fn blank_provider_text_maps_to_no_itinerary() {
        let relay = ItineraryRelay::new(Arc::new(BlankProvider));
        let err = relay
            .handle(&ItineraryRequest::from_prompt("Oslo"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ProviderErrorKind::InvalidResponse);
        assert_eq!(err.message, "No itinerary returned.");
    }

    #[tokio::test]
    async fn concurrent_requests_do_not_mix() {
        let provider = Arc::new(RecordingProvider {
            delay: Some(Duration::from_millis(10)),
            ..Default::default()
        });
        let relay = ItineraryRelay::new(provider.clone());

        let prompts: Vec<String> = (0..10).map(|i| format!("city number {i}")).collect();
        let outcomes = futures::future::join_all(prompts.iter().map(|prompt| {
            let relay = relay.clone();
            let request = ItineraryRequest::from_prompt(prompt.clone());
            async move { relay.handle(&request).await }
        }))
        .await;

        for (prompt, outcome) in prompts.iter().zip(outcomes) {
            assert_eq!(outcome.unwrap().text, format!("itinerary for: {prompt}"));
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn cancelled_caller_gets_nothing() {
        let provider = Arc::new(RecordingProvider {
            delay: Some(Duration::from_secs(30)),
            ..Default::default()
        });
        let relay = ItineraryRelay::new(provider);
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let outcome = relay
            .handle_until_cancelled(&ItineraryRequest::from_prompt("Cairo"), &cancel)
            .await;
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn uncancelled_caller_gets_result() {
        let relay = ItineraryRelay::new(Arc::new(RecordingProvider::default()));
        let cancel = CancellationToken::new();

        let outcome = relay
            .handle_until_cancelled(&ItineraryRequest::from_prompt("Quito"), &cancel)
            .await;
        assert_eq!(outcome.unwrap().unwrap().text, "itinerary for: Quito");
    }
}
