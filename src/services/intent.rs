// ABOUTME: LLM-backed intent parser implementing the planner's IntentSource seam
// ABOUTME: One JSON-mode completion per request; every failure becomes a diagnostic event
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

use std::sync::Arc;

use async_trait::async_trait;
use plateful_intelligence::planner::{IntentEvent, IntentOutcome, IntentSource, MealIntent};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::llm::prompts::INTENT_INSTRUCTIONS;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider, UpstreamHttpError};

/// Sampling temperature for intent parsing
const TEMPERATURE: f32 = 0.2;
/// Completion token limit
const MAX_TOKENS: u32 = 384;
/// Characters of raw model output kept in diagnostics
const RAW_LIMIT: usize = 4000;

/// Asks an LLM to turn a request into a [`MealIntent`]
///
/// Never retries and never fails: transport errors, non-success replies and
/// unparsable content all yield an outcome without intent.
#[derive(Clone)]
pub struct LlmIntentParser {
    provider: Arc<dyn LlmProvider>,
}

impl LlmIntentParser {
    /// Parser backed by `provider`
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    fn request(&self, prompt: &str) -> ChatRequest {
        ChatRequest::new(vec![
            ChatMessage::system(INTENT_INSTRUCTIONS),
            ChatMessage::user(prompt),
        ])
        .with_model(self.provider.default_model())
        .with_temperature(TEMPERATURE)
        .with_max_tokens(MAX_TOKENS)
        .with_json_mode()
    }
}

#[async_trait]
impl IntentSource for LlmIntentParser {
    async fn understand(&self, prompt: &str) -> IntentOutcome {
        let mut events = vec![IntentEvent::Request {
            model: self.provider.default_model().to_owned(),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }];

        let response = match self.provider.complete(&self.request(prompt)).await {
            Ok(response) => response,
            Err(error) => {
                warn!(provider = self.provider.name(), error = %error, "intent call failed");
                events.push(UpstreamHttpError::find(&error).map_or_else(
                    || IntentEvent::Exception {
                        message: error.to_string(),
                    },
                    |upstream| IntentEvent::HttpError {
                        status: Some(upstream.status),
                        body: upstream.body.clone(),
                    },
                ));
                return IntentOutcome {
                    intent: None,
                    events,
                };
            }
        };

        let parsed = serde_json::from_str::<Value>(&response.content).ok();
        events.push(IntentEvent::Response {
            raw: response.content.chars().take(RAW_LIMIT).collect(),
            parsed: parsed
                .clone()
                .unwrap_or_else(|| Value::Object(Map::new())),
        });

        let intent = parsed.and_then(MealIntent::from_value);
        debug!(parsed = intent.is_some(), "intent call finished");
        IntentOutcome { intent, events }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AppError, ErrorCode};
    use crate::llm::{ChatResponse, LlmCapabilities};
    use plateful_intelligence::planner::DietType;

    enum Reply {
        Content(&'static str),
        Status(u16),
        Unreachable,
    }

    struct CannedProvider(Reply);

    #[async_trait]
    impl LlmProvider for CannedProvider {
        fn name(&self) -> &'static str {
            "canned"
        }

        fn display_name(&self) -> &'static str {
            "Canned"
        }

        fn capabilities(&self) -> LlmCapabilities {
            LlmCapabilities::JSON_MODE
        }

        fn default_model(&self) -> &str {
            "test-model"
        }

        fn base_url(&self) -> &str {
            "http://localhost:0"
        }

        async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
            assert!(request.json_mode);
            match self.0 {
                Reply::Content(content) => Ok(ChatResponse {
                    content: content.to_owned(),
                    model: "test-model".to_owned(),
                    usage: None,
                    finish_reason: Some("stop".to_owned()),
                }),
                Reply::Status(status) => Err(AppError::external_service("LocalLLM", "nope")
                    .with_source(UpstreamHttpError {
                        status,
                        body: "busy".to_owned(),
                    })),
                Reply::Unreachable => Err(AppError::new(
                    ErrorCode::ExternalServiceUnavailable,
                    "connection refused",
                )),
            }
        }
    }

    async fn understand(reply: Reply) -> IntentOutcome {
        LlmIntentParser::new(Arc::new(CannedProvider(reply)))
            .understand("vegan, ~500 kcal")
            .await
    }

    #[tokio::test]
    async fn test_json_reply_becomes_intent() {
        let outcome = understand(Reply::Content(
            r#"{"diet":"wegański","kcal":{"target":500,"low":450,"high":550},"avoid":["tofu"]}"#,
        ))
        .await;
        let intent = outcome.intent.unwrap();
        assert_eq!(intent.diet, DietType::Vegan);
        assert_eq!(intent.kcal.target, Some(500.0));
        assert_eq!(intent.avoid, vec!["tofu".to_owned()]);
        assert_eq!(outcome.events.len(), 2);
        assert!(matches!(outcome.events[0], IntentEvent::Request { max_tokens: 384, .. }));
    }

    #[tokio::test]
    async fn test_garbage_reply_has_no_intent() {
        let outcome = understand(Reply::Content("sure! here you go")).await;
        assert!(outcome.intent.is_none());
        match &outcome.events[1] {
            IntentEvent::Response { parsed, .. } => assert_eq!(parsed, &Value::Object(Map::new())),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_error_is_recorded() {
        let outcome = understand(Reply::Status(503)).await;
        assert!(outcome.intent.is_none());
        assert_eq!(
            outcome.events[1],
            IntentEvent::HttpError {
                status: Some(503),
                body: "busy".to_owned()
            }
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_exception_event() {
        let outcome = understand(Reply::Unreachable).await;
        assert!(outcome.intent.is_none());
        assert!(matches!(outcome.events[1], IntentEvent::Exception { .. }));
    }
}
