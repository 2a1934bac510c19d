//! Request orchestration: validate input, call the completion provider once,
//! parse the completion.
//!
//! Every outcome is an explicit [`AdvisorError`] variant; the HTTP status is
//! chosen in one place, the `From<AdvisorError> for AppError` impl below.

use crate::services::metrics;
use crate::services::prompts;
use crate::services::providers::{CompletionParams, ProviderError, TextProvider};
use crate::services::sections::{SectionMarker, SectionParser};
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

pub const ACTIONABLE_ITEMS_MARKER: &str = "Actionable Items:";
pub const FINANCIAL_KEYWORDS_MARKER: &str = "Financial Keywords:";

pub const ACTIONABLE_ITEMS: &str = "actionable_items";
pub const KEYWORDS: &str = "keywords";

const MEETING_NOTES_REQUIRED: &str = "Meeting notes are required";
const ADVICE_INPUT_REQUIRED: &str = "Notes and wealth information are required";

#[derive(Debug, Error)]
pub enum AdvisorError {
    /// Required input missing or blank. Raised before the provider is called.
    #[error("{0}")]
    Validation(&'static str),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl From<AdvisorError> for AppError {
    fn from(err: AdvisorError) -> Self {
        match err {
            AdvisorError::Validation(msg) => AppError::BadRequest(anyhow::Error::msg(msg)),
            AdvisorError::Provider(e) => AppError::Upstream(e.to_string()),
        }
    }
}

/// Action items and keywords extracted from meeting notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionItems {
    pub actionable_items: Vec<String>,
    /// `None` when keyword extraction is disabled.
    pub keywords: Option<Vec<String>>,
}

#[derive(Clone)]
pub struct AdvisorService {
    provider: Arc<dyn TextProvider>,
    params: CompletionParams,
    extract_keywords: bool,
    action_items_parser: SectionParser,
    advice_parser: SectionParser,
}

impl AdvisorService {
    pub fn new(
        provider: Arc<dyn TextProvider>,
        params: CompletionParams,
        extract_keywords: bool,
    ) -> Self {
        let action_items_parser = if extract_keywords {
            SectionParser::new([
                SectionMarker::new(ACTIONABLE_ITEMS_MARKER, ACTIONABLE_ITEMS),
                SectionMarker::new(FINANCIAL_KEYWORDS_MARKER, KEYWORDS),
            ])
        } else {
            SectionParser::flat()
        };

        Self {
            provider,
            params,
            extract_keywords,
            action_items_parser,
            advice_parser: SectionParser::flat(),
        }
    }

    pub fn provider(&self) -> &dyn TextProvider {
        self.provider.as_ref()
    }

    pub async fn extract_action_items(
        &self,
        meeting_notes: &str,
    ) -> Result<ActionItems, AdvisorError> {
        if is_blank(meeting_notes) {
            return Err(AdvisorError::Validation(MEETING_NOTES_REQUIRED));
        }

        let (system, user) = if self.extract_keywords {
            (
                prompts::ACTION_ITEMS_SYSTEM,
                prompts::action_items_prompt(meeting_notes, true),
            )
        } else {
            (
                prompts::ACTION_ITEMS_ONLY_SYSTEM,
                prompts::action_items_prompt(meeting_notes, false),
            )
        };

        let text = self.complete("extract_action_items", system, &user).await?;
        let mut parsed = self.action_items_parser.parse(&text);
        tracing::debug!(parsed_items = parsed.item_count(), "Parsed completion");

        let items = if self.extract_keywords {
            ActionItems {
                actionable_items: parsed.take_section(ACTIONABLE_ITEMS),
                keywords: Some(parsed.take_section(KEYWORDS)),
            }
        } else {
            ActionItems {
                actionable_items: parsed.into_flat(),
                keywords: None,
            }
        };

        metrics::record_parsed_items(
            "extract_action_items",
            ACTIONABLE_ITEMS,
            items.actionable_items.len(),
        );
        if let Some(keywords) = &items.keywords {
            metrics::record_parsed_items("extract_action_items", KEYWORDS, keywords.len());
        }

        tracing::info!(
            actionable_items = items.actionable_items.len(),
            keywords = items.keywords.as_ref().map(Vec::len).unwrap_or(0),
            "Extracted action items"
        );

        Ok(items)
    }

    pub async fn investment_advice(
        &self,
        meeting_notes: &str,
        wealth_info: &str,
    ) -> Result<Vec<String>, AdvisorError> {
        if is_blank(meeting_notes) || is_blank(wealth_info) {
            return Err(AdvisorError::Validation(ADVICE_INPUT_REQUIRED));
        }

        let user = prompts::investment_advice_prompt(meeting_notes, wealth_info);
        let text = self
            .complete("investment_advice", prompts::INVESTMENT_ADVICE_SYSTEM, &user)
            .await?;

        let advice = self.advice_parser.parse(&text).into_flat();
        metrics::record_parsed_items("investment_advice", "advice", advice.len());
        tracing::info!(advice = advice.len(), "Generated investment advice");

        Ok(advice)
    }

    async fn complete(
        &self,
        operation: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AdvisorError> {
        let provider = self.provider.name();
        let model = self.provider.model();

        tracing::info!(
            operation,
            provider,
            model,
            max_tokens = self.params.max_tokens,
            temperature = self.params.temperature,
            "Requesting completion"
        );

        let start = Instant::now();
        let result = self
            .provider
            .complete(system_prompt, user_prompt, &self.params)
            .await;
        let elapsed = start.elapsed().as_secs_f64();
        metrics::record_provider_latency(provider, model, elapsed);

        match result {
            Ok(completion) => {
                metrics::record_completion(
                    operation,
                    provider,
                    model,
                    completion.finish_reason.as_str(),
                    completion.input_tokens,
                    completion.output_tokens,
                );
                tracing::info!(
                    operation,
                    input_tokens = completion.input_tokens,
                    output_tokens = completion.output_tokens,
                    finish_reason = completion.finish_reason.as_str(),
                    latency_secs = elapsed,
                    "Completion received"
                );
                Ok(completion.text)
            }
            Err(e) => {
                metrics::record_provider_error(provider, e.kind());
                tracing::error!(operation, provider, error = %e, "Completion failed");
                Err(e.into())
            }
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockTextProvider;

    fn service(mock: Arc<MockTextProvider>, extract_keywords: bool) -> AdvisorService {
        AdvisorService::new(mock, CompletionParams::default(), extract_keywords)
    }

    #[tokio::test]
    async fn extracts_items_and_keywords() {
        let mock = Arc::new(MockTextProvider::with_text(
            "Actionable Items:\n- Call client\n- Send report\nFinancial Keywords:\n1. mortgage\n2. equity",
        ));
        let items = service(mock.clone(), true)
            .extract_action_items("We discussed the mortgage.")
            .await
            .unwrap();

        assert_eq!(items.actionable_items, ["Call client", "Send report"]);
        assert_eq!(items.keywords.unwrap(), ["mortgage", "equity"]);

        let call = mock.last_call().unwrap();
        assert_eq!(call.system_prompt, prompts::ACTION_ITEMS_SYSTEM);
        assert!(call.user_prompt.contains("We discussed the mortgage."));
        assert_eq!(call.params, CompletionParams::default());
    }

    #[tokio::test]
    async fn missing_headers_give_empty_lists() {
        let mock = Arc::new(MockTextProvider::with_text("- Call client\n- Send report"));
        let items = service(mock, true)
            .extract_action_items("notes")
            .await
            .unwrap();

        assert!(items.actionable_items.is_empty());
        assert_eq!(items.keywords, Some(vec![]));
    }

    #[tokio::test]
    async fn single_list_mode_omits_keywords() {
        let mock = Arc::new(MockTextProvider::with_text("1. Call client\n2. Send report"));
        let items = service(mock.clone(), false)
            .extract_action_items("notes")
            .await
            .unwrap();

        assert_eq!(items.actionable_items, ["Call client", "Send report"]);
        assert!(items.keywords.is_none());
        assert_eq!(
            mock.last_call().unwrap().system_prompt,
            prompts::ACTION_ITEMS_ONLY_SYSTEM
        );
    }

    #[tokio::test]
    async fn blank_notes_never_reach_the_provider() {
        let mock = Arc::new(MockTextProvider::canned());
        let svc = service(mock.clone(), true);

        let err = svc.extract_action_items("   ").await.unwrap_err();
        assert!(matches!(err, AdvisorError::Validation(MEETING_NOTES_REQUIRED)));

        let err = svc.investment_advice("notes", "").await.unwrap_err();
        assert!(matches!(err, AdvisorError::Validation(ADVICE_INPUT_REQUIRED)));

        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_is_surfaced() {
        let mock = Arc::new(MockTextProvider::failing(ProviderError::NetworkError(
            "connection reset".to_string(),
        )));
        let err = service(mock, true)
            .investment_advice("notes", "Savings: $1")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Network error: connection reset");
    }

    #[tokio::test]
    async fn advice_is_one_entry_per_line() {
        let mock = Arc::new(MockTextProvider::with_text(
            "Build an emergency fund.\n\n- Pay down credit cards.\nConsider index funds",
        ));
        let advice = service(mock.clone(), true)
            .investment_advice("Irregular income", "Savings: None")
            .await
            .unwrap();

        assert_eq!(
            advice,
            [
                "Build an emergency fund",
                "Pay down credit cards",
                "Consider index funds"
            ]
        );
        assert_eq!(
            mock.last_call().unwrap().user_prompt,
            "Recent Notes:\nIrregular income\n\nWealth Info:\nSavings: None"
        );
    }

    #[test]
    fn errors_map_to_http_statuses() {
        use axum::http::StatusCode;

        let validation: AppError = AdvisorError::Validation(MEETING_NOTES_REQUIRED).into();
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);

        let provider: AppError = AdvisorError::Provider(ProviderError::RateLimited).into();
        assert_eq!(provider.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(provider.to_string(), "Upstream error: Rate limited by completion provider");
    }
}
