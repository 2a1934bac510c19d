//! Mock provider for tests and local smoke runs.

use super::{Completion, CompletionParams, FinishReason, ProviderError, TextProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Reply used by [`MockTextProvider::canned`].
const CANNED_REPLY: &str = "Actionable Items:\n\
- Follow up with the client\n\
Financial Keywords:\n\
1. portfolio";

/// A prompt pair the mock was called with.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub system_prompt: String,
    pub user_prompt: String,
    pub params: CompletionParams,
}

enum Reply {
    Text(String),
    Error(ProviderError),
}

/// Scripted text provider. Always answers with the same reply and records
/// every call it receives.
pub struct MockTextProvider {
    reply: Reply,
    calls: AtomicUsize,
    recorded: Mutex<Vec<RecordedCall>>,
}

impl MockTextProvider {
    /// Answer every call with `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new(Reply::Text(text.into()))
    }

    /// Fail every call with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self::new(Reply::Error(error))
    }

    /// Answer with a small fixed completion containing both extraction sections.
    pub fn canned() -> Self {
        Self::with_text(CANNED_REPLY)
    }

    fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            recorded: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.recorded
            .lock()
            .ok()
            .and_then(|calls| calls.last().cloned())
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: &CompletionParams,
    ) -> Result<Completion, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.push(RecordedCall {
                system_prompt: system_prompt.to_string(),
                user_prompt: user_prompt.to_string(),
                params: *params,
            });
        }

        match &self.reply {
            Reply::Text(text) => Ok(Completion {
                text: text.trim().to_string(),
                input_tokens: ((system_prompt.len() + user_prompt.len()) / 4) as u32,
                output_tokens: (text.len() / 4) as u32,
                finish_reason: FinishReason::Complete,
            }),
            Reply::Error(err) => Err(err.clone()),
        }
    }
}
