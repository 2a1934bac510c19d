use crate::services::ActionItems;
use serde::{Deserialize, Serialize};

/// Free text supplied by the caller, either as one string or as a list of
/// lines. Lists are joined with newlines before they reach the prompt.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum NoteText {
    Text(String),
    Lines(Vec<String>),
}

impl Default for NoteText {
    fn default() -> Self {
        NoteText::Text(String::new())
    }
}

impl NoteText {
    pub fn to_text(&self) -> String {
        match self {
            NoteText::Text(text) => text.clone(),
            NoteText::Lines(lines) => lines.join("\n"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExtractActionItemsRequest {
    #[serde(default)]
    pub meeting_notes: Option<NoteText>,
}

impl ExtractActionItemsRequest {
    pub fn meeting_notes(&self) -> String {
        self.meeting_notes.as_ref().map(NoteText::to_text).unwrap_or_default()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractActionItemsResponse {
    pub actionable_items: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub keywords: Option<Vec<String>>,
}

impl From<ActionItems> for ExtractActionItemsResponse {
    fn from(items: ActionItems) -> Self {
        Self {
            actionable_items: items.actionable_items,
            keywords: items.keywords,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InvestmentAdviceRequest {
    #[serde(default)]
    pub meeting_notes: Option<NoteText>,
    #[serde(default)]
    pub wealth_info: Option<NoteText>,
}

impl InvestmentAdviceRequest {
    pub fn meeting_notes(&self) -> String {
        self.meeting_notes.as_ref().map(NoteText::to_text).unwrap_or_default()
    }

    pub fn wealth_info(&self) -> String {
        self.wealth_info.as_ref().map(NoteText::to_text).unwrap_or_default()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvestmentAdviceResponse {
    pub investment_advice: Vec<String>,
}
