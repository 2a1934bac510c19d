use crate::services::providers::gemini::GeminiConfig;
use crate::services::providers::openai::OpenAiConfig;
use crate::services::providers::CompletionParams;
use secrecy::SecretString;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub common: core_config::Config,
    pub provider: ProviderKind,
    pub openai: OpenAiConfig,
    pub gemini: GeminiConfig,
    pub completion: CompletionConfig,
    /// When false, `/extract_action_items` runs in single-list mode and the
    /// response carries no `keywords`.
    pub extract_keywords: bool,
}

#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub params: CompletionParams,
    /// Upper bound for a single outbound HTTP call.
    pub timeout_secs: u64,
}

/// Which text completion backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
    /// Canned responses; only useful for local smoke runs.
    Mock,
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "Unknown COMPLETION_PROVIDER '{}'",
                other
            ))),
        }
    }
}

impl AdvisorConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Build the service configuration from `common` plus a key lookup.
    ///
    /// Provider credentials are never required here: a missing key only
    /// surfaces when the provider is called.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_prod = common.environment.is_prod();
        let defaults = CompletionParams::default();

        let provider: ProviderKind = get_var(&lookup, "COMPLETION_PROVIDER", Some("openai"), is_prod)?
            .parse()?;

        if provider == ProviderKind::Mock && is_prod {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "COMPLETION_PROVIDER=mock is not allowed in production"
            )));
        }

        Ok(AdvisorConfig {
            provider,
            openai: OpenAiConfig {
                api_key: secret(&lookup, "OPENAI_API_KEY"),
                model: get_var(&lookup, "OPENAI_MODEL", Some(DEFAULT_OPENAI_MODEL), false)?,
                api_base: get_var(&lookup, "OPENAI_API_BASE", Some(DEFAULT_OPENAI_API_BASE), false)?,
            },
            gemini: GeminiConfig {
                api_key: secret(&lookup, "GOOGLE_API_KEY"),
                model: get_var(&lookup, "GEMINI_MODEL", Some(DEFAULT_GEMINI_MODEL), false)?,
                api_base: get_var(&lookup, "GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE), false)?,
            },
            completion: CompletionConfig {
                params: CompletionParams {
                    max_tokens: parse_var(&lookup, "COMPLETION_MAX_TOKENS", defaults.max_tokens)?,
                    temperature: parse_var(&lookup, "COMPLETION_TEMPERATURE", defaults.temperature)?,
                },
                timeout_secs: parse_var(&lookup, "COMPLETION_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            },
            extract_keywords: parse_var(&lookup, "ADVISOR_EXTRACT_KEYWORDS", true)?,
            common,
        })
    }
}

fn secret<F>(lookup: &F, key: &str) -> SecretString
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_default();
    if value.is_empty() {
        tracing::warn!(key, "Credential not set; provider calls will fail");
    }
    SecretString::new(value)
}

fn get_var<F>(lookup: &F, key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("Invalid value for {}: '{}' ({})", key, raw, e))
        }),
    }
}
