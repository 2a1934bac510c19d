//! Prometheus metrics for advisor-service.
//!
//! HTTP traffic plus completion-provider and parser metrics.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::{Once, OnceLock};

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// HTTP metrics
pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static HTTP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

// Completion metrics
pub static COMPLETIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static COMPLETION_TOKENS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static PROVIDER_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static PROVIDER_ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

// Parser metrics
pub static PARSED_ITEMS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

static INIT: Once = Once::new();

/// Initialize all metrics. Safe to call more than once; only the first call
/// registers anything.
pub fn init_metrics() {
    INIT.call_once(register_all);
}

fn register_all() {
    let registry = Registry::new();

    let http_requests_total = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "path", "status"],
    )
    .expect("Failed to create http_requests_total metric");

    let http_request_duration = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["method", "path", "status"],
    )
    .expect("Failed to create http_request_duration_seconds metric");

    let completions_total = IntCounterVec::new(
        Opts::new("advisor_completions_total", "Completed provider calls"),
        &["operation", "provider", "model", "finish_reason"],
    )
    .expect("Failed to create advisor_completions_total metric");

    let tokens_total = IntCounterVec::new(
        Opts::new("advisor_completion_tokens_total", "Tokens consumed by completions"),
        &["model", "type"], // type: input, output
    )
    .expect("Failed to create advisor_completion_tokens_total metric");

    let provider_latency = HistogramVec::new(
        HistogramOpts::new(
            "advisor_provider_latency_seconds",
            "Completion provider latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["provider", "model"],
    )
    .expect("Failed to create advisor_provider_latency_seconds metric");

    let provider_errors = IntCounterVec::new(
        Opts::new("advisor_provider_errors_total", "Completion provider errors"),
        &["provider", "error_type"],
    )
    .expect("Failed to create advisor_provider_errors_total metric");

    let parsed_items = IntCounterVec::new(
        Opts::new("advisor_parsed_items_total", "Items extracted from completions"),
        &["operation", "section"],
    )
    .expect("Failed to create advisor_parsed_items_total metric");

    registry
        .register(Box::new(http_requests_total.clone()))
        .expect("Failed to register http_requests_total");
    registry
        .register(Box::new(http_request_duration.clone()))
        .expect("Failed to register http_request_duration_seconds");
    registry
        .register(Box::new(completions_total.clone()))
        .expect("Failed to register advisor_completions_total");
    registry
        .register(Box::new(tokens_total.clone()))
        .expect("Failed to register advisor_completion_tokens_total");
    registry
        .register(Box::new(provider_latency.clone()))
        .expect("Failed to register advisor_provider_latency_seconds");
    registry
        .register(Box::new(provider_errors.clone()))
        .expect("Failed to register advisor_provider_errors_total");
    registry
        .register(Box::new(parsed_items.clone()))
        .expect("Failed to register advisor_parsed_items_total");

    let _ = REGISTRY.set(registry);
    let _ = HTTP_REQUESTS_TOTAL.set(http_requests_total);
    let _ = HTTP_REQUEST_DURATION_SECONDS.set(http_request_duration);
    let _ = COMPLETIONS_TOTAL.set(completions_total);
    let _ = COMPLETION_TOKENS_TOTAL.set(tokens_total);
    let _ = PROVIDER_LATENCY_SECONDS.set(provider_latency);
    let _ = PROVIDER_ERRORS_TOTAL.set(provider_errors);
    let _ = PARSED_ITEMS_TOTAL.set(parsed_items);

    tracing::info!("Prometheus metrics initialized");
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match REGISTRY.get() {
        Some(r) => r,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    if let Err(e) = encoder.encode(&registry.gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
        format!("# Failed to convert metrics to UTF-8: {}\n", e)
    })
}

/// Record a completed HTTP request.
pub fn record_http_request(method: &str, path: &str, status: &str, duration_secs: f64) {
    if let Some(counter) = HTTP_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[method, path, status]).inc();
    }
    if let Some(histogram) = HTTP_REQUEST_DURATION_SECONDS.get() {
        histogram
            .with_label_values(&[method, path, status])
            .observe(duration_secs);
    }
}

/// Record a successful completion and its token usage.
pub fn record_completion(
    operation: &str,
    provider: &str,
    model: &str,
    finish_reason: &str,
    input_tokens: u32,
    output_tokens: u32,
) {
    if let Some(counter) = COMPLETIONS_TOTAL.get() {
        counter
            .with_label_values(&[operation, provider, model, finish_reason])
            .inc();
    }
    if let Some(counter) = COMPLETION_TOKENS_TOTAL.get() {
        counter
            .with_label_values(&[model, "input"])
            .inc_by(u64::from(input_tokens));
        counter
            .with_label_values(&[model, "output"])
            .inc_by(u64::from(output_tokens));
    }
}

/// Record provider latency.
pub fn record_provider_latency(provider: &str, model: &str, duration_secs: f64) {
    if let Some(histogram) = PROVIDER_LATENCY_SECONDS.get() {
        histogram
            .with_label_values(&[provider, model])
            .observe(duration_secs);
    }
}

/// Record a provider error.
pub fn record_provider_error(provider: &str, error_type: &str) {
    if let Some(counter) = PROVIDER_ERRORS_TOTAL.get() {
        counter.with_label_values(&[provider, error_type]).inc();
    }
}

/// Record how many items a parse produced for one section.
pub fn record_parsed_items(operation: &str, section: &str, count: usize) {
    if let Some(counter) = PARSED_ITEMS_TOTAL.get() {
        counter
            .with_label_values(&[operation, section])
            .inc_by(count as u64);
    }
}
