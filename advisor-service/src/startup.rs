//! Application startup and lifecycle management.

use crate::config::{AdvisorConfig, ProviderKind};
use crate::services::providers::gemini::GeminiTextProvider;
use crate::services::providers::mock::MockTextProvider;
use crate::services::providers::openai::OpenAiTextProvider;
use crate::services::providers::TextProvider;
use crate::services::AdvisorService;
use crate::{build_router, AppState};
use axum::Router;
use service_core::error::AppError;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

/// Construct the configured completion provider.
pub fn build_provider(config: &AdvisorConfig) -> Result<Arc<dyn TextProvider>, AppError> {
    let timeout = config.completion.timeout_secs;
    let provider: Arc<dyn TextProvider> = match config.provider {
        ProviderKind::OpenAi => Arc::new(
            OpenAiTextProvider::new(config.openai.clone(), timeout)
                .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?,
        ),
        ProviderKind::Gemini => Arc::new(
            GeminiTextProvider::new(config.gemini.clone(), timeout)
                .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?,
        ),
        ProviderKind::Mock => {
            tracing::warn!("Using mock completion provider");
            Arc::new(MockTextProvider::canned())
        }
    };

    tracing::info!(
        provider = provider.name(),
        model = provider.model(),
        "Initialized completion provider"
    );

    Ok(provider)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: AdvisorConfig) -> Result<Self, AppError> {
        let provider = build_provider(&config)?;
        Self::build_with_provider(config, provider).await
    }

    /// Build with an explicit provider, e.g. a mock in tests.
    pub async fn build_with_provider(
        config: AdvisorConfig,
        provider: Arc<dyn TextProvider>,
    ) -> Result<Self, AppError> {
        let advisor = AdvisorService::new(
            provider,
            config.completion.params,
            config.extract_keywords,
        );
        let router = build_router(AppState { advisor });

        // Port 0 = random port for testing
        let addr = config.common.address();
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Advisor service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
