use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use spam_sift::api::{AppState, api_routes};
use spam_sift::config::Config;
use spam_sift::history::ClassificationHistory;
use spam_sift::pipeline::SpamClassifier;
use spam_sift::samples;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(config.log_dir.as_deref());

    eprintln!("📨 Spam Sift v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model_path.display());
    eprintln!("   API: http://0.0.0.0:{}/api/classify", config.port);
    eprintln!("   Log: {}", config.classification_log.display());

    let classifier = SpamClassifier::from_path(&config.model_path)
        .await
        .with_context(|| format!("loading model from {}", config.model_path.display()))?;

    // ── Samples ──────────────────────────────────────────────────────────
    let client = reqwest::Client::new();
    let samples =
        samples::fetch_messages(&client, &config.samples_url, config.fetch_timeout).await;
    eprintln!("   Samples: {} messages", samples.len());

    let state = AppState {
        classifier: Arc::new(classifier),
        history: ClassificationHistory::new(),
        samples: Arc::new(samples),
        log_path: Arc::new(config.classification_log.clone()),
    };

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .with_context(|| format!("binding port {}", config.port))?;
    tracing::info!(port = config.port, "Spam Sift server started");

    axum::serve(listener, api_routes(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Spam Sift server stopped");
    Ok(())
}

/// Stderr logging, plus a daily rolling file when `log_dir` is set.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr = fmt::layer().with_target(false).with_writer(std::io::stderr);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "spam-sift.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .init();
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
}
