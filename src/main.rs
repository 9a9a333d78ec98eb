//! Diabetes Risk API Server
//!
//! Serves a pre-trained diabetes-risk classifier over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    DIABETES RISK API                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  POST /predict                                              │
//! │        │                                                    │
//! │        ▼                                                    │
//! │  ┌───────────┐   ┌─────────────┐   ┌─────────────────────┐ │
//! │  │  Feature  │──▶│ Classifier  │──▶│  Advice             │ │
//! │  │  Record   │   │ (.json/.onnx)│  │  rules | attribution│ │
//! │  └───────────┘   └──────┬──────┘   └──────────▲──────────┘ │
//! │                         │   ┌─────────────┐   │            │
//! │                         └──▶│  Explainer  │───┘            │
//! │                             └─────────────┘                │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod advice;
mod config;
mod error;
mod explain;
mod features;
mod handlers;
mod inference;
mod models;
mod predictor;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

use predictor::{AdviceMode, Predictor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    init_tracing(&config);

    tracing::info!("Diabetes Risk API starting...");
    tracing::info!("Advice mode: {}", config.advice_mode);

    // Load model artifacts once; read-only from here on
    let predictor = load_predictor(&config)?;
    tracing::info!(
        "Model ready: {} ({})",
        predictor.info().model.model_type,
        config.model_path.display()
    );

    // Build application state
    let state = AppState {
        predictor: Arc::new(predictor),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &config::Config) {
    let default_filter = if config.is_production() {
        "diabetes_risk_api=info,tower_http=info"
    } else {
        "diabetes_risk_api=debug,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn load_predictor(config: &config::Config) -> anyhow::Result<Predictor> {
    let classifier = inference::load_classifier(&config.model_path)
        .with_context(|| format!("failed to load model {}", config.model_path.display()))?;

    let explainer = match (&config.explainer_path, config.advice_mode) {
        (Some(path), AdviceMode::Attribution) => Some(
            explain::load_explainer(path)
                .with_context(|| format!("failed to load explainer {}", path.display()))?,
        ),
        (Some(path), AdviceMode::Rules) => {
            tracing::warn!("EXPLAINER_PATH {} ignored in rules mode", path.display());
            None
        }
        (None, _) => None,
    };

    let predictor = Predictor::new(classifier, explainer, config.advice_mode)?;
    if !predictor.explainer_matches_model() {
        tracing::warn!("Explainer coefficients differ from the loaded model; attributions describe another model");
    }

    Ok(predictor)
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/model", get(handlers::model::info))
        .route("/predict", post(handlers::predict::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
