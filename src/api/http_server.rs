// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{ApiError, HealthResponse, VerifyRequest, VerifyResponse};
use crate::config::AppConfig;
use crate::crypto::SecureRandom;
use crate::siws::{ChallengeGenerator, NonceLedger, SignInChallenge, SiwsVerifier};

const LEDGER_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

pub struct AppState {
    pub config: AppConfig,
    pub verifier: SiwsVerifier,
    pub generator: ChallengeGenerator,
    pub ledger: NonceLedger,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self::with_random(config, SecureRandom::detect())
    }

    pub fn with_random(config: AppConfig, rng: SecureRandom) -> Self {
        let verifier = SiwsVerifier::new(config.siws.clone());
        let generator = ChallengeGenerator::new(config.siws.clone(), rng);
        let ledger = NonceLedger::from_secs(config.siws.replay_ttl_secs);
        Self {
            config,
            verifier,
            generator,
            ledger,
        }
    }

    pub fn new_for_test() -> Self {
        Self::with_random(AppConfig::default(), SecureRandom::os())
    }
}

pub fn create_app(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/siws/challenge", get(challenge_handler))
        .route("/api/siws/verify", post(verify_handler))
        .layer(TraceLayer::new_for_http());

    if state.config.server.cors_permissive {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.with_state(state)
}

pub async fn start_server(config: AppConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr().parse::<SocketAddr>()?;
    let state = Arc::new(AppState::new(config));

    let ledger = state.ledger.clone();
    let pruner = tokio::spawn(async move {
        let mut interval = tokio::time::interval(LEDGER_PRUNE_INTERVAL);
        loop {
            interval.tick().await;
            ledger.prune_expired(Utc::now()).await;
        }
    });

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("SIWS API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pruner.abort();
    tracing::info!("SIWS API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: crate::version::VERSION_NUMBER.to_string(),
        degraded_randomness: state.generator.is_degraded(),
    })
}

async fn challenge_handler(State(state): State<Arc<AppState>>) -> Json<SignInChallenge> {
    Json(state.generator.generate())
}

async fn verify_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, ApiErrorResponse> {
    let Json(request) = payload.map_err(|rejection| {
        ApiErrorResponse(ApiError::ValidationError {
            field: "body".to_string(),
            message: rejection.body_text(),
        })
    })?;

    let now = Utc::now();
    let address = request.output.account.address.clone();
    let nonce = request.input.nonce.clone();

    if state.ledger.contains(&address, &nonce, now).await {
        tracing::info!("Rejected replayed sign-in for {}", address);
        return Ok(Json(VerifyResponse { verified: false }));
    }

    let verifier_state = state.clone();
    let verified = run_blocking("verification", move || {
        verifier_state
            .verifier
            .verify_at(&request.input, &request.output, now)
    })
    .await?;

    // Recording is atomic, so a concurrent duplicate loses here
    let verified = verified && state.ledger.check_and_record(&address, &nonce, now).await;

    tracing::info!("Sign-in verification for {}: verified={}", address, verified);
    Ok(Json(VerifyResponse { verified }))
}

// Curve math runs off the async workers; a panicked task becomes a 500
async fn run_blocking<F, T>(task: &str, f: F) -> Result<T, ApiErrorResponse>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        ApiErrorResponse(ApiError::InternalError(format!("{} task failed: {}", task, e)))
    })
}

// Error response wrapper
pub struct ApiErrorResponse(pub ApiError);

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let request_id = uuid::Uuid::new_v4().to_string();
        if status.is_server_error() {
            tracing::error!("[{}] {}", request_id, self.0);
        } else {
            tracing::debug!("[{}] {}", request_id, self.0);
        }
        let error_response = self.0.to_response(Some(request_id));

        (status, Json(error_response)).into_response()
    }
}
