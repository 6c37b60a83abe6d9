use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::api::ApiFootballClient;
use crate::config::Config;
use crate::error::OddsError;
use crate::evaluator::{
    evaluate_btts, evaluate_over25, evaluate_result_from_odds, BetEvaluation, BttsInput,
    Over25Input,
};
use crate::picks::{find_team_picks, PicksError, PicksRequest, TeamPicks};

/// Shared by every handler; never mutated
#[derive(Clone)]
pub struct AppState {
    pub client: ApiFootballClient,
    pub min_pick_probability: f64,
    pub max_picks: usize,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: ApiFootballClient::new(config)?,
            min_pick_probability: config.min_pick_probability,
            max_picks: config.max_picks,
        })
    }
}

/// Handler error mapped onto an HTTP status and `{"error": ...}` body
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Unavailable(String),
    BadGateway(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Unavailable(msg)
            | ApiError::BadGateway(msg) => msg,
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<OddsError> for ApiError {
    fn from(err: OddsError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<PicksError> for ApiError {
    fn from(err: PicksError) -> Self {
        match err {
            PicksError::Fetch(e) if e.is_missing_credential() => {
                warn!("Picks requested without an API key configured");
                ApiError::Unavailable(e.to_string())
            }
            PicksError::Fetch(e) => {
                error!("Picks fetch failed: {}", e);
                ApiError::BadGateway(e.to_string())
            }
            PicksError::NoFixture { team } => {
                ApiError::NotFound(format!("no upcoming fixture found for {}", team))
            }
            // Bookmaker quoted an unusable odd
            PicksError::Odds(e) => ApiError::BadGateway(e.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ResultQuery {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

#[derive(Debug, Deserialize)]
pub struct PicksQuery {
    pub league: u32,
    pub season: Option<u16>,
    pub team: String,
    pub min_probability: Option<f64>,
    pub limit: Option<usize>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/evaluate/result", get(result_handler))
        .route("/evaluate/over25", get(over25_handler))
        .route("/evaluate/btts", get(btts_handler))
        .route("/picks", get(picks_handler))
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
        "credential_configured": state.client.has_credential(),
    }))
}

async fn result_handler(
    Query(query): Query<ResultQuery>,
) -> Result<Json<Vec<BetEvaluation>>, ApiError> {
    Ok(Json(evaluate_result_from_odds(query.home, query.draw, query.away)?))
}

async fn over25_handler(Query(input): Query<Over25Input>) -> Result<Json<BetEvaluation>, ApiError> {
    Ok(Json(evaluate_over25(&input)?))
}

async fn btts_handler(Query(input): Query<BttsInput>) -> Result<Json<BetEvaluation>, ApiError> {
    Ok(Json(evaluate_btts(&input)?))
}

async fn picks_handler(
    State(state): State<AppState>,
    Query(query): Query<PicksQuery>,
) -> Result<Json<TeamPicks>, ApiError> {
    let request = PicksRequest {
        league_id: query.league,
        season: query.season,
        team: query.team,
        min_probability: query.min_probability.unwrap_or(state.min_pick_probability),
        limit: query.limit.unwrap_or(state.max_picks),
    };
    Ok(Json(find_team_picks(&state.client, &request).await?))
}

/// Serve until ctrl-c
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("JSON server listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down...");
        })
        .await
        .context("Server error")
}
