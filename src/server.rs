use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::cache::{CacheKey, RecommendationCache};
use crate::engine::{not_found_message, RecommendRequest, Recommender, Strategy, Weighting};
use crate::error::RecommendError;

pub struct AppState {
    recommender: Arc<Recommender>,
    cache: RecommendationCache,
}

impl AppState {
    pub fn new(recommender: Arc<Recommender>) -> Self {
        Self {
            recommender,
            cache: RecommendationCache::new(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/strategies", get(get_strategies))
        .route("/api/recommend", get(get_recommendations))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(recommender: Arc<Recommender>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(Arc::new(AppState::new(recommender)));

    let listener = TcpListener::bind(addr).await?;
    info!("Recommendation API available at http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

enum ApiError {
    Core(RecommendError),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Core(RecommendError::NotFound { name, .. }) => {
                (StatusCode::NOT_FOUND, not_found_message(&name))
            }
            ApiError::Core(e @ RecommendError::InvalidParameter(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Core(e @ RecommendError::DimensionMismatch { .. }) => {
                warn!(error = %e, "misaligned dataset");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::Internal(message) => {
                warn!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(json!({"error": message}))).into_response()
    }
}

impl From<RecommendError> for ApiError {
    fn from(e: RecommendError) -> Self {
        ApiError::Core(e)
    }
}

#[derive(Deserialize)]
struct TrackParams {
    name: String,
    artist: String,
}

async fn get_strategies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrackParams>,
) -> impl IntoResponse {
    let recommender = &state.recommender;
    let available = recommender.available_strategies(&params.name, &params.artist);
    let default = recommender.default_strategy(&params.name, &params.artist);
    Json(json!({
        "in_catalog": recommender.content().catalog().contains(&params.name, &params.artist),
        "available": available,
        "default": default,
    }))
}

#[derive(Deserialize)]
struct RecommendParams {
    name: String,
    artist: String,
    strategy: Option<Strategy>,
    k: Option<usize>,
    diversity: Option<u8>,
    content_weight: Option<f64>,
}

impl RecommendParams {
    fn into_request(self, recommender: &Recommender) -> RecommendRequest {
        let strategy = self
            .strategy
            .unwrap_or_else(|| recommender.default_strategy(&self.name, &self.artist));
        let weighting = match (self.content_weight, self.diversity) {
            (Some(w), _) => Weighting::ContentWeight(w),
            (None, Some(d)) => Weighting::Diversity(d),
            (None, None) => Weighting::default(),
        };
        let mut request = RecommendRequest::new(self.name, self.artist, strategy)
            .with_weighting(weighting);
        if let Some(k) = self.k {
            request = request.with_k(k);
        }
        request
    }
}

async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecommendParams>,
) -> Result<impl IntoResponse, ApiError> {
    let request = params.into_request(&state.recommender);
    let key = CacheKey::from_request(&request);

    if let Some(hit) = key.as_ref().and_then(|k| state.cache.get(k)) {
        return Ok(Json(hit));
    }

    // Scoring is CPU-bound; keep it off the async workers
    let recommender = state.recommender.clone();
    let results = tokio::task::spawn_blocking(move || recommender.recommend(&request))
        .await
        .map_err(|e| ApiError::Internal(format!("recommendation task failed: {}", e)))??;

    if let Some(key) = key {
        state.cache.put(key, results.clone());
    }
    Ok(Json(results))
}
