use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::achievements::{AchievementDefinition, AchievementId, UnlockLedger};
use super::engine::GamificationEngine;
use super::stats::UserStatsSnapshot;

/// Read-only endpoints over the level, award and achievement tables.
pub fn gamification_router(engine: Arc<GamificationEngine>) -> Router {
    Router::new()
        .route("/api/v1/levels", get(levels_handler))
        .route("/api/v1/levels/progress", get(progress_handler))
        .route("/api/v1/awards", get(awards_handler))
        .route("/api/v1/awards/:action", get(award_handler))
        .route("/api/v1/achievements", get(achievements_handler))
        .route("/api/v1/achievements/evaluate", post(evaluate_handler))
        .with_state(engine)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressQuery {
    pub(crate) points: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluateRequest {
    #[serde(default)]
    pub(crate) snapshot: UserStatsSnapshot,
    #[serde(default)]
    pub(crate) unlocked: Vec<AchievementId>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluateResponse {
    pub(crate) achievements: Vec<AchievementDefinition>,
}

pub(crate) async fn levels_handler(State(engine): State<Arc<GamificationEngine>>) -> Response {
    Json(engine.catalog().levels.tiers().to_vec()).into_response()
}

pub(crate) async fn progress_handler(
    State(engine): State<Arc<GamificationEngine>>,
    Query(query): Query<ProgressQuery>,
) -> Response {
    Json(engine.level_progress(query.points)).into_response()
}

pub(crate) async fn awards_handler(State(engine): State<Arc<GamificationEngine>>) -> Response {
    Json(engine.catalog().awards.awards().to_vec()).into_response()
}

pub(crate) async fn award_handler(
    State(engine): State<Arc<GamificationEngine>>,
    Path(action): Path<String>,
) -> Response {
    match engine.award_for(&action) {
        Ok(award) => (StatusCode::OK, Json(award.clone())).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn achievements_handler(
    State(engine): State<Arc<GamificationEngine>>,
) -> Response {
    Json(engine.catalog().achievements.clone()).into_response()
}

pub(crate) async fn evaluate_handler(
    State(engine): State<Arc<GamificationEngine>>,
    Json(request): Json<EvaluateRequest>,
) -> Response {
    let EvaluateRequest { snapshot, unlocked } = request;

    let now = Utc::now();
    let mut ledger = UnlockLedger::default();
    for id in unlocked {
        ledger.unlock(id, now);
    }

    let achievements = engine
        .find_newly_unlocked(&snapshot, &ledger)
        .into_iter()
        .cloned()
        .collect();

    (StatusCode::OK, Json(EvaluateResponse { achievements })).into_response()
}
