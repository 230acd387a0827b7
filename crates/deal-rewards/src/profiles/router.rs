use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::domain::{UserId, UserProfile};
use super::leaderboard::LeaderboardMetric;
use super::repository::{NotificationPublisher, ProfileRepository, RepositoryError};
use super::service::{RewardsService, RewardsServiceError};
use crate::gamification::PointAction;

/// Router builder exposing profile, action and leaderboard endpoints.
pub fn rewards_router<R, N>(service: Arc<RewardsService<R, N>>) -> Router
where
    R: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/users", post(register_handler::<R, N>))
        .route("/api/v1/users/:user_id", get(profile_handler::<R, N>))
        .route(
            "/api/v1/users/:user_id/actions",
            post(action_handler::<R, N>),
        )
        .route(
            "/api/v1/users/:user_id/achievements/evaluate",
            post(evaluate_handler::<R, N>),
        )
        .route("/api/v1/leaderboard", get(leaderboard_handler::<R, N>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) user_id: String,
    pub(crate) display_name: String,
    #[serde(default)]
    pub(crate) joined_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActionRequest {
    pub(crate) action: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LeaderboardQuery {
    #[serde(default)]
    pub(crate) metric: LeaderboardMetric,
    #[serde(default = "default_leaderboard_limit")]
    pub(crate) limit: usize,
}

fn default_leaderboard_limit() -> usize {
    10
}

pub(crate) async fn register_handler<R, N>(
    State(service): State<Arc<RewardsService<R, N>>>,
    Json(request): Json<RegisterRequest>,
) -> Response
where
    R: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let joined_on = request
        .joined_on
        .unwrap_or_else(|| service.now().date_naive());
    let profile = UserProfile::new(UserId(request.user_id), request.display_name, joined_on);

    match service.register(profile) {
        Ok(profile) => (StatusCode::CREATED, Json(profile)).into_response(),
        Err(RewardsServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "profile already exists",
            });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn profile_handler<R, N>(
    State(service): State<Arc<RewardsService<R, N>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let today = service.now().date_naive();
    match service.profile_view(&UserId(user_id), today) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn action_handler<R, N>(
    State(service): State<Arc<RewardsService<R, N>>>,
    Path(user_id): Path<String>,
    Json(request): Json<ActionRequest>,
) -> Response
where
    R: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let action = match request.action.parse::<PointAction>() {
        Ok(action) => action,
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    match service.record_action(&UserId(user_id), action, service.now()) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn evaluate_handler<R, N>(
    State(service): State<Arc<RewardsService<R, N>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.evaluate_achievements(&UserId(user_id), service.now()) {
        Ok(unlocked) => (StatusCode::OK, Json(json!({ "unlocked": unlocked }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn leaderboard_handler<R, N>(
    State(service): State<Arc<RewardsService<R, N>>>,
    Query(query): Query<LeaderboardQuery>,
) -> Response
where
    R: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.leaderboard(query.metric, query.limit) {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: RewardsServiceError) -> Response {
    let status = match &err {
        RewardsServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        RewardsServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        RewardsServiceError::Repository(RepositoryError::Unavailable(_))
        | RewardsServiceError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, Json(payload)).into_response()
}
