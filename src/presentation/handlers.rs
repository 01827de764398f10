// HTTP request handlers
use crate::application::dashboard_service::SeriesQuery;
use crate::application::recommendation_engine;
use crate::domain::profile::UserProfile;
use crate::domain::quiz::{AnswerFeedback, QuizSession};
use crate::infrastructure::http_response::{accepts_brotli, csv_response, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub session: QuizSession,
    pub option_index: usize,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub session: QuizSession,
    pub feedback: AnswerFeedback,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub session: QuizSession,
}

async fn respond<T: Serialize>(data: &T, headers: &HeaderMap) -> Response {
    match json_response(data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List configured series sources
pub async fn list_sources(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    respond(&state.dashboard_service.list_sources(), &headers).await
}

/// One derived series
pub async fn get_series(
    Path(id): Path<String>,
    query: Result<Query<SeriesQuery>, QueryRejection>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let view = state.dashboard_service.series(&id, query).await?;
    Ok(respond(&view, &headers).await)
}

/// CSV download of one derived series
pub async fn export_series(
    Path(id): Path<String>,
    query: Result<Query<SeriesQuery>, QueryRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let export = state.dashboard_service.export_series(&id, query).await?;
    Ok(csv_response(&export.file_name, export.body).into_response())
}

pub async fn climate_dashboard(
    query: Result<Query<SeriesQuery>, QueryRejection>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let dashboard = state.dashboard_service.climate_dashboard(query).await?;
    Ok(respond(&dashboard, &headers).await)
}

pub async fn youth_dashboard(
    query: Result<Query<SeriesQuery>, QueryRejection>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let dashboard = state.dashboard_service.youth_dashboard(query).await?;
    Ok(respond(&dashboard, &headers).await)
}

pub async fn export_youth(
    query: Result<Query<SeriesQuery>, QueryRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let export = state.dashboard_service.export_youth(query).await?;
    Ok(csv_response(&export.file_name, export.body).into_response())
}

/// Score a survey profile and build its action plan
pub async fn recommendations(
    headers: HeaderMap,
    profile: Result<Json<UserProfile>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(profile) = profile?;
    profile.validate()?;
    let report = recommendation_engine::recommend(&profile);
    Ok(respond(&report, &headers).await)
}

pub async fn quiz_questions(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    respond(&state.quiz_service.questions(), &headers).await
}

pub async fn quiz_start(State(state): State<Arc<AppState>>) -> Json<QuizSession> {
    Json(state.quiz_service.start())
}

pub async fn quiz_answer(
    State(state): State<Arc<AppState>>,
    request: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let Json(request) = request?;
    let (session, feedback) = state
        .quiz_service
        .answer(request.session, request.option_index)?;
    Ok(Json(AnswerResponse { session, feedback }))
}

pub async fn quiz_reset(
    State(state): State<Arc<AppState>>,
    request: Result<Json<ResetRequest>, JsonRejection>,
) -> Result<Json<QuizSession>, ApiError> {
    let Json(request) = request?;
    Ok(Json(state.quiz_service.reset(request.session)?))
}
