// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    climate_dashboard, export_series, export_youth, get_series, health_check, list_sources,
    quiz_answer, quiz_questions, quiz_reset, quiz_start, recommendations, youth_dashboard,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/sources", get(list_sources))
        .route("/series/:id", get(get_series))
        .route("/series/:id/export", get(export_series))
        .route("/dashboards/climate", get(climate_dashboard))
        .route("/dashboards/youth", get(youth_dashboard))
        .route("/dashboards/youth/export", get(export_youth))
        .route("/recommendations", post(recommendations))
        .route("/quiz/questions", get(quiz_questions))
        .route("/quiz/start", post(quiz_start))
        .route("/quiz/answer", post(quiz_answer))
        .route("/quiz/reset", post(quiz_reset))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
