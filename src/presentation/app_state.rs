// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::quiz_service::QuizService;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub quiz_service: QuizService,
}
