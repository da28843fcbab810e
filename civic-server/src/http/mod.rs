//! HTTP server module

mod api;
mod assessment;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::AppState;

pub use api::{AxisSummary, DomainListResponse, DomainSummary, HealthResponse};
pub use assessment::{
    AnswerRequest, AnswerResponse, AxisScoreDto, CompleteRequest, CompleteResponse,
    ErrorResponse, ProgressDto, QuestionDto, SessionResponse, StartRequest, StartResponse,
};

/// Create the HTTP router with all routes configured
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(api::health))
        .route("/api/spec/domains", get(api::list_domains))
        .route("/api/assessment/start", post(assessment::start))
        .route("/api/assessment/answer", post(assessment::answer))
        .route("/api/assessment/complete", post(assessment::complete))
        .route(
            "/api/assessment/:id",
            get(assessment::get_session).delete(assessment::delete_session),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_router_has_health_endpoint() {
        let state = Arc::new(AppState::bundled().unwrap());
        let router = create_router(state);
        let server = TestServer::new(router).unwrap();

        let response = server.get("/api/health").await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_router_unknown_route_is_404() {
        let state = Arc::new(AppState::bundled().unwrap());
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server.get("/api/nope").await;
        response.assert_status_not_found();
    }
}
