//! Assessment API handlers
//!
//! REST endpoints for the assessment session lifecycle.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use civic_engine::{
    AxisKey, AxisScore, CompletionReason, DomainId, EngineError, Item, ItemId, Progress,
    Response, SessionId, SessionStatus, UserId,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Shared Types
// ============================================================================

/// Error body returned by assessment endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    fn new(code: &str, error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            code: code.to_string(),
        }
    }
}

fn engine_error(err: EngineError) -> ApiError {
    let (status, code) = match &err {
        EngineError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
        EngineError::ItemNotFound(_) => (StatusCode::NOT_FOUND, "ITEM_NOT_FOUND"),
        EngineError::NotInProgress { .. } => (StatusCode::CONFLICT, "SESSION_NOT_IN_PROGRESS"),
        EngineError::ItemAlreadyAnswered { .. } => (StatusCode::CONFLICT, "ITEM_ALREADY_ANSWERED"),
        EngineError::ItemOutsideSelection { .. } => {
            (StatusCode::CONFLICT, "ITEM_OUTSIDE_SELECTION")
        }
        EngineError::VersionConflict { .. } => (StatusCode::CONFLICT, "VERSION_CONFLICT"),
        EngineError::InvalidResponse(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };
    if status.is_server_error() {
        tracing::error!(error = %err, "Assessment request failed");
    }
    (status, Json(ErrorResponse::new(code, err)))
}

/// Unwrap a JSON body, turning extractor rejections into `{error, code}` bodies.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        (
            rejection.status(),
            Json(ErrorResponse::new("INVALID_REQUEST", rejection.body_text())),
        )
    })
}

/// Axis weight on a question
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AxisKeyDto {
    pub axis_id: String,
    pub key: f64,
}

impl From<&AxisKey> for AxisKeyDto {
    fn from(key: &AxisKey) -> Self {
        Self {
            axis_id: key.axis_id.to_string(),
            key: key.key,
        }
    }
}

/// A question as shown to the client
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub id: String,
    pub text: String,
    pub axes: Vec<AxisKeyDto>,
    pub level: String,
    pub tags: Vec<String>,
}

impl From<&Item> for QuestionDto {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.to_string(),
            text: item.text.clone(),
            axes: item.axes.iter().map(AxisKeyDto::from).collect(),
            level: item.level.to_string(),
            tags: item.tags.clone(),
        }
    }
}

/// Score on one axis
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AxisScoreDto {
    pub axis_id: String,
    pub value: f64,
    pub confidence: f64,
    pub n_answered: u32,
}

impl From<&AxisScore> for AxisScoreDto {
    fn from(score: &AxisScore) -> Self {
        Self {
            axis_id: score.axis_id.to_string(),
            value: score.value,
            confidence: score.confidence,
            n_answered: score.n_answered,
        }
    }
}

fn scores_dto(scores: &[AxisScore]) -> Vec<AxisScoreDto> {
    scores.iter().map(AxisScoreDto::from).collect()
}

/// Estimated progress through the session
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDto {
    pub answered: u32,
    pub estimated_total: u32,
    pub percent: u8,
}

impl From<Progress> for ProgressDto {
    fn from(progress: Progress) -> Self {
        Self {
            answered: progress.answered,
            estimated_total: progress.estimated_total,
            percent: progress.percent,
        }
    }
}

fn domain_strings(domains: &[DomainId]) -> Vec<String> {
    domains.iter().map(ToString::to_string).collect()
}

// ============================================================================
// Start
// ============================================================================

/// Request to start an assessment
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartRequest {
    pub selected_domains: Option<Vec<String>>,
    pub user_id: Option<String>,
}

/// Response for a started assessment
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub session_id: String,
    /// `null` when no items match the domain selection
    pub first_question: Option<QuestionDto>,
    pub progress: ProgressDto,
    pub selected_domains: Vec<String>,
}

/// POST /api/assessment/start - Start a new assessment session
pub async fn start(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StartRequest>, JsonRejection>,
) -> Result<Json<StartResponse>, ApiError> {
    let req = json_body(payload)?;
    let requested: Option<Vec<DomainId>> = req
        .selected_domains
        .map(|ids| ids.into_iter().map(DomainId::from).collect());

    let started = state
        .manager
        .start_assessment(requested.as_deref(), req.user_id.map(UserId::from))
        .await
        .map_err(engine_error)?;

    Ok(Json(StartResponse {
        session_id: started.session.id.to_string(),
        first_question: started.first_question.as_ref().map(QuestionDto::from),
        progress: started.progress.into(),
        selected_domains: domain_strings(started.session.selected_domains()),
    }))
}

// ============================================================================
// Get / Delete
// ============================================================================

/// Full view of a session
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub status: SessionStatus,
    pub completion_reason: Option<CompletionReason>,
    pub current_question: Option<QuestionDto>,
    pub answered_items: Vec<String>,
    pub scores: Vec<AxisScoreDto>,
    pub progress: ProgressDto,
    pub selected_domains: Vec<String>,
}

/// GET /api/assessment/:id - Get session state
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session_id = SessionId::from(id);
    let snapshot = state
        .manager
        .snapshot(&session_id)
        .await
        .map_err(engine_error)?
        .ok_or_else(|| engine_error(EngineError::SessionNotFound(session_id)))?;

    let session = &snapshot.session;
    Ok(Json(SessionResponse {
        session_id: session.id.to_string(),
        status: session.status,
        completion_reason: session.completion_reason,
        current_question: snapshot.current_question.as_ref().map(QuestionDto::from),
        answered_items: session
            .state
            .answered_items
            .iter()
            .map(ToString::to_string)
            .collect(),
        scores: scores_dto(&snapshot.scores),
        progress: snapshot.progress.into(),
        selected_domains: domain_strings(session.selected_domains()),
    }))
}

/// DELETE /api/assessment/:id - Delete a session
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let session_id = SessionId::from(id);
    let removed = state
        .manager
        .delete_session(&session_id)
        .await
        .map_err(engine_error)?;

    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(engine_error(EngineError::SessionNotFound(session_id)))
    }
}

// ============================================================================
// Answer
// ============================================================================

/// Request to record one answer
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub session_id: String,
    pub item_id: String,
    pub response: Response,
}

/// Response after recording an answer
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub next_question: Option<QuestionDto>,
    pub scores: Vec<AxisScoreDto>,
    pub progress: ProgressDto,
    pub is_complete: bool,
    pub completion_reason: Option<CompletionReason>,
}

/// POST /api/assessment/answer - Submit an answer
pub async fn answer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let req = json_body(payload)?;
    let outcome = state
        .manager
        .submit_answer(
            &SessionId::from(req.session_id),
            &ItemId::from(req.item_id),
            req.response,
        )
        .await
        .map_err(engine_error)?;

    Ok(Json(AnswerResponse {
        next_question: outcome.next_question.as_ref().map(QuestionDto::from),
        scores: scores_dto(&outcome.scores),
        progress: outcome.progress.into(),
        is_complete: outcome.is_complete,
        completion_reason: outcome.session.completion_reason,
    }))
}

// ============================================================================
// Complete
// ============================================================================

/// Request to finish an assessment
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    pub session_id: String,
    #[serde(default)]
    pub save_to_profile: bool,
}

/// Final results of an assessment
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteResponse {
    pub session_id: String,
    pub final_scores: Vec<AxisScoreDto>,
    pub profile_saved: bool,
}

/// POST /api/assessment/complete - Complete a session
pub async fn complete(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CompleteRequest>, JsonRejection>,
) -> Result<Json<CompleteResponse>, ApiError> {
    let req = json_body(payload)?;
    let completed = state
        .manager
        .complete_assessment(&SessionId::from(req.session_id), req.save_to_profile)
        .await
        .map_err(engine_error)?;

    Ok(Json(CompleteResponse {
        session_id: completed.session.id.to_string(),
        final_scores: scores_dto(&completed.final_scores),
        profile_saved: completed.profile_saved,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        routing::{get, post},
    };
    use axum_test::TestServer;
    use civic_engine::{EngineConfig, SurveySpec};
    use serde_json::json;

    const SPARSE_SURVEY: &str = r#"
        [[domains]]
        id = "econ"
        name = "Economy"

        [[domains]]
        id = "civics"
        name = "Civics"

        [[axes]]
        id = "econ_markets"
        domain_id = "econ"
        name = "Markets"
        pole_low = "Regulated"
        pole_high = "Free"

        [[axes]]
        id = "civics_voice"
        domain_id = "civics"
        name = "Voice"
        pole_low = "Representative"
        pole_high = "Direct"

        [[items]]
        id = "econ-a"
        text = "Cut regulations."
        axes = [{ axis_id = "econ_markets", key = 1.0 }]
    "#;

    fn router_with(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/api/assessment/start", post(start))
            .route("/api/assessment/answer", post(answer))
            .route("/api/assessment/complete", post(complete))
            .route("/api/assessment/:id", get(get_session).delete(delete_session))
            .with_state(state)
    }

    fn create_test_app() -> (Router, Arc<AppState>) {
        let state = Arc::new(AppState::bundled().unwrap());
        (router_with(Arc::clone(&state)), state)
    }

    async fn start_session(server: &TestServer, domains: &[&str]) -> StartResponse {
        let response = server
            .post("/api/assessment/start")
            .json(&json!({ "selectedDomains": domains }))
            .await;
        response.assert_status_ok();
        response.json()
    }

    #[tokio::test]
    async fn test_start_returns_first_question() {
        let (app, _) = create_test_app();
        let server = TestServer::new(app).unwrap();

        let body = start_session(&server, &["econ", "health"]).await;
        assert!(!body.session_id.is_empty());
        assert!(body.first_question.is_some());
        assert_eq!(body.selected_domains, vec!["econ", "health"]);
        assert_eq!(body.progress.answered, 0);
    }

    #[tokio::test]
    async fn test_start_accepts_empty_body() {
        let (app, _) = create_test_app();
        let server = TestServer::new(app).unwrap();

        let response = server.post("/api/assessment/start").json(&json!({})).await;
        response.assert_status_ok();
        let body: StartResponse = response.json();
        assert_eq!(body.selected_domains.len(), 6);
    }

    #[tokio::test]
    async fn test_start_with_user_saves_profile_on_complete() {
        let (app, state) = create_test_app();
        let server = TestServer::new(app).unwrap();

        let started: StartResponse = server
            .post("/api/assessment/start")
            .json(&json!({ "userId": "u1" }))
            .await
            .json();
        let question = started.first_question.unwrap();
        server
            .post("/api/assessment/answer")
            .json(&json!({
                "sessionId": started.session_id,
                "itemId": question.id,
                "response": "agree",
            }))
            .await
            .assert_status_ok();

        let body: CompleteResponse = server
            .post("/api/assessment/complete")
            .json(&json!({ "sessionId": started.session_id, "saveToProfile": true }))
            .await
            .json();
        assert!(body.profile_saved);
        assert!(state.profiles.profile(&UserId::from("u1")).await.is_some());
    }

    #[tokio::test]
    async fn test_answer_advances_session() {
        let (app, _) = create_test_app();
        let server = TestServer::new(app).unwrap();
        let started = start_session(&server, &["econ"]).await;
        let question = started.first_question.unwrap();

        let response = server
            .post("/api/assessment/answer")
            .json(&json!({
                "sessionId": started.session_id,
                "itemId": question.id,
                "response": "strong_agree",
            }))
            .await;
        response.assert_status_ok();

        let body: AnswerResponse = response.json();
        assert!(!body.is_complete);
        assert!(body.completion_reason.is_none());
        assert_eq!(body.progress.answered, 1);
        assert!(body.next_question.is_some());
        assert!(body.scores.iter().all(|s| s.n_answered == 1));
    }

    #[tokio::test]
    async fn test_answer_rejects_unknown_response() {
        let (app, _) = create_test_app();
        let server = TestServer::new(app).unwrap();
        let started = start_session(&server, &["econ"]).await;
        let question = started.first_question.unwrap();

        let response = server
            .post("/api/assessment/answer")
            .json(&json!({
                "sessionId": started.session_id,
                "itemId": question.id,
                "response": "maybe",
            }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "INVALID_REQUEST");
        assert!(!body.error.is_empty());
    }

    #[tokio::test]
    async fn test_complete_rejects_malformed_body() {
        let (app, _) = create_test_app();
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/assessment/complete")
            .json(&json!({ "saveToProfile": true }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_answer_outside_selection_returns_409() {
        let (app, _) = create_test_app();
        let server = TestServer::new(app).unwrap();
        let started = start_session(&server, &["econ"]).await;

        let response = server
            .post("/api/assessment/answer")
            .json(&json!({
                "sessionId": started.session_id,
                "itemId": "health-02",
                "response": "agree",
            }))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "ITEM_OUTSIDE_SELECTION");
    }

    #[tokio::test]
    async fn test_start_without_eligible_items_returns_null_question() {
        let spec = SurveySpec::from_toml_str(SPARSE_SURVEY).unwrap();
        let state = Arc::new(AppState::new(spec, EngineConfig::default()));
        let server = TestServer::new(router_with(Arc::clone(&state))).unwrap();

        let response = server
            .post("/api/assessment/start")
            .json(&json!({ "selectedDomains": ["civics"] }))
            .await;
        response.assert_status_ok();
        let raw: serde_json::Value = response.json();
        assert!(raw["firstQuestion"].is_null());

        let session_id = raw["sessionId"].as_str().unwrap();
        let body: SessionResponse = server
            .get(&format!("/api/assessment/{session_id}"))
            .await
            .json();
        assert_eq!(body.status, SessionStatus::InProgress);
        assert!(body.current_question.is_none());
        assert!(body.completion_reason.is_none());
    }

    #[tokio::test]
    async fn test_answer_unknown_session_returns_404() {
        let (app, _) = create_test_app();
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/assessment/answer")
            .json(&json!({
                "sessionId": "nope",
                "itemId": "econ-01",
                "response": "agree",
            }))
            .await;
        response.assert_status_not_found();
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "SESSION_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_answer_unknown_item_returns_404() {
        let (app, _) = create_test_app();
        let server = TestServer::new(app).unwrap();
        let started = start_session(&server, &["econ"]).await;

        let response = server
            .post("/api/assessment/answer")
            .json(&json!({
                "sessionId": started.session_id,
                "itemId": "nope",
                "response": "agree",
            }))
            .await;
        response.assert_status_not_found();
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "ITEM_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_answer_after_complete_returns_409() {
        let (app, _) = create_test_app();
        let server = TestServer::new(app).unwrap();
        let started = start_session(&server, &["econ"]).await;
        let question = started.first_question.unwrap();

        server
            .post("/api/assessment/complete")
            .json(&json!({ "sessionId": started.session_id }))
            .await
            .assert_status_ok();

        let response = server
            .post("/api/assessment/answer")
            .json(&json!({
                "sessionId": started.session_id,
                "itemId": question.id,
                "response": "agree",
            }))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "SESSION_NOT_IN_PROGRESS");
    }

    #[tokio::test]
    async fn test_get_session_reports_state() {
        let (app, _) = create_test_app();
        let server = TestServer::new(app).unwrap();
        let started = start_session(&server, &["health"]).await;
        let question = started.first_question.unwrap();

        let response = server
            .get(&format!("/api/assessment/{}", started.session_id))
            .await;
        response.assert_status_ok();
        let body: SessionResponse = response.json();
        assert_eq!(body.status, SessionStatus::InProgress);
        assert_eq!(body.current_question, Some(question));
        assert!(body.answered_items.is_empty());
        assert_eq!(body.selected_domains, vec!["health"]);

        let raw: serde_json::Value = server
            .get(&format!("/api/assessment/{}", started.session_id))
            .await
            .json();
        assert_eq!(raw["status"], "in_progress");
        assert!(raw["completionReason"].is_null());
    }

    #[tokio::test]
    async fn test_get_unknown_session_returns_404() {
        let (app, _) = create_test_app();
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/assessment/nope").await;
        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_delete_session() {
        let (app, _) = create_test_app();
        let server = TestServer::new(app).unwrap();
        let started = start_session(&server, &["econ"]).await;
        let path = format!("/api/assessment/{}", started.session_id);

        server
            .delete(&path)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server.delete(&path).await.assert_status_not_found();
        server.get(&path).await.assert_status_not_found();
    }

    #[test]
    fn test_engine_error_mapping() {
        let (status, Json(body)) = engine_error(EngineError::ItemAlreadyAnswered {
            session_id: "s".into(),
            item_id: "i".into(),
        });
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "ITEM_ALREADY_ANSWERED");

        let (status, _) = engine_error(EngineError::InvalidSpec("bad".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = engine_error(EngineError::InvalidResponse("maybe".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
