use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use super::generation::GenerationClient;
use super::intake::PlanSubmission;
use super::repository::{AnalyticsEvent, PlanRepository, SessionId};
use super::service::{next_session_id, PipelineError, PlanSynthesisService};

const GENERIC_FAILURE: &str = "Failed to generate plan. Please try again.";

#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub answers: PlanSubmission,
}

#[derive(Debug, Deserialize)]
pub struct AttachEmailRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrackEventRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub event_data: Option<Value>,
}

/// Router builder exposing plan generation, download, email capture and tracking.
pub fn planner_router<G, R>(service: Arc<PlanSynthesisService<G, R>>) -> Router
where
    G: GenerationClient + 'static,
    R: PlanRepository + 'static,
{
    Router::new()
        .route("/api/v1/plans", post(generate_handler::<G, R>))
        .route(
            "/api/v1/plans/:session_id/document",
            axum::routing::get(document_handler::<G, R>),
        )
        .route(
            "/api/v1/plans/:session_id/email",
            post(email_handler::<G, R>),
        )
        .route("/api/v1/events", post(track_handler::<G, R>))
        .with_state(service)
}

pub(crate) async fn generate_handler<G, R>(
    State(service): State<Arc<PlanSynthesisService<G, R>>>,
    axum::Json(request): axum::Json<GeneratePlanRequest>,
) -> Response
where
    G: GenerationClient + 'static,
    R: PlanRepository + 'static,
{
    let now = Utc::now();
    let session_id = request
        .session_id
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(SessionId)
        .unwrap_or_else(|| next_session_id(now));

    match service.synthesize(session_id, request.answers, now).await {
        Ok(outcome) => {
            let payload = json!({
                "session_id": outcome.session_id,
                "plan": outcome.report.as_ref(),
                "lead_score": outcome.assessment.score,
                "is_qualified_lead": outcome.assessment.qualified,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(PipelineError::Validation(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(PipelineError::SessionConflict(session_id)) => {
            let payload = json!({
                "error": "Session already has a plan",
                "session_id": session_id,
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(PipelineError::Generation(error)) if error.is_configuration() => {
            let payload = json!({
                "error": "Plan generation is not configured.",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
        Err(PipelineError::Generation(_)) | Err(PipelineError::Parse(_)) => {
            let payload = json!({
                "error": GENERIC_FAILURE,
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
        Err(_) => {
            let payload = json!({
                "error": GENERIC_FAILURE,
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn document_handler<G, R>(
    State(service): State<Arc<PlanSynthesisService<G, R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    G: GenerationClient + 'static,
    R: PlanRepository + 'static,
{
    let session_id = SessionId(session_id);
    match service.render_document(&session_id) {
        Ok(document) => {
            let disposition = format!("attachment; filename=\"{}\"", document.filename);
            let mut response = (StatusCode::OK, document.bytes).into_response();
            let headers = response.headers_mut();
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
            if let Ok(value) = HeaderValue::from_str(&disposition) {
                headers.insert(header::CONTENT_DISPOSITION, value);
            }
            response
        }
        Err(PipelineError::SessionNotFound(_)) => {
            let payload = json!({
                "error": "Plan not found",
                "session_id": session_id,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn email_handler<G, R>(
    State(service): State<Arc<PlanSynthesisService<G, R>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<AttachEmailRequest>,
) -> Response
where
    G: GenerationClient + 'static,
    R: PlanRepository + 'static,
{
    let Some(email) = request.email.filter(|email| !email.trim().is_empty()) else {
        let payload = json!({ "error": "Missing required fields" });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    };

    match service.attach_email(&SessionId(session_id), &email) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(PipelineError::Validation(_)) => {
            let payload = json!({ "error": "Invalid email format" });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(PipelineError::SessionNotFound(_)) => {
            let payload = json!({ "error": "Submission not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(_) => {
            let payload = json!({ "error": "Failed to save email" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn track_handler<G, R>(
    State(service): State<Arc<PlanSynthesisService<G, R>>>,
    axum::Json(request): axum::Json<TrackEventRequest>,
) -> Response
where
    G: GenerationClient + 'static,
    R: PlanRepository + 'static,
{
    let Some(event_type) = request
        .event_type
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    else {
        let payload = json!({ "error": "Missing eventType" });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    };

    let accepted = service.track(AnalyticsEvent {
        session_id: request.session_id.filter(|id| !id.is_empty()).map(SessionId),
        event_type,
        event_data: request.event_data.unwrap_or_else(|| json!({})),
    });

    (StatusCode::OK, axum::Json(json!({ "success": accepted }))).into_response()
}
