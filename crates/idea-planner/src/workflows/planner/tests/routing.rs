use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::config::CallToActionLinks;
use crate::workflows::planner::router::{
    email_handler, generate_handler, track_handler, AttachEmailRequest, GeneratePlanRequest,
    TrackEventRequest,
};
use crate::workflows::planner::{planner_router, PlanSynthesisService};

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn generate_route_returns_plan_payload() {
    let (service, _) = build_service(StubGenerator::replying(record_json(true)));
    let router = planner_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/plans",
            json!({ "session_id": "route-1", "answers": submission() }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["session_id"], "route-1");
    assert_eq!(payload["lead_score"], 95);
    assert_eq!(payload["is_qualified_lead"], true);
    assert_eq!(
        payload["plan"]["header"]["title"],
        "Your Medical Device Development Plan"
    );
    assert_eq!(payload["plan"]["callToAction"]["variant"], "booking");
}

#[tokio::test]
async fn generate_route_rejects_a_session_that_already_has_a_plan() {
    let (service, _) = build_service(StubGenerator::replying(record_json(true)));
    let router = planner_router(Arc::new(service));

    let first = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/plans",
            json!({ "session_id": "route-dup", "answers": submission() }),
        ))
        .await
        .expect("route executes");
    assert_eq!(first.status(), StatusCode::OK);

    let second = router
        .oneshot(json_request(
            "POST",
            "/api/v1/plans",
            json!({ "session_id": "route-dup", "answers": nurture_submission() }),
        ))
        .await
        .expect("route executes");

    assert_eq!(second.status(), StatusCode::CONFLICT);
    let payload = read_json_body(second).await;
    assert_eq!(payload["error"], "Session already has a plan");
    assert_eq!(payload["session_id"], "route-dup");
}

#[tokio::test]
async fn generate_handler_assigns_session_when_absent() {
    let (service, _) = build_service(StubGenerator::replying(record_json(true)));

    let response = generate_handler(
        State(Arc::new(service)),
        axum::Json(GeneratePlanRequest {
            session_id: Some("   ".to_string()),
            answers: submission(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let session = payload["session_id"].as_str().expect("session id string");
    assert!(session.starts_with("session_"));
}

#[tokio::test]
async fn generate_handler_rejects_invalid_intake() {
    let (service, _) = build_service(StubGenerator::replying(record_json(true)));
    let mut answers = submission();
    answers.stage = "Somewhere in between".to_string();

    let response = generate_handler(
        State(Arc::new(service)),
        axum::Json(GeneratePlanRequest {
            session_id: None,
            answers,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error text")
        .contains("Somewhere in between"));
}

#[tokio::test]
async fn generate_handler_reports_missing_credential_as_server_error() {
    let (service, _) = build_service(StubGenerator::with_reply(StubReply::MissingCredential));

    let response = generate_handler(
        State(Arc::new(service)),
        axum::Json(GeneratePlanRequest {
            session_id: None,
            answers: submission(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn generate_handler_hides_upstream_detail() {
    for generator in [
        StubGenerator::with_reply(StubReply::Upstream(500)),
        StubGenerator::replying("{ \"whereYouAreNow\": \"only this\" }"),
    ] {
        let (service, _) = build_service(generator);

        let response = generate_handler(
            State(Arc::new(service)),
            axum::Json(GeneratePlanRequest {
                session_id: None,
                answers: submission(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let payload = read_json_body(response).await;
        assert_eq!(
            payload["error"],
            "Failed to generate plan. Please try again."
        );
    }
}

#[tokio::test]
async fn document_route_streams_pdf_attachment() {
    let (service, _) = build_service(StubGenerator::replying(record_json(true)));
    let service = Arc::new(service);
    service
        .synthesize(
            crate::workflows::planner::SessionId("doc-1".to_string()),
            submission(),
            generated_at(),
        )
        .await
        .expect("pipeline succeeds");

    let response = planner_router(service)
        .oneshot(
            Request::get("/api/v1/plans/doc-1/document")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Design1st_DevicePlan_Surgical_instrument_tool_March_7_2025.pdf\""
    );
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    assert!(body.starts_with(b"%PDF"));
}

#[tokio::test]
async fn document_route_returns_not_found_for_unknown_session() {
    let (service, _) = build_service(StubGenerator::replying(record_json(true)));

    let response = planner_router(Arc::new(service))
        .oneshot(
            Request::get("/api/v1/plans/unknown/document")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn email_handler_validates_input() {
    let (service, _) = build_service(StubGenerator::replying(record_json(true)));
    let service = Arc::new(service);

    let missing = email_handler(
        State(service.clone()),
        Path("s-1".to_string()),
        axum::Json(AttachEmailRequest { email: None }),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let invalid = email_handler(
        State(service.clone()),
        Path("s-1".to_string()),
        axum::Json(AttachEmailRequest {
            email: Some("nope".to_string()),
        }),
    )
    .await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let unknown = email_handler(
        State(service),
        Path("s-1".to_string()),
        axum::Json(AttachEmailRequest {
            email: Some("late@example.com".to_string()),
        }),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn email_route_attaches_to_stored_submission() {
    let (service, repository) = build_service(StubGenerator::replying(record_json(true)));
    let router = planner_router(Arc::new(service));

    let created = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/plans",
            json!({ "session_id": "mail-1", "answers": nurture_submission() }),
        ))
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::OK);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/plans/mail-1/email",
            json!({ "email": "late@example.com" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, json!({ "success": true }));
    assert_eq!(repository.emails.lock().expect("mutex").len(), 1);
}

#[tokio::test]
async fn track_handler_requires_event_type() {
    let (service, _) = build_service(StubGenerator::replying(record_json(true)));

    let response = track_handler(
        State(Arc::new(service)),
        axum::Json(TrackEventRequest {
            session_id: None,
            event_type: None,
            event_data: None,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn track_route_never_fails_the_caller() {
    let service = PlanSynthesisService::new(
        Arc::new(StubGenerator::replying(record_json(true))),
        Arc::new(UnavailableRepository),
        CallToActionLinks::default(),
    );

    let response = planner_router(Arc::new(service))
        .oneshot(json_request(
            "POST",
            "/api/v1/events",
            json!({ "session_id": "s-1", "event_type": "pdf_downloaded" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, json!({ "success": false }));
}
