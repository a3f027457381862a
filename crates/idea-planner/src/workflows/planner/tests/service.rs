use super::common::*;
use crate::config::CallToActionLinks;
use crate::workflows::planner::intake::ValidationError;
use crate::workflows::planner::knowledge::{BUDGET_DISCLAIMER, TIMELINE_DISCLAIMER};
use crate::workflows::planner::repository::{AnalyticsEvent, SessionId, LEAD_SOURCE};
use crate::workflows::planner::report::CallToActionVariant;
use crate::workflows::planner::service::{PipelineError, PlanSynthesisService};
use crate::workflows::planner::validation::ParseError;
use crate::workflows::planner::service::next_session_id;
use chrono::Duration;
use serde_json::json;
use std::sync::Arc;

fn session(id: &str) -> SessionId {
    SessionId(id.to_string())
}

#[tokio::test]
async fn synthesize_assembles_report_and_persists_submission() {
    let generator = StubGenerator::replying(record_json(true));
    let (service, repository) = build_service(generator.clone());

    let outcome = service
        .synthesize(session("s-1"), submission(), generated_at())
        .await
        .expect("pipeline succeeds");

    assert_eq!(outcome.assessment.score, 95);
    assert!(outcome.assessment.qualified);
    assert_eq!(outcome.record_id.as_ref().map(|id| id.0.as_str()), Some("rec-1"));
    assert_eq!(
        outcome.report.header.subtitle,
        "Surgical instrument / tool - Working prototype - Build a company around it"
    );
    assert_eq!(outcome.report.header.generated_date, "March 7, 2025");
    assert_eq!(
        outcome.report.call_to_action.variant,
        CallToActionVariant::Booking
    );

    let stored = repository.submissions.lock().expect("mutex").clone();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].lead_source, LEAD_SOURCE);
    assert_eq!(
        stored[0].description_expires_at - stored[0].created_at,
        Duration::days(90)
    );
    assert_eq!(repository.event_types(), vec!["plan_generated".to_string()]);
    assert_eq!(generator.prompts().len(), 1);
}

#[tokio::test]
async fn local_scoring_overrides_service_qualification() {
    let generator = StubGenerator::replying(record_json(true));
    let (service, _) = build_service(generator);

    let outcome = service
        .synthesize(session("s-2"), nurture_submission(), generated_at())
        .await
        .expect("pipeline succeeds");

    assert_eq!(outcome.assessment.score, 17);
    assert!(!outcome.assessment.qualified);
    assert!(outcome.service_qualification);
    assert_eq!(
        outcome.report.call_to_action.variant,
        CallToActionVariant::Resources
    );
    assert_eq!(
        outcome.report.call_to_action.link_url,
        CallToActionLinks::default().resources_url
    );
}

#[tokio::test]
async fn invalid_intake_never_reaches_generation() {
    let generator = StubGenerator::replying(record_json(true));
    let (service, repository) = build_service(generator.clone());
    let mut submission = submission();
    submission.device_description = "Too short".to_string();

    let err = service
        .synthesize(session("s-3"), submission, generated_at())
        .await
        .expect_err("validation fails");

    assert!(matches!(
        err,
        PipelineError::Validation(ValidationError::DescriptionTooShort { .. })
    ));
    assert!(generator.prompts().is_empty());
    assert!(repository.event_types().is_empty());
}

#[tokio::test]
async fn generation_failure_leaves_no_report() {
    let (service, repository) = build_service(StubGenerator::with_reply(StubReply::Upstream(529)));

    let err = service
        .synthesize(session("s-4"), submission(), generated_at())
        .await
        .expect_err("generation fails");

    assert!(matches!(err, PipelineError::Generation(_)));
    assert!(service.report(&session("s-4")).is_none());
    assert!(repository.submissions.lock().expect("mutex").is_empty());
}

#[tokio::test]
async fn rejected_output_surfaces_parse_error() {
    let (service, _) = build_service(StubGenerator::replying("Sorry, I cannot produce a plan."));

    let err = service
        .synthesize(session("s-5"), submission(), generated_at())
        .await
        .expect_err("parse fails");

    assert!(matches!(err, PipelineError::Parse(ParseError::NoRecord)));
    assert!(service.report(&session("s-5")).is_none());
}

#[tokio::test]
async fn storage_outage_does_not_fail_the_pipeline() {
    let service = PlanSynthesisService::new(
        Arc::new(StubGenerator::replying(record_json(true))),
        Arc::new(UnavailableRepository),
        CallToActionLinks::default(),
    );

    let outcome = service
        .synthesize(session("s-6"), submission(), generated_at())
        .await
        .expect("pipeline succeeds without storage");

    assert!(outcome.record_id.is_none());
    assert!(service.report(&session("s-6")).is_some());
    assert!(!service.track(AnalyticsEvent {
        session_id: None,
        event_type: "pdf_downloaded".to_string(),
        event_data: json!({}),
    }));
}

#[tokio::test]
async fn render_document_is_repeatable() {
    let (service, _) = build_service(StubGenerator::replying(record_json(true)));
    service
        .synthesize(session("s-7"), submission(), generated_at())
        .await
        .expect("pipeline succeeds");

    let first = service
        .render_document(&session("s-7"))
        .expect("document renders");
    let second = service
        .render_document(&session("s-7"))
        .expect("document renders again");

    assert_eq!(first, second);
    assert!(first.page_count >= 1);
}

#[test]
fn render_document_for_unknown_session_is_not_found() {
    let (service, _) = build_service(StubGenerator::replying(record_json(true)));

    match service.render_document(&session("missing")) {
        Err(PipelineError::SessionNotFound(id)) => assert_eq!(id, session("missing")),
        other => panic!("expected session not found, got {other:?}"),
    }
}

#[tokio::test]
async fn attach_email_validates_and_records_event() {
    let (service, repository) = build_service(StubGenerator::replying(record_json(true)));
    service
        .synthesize(session("s-8"), nurture_submission(), generated_at())
        .await
        .expect("pipeline succeeds");

    assert!(matches!(
        service.attach_email(&session("s-8"), "not-an-email"),
        Err(PipelineError::Validation(ValidationError::InvalidEmail))
    ));
    assert!(matches!(
        service.attach_email(&session("other"), "late@example.com"),
        Err(PipelineError::SessionNotFound(_))
    ));

    service
        .attach_email(&session("s-8"), " late@example.com ")
        .expect("email attached");

    let emails = repository.emails.lock().expect("mutex").clone();
    assert_eq!(emails, vec![(session("s-8"), "late@example.com".to_string())]);
    assert_eq!(
        repository.event_types(),
        vec!["plan_generated".to_string(), "email_submitted".to_string()]
    );
}

#[tokio::test]
async fn reused_session_id_keeps_the_first_report() {
    let generator = StubGenerator::replying(record_json(true));
    let (service, repository) = build_service(generator.clone());

    let first = service
        .synthesize(session("shared"), submission(), generated_at())
        .await
        .expect("first submission succeeds");

    match service
        .synthesize(session("shared"), nurture_submission(), generated_at())
        .await
    {
        Err(PipelineError::SessionConflict(id)) => assert_eq!(id, session("shared")),
        other => panic!("expected session conflict, got {other:?}"),
    }

    let retained = service.report(&session("shared")).expect("report retained");
    assert_eq!(retained.call_to_action.variant, CallToActionVariant::Booking);
    assert_eq!(retained.header.subtitle, first.report.header.subtitle);
    assert_eq!(generator.prompts().len(), 1);
    assert_eq!(repository.submissions.lock().expect("mutex").len(), 1);
}

#[test]
fn fallback_session_ids_are_unique_and_unguessable() {
    let first = next_session_id(generated_at());
    let second = next_session_id(generated_at());

    assert_ne!(first, second);
    let prefix = format!("session_{}_", generated_at().timestamp_millis());
    for id in [&first, &second] {
        let suffix = id.0.strip_prefix(&prefix).expect("timestamp prefix");
        assert_eq!(suffix.len(), 32);
        assert!(suffix.chars().all(|ch| ch.is_ascii_hexdigit()));
    }
}

#[tokio::test]
async fn expired_reports_are_no_longer_downloadable() {
    let (service, _) = build_service(StubGenerator::replying(record_json(true)));
    let service = service.with_retention(std::time::Duration::ZERO);

    service
        .synthesize(session("s-9"), submission(), generated_at())
        .await
        .expect("pipeline succeeds");

    assert!(service.report(&session("s-9")).is_none());
    match service.render_document(&session("s-9")) {
        Err(PipelineError::SessionNotFound(id)) => assert_eq!(id, session("s-9")),
        other => panic!("expected session not found, got {other:?}"),
    }
}

#[tokio::test]
async fn expired_reports_are_swept_on_the_next_insert() {
    let (service, _) = build_service(StubGenerator::replying(record_json(true)));
    let service = service.with_retention(std::time::Duration::ZERO);

    for id in ["s-10", "s-11", "s-12"] {
        service
            .synthesize(session(id), submission(), generated_at())
            .await
            .expect("pipeline succeeds");
    }

    assert_eq!(service.retained_reports(), 1);
}

#[tokio::test]
async fn expired_session_id_can_be_reused() {
    let (service, _) = build_service(StubGenerator::replying(record_json(true)));
    let service = service.with_retention(std::time::Duration::ZERO);

    for _ in 0..2 {
        service
            .synthesize(session("s-13"), submission(), generated_at())
            .await
            .expect("expired session id is free again");
    }
}

#[tokio::test]
async fn assembled_reports_carry_the_fixed_disclaimers() {
    let mut record = record_value(true);
    record["budgetComparison"] =
        json!("Budget Disclaimer: this estimate is guaranteed and needs no review.");
    record["regulatoryPathway"] =
        json!("Timeline Disclaimer: clearance always arrives within 90 days.");
    record["budgetDisclaimer"] = json!("Costs will never exceed this range.");
    record["timelineDisclaimer"] = json!("Timelines are guaranteed.");

    let (service, _) = build_service(StubGenerator::replying(record.to_string()));
    let outcome = service
        .synthesize(session("s-14"), submission(), generated_at())
        .await
        .expect("pipeline succeeds");

    let sections = &outcome.report.sections;
    assert_eq!(sections.budget_reality_check.disclaimer, BUDGET_DISCLAIMER);
    assert_eq!(sections.timeline_disclaimer, TIMELINE_DISCLAIMER);
    assert_eq!(
        sections.budget_reality_check.expectation_comparison,
        "Budget Disclaimer: this estimate is guaranteed and needs no review."
    );
}
