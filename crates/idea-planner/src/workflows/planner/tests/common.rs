use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};

use crate::config::CallToActionLinks;
use crate::workflows::planner::generation::{GenerationClient, GenerationError};
use crate::workflows::planner::intake::{Intake, IntakeGuard, PlanSubmission};
use crate::workflows::planner::prompt::Prompt;
use crate::workflows::planner::report::{Report, ReportAssembler};
use crate::workflows::planner::repository::{
    AnalyticsEvent, PlanRepository, RecordId, RepositoryError, SessionId, StoredSubmission,
};
use crate::workflows::planner::service::PlanSynthesisService;
use crate::workflows::planner::validation::parse_record;

pub(super) fn description() -> String {
    "A handheld retractor with an integrated LED light source and a single-use sterile tip. \
     Surgeons currently juggle a separate headlamp and a standard retractor during shallow \
     soft tissue procedures, which slows the team and crowds the field of view."
        .to_string()
}

pub(super) fn submission() -> PlanSubmission {
    PlanSubmission {
        name: Some("Dr. Avery Quinn".to_string()),
        email: Some("avery@example.com".to_string()),
        is_practitioner: Some(true),
        stage: "Working prototype".to_string(),
        device_type: "Surgical instrument / tool".to_string(),
        complexity: "Hardware only (mechanical, electrical, or both)".to_string(),
        ip_status: "Provisional patent filed".to_string(),
        time_commitment: "10+ hours".to_string(),
        budget_expectation: "$500,000+".to_string(),
        end_goal: "Build a company around it".to_string(),
        biggest_concern: "Cost and financial risk".to_string(),
        employer_type: "No - private practice or self-employed".to_string(),
        coinventors: "Just me".to_string(),
        target_markets: "United States only".to_string(),
        device_description: description(),
    }
}

/// Lowest-scoring, unqualified profile.
pub(super) fn nurture_submission() -> PlanSubmission {
    PlanSubmission {
        name: None,
        email: None,
        is_practitioner: Some(false),
        stage: "Napkin sketch / concept only".to_string(),
        budget_expectation: "Less than $50,000".to_string(),
        time_commitment: "Less than 2 hours".to_string(),
        ip_status: "No IP protection yet".to_string(),
        ..submission()
    }
}

pub(super) fn intake() -> Intake {
    IntakeGuard::default()
        .intake_from_submission(submission())
        .expect("fixture submission is valid")
}

pub(super) fn generated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 7, 14, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn generated_on() -> NaiveDate {
    generated_at().date_naive()
}

pub(super) fn record_value(qualified: bool) -> Value {
    json!({
        "whereYouAreNow": "You have a **working prototype** and a provisional filing, which puts you ahead of most first-time inventors.",
        "regulatoryPathway": "Likely Class I exempt or Class II 510(k) depending on the light source classification.",
        "nextThreeSteps": [
            "Confirm the regulatory classification with a pre-submission review",
            "Lock the design inputs and start a design history file",
            "Convert the provisional into a full utility filing before month 12"
        ],
        "timeline": [
            { "milestone": "Design inputs locked", "timeframe": "Months 1-2" },
            { "milestone": "Engineering prototype", "timeframe": "Months 3-6" },
            { "milestone": "Verification testing", "timeframe": "Months 7-10" },
            { "milestone": "510(k) submission", "timeframe": "Month 11" },
            { "milestone": "Clearance and launch", "timeframe": "Months 14-16" }
        ],
        "budgetComparison": "Your budget is realistic for a Class II hardware device.",
        "budgetBreakdown": [
            { "category": "Engineering and prototyping", "range": "$120,000 - $200,000" },
            { "category": "Verification and validation", "range": "$80,000 - $150,000" },
            { "category": "Regulatory submission", "range": "$40,000 - $80,000" },
            { "category": "Manufacturing transfer", "range": "$60,000 - $120,000" }
        ],
        "keyRisks": [
            { "title": "Predicate selection", "description": "An illuminated retractor may not share a predicate with plain retractors.", "severity": "HIGH" },
            { "title": "Sterility claims", "description": "A single-use tip needs validated sterilization.", "severity": "MEDIUM" },
            { "title": "Thermal safety", "description": "LED heat near tissue needs early characterization.", "severity": "LOW" }
        ],
        "designFirstFocus": [
            "Run a regulatory strategy session to confirm the predicate",
            "Define design inputs for the illumination module"
        ],
        "isQualifiedLead": qualified
    })
}

pub(super) fn record_json(qualified: bool) -> String {
    record_value(qualified).to_string()
}

pub(super) fn report(qualified: bool) -> Report {
    let record = parse_record(&record_json(qualified)).expect("fixture record is valid");
    ReportAssembler::default().assemble(record, &intake(), qualified, generated_on())
}

/// Canned reply for [`StubGenerator`].
#[derive(Clone)]
pub(super) enum StubReply {
    Text(String),
    MissingCredential,
    Upstream(u16),
}

#[derive(Clone)]
pub(super) struct StubGenerator {
    reply: StubReply,
    prompts: Arc<Mutex<Vec<Prompt>>>,
}

impl StubGenerator {
    pub(super) fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(StubReply::Text(text.into()))
    }

    pub(super) fn with_reply(reply: StubReply) -> Self {
        Self {
            reply,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(super) fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().expect("prompt mutex poisoned").clone()
    }
}

#[async_trait]
impl GenerationClient for StubGenerator {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt.clone());
        match &self.reply {
            StubReply::Text(text) => Ok(text.clone()),
            StubReply::MissingCredential => Err(GenerationError::MissingCredential),
            StubReply::Upstream(status) => Err(GenerationError::Upstream {
                status: Some(*status),
                body: "overloaded".to_string(),
            }),
        }
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) submissions: Arc<Mutex<Vec<StoredSubmission>>>,
    pub(super) events: Arc<Mutex<Vec<AnalyticsEvent>>>,
    pub(super) emails: Arc<Mutex<Vec<(SessionId, String)>>>,
}

impl MemoryRepository {
    pub(super) fn event_types(&self) -> Vec<String> {
        self.events
            .lock()
            .expect("event mutex poisoned")
            .iter()
            .map(|event| event.event_type.clone())
            .collect()
    }
}

impl PlanRepository for MemoryRepository {
    fn save(&self, submission: &StoredSubmission) -> Result<RecordId, RepositoryError> {
        let mut guard = self.submissions.lock().expect("repository mutex poisoned");
        guard.push(submission.clone());
        Ok(RecordId(format!("rec-{}", guard.len())))
    }

    fn record_event(&self, event: &AnalyticsEvent) -> Result<(), RepositoryError> {
        self.events
            .lock()
            .expect("event mutex poisoned")
            .push(event.clone());
        Ok(())
    }

    fn attach_email(&self, session_id: &SessionId, email: &str) -> Result<(), RepositoryError> {
        let known = self
            .submissions
            .lock()
            .expect("repository mutex poisoned")
            .iter()
            .any(|stored| &stored.session_id == session_id);
        if !known {
            return Err(RepositoryError::NotFound);
        }
        self.emails
            .lock()
            .expect("email mutex poisoned")
            .push((session_id.clone(), email.to_string()));
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl PlanRepository for UnavailableRepository {
    fn save(&self, _submission: &StoredSubmission) -> Result<RecordId, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn record_event(&self, _event: &AnalyticsEvent) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn attach_email(&self, _session_id: &SessionId, _email: &str) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service(
    generator: StubGenerator,
) -> (
    PlanSynthesisService<StubGenerator, MemoryRepository>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = PlanSynthesisService::new(
        Arc::new(generator),
        repository.clone(),
        CallToActionLinks::default(),
    );
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
