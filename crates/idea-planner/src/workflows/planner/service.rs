use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::generation::{GenerationClient, GenerationError};
use super::intake::{is_valid_email, IntakeGuard, PlanSubmission, ValidationError};
use super::knowledge::KnowledgeBase;
use super::prompt::PromptBuilder;
use super::render::{DocumentRenderer, RenderError, RenderedDocument};
use super::report::{Report, ReportAssembler};
use super::repository::{
    AnalyticsEvent, PlanRepository, RecordId, RepositoryError, SessionId, StoredSubmission,
};
use super::scoring::{LeadAssessment, LeadScorer};
use super::validation::{parse_record, ParseError};
use crate::config::CallToActionLinks;

/// How long a report stays downloadable after it was assembled.
const DEFAULT_REPORT_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);
/// Upper bound on retained reports; the oldest is evicted first.
const MAX_RETAINED_REPORTS: usize = 10_000;

/// Fallback identifier for callers that did not supply a session id.
/// The random component keeps ids unguessable.
pub fn next_session_id(now: DateTime<Utc>) -> SessionId {
    SessionId(format!(
        "session_{}_{}",
        now.timestamp_millis(),
        Uuid::new_v4().simple()
    ))
}

struct RetainedReport {
    report: Arc<Report>,
    retained_at: Instant,
}

impl RetainedReport {
    fn is_live(&self, retention: Duration) -> bool {
        self.retained_at.elapsed() < retention
    }
}

/// Result of one successful pipeline run.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub session_id: SessionId,
    pub report: Arc<Report>,
    pub assessment: LeadAssessment,
    /// Qualification flag as reported by the generation service. Advisory only.
    pub service_qualification: bool,
    pub record_id: Option<RecordId>,
}

/// Orchestrates intake, generation, validation, scoring and assembly.
pub struct PlanSynthesisService<G, R> {
    guard: Arc<IntakeGuard>,
    prompts: Arc<PromptBuilder>,
    generator: Arc<G>,
    repository: Arc<R>,
    scorer: LeadScorer,
    assembler: ReportAssembler,
    renderer: DocumentRenderer,
    retention: Duration,
    reports: RwLock<HashMap<SessionId, RetainedReport>>,
}

impl<G, R> PlanSynthesisService<G, R>
where
    G: GenerationClient + 'static,
    R: PlanRepository + 'static,
{
    pub fn new(generator: Arc<G>, repository: Arc<R>, links: CallToActionLinks) -> Self {
        Self::with_knowledge(
            Arc::new(KnowledgeBase::standard()),
            generator,
            repository,
            links,
        )
    }

    pub fn with_knowledge(
        knowledge: Arc<KnowledgeBase>,
        generator: Arc<G>,
        repository: Arc<R>,
        links: CallToActionLinks,
    ) -> Self {
        Self {
            guard: Arc::new(IntakeGuard::default()),
            prompts: Arc::new(PromptBuilder::new(knowledge)),
            generator,
            repository,
            scorer: LeadScorer,
            assembler: ReportAssembler::new(links),
            renderer: DocumentRenderer,
            retention: DEFAULT_REPORT_RETENTION,
            reports: RwLock::new(HashMap::new()),
        }
    }

    /// Override how long assembled reports stay downloadable.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Run the full pipeline for one submission.
    ///
    /// Dropping the returned future abandons the in-flight generation call.
    pub async fn synthesize(
        &self,
        session_id: SessionId,
        submission: PlanSubmission,
        generated_at: DateTime<Utc>,
    ) -> Result<PlanOutcome, PipelineError> {
        let intake = self.guard.intake_from_submission(submission)?;
        if self.report(&session_id).is_some() {
            return Err(PipelineError::SessionConflict(session_id));
        }
        let assessment = self.scorer.assess(&intake);
        let prompt = self.prompts.build(&intake);

        info!(
            session = %session_id,
            device_type = %intake.device_type,
            lead_score = assessment.score,
            "requesting plan generation"
        );

        let raw = self.generator.generate(&prompt).await.map_err(|err| {
            if let GenerationError::Upstream { status, body } = &err {
                error!(session = %session_id, ?status, body = %body, "plan generation failed");
            } else {
                error!(session = %session_id, error = %err, "plan generation unavailable");
            }
            err
        })?;

        let record = parse_record(&raw).map_err(|err| {
            error!(session = %session_id, error = %err, raw = %raw, "generation output rejected");
            err
        })?;

        let service_qualification = record.is_qualified_lead;
        if service_qualification != assessment.qualified {
            warn!(
                session = %session_id,
                service_qualification,
                qualified = assessment.qualified,
                "generation service disagreed on lead qualification"
            );
        }

        let report = Arc::new(self.assembler.assemble(
            record,
            &intake,
            assessment.qualified,
            generated_at.date_naive(),
        ));

        self.keep_report(&session_id, report.clone())?;

        let stored = StoredSubmission::new(
            session_id.clone(),
            intake,
            (*report).clone(),
            &assessment,
            generated_at,
        );
        let record_id = match self.repository.save(&stored) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(session = %session_id, error = %err, "failed to persist submission");
                None
            }
        };

        self.track(AnalyticsEvent {
            session_id: Some(session_id.clone()),
            event_type: "plan_generated".to_string(),
            event_data: json!({
                "lead_score": assessment.score,
                "qualified": assessment.qualified,
            }),
        });

        info!(session = %session_id, qualified = assessment.qualified, "plan assembled");

        Ok(PlanOutcome {
            session_id,
            report,
            assessment,
            service_qualification,
            record_id,
        })
    }

    /// The retained report for a session, unless it has expired.
    pub fn report(&self, session_id: &SessionId) -> Option<Arc<Report>> {
        self.reports
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_id)
            .filter(|entry| entry.is_live(self.retention))
            .map(|entry| entry.report.clone())
    }

    #[cfg(test)]
    pub(crate) fn retained_reports(&self) -> usize {
        self.reports
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn keep_report(&self, session_id: &SessionId, report: Arc<Report>) -> Result<(), PipelineError> {
        let retention = self.retention;
        let mut reports = self.reports.write().unwrap_or_else(PoisonError::into_inner);

        let before = reports.len();
        reports.retain(|_, entry| entry.is_live(retention));
        let expired = before - reports.len();
        if expired > 0 {
            debug!(expired, "evicted expired reports");
        }

        if reports.contains_key(session_id) {
            return Err(PipelineError::SessionConflict(session_id.clone()));
        }

        while reports.len() >= MAX_RETAINED_REPORTS {
            let oldest = reports
                .iter()
                .min_by_key(|(_, entry)| entry.retained_at)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    reports.remove(&id);
                }
                None => break,
            }
        }

        reports.insert(
            session_id.clone(),
            RetainedReport {
                report,
                retained_at: Instant::now(),
            },
        );
        Ok(())
    }

    /// Render the retained report for a session. Safe to call repeatedly.
    pub fn render_document(&self, session_id: &SessionId) -> Result<RenderedDocument, PipelineError> {
        let report = self
            .report(session_id)
            .ok_or_else(|| PipelineError::SessionNotFound(session_id.clone()))?;
        let document = self.renderer.render(&report).map_err(|err| {
            error!(session = %session_id, error = %err, "document rendering failed");
            err
        })?;
        info!(session = %session_id, pages = document.page_count, "document rendered");
        Ok(document)
    }

    /// Attach a late-supplied email address to the stored submission.
    pub fn attach_email(&self, session_id: &SessionId, email: &str) -> Result<(), PipelineError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail.into());
        }

        match self.repository.attach_email(session_id, email) {
            Ok(()) => {}
            Err(RepositoryError::NotFound) => {
                return Err(PipelineError::SessionNotFound(session_id.clone()))
            }
            Err(other) => return Err(other.into()),
        }

        self.track(AnalyticsEvent {
            session_id: Some(session_id.clone()),
            event_type: "email_submitted".to_string(),
            event_data: json!({ "email": email }),
        });
        Ok(())
    }

    /// Record an analytics event. Returns whether storage accepted it.
    pub fn track(&self, event: AnalyticsEvent) -> bool {
        match self.repository.record_event(&event) {
            Ok(()) => true,
            Err(err) => {
                warn!(event_type = %event.event_type, error = %err, "failed to record analytics event");
                false
            }
        }
    }
}

/// Error raised by the plan synthesis service.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("no plan found for session {0}")]
    SessionNotFound(SessionId),
    #[error("session {0} already has a plan")]
    SessionConflict(SessionId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
