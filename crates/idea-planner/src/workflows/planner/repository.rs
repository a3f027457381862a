use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::intake::Intake;
use super::report::Report;
use super::scoring::LeadAssessment;

pub const LEAD_SOURCE: &str = "Idea Planner Tool";
pub const DESCRIPTION_RETENTION_DAYS: i64 = 90;

/// Opaque client-supplied session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

/// Everything handed to storage once a plan has been assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSubmission {
    pub session_id: SessionId,
    pub intake: Intake,
    pub report: Report,
    pub lead_score: u8,
    pub is_qualified_lead: bool,
    pub lead_source: String,
    pub crm_tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub description_expires_at: DateTime<Utc>,
}

impl StoredSubmission {
    pub fn new(
        session_id: SessionId,
        intake: Intake,
        report: Report,
        assessment: &LeadAssessment,
        created_at: DateTime<Utc>,
    ) -> Self {
        let crm_tags = assessment.crm_tags(&intake);
        Self {
            session_id,
            intake,
            report,
            lead_score: assessment.score,
            is_qualified_lead: assessment.qualified,
            lead_source: LEAD_SOURCE.to_string(),
            crm_tags,
            created_at,
            description_expires_at: created_at + Duration::days(DESCRIPTION_RETENTION_DAYS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    #[serde(default)]
    pub session_id: Option<SessionId>,
    pub event_type: String,
    #[serde(default)]
    pub event_data: Value,
}

/// Storage collaborator. Calls are best-effort from the pipeline's view.
pub trait PlanRepository: Send + Sync {
    fn save(&self, submission: &StoredSubmission) -> Result<RecordId, RepositoryError>;
    fn record_event(&self, event: &AnalyticsEvent) -> Result<(), RepositoryError>;
    fn attach_email(&self, session_id: &SessionId, email: &str) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
