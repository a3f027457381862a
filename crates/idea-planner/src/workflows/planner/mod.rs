//! Medical device idea planner.
//!
//! A questionnaire submission flows through intake validation, lead scoring,
//! prompt construction, one outbound generation call, response validation and
//! report assembly. The assembled report can then be rendered as a paginated
//! document on demand.

pub mod generation;
pub mod intake;
pub mod knowledge;
pub mod prompt;
pub mod questionnaire;
pub mod render;
pub mod report;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use generation::{GenerationClient, GenerationError, HttpGenerationClient};
pub use intake::{Identity, Intake, IntakeGuard, PlanSubmission, ValidationError};
pub use knowledge::KnowledgeBase;
pub use prompt::{Prompt, PromptBuilder};
pub use questionnaire::{Question, QuestionCatalogue, QuestionKey};
pub use render::{DocumentRenderer, RenderError, RenderedDocument};
pub use report::{CallToAction, CallToActionVariant, Report, ReportAssembler};
pub use repository::{
    AnalyticsEvent, PlanRepository, RecordId, RepositoryError, SessionId, StoredSubmission,
};
pub use router::planner_router;
pub use scoring::{LeadAssessment, LeadScorer, ScoreComponent, ScoreDimension};
pub use service::{PipelineError, PlanOutcome, PlanSynthesisService};
pub use validation::{parse_record, ParseError, Severity, ValidatedRecord};
