use chrono::NaiveDate;
use idea_planner::workflows::planner::{
    AnalyticsEvent, PlanRepository, RecordId, RepositoryError, SessionId, StoredSubmission,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local storage used until a durable backend is wired in.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPlanRepository {
    submissions: Arc<Mutex<HashMap<SessionId, StoredSubmission>>>,
    emails: Arc<Mutex<HashMap<SessionId, String>>>,
    events: Arc<Mutex<Vec<AnalyticsEvent>>>,
}

#[cfg(test)]
impl InMemoryPlanRepository {
    pub(crate) fn email(&self, session_id: &SessionId) -> Option<String> {
        self.emails
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_id)
            .cloned()
    }

    pub(crate) fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PlanRepository for InMemoryPlanRepository {
    fn save(&self, submission: &StoredSubmission) -> Result<RecordId, RepositoryError> {
        let mut guard = self
            .submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        guard.insert(submission.session_id.clone(), submission.clone());
        Ok(RecordId(format!("submission-{}", submission.session_id)))
    }

    fn record_event(&self, event: &AnalyticsEvent) -> Result<(), RepositoryError> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        Ok(())
    }

    fn attach_email(&self, session_id: &SessionId, email: &str) -> Result<(), RepositoryError> {
        let known = self
            .submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(session_id);
        if !known {
            return Err(RepositoryError::NotFound);
        }
        self.emails
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session_id.clone(), email.to_string());
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn attach_email_requires_known_session() {
        let repository = InMemoryPlanRepository::default();
        let session = SessionId("unknown".to_string());

        assert!(matches!(
            repository.attach_email(&session, "late@example.com"),
            Err(RepositoryError::NotFound)
        ));
        assert!(repository.email(&session).is_none());
    }

    #[test]
    fn events_are_kept_in_order() {
        let repository = InMemoryPlanRepository::default();
        for event_type in ["plan_generated", "pdf_downloaded"] {
            repository
                .record_event(&AnalyticsEvent {
                    session_id: None,
                    event_type: event_type.to_string(),
                    event_data: json!({}),
                })
                .expect("event recorded");
        }

        let recorded: Vec<String> = repository
            .events()
            .into_iter()
            .map(|event| event.event_type)
            .collect();
        assert_eq!(recorded, vec!["plan_generated", "pdf_downloaded"]);
    }

    #[test]
    fn parse_date_reports_bad_input() {
        assert_eq!(
            parse_date(" 2025-03-07 "),
            Ok(NaiveDate::from_ymd_opt(2025, 3, 7).expect("valid date"))
        );
        assert!(parse_date("03/07/2025")
            .expect_err("slash dates rejected")
            .contains("03/07/2025"));
    }
}
