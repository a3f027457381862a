use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::questionnaire::{QuestionCatalogue, QuestionKey};

pub const MIN_DESCRIPTION_CHARS: usize = 200;
pub const MAX_DESCRIPTION_CHARS: usize = 2000;

/// Raw answers as posted by the intake wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_practitioner: Option<bool>,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub device_type: String,
    #[serde(default)]
    pub complexity: String,
    #[serde(default)]
    pub ip_status: String,
    #[serde(default)]
    pub time_commitment: String,
    #[serde(default)]
    pub budget_expectation: String,
    #[serde(default)]
    pub end_goal: String,
    #[serde(default)]
    pub biggest_concern: String,
    #[serde(default)]
    pub employer_type: String,
    #[serde(default)]
    pub coinventors: String,
    #[serde(default)]
    pub target_markets: String,
    #[serde(default)]
    pub device_description: String,
}

impl PlanSubmission {
    fn answer(&self, key: QuestionKey) -> &str {
        match key {
            QuestionKey::Stage => &self.stage,
            QuestionKey::DeviceType => &self.device_type,
            QuestionKey::Complexity => &self.complexity,
            QuestionKey::IpStatus => &self.ip_status,
            QuestionKey::TimeCommitment => &self.time_commitment,
            QuestionKey::BudgetExpectation => &self.budget_expectation,
            QuestionKey::EndGoal => &self.end_goal,
            QuestionKey::BiggestConcern => &self.biggest_concern,
            QuestionKey::EmployerType => &self.employer_type,
            QuestionKey::Coinventors => &self.coinventors,
            QuestionKey::TargetMarkets => &self.target_markets,
        }
    }
}

/// Optional contact details collected by the email gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Accepted intake. Only [`IntakeGuard`] produces these outside tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intake {
    pub identity: Identity,
    pub is_practitioner: bool,
    pub stage: String,
    pub device_type: String,
    pub complexity: String,
    pub ip_status: String,
    pub time_commitment: String,
    pub budget_expectation: String,
    pub end_goal: String,
    pub biggest_concern: String,
    pub employer_type: String,
    pub coinventors: String,
    pub target_markets: String,
    pub device_description: String,
}

impl Intake {
    pub fn answer(&self, key: QuestionKey) -> &str {
        match key {
            QuestionKey::Stage => &self.stage,
            QuestionKey::DeviceType => &self.device_type,
            QuestionKey::Complexity => &self.complexity,
            QuestionKey::IpStatus => &self.ip_status,
            QuestionKey::TimeCommitment => &self.time_commitment,
            QuestionKey::BudgetExpectation => &self.budget_expectation,
            QuestionKey::EndGoal => &self.end_goal,
            QuestionKey::BiggestConcern => &self.biggest_concern,
            QuestionKey::EmployerType => &self.employer_type,
            QuestionKey::Coinventors => &self.coinventors,
            QuestionKey::TargetMarkets => &self.target_markets,
        }
    }
}

/// Intake rejected before any synthesis is attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing answer for {question}")]
    MissingAnswer { question: &'static str },
    #[error("'{value}' is not an option for {question}")]
    UnknownOption { question: &'static str, value: String },
    #[error("please tell us whether you are a practicing physician or dentist")]
    MissingPractitionerFlag,
    #[error("Please provide at least {minimum} characters describing your device (found {found}).")]
    DescriptionTooShort { minimum: usize, found: usize },
    #[error("device description is limited to {maximum} characters (found {found})")]
    DescriptionTooLong { maximum: usize, found: usize },
    #[error("invalid email format")]
    InvalidEmail,
}

/// Guard responsible for producing [`Intake`] instances.
#[derive(Debug)]
pub struct IntakeGuard {
    catalogue: QuestionCatalogue,
}

impl Default for IntakeGuard {
    fn default() -> Self {
        Self::with_catalogue(QuestionCatalogue::standard())
    }
}

impl IntakeGuard {
    pub fn with_catalogue(catalogue: QuestionCatalogue) -> Self {
        Self { catalogue }
    }

    /// Convert a raw submission into an accepted intake.
    pub fn intake_from_submission(
        &self,
        submission: PlanSubmission,
    ) -> Result<Intake, ValidationError> {
        for key in QuestionKey::ordered() {
            let answer = submission.answer(key).trim();
            if answer.is_empty() {
                return Err(ValidationError::MissingAnswer {
                    question: key.data_key(),
                });
            }

            if let Some(question) = self.catalogue.question(key) {
                if !question.accepts(answer) {
                    return Err(ValidationError::UnknownOption {
                        question: key.data_key(),
                        value: answer.to_string(),
                    });
                }
            }
        }

        let is_practitioner = submission
            .is_practitioner
            .ok_or(ValidationError::MissingPractitionerFlag)?;

        let description = submission.device_description.trim().to_string();
        let length = description.chars().count();
        if length < MIN_DESCRIPTION_CHARS {
            return Err(ValidationError::DescriptionTooShort {
                minimum: MIN_DESCRIPTION_CHARS,
                found: length,
            });
        }
        if length > MAX_DESCRIPTION_CHARS {
            return Err(ValidationError::DescriptionTooLong {
                maximum: MAX_DESCRIPTION_CHARS,
                found: length,
            });
        }

        let email = non_blank(submission.email);
        if let Some(address) = email.as_deref() {
            if !is_valid_email(address) {
                return Err(ValidationError::InvalidEmail);
            }
        }

        Ok(Intake {
            identity: Identity {
                name: non_blank(submission.name),
                email,
            },
            is_practitioner,
            stage: submission.stage.trim().to_string(),
            device_type: submission.device_type.trim().to_string(),
            complexity: submission.complexity.trim().to_string(),
            ip_status: submission.ip_status.trim().to_string(),
            time_commitment: submission.time_commitment.trim().to_string(),
            budget_expectation: submission.budget_expectation.trim().to_string(),
            end_goal: submission.end_goal.trim().to_string(),
            biggest_concern: submission.biggest_concern.trim().to_string(),
            employer_type: submission.employer_type.trim().to_string(),
            coinventors: submission.coinventors.trim().to_string(),
            target_markets: submission.target_markets.trim().to_string(),
            device_description: description,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

pub fn is_valid_email(value: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok())
        .as_ref()
        .map(|pattern| pattern.is_match(value.trim()))
        .unwrap_or(false)
}
