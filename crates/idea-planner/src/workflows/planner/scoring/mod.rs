mod tables;

use serde::{Deserialize, Serialize};

use super::intake::Intake;
use tables::{
    lookup, BUDGET_POINTS, PRACTITIONER_POINTS, STAGE_POINTS, TIME_POINTS, TOP_BUDGET_TIER,
    UNSURE_BUDGET_TIER,
};

const MAX_SCORE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDimension {
    Budget,
    Stage,
    Practitioner,
    TimeCommitment,
}

impl ScoreDimension {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Budget => "Budget expectation",
            Self::Stage => "Development stage",
            Self::Practitioner => "Practicing clinician",
            Self::TimeCommitment => "Weekly time commitment",
        }
    }
}

/// Discrete contribution to a lead score, kept for audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub dimension: ScoreDimension,
    pub points: u8,
    pub notes: String,
}

/// Lead score and qualification derived from an intake alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadAssessment {
    pub score: u8,
    pub qualified: bool,
    pub components: Vec<ScoreComponent>,
}

impl LeadAssessment {
    /// Tags attached to the stored submission for CRM routing.
    pub fn crm_tags(&self, intake: &Intake) -> Vec<String> {
        let mut tags = vec![
            "idea-planner".to_string(),
            format!("device-{}", slug(&intake.device_type)),
            format!("stage-{}", slug(&intake.stage)),
        ];
        tags.push(if self.qualified { "qualified" } else { "nurture" }.to_string());
        if intake.is_practitioner {
            tags.push("practitioner".to_string());
        }
        if intake.budget_expectation == UNSURE_BUDGET_TIER {
            tags.push("budget-unsure".to_string());
        }
        tags
    }
}

/// Stateless additive scorer over fixed lookup tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct LeadScorer;

impl LeadScorer {
    pub fn assess(&self, intake: &Intake) -> LeadAssessment {
        let components = vec![
            table_component(ScoreDimension::Budget, BUDGET_POINTS, &intake.budget_expectation),
            table_component(ScoreDimension::Stage, STAGE_POINTS, &intake.stage),
            practitioner_component(intake.is_practitioner),
            table_component(
                ScoreDimension::TimeCommitment,
                TIME_POINTS,
                &intake.time_commitment,
            ),
        ];

        let total: u16 = components.iter().map(|c| u16::from(c.points)).sum();
        let score = total.min(u16::from(MAX_SCORE)) as u8;

        LeadAssessment {
            score,
            qualified: self.is_qualified(intake),
            components,
        }
    }

    pub fn score(&self, intake: &Intake) -> u8 {
        self.assess(intake).score
    }

    /// Budget certainty at the top tier and budget uncertainty both qualify.
    pub fn is_qualified(&self, intake: &Intake) -> bool {
        matches!(
            intake.budget_expectation.as_str(),
            TOP_BUDGET_TIER | UNSURE_BUDGET_TIER
        )
    }
}

fn table_component(dimension: ScoreDimension, table: &[(&str, u8)], answer: &str) -> ScoreComponent {
    match lookup(table, answer) {
        Some(points) => ScoreComponent {
            dimension,
            points,
            notes: format!("'{answer}' scores {points}"),
        },
        None => ScoreComponent {
            dimension,
            points: 0,
            notes: format!("'{answer}' is not a scored answer"),
        },
    }
}

fn practitioner_component(is_practitioner: bool) -> ScoreComponent {
    let points = if is_practitioner { PRACTITIONER_POINTS } else { 0 };
    ScoreComponent {
        dimension: ScoreDimension::Practitioner,
        points,
        notes: if is_practitioner {
            "practicing physician or dentist".to_string()
        } else {
            "not a practicing clinician".to_string()
        },
    }
}

fn slug(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}
