mod assembler;
pub mod views;

pub use assembler::{ReportAssembler, REPORT_TITLE};
pub use views::{CallToAction, CallToActionVariant};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validation::{BudgetLine, Milestone, RiskEntry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportHeader {
    pub title: String,
    pub subtitle: String,
    pub device_type: String,
    pub generated_on: NaiveDate,
    pub generated_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRealityCheck {
    pub expectation_comparison: String,
    pub breakdown: Vec<BudgetLine>,
    pub disclaimer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSections {
    pub where_you_are_now: String,
    pub regulatory_pathway: String,
    pub next_three_steps: Vec<String>,
    pub timeline: Vec<Milestone>,
    pub timeline_disclaimer: String,
    pub budget_reality_check: BudgetRealityCheck,
    pub key_risks: Vec<RiskEntry>,
    pub design_first_focus: Vec<String>,
}

/// Immutable user-facing plan. Rendering never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub header: ReportHeader,
    pub sections: ReportSections,
    pub call_to_action: CallToAction,
}
