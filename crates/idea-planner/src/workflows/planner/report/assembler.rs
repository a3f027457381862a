use chrono::NaiveDate;

use super::{BudgetRealityCheck, CallToAction, Report, ReportHeader, ReportSections};
use crate::config::CallToActionLinks;
use crate::workflows::planner::intake::Intake;
use crate::workflows::planner::knowledge::{BUDGET_DISCLAIMER, TIMELINE_DISCLAIMER};
use crate::workflows::planner::validation::ValidatedRecord;

pub const REPORT_TITLE: &str = "Your Medical Device Development Plan";

/// Folds a validated record into the final [`Report`].
#[derive(Debug, Clone, Default)]
pub struct ReportAssembler {
    links: CallToActionLinks,
}

impl ReportAssembler {
    pub fn new(links: CallToActionLinks) -> Self {
        Self { links }
    }

    /// Disclaimers are always the fixed wording, whatever the record says.
    pub fn assemble(
        &self,
        record: ValidatedRecord,
        intake: &Intake,
        qualified: bool,
        generated_on: NaiveDate,
    ) -> Report {
        let ValidatedRecord {
            where_you_are_now,
            regulatory_pathway,
            next_three_steps,
            timeline,
            budget_comparison,
            budget_breakdown,
            key_risks,
            design_first_focus,
            is_qualified_lead: _,
        } = record;

        Report {
            header: ReportHeader {
                title: REPORT_TITLE.to_string(),
                subtitle: format!(
                    "{} - {} - {}",
                    intake.device_type, intake.stage, intake.end_goal
                ),
                device_type: intake.device_type.clone(),
                generated_on,
                generated_date: generated_on.format("%B %-d, %Y").to_string(),
            },
            sections: ReportSections {
                where_you_are_now,
                regulatory_pathway,
                next_three_steps,
                timeline,
                timeline_disclaimer: TIMELINE_DISCLAIMER.to_string(),
                budget_reality_check: BudgetRealityCheck {
                    expectation_comparison: budget_comparison,
                    breakdown: budget_breakdown,
                    disclaimer: BUDGET_DISCLAIMER.to_string(),
                },
                key_risks,
                design_first_focus,
            },
            call_to_action: CallToAction::select(qualified, &self.links),
        }
    }
}
