use std::fmt::Write as _;
use std::sync::Arc;

use serde::Serialize;

use super::intake::Intake;
use super::knowledge::{
    KnowledgeBase, BUDGET_DISCLAIMER, REGULATORY_DISCLAIMER, TIMELINE_DISCLAIMER,
};
use super::questionnaire::QuestionKey;

const NOT_PROVIDED: &str = "Not provided";

const PERSONA: &str = "You are an expert medical device development consultant working for Design 1st, a product development firm with 16+ years of experience and 1200+ products developed.

Your role is to generate personalized development plans for physician and dentist inventors who have medical device ideas. You must be:
- Encouraging but realistic
- Direct about risks and challenges
- Clear about timelines and budgets
- Never provide legal advice (always defer to \"consult patent attorney\")
- Never provide fixed estimates (always ranges)";

const OUTPUT_SCHEMA: &str = r#"OUTPUT FORMAT:
You must respond with a JSON object containing these exact sections. Each section should be well-written, personalized content based on the user's inputs.

{
  "whereYouAreNow": "string - 2-3 paragraphs reflecting their current stage and validating their progress",
  "regulatoryPathway": "string - explanation of likely classification, pathway, timeline, and key considerations. Include the disclaimer.",
  "nextThreeSteps": ["step1", "step2", "step3"] - exactly three specific, actionable steps based on their situation,
  "timeline": [{"milestone": "name", "timeframe": "X-Y months"}] - array of 5-7 milestones with timeframes,
  "budgetComparison": "string - compare their expectation to reality, be direct if there's a gap",
  "budgetBreakdown": [{"category": "name", "range": "$X - $Y"}] - 4-5 budget categories,
  "keyRisks": [{"title": "RISK NAME", "description": "explanation", "severity": "HIGH|MEDIUM|LOW"}] - exactly 3 risks,
  "designFirstFocus": ["action1", "action2"] - 2-3 specific things D1 would focus on,
  "isQualifiedLead": boolean - true if budget expectation is "$500,000+" or "I have no idea"
}"#;

const TASK_CLOSING: &str = "Based on these inputs, generate a comprehensive, personalized development plan. Be specific to their situation. Address their biggest concern directly. Flag any critical risks based on their IP status, employment, and other factors.

Respond with ONLY the JSON object, no other text.";

/// The two text blocks sent to the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub instructions: String,
    pub task: String,
}

/// Deterministic prompt assembly over a shared knowledge base.
///
/// The instruction block only depends on the knowledge base, so it is rendered
/// once at construction and reused for every intake.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    knowledge: Arc<KnowledgeBase>,
    instructions: String,
}

impl PromptBuilder {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        let instructions = render_instructions(&knowledge);
        Self {
            knowledge,
            instructions,
        }
    }

    pub fn build(&self, intake: &Intake) -> Prompt {
        Prompt {
            instructions: self.instructions.clone(),
            task: render_task(&self.knowledge, intake),
        }
    }
}

fn render_instructions(knowledge: &KnowledgeBase) -> String {
    let mut out = String::with_capacity(8 * 1024);
    out.push_str(PERSONA);

    out.push_str("\n\nIMPORTANT POSITIONING POINTS TO WEAVE IN:\n");
    for point in &knowledge.positioning {
        let _ = writeln!(out, "- {}: {}", point.topic, point.statement);
    }

    out.push_str("\nREGULATORY PATHWAY KNOWLEDGE:\n");
    for row in &knowledge.regulatory_pathways {
        let _ = writeln!(
            out,
            "- {} | typical class: {} | likely pathway: {} | timeline: {}",
            row.device_type, row.typical_class, row.likely_pathway, row.timeline
        );
    }

    out.push_str("\nBUDGET RANGE KNOWLEDGE:\n");
    for row in &knowledge.budget_ranges {
        let _ = writeln!(
            out,
            "- {} | development: {} | regulatory: {} | total: {}",
            row.device_type, row.development, row.regulatory, row.total_range
        );
    }

    out.push_str("\nTIMELINE MODIFIERS:\n");
    for modifier in &knowledge.timeline_modifiers {
        let _ = writeln!(out, "- {}: {}", modifier.factor, modifier.adjustment);
    }

    out.push_str("\nSTAGE-SPECIFIC CONTENT:\n");
    for entry in &knowledge.stage_narratives {
        let _ = writeln!(out, "- {}: {}", entry.stage, entry.narrative);
    }

    out.push('\n');
    out.push_str(OUTPUT_SCHEMA);

    out.push_str("\n\nREQUIRED DISCLAIMERS TO INCLUDE:\n");
    let _ = writeln!(out, "- Regulatory: \"{REGULATORY_DISCLAIMER}\"");
    let _ = writeln!(out, "- Budget: \"{BUDGET_DISCLAIMER}\"");
    let _ = write!(out, "- Timeline: \"{TIMELINE_DISCLAIMER}\"");
    out
}

fn render_task(knowledge: &KnowledgeBase, intake: &Intake) -> String {
    let mut out = String::with_capacity(4 * 1024);
    out.push_str(
        "Generate a personalized medical device development plan based on these inputs:\n\n",
    );

    out.push_str("USER PROFILE:\n");
    let _ = writeln!(
        out,
        "- Name: {}",
        intake.identity.name.as_deref().unwrap_or(NOT_PROVIDED)
    );
    let _ = writeln!(
        out,
        "- Email: {}",
        intake.identity.email.as_deref().unwrap_or(NOT_PROVIDED)
    );
    let _ = writeln!(
        out,
        "- Is Practitioner: {}",
        if intake.is_practitioner { "Yes" } else { "No" }
    );

    out.push_str("\nDEVICE & SITUATION:\n");
    for key in QuestionKey::ordered() {
        let _ = writeln!(out, "- {}: {}", key.label(), intake.answer(key));
    }

    out.push_str("\nDEVICE DESCRIPTION:\n");
    out.push_str(&intake.device_description);
    out.push_str("\n\n");

    out.push_str("RISK SIGNALS DETECTED FROM ANSWERS:\n");
    let mut any = false;
    for trigger in knowledge.triggered_risks(intake) {
        any = true;
        let _ = writeln!(
            out,
            "- {} ({}): {}",
            trigger.title,
            trigger.severity.label(),
            trigger.description
        );
    }
    if !any {
        out.push_str("- None detected\n");
    }

    out.push('\n');
    out.push_str(TASK_CLOSING);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::planner::intake::Identity;

    fn intake() -> Intake {
        Intake {
            identity: Identity::default(),
            is_practitioner: true,
            stage: "Working prototype".to_string(),
            device_type: "Implant".to_string(),
            complexity: "Hardware only (mechanical, electrical, or both)".to_string(),
            ip_status: "Provisional patent filed".to_string(),
            time_commitment: "5-10 hours".to_string(),
            budget_expectation: "$500,000+".to_string(),
            end_goal: "Build a company around it".to_string(),
            biggest_concern: "Cost and financial risk".to_string(),
            employer_type: "No - private practice or self-employed".to_string(),
            coinventors: "Just me".to_string(),
            target_markets: "United States only".to_string(),
            device_description: "A resorbable fixation anchor for small joint repair.".to_string(),
        }
    }

    fn builder() -> PromptBuilder {
        PromptBuilder::new(Arc::new(KnowledgeBase::standard()))
    }

    #[test]
    fn instructions_carry_disclaimers_and_schema() {
        let prompt = builder().build(&intake());
        assert!(prompt.instructions.contains(REGULATORY_DISCLAIMER));
        assert!(prompt.instructions.contains(BUDGET_DISCLAIMER));
        assert!(prompt.instructions.contains(TIMELINE_DISCLAIMER));
        for field in [
            "whereYouAreNow",
            "regulatoryPathway",
            "nextThreeSteps",
            "timeline",
            "budgetComparison",
            "budgetBreakdown",
            "keyRisks",
            "designFirstFocus",
            "isQualifiedLead",
        ] {
            assert!(prompt.instructions.contains(field), "missing {field}");
        }
        assert!(prompt.instructions.contains("OCP designation"));
        assert!(prompt.instructions.contains("$1M - $3.5M+"));
    }

    #[test]
    fn task_renders_absent_identity_as_not_provided() {
        let prompt = builder().build(&intake());
        assert!(prompt.task.contains("- Name: Not provided"));
        assert!(prompt.task.contains("- Email: Not provided"));
        assert!(prompt.task.contains("- Is Practitioner: Yes"));
        assert!(prompt.task.ends_with("Respond with ONLY the JSON object, no other text."));
    }

    #[test]
    fn task_lists_triggered_risks_only() {
        let prompt = builder().build(&intake());
        assert!(prompt.task.contains("CLINICAL DATA REQUIRED (MEDIUM)"));
        assert!(!prompt.task.contains("IP EXPOSURE"));
        assert!(!prompt.task.contains("OWNERSHIP DISPUTES"));
    }

    #[test]
    fn build_is_deterministic() {
        let builder = builder();
        assert_eq!(builder.build(&intake()), builder.build(&intake()));
    }
}
