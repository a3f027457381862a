//! Static reference tables woven into every generated plan.
//!
//! The tables are built once at start-up and shared by reference; nothing here
//! mutates after construction.

use serde::Serialize;

use super::intake::Intake;
use super::questionnaire::QuestionKey;

pub const REGULATORY_DISCLAIMER: &str = "This is a preliminary assessment based on device category. Final classification requires detailed technical and intended use review. Design 1st recommends regulatory consultation before making business decisions based on this pathway estimate.";

pub const BUDGET_DISCLAIMER: &str = "These are planning estimates only. Actual costs depend on technical complexity, testing requirements, and regulatory pathway. Design 1st provides detailed cost estimates after technical review.";

pub const TIMELINE_DISCLAIMER: &str = "These timelines assume no major design pivots, regulatory delays, or funding gaps. Actual duration varies based on technical complexity and market factors.";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegulatoryPathway {
    pub device_type: &'static str,
    pub typical_class: &'static str,
    pub likely_pathway: &'static str,
    pub timeline: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRange {
    pub device_type: &'static str,
    pub development: &'static str,
    pub regulatory: &'static str,
    pub total_range: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineModifier {
    pub factor: &'static str,
    pub adjustment: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositioningPoint {
    pub topic: &'static str,
    pub statement: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageNarrative {
    pub stage: &'static str,
    pub narrative: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TriggerSeverity {
    High,
    Medium,
}

impl TriggerSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
        }
    }
}

/// Answer pattern that raises a known risk.
#[derive(Debug, Clone, Copy, Serialize)]
pub enum RiskCondition {
    AnswerIs(QuestionKey, &'static str),
    AnswerIsNot(QuestionKey, &'static str),
}

impl RiskCondition {
    pub fn applies(&self, intake: &Intake) -> bool {
        match *self {
            RiskCondition::AnswerIs(key, value) => intake.answer(key) == value,
            RiskCondition::AnswerIsNot(key, value) => intake.answer(key) != value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskTrigger {
    pub condition: RiskCondition,
    pub title: &'static str,
    pub description: &'static str,
    pub severity: TriggerSeverity,
}

#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeBase {
    pub regulatory_pathways: Vec<RegulatoryPathway>,
    pub budget_ranges: Vec<BudgetRange>,
    pub timeline_modifiers: Vec<TimelineModifier>,
    pub positioning: Vec<PositioningPoint>,
    pub stage_narratives: Vec<StageNarrative>,
    pub risk_triggers: Vec<RiskTrigger>,
}

impl KnowledgeBase {
    pub fn standard() -> Self {
        Self {
            regulatory_pathways: regulatory_pathways(),
            budget_ranges: budget_ranges(),
            timeline_modifiers: timeline_modifiers(),
            positioning: positioning(),
            stage_narratives: stage_narratives(),
            risk_triggers: risk_triggers(),
        }
    }

    pub fn triggered_risks<'a>(&'a self, intake: &'a Intake) -> impl Iterator<Item = &'a RiskTrigger> {
        self.risk_triggers
            .iter()
            .filter(move |trigger| trigger.condition.applies(intake))
    }
}

fn regulatory_pathways() -> Vec<RegulatoryPathway> {
    vec![
        RegulatoryPathway {
            device_type: "Surgical instrument / tool",
            typical_class: "Class I-II",
            likely_pathway: "510(k) or Exempt",
            timeline: "6-12 months (510k); N/A (exempt)",
        },
        RegulatoryPathway {
            device_type: "Diagnostic device",
            typical_class: "Class II",
            likely_pathway: "510(k)",
            timeline: "9-15 months",
        },
        RegulatoryPathway {
            device_type: "Therapeutic device",
            typical_class: "Class II-III",
            likely_pathway: "510(k) or PMA",
            timeline: "12-24 months (510k); 2-4 years (PMA)",
        },
        RegulatoryPathway {
            device_type: "Implant",
            typical_class: "Class II-III",
            likely_pathway: "510(k), De Novo, PMA",
            timeline: "18-36 months (often requires clinical)",
        },
        RegulatoryPathway {
            device_type: "Dental device",
            typical_class: "Class I-II",
            likely_pathway: "510(k) or Exempt",
            timeline: "6-12 months",
        },
        RegulatoryPathway {
            device_type: "Software / digital health (SaMD)",
            typical_class: "Class I-II",
            likely_pathway: "510(k) or De Novo",
            timeline: "6-18 months",
        },
        RegulatoryPathway {
            device_type: "Device + Drug combination",
            typical_class: "Varies",
            likely_pathway: "OCP designation",
            timeline: "3-5+ years",
        },
    ]
}

fn budget_ranges() -> Vec<BudgetRange> {
    vec![
        BudgetRange {
            device_type: "Simple surgical tool",
            development: "$75K - $150K",
            regulatory: "$25K - $75K",
            total_range: "$100K - $250K",
        },
        BudgetRange {
            device_type: "Electromechanical device",
            development: "$150K - $350K",
            regulatory: "$50K - $150K",
            total_range: "$200K - $500K",
        },
        BudgetRange {
            device_type: "Implant (Class II)",
            development: "$250K - $500K",
            regulatory: "$100K - $300K",
            total_range: "$350K - $800K",
        },
        BudgetRange {
            device_type: "Implant (Class III)",
            development: "$500K - $1.5M",
            regulatory: "$500K - $2M+",
            total_range: "$1M - $3.5M+",
        },
        BudgetRange {
            device_type: "Dental device",
            development: "$75K - $200K",
            regulatory: "$25K - $75K",
            total_range: "$100K - $300K",
        },
        BudgetRange {
            device_type: "SaMD / Software",
            development: "$100K - $300K",
            regulatory: "$30K - $100K",
            total_range: "$130K - $400K",
        },
    ]
}

fn timeline_modifiers() -> Vec<TimelineModifier> {
    vec![
        TimelineModifier {
            factor: "Time commitment < 2 hours/week",
            adjustment: "+50% to timeline",
        },
        TimelineModifier {
            factor: "Hardware + Software complexity",
            adjustment: "+3-6 months",
        },
        TimelineModifier {
            factor: "Device + Drug combination",
            adjustment: "+12-24 months",
        },
        TimelineModifier {
            factor: "Europe market (CE marking)",
            adjustment: "+6-12 months",
        },
        TimelineModifier {
            factor: "Clinical study required",
            adjustment: "+12-24 months",
        },
        TimelineModifier {
            factor: "Working prototype already exists",
            adjustment: "-3-6 months (head start)",
        },
    ]
}

fn positioning() -> Vec<PositioningPoint> {
    vec![
        PositioningPoint {
            topic: "ipOwnership",
            statement: "You keep 100% of your IP. We're your technical team, not partners or investors.",
        },
        PositioningPoint {
            topic: "businessModel",
            statement: "Hourly rate model - no equity stake, no ownership claims, no surprises.",
        },
        PositioningPoint {
            topic: "flexibility",
            statement: "Phased development with exit points. Pause or stop anytime - you keep all work product.",
        },
        PositioningPoint {
            topic: "timeCommitment",
            statement: "Keep your practice. We need 30-60 minutes per week for decisions and direction.",
        },
        PositioningPoint {
            topic: "manufacturing",
            statement: "Manufacturing is baked in from day one. We don't hand off designs that can't be built.",
        },
        PositioningPoint {
            topic: "experience",
            statement: "16+ years, 1200+ products, 25+ physician inventors, 10+ dentist inventors.",
        },
        PositioningPoint {
            topic: "regulatory",
            statement: "Right team, right process, 16 years of experience. FDA is confidently navigable with consistency.",
        },
    ]
}

fn stage_narratives() -> Vec<StageNarrative> {
    vec![
        StageNarrative {
            stage: "Napkin sketch / concept only",
            narrative: "You're at the concept stage. Many successful devices started exactly here. Your clinical insight is your biggest asset.",
        },
        StageNarrative {
            stage: "Detailed drawings or CAD models",
            narrative: "You've moved past concept into design documentation. This puts you ahead of most physician inventors who never get ideas out of their heads.",
        },
        StageNarrative {
            stage: "Basic prototype (non-functional or rough)",
            narrative: "You have tangible proof of concept. The next step is evaluating whether this prototype can evolve toward a manufacturable design.",
        },
        StageNarrative {
            stage: "Working prototype",
            narrative: "You've validated core functionality. Focus now shifts to design for manufacturing, regulatory strategy, and testing requirements.",
        },
        StageNarrative {
            stage: "Already using informally in my practice",
            narrative: "Real-world use is valuable data - but proceed carefully. Informal clinical use without clearance has regulatory implications. Document everything.",
        },
    ]
}

fn risk_triggers() -> Vec<RiskTrigger> {
    vec![
        RiskTrigger {
            condition: RiskCondition::AnswerIs(QuestionKey::IpStatus, "No IP protection yet"),
            title: "IP EXPOSURE",
            description: "Sharing details without protection risks losing rights to your invention.",
            severity: TriggerSeverity::High,
        },
        RiskTrigger {
            condition: RiskCondition::AnswerIsNot(
                QuestionKey::EmployerType,
                "No - private practice or self-employed",
            ),
            title: "EMPLOYER IP CLAIM",
            description: "Employment agreement may assign invention rights to your employer.",
            severity: TriggerSeverity::High,
        },
        RiskTrigger {
            condition: RiskCondition::AnswerIs(QuestionKey::BudgetExpectation, "Less than $50,000"),
            title: "UNDERFUNDING",
            description: "Project may stall mid-development due to insufficient budget.",
            severity: TriggerSeverity::High,
        },
        RiskTrigger {
            condition: RiskCondition::AnswerIs(QuestionKey::DeviceType, "Implant"),
            title: "CLINICAL DATA REQUIRED",
            description: "Implants typically require clinical studies before FDA approval.",
            severity: TriggerSeverity::Medium,
        },
        RiskTrigger {
            condition: RiskCondition::AnswerIs(QuestionKey::Complexity, "Device + Drug combination"),
            title: "COMBO PRODUCT COMPLEXITY",
            description: "Requires coordination with FDA's Office of Combination Products.",
            severity: TriggerSeverity::High,
        },
        RiskTrigger {
            condition: RiskCondition::AnswerIsNot(QuestionKey::Coinventors, "Just me"),
            title: "OWNERSHIP DISPUTES",
            description: "Multiple inventors without agreement = potential future conflict.",
            severity: TriggerSeverity::Medium,
        },
        RiskTrigger {
            condition: RiskCondition::AnswerIs(
                QuestionKey::Stage,
                "Already using informally in my practice",
            ),
            title: "REGULATORY VIOLATION",
            description: "Unapproved clinical use has legal and regulatory implications.",
            severity: TriggerSeverity::High,
        },
    ]
}
