use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ParseError;

/// Risk severity as reported by the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
    /// Only reachable for reports built outside the validator.
    #[serde(other)]
    Unrecognized,
}

impl Severity {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "HIGH" => Some(Self::High),
            "MEDIUM" => Some(Self::Medium),
            "LOW" => Some(Self::Low),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Unrecognized => "UNRATED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub milestone: String,
    pub timeframe: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub category: String,
    pub range: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskEntry {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

/// Generation output after every field passed schema enforcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedRecord {
    pub where_you_are_now: String,
    pub regulatory_pathway: String,
    pub next_three_steps: Vec<String>,
    pub timeline: Vec<Milestone>,
    pub budget_comparison: String,
    pub budget_breakdown: Vec<BudgetLine>,
    pub key_risks: Vec<RiskEntry>,
    pub design_first_focus: Vec<String>,
    pub is_qualified_lead: bool,
}

pub(crate) fn validate_record(record: &Map<String, Value>) -> Result<ValidatedRecord, ParseError> {
    let where_you_are_now = text(record, "whereYouAreNow")?;
    let regulatory_pathway = text(record, "regulatoryPathway")?;
    let next_three_steps = text_list(record, "nextThreeSteps", 3, 3)?;
    let timeline = object_list(record, "timeline", 5, 7, |item, index| {
        Ok(Milestone {
            milestone: nested_text(item, "timeline", index, "milestone")?,
            timeframe: nested_text(item, "timeline", index, "timeframe")?,
        })
    })?;
    let budget_comparison = text(record, "budgetComparison")?;
    let budget_breakdown = object_list(record, "budgetBreakdown", 4, 5, |item, index| {
        Ok(BudgetLine {
            category: nested_text(item, "budgetBreakdown", index, "category")?,
            range: nested_text(item, "budgetBreakdown", index, "range")?,
        })
    })?;
    let key_risks = object_list(record, "keyRisks", 3, 3, |item, index| {
        let title = nested_text(item, "keyRisks", index, "title")?;
        let description = nested_text(item, "keyRisks", index, "description")?;
        let raw = nested_text(item, "keyRisks", index, "severity")?;
        let severity = Severity::parse(raw.trim()).ok_or_else(|| {
            ParseError::field(
                "keyRisks",
                format!("keyRisks[{index}].severity '{raw}' is not HIGH, MEDIUM or LOW"),
            )
        })?;
        Ok(RiskEntry {
            title,
            description,
            severity,
        })
    })?;
    let design_first_focus = text_list(record, "designFirstFocus", 2, 3)?;
    let is_qualified_lead = match record.get("isQualifiedLead") {
        Some(Value::Bool(flag)) => *flag,
        Some(other) => {
            return Err(ParseError::field(
                "isQualifiedLead",
                format!("expected a boolean, found {}", kind(other)),
            ))
        }
        None => return Err(ParseError::field("isQualifiedLead", "field is missing")),
    };

    Ok(ValidatedRecord {
        where_you_are_now,
        regulatory_pathway,
        next_three_steps,
        timeline,
        budget_comparison,
        budget_breakdown,
        key_risks,
        design_first_focus,
        is_qualified_lead,
    })
}

fn text(record: &Map<String, Value>, field: &'static str) -> Result<String, ParseError> {
    match record.get(field) {
        Some(Value::String(value)) if !value.trim().is_empty() => Ok(value.clone()),
        Some(Value::String(_)) => Err(ParseError::field(field, "text is blank")),
        Some(other) => Err(ParseError::field(
            field,
            format!("expected text, found {}", kind(other)),
        )),
        None => Err(ParseError::field(field, "field is missing")),
    }
}

fn bounded_array<'a>(
    record: &'a Map<String, Value>,
    field: &'static str,
    min: usize,
    max: usize,
) -> Result<&'a [Value], ParseError> {
    let items = match record.get(field) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ParseError::field(
                field,
                format!("expected a list, found {}", kind(other)),
            ))
        }
        None => return Err(ParseError::field(field, "field is missing")),
    };

    if items.len() < min || items.len() > max {
        let expected = if min == max {
            format!("exactly {min}")
        } else {
            format!("{min} to {max}")
        };
        return Err(ParseError::field(
            field,
            format!("expected {expected} entries, found {}", items.len()),
        ));
    }

    Ok(items)
}

fn text_list(
    record: &Map<String, Value>,
    field: &'static str,
    min: usize,
    max: usize,
) -> Result<Vec<String>, ParseError> {
    bounded_array(record, field, min, max)?
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(value) if !value.trim().is_empty() => Ok(value.clone()),
            other => Err(ParseError::field(
                field,
                format!("{field}[{index}] must be non-blank text, found {}", kind(other)),
            )),
        })
        .collect()
}

fn object_list<T>(
    record: &Map<String, Value>,
    field: &'static str,
    min: usize,
    max: usize,
    mut convert: impl FnMut(&Map<String, Value>, usize) -> Result<T, ParseError>,
) -> Result<Vec<T>, ParseError> {
    bounded_array(record, field, min, max)?
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => convert(map, index),
            other => Err(ParseError::field(
                field,
                format!("{field}[{index}] must be an object, found {}", kind(other)),
            )),
        })
        .collect()
}

fn nested_text(
    item: &Map<String, Value>,
    field: &'static str,
    index: usize,
    key: &str,
) -> Result<String, ParseError> {
    match item.get(key) {
        Some(Value::String(value)) if !value.trim().is_empty() => Ok(value.clone()),
        Some(other) => Err(ParseError::field(
            field,
            format!("{field}[{index}].{key} must be non-blank text, found {}", kind(other)),
        )),
        None => Err(ParseError::field(
            field,
            format!("{field}[{index}].{key} is missing"),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
