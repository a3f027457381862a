use chrono::{Local, NaiveDate};
use clap::Args;
use idea_planner::config::AppConfig;
use idea_planner::error::AppError;
use idea_planner::telemetry::{self, LogSink};
use idea_planner::workflows::planner::{
    parse_record, DocumentRenderer, Intake, IntakeGuard, LeadScorer, PipelineError,
    PlanSubmission, QuestionCatalogue, ReportAssembler,
};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct PlanScoreArgs {
    /// JSON file holding the intake answers (camelCase keys)
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Print the full assessment as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PlanRenderArgs {
    /// JSON file holding the intake answers (camelCase keys)
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Text file holding raw generation output for the same intake
    #[arg(long)]
    pub(crate) record: PathBuf,
    /// Report date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Output path. Defaults to the generated filename in the working directory.
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_plan_score(args: PlanScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_with_sink(&config.telemetry, LogSink::Stderr)?;

    let intake = load_intake(&args.answers)?;
    let assessment = LeadScorer.assess(&intake);

    if args.json {
        let rendered = serde_json::to_string_pretty(&assessment).map_err(std::io::Error::from)?;
        println!("{rendered}");
        return Ok(());
    }

    println!(
        "Lead score: {} ({})",
        assessment.score,
        if assessment.qualified {
            "qualified"
        } else {
            "nurture"
        }
    );
    for component in &assessment.components {
        println!(
            "  - {}: {} ({})",
            component.dimension.label(),
            component.points,
            component.notes
        );
    }
    println!("CRM tags: {}", assessment.crm_tags(&intake).join(", "));
    Ok(())
}

pub(crate) fn run_plan_render(args: PlanRenderArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_with_sink(&config.telemetry, LogSink::Stderr)?;

    let intake = load_intake(&args.answers)?;
    let raw = std::fs::read_to_string(&args.record)?;
    let record = parse_record(&raw).map_err(PipelineError::from)?;
    let assessment = LeadScorer.assess(&intake);
    let generated_on = args.date.unwrap_or_else(|| Local::now().date_naive());

    let report = ReportAssembler::new(config.links).assemble(
        record,
        &intake,
        assessment.qualified,
        generated_on,
    );
    let document = DocumentRenderer
        .render(&report)
        .map_err(PipelineError::from)?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&document.filename));
    std::fs::write(&output, &document.bytes)?;

    info!(path = %output.display(), pages = document.page_count, "document written");
    println!(
        "Wrote {} ({} pages, lead score {})",
        output.display(),
        document.page_count,
        assessment.score
    );
    Ok(())
}

pub(crate) fn run_plan_questions() -> Result<(), AppError> {
    let catalogue = QuestionCatalogue::standard();
    for question in catalogue.questions() {
        println!("{} [{}] {}", question.id, question.key.data_key(), question.display_text);
        for option in &question.options {
            println!("    - {option}");
        }
        println!("    why we ask: {}", question.why_we_ask);
    }
    Ok(())
}

fn load_intake(path: &Path) -> Result<Intake, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let submission: PlanSubmission = serde_json::from_str(&raw).map_err(std::io::Error::from)?;
    let intake = IntakeGuard::default()
        .intake_from_submission(submission)
        .map_err(PipelineError::from)?;
    Ok(intake)
}
