use crate::planning::{
    run_plan_questions, run_plan_render, run_plan_score, PlanRenderArgs, PlanScoreArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use idea_planner::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Medical Device Idea Planner",
    about = "Serve the idea planner or run its pipeline stages from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Work with planner intakes offline
    Plan {
        #[command(subcommand)]
        command: PlanCommand,
    },
}

#[derive(Subcommand, Debug)]
enum PlanCommand {
    /// Validate an intake file and print its lead score
    Score(PlanScoreArgs),
    /// Render a document from an intake file and saved generation output
    Render(PlanRenderArgs),
    /// Print the intake questionnaire
    Questions,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Plan {
            command: PlanCommand::Score(args),
        } => run_plan_score(args),
        Command::Plan {
            command: PlanCommand::Render(args),
        } => run_plan_render(args),
        Command::Plan {
            command: PlanCommand::Questions,
        } => run_plan_questions(),
    }
}
