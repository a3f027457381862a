mod cli;
mod infra;
mod planning;
mod routes;
mod server;

use idea_planner::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
