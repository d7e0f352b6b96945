mod cli;
mod commands;

use job_pipeline::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
