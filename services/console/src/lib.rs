mod cli;
mod console;
mod display;
mod menu;

use vacancy_scout::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
