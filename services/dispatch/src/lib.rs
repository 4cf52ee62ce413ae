mod allocate;
mod cli;
mod demo;
mod infra;
mod train;

use food_rescue::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
