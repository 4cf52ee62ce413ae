use crate::allocate::{run_allocate, AllocateArgs};
use crate::demo::{run_demo, DemoArgs};
use crate::train::{run_train, TrainArgs};
use clap::{Parser, Subcommand};
use food_rescue::config::AppConfig;
use food_rescue::error::AppError;
use food_rescue::telemetry;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "food-rescue",
    about = "Route perishable food donations to recipient organizations",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split one donation across a recipient roster
    Allocate(AllocateArgs),
    /// Fit the learned scorer against synthetic heuristic-labelled samples
    Train(TrainArgs),
    /// Walk through a built-in allocation scenario (default command)
    Demo(DemoArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    info!(
        environment = config.environment.label(),
        scorer = config.allocation.scorer.label(),
        "food rescue dispatch starting"
    );

    match command {
        Command::Allocate(args) => run_allocate(args, config.allocation),
        Command::Train(args) => run_train(args, config.allocation),
        Command::Demo(args) => run_demo(args, config.allocation),
    }
}
