//! Command-line entry point for training the quest agent.

use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::Level;

use quest_dqn::config::{StagedConfig, TrainerConfig};
use quest_dqn::trainer::staged::StagedTrainer;
use quest_dqn::trainer::Trainer;

/// Train a DQN agent on the quest progression simulator
#[derive(Parser, Debug)]
#[command(name = "quest-train")]
#[command(author, version, long_about = None)]
struct Cli {
    /// Enable debug-level logging
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Continuous training with decaying exploration
    Train(TrainArgs),
    /// Checkpointed training in fixed-length stages
    Staged(StagedArgs),
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// JSON file with trainer settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Total environment steps
    #[arg(long)]
    steps: Option<usize>,

    /// Step ceiling of one episode
    #[arg(long = "episode-length")]
    episode_length: Option<usize>,

    /// Hidden layer width
    #[arg(long)]
    hidden: Option<usize>,

    /// Learning rate
    #[arg(long)]
    lr: Option<f32>,

    /// Steps between progress lines
    #[arg(long = "log-interval")]
    log_interval: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Where the trained network is written
    #[arg(long = "model-path", default_value = "best_model.bin")]
    model_path: PathBuf,
}

#[derive(Args, Debug)]
struct StagedArgs {
    /// Run a single stage, resuming from the previous stage's checkpoint
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=8), conflicts_with = "all")]
    stage: Option<u8>,

    /// Run every stage in order (the default)
    #[arg(long)]
    all: bool,

    #[arg(long = "checkpoint-dir", default_value = "staged_models")]
    checkpoint_dir: PathBuf,

    #[arg(long)]
    seed: Option<u64>,

    /// Hidden layer width
    #[arg(long)]
    hidden: Option<usize>,

    /// Learning rate
    #[arg(long)]
    lr: Option<f32>,
}

fn run_train(args: TrainArgs) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => TrainerConfig::from_json_file(path)?,
        None => TrainerConfig::default(),
    };
    if let Some(steps) = args.steps {
        config.total_steps = steps;
    }
    if let Some(length) = args.episode_length {
        config.episode_length = length;
    }
    if let Some(hidden) = args.hidden {
        config.hidden_size = hidden;
    }
    if let Some(lr) = args.lr {
        config.learning_rate = lr;
    }
    if let Some(interval) = args.log_interval {
        config.log_interval = interval;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.model_path = Some(args.model_path);

    let mut trainer = Trainer::new(config)?;
    trainer.run()?;
    Ok(())
}

fn run_staged(args: StagedArgs) -> Result<(), Box<dyn Error>> {
    let mut config = StagedConfig {
        checkpoint_dir: args.checkpoint_dir,
        seed: args.seed,
        ..StagedConfig::default()
    };
    if let Some(hidden) = args.hidden {
        config.hidden_size = hidden;
    }
    if let Some(lr) = args.lr {
        config.learning_rate = lr;
    }

    let mut trainer = StagedTrainer::new(config)?;
    match args.stage {
        Some(stage) if !args.all => {
            trainer.run_single(stage as usize)?;
        }
        _ => {
            trainer.run_all()?;
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Command::Train(args) => run_train(args),
        Command::Staged(args) => run_staged(args),
    }
}
