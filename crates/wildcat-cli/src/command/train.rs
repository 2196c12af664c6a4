use std::path::PathBuf;

use anyhow::Context;
use wildcat_agent::Agent;
use wildcat_training::supervised::{self, Trainer};

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Agent directory
    agent: PathBuf,
    /// Role to train (surveying, report, drilling, sales)
    role: String,
    #[arg(long, default_value_t = supervised::DEFAULT_EPOCHS)]
    epochs: usize,
    /// Log progress every N epochs (0 to disable)
    #[arg(long, default_value_t = supervised::DEFAULT_SHOW)]
    show: usize,
    /// Stop once the summed squared error reaches this value
    #[arg(long, default_value_t = supervised::DEFAULT_GOAL)]
    goal: f32,
    #[arg(long, default_value_t = supervised::DEFAULT_LEARNING_RATE)]
    learning_rate: f32,
    /// Corpus value delimiter (whitespace if omitted)
    #[arg(long)]
    delim: Option<char>,
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        agent: dir,
        role,
        epochs,
        show,
        goal,
        learning_rate,
        delim,
        seed,
    } = arg;
    let mut rng = util::rng_from_seed(*seed);
    let mut agent = Agent::load(dir)
        .with_context(|| format!("Failed to load agent from {}", dir.display()))?;

    let trainer = Trainer {
        epochs: *epochs,
        show: *show,
        goal: *goal,
        learning_rate: *learning_rate,
    };
    let report = agent
        .train(role, &trainer, *delim, &mut rng)
        .with_context(|| format!("Failed to train role `{role}`"))?;
    agent.save().context("Failed to save agent")?;

    eprintln!("Training completed");
    eprintln!("  Role: {role}");
    eprintln!("  Epochs: {}", report.epochs_run);
    if let Some(error) = report.final_error() {
        eprintln!("  Final error: {error:.4}");
    }
    eprintln!("  Reached goal: {}", report.reached_goal);
    Ok(())
}
