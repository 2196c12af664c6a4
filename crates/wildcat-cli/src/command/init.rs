use std::path::PathBuf;

use anyhow::Context;
use wildcat_agent::Agent;

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct InitArg {
    /// Agent directory
    agent: PathBuf,
    /// Seed for weight initialization
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &InitArg) -> anyhow::Result<()> {
    let InitArg { agent, seed } = arg;
    let mut rng = util::rng_from_seed(*seed);
    let initialized = Agent::init(agent, &mut rng)
        .with_context(|| format!("Failed to initialize agent in {}", agent.display()))?;

    eprintln!("Agent initialized");
    eprintln!("  Path: {}", agent.display());
    for role in initialized.roles() {
        let config = role.config();
        eprintln!(
            "  {}: {} inputs, {} outputs",
            config.name(),
            config.input_count(),
            config.output_count()
        );
    }
    Ok(())
}
