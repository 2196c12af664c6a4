use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;
use wildcat_agent::{Agent, roles};
use wildcat_engine::{FieldGenerator, Position, Theme};
use wildcat_evaluator::{
    region::Region,
    selection::SelectionPolicy,
    site_feature::{FeatureContext, site_features},
};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ChooseArg {
    /// Agent directory
    agent: PathBuf,
    /// Oil field width
    #[arg(long, default_value_t = 80)]
    width: usize,
    /// Oil field height
    #[arg(long, default_value_t = 24)]
    height: usize,
    #[arg(long)]
    seed: Option<u64>,
    /// Selection policy (greedy or proportional)
    #[arg(long, default_value = "greedy")]
    policy: SelectionPolicy,
    /// Print the survey probabilities of the final window
    #[arg(long)]
    show: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Choice {
    position: Position,
    levels: usize,
    index: usize,
    predicted_utility: f32,
    probability: f32,
    drill_cost: f32,
    tax: f32,
}

pub(crate) fn run(arg: &ChooseArg) -> anyhow::Result<()> {
    let ChooseArg {
        agent: dir,
        width,
        height,
        seed,
        policy,
        show,
        output,
    } = arg;
    util::ensure_field_size(*width, *height)?;
    let mut rng = util::rng_from_seed(*seed);
    let mut agent = Agent::load(dir)
        .with_context(|| format!("Failed to load agent from {}", dir.display()))?;
    agent.set_policy(roles::SURVEYING, *policy)?;

    let theme = Theme::default();
    let field = FieldGenerator::new(&theme)?.generate(*width, *height, &mut rng);
    let ctx = FeatureContext::new(&theme, theme.initial_oil_price(), field.site_count(), true)?;

    let decision = agent
        .choose(roles::SURVEYING, &field, &ctx, &mut rng)
        .context("Failed to choose a survey site")?;
    let site = field
        .get(decision.position)
        .context("Chosen site is outside the field")?;

    if *show {
        let tile = roles::SURVEY_TILE;
        let origin = Position::new(
            decision.position.x - decision.index % tile.width,
            decision.position.y - decision.index / tile.width,
        );
        let raw = FeatureContext::new(&theme, ctx.oil_price(), field.site_count(), false)?;
        let window = Region::map(&field, &site_features(["prob"])?, &raw, origin, tile)?;
        eprintln!("Final window at {origin}:");
        eprint!("{window}");
    }

    let choice = Choice {
        position: decision.position,
        levels: decision.levels,
        index: decision.index,
        predicted_utility: decision.outputs[decision.index],
        probability: site.probability(),
        drill_cost: site.drill_cost(),
        tax: site.tax(),
    };
    eprintln!(
        "Chose {} after {} levels (predicted utility {:.3})",
        choice.position, choice.levels, choice.predicted_utility
    );
    Output::save_json(&choice, output.clone())?;
    Ok(())
}
