use std::path::PathBuf;

use anyhow::Context;
use tracing::{debug, warn};
use wildcat_agent::{Agent, roles};
use wildcat_engine::{FieldGenerator, OilField, OilPrices, Theme};
use wildcat_evaluator::{
    normalize::scale_into,
    reward::{self, RewardUpdate},
    selection::SelectionPolicy,
    site_feature::{FeatureContext, SiteFeature as _, source::UtilityEstimator},
};

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct LearnArg {
    /// Agent directory
    agent: PathBuf,
    /// Number of simulated surveys
    #[arg(long, default_value_t = 100)]
    episodes: usize,
    #[arg(long, default_value_t = 80)]
    width: usize,
    #[arg(long, default_value_t = 24)]
    height: usize,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = reward::DEFAULT_DISCOUNT)]
    discount: f32,
    #[arg(long, default_value_t = reward::DEFAULT_LEARNING_RATE)]
    learning_rate: f32,
    /// Selection policy used while exploring (greedy or proportional)
    #[arg(long, default_value = "proportional")]
    policy: SelectionPolicy,
}

/// Lowest and highest survey utility over every site.
fn utility_range(field: &OilField, ctx: &FeatureContext) -> (f32, f32) {
    field
        .sites()
        .map(|(_, site)| UtilityEstimator.extract(site, ctx))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), u| {
            (lo.min(u), hi.max(u))
        })
}

pub(crate) fn run(arg: &LearnArg) -> anyhow::Result<()> {
    let LearnArg {
        agent: dir,
        episodes,
        width,
        height,
        seed,
        discount,
        learning_rate,
        policy,
    } = arg;
    util::ensure_field_size(*width, *height)?;
    let mut rng = util::rng_from_seed(*seed);
    let mut agent = Agent::load(dir)
        .with_context(|| format!("Failed to load agent from {}", dir.display()))?;
    agent.set_reward_update(RewardUpdate::new(*discount, *learning_rate));
    agent.set_policy(roles::SURVEYING, *policy)?;

    let theme = Theme::default();
    let generator = FieldGenerator::new(&theme)?;
    let mut prices = OilPrices::new(&theme)?;

    let mut updated = 0;
    let mut skipped = 0;
    let mut total_reward = 0.0;
    for episode in 0..*episodes {
        let field = generator.generate(*width, *height, &mut rng);
        let price = prices.advance(&mut rng);
        let ctx = FeatureContext::new(&theme, price, field.site_count(), true)?;

        let decision = agent.choose(roles::SURVEYING, &field, &ctx, &mut rng)?;
        let (lo, hi) = utility_range(&field, &ctx);
        if hi <= lo {
            warn!(episode, "field has no utility spread, skipping reward");
            skipped += 1;
            continue;
        }
        let site = field
            .get(decision.position)
            .context("Chosen site is outside the field")?;
        let reward = scale_into(UtilityEstimator.extract(site, &ctx), lo, hi, -1.0, 1.0)?;
        let report_inputs = agent.report_inputs(site, &ctx)?;
        let next_best = agent.estimate(roles::REPORT, &report_inputs)?;

        let outcome = agent.reward(roles::SURVEYING, reward, next_best)?;
        debug!(episode, position = %decision.position, reward, next_best, ?outcome, "episode");
        if outcome.is_updated() {
            updated += 1;
        }
        total_reward += reward;
    }

    agent.save().context("Failed to save agent")?;

    let rewarded = episodes - skipped;
    eprintln!("Learning completed");
    eprintln!("  Episodes: {episodes}");
    eprintln!("  Updated: {updated}");
    eprintln!("  Skipped: {skipped}");
    if rewarded > 0 {
        #[expect(clippy::cast_precision_loss)]
        let mean = total_reward / rewarded as f32;
        eprintln!("  Mean reward: {mean:.3}");
    }
    Ok(())
}
