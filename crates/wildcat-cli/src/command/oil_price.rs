use std::path::PathBuf;

use wildcat_engine::{OilPrices, Theme};
use wildcat_evaluator::normalize::NormalizeRange;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct OilPriceArg {
    /// Number of weeks to generate prices
    #[arg(long, default_value_t = 52)]
    weeks: usize,
    /// Normalize between 0 and 1
    #[arg(long)]
    normalize: bool,
    #[arg(long)]
    seed: Option<u64>,
    /// Write to specified file
    #[arg(long)]
    file: Option<PathBuf>,
}

pub(crate) fn run(arg: &OilPriceArg) -> anyhow::Result<()> {
    let OilPriceArg {
        weeks,
        normalize,
        seed,
        file,
    } = arg;
    let mut rng = util::rng_from_seed(*seed);
    let theme = Theme::default();
    let mut prices = OilPrices::new(&theme)?;
    let range = NormalizeRange::new(prices.min_price(), prices.max_price())?;

    let mut output = Output::from_output_path(file.clone())?;
    for _ in 0..*weeks {
        let price = prices.advance(&mut rng);
        let value = if *normalize { range.apply(price) } else { price };
        output.write_row([value], " ")?;
    }
    output.finish()?;
    tracing::debug!(weeks, to = %output.display_path(), "wrote oil prices");
    Ok(())
}
