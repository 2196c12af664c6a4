use std::path::PathBuf;

use anyhow::Context;
use wildcat_engine::{FieldGenerator, OilPrices, Theme};
use wildcat_evaluator::{
    region::Region,
    site_feature::{FeatureContext, site_features},
};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateFieldArg {
    /// Oil field width
    #[arg(long, default_value_t = 80)]
    width: usize,
    /// Oil field height
    #[arg(long, default_value_t = 24)]
    height: usize,
    /// Number of fields to generate
    #[arg(long, default_value_t = 1)]
    num: usize,
    #[arg(long)]
    no_headers: bool,
    /// Value delimiter
    #[arg(long, default_value = " ")]
    delim: String,
    /// Input features (prob, cost, tax, wet, bbl, size, val, util)
    #[arg(long, num_args = 1.., default_values = ["prob", "cost"])]
    inputs: Vec<String>,
    /// Output features
    #[arg(long, num_args = 1.., default_values = ["wet"])]
    outputs: Vec<String>,
    /// Normalize between 0 and 1
    #[arg(long)]
    normalize: bool,
    /// Scale down by the specified factor
    #[arg(long, default_value_t = 1)]
    reduce: usize,
    /// Output N×N partitions of each field
    #[arg(long)]
    partition: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    /// Write to specified file
    #[arg(long)]
    file: Option<PathBuf>,
}

fn header(inputs: &[String], outputs: &[String], cells: usize) -> Vec<String> {
    let columns = |ids: &[String]| {
        (0..cells)
            .flat_map(|cell| ids.iter().map(move |id| format!("{}_{cell}", id.to_uppercase())))
            .collect::<Vec<_>>()
    };
    let mut header = columns(inputs);
    header.extend(columns(outputs));
    header
}

/// Input values of every cell, then output values of every cell.
fn row(region: &Region, input_count: usize) -> Vec<f32> {
    let inputs = region.cells().flat_map(|cell| &cell[..input_count]);
    let outputs = region.cells().flat_map(|cell| &cell[input_count..]);
    inputs.chain(outputs).copied().collect()
}

pub(crate) fn run(arg: &GenerateFieldArg) -> anyhow::Result<()> {
    let GenerateFieldArg {
        width,
        height,
        num,
        no_headers,
        delim,
        inputs,
        outputs,
        normalize,
        reduce,
        partition,
        seed,
        file,
    } = arg;
    util::ensure_field_size(*width, *height)?;
    anyhow::ensure!(*reduce > 0, "--reduce must be at least 1");

    let mut rng = util::rng_from_seed(*seed);
    let theme = Theme::default();
    let generator = FieldGenerator::new(&theme)?;
    let prices = OilPrices::new(&theme)?;
    let features = site_features(inputs.iter().chain(outputs))?;

    let mut output = Output::from_output_path(file.clone())?;
    let mut header_written = *no_headers;
    let mut rows = 0;
    for _ in 0..*num {
        let field = generator.generate(*width, *height, &mut rng);
        let ctx = FeatureContext::new(&theme, prices.price(), field.site_count(), *normalize)?;
        let regions = match partition {
            Some(parts) => Region::partition(&field, &features, &ctx, *parts)?,
            None => vec![Region::map_field(&field, &features, &ctx)?],
        };

        for region in regions {
            let region = region.reduce(*reduce);
            if !header_written {
                output.write_row(header(inputs, outputs, region.cell_count()), delim)?;
                header_written = true;
            }
            output.write_row(row(&region, inputs.len()), delim)?;
            rows += 1;
        }
    }
    output
        .finish()
        .with_context(|| format!("Failed to write {}", output.display_path()))?;
    eprintln!("Wrote {rows} rows to {}", output.display_path());
    Ok(())
}
