use clap::{Parser, Subcommand};

use self::{
    choose::ChooseArg, generate_field::GenerateFieldArg, init::InitArg, learn::LearnArg,
    oil_price::OilPriceArg, train::TrainArg,
};

mod choose;
mod generate_field;
mod init;
mod learn;
mod oil_price;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log at debug level regardless of RUST_LOG
    #[arg(long, global = true, hide = true)]
    debug: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Create an agent directory with freshly initialized scorers
    Init(#[clap(flatten)] InitArg),
    /// Fit a role's scorer to the corpus files in its training directory
    Train(#[clap(flatten)] TrainArg),
    /// Pick a survey site on a generated field
    Choose(#[clap(flatten)] ChooseArg),
    /// Improve the surveying scorer by playing simulated surveys
    Learn(#[clap(flatten)] LearnArg),
    /// Generate oil field data
    Field(#[clap(flatten)] GenerateFieldArg),
    /// Generate oil price data
    OilPrice(#[clap(flatten)] OilPriceArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    crate::logging::init(args.debug);
    match args.mode {
        Mode::Init(arg) => init::run(&arg)?,
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Choose(arg) => choose::run(&arg)?,
        Mode::Learn(arg) => learn::run(&arg)?,
        Mode::Field(arg) => generate_field::run(&arg)?,
        Mode::OilPrice(arg) => oil_price::run(&arg)?,
    }
    Ok(())
}
