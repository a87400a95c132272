//! Command-line interface for the Carefinder recommendation engine.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod recommend;

pub use error::CliError;

use recommend::{RecommendArgs, run_recommend};

const ARG_DATASET: &str = "dataset";
const ARG_SERVICE: &str = "service";
const ARG_COST_PREFERENCE: &str = "cost-preference";
const ARG_QUALITY_PREFERENCE: &str = "quality-preference";
const ARG_LOCATION: &str = "location";
const ARG_GEOCODE_CACHE: &str = "geocode-cache";
const ARG_MAPS_BASE_URL: &str = "maps-base-url";
const ARG_MAPS_API_KEY: &str = "maps-api-key";
const ARG_ADDRESS_SUFFIX: &str = "address-suffix";
const ARG_NO_ROUTES: &str = "no-routes";
const ARG_RADIUS_KM: &str = "radius-km";
const ARG_TOP_K: &str = "top-k";
const ENV_DATASET: &str = "CAREFINDER_CMDS_RECOMMEND_DATASET";
const ENV_SERVICE: &str = "CAREFINDER_CMDS_RECOMMEND_SERVICE";

/// Run the Carefinder CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when argument parsing, configuration layering, data
/// loading or ranking fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Recommend(args) => run_recommend(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "carefinder",
    about = "Recommend healthcare facilities with fuzzy-logic scoring",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank facilities for a requested service and print them as JSON.
    Recommend(RecommendArgs),
}

#[cfg(test)]
mod tests;
