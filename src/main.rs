mod agencies;
mod fetch;
mod images;
mod imports;
mod macros;
mod output;
mod tracker;
mod types;
mod utils;

use ::clap::Parser;
use ::std::env;
use ::std::process;
use ::std::time::Duration;

use crate::fetch::Fetcher;
use crate::images::seed_rosters;
use crate::imports::*;
use crate::output::{render_page, write_output};
use crate::types::{Options, Resource, Roster};

#[derive(Parser, Debug)]
pub struct CliArgs {
    /// Logging verbosity level (valid values: off, error, warn, info, debug, trace)
    #[arg(short, long, value_name = "LEVEL", default_value = "info")]
    verbosity: log::LevelFilter,

    #[command(flatten)]
    options: Options,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli_args = CliArgs::parse();
    if env::var(env_logger::DEFAULT_FILTER_ENV).is_ok() {
        env_logger::init();
    } else {
        env_logger::builder()
            .filter(Some(env!("CARGO_PKG_NAME")), cli_args.verbosity)
            .format_timestamp(None)
            .format_target(false)
            .init();
    }
    let inner = async {
        let options = &cli_args.options;
        let fetcher = Fetcher::new(Duration::from_secs(options.timeout))?;
        let mut rosters: Vec<Roster> = options
            .agencies
            .iter()
            .unique()
            .map(|&agency| Roster::new(agency))
            .collect();
        seed_rosters(&options.images, &mut rosters)?;
        let requests: Vec<Resource> = rosters
            .iter()
            .flat_map(|roster| roster.agency.initial_requests())
            .unique()
            .collect();
        let resources = fetcher.fetch_resources(&requests).await;
        for roster in &mut rosters {
            let agency = roster.agency;
            // A failed update still leaves the agency's image-seeded rows.
            if let Err(error) = agency.update(roster, &resources, &fetcher).await {
                error!("{:?}", error);
            }
            roster.sanitize();
            let (done, total) = roster.completed();
            info!("{}: {} of {} routes photographed", agency.full_name(), done, total);
        }
        write_output(&options.output, &render_page(&rosters))?;
        Ok(()) as Result<()>
    };
    if let Err(error) = inner.await {
        error!("{:?}", error);
        process::exit(1);
    }
}
