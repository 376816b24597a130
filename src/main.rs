use anyhow::Context;
use clap::Parser;
use log::info;

use carstats::api::StatsApi;
use carstats::conf::Config;
use carstats::core::{CliArgs, setup_logging};
use carstats::dataset::Dataset;
use carstats::service::StatsService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = CliArgs::parse();
    info!(args = args; "carstats starting");

    let config = Config::load(args.config.as_deref()).context("loading config")?;
    let dataset = Dataset::load(&config.data);
    let api = StatsApi::new(StatsService::new(dataset));

    api.serve(&config.server.addr())
        .await
        .context("running HTTP server")?;
    Ok(())
}
