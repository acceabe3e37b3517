use crate::{config::Config, session::Session};
use anyhow::Result;
use clap::Parser;
use placemarks_core::coordinator::StaleResponses;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "placemarks", version, about = "Collect places by clicking on a map")]
struct Args {
    /// Configuration file (default: placemarks.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Google Maps API key (overrides GOOGLE_MAPS_API_KEY)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Drop the responses of clicks that were superseded by newer ones
    #[arg(long)]
    discard_stale: bool,
}

pub fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let Args {
        config,
        api_key,
        discard_stale,
    } = Args::parse();

    let mut cfg = Config::try_load_from_file_or_default(config.as_ref(), api_key)?;
    if discard_stale {
        cfg.stale_responses = StaleResponses::Discard;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();
    local.block_on(&runtime, async {
        let session = Session::try_new(cfg)?;
        session.run().await
    })
}
