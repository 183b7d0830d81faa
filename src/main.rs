use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

mod config;
mod engine;
mod error;
mod ingestion;
mod inspect;
mod merge;
mod model;
mod output;
mod parse;
mod poll;
mod proxy;
mod state;
mod telemetry;
mod validate;

#[cfg(test)]
mod test_utils;

use config::{EngineArgs, EngineConfig};
use engine::Engine;

#[derive(Parser)]
#[command(name = "rssagg", about = "RSS aggregator: add feeds through a CORS proxy and poll them for new posts")]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,
    /// Emit JSON result envelopes to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add feeds once and print what was ingested
    Add(ingestion::IngestCmd),
    /// Add feeds, then poll them for new posts until interrupted
    Watch(poll::WatchCmd),
    /// Print the proxied fetch URL for a feed
    ProxyUrl(inspect::ProxyUrlCmd),
    /// Parse a local RSS file
    Parse(inspect::ParseCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // initialize logging/tracing (stderr). Respect RUST_LOG and RSSAGG_LOG_FORMAT
    telemetry::config::init_tracing();
    let config = EngineConfig::from_env_and_args(&cli.engine)?;

    match cli.command {
        Commands::Add(args) => ingestion::run(&Engine::from_config(config)?, args).await?,
        Commands::Watch(args) => poll::run(&Engine::from_config(config)?, args).await?,
        Commands::ProxyUrl(args) => inspect::proxy_url(&proxy::ProxyGateway::new(config.proxy_endpoint), args)?,
        Commands::Parse(args) => inspect::parse_file(args)?,
    }

    Ok(())
}
