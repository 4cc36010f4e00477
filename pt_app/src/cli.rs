use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_CONFIG_PATH: &str = "playtime.toml";

/// Command-line flags; every value except `--config` may also come from the
/// config file or `PLAYTIME_*` environment variables
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "playtime")]
#[command(about = "Sums how long a summoner has played League of Legends")]
pub struct Cli {
    /// Server region to query, e.g. euw1
    #[arg(long)]
    pub server: Option<String>,

    /// Summoner to query for
    #[arg(long = "summonername")]
    pub summoner_name: Option<String>,

    /// Riot API key
    #[arg(long = "apikey")]
    pub api_key: Option<String>,

    /// Log per-request detail
    #[arg(long)]
    pub verbose: bool,

    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}
