use std::process::ExitCode;

use clap::Parser;
use pt_app::cli::Cli;
use pt_app::config_loader;
use pt_app::tracing_setup;
use pt_app::Playtime;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let settings = match config_loader::load_settings(&cli) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    let _guard = tracing_setup::init("playtime", settings.log_dir.as_deref(), settings.verbose);

    let playtime = match Playtime::from_settings(&settings) {
        Ok(playtime) => playtime,
        Err(err) => {
            error!("{err:#}");
            return ExitCode::FAILURE;
        }
    };

    match playtime.run(&settings.server, &settings.summoner_name).await {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
