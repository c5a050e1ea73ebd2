use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, warn};

use privacy_tracker::cli::Cli;
use privacy_tracker::config::{StaticConfig, get_config, init_config};
use privacy_tracker::interfaces::cli::run_cli_command;
use privacy_tracker::system::init_logging;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(err) = e.downcast_ref::<privacy_tracker::interfaces::cli::CliError>() {
                eprintln!("{}", err.format_colored());
            } else if let Some(err) = e.downcast_ref::<privacy_tracker::errors::TrackerError>() {
                eprintln!("{}", err.format_colored());
            } else {
                eprintln!("[ERROR] {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // 命令行参数优先于配置文件与环境变量
    let mut config = StaticConfig::load(cli.config.as_deref());
    if let Some(seed) = cli.seed {
        config.dataset.seed = Some(seed);
    }
    if let Some(size) = cli.size {
        config.dataset.size = size;
    }

    let _guard = init_logging(&config.logging)?;

    if !init_config(config) {
        warn!("Configuration was already initialized, keeping the existing one");
    }
    let config = get_config();
    debug!("Effective configuration: {:?}", config);

    run_cli_command(cli.command, &config)?;
    Ok(())
}
