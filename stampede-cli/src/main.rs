//! Stampede entry point

use anyhow::{bail, Context, Result};
use clap::Parser;
use stampede_config::domains::logging::{LogFormat, LogLevel};
use stampede_config::{ConfigLoader, StampedeConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod orchestrator;

use cli::{Cli, Commands, ConfigCommands};
use orchestrator::Selection;

fn init_tracing(level: LogLevel, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter_str()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Text => builder.init(),
    }
}

fn load_config(cli: &Cli) -> Result<StampedeConfig> {
    let loader = ConfigLoader::new();
    let mut config = loader
        .load(cli.config.as_deref())
        .context("loading configuration")?;

    if let Some(seed) = cli.seed {
        config.run.seed = Some(seed);
    }
    if let Some(seconds) = cli.duration {
        config.run.duration = std::time::Duration::from_secs(seconds);
    }
    config.validate_all().context("validating configuration")?;

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config subcommands need no run setup
    if let Some(Commands::Config { config_cmd }) = &cli.command {
        return match config_cmd {
            ConfigCommands::Validate { config_file } => {
                let config = ConfigLoader::new()
                    .from_file(config_file)
                    .with_context(|| format!("validating {}", config_file.display()))?;
                config.validate_all()?;
                println!("configuration is valid: {}", config_file.display());
                Ok(())
            }
            ConfigCommands::Generate { output } => {
                let sample = StampedeConfig::generate_sample();
                match output {
                    Some(path) => {
                        std::fs::write(path, &sample)
                            .with_context(|| format!("writing {}", path.display()))?;
                        println!("sample configuration written to {}", path.display());
                    }
                    None => print!("{sample}"),
                }
                Ok(())
            }
        };
    }

    let config = load_config(&cli)?;

    let level = match &cli.log_level {
        Some(level) => level
            .parse::<LogLevel>()
            .map_err(|message| anyhow::anyhow!(message))?,
        None => config.logging.level,
    };
    init_tracing(level, config.logging.format);

    let selection = match cli.command {
        None | Some(Commands::Run) => Selection::All,
        Some(Commands::Actors) => Selection::Actors,
        Some(Commands::Submissions) => Selection::Submissions,
        Some(Commands::Queries) => Selection::Queries,
        Some(Commands::Monitor) => Selection::Monitor,
        Some(Commands::Config { .. }) => unreachable!("handled above"),
    };

    let outcome = orchestrator::run(config, selection).await?;

    if let Some(failure) = outcome.setup_failure {
        bail!("run aborted by setup failure: {failure}");
    }

    info!(
        requests = outcome.report.overall.total,
        success_rate = %outcome.report.overall.success_rate_display(),
        "run complete"
    );
    Ok(())
}
