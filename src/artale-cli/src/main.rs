mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

/// Default log filter for each `-v` count
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "artale=warn,artale_cli=warn",
        1 => "artale=info,artale_cli=info",
        _ => "artale=debug,artale_cli=debug",
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(cli.verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Search {
            filter,
            all,
            format,
            no_record,
        } => {
            commands::search::handle(&config, cli.data, &filter, all, format, no_record)?;
        }

        Commands::Browse { filter } => {
            commands::browse::handle(&config, cli.data, &filter)?;
        }

        Commands::History { command } => {
            commands::history::handle(&config, cli.data, command)?;
        }

        Commands::Share { keyword, base } => {
            commands::share::handle(&config, &keyword, base.as_deref())?;
        }

        Commands::Regions => {
            commands::regions::regions(&config, cli.data)?;
        }

        Commands::Resistances => {
            commands::regions::resistances(&config, cli.data)?;
        }

        Commands::Configure {
            data_dir,
            batch_size,
            debounce_ms,
            share_base_url,
            history_db,
            history_cookie_jar,
            cookie_ttl_days,
            secure_cookies,
            show,
        } => {
            let update = commands::configure::ConfigUpdate {
                data_dir,
                batch_size,
                debounce_ms,
                share_base_url,
                history_db,
                history_cookie_jar,
                cookie_ttl_days,
                secure_cookies,
            };
            commands::configure::handle(update, show)?;
        }
    }

    Ok(())
}
