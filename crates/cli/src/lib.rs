pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sashquote_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "sashquote",
    about = "Window-furnishings quoting CLI",
    long_about = "Price window-furnishing configurations and evaluate full quote requests \
                  against a catalog snapshot.",
    after_help = "Examples:\n  sashquote price --product p-roller --width 700 --drop 1500\n  sashquote quote --request quote.json\n  sashquote catalog\n  sashquote config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to the config file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Price one product configuration and report cost, margin, and sell")]
    Price(commands::price::PriceArgs),
    #[command(about = "Evaluate a quote request file and print line items plus totals")]
    Quote(commands::quote::QuoteArgs),
    #[command(about = "Summarize the catalog snapshot: record counts and pricing coverage")]
    Catalog(commands::catalog::CatalogArgs),
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        LogFormat::Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
    }) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("configuration error: {error}");
            return ExitCode::from(2);
        }
    };
    init_logging(&config);

    let result = match cli.command {
        Command::Price(args) => commands::price::run(&config, args),
        Command::Quote(args) => commands::quote::run(&config, args),
        Command::Catalog(args) => commands::catalog::run(&config, args),
        Command::Config => Ok(commands::config::run(&config)),
    };

    match result {
        Ok(result) => {
            println!("{}", result.output);
            ExitCode::from(result.exit_code)
        }
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::from(2)
        }
    }
}
