//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了CLI命令行接口。

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "geocache")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(name = "config", about = "Configuration operations")]
    Config(ConfigArgs),

    #[command(name = "routes", about = "Print the mutation -> eviction table")]
    Routes,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    #[command(name = "validate", about = "Load and validate a configuration file")]
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[arg(short, long, help = "Path to the TOML configuration file")]
    pub path: std::path::PathBuf,
}

mod config;
mod routes;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::telemetry::init_tracing("warn");

    match &cli.command {
        Commands::Config(args) => match &args.command {
            ConfigSubcommand::Validate(args) => config::execute(args),
        },
        Commands::Routes => {
            print!("{}", routes::render_table());
            Ok(())
        }
    }
}
