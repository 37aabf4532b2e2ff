pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "sokol")]
#[command(about = "Sokol CLI - manage groups, members, programs and locations")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create, edit and delete groups")]
    Groups {
        #[command(subcommand)]
        cmd: commands::groups::GroupCommands,
    },

    #[command(about = "List members")]
    Members {
        #[command(subcommand)]
        cmd: commands::lookup::LookupCommands,
    },

    #[command(about = "List programs")]
    Programs {
        #[command(subcommand)]
        cmd: commands::lookup::LookupCommands,
    },

    #[command(about = "List locations")]
    Locations {
        #[command(subcommand)]
        cmd: commands::lookup::LookupCommands,
    },

    #[command(about = "Mint a development bearer token with the configured secret")]
    Token(commands::token::TokenArgs),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Groups { cmd } => commands::groups::handle(cmd, output_format).await,
        Commands::Members { cmd } => commands::lookup::handle(commands::lookup::Lookup::Members, cmd, output_format).await,
        Commands::Programs { cmd } => commands::lookup::handle(commands::lookup::Lookup::Programs, cmd, output_format).await,
        Commands::Locations { cmd } => commands::lookup::handle(commands::lookup::Lookup::Locations, cmd, output_format).await,
        Commands::Token(args) => commands::token::handle(args, output_format),
    }
}
