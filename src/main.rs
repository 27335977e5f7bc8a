// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Stackyard CLI - container stack layouts for depot yards

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::io::IsTerminal;

use stackyard::commands::{self, generate::GenerateArgs, stack::StackArgs, CommandContext};

#[derive(Parser)]
#[command(name = "stackyard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "STACKYARD_CONFIG", global = true)]
    config: Option<std::path::PathBuf>,

    /// Data directory override
    #[arg(long, env = "STACKYARD_DATA_DIR", global = true)]
    data_dir: Option<std::path::PathBuf>,

    /// Disable colored output
    #[arg(
        long,
        env = "NO_COLOR",
        global = true,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage yards (create, list, show)
    Yard {
        /// Action to perform
        action: String,

        /// Yard code
        yard: Option<String>,

        /// Display name
        name: Option<String>,

        /// Declared total capacity in TEU slots
        #[arg(long, default_value_t = 0)]
        capacity: u32,
    },

    /// Manage sections of a yard (create, list)
    Section {
        /// Action to perform
        action: String,

        /// Yard code or ID
        yard: String,

        /// Section name
        name: Option<String>,
    },

    /// Manage stacks (list, show, create, update, delete, occupancy, next, place)
    Stack {
        /// Action to perform
        action: String,

        /// Yard code or ID
        yard: String,

        /// Stack number
        number: Option<u32>,

        #[command(flatten)]
        args: StackArgs,
    },

    /// Generate layouts (tantarelli, clone, grid)
    Generate {
        /// Layout to generate
        action: String,

        /// Target yard code or ID
        yard: String,

        #[command(flatten)]
        args: GenerateArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate for
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = stackyard::config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => tracing::Level::ERROR,
        0 => config.log_level.parse().unwrap_or(tracing::Level::INFO),
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = CommandContext {
        config,
        json: cli.json,
        color: !cli.no_color && std::io::stdout().is_terminal(),
    };

    // Execute command
    match cli.command {
        Commands::Yard { action, yard, name, capacity } => {
            commands::yard::run(&ctx, &action, yard, name, capacity)
        }
        Commands::Section { action, yard, name } => {
            commands::section::run(&ctx, &action, &yard, name)
        }
        Commands::Stack { action, yard, number, args } => {
            commands::stack::run(&ctx, &action, &yard, number, &args)
        }
        Commands::Generate { action, yard, args } => {
            commands::generate::run(&ctx, &action, &yard, &args)
        }
        Commands::Completions { shell } => {
            commands::completions::run(shell, &mut Cli::command())
        }
    }
}
