//! Brickvault operator CLI.
//!
//! Offline tooling around the access control engine and the protection
//! layer. Nothing here talks to a running platform.
//!
//! # Quick Start
//!
//! ```bash
//! # Generate a key and export it
//! export ENCRYPTION_KEY=$(brickvault keygen --quiet)
//!
//! # Can an approved investor invest?
//! brickvault check --role investor-unverified --kyc-status approved --action make-investment
//!
//! # Print the decision table for admins
//! brickvault permissions --role admin
//! ```

mod commands;
mod style;

use std::process::ExitCode;

use anyhow::Result;
use brickvault::{Action, KycStatus, Role};
use brickvault_config::{ConfigLoader, LogFormat, LoggingConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Brickvault - access control and regulated-data protection for
/// real-estate crowdfunding.
#[derive(Parser)]
#[command(name = "brickvault")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    /// Project directory holding brickvault.toml.
    #[arg(short, long, global = true, default_value = ".")]
    project: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Generate a fresh encryption secret.
    Keygen {
        /// Print only the secret.
        #[arg(short, long)]
        quiet: bool,
    },

    /// Configuration management commands.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Print the access decision table.
    Permissions {
        /// Only show this role.
        #[arg(short, long)]
        role: Option<Role>,

        /// Only show this KYC status.
        #[arg(short, long)]
        kyc_status: Option<KycStatus>,
    },

    /// Decide a single (role, KYC status, action) request.
    ///
    /// Exits with status 1 when the request is denied.
    Check {
        /// Role of the caller (guest, investor-unverified, investor-verified, admin).
        #[arg(short, long)]
        role: Role,

        /// KYC status of the caller (not-started, pending, approved, rejected).
        #[arg(short, long)]
        kyc_status: KycStatus,

        /// Action being attempted (for example make-investment).
        #[arg(short, long)]
        action: Action,
    },

    /// Mask a regulated identifier for display.
    Mask {
        /// Value to mask.
        value: String,

        /// Use the bank account format instead of the SSN format.
        #[arg(long)]
        account: bool,
    },

    /// Print the SHA-256 digest of a value.
    Hash {
        /// Value to hash.
        value: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration.
    Show {
        /// Output format (text, toml, json).
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Validate the effective configuration.
    Validate,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    style::set_no_color(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    let config = ConfigLoader::new()
        .with_project_dir(&cli.project)
        .load_or_default();
    init_tracing(&config.logging);

    match cli.command {
        Commands::Version => {
            commands::version::run();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Keygen { quiet } => {
            commands::keygen::run(quiet);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config(cmd) => {
            match cmd {
                ConfigCommands::Show { format } => commands::config::show(&cli.project, &format)?,
                ConfigCommands::Validate => commands::config::validate(&cli.project)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Permissions { role, kyc_status } => {
            commands::permissions::run(role, kyc_status);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check {
            role,
            kyc_status,
            action,
        } => {
            let allowed = commands::check::run(role, kyc_status, action);
            Ok(if allowed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Mask { value, account } => {
            commands::protect::mask(&value, account);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Hash { value } => {
            commands::protect::hash(&value);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Logs go to stderr so command output stays pipeable.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
