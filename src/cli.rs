//! Command-line interface.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::{NewUser, Tokens, UserDirectory};
use crate::config::Config;
use crate::http;
use crate::telemetry;

#[derive(Parser, Debug)]
#[command(name = "showroom")]
#[command(version, about = "Storefront backend: gallery, catalog and site settings")]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = "showroom.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Validate the configuration and print warnings
    Check,
    /// Manage users
    #[command(subcommand)]
    User(UserCommand),
    /// Print a bearer token for a user
    Token {
        /// User id
        #[arg(long)]
        user: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Add a user and print its id
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Grant access to admin routes
        #[arg(long)]
        admin: bool,
    },
    /// List users
    List,
}

/// Loads and validates the config, then installs the subscriber so the
/// warnings are logged with the configured format.
fn load_config(path: &Path) -> Result<Config> {
    let config = Config::load(path)?;
    telemetry::init_tracing(&config.logging);
    let validation = config.validate()?;
    for warning in &validation.warnings {
        tracing::warn!("{warning}");
    }
    Ok(config)
}

fn users(config: &Config) -> Result<UserDirectory> {
    Ok(UserDirectory::new(http::open_records(config)?))
}

/// Runs the parsed command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the command fails.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Serve { port } => {
            let mut config = load_config(&cli.config)?;
            if let Some(port) = port {
                config.server.port = port;
            }
            http::serve(&config).await
        },
        Command::Check => {
            let config = Config::load(&cli.config)?;
            let validation = config.validate()?;
            if validation.has_warnings() {
                println!("Configuration is valid, with warnings:");
                for warning in &validation.warnings {
                    println!("  - {warning}");
                }
            } else {
                println!("Configuration is valid");
            }
            Ok(())
        },
        Command::User(UserCommand::Add { name, email, admin }) => {
            let config = load_config(&cli.config)?;
            let user = users(&config)?
                .create(NewUser {
                    name,
                    email,
                    is_admin: admin,
                })
                .await
                .context("Failed to add user")?;
            println!("{}", user.id);
            Ok(())
        },
        Command::User(UserCommand::List) => {
            let config = load_config(&cli.config)?;
            for user in users(&config)?.list().await? {
                let role = if user.is_admin { "admin" } else { "user" };
                println!("{}\t{}\t{}\t{role}", user.id, user.email, user.name);
            }
            Ok(())
        },
        Command::Token { user } => {
            let config = load_config(&cli.config)?;
            let Some(tokens) = Tokens::new(
                &config.auth.jwt_secret,
                Duration::from_secs(config.auth.token_ttl_secs),
            ) else {
                bail!("auth.jwt_secret is not set; cannot sign tokens");
            };
            if users(&config)?.find(&user).await?.is_none() {
                bail!("No user with id '{user}'");
            }
            println!("{}", tokens.issue(&user)?);
            Ok(())
        },
    }
}
