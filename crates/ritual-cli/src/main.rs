// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ritual CLI
//!
//! Terminal front end for the ritual calculator and its admin console. State
//! that the web client keeps in browser storage (token, locale, theme, admin
//! session) lives in a JSON file under the data directory.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ritual_client_config::{load_config_with_cli, CliOverrides, LogFormat, LoggingConfig};
use ritual_client_storage::{DurableStore, FileStore};

mod admin;
mod client;
mod output;

/// Ritual - burning-date calculator
#[derive(Parser, Debug)]
#[command(name = "ritual", version, about, long_about = None)]
struct Args {
	/// Path to custom configuration file
	#[arg(short, long, global = true)]
	config: Option<PathBuf>,

	/// Backend URL (overrides config)
	#[arg(long, global = true)]
	base_url: Option<String>,

	/// Storage file for session, locale and theme (overrides config)
	#[arg(long, global = true)]
	storage_path: Option<PathBuf>,

	/// Log level (overrides config)
	#[arg(short, long, global = true)]
	log_level: Option<String>,

	/// Output logs as JSON (overrides config)
	#[arg(long, global = true)]
	json_logs: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Sign in
	Login(client::CredentialArgs),
	/// Create an account and sign in
	Register(client::CredentialArgs),
	/// Sign out and forget the stored token
	Logout,
	/// Show the signed-in user
	Whoami,
	/// Calculate burning dates
	Calculate(client::CalculateArgs),
	/// Show or change the interface language
	Locale {
		#[command(subcommand)]
		command: client::LocaleCommand,
	},
	/// Show or change the theme
	Theme {
		#[command(subcommand)]
		command: client::ThemeCommand,
	},
	/// Translate a message key in the current locale
	#[command(name = "t")]
	Translate {
		key: String,
	},
	/// Admin console
	Admin {
		#[command(subcommand)]
		command: admin::AdminCommand,
	},
}

impl From<&Args> for CliOverrides {
	fn from(args: &Args) -> Self {
		Self {
			config_file: args.config.clone(),
			base_url: args.base_url.clone(),
			storage_path: args.storage_path.clone(),
			log_level: args.log_level.clone(),
			log_format: if args.json_logs {
				Some("json".to_string())
			} else {
				None
			},
		}
	}
}

fn init_tracing(logging: &LoggingConfig) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(format!("ritual={}", logging.level.as_directive())));

	match logging.format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Compact => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Pretty => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().with_writer(std::io::stderr))
				.init();
		}
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	let config =
		load_config_with_cli(CliOverrides::from(&args)).context("failed to load configuration")?;

	init_tracing(&config.logging);
	debug!(base_url = %config.base_url, storage = %config.storage_path.display(), "starting ritual");

	let store: Arc<dyn DurableStore> = Arc::new(FileStore::new(&config.storage_path));

	match args.command {
		Command::Login(creds) => client::login(&config, store, creds).await,
		Command::Register(creds) => client::register(&config, store, creds).await,
		Command::Logout => client::logout(&config, store).await,
		Command::Whoami => client::whoami(&config, store).await,
		Command::Calculate(calc) => client::calculate(&config, store, calc).await,
		Command::Locale { command } => client::locale(&config, store, command).await,
		Command::Theme { command } => client::theme(&config, store, command).await,
		Command::Translate { key } => client::translate(&config, store, &key).await,
		Command::Admin { command } => admin::run(&config, store, command).await,
	}
}
