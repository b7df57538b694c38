// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Commands for the public calculator.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use ritual_client::{Credentials, RitualApp, RitualParams, RouteDecision};
use ritual_client_config::ClientConfig;
use ritual_client_storage::DurableStore;

use crate::output::{drain_notices, or_dash};

#[derive(Args, Debug, Clone)]
pub struct CredentialArgs {
	pub username: String,
	#[arg(long, env = "RITUAL_PASSWORD", hide_env_values = true)]
	pub password: String,
}

#[derive(Args, Debug, Clone)]
pub struct CalculateArgs {
	/// Date of passing, YYYY-MM-DD
	pub death_date: String,
	#[arg(long)]
	pub pet_name: Option<String>,
	/// Output raw JSON
	#[arg(long)]
	pub json: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum LocaleCommand {
	/// Show the current and available locales
	Show,
	/// Switch locale and load its strings
	Set { code: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ThemeCommand {
	Show,
	Set { id: String },
}

async fn open(config: &ClientConfig, store: Arc<dyn DurableStore>) -> Result<RitualApp> {
	RitualApp::new(config, store)
		.await
		.context("failed to initialise client")
}

pub async fn login(
	config: &ClientConfig,
	store: Arc<dyn DurableStore>,
	args: CredentialArgs,
) -> Result<()> {
	let app = open(config, store).await?;
	let mut notices = app.notices().subscribe();
	app.locale().load_initial(app.api()).await;

	let user = app
		.login(&Credentials::new(&args.username, args.password))
		.await;
	drain_notices(&mut notices);
	match user {
		Some(user) => {
			println!("{} ({})", user.username, user.id);
			Ok(())
		}
		None => bail!("login failed"),
	}
}

pub async fn register(
	config: &ClientConfig,
	store: Arc<dyn DurableStore>,
	args: CredentialArgs,
) -> Result<()> {
	let app = open(config, store).await?;
	let mut notices = app.notices().subscribe();
	app.locale().load_initial(app.api()).await;

	let user = app
		.register(&Credentials::new(&args.username, args.password))
		.await;
	drain_notices(&mut notices);
	if user.is_none() {
		bail!("registration failed");
	}
	Ok(())
}

pub async fn logout(config: &ClientConfig, store: Arc<dyn DurableStore>) -> Result<()> {
	let app = open(config, store).await?;
	app.logout().await;
	Ok(())
}

pub async fn whoami(config: &ClientConfig, store: Arc<dyn DurableStore>) -> Result<()> {
	let app = open(config, store).await?;
	app.start().await;
	match app.session().current().user {
		Some(user) => println!("{} ({})", user.username, user.id),
		None => println!("not signed in"),
	}
	Ok(())
}

pub async fn calculate(
	config: &ClientConfig,
	store: Arc<dyn DurableStore>,
	args: CalculateArgs,
) -> Result<()> {
	let app = open(config, store).await?;
	app.start().await;
	if let RouteDecision::Redirect { .. } = app.route("/") {
		bail!("not signed in; run `ritual login <username>` first");
	}

	let snapshot = app
		.calculate(RitualParams::new(args.death_date, args.pet_name))
		.await;

	if let Some(error) = snapshot.error {
		bail!("{}", app.describe_error(&error).await);
	}
	let Some(result) = snapshot.result else {
		bail!("no result");
	};

	if args.json {
		println!("{}", serde_json::to_string_pretty(&result)?);
		return Ok(());
	}

	println!("Pet:        {}", or_dash(Some(&result.pet_name)));
	println!("Passed on:  {}", result.death_date);
	println!("Months:     {}", result.pet_months);
	println!("Quantity:   {}", result.suggested_quantity);
	if !result.burning_dates.is_empty() {
		println!();
		for item in &result.burning_dates {
			println!("{:<12} {}", item.date, item.desc);
		}
	}
	if !result.explanation.is_empty() {
		println!();
		println!("{}", result.explanation);
	}
	Ok(())
}

pub async fn locale(
	config: &ClientConfig,
	store: Arc<dyn DurableStore>,
	command: LocaleCommand,
) -> Result<()> {
	let app = open(config, store).await?;
	match command {
		LocaleCommand::Show => {
			let current = app.locale().current();
			for info in app.locale().registry().locales() {
				let marker = if info.code == current { "*" } else { " " };
				println!("{marker} {:<6} {}", info.code, info.display_name);
			}
		}
		LocaleCommand::Set { code } => {
			if !app.set_locale(&code).await {
				bail!("unsupported locale: {code}");
			}
			println!("{}", app.locale().registry().display_name(&code));
		}
	}
	Ok(())
}

pub async fn theme(
	config: &ClientConfig,
	store: Arc<dyn DurableStore>,
	command: ThemeCommand,
) -> Result<()> {
	let app = open(config, store).await?;
	match command {
		ThemeCommand::Show => {
			let current = app.theme().current();
			for id in app.theme().themes() {
				let marker = if *id == current { "*" } else { " " };
				println!("{marker} {id}");
			}
		}
		ThemeCommand::Set { id } => {
			if !app.theme().set_theme(&id).await {
				bail!("unknown theme: {id}");
			}
		}
	}
	Ok(())
}

pub async fn translate(config: &ClientConfig, store: Arc<dyn DurableStore>, key: &str) -> Result<()> {
	let app = open(config, store).await?;
	app.locale().load_initial(app.api()).await;
	println!("{}", app.locale().translate(key).await);
	Ok(())
}
