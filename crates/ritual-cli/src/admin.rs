// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `ritual admin ...` commands.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use ritual_admin::{AdminApp, AnnouncementDraft, LanguageStringDraft, Saved};
use ritual_client::{Credentials, RouteDecision};
use ritual_client_config::ClientConfig;
use ritual_client_storage::DurableStore;

use crate::output::{drain_notices, or_dash, truncate};

#[derive(Subcommand, Debug, Clone)]
pub enum AdminCommand {
	/// Sign in as an operator
	Login {
		username: String,
		#[arg(long, env = "RITUAL_ADMIN_PASSWORD", hide_env_values = true)]
		password: String,
	},
	Logout,
	/// List registered users
	Users {
		#[arg(long, default_value = "1")]
		page: u32,
		#[arg(long, default_value = "")]
		search: String,
	},
	Stats,
	/// List calculation requests
	Logs {
		#[arg(long, default_value = "1")]
		page: u32,
	},
	Settings,
	SetSetting {
		key: String,
		value: String,
	},
	Announcements,
	/// Create an announcement, or update one when --id is given
	SaveAnnouncement {
		#[arg(long)]
		id: Option<i64>,
		#[arg(long)]
		title: String,
		#[arg(long)]
		body: String,
		#[arg(long, default_value = "zh")]
		locale: String,
		#[arg(long)]
		inactive: bool,
		#[arg(long)]
		start_at: Option<String>,
		#[arg(long)]
		end_at: Option<String>,
	},
	DeleteAnnouncement {
		id: i64,
	},
	/// List backend language strings
	Strings {
		/// Only show keys in this category
		#[arg(long)]
		category: Option<String>,
	},
	/// Create a language string, or update one when --id is given
	SaveString {
		#[arg(long)]
		id: Option<i64>,
		#[arg(long)]
		key: String,
		#[arg(long, default_value = "")]
		category: String,
		#[arg(long, default_value = "")]
		zh: String,
		#[arg(long, default_value = "")]
		en: String,
	},
	DeleteString {
		id: i64,
	},
}

pub async fn run(
	config: &ClientConfig,
	store: Arc<dyn DurableStore>,
	command: AdminCommand,
) -> Result<()> {
	let app = AdminApp::new(config, store)
		.await
		.context("failed to initialise admin client")?;
	let mut notices = app.notices().subscribe();

	let outcome = dispatch(&app, command).await;
	drain_notices(&mut notices);
	outcome
}

async fn dispatch(app: &AdminApp, command: AdminCommand) -> Result<()> {
	match command {
		AdminCommand::Login { username, password } => {
			match app.login(&Credentials::new(&username, password)).await {
				Some(user) => {
					println!("{} ({})", user.username, or_dash(user.role.as_deref()));
					Ok(())
				}
				None => bail!("admin login failed"),
			}
		}
		AdminCommand::Logout => {
			app.logout().await;
			Ok(())
		}
		other => {
			if let RouteDecision::Redirect { .. } = app.route() {
				bail!("not signed in; run `ritual admin login <username>` first");
			}
			signed_in(app, other).await
		}
	}
}

async fn signed_in(app: &AdminApp, command: AdminCommand) -> Result<()> {
	match command {
		AdminCommand::Login { .. } | AdminCommand::Logout => Ok(()),
		AdminCommand::Users { page, search } => {
			let users = app.users(page, &search).await?;
			println!("{:<8} {:<24} {:<20}", "ID", "USERNAME", "CREATED");
			for user in &users.items {
				println!("{:<8} {:<24} {:<20}", user.id, user.username, user.created_at);
			}
			println!("{} total", users.total);
			Ok(())
		}
		AdminCommand::Stats => {
			let stats = app.stats().await?;
			println!("Users:              {}", stats.total_users);
			println!("Calculations today: {}", stats.today_calculates);
			println!("Calculations total: {}", stats.total_calculates);
			Ok(())
		}
		AdminCommand::Logs { page } => {
			let logs = app.calculate_logs(page).await?;
			println!(
				"{:<8} {:<8} {:<16} {:<12} {:<6} {:<20}",
				"ID", "USER", "PET", "DATE", "LANG", "CREATED"
			);
			for log in &logs.items {
				let user = log
					.user_id
					.map(|id| id.to_string())
					.unwrap_or_else(|| "-".to_string());
				println!(
					"{:<8} {:<8} {:<16} {:<12} {:<6} {:<20}",
					log.id,
					user,
					truncate(or_dash(log.pet_name.as_deref()), 16),
					log.death_date,
					log.locale,
					log.created_at
				);
			}
			println!("{} total", logs.total);
			Ok(())
		}
		AdminCommand::Settings => {
			for (key, item) in app.settings().await? {
				println!("{key} = {} ({})", item.value, item.updated_at);
			}
			Ok(())
		}
		AdminCommand::SetSetting { key, value } => {
			ensure(app.upsert_setting(&key, &value).await)
		}
		AdminCommand::Announcements => {
			println!(
				"{:<6} {:<6} {:<6} {:<30} {:<20}",
				"ID", "LANG", "ACTIVE", "TITLE", "UPDATED"
			);
			for a in app.announcements().await? {
				println!(
					"{:<6} {:<6} {:<6} {:<30} {:<20}",
					a.id,
					a.locale,
					if a.is_active() { "yes" } else { "no" },
					truncate(&a.title, 30),
					a.updated_at
				);
			}
			Ok(())
		}
		AdminCommand::SaveAnnouncement {
			id,
			title,
			body,
			locale,
			inactive,
			start_at,
			end_at,
		} => {
			let draft = AnnouncementDraft {
				locale,
				active: !inactive,
				start_at,
				end_at,
				..AnnouncementDraft::new(title, body)
			};
			report_saved(app.save_announcement(id, &draft).await)
		}
		AdminCommand::DeleteAnnouncement { id } => ensure(app.delete_announcement(id).await),
		AdminCommand::Strings { category } => {
			println!("{:<6} {:<32} {:<24} {:<24}", "ID", "KEY", "ZH", "EN");
			for s in app.language_strings().await? {
				if category.as_deref().is_some_and(|c| *c != s.category) {
					continue;
				}
				println!(
					"{:<6} {:<32} {:<24} {:<24}",
					s.id,
					truncate(&s.key, 32),
					truncate(&s.zh, 24),
					truncate(&s.en, 24)
				);
			}
			Ok(())
		}
		AdminCommand::SaveString {
			id,
			key,
			category,
			zh,
			en,
		} => {
			let draft = LanguageStringDraft {
				key,
				category,
				zh,
				en,
			};
			report_saved(app.save_language_string(id, &draft).await)
		}
		AdminCommand::DeleteString { id } => ensure(app.delete_language_string(id).await),
	}
}

fn ensure(done: Option<()>) -> Result<()> {
	match done {
		Some(()) => Ok(()),
		None => bail!("operation failed"),
	}
}

fn report_saved(saved: Option<Saved>) -> Result<()> {
	match saved {
		Some(Saved::Created(id)) if id > 0 => {
			println!("created {id}");
			Ok(())
		}
		Some(_) => Ok(()),
		None => bail!("save failed"),
	}
}
