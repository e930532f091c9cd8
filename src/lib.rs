//! # Chata booking backend library

#[macro_use]
extern crate tracing;

use axum::extract::FromRef;
use common::DbPool;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use mailer::Mailer;

mod config;

pub mod controllers;
pub mod mailer;
pub mod routes;
pub mod schemas;

pub use common::{DbConn, Error};
pub use config::*;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// Common state of the app
#[derive(Clone)]
pub struct AppState {
	pub config:        Config,
	pub database_pool: DbPool,
	pub mailer:        Mailer,
}

impl FromRef<AppState> for Config {
	fn from_ref(input: &AppState) -> Self { input.config.clone() }
}

impl FromRef<AppState> for DbPool {
	fn from_ref(input: &AppState) -> Self { input.database_pool.clone() }
}

impl FromRef<AppState> for Mailer {
	fn from_ref(input: &AppState) -> Self { input.mailer.clone() }
}

/// Bring the database schema up to date
///
/// # Errors
/// Fails if no connection can be acquired or a migration fails
pub async fn run_migrations(pool: &DbPool) -> Result<(), Error> {
	let conn = pool.get().await?;

	let applied = conn
		.interact(|conn| {
			conn.run_pending_migrations(MIGRATIONS)
				.map(|versions| versions.len())
				.map_err(|e| e.to_string())
		})
		.await?
		.map_err(common::InternalServerError::MigrationError)?;

	info!("applied {applied} pending migrations");

	Ok(())
}
