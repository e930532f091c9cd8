use std::sync::Arc;

use deadpool_diesel::sqlite::{Manager, Pool};
use lettre::Address;
use url::Url;

use crate::mailer::StubMailbox;

#[derive(Clone, Debug)]
pub struct Config {
	pub database_url:   String,
	pub server_address: String,

	/// Base url the accept/decline links in admin emails point to
	pub public_url:  Url,
	/// Receiver of new reservation requests
	pub admin_email: Address,

	pub email_address:       Address,
	pub email_queue_size:    usize,
	pub email_smtp_server:   String,
	pub email_smtp_password: String,
}

impl Config {
	fn get_env_var(var: &str) -> String {
		std::env::var(var).unwrap_or_else(|_| panic!("{var} must be set"))
	}

	fn get_env_var_or(var: &str, default: &str) -> String {
		std::env::var(var).unwrap_or_else(|_| default.to_string())
	}

	/// Create a new [`Config`] from environment variables
	///
	/// # Panics
	/// Panics if an environment variable is missing or malformed
	#[must_use]
	pub fn from_env() -> Self {
		let database_url = Self::get_env_var("DATABASE_URL");
		let server_address =
			Self::get_env_var_or("SERVER_ADDRESS", "0.0.0.0:3000");

		let public_url = Self::get_env_var("PUBLIC_URL")
			.parse::<Url>()
			.unwrap_or_else(|e| panic!("PUBLIC_URL is not a valid url: {e}"));
		let admin_email = Self::get_env_var("ADMIN_EMAIL")
			.parse::<Address>()
			.unwrap_or_else(|e| panic!("ADMIN_EMAIL is not a valid email: {e}"));

		let email_address = Self::get_env_var("EMAIL_ADDRESS")
			.parse::<Address>()
			.unwrap_or_else(|e| {
				panic!("EMAIL_ADDRESS is not a valid email: {e}")
			});
		let email_queue_size = Self::get_env_var_or("EMAIL_QUEUE_SIZE", "64")
			.parse::<usize>()
			.unwrap_or_else(|e| panic!("EMAIL_QUEUE_SIZE is not a number: {e}"));
		let email_smtp_server = Self::get_env_var("EMAIL_SMTP_SERVER");
		let email_smtp_password = Self::get_env_var("EMAIL_SMTP_PASSWORD");

		Self {
			database_url,
			server_address,
			public_url,
			admin_email,
			email_address,
			email_queue_size,
			email_smtp_server,
			email_smtp_password,
		}
	}

	/// Create a database pool for the given config
	///
	/// SQLite only allows a single writer, so the pool holds one connection
	///
	/// # Panics
	/// Panics if creating the pool fails
	#[must_use]
	pub fn create_database_pool(&self) -> Pool {
		let manager = Manager::new(
			self.database_url.to_string(),
			deadpool_diesel::Runtime::Tokio1,
		);

		Pool::builder(manager).max_size(1).build().unwrap()
	}

	/// Create a stub mailbox if the configured smtp server is `stub`
	#[must_use]
	pub fn create_stub_mailbox(&self) -> Option<Arc<StubMailbox>> {
		if self.email_smtp_server == "stub" {
			Some(Arc::new(StubMailbox::default()))
		} else {
			None
		}
	}
}
