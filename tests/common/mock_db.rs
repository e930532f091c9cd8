use tempfile::TempDir;

/// A test database RAII guard, the database file lives in a temporary
/// directory that is removed on drop
pub struct DatabaseGuard {
	_directory:       TempDir,
	pub database_url: String,
}

impl DatabaseGuard {
	/// Acquire a new [`DatabaseGuard`] for a fresh, empty test database
	///
	/// # Panics
	/// Panics if creating the temporary directory fails
	pub fn acquire() -> Self {
		if Ok("true".to_string()) == std::env::var("CI") {
			// Only the first test in a binary gets to install the subscriber
			let _ = tracing_subscriber::fmt()
				.pretty()
				.with_thread_names(true)
				.with_max_level(tracing::Level::DEBUG)
				.try_init();
		}

		let directory = tempfile::tempdir().expect("could not create temp dir");
		let database_url = directory
			.path()
			.join("reservations.db")
			.to_str()
			.expect("temp dir is not valid utf-8")
			.to_string();

		Self { _directory: directory, database_url }
	}
}
