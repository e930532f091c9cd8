use std::sync::Arc;

use axum_test::TestServer;
use chata::mailer::{Mailer, StubMailbox};
use chata::schemas::reservation::CreateReservationResponse;
use chata::{AppState, Config, routes, run_migrations};
use ::common::DbPool;
use diesel::prelude::*;
use reservation::Reservation;

mod mock_db;
mod wrappers;

use mock_db::DatabaseGuard;

pub const ADMIN_EMAIL: &str = "admin@chata.example";
pub const GUEST_EMAIL: &str = "guest@example.com";

#[allow(dead_code)]
pub struct TestEnv {
	pub app:          TestServer,
	pub db_guard:     DatabaseGuard,
	pub pool:         DbPool,
	pub stub_mailbox: Arc<StubMailbox>,
}

impl TestEnv {
	/// Get a test environment with a throw-away database and a stub mailer
	///
	/// # Panics
	/// Panics if building the test server or running migrations fails
	#[allow(dead_code)]
	pub async fn new() -> Self {
		let db_guard = DatabaseGuard::acquire();

		let config = test_config(&db_guard, "stub");

		let pool = config.create_database_pool();
		run_migrations(&pool).await.unwrap();

		let stub_mailbox = config.create_stub_mailbox();
		let mailer = Mailer::new(&config, stub_mailbox.clone());

		let state = AppState { config, database_pool: pool.clone(), mailer };
		let app = routes::get_app_router(state);

		let test_server = TestServer::new(app).unwrap();

		TestEnv {
			app: test_server,
			db_guard,
			pool,
			stub_mailbox: stub_mailbox.unwrap(),
		}
	}

	/// Create a reservation through the api and wait for the admin email
	#[allow(dead_code)]
	pub async fn create_reservation(&self, start: &str, end: &str) -> i32 {
		let request = serde_json::json!({
			"start_date": start,
			"end_date": end,
			"name": "Jan Novák",
			"email": GUEST_EMAIL,
			"phone": "+420 123 456 789",
			"message": "We are bringing a dog",
		});

		let response = self
			.expect_mail_to(&[ADMIN_EMAIL], async || {
				self.app.post("/reservations").json(&request).await
			})
			.await;

		response.assert_status(axum::http::StatusCode::CREATED);

		response.json::<CreateReservationResponse>().id
	}

	/// Read a reservation straight from the database
	#[allow(dead_code)]
	pub async fn get_reservation(&self, id: i32) -> Reservation {
		let conn = self.pool.get().await.unwrap();

		Reservation::get_by_id(id, &conn).await.unwrap()
	}

	/// Count all stored reservations
	#[allow(dead_code)]
	pub async fn count_reservations(&self) -> i64 {
		let conn = self.pool.get().await.unwrap();

		conn.interact(|conn| {
			use db::reservation::dsl::*;

			reservation.count().get_result::<i64>(conn)
		})
		.await
		.unwrap()
		.unwrap()
	}

	/// Get the occupied days of a month
	#[allow(dead_code)]
	pub async fn occupied_days(&self, year: i32, month: u32) -> Vec<u32> {
		let response =
			self.app.get(&format!("/reservations/{year}/{month}")).await;

		response.assert_status_ok();

		response.json::<Vec<u32>>()
	}

	/// Accept or decline a reservation, `action` is `accept` or `decline`
	#[allow(dead_code)]
	pub async fn decide(
		&self,
		id: i32,
		action: &str,
		token: &str,
	) -> axum_test::TestResponse {
		self.app
			.get(&format!("/reservations/{id}/{action}"))
			.add_query_param("token", token)
			.await
	}
}

/// Build a config for a throw-away database and the given smtp server
fn test_config(db_guard: &DatabaseGuard, email_smtp_server: &str) -> Config {
	Config {
		database_url:        db_guard.database_url.clone(),
		server_address:      "127.0.0.1:0".to_string(),
		public_url:          "http://localhost:3000/api/".parse().unwrap(),
		admin_email:         ADMIN_EMAIL.parse().unwrap(),
		email_address:       "noreply@chata.example".parse().unwrap(),
		email_queue_size:    64,
		email_smtp_server:   email_smtp_server.to_string(),
		email_smtp_password: String::new(),
	}
}

/// Get a test server that sends mail over a real smtp transport
///
/// # Panics
/// Panics if building the test server or running migrations fails
#[allow(dead_code)]
pub async fn smtp_test_server(
	email_smtp_server: &str,
) -> (TestServer, DatabaseGuard) {
	let db_guard = DatabaseGuard::acquire();
	let config = test_config(&db_guard, email_smtp_server);

	let pool = config.create_database_pool();
	run_migrations(&pool).await.unwrap();

	let mailer = Mailer::new(&config, None);

	let state = AppState { config, database_pool: pool, mailer };
	let app = routes::get_app_router(state);

	(TestServer::new(app).unwrap(), db_guard)
}
