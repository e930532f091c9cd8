#[macro_use]
extern crate tracing;

use chata::mailer::Mailer;
use chata::{AppState, Config, routes, run_migrations};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::signal::unix::SignalKind;
use tracing::Level;

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt()
		.pretty()
		.with_thread_names(true)
		.with_max_level(Level::DEBUG)
		.init();

	// Set up the configuration.
	let config = Config::from_env();

	// Set up the database connection pool and schema.
	let database_pool = config.create_database_pool();
	run_migrations(&database_pool).await.expect("COULD NOT RUN MIGRATIONS");

	let stub_mailbox = config.create_stub_mailbox();
	let mailer = Mailer::new(&config, stub_mailbox);

	let listener = TcpListener::bind(&config.server_address).await.unwrap();

	let state = AppState { config, database_pool, mailer };
	let app = routes::get_app_router(state);

	info!("listening on {}", listener.local_addr().unwrap());
	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_handler())
		.await
		.unwrap();
}

async fn shutdown_handler() {
	let ctrl_c = async {
		signal::ctrl_c().await.expect("COULD NOT INSTALL CTRL+C HANDLER");
	};

	let terminate = async {
		signal::unix::signal(SignalKind::terminate())
			.expect("COULD NOT INSTALL TERMINATE SIGNAL HANDLER")
			.recv()
			.await;
	};

	tokio::select! {
		() = ctrl_c => {},
		() = terminate => {},
	}
}
