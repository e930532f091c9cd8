use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::controllers::calendar::get_month_grid;
use crate::controllers::healthcheck;
use crate::controllers::reservation::{
	accept_reservation,
	create_reservation,
	decline_reservation,
	get_occupied_days,
};

/// Get the app router
pub fn get_app_router(state: AppState) -> Router {
	let api_routes = Router::new()
		.route("/healthcheck", get(healthcheck))
		.nest("/reservations", reservation_routes())
		.nest("/calendar", calendar_routes());

	Router::new()
		.merge(api_routes)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(TimeoutLayer::new(Duration::from_secs(10)))
				.layer(CompressionLayer::new())
				.layer(CorsLayer::permissive()),
		)
		.with_state(state)
}

/// Reservation routes, accept and decline are authorized by the token query
/// parameter
fn reservation_routes() -> Router<AppState> {
	// All routes share the name of the first segment, for the availability
	// route it holds the year
	Router::new()
		.route("/", post(create_reservation))
		.route("/{id}/accept", get(accept_reservation))
		.route("/{id}/decline", get(decline_reservation))
		.route("/{id}/{month}", get(get_occupied_days))
}

/// Calendar grid routes
fn calendar_routes() -> Router<AppState> {
	Router::new().route("/{year}/{month}", get(get_month_grid))
}
