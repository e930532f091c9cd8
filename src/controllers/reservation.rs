//! Controllers for reservation requests and administrator decisions

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::WithRejection;
use common::{DbPool, Error, ReservationError};
use reservation::{Decision, Reservation};
use validator::Validate;

use crate::mailer::{Mailer, NotificationKind};
use crate::schemas::reservation::{
	CreateReservationRequest,
	CreateReservationResponse,
	DecisionQuery,
};

#[instrument(skip_all)]
pub(crate) async fn create_reservation(
	State(pool): State<DbPool>,
	State(mailer): State<Mailer>,
	WithRejection(Json(request), _): WithRejection<
		Json<CreateReservationRequest>,
		Error,
	>,
) -> Result<impl IntoResponse, Error> {
	request.validate()?;

	let new_reservation = request.into_new_reservation().ok_or_else(|| {
		Error::Infallible("validated request is missing a date".to_string())
	})?;

	let conn = pool.get().await?;
	let reservation = new_reservation.insert(&conn).await?;

	mailer.notify(NotificationKind::Created, &reservation);

	let response = CreateReservationResponse { id: reservation.id };

	Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(pool))]
pub(crate) async fn get_occupied_days(
	State(pool): State<DbPool>,
	Path((year, month)): Path<(i32, u32)>,
) -> Result<impl IntoResponse, Error> {
	let conn = pool.get().await?;

	let days = Reservation::occupied_days(year, month, &conn).await?;

	Ok((StatusCode::OK, Json(days)))
}

#[instrument(skip(pool, mailer, query))]
pub(crate) async fn accept_reservation(
	State(pool): State<DbPool>,
	State(mailer): State<Mailer>,
	Path(r_id): Path<i32>,
	WithRejection(Query(query), _): WithRejection<Query<DecisionQuery>, Error>,
) -> Result<impl IntoResponse, Error> {
	decide(r_id, query, Decision::Accept, &pool, &mailer).await
}

#[instrument(skip(pool, mailer, query))]
pub(crate) async fn decline_reservation(
	State(pool): State<DbPool>,
	State(mailer): State<Mailer>,
	Path(r_id): Path<i32>,
	WithRejection(Query(query), _): WithRejection<Query<DecisionQuery>, Error>,
) -> Result<impl IntoResponse, Error> {
	decide(r_id, query, Decision::Decline, &pool, &mailer).await
}

async fn decide(
	r_id: i32,
	query: DecisionQuery,
	decision: Decision,
	pool: &DbPool,
	mailer: &Mailer,
) -> Result<(StatusCode, String), Error> {
	let Some(token) = query.token.filter(|t| !t.is_empty()) else {
		return Err(ReservationError::MissingToken.into());
	};

	let conn = pool.get().await?;

	let reservation = Reservation::decide(r_id, &token, decision, &conn).await?;

	let kind = match decision {
		Decision::Accept => NotificationKind::Accepted,
		Decision::Decline => NotificationKind::Declined,
	};

	mailer.notify(kind, &reservation);

	Ok((
		StatusCode::OK,
		format!("reservation {r_id} was {}", reservation.status),
	))
}
