//! Server side rendering of the booking calendar grid

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::WithRejection;
use chrono::Local;
use common::{DbPool, Error};
use reservation::Reservation;
use utils::calendar::{Selection, render_month};

use crate::schemas::calendar::{CalendarQuery, CalendarResponse};

#[instrument(skip(pool))]
pub(crate) async fn get_month_grid(
	State(pool): State<DbPool>,
	Path((year, month)): Path<(i32, u32)>,
	WithRejection(Query(query), _): WithRejection<Query<CalendarQuery>, Error>,
) -> Result<impl IntoResponse, Error> {
	let today = Local::now().date_naive();

	let mut selection = Selection::from_range(query.start, query.end)
		.map_err(|e| Error::ValidationError(e.to_string()))?;

	if let Some(pick) = query.pick {
		selection = selection
			.select(pick, today)
			.map_err(|e| Error::ValidationError(e.to_string()))?;
	}

	let conn = pool.get().await?;

	let occupied = Reservation::occupied_days(year, month, &conn).await?;

	let grid = render_month(year, month, &occupied, &selection, today)
		.ok_or_else(|| {
			Error::ValidationError(format!("{year}/{month} is not a valid month"))
		})?;

	let response =
		CalendarResponse { grid, selection, complete: selection.is_complete() };

	Ok((StatusCode::OK, Json(response)))
}
