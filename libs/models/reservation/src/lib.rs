#[macro_use]
extern crate tracing;

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use common::{DbConn, Error, ReservationError};
use db::{ReservationStatus, reservation};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use utils::{calendar, token};

/// The outcome an administrator can pick for a pending reservation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
	Accept,
	Decline,
}

impl From<Decision> for ReservationStatus {
	fn from(value: Decision) -> Self {
		match value {
			Decision::Accept => Self::Accepted,
			Decision::Decline => Self::Declined,
		}
	}
}

#[derive(Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = reservation)]
#[diesel(check_for_backend(Sqlite))]
pub struct Reservation {
	pub id:         i32,
	pub start_date: NaiveDate,
	pub end_date:   NaiveDate,
	pub name:       String,
	pub email:      String,
	pub phone:      String,
	pub message:    Option<String>,
	pub status:     ReservationStatus,
	pub token:      String,
	pub created_at: NaiveDateTime,
	pub decided_at: Option<NaiveDateTime>,
}

// The token is a credential and must never end up in the logs
impl fmt::Debug for Reservation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Reservation")
			.field("id", &self.id)
			.field("start_date", &self.start_date)
			.field("end_date", &self.end_date)
			.field("name", &self.name)
			.field("email", &self.email)
			.field("phone", &self.phone)
			.field("message", &self.message)
			.field("status", &self.status)
			.field("created_at", &self.created_at)
			.field("decided_at", &self.decided_at)
			.finish_non_exhaustive()
	}
}

impl Reservation {
	/// Get a [`Reservation`] given its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(r_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let reservation = conn
			.interact(move |conn| {
				use self::reservation::dsl::*;

				reservation
					.find(r_id)
					.select(Self::as_select())
					.get_result(conn)
					.optional()
			})
			.await??
			.ok_or_else(|| {
				Error::NotFound(format!("no reservation with id {r_id}"))
			})?;

		Ok(reservation)
	}

	/// Accept or decline a pending [`Reservation`]
	///
	/// The final write only applies while the reservation is still pending,
	/// so of two concurrent decisions exactly one wins and the other one sees
	/// the winning status.
	///
	/// # Errors
	/// - [`Error::NotFound`] if there is no reservation with this id
	/// - [`ReservationError::InvalidToken`] if the token does not match
	/// - [`ReservationError::AlreadyDecided`] if the reservation is no longer
	///   pending
	#[instrument(skip(supplied_token, conn))]
	pub async fn decide(
		r_id: i32,
		supplied_token: &str,
		decision: Decision,
		conn: &DbConn,
	) -> Result<Self, Error> {
		let current = Self::get_by_id(r_id, conn).await?;

		if !token::matches(&current.token, supplied_token) {
			return Err(ReservationError::InvalidToken.into());
		}

		if current.status.is_decided() {
			return Err(
				ReservationError::AlreadyDecided(current.status.to_string())
					.into(),
			);
		}

		Self::commit_decision(r_id, decision, conn).await
	}

	/// Write a decision unless the reservation left `pending` in the meantime
	///
	/// # Errors
	/// Fails with [`ReservationError::AlreadyDecided`] carrying the status that
	/// won if the guarded write did not apply
	#[instrument(skip(conn))]
	pub async fn commit_decision(
		r_id: i32,
		decision: Decision,
		conn: &DbConn,
	) -> Result<Self, Error> {
		let Some(decided) = Self::apply_decision(r_id, decision, conn).await?
		else {
			let current = Self::get_by_id(r_id, conn).await?;

			warn!(
				"reservation {r_id} was decided concurrently, it is now {}",
				current.status
			);

			return Err(
				ReservationError::AlreadyDecided(current.status.to_string())
					.into(),
			);
		};

		info!("reservation {r_id} is now {}", decided.status);

		Ok(decided)
	}

	/// Set the status and `decided_at` in a single update guarded by
	/// `status = 'pending'`
	///
	/// Returns `None` if no row was updated, the reservation is then missing
	/// or already decided
	#[instrument(skip(conn))]
	pub async fn apply_decision(
		r_id: i32,
		decision: Decision,
		conn: &DbConn,
	) -> Result<Option<Self>, Error> {
		let target = ReservationStatus::from(decision);
		let now = Utc::now().naive_utc();

		let decided = conn
			.interact(move |conn| {
				use self::reservation::dsl::*;

				diesel::update(
					reservation
						.filter(id.eq(r_id))
						.filter(status.eq(ReservationStatus::Pending)),
				)
				.set((status.eq(target), decided_at.eq(now)))
				.returning(Self::as_returning())
				.get_result(conn)
				.optional()
			})
			.await??;

		Ok(decided)
	}

	/// Get the `(start_date, end_date)` pairs of all reservations that are
	/// not declined and overlap the inclusive range `[from, until]`
	#[instrument(skip(conn))]
	pub async fn occupied_spans(
		from: NaiveDate,
		until: NaiveDate,
		conn: &DbConn,
	) -> Result<Vec<(NaiveDate, NaiveDate)>, Error> {
		let spans = conn
			.interact(move |conn| {
				use self::reservation::dsl::*;

				reservation
					.filter(status.ne(ReservationStatus::Declined))
					.filter(start_date.le(until))
					.filter(end_date.ge(from))
					.order(start_date.asc())
					.select((start_date, end_date))
					.load(conn)
			})
			.await??;

		Ok(spans)
	}

	/// Get the days of a month that are covered by a pending or accepted
	/// reservation, in ascending order
	///
	/// # Errors
	/// Fails with [`Error::ValidationError`] if the month does not exist
	#[instrument(skip(conn))]
	pub async fn occupied_days(
		year: i32,
		month: u32,
		conn: &DbConn,
	) -> Result<Vec<u32>, Error> {
		let Some((first, last)) = calendar::month_bounds(year, month) else {
			return Err(Error::ValidationError(format!(
				"{year}/{month} is not a valid month"
			)));
		};

		let spans = Self::occupied_spans(first, last, conn).await?;

		calendar::occupied_days(year, month, spans).ok_or_else(|| {
			Error::Infallible(format!("month bounds vanished for {year}/{month}"))
		})
	}
}

#[derive(Clone, Insertable)]
#[diesel(table_name = reservation)]
#[diesel(check_for_backend(Sqlite))]
pub struct NewReservation {
	pub start_date: NaiveDate,
	pub end_date:   NaiveDate,
	pub name:       String,
	pub email:      String,
	pub phone:      String,
	pub message:    Option<String>,
	pub status:     ReservationStatus,
	pub token:      String,
}

impl NewReservation {
	/// Create a new pending reservation request with a freshly minted token
	#[must_use]
	pub fn new(
		start_date: NaiveDate,
		end_date: NaiveDate,
		name: String,
		email: String,
		phone: String,
		message: Option<String>,
	) -> Self {
		Self {
			start_date,
			end_date,
			name,
			email,
			phone,
			message,
			status: ReservationStatus::Pending,
			token: token::generate(),
		}
	}

	/// Insert this [`NewReservation`]
	#[instrument(skip(self, conn))]
	pub async fn insert(self, conn: &DbConn) -> Result<Reservation, Error> {
		let reservation = conn
			.interact(|conn| {
				use self::reservation::dsl::*;

				diesel::insert_into(reservation)
					.values(self)
					.returning(Reservation::as_returning())
					.get_result(conn)
			})
			.await??;

		info!(
			"created reservation {} from {} to {}",
			reservation.id, reservation.start_date, reservation.end_date
		);

		Ok(reservation)
	}
}
