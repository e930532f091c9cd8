use std::fmt;

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

/// Lifecycle of a reservation, stored as lowercase text
///
/// `Pending` is the only state a reservation can leave, `Accepted` and
/// `Declined` are terminal.
#[derive(
	Clone, Copy, DbEnum, Debug, Default, Deserialize, PartialEq, Eq, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
	#[default]
	Pending,
	Accepted,
	Declined,
}

impl ReservationStatus {
	/// Whether an administrator already acted on the reservation
	#[must_use]
	pub fn is_decided(self) -> bool { self != Self::Pending }
}

impl fmt::Display for ReservationStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let repr = match self {
			Self::Pending => "pending",
			Self::Accepted => "accepted",
			Self::Declined => "declined",
		};

		write!(f, "{repr}")
	}
}
