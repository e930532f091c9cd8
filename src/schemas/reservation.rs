use std::borrow::Cow;

use chrono::NaiveDate;
use reservation::NewReservation;
use serde::{Deserialize, Serialize};
use validator::ValidationError;
use validator_derive::Validate;

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[validate(schema(function = "validate_stay", skip_on_field_errors = true))]
pub struct CreateReservationRequest {
	#[serde(default, alias = "startDate")]
	#[validate(required(message = "start_date is required", code = "start-date"))]
	pub start_date: Option<NaiveDate>,
	#[serde(default, alias = "endDate")]
	#[validate(required(message = "end_date is required", code = "end-date"))]
	pub end_date:   Option<NaiveDate>,
	#[serde(default)]
	#[validate(length(min = 1, message = "name is required", code = "name"))]
	pub name:       String,
	#[serde(default)]
	#[validate(email(message = "a valid email is required", code = "email"))]
	pub email:      String,
	#[serde(default)]
	#[validate(length(min = 1, message = "phone is required", code = "phone"))]
	pub phone:      String,
	#[serde(default)]
	pub message:    Option<String>,
}

/// The stay is inclusive on both ends, a single night is `start == end`
fn validate_stay(
	request: &CreateReservationRequest,
) -> Result<(), ValidationError> {
	if let (Some(start), Some(end)) = (request.start_date, request.end_date)
		&& start > end
	{
		return Err(ValidationError::new("stay-range").with_message(
			Cow::from("start_date must not lie after end_date"),
		));
	}

	Ok(())
}

impl CreateReservationRequest {
	/// Turn a validated request into an insertable reservation
	///
	/// Returns `None` if a date is missing, which validation already rules out
	#[must_use]
	pub fn into_new_reservation(self) -> Option<NewReservation> {
		let message = self.message.filter(|m| !m.trim().is_empty());

		Some(NewReservation::new(
			self.start_date?,
			self.end_date?,
			self.name,
			self.email,
			self.phone,
			message,
		))
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreateReservationResponse {
	pub id: i32,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct DecisionQuery {
	pub token: Option<String>,
}
