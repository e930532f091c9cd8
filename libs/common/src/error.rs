//! Library-wide error types and [`From`] impls

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tokio::sync::mpsc;

/// Top level application error, can be converted into a [`Response`]
#[derive(Debug, Error)]
pub enum Error {
	/// An error that should never happen
	#[error("{0}")]
	Infallible(String),
	/// Opaque internal server error
	#[error("internal server error")]
	InternalServerError,
	/// Resource not found
	#[error("not found - {0}")]
	NotFound(String),
	/// Some data in the request was missing or could not be parsed
	#[error("{0}")]
	MissingRequestData(String),
	/// Any error related to deciding on a reservation
	#[error(transparent)]
	ReservationError(#[from] ReservationError),
	/// Resource could not be validated
	#[error("{0}")]
	ValidationError(String),
}

impl Error {
	/// Return a unique identifying code for this error
	///
	/// When modifying this function the error code should only ever increase,
	/// an error code should never be reused once its assigned to avoid
	/// unexpectedly breaking the frontend
	fn code(&self) -> i32 {
		match self {
			Self::Infallible(_) => 1,
			Self::InternalServerError => 2,
			Self::NotFound(_) => 3,
			Self::MissingRequestData(_) => 4,
			Self::ReservationError(e) => {
				match e {
					ReservationError::MissingToken => 5,
					ReservationError::InvalidToken => 6,
					ReservationError::AlreadyDecided(_) => 7,
				}
			},
			Self::ValidationError(_) => 8,
		}
	}

	/// Return additional information about the error
	fn info(&self) -> Option<String> {
		match self {
			Self::NotFound(m)
			| Self::MissingRequestData(m)
			| Self::ValidationError(m)
			| Self::ReservationError(ReservationError::AlreadyDecided(m)) => {
				Some(m.to_owned())
			},
			_ => None,
		}
	}

	/// The HTTP status code this error maps to
	#[must_use]
	pub fn status_code(&self) -> StatusCode {
		match self {
			Self::InternalServerError | Self::Infallible(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			},
			Self::ReservationError(ReservationError::InvalidToken) => {
				StatusCode::FORBIDDEN
			},
			Self::ReservationError(ReservationError::AlreadyDecided(_)) => {
				StatusCode::CONFLICT
			},
			Self::NotFound(_) => StatusCode::NOT_FOUND,
			Self::ReservationError(ReservationError::MissingToken)
			| Self::MissingRequestData(_)
			| Self::ValidationError(_) => StatusCode::BAD_REQUEST,
		}
	}
}

/// Convert an error into a [`Response`]
impl IntoResponse for Error {
	fn into_response(self) -> Response {
		warn!("{self:?}");

		let data = serde_json::json!({
			"message": self.to_string(),
			"code": self.code(),
			"info": self.info(),
		});

		(self.status_code(), axum::Json(data)).into_response()
	}
}

/// Any error related to accepting or declining a reservation
#[derive(Debug, Error)]
pub enum ReservationError {
	#[error("missing token")]
	MissingToken,
	#[error("invalid token")]
	InvalidToken,
	/// The reservation was already accepted or declined, holds the current
	/// status
	#[error("reservation is already {0}")]
	AlreadyDecided(String),
}

/// A list of possible internal errors
///
/// API end users should never see these details
#[derive(Debug, Error)]
pub enum InternalServerError {
	/// Error executing some database operation
	#[error("database error -- {0:?}")]
	DatabaseError(diesel::result::Error),
	/// Error interacting with a database connection
	#[error("database interaction error -- {0:?}")]
	DatabaseInteractionError(deadpool_diesel::InteractError),
	/// Error acquiring database pool connection
	#[error("database pool error -- {0:?}")]
	PoolError(deadpool_diesel::PoolError),
	/// Error running the embedded migrations
	#[error("migration error -- {0}")]
	MigrationError(String),
	/// Malformed email
	#[error("invalid email -- {0:?}")]
	InvalidEmail(lettre::address::AddressError),
	/// Mail queue is full
	#[error("mail queue full -- {0:?}")]
	MailQueueFull(mpsc::error::TrySendError<lettre::Message>),
	/// Generic mailer error
	#[error("mail error -- {0:?}")]
	MailError(lettre::error::Error),
	/// Error rendering an email template
	#[error("template error -- {0:?}")]
	TemplateError(askama::Error),
}

// Map internal server errors to application errors
impl From<InternalServerError> for Error {
	fn from(value: InternalServerError) -> Self {
		error!("internal server error -- {value}");

		Self::InternalServerError
	}
}

/// Map validation errors to application errors
impl From<validator::ValidationErrors> for Error {
	fn from(err: validator::ValidationErrors) -> Self {
		let errs = err.field_errors();
		let mut repr = errs
			.values()
			.map(|v| {
				v.iter()
					.map(ToString::to_string)
					.collect::<Vec<String>>()
					.join("\n")
			})
			.collect::<Vec<String>>();

		repr.sort();

		Self::ValidationError(repr.join("\n"))
	}
}

/// Map malformed or incomplete JSON bodies to application errors
impl From<JsonRejection> for Error {
	fn from(err: JsonRejection) -> Self {
		Self::ValidationError(err.body_text())
	}
}

impl From<QueryRejection> for Error {
	fn from(err: QueryRejection) -> Self {
		Self::MissingRequestData(err.body_text())
	}
}

/// Map database interaction errors to application errors
impl From<deadpool_diesel::InteractError> for Error {
	fn from(value: deadpool_diesel::InteractError) -> Self {
		InternalServerError::DatabaseInteractionError(value).into()
	}
}

/// Map database result errors to application errors.
impl From<diesel::result::Error> for Error {
	fn from(err: diesel::result::Error) -> Self {
		match &err {
			// No rows returned by query that expected at least one
			diesel::result::Error::NotFound => {
				Self::NotFound("no context provided".to_string())
			},
			_ => InternalServerError::DatabaseError(err).into(),
		}
	}
}

impl From<deadpool_diesel::PoolError> for Error {
	fn from(value: deadpool_diesel::PoolError) -> Self {
		InternalServerError::PoolError(value).into()
	}
}

impl From<lettre::address::AddressError> for Error {
	fn from(err: lettre::address::AddressError) -> Self {
		InternalServerError::InvalidEmail(err).into()
	}
}

impl From<mpsc::error::TrySendError<lettre::Message>> for Error {
	fn from(err: mpsc::error::TrySendError<lettre::Message>) -> Self {
		InternalServerError::MailQueueFull(err).into()
	}
}

impl From<lettre::error::Error> for Error {
	fn from(err: lettre::error::Error) -> Self {
		InternalServerError::MailError(err).into()
	}
}

impl From<askama::Error> for Error {
	fn from(err: askama::Error) -> Self {
		InternalServerError::TemplateError(err).into()
	}
}
