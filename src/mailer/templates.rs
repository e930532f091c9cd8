use askama::Template;
use chrono::NaiveDate;
use common::Error;
use lettre::Message;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use reservation::Reservation;
use url::Url;

use crate::mailer::Mailer;

/// The kind of notification sent for a reservation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
	/// A new request, sent to the administrator
	Created,
	/// Sent to the guest once the administrator accepted
	Accepted,
	/// Sent to the guest once the administrator declined
	Declined,
}

#[derive(Clone, Debug, Template)]
#[template(path = "reservation_created.html")]
struct ReservationCreatedTemplate<'a> {
	name:        &'a str,
	email:       &'a str,
	phone:       &'a str,
	message:     &'a str,
	start_date:  NaiveDate,
	end_date:    NaiveDate,
	accept_url:  Url,
	decline_url: Url,
}

#[derive(Clone, Debug, Template)]
#[template(path = "reservation_accepted.txt")]
struct ReservationAcceptedTemplate<'a> {
	name:       &'a str,
	start_date: NaiveDate,
	end_date:   NaiveDate,
}

#[derive(Clone, Debug, Template)]
#[template(path = "reservation_declined.txt")]
struct ReservationDeclinedTemplate<'a> {
	name:       &'a str,
	start_date: NaiveDate,
	end_date:   NaiveDate,
}

impl Mailer {
	/// Queue a notification about a reservation
	///
	/// Sending is fire-and-forget: failures are logged and never bubble up to
	/// the caller, the reservation itself is authoritative.
	#[instrument(skip(self, reservation), fields(reservation = reservation.id))]
	pub fn notify(&self, kind: NotificationKind, reservation: &Reservation) {
		let result = self
			.build_notification(kind, reservation)
			.and_then(|mail| self.try_send(mail));

		match result {
			Ok(()) => {
				info!("queued {kind:?} email for reservation {}", reservation.id);
			},
			Err(e) => {
				error!(
					"could not queue {kind:?} email for reservation {} -- {e:?}",
					reservation.id
				);
			},
		}
	}

	/// Render the email for a notification
	///
	/// # Errors
	/// Fails if the guest email is malformed or rendering fails
	pub fn build_notification(
		&self,
		kind: NotificationKind,
		reservation: &Reservation,
	) -> Result<Message, Error> {
		match kind {
			NotificationKind::Created => {
				let body = ReservationCreatedTemplate {
					name:        &reservation.name,
					email:       &reservation.email,
					phone:       &reservation.phone,
					message:     reservation.message.as_deref().unwrap_or("-"),
					start_date:  reservation.start_date,
					end_date:    reservation.end_date,
					accept_url:  self.action_url(reservation, "accept")?,
					decline_url: self.action_url(reservation, "decline")?,
				};

				let subject =
					format!("New reservation request from {}", reservation.name);

				self.try_build_message(
					Mailbox::new(None, self.admin.clone()),
					&subject,
					ContentType::TEXT_HTML,
					body.render()?,
				)
			},
			NotificationKind::Accepted => {
				let body = ReservationAcceptedTemplate {
					name:       &reservation.name,
					start_date: reservation.start_date,
					end_date:   reservation.end_date,
				};

				self.try_build_message(
					reservation.email.parse()?,
					"Your reservation was accepted",
					ContentType::TEXT_PLAIN,
					body.render()?,
				)
			},
			NotificationKind::Declined => {
				let body = ReservationDeclinedTemplate {
					name:       &reservation.name,
					start_date: reservation.start_date,
					end_date:   reservation.end_date,
				};

				self.try_build_message(
					reservation.email.parse()?,
					"Your reservation was declined",
					ContentType::TEXT_PLAIN,
					body.render()?,
				)
			},
		}
	}

	/// Build `{public_url}/reservations/{id}/{action}?token={token}`
	fn action_url(
		&self,
		reservation: &Reservation,
		action: &str,
	) -> Result<Url, Error> {
		let id = reservation.id.to_string();
		let mut url = self.public_url.clone();

		url.path_segments_mut()
			.map_err(|()| {
				Error::Infallible(format!(
					"public url {} cannot be a base",
					self.public_url
				))
			})?
			.pop_if_empty()
			.extend(["reservations", id.as_str(), action]);

		url.query_pairs_mut().append_pair("token", &reservation.token);

		Ok(url)
	}
}

#[cfg(test)]
mod tests {
	use chrono::NaiveDate;
	use db::ReservationStatus;
	use tokio::sync::mpsc;

	use super::*;

	fn mailer(public_url: &str) -> Mailer {
		let (send_queue, _) = mpsc::channel(1);

		Mailer {
			from: "noreply@chata.example".parse().unwrap(),
			admin: "admin@chata.example".parse().unwrap(),
			public_url: public_url.parse().unwrap(),
			send_queue,
		}
	}

	fn reservation() -> Reservation {
		let start_date = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();

		Reservation {
			id: 7,
			start_date,
			end_date: NaiveDate::from_ymd_opt(2025, 7, 12).unwrap(),
			name: "Jan".to_string(),
			email: "jan@example.com".to_string(),
			phone: "+420 123 456 789".to_string(),
			message: None,
			status: ReservationStatus::Pending,
			token: "0badc0ffee0badc0ffee0badc0ffee0badc0ffee".to_string(),
			created_at: start_date.and_hms_opt(12, 0, 0).unwrap(),
			decided_at: None,
		}
	}

	#[test]
	fn action_url_appends_to_base_path() {
		let expected = "https://chata.example/api/reservations/7/accept?token=\
		                0badc0ffee0badc0ffee0badc0ffee0badc0ffee";

		for base in ["https://chata.example/api", "https://chata.example/api/"] {
			let url = mailer(base).action_url(&reservation(), "accept").unwrap();

			assert_eq!(url.as_str(), expected);
		}
	}

	#[test]
	fn created_goes_to_admin() {
		let mail = mailer("https://chata.example/")
			.build_notification(NotificationKind::Created, &reservation())
			.unwrap();

		let to = mail.envelope().to();

		assert_eq!(to.len(), 1);
		assert_eq!(to[0].to_string(), "admin@chata.example");
	}

	#[test]
	fn decisions_go_to_guest() {
		let mailer = mailer("https://chata.example/");

		for kind in [NotificationKind::Accepted, NotificationKind::Declined] {
			let mail = mailer.build_notification(kind, &reservation()).unwrap();

			assert_eq!(mail.envelope().to()[0].to_string(), "jan@example.com");
		}
	}

	#[test]
	fn decision_with_malformed_guest_email() {
		let mut reservation = reservation();
		reservation.email = "nobody".to_string();

		let result = mailer("https://chata.example/")
			.build_notification(NotificationKind::Accepted, &reservation);

		assert!(result.is_err());
	}
}
