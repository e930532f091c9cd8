use std::sync::Arc;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{
	Address,
	AsyncSmtpTransport,
	AsyncTransport,
	Message,
	Tokio1Executor,
};
use parking_lot::{Condvar, Mutex};
use tokio::sync::mpsc;
use url::Url;

use crate::{Config, Error};

mod templates;

pub use templates::NotificationKind;

/// A basic interface to send email messages
#[derive(Clone, Debug)]
pub struct Mailer {
	from:       Address,
	admin:      Address,
	public_url: Url,
	send_queue: mpsc::Sender<Message>,
}

/// A fake mailbox to keep track of mails sent in tests
#[derive(Default)]
pub struct StubMailbox {
	pub mailbox: Mutex<Vec<Message>>,
	pub signal:  Condvar,
}

impl Mailer {
	/// Create a new mailer
	///
	/// # Panics
	/// Panics if a stub mailer is expected but not provided
	#[must_use]
	pub fn new(config: &Config, stub_mailer: Option<Arc<StubMailbox>>) -> Self {
		let (tx, rx) = mpsc::channel(config.email_queue_size);

		if config.email_smtp_server == "stub" {
			let stub_mailer = stub_mailer.expect("MISSING STUB MAILER");

			tokio::spawn(Self::start_stub_sender(rx, stub_mailer));
		} else {
			tokio::spawn(Self::start_smtp_sender(
				rx,
				config.email_address.clone(),
				config.email_smtp_server.clone(),
				config.email_smtp_password.clone(),
			));
		}

		Self {
			from:       config.email_address.clone(),
			admin:      config.admin_email.clone(),
			public_url: config.public_url.clone(),
			send_queue: tx,
		}
	}

	/// Try to build an email [`Message`]
	///
	/// # Errors
	/// Fails if the body cannot be turned into a message
	pub fn try_build_message(
		&self,
		receiver: Mailbox,
		subject: &str,
		content_type: ContentType,
		body: String,
	) -> Result<Message, Error> {
		Ok(Message::builder()
			.from(Mailbox::new(None, self.from.clone()))
			.to(receiver)
			.subject(subject)
			.header(content_type)
			.body(body)?)
	}

	/// Try to queue a message without waiting
	///
	/// # Errors
	/// Fails if the mail queue is full or the sender stopped
	pub fn try_send(&self, message: Message) -> Result<(), Error> {
		Ok(self.send_queue.try_send(message)?)
	}

	/// Start an infinitely looping stub sender thread
	#[instrument(skip_all)]
	async fn start_stub_sender(
		mut rx: mpsc::Receiver<Message>,
		stub_mailer: Arc<StubMailbox>,
	) -> impl Send + 'static {
		while let Some(mail) = rx.recv().await {
			let mail_pretty =
				String::from_utf8_lossy(&mail.formatted()).to_string();

			{
				let mut mailbox = stub_mailer.mailbox.lock();
				mailbox.push(mail);
				stub_mailer.signal.notify_all();
			}

			info!(
				target: "[STUB_MAILER]",
				"sent email:\n{}\n",
				mail_pretty
			);
		}
	}

	/// Start an infinitely looping smtp sender task
	///
	/// A broken smtp setup is logged and never stops the server, queued mails
	/// are then dropped with an error
	#[instrument(skip_all)]
	async fn start_smtp_sender(
		mut rx: mpsc::Receiver<Message>,
		address: Address,
		server: String,
		password: String,
	) -> impl Send + 'static {
		let transport =
			match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&server) {
				Ok(builder) => {
					Some(
						builder
							.credentials(Credentials::new(address.to_string(), password))
							.build(),
					)
				},
				Err(e) => {
					error!("invalid smtp relay {server} -- {e:?}");
					None
				},
			};

		if let Some(transport) = &transport {
			match transport.test_connection().await {
				Ok(true) => info!("connected to smtp relay {server}"),
				Ok(false) => warn!("smtp relay {server} did not respond"),
				Err(e) => error!("smtp connection to {server} failed -- {e:?}"),
			}
		}

		while let Some(mail) = rx.recv().await {
			let Some(transport) = &transport else {
				error!("dropping email, no smtp transport available");
				continue;
			};

			match transport.send(mail).await {
				Ok(res) => info!("sent email: {res:?}"),
				Err(e) => error!("error sending email: {e:?}"),
			}

			tokio::time::sleep(std::time::Duration::from_secs(1)).await;
		}
	}
}
