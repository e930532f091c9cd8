use std::time::{Duration, Instant};

use lettre::Address;

use crate::common::TestEnv;

impl TestEnv {
	/// Run `f` and assert that it queued no emails
	#[allow(dead_code)]
	pub async fn expect_no_mail<F, T>(&self, f: F) -> T
	where
		F: AsyncFnOnce() -> T,
	{
		let outbox_size = { self.stub_mailbox.mailbox.lock().len() };

		let result = f().await;

		// Wait for up to 1 second or until a condvar notification is received to
		// make sure no queued emails are missed
		let mut mailbox = self.stub_mailbox.mailbox.lock();
		if mailbox.len() == outbox_size {
			self.stub_mailbox
				.signal
				.wait_for(&mut mailbox, Duration::from_secs(1));
		}

		assert_eq!(outbox_size, mailbox.len(), "expected no emails to be sent");

		result
	}

	/// Run `f` and assert that it sent exactly one email to `receivers`
	#[allow(dead_code)]
	pub async fn expect_mail_to<F, T>(&self, receivers: &[&str], f: F) -> T
	where
		F: AsyncFnOnce() -> T,
	{
		let outbox_size = { self.stub_mailbox.mailbox.lock().len() };

		let result = f().await;

		let deadline = Instant::now() + Duration::from_secs(2);

		let mut mailbox = self.stub_mailbox.mailbox.lock();
		while mailbox.len() == outbox_size {
			let wait_res =
				self.stub_mailbox.signal.wait_until(&mut mailbox, deadline);

			assert!(!wait_res.timed_out(), "timed out waiting for email");
		}

		assert_eq!(mailbox.len(), outbox_size + 1, "expected an email to be sent");

		let last_mail = mailbox.last().unwrap();
		let receivers = receivers
			.iter()
			.map(|e| e.parse().unwrap())
			.collect::<Vec<Address>>();

		assert_eq!(last_mail.envelope().to(), receivers, "unexpected receivers");

		result
	}
}
