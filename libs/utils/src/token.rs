//! Reservation action tokens
//!
//! A token is the only credential needed to accept or decline a reservation,
//! it is mailed to the administrator inside the action links.

use rand::RngCore;
use rand::rngs::OsRng;

/// Amount of random bytes in a token, the hex form is twice as long
pub const TOKEN_BYTES: usize = 20;

/// Generate a new hex encoded token from the operating system CSPRNG
#[must_use]
pub fn generate() -> String {
	let mut bytes = [0u8; TOKEN_BYTES];
	OsRng.fill_bytes(&mut bytes);

	hex::encode(bytes)
}

/// Compare a supplied token against the stored one in constant time
#[must_use]
pub fn matches(expected: &str, supplied: &str) -> bool {
	let expected = expected.as_bytes();
	let supplied = supplied.as_bytes();

	if expected.len() != supplied.len() {
		return false;
	}

	expected.iter().zip(supplied).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
}
