use argon2::{
	Argon2,
	password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
#[error("Failed to hash password: {message}")]
pub struct HashError {
	message: String,
}

/// Argon2id PHC string for `plain`, salted with fresh random bytes.
pub fn hash_password(plain: &str) -> Result<String, HashError> {
	let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
		.map_err(|err| HashError { message: err.to_string() })?;
	let hash = Argon2::default()
		.hash_password(plain.as_bytes(), &salt)
		.map_err(|err| HashError { message: err.to_string() })?;

	Ok(hash.to_string())
}

pub fn verify_password(plain: &str, hash: &str) -> bool {
	let Ok(parsed) = PasswordHash::new(hash) else {
		return false;
	};

	Argon2::default().verify_password(plain.as_bytes(), &parsed).is_ok()
}

/// Random placeholder password for profiles registered without one.
pub fn generate_password() -> String {
	Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hash_verifies_only_the_original_password() {
		let hash = hash_password("hunter2").expect("hash failed");

		assert!(hash.starts_with("$argon2"));
		assert!(verify_password("hunter2", &hash));
		assert!(!verify_password("hunter3", &hash));
	}

	#[test]
	fn hashes_are_salted() {
		let first = hash_password("same").expect("hash failed");
		let second = hash_password("same").expect("hash failed");

		assert_ne!(first, second);
	}

	#[test]
	fn malformed_hash_never_verifies() {
		assert!(!verify_password("anything", "not-a-phc-string"));
	}

	#[test]
	fn generated_passwords_are_distinct() {
		assert_ne!(generate_password(), generate_password());
		assert_eq!(generate_password().len(), 32);
	}
}
