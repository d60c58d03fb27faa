pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Unknown ranking strategy: {token:?}.")]
	UnknownStrategy { token: String },
	#[error("Storage error during {operation} on {collection} ({key}): {message}")]
	Storage { operation: &'static str, collection: String, key: String, message: String },
	#[error("Internal error: {message}")]
	Internal { message: String },
}
impl Error {
	pub(crate) fn storage(
		operation: &'static str,
		collection: &str,
		key: impl Into<String>,
		err: devdir_storage::Error,
	) -> Self {
		let key = key.into();

		match err {
			devdir_storage::Error::Conflict(message) => Self::Conflict {
				message: format!("{operation} on {collection} ({key}): {message}"),
			},
			other => Self::Storage {
				operation,
				collection: collection.to_string(),
				key,
				message: other.to_string(),
			},
		}
	}
}

impl From<devdir_domain::password::HashError> for Error {
	fn from(err: devdir_domain::password::HashError) -> Self {
		Self::Internal { message: err.to_string() }
	}
}
