pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Rate limited: {message}")]
	RateLimited { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl Error {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
			Self::NotFound { .. } => ErrorKind::NotFound,
			Self::Provider { .. } => ErrorKind::Provider,
			Self::RateLimited { .. } => ErrorKind::RateLimited,
			Self::Storage { .. } => ErrorKind::Storage,
		}
	}
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
impl From<helpdesk_storage::Error> for Error {
	fn from(err: helpdesk_storage::Error) -> Self {
		match err {
			helpdesk_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			helpdesk_storage::Error::NotFound(message) => Self::NotFound { message },
			other => Self::Storage { message: other.to_string() },
		}
	}
}
impl From<helpdesk_providers::Error> for Error {
	fn from(err: helpdesk_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	InvalidRequest,
	NotFound,
	Provider,
	RateLimited,
	Storage,
}
impl ErrorKind {
	/// Stable machine-readable code.
	pub const fn code(self) -> &'static str {
		match self {
			Self::InvalidRequest => "INVALID_REQUEST",
			Self::NotFound => "NOT_FOUND",
			Self::Provider => "PROVIDER_UNAVAILABLE",
			Self::RateLimited => "RATE_LIMITED",
			Self::Storage => "STORAGE_ERROR",
		}
	}

	/// Apology shown to the person asking instead of an answer.
	pub const fn user_message(self) -> &'static str {
		match self {
			Self::InvalidRequest =>
				"Sorry, I couldn't understand that request. Please describe the problem and, if \
				 you have one, include a numeric ticket ID.",
			Self::NotFound => "Sorry, I couldn't find what you were looking for.",
			Self::Provider =>
				"Sorry, the answer service is unavailable right now. Please try again in a few \
				 minutes.",
			Self::RateLimited =>
				"Sorry, I'm receiving too many requests right now. Please try again shortly.",
			Self::Storage =>
				"Sorry, I couldn't reach the solution knowledge base. Please try again later.",
		}
	}
}
