pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to parse HELPDESK_PG_DSN: {0}.")]
	InvalidDsn(sqlx::Error),

	#[error("Failed to connect to an admin database: {0}.")]
	AdminConnect(String),

	#[error("Failed to create test database {name}: {source}.")]
	Create { name: String, source: sqlx::Error },

	#[error("Failed to drop test database {name}: {source}.")]
	Drop { name: String, source: sqlx::Error },

	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
}
