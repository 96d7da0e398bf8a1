pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("Failed to decode PDF: {0}")]
	Pdf(#[from] lopdf::Error),
	#[error("Document {id} is not valid UTF-8.")]
	InvalidUtf8 { id: String },
	#[error("Document {id} has unsupported MIME type {mime_type}.")]
	UnsupportedMimeType { id: String, mime_type: String },
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error("{message}")]
	InvalidResponse { message: String },
}
