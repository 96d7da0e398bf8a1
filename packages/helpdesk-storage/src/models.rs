use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Solution {
	pub solution_id: Uuid,
	pub ticket_id: Option<String>,
	pub problem: String,
	pub solution: String,
	pub category: String,
	pub keywords: Vec<String>,
	pub success_rate: f64,
	pub usage_count: i64,
	/// One of `external_document`, `generated` or `manual`.
	pub source: String,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Feedback {
	pub feedback_id: Uuid,
	pub solution_id: Uuid,
	pub ticket_id: String,
	pub was_helpful: bool,
	pub comment: Option<String>,
	pub submitter: Option<String>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}
