use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use helpdesk_storage::{models::Feedback, queries};

use crate::{HelpdeskService, Result, solutions};

/// How many of the latest feedback rows contribute comments to [`SolutionStats`].
pub const RECENT_FEEDBACK_LIMIT: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
	pub solution_id: Uuid,
	pub ticket_id: String,
	pub was_helpful: bool,
	pub comment: Option<String>,
	pub submitter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionStats {
	pub solution_id: Uuid,
	pub total_uses: i64,
	pub helpful_count: i64,
	pub success_rate: f64,
	pub recent_feedback: Vec<String>,
}

impl HelpdeskService {
	/// Stores the feedback and folds its outcome into the solution's success rate in one
	/// transaction. Returns `None`, writing nothing, when the solution does not exist.
	pub async fn record_feedback(&self, req: FeedbackRequest) -> Result<Option<Feedback>> {
		let ticket_id = crate::validate_ticket_id(&req.ticket_id)?.to_string();
		let mut tx = self.db.pool.begin().await?;
		let Some(solution) = queries::lock_solution(&mut *tx, req.solution_id).await? else {
			tracing::warn!(solution_id = %req.solution_id, "Feedback for unknown solution ignored.");

			return Ok(None);
		};
		let feedback = Feedback {
			feedback_id: Uuid::new_v4(),
			solution_id: solution.solution_id,
			ticket_id,
			was_helpful: req.was_helpful,
			comment: crate::non_blank(req.comment.as_deref()),
			submitter: crate::non_blank(req.submitter.as_deref()),
			created_at: OffsetDateTime::now_utc(),
		};

		queries::insert_feedback(&mut *tx, &feedback).await?;
		solutions::apply_outcome(&mut tx, solution, req.was_helpful).await?;

		tx.commit().await?;

		tracing::info!(
			feedback_id = %feedback.feedback_id,
			solution_id = %feedback.solution_id,
			was_helpful = feedback.was_helpful,
			"Recorded feedback."
		);

		Ok(Some(feedback))
	}

	pub async fn solution_stats(&self, solution_id: Uuid) -> Result<Option<SolutionStats>> {
		let Some(solution) = queries::fetch_solution(&self.db.pool, solution_id).await? else {
			return Ok(None);
		};
		let (total_uses, helpful_count) =
			queries::feedback_counts(&self.db.pool, solution_id).await?;
		let recent =
			queries::recent_feedback(&self.db.pool, solution_id, RECENT_FEEDBACK_LIMIT).await?;

		Ok(Some(SolutionStats {
			solution_id,
			total_uses,
			helpful_count,
			success_rate: solution.success_rate,
			recent_feedback: recent.into_iter().filter_map(|feedback| feedback.comment).collect(),
		}))
	}
}
