use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use helpdesk_domain::{
	keywords,
	similarity::{self, SimilarMatch},
	source::SolutionSource,
	tally::SuccessTally,
};
use helpdesk_storage::{models::Solution, queries};

use crate::{Error, HelpdeskService, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddSolutionRequest {
	pub problem: String,
	pub solution: String,
	/// Derived from the problem text when absent.
	pub category: Option<String>,
	/// Derived from the problem text when absent.
	pub keywords: Option<Vec<String>>,
	#[serde(default = "default_source")]
	pub source: SolutionSource,
	pub ticket_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarSolution {
	pub solution: Solution,
	pub similarity: f64,
	/// `success_rate * similarity`, the ordering key.
	pub score: f64,
}

impl HelpdeskService {
	pub async fn add_solution(&self, req: AddSolutionRequest) -> Result<Solution> {
		let problem = req.problem.trim();
		let text = req.solution.trim();

		if problem.is_empty() || text.is_empty() {
			return Err(Error::InvalidRequest {
				message: "problem and solution must be non-empty.".to_string(),
			});
		}

		let ticket_id =
			req.ticket_id.as_deref().map(crate::validate_ticket_id).transpose()?.map(str::to_string);
		let category = crate::non_blank(req.category.as_deref())
			.unwrap_or_else(|| keywords::categorize(problem).to_string());
		let keywords = match req.keywords {
			Some(keywords) => keywords
				.iter()
				.map(|keyword| keyword.trim().to_lowercase())
				.filter(|keyword| !keyword.is_empty())
				.collect(),
			None => keywords::extract_keywords(problem, keywords::DEFAULT_MAX_KEYWORDS),
		};
		let now = OffsetDateTime::now_utc();
		let solution = Solution {
			solution_id: Uuid::new_v4(),
			ticket_id,
			problem: problem.to_string(),
			solution: text.to_string(),
			category,
			keywords,
			success_rate: 0.0,
			usage_count: 0,
			source: req.source.to_string(),
			created_at: now,
			updated_at: now,
		};

		queries::insert_solution(&self.db.pool, &solution).await?;

		tracing::info!(
			solution_id = %solution.solution_id,
			category = %solution.category,
			source = %solution.source,
			"Stored solution."
		);

		Ok(solution)
	}

	pub async fn get_solution(&self, solution_id: Uuid) -> Result<Option<Solution>> {
		Ok(queries::fetch_solution(&self.db.pool, solution_id).await?)
	}

	/// Substring search over problem text and keywords, most successful first.
	pub async fn search_solutions(&self, query: &str, limit: u32) -> Result<Vec<Solution>> {
		if limit == 0 {
			return Ok(Vec::new());
		}

		Ok(queries::search_solutions(&self.db.pool, query, i64::from(limit)).await?)
	}

	/// Stored solutions whose problem text is TF-IDF similar to `problem`, ordered by
	/// `success_rate * similarity`.
	pub async fn similar_solutions(
		&self,
		problem: &str,
		threshold: Option<f64>,
	) -> Result<Vec<SimilarSolution>> {
		let threshold = threshold.unwrap_or(self.cfg.search.similarity_threshold);

		if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
			return Err(Error::InvalidRequest {
				message: "threshold must be a finite number in the range 0.0-1.0.".to_string(),
			});
		}

		let stored = queries::list_solutions(&self.db.pool).await?;
		let candidates = stored
			.iter()
			.map(|solution| (solution.problem.as_str(), solution.success_rate))
			.collect::<Vec<_>>();
		let ranked = similarity::rank_similar(problem, &candidates, threshold);
		let mut slots = stored.into_iter().map(Some).collect::<Vec<_>>();

		Ok(ranked
			.into_iter()
			.filter_map(|SimilarMatch { index, similarity, score }| {
				slots[index].take().map(|solution| SimilarSolution { solution, similarity, score })
			})
			.collect())
	}

	/// Folds one outcome into the solution's running success rate. Returns `None` when the
	/// solution does not exist.
	pub async fn update_success(
		&self,
		solution_id: Uuid,
		was_successful: bool,
	) -> Result<Option<Solution>> {
		let mut tx = self.db.pool.begin().await?;
		let Some(solution) = queries::lock_solution(&mut *tx, solution_id).await? else {
			return Ok(None);
		};
		let updated = apply_outcome(&mut tx, solution, was_successful).await?;

		tx.commit().await?;

		Ok(Some(updated))
	}
}

/// Applies one outcome to a row the caller has already locked.
pub(crate) async fn apply_outcome(
	conn: &mut PgConnection,
	mut solution: Solution,
	was_successful: bool,
) -> Result<Solution> {
	let tally = SuccessTally::new(solution.success_rate, solution.usage_count).record(was_successful);
	let now = OffsetDateTime::now_utc();

	queries::update_solution_tally(
		&mut *conn,
		solution.solution_id,
		tally.success_rate,
		tally.usage_count,
		now,
	)
	.await?;

	tracing::info!(
		solution_id = %solution.solution_id,
		was_successful,
		success_rate = tally.success_rate,
		usage_count = tally.usage_count,
		"Updated solution success rate."
	);

	solution.success_rate = tally.success_rate;
	solution.usage_count = tally.usage_count;
	solution.updated_at = now;

	Ok(solution)
}

fn default_source() -> SolutionSource {
	SolutionSource::Manual
}
