use sqlx::{Executor, Postgres};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Result,
	models::{Feedback, Solution},
};

const SOLUTION_COLUMNS: &str = "\
solution_id,
	ticket_id,
	problem,
	solution,
	category,
	keywords,
	success_rate,
	usage_count,
	source,
	created_at,
	updated_at";

pub async fn insert_solution<'e, E>(executor: E, solution: &Solution) -> Result<()>
where
	E: Executor<'e, Database = Postgres>,
{
	sqlx::query(
		"\
INSERT INTO solutions (
	solution_id,
	ticket_id,
	problem,
	solution,
	category,
	keywords,
	success_rate,
	usage_count,
	source,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
	)
	.bind(solution.solution_id)
	.bind(solution.ticket_id.as_deref())
	.bind(solution.problem.as_str())
	.bind(solution.solution.as_str())
	.bind(solution.category.as_str())
	.bind(&solution.keywords)
	.bind(solution.success_rate)
	.bind(solution.usage_count)
	.bind(solution.source.as_str())
	.bind(solution.created_at)
	.bind(solution.updated_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn fetch_solution<'e, E>(executor: E, solution_id: Uuid) -> Result<Option<Solution>>
where
	E: Executor<'e, Database = Postgres>,
{
	let sql = format!("SELECT {SOLUTION_COLUMNS}\nFROM solutions\nWHERE solution_id = $1");
	let row = sqlx::query_as::<_, Solution>(&sql).bind(solution_id).fetch_optional(executor).await?;

	Ok(row)
}

/// Reads a solution and holds its row lock until the surrounding transaction ends.
pub async fn lock_solution<'e, E>(executor: E, solution_id: Uuid) -> Result<Option<Solution>>
where
	E: Executor<'e, Database = Postgres>,
{
	let sql =
		format!("SELECT {SOLUTION_COLUMNS}\nFROM solutions\nWHERE solution_id = $1\nFOR UPDATE");
	let row = sqlx::query_as::<_, Solution>(&sql).bind(solution_id).fetch_optional(executor).await?;

	Ok(row)
}

pub async fn update_solution_tally<'e, E>(
	executor: E,
	solution_id: Uuid,
	success_rate: f64,
	usage_count: i64,
	updated_at: OffsetDateTime,
) -> Result<()>
where
	E: Executor<'e, Database = Postgres>,
{
	sqlx::query(
		"\
UPDATE solutions
SET
	success_rate = $1,
	usage_count = $2,
	updated_at = $3
WHERE solution_id = $4",
	)
	.bind(success_rate)
	.bind(usage_count)
	.bind(updated_at)
	.bind(solution_id)
	.execute(executor)
	.await?;

	Ok(())
}

/// Case-insensitive substring search over the problem text and the comma-joined keywords.
pub async fn search_solutions<'e, E>(executor: E, query: &str, limit: i64) -> Result<Vec<Solution>>
where
	E: Executor<'e, Database = Postgres>,
{
	let sql = format!(
		"\
SELECT {SOLUTION_COLUMNS}
FROM solutions
WHERE problem ILIKE $1 ESCAPE '\\'
	OR array_to_string(keywords, ',') ILIKE $1 ESCAPE '\\'
ORDER BY success_rate DESC, created_at ASC, solution_id ASC
LIMIT $2"
	);
	let pattern = format!("%{}%", escape_like(query));
	let rows =
		sqlx::query_as::<_, Solution>(&sql).bind(pattern).bind(limit).fetch_all(executor).await?;

	Ok(rows)
}

/// Every stored solution in store order.
pub async fn list_solutions<'e, E>(executor: E) -> Result<Vec<Solution>>
where
	E: Executor<'e, Database = Postgres>,
{
	let sql =
		format!("SELECT {SOLUTION_COLUMNS}\nFROM solutions\nORDER BY created_at ASC, solution_id ASC");
	let rows = sqlx::query_as::<_, Solution>(&sql).fetch_all(executor).await?;

	Ok(rows)
}

pub async fn insert_feedback<'e, E>(executor: E, feedback: &Feedback) -> Result<()>
where
	E: Executor<'e, Database = Postgres>,
{
	sqlx::query(
		"\
INSERT INTO solution_feedback (
	feedback_id,
	solution_id,
	ticket_id,
	was_helpful,
	comment,
	submitter,
	created_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(feedback.feedback_id)
	.bind(feedback.solution_id)
	.bind(feedback.ticket_id.as_str())
	.bind(feedback.was_helpful)
	.bind(feedback.comment.as_deref())
	.bind(feedback.submitter.as_deref())
	.bind(feedback.created_at)
	.execute(executor)
	.await?;

	Ok(())
}

/// Returns `(total, helpful)` feedback counts for one solution.
pub async fn feedback_counts<'e, E>(executor: E, solution_id: Uuid) -> Result<(i64, i64)>
where
	E: Executor<'e, Database = Postgres>,
{
	let counts: (i64, i64) = sqlx::query_as(
		"\
SELECT
	count(*),
	count(*) FILTER (WHERE was_helpful)
FROM solution_feedback
WHERE solution_id = $1",
	)
	.bind(solution_id)
	.fetch_one(executor)
	.await?;

	Ok(counts)
}

/// The latest `limit` feedback rows of a solution, oldest first.
pub async fn recent_feedback<'e, E>(
	executor: E,
	solution_id: Uuid,
	limit: i64,
) -> Result<Vec<Feedback>>
where
	E: Executor<'e, Database = Postgres>,
{
	let rows = sqlx::query_as::<_, Feedback>(
		"\
SELECT
	feedback_id,
	solution_id,
	ticket_id,
	was_helpful,
	comment,
	submitter,
	created_at
FROM (
	SELECT *
	FROM solution_feedback
	WHERE solution_id = $1
	ORDER BY created_at DESC, feedback_id DESC
	LIMIT $2
) AS latest
ORDER BY created_at ASC, feedback_id ASC",
	)
	.bind(solution_id)
	.bind(limit)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// Escapes `LIKE` metacharacters so the pattern matches the text literally.
pub fn escape_like(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());

	for ch in raw.chars() {
		if matches!(ch, '\\' | '%' | '_') {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}
