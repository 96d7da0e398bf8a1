//! Lexical relevance of free text against a whitespace-delimited query.

/// Multiplier applied when every query term occurs in the content.
pub const COMPLETENESS_BONUS: f64 = 1.5;

/// Returns true iff every query term occurs in the content, ignoring case.
///
/// An empty query matches everything.
pub fn matches(content: &str, query: &str) -> bool {
	let content = content.to_lowercase();

	query_terms(query).iter().all(|term| content.contains(term.as_str()))
}

/// Sums non-overlapping occurrences of each query term and applies [`COMPLETENESS_BONUS`] when
/// all terms are present.
pub fn score(content: &str, query: &str) -> f64 {
	let content = content.to_lowercase();
	let terms = query_terms(query);
	let mut total = 0_usize;
	let mut complete = true;

	for term in &terms {
		let count = content.matches(term.as_str()).count();

		if count == 0 {
			complete = false;
		}

		total += count;
	}

	let raw = total as f64;

	if complete { raw * COMPLETENESS_BONUS } else { raw }
}

/// Keeps the candidates whose text matches the query, scores them, and returns the best `limit`
/// in descending score order. Equal scores keep their input order.
pub fn rank<T, F>(candidates: Vec<T>, query: &str, limit: usize, text: F) -> Vec<(T, f64)>
where
	F: Fn(&T) -> &str,
{
	let mut scored = candidates
		.into_iter()
		.filter(|candidate| matches(text(candidate), query))
		.map(|candidate| {
			let relevance = score(text(&candidate), query);

			(candidate, relevance)
		})
		.collect::<Vec<_>>();

	scored.sort_by(|a, b| b.1.total_cmp(&a.1));
	scored.truncate(limit);

	scored
}

fn query_terms(query: &str) -> Vec<String> {
	query.to_lowercase().split_whitespace().map(str::to_string).collect()
}
