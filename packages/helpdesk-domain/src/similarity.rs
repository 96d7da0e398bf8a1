//! TF-IDF vectors and cosine similarity over a small in-memory corpus.
//!
//! Tokens are lower-cased runs of two or more word characters (alphanumerics or `_`). Inverse
//! document frequency is smoothed as `ln((1 + n) / (1 + df)) + 1` and every document vector is
//! L2-normalized, so cosine similarity reduces to a dot product.

use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarMatch {
	/// Position of the candidate in the input slice.
	pub index: usize,
	pub similarity: f64,
	/// `success_rate * similarity`.
	pub score: f64,
}

pub fn tokenize(text: &str) -> Vec<String> {
	text.to_lowercase()
		.split(|ch: char| !(ch.is_alphanumeric() || ch == '_'))
		.filter(|token| token.chars().count() >= 2)
		.map(str::to_string)
		.collect()
}

/// Fits a vectorizer on `documents` and returns one sparse, L2-normalized vector per document.
pub fn tfidf_vectors(documents: &[&str]) -> Vec<HashMap<String, f64>> {
	let tokenized = documents.iter().map(|doc| tokenize(doc)).collect::<Vec<_>>();
	let mut document_frequency: HashMap<&str, usize> = HashMap::new();

	for tokens in &tokenized {
		let mut seen = tokens.iter().map(String::as_str).collect::<Vec<_>>();

		seen.sort_unstable();
		seen.dedup();

		for token in seen {
			*document_frequency.entry(token).or_default() += 1;
		}
	}

	let n = documents.len() as f64;

	tokenized
		.iter()
		.map(|tokens| {
			let mut vector: HashMap<String, f64> = HashMap::new();

			for token in tokens {
				*vector.entry(token.clone()).or_default() += 1.0;
			}
			for (token, weight) in vector.iter_mut() {
				let df = document_frequency.get(token.as_str()).copied().unwrap_or(0) as f64;

				*weight *= ((1.0 + n) / (1.0 + df)).ln() + 1.0;
			}

			let norm = vector.values().map(|weight| weight * weight).sum::<f64>().sqrt();

			if norm > 0.0 {
				for weight in vector.values_mut() {
					*weight /= norm;
				}
			}

			vector
		})
		.collect()
}

/// Cosine similarity of two L2-normalized sparse vectors.
pub fn cosine(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
	let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };

	small.iter().filter_map(|(token, weight)| large.get(token).map(|other| weight * other)).sum()
}

/// Ranks candidate `(problem_text, success_rate)` pairs against `query`.
///
/// The query is vectorized in the same space as the candidates. Candidates whose similarity is
/// below `threshold` are dropped; the rest are ordered by `success_rate * similarity`, keeping
/// input order on ties.
pub fn rank_similar(query: &str, candidates: &[(&str, f64)], threshold: f64) -> Vec<SimilarMatch> {
	if candidates.is_empty() {
		return Vec::new();
	}

	let mut corpus = candidates.iter().map(|(text, _)| *text).collect::<Vec<_>>();

	corpus.push(query);

	let mut vectors = tfidf_vectors(&corpus);
	let Some(query_vector) = vectors.pop() else { return Vec::new() };
	let mut matches = vectors
		.iter()
		.zip(candidates)
		.enumerate()
		.filter_map(|(index, (vector, (_, success_rate)))| {
			let similarity = cosine(&query_vector, vector);

			(similarity >= threshold).then_some(SimilarMatch {
				index,
				similarity,
				score: success_rate * similarity,
			})
		})
		.collect::<Vec<_>>();

	matches.sort_by(|a, b| b.score.total_cmp(&a.score));

	matches
}

/// Sums each term's TF-IDF weight across `documents`, highest first; ties are ordered by term.
pub fn summed_term_weights(documents: &[&str], limit: usize) -> Vec<(String, f64)> {
	let mut totals: BTreeMap<String, f64> = BTreeMap::new();

	for vector in tfidf_vectors(documents) {
		for (term, weight) in vector {
			*totals.entry(term).or_default() += weight;
		}
	}

	let mut ranked = totals.into_iter().collect::<Vec<_>>();

	ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
	ranked.truncate(limit);

	ranked
}
