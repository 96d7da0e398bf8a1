use std::collections::BTreeMap;

use serde::Serialize;

use crate::similarity;

/// Solutions strictly above this success rate count as successful.
pub const SUCCESS_THRESHOLD: f64 = 0.8;
pub const COMMON_TERMS_LIMIT: usize = 20;

/// The slice of a stored solution the analysis needs.
#[derive(Debug, Clone, Copy)]
pub struct SolutionRecord<'a> {
	pub category: &'a str,
	pub solution: &'a str,
	pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
	pub category: String,
	pub avg_success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermWeight {
	pub term: String,
	pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolutionAnalysis {
	pub total_solutions: usize,
	pub successful_solutions: usize,
	pub avg_success_rate: f64,
	pub top_categories: Vec<CategoryScore>,
	pub common_terms: Vec<TermWeight>,
}

pub fn analyze(records: &[SolutionRecord<'_>]) -> SolutionAnalysis {
	let total_solutions = records.len();
	let successful = records
		.iter()
		.filter(|record| record.success_rate > SUCCESS_THRESHOLD)
		.map(|record| record.solution)
		.collect::<Vec<_>>();
	let avg_success_rate = if records.is_empty() {
		0.0
	} else {
		records.iter().map(|record| record.success_rate).sum::<f64>() / total_solutions as f64
	};
	let mut by_category: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

	for record in records {
		let entry = by_category.entry(record.category).or_default();

		entry.0 += record.success_rate;
		entry.1 += 1;
	}

	let mut top_categories = by_category
		.into_iter()
		.map(|(category, (sum, count))| CategoryScore {
			category: category.to_string(),
			avg_success_rate: sum / count as f64,
		})
		.collect::<Vec<_>>();

	top_categories.sort_by(|a, b| b.avg_success_rate.total_cmp(&a.avg_success_rate));

	let common_terms = similarity::summed_term_weights(&successful, COMMON_TERMS_LIMIT)
		.into_iter()
		.map(|(term, weight)| TermWeight { term, weight })
		.collect();

	SolutionAnalysis {
		total_solutions,
		successful_solutions: successful.len(),
		avg_success_rate,
		top_categories,
		common_terms,
	}
}
