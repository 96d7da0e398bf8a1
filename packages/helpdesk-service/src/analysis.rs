use helpdesk_domain::analysis::{self, SolutionAnalysis, SolutionRecord};
use helpdesk_storage::queries;

use crate::{HelpdeskService, Result};

impl HelpdeskService {
	/// Effectiveness report over the whole knowledge base.
	pub async fn analyze_solutions(&self) -> Result<SolutionAnalysis> {
		let solutions = queries::list_solutions(&self.db.pool).await?;
		let records = solutions
			.iter()
			.map(|solution| SolutionRecord {
				category: &solution.category,
				solution: &solution.solution,
				success_rate: solution.success_rate,
			})
			.collect::<Vec<_>>();

		Ok(analysis::analyze(&records))
	}
}
