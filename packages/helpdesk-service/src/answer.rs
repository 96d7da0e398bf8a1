use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

use helpdesk_domain::{keywords, source::SolutionSource};
use helpdesk_storage::models::Solution;

use crate::{AddSolutionRequest, DocumentMatch, Error, HelpdeskService, Result};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful IT support assistant. Use the provided \
	documentation and past solutions to inform your responses.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
	pub query: String,
	/// When present, the generated answer is stored as a new solution for this ticket.
	pub ticket_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResponse {
	pub text: String,
	pub solution_id: Option<Uuid>,
}

impl HelpdeskService {
	/// Answers a support query from documents and past solutions.
	///
	/// Never fails: any error is logged and replaced by an apology matching its kind, with no
	/// solution stored.
	pub async fn answer(&self, req: AnswerRequest) -> AnswerResponse {
		match self.try_answer(&req).await {
			Ok(response) => response,
			Err(err) => {
				tracing::error!(error = %err, kind = ?err.kind(), "Failed to answer query.");

				AnswerResponse { text: err.kind().user_message().to_string(), solution_id: None }
			},
		}
	}

	async fn try_answer(&self, req: &AnswerRequest) -> Result<AnswerResponse> {
		let query = req.query.trim();

		if query.is_empty() {
			return Err(Error::InvalidRequest { message: "query must be non-empty.".to_string() });
		}

		let ticket_id = req.ticket_id.as_deref().map(crate::validate_ticket_id).transpose()?;
		let documents = self.search_documents(query).await;
		let solutions = self.search_solutions(query, self.cfg.search.solution_limit).await?;
		let prompt =
			build_prompt(query, &documents, &solutions, self.cfg.search.excerpt_chars as usize);
		let completion_cfg = &self.cfg.providers.completion;

		tracing::debug!(
			documents = documents.len(),
			solutions = solutions.len(),
			"Built answer context."
		);

		self.limiter.wait_if_needed(&completion_cfg.provider_id).await?;

		let text = self
			.providers
			.completion
			.complete(completion_cfg, self.system_prompt(), &prompt)
			.await?;
		let solution_id = match ticket_id {
			Some(ticket_id) => {
				let solution = self
					.add_solution(AddSolutionRequest {
						problem: query.to_string(),
						solution: text.clone(),
						category: Some(keywords::categorize(query).to_string()),
						keywords: Some(keywords::extract_keywords(
							query,
							keywords::DEFAULT_MAX_KEYWORDS,
						)),
						source: SolutionSource::Generated,
						ticket_id: Some(ticket_id.to_string()),
					})
					.await?;

				Some(solution.solution_id)
			},
			None => None,
		};

		Ok(AnswerResponse { text, solution_id })
	}

	fn system_prompt(&self) -> &str {
		self.cfg.assistant.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT)
	}
}

/// Composes the user prompt: the question, then document excerpts, then past solutions.
pub fn build_prompt(
	query: &str,
	documents: &[DocumentMatch],
	solutions: &[Solution],
	excerpt_chars: usize,
) -> String {
	let mut prompt = format!(
		"Based on the following information, please help with this issue:\n\nQuestion: {query}\n"
	);

	if !documents.is_empty() {
		prompt.push_str("\nRelevant Documentation:\n");

		for document in documents {
			prompt.push_str(&format!(
				"\nFrom '{}':\n{}\n",
				document.title,
				excerpt(&document.content, excerpt_chars)
			));
		}
	}
	if !solutions.is_empty() {
		prompt.push_str("\nRelevant Past Solutions:\n");

		for solution in solutions {
			prompt.push_str(&format!(
				"\nSimilar Problem: {}\nSolution: {}\n",
				solution.problem, solution.solution
			));
		}
	}

	prompt.push_str("\nPlease provide a solution based on this information and best practices.");

	prompt
}

/// The first `max` grapheme clusters of `content`, with `...` appended when it was cut.
pub fn excerpt(content: &str, max: usize) -> String {
	let mut graphemes = content.graphemes(true);
	let head = graphemes.by_ref().take(max).collect::<String>();

	if graphemes.next().is_some() { format!("{head}...") } else { head }
}
