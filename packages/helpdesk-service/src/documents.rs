use serde::{Deserialize, Serialize};

use helpdesk_domain::relevance;
use helpdesk_providers::{
	documents::DocumentRef,
	extract::{self, ContentKind},
};

use crate::{HelpdeskService, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMatch {
	pub id: String,
	pub title: String,
	pub content: String,
	pub relevance: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshReport {
	pub refreshed: Vec<String>,
	pub failed: Vec<String>,
}

impl HelpdeskService {
	/// Ranks the collection's documents against `query` and returns the best matches.
	///
	/// Never fails: a listing failure yields no documents and a document that cannot be
	/// extracted is skipped.
	pub async fn search_documents(&self, query: &str) -> Vec<DocumentMatch> {
		let cfg = &self.cfg.providers.documents;
		let listed = match self.providers.documents.list_documents(cfg).await {
			Ok(listed) => listed,
			Err(err) => {
				tracing::error!(error = %err, folder_id = %cfg.folder_id, "Failed to list documents.");

				return Vec::new();
			},
		};
		let mut candidates = Vec::with_capacity(listed.len());

		for document in listed {
			match self.document_text(&document).await {
				Ok(content) => candidates.push((document, content)),
				Err(err) => {
					tracing::warn!(
						error = %err,
						document_id = %document.id,
						name = %document.name,
						"Skipping document that could not be extracted."
					);
				},
			}
		}

		let limit = self.cfg.search.documents_limit as usize;

		relevance::rank(candidates, query, limit, |(_, content)| content.as_str())
			.into_iter()
			.map(|((document, content), relevance)| DocumentMatch {
				id: document.id,
				title: document.name,
				content,
				relevance,
			})
			.collect()
	}

	/// Drops the cached text of the given documents, or of the whole collection, and extracts
	/// them again.
	pub async fn refresh_documents(&self, ids: Option<Vec<String>>) -> Result<RefreshReport> {
		let cfg = &self.cfg.providers.documents;
		let mut report = RefreshReport::default();
		let documents = match ids {
			Some(ids) => {
				let mut documents = Vec::with_capacity(ids.len());

				for id in ids {
					self.cache.clear(Some(&id)).await;

					match self.providers.documents.get_document(cfg, &id).await {
						Ok(document) => documents.push(document),
						Err(err) => {
							tracing::warn!(error = %err, document_id = %id, "Failed to look up document.");
							report.failed.push(id);
						},
					}
				}

				documents
			},
			None => self.providers.documents.list_documents(cfg).await?,
		};

		for document in documents {
			self.cache.clear(Some(&document.id)).await;

			match self.extract_document(&document).await {
				Ok(content) => {
					self.cache.set(&document.id, &content).await;
					report.refreshed.push(document.id);
				},
				Err(err) => {
					tracing::warn!(error = %err, document_id = %document.id, "Failed to refresh document.");
					report.failed.push(document.id);
				},
			}
		}

		tracing::info!(
			refreshed = report.refreshed.len(),
			failed = report.failed.len(),
			"Refreshed document cache."
		);

		Ok(report)
	}

	async fn document_text(&self, document: &DocumentRef) -> Result<String> {
		if let Some(content) = self.cache.get(&document.id).await {
			return Ok(content);
		}

		let content = self.extract_document(document).await?;

		self.cache.set(&document.id, &content).await;

		Ok(content)
	}

	async fn extract_document(&self, document: &DocumentRef) -> Result<String> {
		let cfg = &self.cfg.providers.documents;
		let provider = &self.providers.documents;
		let text = match extract::classify(&document.mime_type) {
			ContentKind::Pdf => extract::pdf_text(&provider.get_content(cfg, &document.id).await?)?,
			ContentKind::Native => {
				let bytes = provider.export(cfg, &document.id, extract::EXPORT_MIME_TYPE).await?;

				extract::utf8_text(&document.id, bytes)?
			},
			ContentKind::Text => {
				let bytes = provider.get_content(cfg, &document.id).await?;

				extract::utf8_text(&document.id, bytes)?
			},
			ContentKind::Unsupported =>
				return Err(helpdesk_providers::Error::UnsupportedMimeType {
					id: document.id.clone(),
					mime_type: document.mime_type.clone(),
				}
				.into()),
		};

		Ok(text)
	}
}
