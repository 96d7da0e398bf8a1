//! Folder-scoped document collection client speaking the Google Drive v3 REST API.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
	pub id: String,
	pub name: String,
	#[serde(rename = "mimeType")]
	pub mime_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
	#[serde(default)]
	files: Vec<DocumentRef>,
	next_page_token: Option<String>,
}

/// Lists every non-trashed document in the configured folder, following `nextPageToken` until
/// the listing is exhausted.
pub async fn list_documents(
	cfg: &helpdesk_config::DocumentProviderConfig,
) -> Result<Vec<DocumentRef>> {
	let client = client(cfg)?;
	let url = files_url(cfg, &[])?;
	let folder_query = folder_query(&cfg.folder_id);
	let page_size = cfg.page_size.to_string();
	let mut documents = Vec::new();
	let mut page_token: Option<String> = None;

	loop {
		let mut params = vec![
			("q", folder_query.as_str()),
			("spaces", "drive"),
			("fields", LIST_FIELDS),
			("pageSize", page_size.as_str()),
		];

		if let Some(token) = page_token.as_deref() {
			params.push(("pageToken", token));
		}

		let page: FileList = authorized(client.get(url.clone()), cfg)?
			.query(&params)
			.send()
			.await?
			.error_for_status()?
			.json()
			.await?;

		documents.extend(page.files);

		match page.next_page_token.filter(|token| !token.is_empty()) {
			Some(token) if page_token.as_deref() != Some(token.as_str()) => page_token = Some(token),
			Some(_) => {
				tracing::warn!(folder_id = %cfg.folder_id, "Document listing repeated a page token.");

				break;
			},
			None => break,
		}
	}

	Ok(documents)
}

/// Fetches the metadata of one document.
pub async fn get_document(
	cfg: &helpdesk_config::DocumentProviderConfig,
	id: &str,
) -> Result<DocumentRef> {
	let client = client(cfg)?;
	let url = files_url(cfg, &[id])?;
	let document = authorized(client.get(url), cfg)?
		.query(&[("fields", "id, name, mimeType")])
		.send()
		.await?
		.error_for_status()?
		.json()
		.await?;

	Ok(document)
}

/// Downloads the raw bytes of a stored (non-native) document.
pub async fn get_content(
	cfg: &helpdesk_config::DocumentProviderConfig,
	id: &str,
) -> Result<Vec<u8>> {
	let client = client(cfg)?;
	let url = files_url(cfg, &[id])?;
	let bytes = authorized(client.get(url), cfg)?
		.query(&[("alt", "media")])
		.send()
		.await?
		.error_for_status()?
		.bytes()
		.await?;

	Ok(bytes.to_vec())
}

/// Exports a native document, e.g. a Google Doc, in the requested MIME type.
pub async fn export(
	cfg: &helpdesk_config::DocumentProviderConfig,
	id: &str,
	mime_type: &str,
) -> Result<Vec<u8>> {
	let client = client(cfg)?;
	let url = files_url(cfg, &[id, "export"])?;
	let bytes = authorized(client.get(url), cfg)?
		.query(&[("mimeType", mime_type)])
		.send()
		.await?
		.error_for_status()?
		.bytes()
		.await?;

	Ok(bytes.to_vec())
}

fn client(cfg: &helpdesk_config::DocumentProviderConfig) -> Result<Client> {
	Ok(Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?)
}

fn authorized(
	builder: RequestBuilder,
	cfg: &helpdesk_config::DocumentProviderConfig,
) -> Result<RequestBuilder> {
	Ok(builder.headers(crate::auth_headers(&cfg.access_token, &cfg.default_headers)?))
}

fn folder_query(folder_id: &str) -> String {
	let escaped = folder_id.replace('\\', "\\\\").replace('\'', "\\'");

	format!("'{escaped}' in parents and trashed=false")
}

/// `{api_base}/files` followed by `segments`, each escaped as a single path segment.
fn files_url(cfg: &helpdesk_config::DocumentProviderConfig, segments: &[&str]) -> Result<Url> {
	let mut url = Url::parse(&cfg.api_base).map_err(|err| Error::InvalidConfig {
		message: format!("providers.documents.api_base is not a valid URL: {err}."),
	})?;

	url.path_segments_mut()
		.map_err(|()| Error::InvalidConfig {
			message: "providers.documents.api_base cannot carry a path.".to_string(),
		})?
		.pop_if_empty()
		.push("files")
		.extend(segments);

	Ok(url)
}
