use lopdf::Document;

use crate::{Error, Result};

pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const EXPORT_MIME_TYPE: &str = "text/plain";

const NATIVE_MIME_PREFIX: &str = "application/vnd.google-apps.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
	/// Downloaded and decoded page by page.
	Pdf,
	/// Exported by the provider as plain text.
	Native,
	/// Downloaded and decoded as UTF-8.
	Text,
	Unsupported,
}

pub fn classify(mime_type: &str) -> ContentKind {
	if mime_type == PDF_MIME_TYPE {
		ContentKind::Pdf
	} else if mime_type.starts_with(NATIVE_MIME_PREFIX) {
		ContentKind::Native
	} else if mime_type.starts_with("text/") {
		ContentKind::Text
	} else {
		ContentKind::Unsupported
	}
}

/// Concatenates the text of every page in page order, separated by a single space.
pub fn pdf_text(bytes: &[u8]) -> Result<String> {
	let document = Document::load_mem(bytes)?;
	let mut pages = Vec::new();

	for page_number in document.get_pages().into_keys() {
		pages.push(document.extract_text(&[page_number])?);
	}

	Ok(pages.join(" "))
}

pub fn utf8_text(id: &str, bytes: Vec<u8>) -> Result<String> {
	String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8 { id: id.to_string() })
}
