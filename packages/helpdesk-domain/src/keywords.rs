use std::collections::HashSet;

pub const DEFAULT_MAX_KEYWORDS: usize = 8;
pub const DEFAULT_CATEGORY: &str = "general";

const STOP_WORDS: &[&str] = &[
	"about", "after", "again", "all", "and", "any", "are", "but", "can", "cannot", "could", "did",
	"does", "doesn", "don", "for", "from", "get", "getting", "had", "has", "have", "help", "how",
	"into", "its", "just", "keeps", "like", "not", "now", "our", "out", "please", "should",
	"some", "that", "the", "their", "them", "then", "there", "this", "trying", "was", "wasn",
	"what", "when", "where", "which", "while", "who", "why", "will", "with", "won", "would",
	"you", "your",
];

// Evaluated in order; the first rule with a matching term wins.
const CATEGORY_RULES: &[(&str, &[&str])] = &[
	("printer", &["printer", "print", "printing", "toner", "scanner", "jam"]),
	("network", &["network", "wifi", "wi-fi", "vpn", "ethernet", "internet", "dns", "eduroam"]),
	("email", &["email", "e-mail", "outlook", "gmail", "inbox", "mailbox", "calendar"]),
	("account", &["password", "login", "log in", "account", "mfa", "duo", "locked", "sso"]),
	("software", &["install", "license", "update", "matlab", "software", "application", "crash"]),
	("hardware", &["laptop", "monitor", "keyboard", "mouse", "battery", "dock", "hardware"]),
];

/// Extracts up to `max` distinct keywords in first-occurrence order.
pub fn extract_keywords(text: &str, max: usize) -> Vec<String> {
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for token in text.to_lowercase().split(|ch: char| !ch.is_alphanumeric()) {
		if out.len() >= max {
			break;
		}
		if token.chars().count() < 3 || STOP_WORDS.contains(&token) {
			continue;
		}
		if token.chars().all(|ch| ch.is_ascii_digit()) {
			continue;
		}
		if seen.insert(token.to_string()) {
			out.push(token.to_string());
		}
	}

	out
}

pub fn categorize(text: &str) -> &'static str {
	let lowered = text.to_lowercase();
	let tokens = lowered.split(|ch: char| !ch.is_alphanumeric()).collect::<HashSet<_>>();

	for (category, terms) in CATEGORY_RULES {
		let hit = terms.iter().any(|term| {
			if term.contains(|ch: char| !ch.is_alphanumeric()) {
				lowered.contains(term)
			} else {
				tokens.contains(term)
			}
		});

		if hit {
			return *category;
		}
	}

	DEFAULT_CATEGORY
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keywords_skip_stop_words_and_duplicates() {
		let keywords = extract_keywords("The printer on floor 3 keeps jamming, printer shows error 42", 8);

		assert_eq!(keywords, vec!["printer", "floor", "jamming", "shows", "error"]);
	}

	#[test]
	fn keywords_respect_limit() {
		assert_eq!(extract_keywords("alpha beta gamma delta", 2), vec!["alpha", "beta"]);
	}

	#[test]
	fn categorize_uses_first_matching_rule() {
		assert_eq!(categorize("Cannot connect to VPN from home"), "network");
		assert_eq!(categorize("Printer jam on floor 3"), "printer");
		assert_eq!(categorize("Forgot my password, need to log in"), "account");
		assert_eq!(categorize("Coffee machine is broken"), DEFAULT_CATEGORY);
	}
}
