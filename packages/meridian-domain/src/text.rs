use std::{collections::BTreeSet, sync::OnceLock};

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

const MIN_TOKEN_CHARS: usize = 2;

fn token_pattern() -> &'static Regex {
	static PATTERN: OnceLock<Regex> = OnceLock::new();

	PATTERN.get_or_init(|| Regex::new(r"[\p{L}\p{N}]+").expect("token pattern must compile"))
}

/// Splits free text into the deterministic token set used for posting lists.
///
/// NFKC fold, lowercase, Unicode word bounds, then alphanumeric runs. Tokens
/// shorter than two characters are noise and dropped.
pub fn tokenize(text: &str) -> BTreeSet<String> {
	let folded = text.nfkc().collect::<String>().to_lowercase();
	let mut tokens = BTreeSet::new();

	for word in folded.unicode_words() {
		for run in token_pattern().find_iter(word) {
			if run.as_str().chars().count() >= MIN_TOKEN_CHARS {
				tokens.insert(run.as_str().to_string());
			}
		}
	}

	tokens
}

/// Canonical form for keyword values and query terms: NFKC fold, lowercase,
/// trimmed. Unlike [`tokenize`] the value is kept whole.
pub fn normalize_token(term: &str) -> String {
	term.nfkc().collect::<String>().to_lowercase().trim().to_string()
}
