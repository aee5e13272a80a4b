use std::sync::LazyLock;

use regex::Regex;

use crate::BellagoniaError;
use crate::BellagoniaResult;
use crate::DEFAULT_DIRECTIVE;

static DEFAULT_LOCATOR: LazyLock<CallSiteLocator> = LazyLock::new(|| {
	CallSiteLocator::new(DEFAULT_DIRECTIVE)
		.unwrap_or_else(|e| panic!("default directive token is valid: {e}"))
});

/// Finds every call of an invocation token, e.g. `directive(` or
/// `directive (`.
///
/// Occurrences inside strings and comments are reported too.
#[derive(Debug, Clone)]
pub struct CallSiteLocator {
	pattern: Regex,
}

impl CallSiteLocator {
	pub fn new(token: &str) -> BellagoniaResult<Self> {
		validate_identifier("directive", token)?;
		let pattern = Regex::new(&format!(r"{}\s*\(", regex::escape(token))).map_err(|e| {
			BellagoniaError::InvalidIdentifier {
				role: "directive",
				value: format!("{token} ({e})"),
			}
		})?;

		Ok(Self { pattern })
	}

	/// Start offsets of every call site, in ascending order.
	pub fn locate_all(&self, text: &str) -> Vec<usize> {
		self.pattern
			.find_iter(text)
			.map(|found| found.start())
			.filter(|&start| starts_token(text, start))
			.collect()
	}

	/// Cheap pre-check used before any rewriting is attempted.
	pub fn has_call(&self, text: &str) -> bool {
		self.pattern
			.find_iter(text)
			.any(|found| starts_token(text, found.start()))
	}
}

/// Whether `code` contains at least one `directive(...)` call.
pub fn has_directive_call(code: &str) -> bool {
	DEFAULT_LOCATOR.has_call(code)
}

/// Bytes that can continue a JavaScript identifier.
pub(crate) fn is_ident_byte(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$'
}

fn starts_token(text: &str, start: usize) -> bool {
	start == 0 || !is_ident_byte(text.as_bytes()[start - 1])
}

/// Start offsets of `token` in `haystack` wherever it has no identifier
/// characters on either side.
pub(crate) fn token_starts<'a>(
	haystack: &'a str,
	token: &'a str,
) -> impl Iterator<Item = usize> + 'a {
	let bytes = haystack.as_bytes();
	haystack
		.match_indices(token)
		.map(|(start, _)| start)
		.filter(move |&start| {
			let end = start + token.len();
			let clear_before = start == 0 || !is_ident_byte(bytes[start - 1]);
			let clear_after = end >= bytes.len() || !is_ident_byte(bytes[end]);
			clear_before && clear_after
		})
}

/// Whether `token` occurs in `haystack` as a standalone token.
pub(crate) fn contains_token(haystack: &str, token: &str) -> bool {
	token_starts(haystack, token).next().is_some()
}

pub(crate) fn validate_identifier(role: &'static str, value: &str) -> BellagoniaResult<()> {
	let mut bytes = value.bytes();
	let valid_start = bytes
		.next()
		.is_some_and(|first| first.is_ascii_alphabetic() || first == b'_' || first == b'$');

	if valid_start && bytes.all(is_ident_byte) {
		Ok(())
	} else {
		Err(BellagoniaError::InvalidIdentifier {
			role,
			value: value.to_string(),
		})
	}
}
