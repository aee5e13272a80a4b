use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::arguments::ArgumentSpan;
use crate::brackets::BracketSet;
use crate::brackets::match_bracket;
use crate::locator::is_ident_byte;
use crate::locator::token_starts;

static ASSIGN_KEY: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"assign\s*:\s*\{").unwrap_or_else(|e| panic!("invalid assign pattern: {e}"))
});

/// A single replacement of a byte range in the working text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
	pub range: Range<usize>,
	pub replacement: String,
}

impl Splice {
	/// Produce a new text with the range replaced.
	pub fn apply(&self, text: &str) -> String {
		let Range { start, end } = self.range;
		let mut buf = String::with_capacity(text.len() - (end - start) + self.replacement.len());
		buf.push_str(&text[..start]);
		buf.push_str(&self.replacement);
		buf.push_str(&text[end..]);
		buf
	}
}

/// The options object added to calls that have none.
pub fn synthesized_options(marker: &str) -> String {
	format!("{{ assign: {{ {marker} }} }}")
}

/// Plan the edit that wires `marker` into the call described by `span`.
///
/// Every planned range starts at or after `span.paren_open`.
pub fn plan_injection(text: &str, span: &ArgumentSpan, marker: &str) -> Splice {
	if let Some(options) = span.options {
		return Splice {
			range: options.start..options.end + 1,
			replacement: inject_marker(options.body(text), marker),
		};
	}

	let content = span.arguments(text).trim_end();
	let options = synthesized_options(marker);

	if content.trim_start().is_empty() {
		return Splice {
			range: span.paren_open + 1..span.paren_close,
			replacement: options,
		};
	}

	let insert_at = span.paren_open + 1 + content.len();
	let replacement = if content.ends_with(',') {
		format!(" {options}")
	} else {
		format!(", {options}")
	};

	Splice {
		range: insert_at..insert_at,
		replacement,
	}
}

/// Add `marker` to the `assign` block of an options object, creating the
/// block when the object has none.
///
/// Only an `assign` key that belongs to the object itself is edited; keys
/// inside nested values are left alone. An `assign` brace that never closes
/// falls back to appending a fresh clause. Bodies produced by
/// [`parse_arguments`](crate::arguments::parse_arguments) are always
/// balanced, so that fallback is only reachable through direct calls.
pub fn inject_marker(options_body: &str, marker: &str) -> String {
	if let Some(&open) = own_assign_opens(options_body).first() {
		if let Some(close) = match_bracket(options_body, open) {
			let inner = options_body[open + 1..close].trim();
			let separator = if inner.is_empty() || inner.ends_with(',') {
				""
			} else {
				", "
			};

			return format!(
				"{} {inner}{separator}{marker} {}",
				&options_body[..=open],
				&options_body[close..]
			);
		}

		tracing::debug!(
			offset = open,
			"unmatched assign block, appending a new assign clause"
		);
	}

	append_assign_clause(options_body, marker)
}

fn append_assign_clause(options_body: &str, marker: &str) -> String {
	let Some(closing) = options_body.rfind('}') else {
		return options_body.to_string();
	};
	if closing == 0 {
		return options_body.to_string();
	}

	let before = options_body[..closing].trim_end();
	let separator = if before.len() > 1 && !before.ends_with(',') {
		", "
	} else {
		" "
	};

	format!(
		"{before}{separator}assign: {{ {marker} }} }}{}",
		&options_body[closing + 1..]
	)
}

/// Whether the call already carries `marker` in the `assign` block of one of
/// its own object-literal arguments.
///
/// Nested calls inside the arguments are rewritten on their own, so their
/// `assign` blocks never count for the enclosing call.
pub fn is_already_marked(text: &str, span: &ArgumentSpan, marker: &str) -> bool {
	span.object_arguments(text)
		.iter()
		.any(|object| assign_contains_marker(object.body(text), marker))
}

/// Whether an `assign: { ... }` block that belongs to the object literal
/// `body` lists `marker` as one of its direct entries.
///
/// The marker appearing under a sibling key, deeper inside the `assign`
/// block, or in the `assign` block of a nested object does not count.
pub fn assign_contains_marker(body: &str, marker: &str) -> bool {
	own_assign_opens(body).into_iter().any(|open| {
		match_bracket(body, open)
			.is_some_and(|close| has_direct_entry(&body[open..=close], marker))
	})
}

/// Offsets of the `{` opening each `assign:` block that sits directly inside
/// the object literal `body`.
fn own_assign_opens(body: &str) -> Vec<usize> {
	let bytes = body.as_bytes();
	ASSIGN_KEY
		.find_iter(body)
		.filter(|found| {
			let start = found.start();
			(start == 0 || !is_ident_byte(bytes[start - 1])) && depth_at(bytes, start) == 1
		})
		.map(|found| found.end() - 1)
		.collect()
}

/// Whether `marker` occurs as a standalone token one level inside `block`.
fn has_direct_entry(block: &str, marker: &str) -> bool {
	let bytes = block.as_bytes();
	token_starts(block, marker).any(|start| depth_at(bytes, start) == 1)
}

fn depth_at(bytes: &[u8], index: usize) -> isize {
	bytes[..index]
		.iter()
		.map(|&byte| BracketSet::ALL.delta(byte))
		.sum()
}
