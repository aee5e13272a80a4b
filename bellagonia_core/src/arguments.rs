use thiserror::Error;

use crate::brackets::BracketSet;
use crate::brackets::match_bracket;

/// The structural extent of one call's argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentSpan {
	/// Byte offset of the `(` that opens the argument list.
	pub paren_open: usize,
	/// Byte offset of the `)` that closes it.
	pub paren_close: usize,
	/// The third top-level argument, when it is an object literal.
	pub options: Option<OptionsSpan>,
}

impl ArgumentSpan {
	pub fn has_options_arg(&self) -> bool {
		self.options.is_some()
	}

	/// The text between the parentheses.
	pub fn arguments<'a>(&self, text: &'a str) -> &'a str {
		&text[self.paren_open + 1..self.paren_close]
	}

	/// Every top-level argument that is an object literal, in order.
	///
	/// Objects nested inside other arguments (callbacks, nested calls,
	/// arrays) belong to someone else and are not reported.
	pub fn object_arguments(&self, text: &str) -> Vec<OptionsSpan> {
		let bytes = text.as_bytes();
		let mut objects = Vec::new();
		let mut depth: isize = 0;
		let mut at_argument_start = true;
		let mut index = self.paren_open + 1;

		while index < self.paren_close {
			let byte = bytes[index];
			if at_argument_start && !byte.is_ascii_whitespace() {
				at_argument_start = false;
				if byte == b'{' {
					let end = match_bracket(text, index).filter(|&end| end < self.paren_close);
					if let Some(end) = end {
						objects.push(OptionsSpan { start: index, end });
						index = end + 1;
						continue;
					}
				}
			}

			depth += BracketSet::ALL.delta(byte);
			if byte == b',' && depth == 0 {
				at_argument_start = true;
			}
			index += 1;
		}

		objects
	}
}

/// Inclusive byte range of an options object literal, from its `{` to the
/// matching `}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionsSpan {
	pub start: usize,
	pub end: usize,
}

impl OptionsSpan {
	pub fn body<'a>(&self, text: &'a str) -> &'a str {
		&text[self.start..=self.end]
	}
}

/// The argument list of a call site never closes before the end of the
/// text. The call site is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("argument list of the call at byte {offset} is never closed")]
pub struct MalformedArgumentSpan {
	pub offset: usize,
}

/// Parse the argument list of the call starting at `start`.
///
/// Only the call shape `(name, handler, options?)` is understood: the options
/// argument is the third top-level argument, and only when its first
/// non-whitespace character is `{`. Calls with fewer than two top-level
/// commas never have an options argument.
pub fn parse_arguments(text: &str, start: usize) -> Result<ArgumentSpan, MalformedArgumentSpan> {
	let malformed = MalformedArgumentSpan { offset: start };
	let bytes = text.as_bytes();
	let paren_open = text
		.get(start..)
		.and_then(|rest| rest.find('('))
		.map(|relative| start + relative)
		.ok_or(malformed)?;

	let mut depth: isize = 1;
	let mut commas = 0;
	let mut awaiting_third_argument = false;
	let mut options = None;

	for (index, &byte) in bytes.iter().enumerate().skip(paren_open + 1) {
		if awaiting_third_argument && !byte.is_ascii_whitespace() {
			awaiting_third_argument = false;
			if byte == b'{' {
				let end = match_bracket(text, index).ok_or(malformed)?;
				options = Some(OptionsSpan { start: index, end });
			}
		}

		depth += BracketSet::ALL.delta(byte);
		if depth == 0 {
			return Ok(ArgumentSpan {
				paren_open,
				paren_close: index,
				options,
			});
		}

		if byte == b',' && depth == 1 {
			commas += 1;
			awaiting_third_argument = commas == 2;
		}
	}

	Err(malformed)
}
