//! Depth-tracked bracket matching.
//!
//! Every structural boundary the rewriter needs (argument lists, options
//! objects, `assign` blocks, multi-line imports) is found with the same
//! left-to-right scan. The scan only counts depth: it does not check that a
//! `(` is closed by a `)` rather than a `}`, and it has no notion of string
//! literals, template literals or comments. Brackets inside those still
//! move the depth counter.

/// The bracket kinds that take part in a depth-tracked scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketSet {
	open: &'static [u8],
	close: &'static [u8],
}

impl BracketSet {
	/// Parentheses, braces and square brackets.
	pub const ALL: Self = Self {
		open: b"({[",
		close: b")}]",
	};
	/// Curly braces only.
	pub const BRACES: Self = Self {
		open: b"{",
		close: b"}",
	};

	/// Returns `+1` for an opening bracket, `-1` for a closing bracket and
	/// `0` for anything else.
	pub fn delta(&self, byte: u8) -> isize {
		if self.open.contains(&byte) {
			1
		} else if self.close.contains(&byte) {
			-1
		} else {
			0
		}
	}

	pub fn is_open(&self, byte: u8) -> bool {
		self.open.contains(&byte)
	}
}

impl Default for BracketSet {
	fn default() -> Self {
		Self::ALL
	}
}

/// Find the index of the bracket that closes the one at `open_index`,
/// counting every kind in [`BracketSet::ALL`].
///
/// Returns `None` when `open_index` is not an opening bracket or when the
/// text ends before depth returns to zero.
pub fn match_bracket(text: &str, open_index: usize) -> Option<usize> {
	match_bracket_with(text, open_index, BracketSet::ALL)
}

/// Same as [`match_bracket`] with an explicit set of bracket kinds.
pub fn match_bracket_with(text: &str, open_index: usize, brackets: BracketSet) -> Option<usize> {
	let bytes = text.as_bytes();
	if !brackets.is_open(*bytes.get(open_index)?) {
		return None;
	}

	let mut depth: isize = 0;
	for (index, &byte) in bytes.iter().enumerate().skip(open_index) {
		depth += brackets.delta(byte);
		if depth == 0 {
			return Some(index);
		}
	}

	None
}
