use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::brackets::match_bracket;
use crate::locator::contains_token;

static IMPORT_LINE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?m)^import\s+.*$").unwrap_or_else(|e| panic!("invalid import pattern: {e}"))
});

static IMPORT_BINDING: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"(?m)^import\s+(?P<clause>[^'"]*?)\s*\bfrom\s*['"](?P<specifier>[^'"]+)['"]"#)
		.unwrap_or_else(|e| panic!("invalid import binding pattern: {e}"))
});

/// The import statement that binds `marker` to the stylesheet module.
pub fn marker_import(module_path: &str, marker: &str) -> String {
	format!("import * as {marker} from '{module_path}'")
}

/// Whether a top-level import binds `marker` from exactly `module_path`.
/// Single and double quotes are both accepted.
pub fn has_marker_import(text: &str, module_path: &str, marker: &str) -> bool {
	IMPORT_BINDING.captures_iter(text).any(|captures| {
		captures
			.name("specifier")
			.is_some_and(|specifier| specifier.as_str() == module_path)
			&& captures
				.name("clause")
				.is_some_and(|clause| contains_token(clause.as_str(), marker))
	})
}

/// Make sure `text` imports `marker` from `module_path`.
///
/// The import is placed on the line after the last top-level import, or
/// prepended when the file has none. Returns [`Cow::Borrowed`] when the
/// import already exists.
pub fn ensure_import<'a>(text: &'a str, module_path: &str, marker: &str) -> Cow<'a, str> {
	if has_marker_import(text, module_path, marker) {
		return Cow::Borrowed(text);
	}

	let statement = marker_import(module_path, marker);
	let Some(insert_at) = last_import_end(text) else {
		return Cow::Owned(format!("{statement}\n{text}"));
	};

	let mut buf = String::with_capacity(text.len() + statement.len() + 1);
	buf.push_str(&text[..insert_at]);
	buf.push('\n');
	buf.push_str(&statement);
	buf.push_str(&text[insert_at..]);
	Cow::Owned(buf)
}

/// Byte offset of the end of the last top-level import statement.
///
/// An import whose `{` closes on a later line (`import {\n  a,\n} from 'x'`)
/// ends on the line holding the matching `}`.
fn last_import_end(text: &str) -> Option<usize> {
	let last = IMPORT_LINE.find_iter(text).last()?;
	let Some(brace) = last.as_str().find('{') else {
		return Some(last.end());
	};

	match match_bracket(text, last.start() + brace) {
		Some(close) if close >= last.end() => {
			Some(text[close..].find('\n').map_or(text.len(), |newline| close + newline))
		}
		_ => Some(last.end()),
	}
}
