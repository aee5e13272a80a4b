use globset::GlobBuilder;
use globset::GlobSet;
use globset::GlobSetBuilder;

use crate::BellagoniaError;
use crate::BellagoniaResult;

/// Default location of directive sources.
pub const DEFAULT_DIRECTIVE_SOURCES: [&str; 1] = ["src/directives/**/*.ts"];

/// Compiled directive-source patterns deciding which files are rewritten.
///
/// `*` matches within one path segment and `**` matches across segments.
/// Patterns match the end of a path, so `src/directives/*.ts` accepts
/// `/app/src/directives/counter.ts`. Patterns starting with `/` are anchored
/// at the root.
#[derive(Debug, Clone)]
pub struct SourceFilter {
	set: GlobSet,
	patterns: Vec<String>,
}

impl SourceFilter {
	pub fn new<I, S>(patterns: I) -> BellagoniaResult<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut builder = GlobSetBuilder::new();
		let mut originals = Vec::new();

		for pattern in patterns {
			let pattern = pattern.as_ref();
			let glob = GlobBuilder::new(&suffix_pattern(pattern))
				.literal_separator(true)
				.build()
				.map_err(|e| {
					BellagoniaError::InvalidGlob {
						pattern: pattern.to_string(),
						reason: e.kind().to_string(),
					}
				})?;
			builder.add(glob);
			originals.push(pattern.to_string());
		}

		let set = builder.build().map_err(|e| {
			BellagoniaError::InvalidGlob {
				pattern: originals.join(", "),
				reason: e.to_string(),
			}
		})?;

		Ok(Self {
			set,
			patterns: originals,
		})
	}

	/// Whether `path` matches any pattern. Backslashes are treated as path
	/// separators.
	pub fn is_match(&self, path: &str) -> bool {
		let normalized = path.replace('\\', "/");
		self.set.is_match(normalized.as_str())
	}

	pub fn patterns(&self) -> &[String] {
		&self.patterns
	}
}

impl Default for SourceFilter {
	fn default() -> Self {
		Self::new(DEFAULT_DIRECTIVE_SOURCES)
			.unwrap_or_else(|e| panic!("default directive sources are valid: {e}"))
	}
}

fn suffix_pattern(pattern: &str) -> String {
	let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
	if pattern.starts_with('/') || pattern.starts_with("**/") || pattern == "**" {
		pattern.to_string()
	} else {
		format!("**/{pattern}")
	}
}
