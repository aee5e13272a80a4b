use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

/// Stylesheet extensions looked up next to a directive source, highest priority
/// first. The first two are vanilla-extract modules.
pub const DEFAULT_STYLESHEET_EXTENSIONS: [&str; 5] =
	[".css.ts", ".css.js", ".module.css", ".module.scss", ".css"];

/// Script extensions stripped from a source file name before probing.
const SOURCE_EXTENSIONS: [&str; 4] = [".tsx", ".jsx", ".ts", ".js"];

/// A stylesheet that belongs to a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStylesheet {
	/// Location of the stylesheet on disk.
	pub path: PathBuf,
	/// Module specifier used to import it from the source file.
	pub import_specifier: String,
}

/// Looks up the stylesheet that belongs to a source file.
pub trait FileResolver {
	fn resolve(&self, file: &Path) -> Option<ResolvedStylesheet>;
}

/// Configuration for [`SiblingStylesheetResolver`].
///
/// ```toml
/// [resolver]
/// extensions = [".module.css", ".css"]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolverConfig {
	pub extensions: Vec<String>,
}

impl Default for ResolverConfig {
	fn default() -> Self {
		Self {
			extensions: DEFAULT_STYLESHEET_EXTENSIONS
				.iter()
				.map(ToString::to_string)
				.collect(),
		}
	}
}

/// Finds a stylesheet sharing the source file's base name in the same
/// directory: `counter.ts` pairs with `counter.module.css`.
#[derive(Debug, Clone)]
pub struct SiblingStylesheetResolver {
	extensions: Vec<String>,
}

impl SiblingStylesheetResolver {
	pub fn new(config: &ResolverConfig) -> Self {
		Self {
			extensions: config.extensions.clone(),
		}
	}
}

impl Default for SiblingStylesheetResolver {
	fn default() -> Self {
		Self::new(&ResolverConfig::default())
	}
}

impl FileResolver for SiblingStylesheetResolver {
	fn resolve(&self, file: &Path) -> Option<ResolvedStylesheet> {
		let dir = file.parent().unwrap_or_else(|| Path::new(""));
		let base = source_base_name(file)?;

		self.extensions.iter().find_map(|extension| {
			let path = dir.join(format!("{base}{extension}"));
			path.is_file().then(|| {
				ResolvedStylesheet {
					path,
					import_specifier: import_specifier(base, extension),
				}
			})
		})
	}
}

/// File name with a trailing script extension removed.
fn source_base_name(file: &Path) -> Option<&str> {
	let name = file.file_name()?.to_str()?;
	let base = SOURCE_EXTENSIONS
		.iter()
		.find_map(|extension| name.strip_suffix(extension))
		.unwrap_or(name);
	Some(base)
}

/// vanilla-extract stylesheets compile to `<base>.css`, so their `.ts` /
/// `.js` suffix is dropped from the specifier.
fn import_specifier(base: &str, extension: &str) -> String {
	match extension {
		".css.ts" | ".css.js" => format!("./{base}.css"),
		_ => format!("./{base}{extension}"),
	}
}
