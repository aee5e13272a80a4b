use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

/// How collected stylesheets are referenced from an HTML page.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TagMode {
	/// A single `<style>` block with one `@import` rule per stylesheet.
	#[default]
	Import,
	/// One `<link rel="stylesheet">` tag per stylesheet.
	Link,
}

/// Options for [`create_style_tags`].
///
/// ```toml
/// [tags]
/// base = "."
/// prefix = "/assets/"
/// mode = "link"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StyleTagOptions {
	/// Directory that hrefs are made relative to. Absolute paths are used
	/// when unset.
	pub base: Option<PathBuf>,
	/// Prepended to every relative href.
	pub prefix: String,
	pub mode: TagMode,
}

impl Default for StyleTagOptions {
	fn default() -> Self {
		Self {
			base: None,
			prefix: "/".to_string(),
			mode: TagMode::default(),
		}
	}
}

/// Render the markup that loads every stylesheet in `paths`.
///
/// Returns an empty string when `paths` is empty.
pub fn create_style_tags(paths: &[PathBuf], options: &StyleTagOptions) -> String {
	if paths.is_empty() {
		return String::new();
	}

	let hrefs = paths
		.iter()
		.map(|path| to_href(path, options.base.as_deref(), &options.prefix));

	match options.mode {
		TagMode::Link => {
			hrefs
				.map(|href| format!(r#"<link rel="stylesheet" href="{href}">"#))
				.collect::<Vec<_>>()
				.join("\n")
		}
		TagMode::Import => {
			let imports = hrefs
				.map(|href| format!(r#"@import url("{href}");"#))
				.collect::<Vec<_>>()
				.join("\n");
			format!("<style>\n{imports}\n</style>")
		}
	}
}

fn to_href(path: &Path, base: Option<&Path>, prefix: &str) -> String {
	let Some(relative) = base.and_then(|base| path.strip_prefix(base).ok()) else {
		return path.display().to_string();
	};

	let relative = relative
		.components()
		.map(|component| component.as_os_str().to_string_lossy())
		.collect::<Vec<_>>()
		.join("/");
	format!("{prefix}{relative}")
}
