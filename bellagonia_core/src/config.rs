use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::BellagoniaError;
use crate::BellagoniaResult;
use crate::DEFAULT_DIRECTIVE_SOURCES;
use crate::PipelineOptions;
use crate::ResolverConfig;
use crate::RewriteOptions;
use crate::StyleTagOptions;

/// Default maximum file size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"bellagonia.toml",
	".bellagonia.toml",
	".config/bellagonia.toml",
];

/// Configuration loaded from a `bellagonia.toml` file.
///
/// ```toml
/// directive_sources = ["src/directives/**/*.ts"]
/// auto_styles = true
///
/// [rewrite]
/// directive = "directive"
/// marker = "$styles"
///
/// [resolver]
/// extensions = [".css.ts", ".module.css", ".css"]
///
/// [exclude]
/// patterns = ["dist/"]
///
/// [tags]
/// base = "."
/// prefix = "/"
/// mode = "import"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BellagoniaConfig {
	/// Glob patterns selecting directive source files.
	pub directive_sources: Vec<String>,
	/// When false no file is rewritten and no stylesheet is collected.
	pub auto_styles: bool,
	pub rewrite: RewriteOptions,
	pub resolver: ResolverConfig,
	/// Gitignore-style patterns excluded from project scans.
	pub exclude: ExcludeConfig,
	/// How `bellagonia styles` renders the collected stylesheets. A relative
	/// `base` is resolved against the project root.
	pub tags: StyleTagOptions,
	/// Files larger than this are skipped during project scans.
	pub max_file_size: u64,
	/// When true, `.gitignore` files are not used for filtering.
	pub disable_gitignore: bool,
}

impl Default for BellagoniaConfig {
	fn default() -> Self {
		Self {
			directive_sources: DEFAULT_DIRECTIVE_SOURCES
				.iter()
				.map(ToString::to_string)
				.collect(),
			auto_styles: true,
			rewrite: RewriteOptions::default(),
			resolver: ResolverConfig::default(),
			exclude: ExcludeConfig::default(),
			tags: StyleTagOptions::default(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

impl BellagoniaConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> BellagoniaResult<Option<Self>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		Self::from_toml(&content).map(Some)
	}

	/// Load the config at `root`, falling back to defaults.
	pub fn load_or_default(root: &Path) -> BellagoniaResult<Self> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	pub fn from_toml(content: &str) -> BellagoniaResult<Self> {
		toml::from_str(content).map_err(|e| BellagoniaError::ConfigParse(e.to_string()))
	}

	pub fn pipeline_options(&self) -> PipelineOptions {
		PipelineOptions {
			directive_sources: self.directive_sources.clone(),
			auto_styles: self.auto_styles,
			rewrite: self.rewrite.clone(),
		}
	}

	/// Tag options with a relative `base` joined onto `root`.
	pub fn tag_options(&self, root: &Path) -> StyleTagOptions {
		let mut options = self.tags.clone();
		options.base = options.base.map(|base| {
			if base.is_relative() {
				root.join(base)
			} else {
				base
			}
		});
		options
	}
}
