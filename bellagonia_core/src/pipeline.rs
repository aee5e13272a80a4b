use std::path::Path;
use std::path::PathBuf;

use crate::BellagoniaResult;
use crate::DEFAULT_DIRECTIVE_SOURCES;
use crate::FileResolver;
use crate::ResolvedStylesheet;
use crate::RewriteOptions;
use crate::Rewriter;
use crate::SiblingStylesheetResolver;
use crate::SkippedSite;
use crate::SourceFilter;
use crate::StyleRegistry;
use crate::StyleTagOptions;
use crate::create_style_tags;

/// Script files the pipeline is willing to look at.
const SCRIPT_EXTENSIONS: [&str; 4] = ["ts", "js", "tsx", "jsx"];

/// Options for a [`Pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineOptions {
	/// Glob patterns selecting the files that define directives.
	pub directive_sources: Vec<String>,
	/// When false every file passes through untouched.
	pub auto_styles: bool,
	pub rewrite: RewriteOptions,
}

impl Default for PipelineOptions {
	fn default() -> Self {
		Self {
			directive_sources: DEFAULT_DIRECTIVE_SOURCES
				.iter()
				.map(ToString::to_string)
				.collect(),
			auto_styles: true,
			rewrite: RewriteOptions::default(),
		}
	}
}

/// A directive source after the rewriter has run over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedModule {
	pub code: String,
	/// False when `code` is identical to the input.
	pub changed: bool,
	/// The stylesheet bound to the marker.
	pub stylesheet: ResolvedStylesheet,
	/// Call sites that received the marker.
	pub injected: usize,
	/// Call sites left untouched.
	pub skipped: Vec<SkippedSite>,
}

/// The build hook: decides which modules to rewrite, rewrites them and
/// collects their stylesheets for the current build.
#[derive(Debug)]
pub struct Pipeline<R = SiblingStylesheetResolver> {
	auto_styles: bool,
	filter: SourceFilter,
	rewriter: Rewriter,
	resolver: R,
	registry: StyleRegistry,
}

impl Pipeline<SiblingStylesheetResolver> {
	pub fn new(options: &PipelineOptions) -> BellagoniaResult<Self> {
		Self::with_resolver(options, SiblingStylesheetResolver::default())
	}
}

impl<R: FileResolver> Pipeline<R> {
	pub fn with_resolver(options: &PipelineOptions, resolver: R) -> BellagoniaResult<Self> {
		Ok(Self {
			auto_styles: options.auto_styles,
			filter: SourceFilter::new(&options.directive_sources)?,
			rewriter: Rewriter::new(&options.rewrite)?,
			resolver,
			registry: StyleRegistry::new(),
		})
	}

	/// Forget the stylesheets collected by the previous build.
	pub fn build_start(&mut self) {
		self.registry.reset();
	}

	/// Rewrite one module. Returns `None` when the module is not a directive
	/// source, has no stylesheet, or is already up to date.
	///
	/// The stylesheet of every eligible module is collected, including
	/// modules that needed no rewriting.
	pub fn transform(&mut self, code: &str, id: &str) -> Option<TransformedModule> {
		self.rewrite_module(code, id).filter(|module| module.changed)
	}

	/// Run the rewriter over an eligible module and report the outcome even
	/// when the text did not change, so callers can see the call sites that
	/// were skipped.
	pub fn rewrite_module(&mut self, code: &str, id: &str) -> Option<TransformedModule> {
		if !self.auto_styles || !is_candidate_id(id) || !self.rewriter.has_call(code) {
			return None;
		}

		if !self.filter.is_match(id) {
			tracing::trace!(id, patterns = ?self.filter.patterns(), "not a directive source");
			return None;
		}

		let Some(stylesheet) = self.resolver.resolve(Path::new(id)) else {
			tracing::debug!(id, "no sibling stylesheet");
			return None;
		};

		self.registry.add(&stylesheet.path);

		let rewrite = self
			.rewriter
			.transform(code, &stylesheet.import_specifier);
		if rewrite.has_malformed_sites() {
			tracing::warn!(id, "left malformed directive call(s) untouched");
		}

		Some(TransformedModule {
			changed: rewrite.is_changed(),
			code: rewrite.code,
			stylesheet,
			injected: rewrite.injected,
			skipped: rewrite.skipped,
		})
	}

	/// Stylesheets collected since the last [`Pipeline::build_start`].
	pub fn styles(&self) -> Vec<PathBuf> {
		self.registry.list()
	}

	pub fn style_tags(&self, options: &StyleTagOptions) -> String {
		create_style_tags(self.registry.paths(), options)
	}

	pub fn registry(&self) -> &StyleRegistry {
		&self.registry
	}
}

fn is_candidate_id(id: &str) -> bool {
	has_script_extension(Path::new(id)) && !id.contains("node_modules")
}

pub(crate) fn has_script_extension(path: &Path) -> bool {
	path.extension()
		.and_then(|extension| extension.to_str())
		.is_some_and(|extension| SCRIPT_EXTENSIONS.contains(&extension))
}
