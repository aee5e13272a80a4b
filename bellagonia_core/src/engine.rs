use std::borrow::Cow;
use std::sync::LazyLock;

use serde::Deserialize;

use crate::BellagoniaResult;
use crate::arguments::parse_arguments;
use crate::imports::ensure_import;
use crate::inject::is_already_marked;
use crate::inject::plan_injection;
use crate::locator::CallSiteLocator;
use crate::locator::validate_identifier;

/// The invocation token rewritten by default.
pub const DEFAULT_DIRECTIVE: &str = "directive";
/// The identifier bound to the stylesheet module by default.
pub const DEFAULT_MARKER: &str = "$styles";

static DEFAULT_REWRITER: LazyLock<Rewriter> = LazyLock::new(|| {
	Rewriter::new(&RewriteOptions::default())
		.unwrap_or_else(|e| panic!("default rewrite options are valid: {e}"))
});

/// Which calls to rewrite and which identifier to inject.
///
/// ```toml
/// [rewrite]
/// directive = "directive"
/// marker = "$styles"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RewriteOptions {
	/// Name of the function whose calls receive the marker.
	pub directive: String,
	/// Identifier imported from the stylesheet module and added to every
	/// call's `assign` block.
	pub marker: String,
}

impl Default for RewriteOptions {
	fn default() -> Self {
		Self {
			directive: DEFAULT_DIRECTIVE.to_string(),
			marker: DEFAULT_MARKER.to_string(),
		}
	}
}

/// Why a call site was left as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
	/// The argument list never closes.
	MalformedArgumentSpan,
	/// The marker is already present in the call's `assign` block.
	AlreadyMarked,
}

/// A call site that the rewriter did not edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedSite {
	/// Byte offset of the call once the import is in place, before any call
	/// site was edited.
	pub offset: usize,
	pub reason: SkipReason,
}

/// The result of rewriting one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
	/// The rewritten text. Identical to the input when nothing changed.
	pub code: String,
	/// Whether the marker import had to be added.
	pub import_added: bool,
	/// Number of call sites that received the marker.
	pub injected: usize,
	/// Call sites that were left untouched, in ascending offset order.
	pub skipped: Vec<SkippedSite>,
}

impl Rewrite {
	/// Returns false when the rewritten text is identical to the input.
	pub fn is_changed(&self) -> bool {
		self.import_added || self.injected > 0
	}

	/// The rewritten text, or `None` when nothing changed.
	pub fn into_changed(self) -> Option<String> {
		self.is_changed().then_some(self.code)
	}

	/// Returns true if any call site was malformed.
	pub fn has_malformed_sites(&self) -> bool {
		self.skipped
			.iter()
			.any(|site| site.reason == SkipReason::MalformedArgumentSpan)
	}
}

/// Wires a marker import into every call of a directive function.
///
/// The rewriter keeps no state between calls; it can be shared freely
/// across threads.
#[derive(Debug, Clone)]
pub struct Rewriter {
	locator: CallSiteLocator,
	marker: String,
}

impl Rewriter {
	pub fn new(options: &RewriteOptions) -> BellagoniaResult<Self> {
		validate_identifier("marker", &options.marker)?;
		let locator = CallSiteLocator::new(&options.directive)?;

		Ok(Self {
			locator,
			marker: options.marker.clone(),
		})
	}

	/// Whether `code` contains at least one call this rewriter would visit.
	pub fn has_call(&self, code: &str) -> bool {
		self.locator.has_call(code)
	}

	/// Ensure the marker import exists and inject the marker into every call
	/// site of `source`.
	///
	/// Call sites are processed from the last to the first. Every edit starts
	/// at or after its own call site, so the offsets of the call sites still
	/// to be visited stay valid. Applying `transform` to its own output
	/// returns the same text.
	pub fn transform(&self, source: &str, module_path: &str) -> Rewrite {
		let (mut code, import_added) = match ensure_import(source, module_path, &self.marker) {
			Cow::Borrowed(unchanged) => (unchanged.to_string(), false),
			Cow::Owned(with_import) => (with_import, true),
		};
		let mut injected = 0;
		let mut skipped = Vec::new();

		let mut sites = self.locator.locate_all(&code);
		sites.reverse();

		for offset in sites {
			let span = match parse_arguments(&code, offset) {
				Ok(span) => span,
				Err(error) => {
					tracing::debug!(offset, %error, "skipping malformed call site");
					skipped.push(SkippedSite {
						offset,
						reason: SkipReason::MalformedArgumentSpan,
					});
					continue;
				}
			};

			if is_already_marked(&code, &span, &self.marker) {
				skipped.push(SkippedSite {
					offset,
					reason: SkipReason::AlreadyMarked,
				});
				continue;
			}

			let splice = plan_injection(&code, &span, &self.marker);
			tracing::trace!(offset, range = ?splice.range, "injecting marker");
			code = splice.apply(&code);
			injected += 1;
		}

		skipped.reverse();

		Rewrite {
			code,
			import_added,
			injected,
			skipped,
		}
	}
}

impl Default for Rewriter {
	fn default() -> Self {
		DEFAULT_REWRITER.clone()
	}
}

/// Rewrite `source` with the default `directive` / `$styles` options.
pub fn transform_directive(source: &str, module_path: &str) -> String {
	DEFAULT_REWRITER.transform(source, module_path).code
}
