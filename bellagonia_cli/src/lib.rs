use std::path::PathBuf;

use bellagonia_core::TagMode;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Wire sibling stylesheets into directive() calls across your project.",
	long_about = "bellagonia finds every `directive(...)` call in your directive sources, imports \
	              the stylesheet that sits next to the file and injects it into the directive's \
	              `assign` options so the template can reach it.\n\nQuick start:\n  bellagonia \
	              check    Report files that still need wiring\n  bellagonia update   Rewrite \
	              directive sources in place\n  bellagonia styles   Print style tags for the \
	              collected stylesheets"
)]
pub struct BellagoniaCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Check that every directive source is already wired to its stylesheet.
	///
	/// Runs the rewrite over all directive sources without touching the disk
	/// and exits with a non-zero status code if any file would change. Ideal
	/// for CI pipelines.
	Check {
		/// Show a unified diff for every file that would be rewritten.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results. Use `text` for human-readable
		/// output, `json` for programmatic consumption, or `github` for
		/// GitHub Actions annotations.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,

		/// Watch for file changes and re-run checks automatically.
		#[arg(long, default_value_t = false)]
		watch: bool,
	},
	/// Rewrite every directive source that is not yet wired.
	///
	/// Adds the stylesheet import and the `assign` entry to each
	/// `directive(...)` call. Use `--dry-run` to preview which files would
	/// change, or `--watch` to re-run whenever files change.
	Update {
		/// Preview changes without writing files.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Watch for file changes and re-run updates automatically.
		#[arg(long, default_value_t = false)]
		watch: bool,
	},
	/// Print the style tags for every stylesheet the build would collect.
	///
	/// Defaults come from the `[tags]` section of `bellagonia.toml`; the
	/// flags override them.
	Styles {
		/// Emit a single `<style>` block of `@import` rules, or one `<link>`
		/// element per stylesheet.
		#[arg(long, value_enum)]
		mode: Option<TagModeArg>,

		/// Prefix prepended to every stylesheet path.
		#[arg(long)]
		prefix: Option<String>,

		/// Directory the stylesheet paths are made relative to.
		#[arg(long)]
		base: Option<PathBuf>,
	},
	/// Rewrite a single file, bypassing the directive source filter.
	///
	/// Prints the rewritten text to stdout unless `--write` is given.
	Rewrite {
		/// The file to rewrite.
		file: PathBuf,

		/// The module specifier bound to the marker, e.g.
		/// `./counter.module.css`.
		#[arg(long, short)]
		module: String,

		/// Write the result back to the file instead of printing it.
		#[arg(long, default_value_t = false)]
		write: bool,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
	/// GitHub Actions annotation format.
	Github,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TagModeArg {
	/// One `<style>` block with an `@import` rule per stylesheet.
	Import,
	/// One `<link rel="stylesheet">` element per stylesheet.
	Link,
}

impl From<TagModeArg> for TagMode {
	fn from(mode: TagModeArg) -> Self {
		match mode {
			TagModeArg::Import => Self::Import,
			TagModeArg::Link => Self::Link,
		}
	}
}
