use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use bellagonia_cli::BellagoniaCli;
use bellagonia_cli::Commands;
use bellagonia_cli::OutputFormat;
use bellagonia_cli::TagModeArg;
use bellagonia_core::AnyEmptyResult;
use bellagonia_core::AnyResult;
use bellagonia_core::BellagoniaConfig;
use bellagonia_core::BellagoniaError;
use bellagonia_core::ProjectRewrite;
use bellagonia_core::Rewriter;
use bellagonia_core::create_style_tags;
use bellagonia_core::scan_project;
use bellagonia_core::write_rewrites;
use clap::Parser;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "BELLAGONIA_LOG";

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = BellagoniaCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Check {
			diff,
			format,
			watch,
		}) => run_check(&args, *diff, *format, *watch),
		Some(Commands::Update { dry_run, watch }) => run_update(&args, *dry_run, *watch),
		Some(Commands::Styles { mode, prefix, base }) => {
			run_styles(&args, *mode, prefix.as_deref(), base.as_deref())
		}
		Some(Commands::Rewrite {
			file,
			module,
			write,
		}) => run_rewrite(&args, file, module, *write),
		None => {
			eprintln!("No subcommand specified. Run `bellagonia --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Render core errors through miette for the error code and help text.
		match e.downcast::<BellagoniaError>() {
			Ok(error) => {
				let report = miette::Report::new(*error);
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr, filtered by `BELLAGONIA_LOG` when it is set.
fn init_tracing(verbose: bool, use_color: bool) {
	let filter = EnvFilter::try_from_env(LOG_ENV)
		.unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.try_init();
}

fn resolve_root(args: &BellagoniaCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(root: &Path) -> AnyResult<BellagoniaConfig> {
	match BellagoniaConfig::resolve_path(root) {
		Some(path) => tracing::debug!(path = %path.display(), "loading config"),
		None => tracing::debug!(root = %root.display(), "no config file, using defaults"),
	}

	Ok(BellagoniaConfig::load_or_default(root)?)
}

fn scan(args: &BellagoniaCli) -> AnyResult<(PathBuf, ProjectRewrite)> {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	let rewrite = scan_project(&root, &config)?;

	if !rewrite.oversized.is_empty() {
		eprintln!(
			"{} skipped {} file(s) larger than `max_file_size`",
			colored!("warning:", yellow),
			rewrite.oversized.len()
		);
	}

	Ok((root, rewrite))
}

/// Block until the project changes, then call `on_change`, forever.
fn watch_project(
	root: &Path,
	action: &str,
	mut on_change: impl FnMut() -> AnyEmptyResult,
) -> AnyEmptyResult {
	println!("\nWatching for file changes... (press Ctrl+C to stop)");

	let (tx, rx) = mpsc::channel();
	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				if matches!(
					event.kind,
					notify::EventKind::Modify(_) | notify::EventKind::Create(_)
				) {
					let _ = tx.send(());
				}
			}
		})?;

	use notify::Watcher;
	watcher.watch(root, notify::RecursiveMode::Recursive)?;

	loop {
		rx.recv()?;
		// Debounce: drain additional events within 200ms.
		while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

		println!("\nFile change detected, {action}...");
		if let Err(e) = on_change() {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

fn run_check(
	args: &BellagoniaCli,
	show_diff: bool,
	format: OutputFormat,
	watch: bool,
) -> AnyEmptyResult {
	let needs_rewrite = run_check_once(args, show_diff, format)?;

	if !watch {
		if needs_rewrite {
			process::exit(1);
		}
		return Ok(());
	}

	let root = resolve_root(args);
	watch_project(&root, "checking", || {
		run_check_once(args, show_diff, format).map(|_| ())
	})
}

/// Run a single check and return whether any file needs rewriting.
///
/// Malformed call sites are reported in every format, even when no file
/// needs rewriting, but they do not fail the check on their own.
fn run_check_once(args: &BellagoniaCli, show_diff: bool, format: OutputFormat) -> AnyResult<bool> {
	let (root, rewrite) = scan(args)?;
	let clean = rewrite.is_clean();

	match format {
		OutputFormat::Json => {
			let files: Vec<serde_json::Value> = rewrite
				.files
				.iter()
				.map(|file| {
					serde_json::json!({
						"file": make_relative(&file.path, &root),
						"injected": file.injected,
						"malformed": malformed_sites(&rewrite, &file.path),
					})
				})
				.collect();
			let malformed: Vec<serde_json::Value> = rewrite
				.malformed
				.iter()
				.map(|source| {
					serde_json::json!({
						"file": make_relative(&source.path, &root),
						"sites": source.sites,
					})
				})
				.collect();
			let styles: Vec<String> = rewrite
				.styles
				.iter()
				.map(|path| make_relative(path, &root))
				.collect();
			let output = serde_json::json!({
				"ok": clean,
				"files": files,
				"malformed": malformed,
				"skipped_sites": rewrite.skipped_sites,
				"styles": styles,
			});
			println!("{output}");
		}
		OutputFormat::Github => {
			for file in &rewrite.files {
				let rel = make_relative(&file.path, &root);
				println!(
					"::warning file={rel}::{} directive call(s) are not wired to their stylesheet",
					file.injected
				);
			}
			for source in &rewrite.malformed {
				let rel = make_relative(&source.path, &root);
				println!(
					"::error file={rel}::{} directive call(s) have an unbalanced argument list",
					source.sites
				);
			}

			if clean {
				println!("All directive sources are up to date.");
			} else {
				eprintln!("{}", check_summary(&rewrite));
			}
		}
		OutputFormat::Text => {
			if clean {
				println!("Check passed: all directive sources are up to date.");
				print_malformed(&rewrite, &root);
				return Ok(false);
			}

			eprintln!("Check failed.");
			eprintln!();
			eprintln!("Directive sources to rewrite:");
			for file in &rewrite.files {
				let rel = make_relative(&file.path, &root);
				eprintln!("  {rel} ({} call site(s))", file.injected);

				if show_diff {
					print_diff(&file.original, &file.rewritten);
				}
			}
			print_malformed(&rewrite, &root);
			eprintln!();
			eprintln!("{}", check_summary(&rewrite));
		}
	}

	Ok(!clean)
}

fn malformed_sites(rewrite: &ProjectRewrite, path: &Path) -> usize {
	rewrite
		.malformed
		.iter()
		.find(|source| source.path == path)
		.map_or(0, |source| source.sites)
}

fn print_malformed(rewrite: &ProjectRewrite, root: &Path) {
	for source in &rewrite.malformed {
		eprintln!(
			"{} {} has {} malformed call site(s) left untouched",
			colored!("warning:", yellow),
			make_relative(&source.path, root),
			source.sites
		);
	}
}

fn check_summary(rewrite: &ProjectRewrite) -> String {
	format!(
		"{} call site(s) in {} file(s) need the stylesheet marker. Run `bellagonia update` to \
		 rewrite them.",
		rewrite.injected_count(),
		rewrite.files.len()
	)
}

fn run_update(args: &BellagoniaCli, dry_run: bool, watch: bool) -> AnyEmptyResult {
	run_update_once(args, dry_run)?;

	if !watch || dry_run {
		return Ok(());
	}

	let root = resolve_root(args);
	watch_project(&root, "updating", || run_update_once(args, false))
}

fn run_update_once(args: &BellagoniaCli, dry_run: bool) -> AnyEmptyResult {
	let (root, rewrite) = scan(args)?;

	if rewrite.is_clean() {
		println!("All directive sources are already up to date.");
		return Ok(());
	}

	if dry_run {
		println!(
			"Dry run: would rewrite {} call site(s) in {} file(s):",
			rewrite.injected_count(),
			rewrite.files.len()
		);
		for file in &rewrite.files {
			println!("  {}", make_relative(&file.path, &root));
		}
		return Ok(());
	}

	write_rewrites(&rewrite)?;
	println!(
		"{} {} call site(s) in {} file(s).",
		colored!("Updated", green),
		rewrite.injected_count(),
		rewrite.files.len()
	);

	if args.verbose {
		for file in &rewrite.files {
			println!("  {}", make_relative(&file.path, &root));
		}
	}

	Ok(())
}

fn run_styles(
	args: &BellagoniaCli,
	mode: Option<TagModeArg>,
	prefix: Option<&str>,
	base: Option<&Path>,
) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	let rewrite = scan_project(&root, &config)?;

	let mut options = config.tag_options(&root);
	if let Some(mode) = mode {
		options.mode = mode.into();
	}
	if let Some(prefix) = prefix {
		options.prefix = prefix.to_string();
	}
	if let Some(base) = base {
		options.base = Some(root.join(base));
	}

	if rewrite.styles.is_empty() {
		eprintln!("No stylesheets collected.");
		return Ok(());
	}

	println!("{}", create_style_tags(&rewrite.styles, &options));

	if args.verbose {
		eprintln!(
			"{} {} stylesheet(s)",
			colored!("collected", bold),
			rewrite.styles.len()
		);
	}

	Ok(())
}

fn run_rewrite(args: &BellagoniaCli, file: &Path, module: &str, write: bool) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	let rewriter = Rewriter::new(&config.rewrite)?;

	let source = std::fs::read_to_string(file)?;
	let rewrite = rewriter.transform(&source, module);

	if rewrite.has_malformed_sites() {
		eprintln!(
			"{} left malformed `{}` call(s) untouched in {}",
			colored!("warning:", yellow),
			config.rewrite.directive,
			file.display()
		);
	}

	if !write {
		print!("{}", rewrite.code);
		return Ok(());
	}

	if !rewrite.is_changed() {
		println!("{} is already up to date.", file.display());
		return Ok(());
	}

	std::fs::write(file, &rewrite.code)?;
	println!(
		"{} {} ({} call site(s))",
		colored!("Rewrote", green),
		file.display(),
		rewrite.injected
	);

	Ok(())
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("    {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("    {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("     {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
