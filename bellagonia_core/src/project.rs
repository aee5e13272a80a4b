use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::BellagoniaConfig;
use crate::BellagoniaError;
use crate::BellagoniaResult;
use crate::CONFIG_FILE_CANDIDATES;
use crate::Pipeline;
use crate::SiblingStylesheetResolver;
use crate::SkipReason;
use crate::SkippedSite;
use crate::pipeline::has_script_extension;

/// A source file whose text the build would change.
#[derive(Debug, Clone)]
pub struct FileRewrite {
	pub path: PathBuf,
	/// The text currently on disk.
	pub original: String,
	/// The text after rewriting.
	pub rewritten: String,
	/// Call sites that received the marker.
	pub injected: usize,
	/// Call sites left untouched.
	pub skipped: Vec<SkippedSite>,
}

/// A directive source with calls whose argument list never closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedSource {
	pub path: PathBuf,
	/// Number of malformed call sites in the file.
	pub sites: usize,
}

/// The outcome of running the build hook over every file in a project.
#[derive(Debug, Clone, Default)]
pub struct ProjectRewrite {
	/// Files whose text would change, sorted by path.
	pub files: Vec<FileRewrite>,
	/// Stylesheets collected from every eligible file, in discovery order.
	pub styles: Vec<PathBuf>,
	/// Number of script files handed to the build hook.
	pub scanned: usize,
	/// Files skipped because they exceed `max_file_size`.
	pub oversized: Vec<PathBuf>,
	/// Call sites left untouched across every directive source, including
	/// files that need no rewriting.
	pub skipped_sites: usize,
	/// Directive sources with malformed call sites, sorted by path.
	pub malformed: Vec<MalformedSource>,
}

impl ProjectRewrite {
	/// Returns true when no file needs rewriting.
	pub fn is_clean(&self) -> bool {
		self.files.is_empty()
	}

	/// Total number of call sites that would receive the marker.
	pub fn injected_count(&self) -> usize {
		self.files.iter().map(|file| file.injected).sum()
	}

	/// Total number of call sites whose argument list never closes.
	pub fn malformed_count(&self) -> usize {
		self.malformed.iter().map(|source| source.sites).sum()
	}
}

/// Run the build hook over every script file below `root`.
pub fn scan_project(root: &Path, config: &BellagoniaConfig) -> BellagoniaResult<ProjectRewrite> {
	let resolver = SiblingStylesheetResolver::new(&config.resolver);
	let mut pipeline = Pipeline::with_resolver(&config.pipeline_options(), resolver)?;
	pipeline.build_start();

	let files = collect_files(root, &config.exclude.patterns, config.disable_gitignore)?;
	let mut result = ProjectRewrite::default();

	for path in files {
		let size = std::fs::metadata(&path)?.len();
		if size > config.max_file_size {
			let error = BellagoniaError::FileTooLarge {
				path: path.display().to_string(),
				size,
				limit: config.max_file_size,
			};
			tracing::warn!("{error}");
			result.oversized.push(path);
			continue;
		}

		let Ok(original) = std::fs::read_to_string(&path) else {
			tracing::debug!(path = %path.display(), "skipping file that is not valid UTF-8");
			continue;
		};
		result.scanned += 1;

		let id = path.to_string_lossy();
		let Some(module) = pipeline.rewrite_module(&original, &id) else {
			continue;
		};

		result.skipped_sites += module.skipped.len();
		let malformed = module
			.skipped
			.iter()
			.filter(|site| site.reason == SkipReason::MalformedArgumentSpan)
			.count();
		if malformed > 0 {
			result.malformed.push(MalformedSource {
				path: path.clone(),
				sites: malformed,
			});
		}

		if !module.changed {
			continue;
		}

		tracing::info!(path = %path.display(), injected = module.injected, "rewrote directive source");
		result.files.push(FileRewrite {
			path,
			original,
			rewritten: module.code,
			injected: module.injected,
			skipped: module.skipped,
		});
	}

	result.styles = pipeline.styles();
	Ok(result)
}

/// Write the rewritten files back to disk.
pub fn write_rewrites(rewrite: &ProjectRewrite) -> BellagoniaResult<()> {
	for file in &rewrite.files {
		std::fs::write(&file.path, &file.rewritten)?;
	}
	Ok(())
}

/// Build a `Gitignore` matcher from `[exclude]` patterns in
/// `bellagonia.toml`. These follow `.gitignore` syntax and are applied on top
/// of any `.gitignore` rules.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> BellagoniaResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			BellagoniaError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| BellagoniaError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

/// Build a `Gitignore` matcher from the project's `.gitignore` file (if any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		let _ = builder.add(gitignore_path);
	}
	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

/// Collect all script files from a directory tree, sorted by path.
fn collect_files(
	root: &Path,
	exclude_patterns: &[String],
	disable_gitignore: bool,
) -> BellagoniaResult<Vec<PathBuf>> {
	let mut files = Vec::new();
	let mut visited_dirs = HashSet::new();

	let gitignore = if disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(root)
	};
	let custom_exclude = build_exclude_matcher(root, exclude_patterns)?;

	walk_dir(
		root,
		&mut files,
		true,
		&gitignore,
		&custom_exclude,
		&mut visited_dirs,
	)?;
	files.sort();
	Ok(files)
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target" || name == "dist"
}

fn has_project_config(dir: &Path) -> bool {
	CONFIG_FILE_CANDIDATES
		.iter()
		.any(|candidate| dir.join(candidate).is_file())
}

fn walk_dir(
	dir: &Path,
	files: &mut Vec<PathBuf>,
	is_root: bool,
	gitignore: &Gitignore,
	custom_exclude: &Gitignore,
	visited_dirs: &mut HashSet<PathBuf>,
) -> BellagoniaResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	// Detect symlink cycles by tracking canonical paths.
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !visited_dirs.insert(canonical) {
		return Err(BellagoniaError::SymlinkCycle {
			path: dir.display().to_string(),
		});
	}

	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();

		if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
			if is_ignored_directory_name(name) {
				continue;
			}
		}

		let is_dir = path.is_dir();
		if gitignore.matched(&path, is_dir).is_ignore()
			|| custom_exclude.matched(&path, is_dir).is_ignore()
		{
			continue;
		}

		if is_dir {
			// Nested projects with their own config are scanned separately.
			if !is_root && has_project_config(&path) {
				continue;
			}
			walk_dir(
				&path,
				files,
				false,
				gitignore,
				custom_exclude,
				visited_dirs,
			)?;
		} else if has_script_extension(&path) {
			files.push(path);
		}
	}

	Ok(())
}
