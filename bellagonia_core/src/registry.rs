use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

/// Stylesheet paths discovered during one build, in first-insertion order.
///
/// The registry is owned by the build host, which resets it when a build
/// starts. Wrap it in a lock to share it between threads.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
	paths: Vec<PathBuf>,
	seen: HashSet<PathBuf>,
}

impl StyleRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record a stylesheet. Returns false when it was already recorded.
	pub fn add(&mut self, path: impl AsRef<Path>) -> bool {
		let path = path.as_ref();
		if self.seen.contains(path) {
			return false;
		}

		self.seen.insert(path.to_path_buf());
		self.paths.push(path.to_path_buf());
		true
	}

	/// A snapshot of the recorded paths. Later additions do not affect it.
	pub fn list(&self) -> Vec<PathBuf> {
		self.paths.clone()
	}

	pub fn paths(&self) -> &[PathBuf] {
		&self.paths
	}

	pub fn reset(&mut self) {
		self.paths.clear();
		self.seen.clear();
	}

	pub fn len(&self) -> usize {
		self.paths.len()
	}

	pub fn is_empty(&self) -> bool {
		self.paths.is_empty()
	}
}
