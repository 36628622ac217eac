use std::path::{Path, PathBuf};

use crate::api::diagnostics::{Diagnostic, Diagnostics};

/// Threaded through the whole pipeline instead of living behind a process-wide singleton: this
/// keeps multiple interpreter runs isolated from one another, which in turn keeps the test suite
/// able to run independent programs concurrently.
pub struct Context {
	diagnostics: Diagnostics,
	base_dir: PathBuf,
	include_stack: Vec<PathBuf>,
}

impl Context {
	pub fn new(base_dir: impl Into<PathBuf>) -> Self {
		Context {
			diagnostics: Diagnostics::empty(),
			base_dir: base_dir.into(),
			include_stack: Vec::new(),
		}
	}

	pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
		self.diagnostics.push(diagnostic);
	}

	pub const fn diagnostics(&self) -> &Diagnostics {
		&self.diagnostics
	}

	pub fn into_diagnostics(self) -> Diagnostics {
		self.diagnostics
	}

	pub fn resolve_include(&self, filename: &str) -> PathBuf {
		let candidate = Path::new(filename);
		if candidate.is_absolute() {
			candidate.to_path_buf()
		} else {
			self.base_dir.join(candidate)
		}
	}

	/// Pushes a file onto the active-include stack, failing if it's already being included
	/// (directly or transitively), which would otherwise recurse forever.
	pub fn push_include(&mut self, path: PathBuf) -> Result<(), PathBuf> {
		if self.include_stack.contains(&path) {
			return Err(path);
		}
		self.include_stack.push(path);
		Ok(())
	}

	pub fn pop_include(&mut self) {
		let _ = self.include_stack.pop();
	}
}
