/// A line/column position in a single source file. Positions are carried on every token purely
/// for diagnostics; they play no role in token equality or parsing decisions (see
/// [`crate::lexer::Token`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
	pub line: usize,
	pub column: usize,
}

impl Span {
	pub const fn new(line: usize, column: usize) -> Self {
		Span { line, column }
	}

	/// A placeholder span for diagnostics that aren't anchored to a specific source location,
	/// such as errors raised purely at the semantic level after resolution has discarded token
	/// positions.
	pub const fn unknown() -> Self {
		Span { line: 0, column: 0 }
	}
}

impl std::fmt::Display for Span {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.line, self.column)
	}
}
