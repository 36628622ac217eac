use std::fmt::Display;

use crate::api::span::Span;

/// Lexical errors: the byte stream doesn't decompose into tokens.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum LexError {
	#[error("Unrecognized character '{0}'")]
	UnrecognizedCharacter(char),

	#[error("Unterminated string literal")]
	UnterminatedString,
}

/// Surface-syntax errors raised while assembling declarations out of the token stream.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
	#[error("Expected an identifier")]
	ExpectedIdentifier,

	#[error("Expected a number")]
	ExpectedNumber,

	#[error("Unmatched brace")]
	UnmatchedBrace,

	#[error("An operator body must contain at least one token")]
	EmptyBody,

	#[error("Unexpected token: {found}")]
	UnexpectedToken { found: String },

	#[error("Unexpected end of input")]
	UnexpectedEndOfInput,

	#[error("A bare numeric parameter pattern ('{{{0}}}') is redundant; numbers need no further restriction")]
	NumericParamCannotBeRestricted(i64),
}

/// Semantic errors raised while an operator or category declaration is absorbed into the
/// operator table, before its body has been resolved.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum DefinitionError {
	#[error("\"{name}\" is already declared as a category and cannot also name a nullary operator")]
	NameConflict { name: String },

	#[error("\"{name}\" was already declared with priority {existing}, which conflicts with the newly declared priority {attempted}")]
	PriorityConflict { name: String, existing: i64, attempted: i64 },

	#[error("\"{name}\" was already declared with a different associativity, producing different operand-priority bounds")]
	FormatConflict { name: String },
}

/// Semantic errors raised while resolving an operator body's token sequence into an expression
/// tree under the current operator table.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
	#[error("An operator body must contain at least one token")]
	EmptyBody,

	#[error("\"{0}\" does not name a local parameter or a declared nullary operator")]
	UnresolvedName(String),

	#[error("No unambiguous expression tree could be derived for this operator body")]
	UnparsableExpression,

	#[error("This operator body parses in more than one way under the current operator priorities")]
	AmbiguousExpression,

	#[error("A brace-grouped sub-expression cannot be used as an operator name")]
	NonAtomicToken,

	#[error("String-to-pair desugaring is not supported")]
	Unsupported,
}

/// Runtime errors raised while dispatching an overload or evaluating a resolved body.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum EvalError {
	#[error("No overload of \"{name}\" matched the given arguments")]
	NoMatchingOverload { name: String },

	#[error("Value did not match the expected pattern shape")]
	PatternShapeMismatch,

	#[error("Expected a numeric value")]
	ExpectedNumeric,

	#[error("Expected the numeric literal {expected} but found {found}")]
	NumericValueMismatch { expected: i64, found: i64 },

	#[error("Parameter \"{name}\" was bound to two different values within the same overload")]
	RebindingMismatch { name: String },

	#[error("Variable \"{0}\" is not bound in this scope")]
	UnboundVariable(String),
}

/// An invariant that a correct implementation should never violate. Its
/// presence in a diagnostic output always indicates a bug in the interpreter itself, not in the
/// program being interpreted.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
#[error("Internal invariant violated: {0}")]
pub struct InvariantViolation(pub String);

#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
	#[error("{0}")]
	Lex(LexError),

	#[error("{0}")]
	Parse(ParseError),

	#[error("{0}")]
	Definition(DefinitionError),

	#[error("{0}")]
	Resolve(ResolveError),

	#[error("{0}")]
	Eval(EvalError),

	#[error("{0}")]
	Internal(InvariantViolation),
}

impl Error {
	/// Whether this error's diagnostic should be suffixed with a `line:column` position per
	/// the diagnostic format. Lexical and surface-parse errors carry a meaningful position; semantic and
	/// runtime errors are reported against the declaration as a whole.
	const fn has_position(&self) -> bool {
		matches!(self, Error::Lex(_) | Error::Parse(_))
	}

	const fn kind(&self) -> &'static str {
		match self {
			Error::Lex(_) => "Lexical",
			Error::Parse(_) => "Parse",
			Error::Definition(_) => "Semantic",
			Error::Resolve(_) => "Semantic",
			Error::Eval(_) => "Runtime",
			Error::Internal(_) => "Internal",
		}
	}
}

#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub struct Diagnostic {
	pub span: Span,
	pub error: Error,
}

impl Diagnostic {
	pub const fn new(span: Span, error: Error) -> Self {
		Diagnostic { span, error }
	}
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.error.has_position() {
			write!(f, "{}: {} {}", self.error.kind(), self.error, self.span)
		} else {
			write!(f, "{}: {}", self.error.kind(), self.error)
		}
	}
}

/// An insertion-ordered collection of diagnostics accumulated while processing a program: errors
/// abort `--run` mode but are all collected for the inspection modes (`-l`/`-p`/`-s`).
#[derive(Clone, Debug, Default)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
	pub const fn empty() -> Self {
		Diagnostics(Vec::new())
	}

	pub fn push(&mut self, diagnostic: Diagnostic) {
		self.0.push(diagnostic);
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
		self.0.iter()
	}

	pub fn into_vec(self) -> Vec<Diagnostic> {
		self.0
	}
}

impl Display for Diagnostics {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for (index, diagnostic) in self.0.iter().enumerate() {
			if index > 0 {
				writeln!(f)?;
			}
			write!(f, "{diagnostic}")?;
		}
		Ok(())
	}
}

impl<'a> IntoIterator for &'a Diagnostics {
	type Item = &'a Diagnostic;
	type IntoIter = std::slice::Iter<'a, Diagnostic>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
