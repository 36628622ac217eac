pub mod body;
pub mod pattern;

use std::collections::VecDeque;

use crate::{
	api::{
		diagnostics::{Diagnostic, Diagnostics, Error, ParseError},
		span::Span,
	},
	lexer::{Token, TokenKind},
	model::{BodyPre, Format, Pattern},
};

pub type TokenQueue = VecDeque<Token>;

/// A slot in an operator's signature, driven by the format's `f`/`x`/`y` letters
/// each `f` yields an operator-name slot, each `x`/`y` yields a parameter
/// pattern.
#[derive(Debug, Clone)]
pub enum SigSlot {
	OperatorName(Token),
	Param(Pattern),
}

/// One parsed declaration record. Operator bodies remain unresolved
/// `BodyPre` trees; the sequence resolver (`crate::resolve`) turns them into post-resolution
/// `Body`s once the declaring overload's local name set is known.
#[derive(Debug, Clone)]
pub enum Statement {
	Include(Token),
	Category(Token),
	OperatorDef { format: Format, priority: i64, signature: Vec<SigSlot>, body: BodyPre },
}

/// Treats a `VecDeque<Token>` as a parseable stream.
pub trait TokenQueueFunctionality {
	fn peek(&self) -> Option<&Token>;
	fn pop_any(&mut self) -> Result<Token, Diagnostic>;
	fn expect(&mut self, kind: TokenKind) -> Result<Token, Diagnostic>;
	fn next_is(&self, kind: TokenKind) -> bool;
	fn current_position(&self) -> Option<Span>;
	fn has_next(&self) -> bool;
}

impl TokenQueueFunctionality for TokenQueue {
	fn peek(&self) -> Option<&Token> {
		self.front()
	}

	fn pop_any(&mut self) -> Result<Token, Diagnostic> {
		self.pop_front().ok_or_else(|| Diagnostic::new(Span::unknown(), Error::Parse(ParseError::UnexpectedEndOfInput)))
	}

	fn expect(&mut self, kind: TokenKind) -> Result<Token, Diagnostic> {
		let token = self.pop_any()?;
		if token.id == kind {
			return Ok(token);
		}
		let span = token.span;
		let error = match kind {
			TokenKind::Ident => ParseError::ExpectedIdentifier,
			TokenKind::RBrace => ParseError::UnmatchedBrace,
			_ => ParseError::UnexpectedToken { found: token.lexeme },
		};
		Err(Diagnostic::new(span, Error::Parse(error)))
	}

	fn next_is(&self, kind: TokenKind) -> bool {
		self.front().is_some_and(|token| token.id == kind)
	}

	fn current_position(&self) -> Option<Span> {
		self.front().map(|token| token.span)
	}

	fn has_next(&self) -> bool {
		!self.is_empty()
	}
}

fn is_declaration_starter(kind: TokenKind) -> bool {
	matches!(
		kind,
		TokenKind::Include
			| TokenKind::Category
			| TokenKind::FormatF
			| TokenKind::FormatFx
			| TokenKind::FormatFy
			| TokenKind::FormatXf
			| TokenKind::FormatYf
			| TokenKind::FormatXfx
			| TokenKind::FormatXfy
			| TokenKind::FormatYfx
	)
}

fn parse_signature(format: Format, queue: &mut TokenQueue) -> Result<Vec<SigSlot>, Diagnostic> {
	use crate::model::Arity;

	let mut slots = Vec::new();
	let name_slot = |queue: &mut TokenQueue| -> Result<SigSlot, Diagnostic> {
		let token = queue.expect(TokenKind::Ident)?;
		Ok(SigSlot::OperatorName(token))
	};
	let param_slot = |queue: &mut TokenQueue| -> Result<SigSlot, Diagnostic> { Ok(SigSlot::Param(pattern::parse_param_pattern(queue)?)) };

	match format.arity() {
		Arity::Nullary => slots.push(name_slot(queue)?),
		Arity::Prefix => {
			slots.push(name_slot(queue)?);
			slots.push(param_slot(queue)?);
		},
		Arity::Postfix => {
			slots.push(param_slot(queue)?);
			slots.push(name_slot(queue)?);
		},
		Arity::Binary => {
			slots.push(param_slot(queue)?);
			slots.push(name_slot(queue)?);
			slots.push(param_slot(queue)?);
		},
	}
	Ok(slots)
}

fn parse_operator_def(format_token: Token, queue: &mut TokenQueue) -> Result<Statement, Diagnostic> {
	let format = Format::from_token_kind(format_token.id)
		.ok_or_else(|| Diagnostic::new(format_token.span, Error::Parse(ParseError::UnexpectedToken { found: format_token.lexeme.clone() })))?;

	let priority_token = queue.expect(TokenKind::Num)?;
	let priority = priority_token
		.lexeme
		.parse::<i64>()
		.map_err(|_| Diagnostic::new(priority_token.span, Error::Parse(ParseError::ExpectedNumber)))?;

	let signature = parse_signature(format, queue)?;
	let body = body::parse_body(queue)?;

	Ok(Statement::OperatorDef { format, priority, signature, body })
}

/// Parses exactly one declaration from the front of `queue`. Returns `Ok(None)` only when the
/// queue is already empty.
pub fn parse_statement(queue: &mut TokenQueue) -> Result<Option<Statement>, Diagnostic> {
	let Some(token) = queue.peek().cloned() else {
		return Ok(None);
	};

	match token.id {
		TokenKind::Include => {
			queue.pop_any()?;
			let filename = queue.expect(TokenKind::Ident)?;
			Ok(Some(Statement::Include(filename)))
		},
		TokenKind::Category => {
			queue.pop_any()?;
			let name = queue.expect(TokenKind::Ident)?;
			Ok(Some(Statement::Category(name)))
		},
		kind if Format::from_token_kind(kind).is_some() => {
			queue.pop_any()?;
			parse_operator_def(token, queue).map(Some)
		},
		_ => Err(Diagnostic::new(token.span, Error::Parse(ParseError::UnexpectedToken { found: token.lexeme }))),
	}
}

/// Skips tokens until the next declaration-starter keyword or end of input (panic-mode recovery).
fn recover(queue: &mut TokenQueue) {
	while let Some(token) = queue.peek() {
		if is_declaration_starter(token.id) {
			break;
		}
		queue.pop_front();
	}
}

/// Parses every declaration out of `queue`, applying panic-mode recovery after each parse error
/// so one malformed declaration doesn't abort the rest of the file.
pub fn parse_program(queue: &mut TokenQueue) -> (Vec<Statement>, Diagnostics) {
	let mut statements = Vec::new();
	let mut diagnostics = Diagnostics::empty();

	loop {
		match parse_statement(queue) {
			Ok(Some(statement)) => statements.push(statement),
			Ok(None) => break,
			Err(diagnostic) => {
				diagnostics.push(diagnostic);
				recover(queue);
				if !queue.has_next() {
					break;
				}
			},
		}
	}

	(statements, diagnostics)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{api::context::Context, lexer::tokenize};

	fn parse(source: &str) -> (Vec<Statement>, Diagnostics) {
		let mut context = Context::new(".");
		let tokens = tokenize(source, &mut context);
		let mut queue: TokenQueue = tokens.into();
		parse_program(&mut queue)
	}

	#[test]
	fn parses_a_nullary_declaration() {
		let (statements, diagnostics) = parse("f 0 main\n  42");
		assert!(diagnostics.is_empty());
		assert_eq!(statements.len(), 1);
		assert!(matches!(&statements[0], Statement::OperatorDef { format: Format::F, priority: 0, .. }));
	}

	#[test]
	fn parses_a_binary_declaration_signature() {
		let (statements, diagnostics) = parse("xfx 500 X plus Y\n  X");
		assert!(diagnostics.is_empty());
		match &statements[0] {
			Statement::OperatorDef { signature, .. } => {
				assert_eq!(signature.len(), 3);
				assert!(matches!(signature[0], SigSlot::Param(Pattern::Named(_))));
				assert!(matches!(signature[1], SigSlot::OperatorName(_)));
				assert!(matches!(signature[2], SigSlot::Param(Pattern::Named(_))));
			},
			_ => panic!("expected an operator definition"),
		}
	}

	#[test]
	fn recovers_after_a_malformed_declaration() {
		let (statements, diagnostics) = parse("xfx 500\nf 0 main\n  1");
		assert!(!diagnostics.is_empty());
		assert_eq!(statements.len(), 1);
	}

	#[test]
	fn parses_include_and_category() {
		let (statements, diagnostics) = parse("include prelude\ncategory colors");
		assert!(diagnostics.is_empty());
		assert!(matches!(statements[0], Statement::Include(_)));
		assert!(matches!(statements[1], Statement::Category(_)));
	}
}
