use crate::{
	api::diagnostics::{Diagnostic, Error, ParseError},
	lexer::TokenKind,
	model::BodyPre,
	parser::{TokenQueue, TokenQueueFunctionality as _},
};

fn is_body_item_start(kind: TokenKind) -> bool {
	matches!(kind, TokenKind::Num | TokenKind::Ident | TokenKind::Str | TokenKind::LBrace)
}

/// Parses `body_item+`: a maximal run of numbers, identifiers, strings, and brace-grouped
/// sub-bodies, stopping at a comma, a closing brace, a fresh declaration
/// keyword, or end of input.
fn parse_body_items(queue: &mut TokenQueue) -> Result<Vec<BodyPre>, Diagnostic> {
	let mut items = Vec::new();
	while let Some(token) = queue.peek() {
		if token.id == TokenKind::LBrace {
			queue.pop_any()?;
			let inner = parse_body(queue)?;
			queue.expect(TokenKind::RBrace)?;
			items.push(inner);
			continue;
		}
		if is_body_item_start(token.id) {
			items.push(BodyPre::Terminal(queue.pop_any()?));
			continue;
		}
		break;
	}
	if items.is_empty() {
		let span = queue.current_position().unwrap_or_else(crate::api::span::Span::unknown);
		return Err(Diagnostic::new(span, Error::Parse(ParseError::EmptyBody)));
	}
	Ok(items)
}

/// Parses `body ::= body_item+ ("," body)?`, folding top-level (and brace-level) commas
/// right-associatively into `BodyPre::Pair`.
pub fn parse_body(queue: &mut TokenQueue) -> Result<BodyPre, Diagnostic> {
	let items = parse_body_items(queue)?;
	let head = if items.len() == 1 {
		items.into_iter().next().expect("length was just checked to be 1")
	} else {
		BodyPre::Sequence(items)
	};

	if queue.next_is(TokenKind::Comma) {
		queue.pop_any()?;
		let rest = parse_body(queue)?;
		Ok(BodyPre::Pair(Box::new(head), Box::new(rest)))
	} else {
		Ok(head)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{api::context::Context, lexer::tokenize};

	fn body_of(source: &str) -> BodyPre {
		let mut context = Context::new(".");
		let tokens = tokenize(source, &mut context);
		let mut queue: TokenQueue = tokens.into();
		parse_body(&mut queue).unwrap()
	}

	#[test]
	fn single_item_body_is_not_wrapped_in_a_sequence() {
		assert!(matches!(body_of("42"), BodyPre::Terminal(_)));
	}

	#[test]
	fn multi_item_body_becomes_a_sequence() {
		assert!(matches!(body_of("3 plus 4"), BodyPre::Sequence(items) if items.len() == 3));
	}

	#[test]
	fn top_level_commas_build_right_associative_pairs() {
		let body = body_of("1, 2, 3");
		match body {
			BodyPre::Pair(a, rest) => {
				assert!(matches!(*a, BodyPre::Terminal(_)));
				assert!(matches!(*rest, BodyPre::Pair(..)));
			},
			_ => panic!("expected a Pair"),
		}
	}

	#[test]
	fn braces_group_a_forced_atomic_sub_body() {
		let body = body_of("{1 plus 2} times 3");
		assert!(matches!(body, BodyPre::Sequence(items) if items.len() == 3));
	}
}
