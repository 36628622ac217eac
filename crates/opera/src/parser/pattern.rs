use crate::{
	api::diagnostics::{Diagnostic, Error, ParseError},
	lexer::TokenKind,
	model::Pattern,
	parser::{TokenQueue, TokenQueueFunctionality as _},
};

fn parse_int(lexeme: &str, span: crate::api::span::Span) -> Result<i64, Diagnostic> {
	lexeme.parse::<i64>().map_err(|_| Diagnostic::new(span, Error::Parse(ParseError::ExpectedNumber)))
}

/// Parses one `param_pat`: a bare `NUM`, a bare `IDENT`, or a brace group.
/// Used both at the top level of a signature slot and recursively for each element of a brace
/// group's comma list.
pub fn parse_param_pattern(queue: &mut TokenQueue) -> Result<Pattern, Diagnostic> {
	let token = queue.pop_any()?;
	match token.id {
		TokenKind::Num => Ok(Pattern::NumericLit(token.lexeme.clone(), parse_int(&token.lexeme, token.span)?)),
		TokenKind::Ident => Ok(Pattern::Named(token.lexeme)),
		TokenKind::LBrace => parse_brace_group(queue),
		_ => Err(Diagnostic::new(token.span, Error::Parse(ParseError::UnexpectedToken { found: token.lexeme }))),
	}
}

/// Parses the inside of a brace group:
/// - a single bare identifier becomes `Restricted`,
/// - a single bare number is a semantic error (numbers need no further restriction),
/// - two or more comma-separated elements fold right-associatively into `Pair`.
fn parse_brace_group(queue: &mut TokenQueue) -> Result<Pattern, Diagnostic> {
	let mut elements = Vec::new();
	let mut first_bare_ident = false;
	let mut first_bare_num: Option<(i64, crate::api::span::Span)> = None;

	loop {
		let is_bare_num = queue.next_is(TokenKind::Num);
		let is_bare_ident = queue.next_is(TokenKind::Ident);
		let span_before = queue.current_position();
		let pattern = parse_param_pattern(queue)?;
		if elements.is_empty() {
			first_bare_ident = is_bare_ident;
			if is_bare_num {
				if let Pattern::NumericLit(_, value) = &pattern {
					first_bare_num = Some((*value, span_before.unwrap_or_else(crate::api::span::Span::unknown)));
				}
			}
		}
		elements.push(pattern);

		if queue.next_is(TokenKind::Comma) {
			queue.pop_any()?;
			continue;
		}
		break;
	}

	queue.expect(TokenKind::RBrace)?;

	if elements.len() == 1 {
		if let Some((value, span)) = first_bare_num {
			return Err(Diagnostic::new(span, Error::Parse(ParseError::NumericParamCannotBeRestricted(value))));
		}
		if first_bare_ident {
			return match elements.into_iter().next().unwrap() {
				Pattern::Named(name) => Ok(Pattern::Restricted(name)),
				other => Ok(other),
			};
		}
		return Ok(elements.into_iter().next().unwrap());
	}

	let mut iter = elements.into_iter().rev();
	let mut accumulated = iter.next().expect("at least two elements were just checked");
	for pattern in iter {
		accumulated = Pattern::Pair(Box::new(pattern), Box::new(accumulated));
	}
	Ok(accumulated)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{api::context::Context, lexer::tokenize};

	fn patterns_from(source: &str) -> Pattern {
		let mut context = Context::new(".");
		let tokens = tokenize(source, &mut context);
		let mut queue: TokenQueue = tokens.into();
		parse_param_pattern(&mut queue).unwrap()
	}

	#[test]
	fn bare_identifier_is_named() {
		assert_eq!(patterns_from("X"), Pattern::Named("X".into()));
	}

	#[test]
	fn braced_identifier_is_restricted() {
		assert_eq!(patterns_from("{X}"), Pattern::Restricted("X".into()));
	}

	#[test]
	fn braced_number_is_an_error() {
		let mut context = Context::new(".");
		let tokens = tokenize("{0}", &mut context);
		let mut queue: TokenQueue = tokens.into();
		assert!(parse_param_pattern(&mut queue).is_err());
	}

	#[test]
	fn braced_list_folds_right_associatively() {
		let pattern = patterns_from("{a, b, c}");
		assert_eq!(
			pattern,
			Pattern::Pair(
				Box::new(Pattern::Named("a".into())),
				Box::new(Pattern::Pair(Box::new(Pattern::Named("b".into())), Box::new(Pattern::Named("c".into()))))
			)
		);
	}
}
