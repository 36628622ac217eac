use std::collections::HashSet;

use crate::{
	api::{
		diagnostics::{Diagnostic, Error, ResolveError},
		span::Span,
	},
	lexer::TokenKind,
	model::{Body, BodyPre},
	table::OperatorTable,
};

fn as_bare_ident(item: &BodyPre) -> Option<&str> {
	match item {
		BodyPre::Terminal(token) if token.id == TokenKind::Ident => Some(&token.lexeme),
		_ => None,
	}
}

fn is_brace_group(item: &BodyPre) -> bool {
	matches!(item, BodyPre::Sequence(_) | BodyPre::Pair(..))
}

/// Resolves a single flat-sequence item as an atom: either by the `Terminal`-resolution rules
/// (resolving a bare `Terminal`), or - if the item is itself a brace-grouped
/// sub-body - by recursing the whole pipeline on it. Brace groups have exactly one possible role
/// (an operand), so a failure resolving one is fatal and propagates immediately rather than
/// merely marking the enclosing cell invalid.
fn resolve_atom(item: &BodyPre, locals: &HashSet<String>, table: &OperatorTable) -> Result<Option<Body>, Diagnostic> {
	match item {
		BodyPre::Terminal(token) => match token.id {
			TokenKind::Num => {
				// The lexer only ever produces digit runs here; a too-long run just saturates
				// rather than failing, since there is no dedicated overflow diagnostic.
				let value = token.lexeme.parse::<i64>().unwrap_or(i64::MAX);
				Ok(Some(Body::Numeric(value)))
			},
			TokenKind::Ident => {
				if locals.contains(&token.lexeme) {
					Ok(Some(Body::VarRef(token.lexeme.clone())))
				} else if let Some(id) = table.resolve_nullary(&token.lexeme) {
					Ok(Some(Body::NullaryCall(id)))
				} else {
					// Might still be consumed as an operator name by the caller; not fatal here.
					Ok(None)
				}
			},
			TokenKind::Str => Err(Diagnostic::new(token.span, Error::Resolve(ResolveError::Unsupported))),
			_ => Err(Diagnostic::new(token.span, Error::Internal(crate::api::diagnostics::InvariantViolation(format!("unexpected token kind {:?} in body position", token.id))))),
		},
		BodyPre::Sequence(_) | BodyPre::Pair(..) => resolve_body(item, locals, table).map(Some),
	}
}

/// One cell of the CYK table: at most one valid resolution, or a flag marking it ambiguous
/// (the "decline to guess" ambiguity policy).
#[derive(Clone)]
struct Cell {
	result: Option<(Body, i64)>,
	ambiguous: bool,
}

impl Cell {
	fn empty() -> Self {
		Cell { result: None, ambiguous: false }
	}

	/// Offers a newly-formed candidate to this cell. A second distinct candidate for the same
	/// span makes the cell permanently ambiguous: the resolver declines to guess.
	fn offer(&mut self, body: Body, priority: i64) {
		if self.ambiguous {
			return;
		}
		if self.result.is_some() {
			self.ambiguous = true;
			self.result = None;
		} else {
			self.result = Some((body, priority));
		}
	}
}

/// Resolves a flat token/sub-body sequence into a single expression tree, via a priority-gated
/// CYK algorithm.
fn resolve_sequence(items: &[BodyPre], locals: &HashSet<String>, table: &OperatorTable) -> Result<Body, Diagnostic> {
	let n = items.len();
	if n == 0 {
		return Err(Diagnostic::new(Span::unknown(), Error::Resolve(ResolveError::EmptyBody)));
	}

	let mut cells = vec![vec![Cell::empty(); n]; n];
	let mut saw_non_atomic_name = false;

	for i in 0..n {
		if let Some(body) = resolve_atom(&items[i], locals, table)? {
			cells[i][i].offer(body, 0);
		}
	}

	for d in 1..n {
		for i in 0..=(n - 1 - d) {
			let j = i + d;

			// Attempt 1: prefix application.
			if let Some(name) = as_bare_ident(&items[i]) {
				if let Some(op_id) = table.resolve_prefix(name) {
					let bound = table.max_prefix_operand_priority(name).expect("entry exists since resolve_prefix succeeded");
					if let Some((operand, operand_priority)) = &cells[i + 1][j].result {
						if !cells[i + 1][j].ambiguous && *operand_priority <= bound {
							let priority = table.priority_of_prefix(name).expect("entry exists");
							let body = Body::UnaryCall(op_id, Box::new(operand.clone()));
							cells[i][j].offer(body, priority);
						}
					}
				}
			} else if is_brace_group(&items[i]) {
				saw_non_atomic_name = true;
			}

			// Attempt 2: postfix application.
			if let Some(name) = as_bare_ident(&items[j]) {
				if let Some(op_id) = table.resolve_postfix(name) {
					let bound = table.max_postfix_operand_priority(name).expect("entry exists since resolve_postfix succeeded");
					if let Some((operand, operand_priority)) = &cells[i][j - 1].result {
						if !cells[i][j - 1].ambiguous && *operand_priority <= bound {
							let priority = table.priority_of_postfix(name).expect("entry exists");
							let body = Body::UnaryCall(op_id, Box::new(operand.clone()));
							cells[i][j].offer(body, priority);
						}
					}
				}
			} else if is_brace_group(&items[j]) {
				saw_non_atomic_name = true;
			}

			// Attempt 3: binary split.
			for k in (i + 1)..j {
				if let Some(name) = as_bare_ident(&items[k]) {
					if let Some(op_id) = table.resolve_binary(name) {
						let left_bound = table.max_left_operand_priority(name).expect("entry exists since resolve_binary succeeded");
						let right_bound = table.max_right_operand_priority(name).expect("entry exists");
						let left_cell = &cells[i][k - 1];
						let right_cell = &cells[k + 1][j];
						if let (Some((left, left_priority)), Some((right, right_priority))) = (&left_cell.result, &right_cell.result) {
							if !left_cell.ambiguous && !right_cell.ambiguous && *left_priority <= left_bound && *right_priority <= right_bound {
								let priority = table.priority_of_binary(name).expect("entry exists");
								let body = Body::BinaryCall(op_id, Box::new(left.clone()), Box::new(right.clone()));
								cells[i][j].offer(body, priority);
							}
						}
					}
				} else if is_brace_group(&items[k]) {
					saw_non_atomic_name = true;
				}
			}
		}
	}

	let top = &cells[0][n - 1];
	if top.ambiguous {
		return Err(Diagnostic::new(Span::unknown(), Error::Resolve(ResolveError::AmbiguousExpression)));
	}
	match &top.result {
		Some((body, _)) => Ok(body.clone()),
		None if saw_non_atomic_name => Err(Diagnostic::new(Span::unknown(), Error::Resolve(ResolveError::NonAtomicToken))),
		None => {
			if n == 1 {
				if let Some(name) = as_bare_ident(&items[0]) {
					return Err(Diagnostic::new(Span::unknown(), Error::Resolve(ResolveError::UnresolvedName(name.to_owned()))));
				}
			}
			Err(Diagnostic::new(Span::unknown(), Error::Resolve(ResolveError::UnparsableExpression)))
		},
	}
}

/// Resolves a pre-resolution body into its post-resolution form. `Pair` nodes
/// recurse on each component; `Terminal` and `Sequence` nodes are handed to atom resolution and
/// the CYK sequence resolver respectively.
pub fn resolve_body(body: &BodyPre, locals: &HashSet<String>, table: &OperatorTable) -> Result<Body, Diagnostic> {
	match body {
		BodyPre::Pair(a, b) => {
			let left = resolve_body(a, locals, table)?;
			let right = resolve_body(b, locals, table)?;
			Ok(Body::Pair(Box::new(left), Box::new(right)))
		},
		BodyPre::Terminal(_) => resolve_atom(body, locals, table)?.ok_or_else(|| match body {
			BodyPre::Terminal(token) => Diagnostic::new(token.span, Error::Resolve(ResolveError::UnresolvedName(token.lexeme.clone()))),
			_ => unreachable!(),
		}),
		BodyPre::Sequence(items) => resolve_sequence(items, locals, table),
	}
}
