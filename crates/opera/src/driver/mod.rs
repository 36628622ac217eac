use std::{collections::HashSet, rc::Rc};

use crate::{
	api::{
		context::Context,
		diagnostics::{Diagnostic, Error, EvalError},
		span::Span,
	},
	lexer::tokenize,
	model::{Arity, Body, Format, Pattern, Value},
	parser::{parse_program, Statement, TokenQueue},
	resolve::resolve_body,
	table::{OperatorTable, OverloadPre},
};

/// Threads declarations through parse → resolve → register, handling `include` by pushing a
/// nested parser over the named file. Owns the single `OperatorTable` that
/// accumulates across however many files a run touches.
pub struct Driver {
	table: OperatorTable,
}

impl Driver {
	pub fn new() -> Self {
		Driver { table: OperatorTable::new() }
	}

	pub fn table(&self) -> &OperatorTable {
		&self.table
	}

	/// Registers a host-implemented binary numeric operator under `Restricted` `X`/`Y` patterns:
	/// the embedder supplies only the arithmetic, and this wires it to a `Body::Native` overload
	/// under the two-restricted-parameter shape every native binary numeric operator uses.
	pub fn register_native_binary(&mut self, name: &str, format: Format, priority: i64, f: impl Fn(i64, i64) -> i64 + 'static) -> Result<(), Diagnostic> {
		let f = Rc::new(f);
		let body = Body::Native(Rc::new(move |bindings: &crate::model::VariableTable| {
			let x = bindings.lookup("X").and_then(Value::as_num).ok_or_else(|| EvalError::UnboundVariable("X".to_owned()))?;
			let y = bindings.lookup("Y").and_then(Value::as_num).ok_or_else(|| EvalError::UnboundVariable("Y".to_owned()))?;
			Ok(Value::Num(f(x, y)))
		}));
		let overload = OverloadPre::Binary(Pattern::Restricted("X".into()), Pattern::Restricted("Y".into()), body);
		self.table.register_overload(name, format, priority, overload).map_err(|error| Diagnostic::new(Span::unknown(), Error::Definition(error)))?;
		Ok(())
	}

	fn register_operator_def(&mut self, format: Format, priority: i64, signature: Vec<crate::parser::SigSlot>, body: crate::model::BodyPre) -> Result<(), Diagnostic> {
		use crate::parser::SigSlot;

		let mut locals = HashSet::new();
		let mut patterns = Vec::new();
		let mut name = None;
		for slot in signature {
			match slot {
				SigSlot::OperatorName(token) => name = Some(token.lexeme),
				SigSlot::Param(pattern) => {
					pattern.collect_names(&mut locals);
					patterns.push(pattern);
				},
			}
		}
		let name = name.expect("every signature shape contains exactly one operator-name slot");

		let resolved_body = resolve_body(&body, &locals, &self.table)?;

		let overload = match format.arity() {
			Arity::Nullary => OverloadPre::Nullary(resolved_body),
			Arity::Prefix => OverloadPre::Prefix(patterns.remove(0), resolved_body),
			Arity::Postfix => OverloadPre::Postfix(patterns.remove(0), resolved_body),
			Arity::Binary => OverloadPre::Binary(patterns.remove(0), patterns.remove(0), resolved_body),
		};

		self.table.register_overload(&name, format, priority, overload).map_err(|error| Diagnostic::new(Span::unknown(), Error::Definition(error)))?;
		Ok(())
	}

	/// Processes a declaration stream already produced by the statement parser. Returns `true` if
	/// processing should stop: a semantic error occurred and `abort_on_error` is set (the `--run`
	/// policy for `--run`; other modes pass `false` and keep going after recording the error).
	pub fn process_program(&mut self, statements: Vec<Statement>, context: &mut Context, abort_on_error: bool) -> bool {
		for statement in statements {
			match statement {
				Statement::Include(token) => {
					if self.process_include(&token, context, abort_on_error) {
						return true;
					}
				},
				Statement::Category(token) => {
					if let Err(error) = self.table.insert_category(&token.lexeme) {
						context.add_diagnostic(Diagnostic::new(token.span, Error::Definition(error)));
						if abort_on_error {
							return true;
						}
					}
				},
				Statement::OperatorDef { format, priority, signature, body } => {
					if let Err(diagnostic) = self.register_operator_def(format, priority, signature, body) {
						context.add_diagnostic(diagnostic);
						if abort_on_error {
							return true;
						}
					}
				},
			}
		}
		false
	}

	fn process_include(&mut self, token: &crate::lexer::Token, context: &mut Context, abort_on_error: bool) -> bool {
		let path = context.resolve_include(&token.lexeme);

		if context.push_include(path.clone()).is_err() {
			context.add_diagnostic(Diagnostic::new(token.span, Error::Internal(crate::api::diagnostics::InvariantViolation(format!("circular include of \"{}\"", token.lexeme)))));
			return abort_on_error;
		}

		let source = match std::fs::read_to_string(&path) {
			Ok(source) => source,
			Err(_) => {
				context.pop_include();
				context.add_diagnostic(Diagnostic::new(token.span, Error::Internal(crate::api::diagnostics::InvariantViolation(format!("could not read include file \"{}\"", token.lexeme)))));
				return abort_on_error;
			},
		};

		let tokens = tokenize(&source, context);
		let mut queue: TokenQueue = tokens.into();
		let (nested_statements, diagnostics) = parse_program(&mut queue);
		for diagnostic in diagnostics.into_vec() {
			context.add_diagnostic(diagnostic);
		}

		let stop = self.process_program(nested_statements, context, abort_on_error);
		context.pop_include();
		stop
	}
}

impl Default for Driver {
	fn default() -> Self {
		Self::new()
	}
}
