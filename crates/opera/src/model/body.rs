use std::rc::Rc;

use crate::{
	api::diagnostics::EvalError,
	lexer::Token,
	model::{bindings::VariableTable, op_id::OpId, value::Value},
};

/// An operator body as the statement parser emits it: a flat, unresolved token sequence that the
/// sequence resolver (`crate::resolve`) has not yet seen.
#[derive(Debug, Clone)]
pub enum BodyPre {
	/// A non-empty sequence of sub-bodies to be resolved by the sequence resolver.
	Sequence(Vec<BodyPre>),
	/// A single token: an identifier, number, or string.
	Terminal(Token),
	/// Comma-separated bodies, either brace-grouped or top-level.
	Pair(Box<BodyPre>, Box<BodyPre>),
}

/// An operator body after the sequence resolver has run.
/// Invariant: a `Body` stored in the operator table never contains `Sequence` or `Terminal` -
/// those pre-resolution shapes have no counterpart here at all, by construction rather than by
/// runtime check.
#[derive(Clone)]
pub enum Body {
	Numeric(i64),
	VarRef(String),
	NullaryCall(OpId),
	UnaryCall(OpId, Box<Body>),
	BinaryCall(OpId, Box<Body>, Box<Body>),
	Pair(Box<Body>, Box<Body>),
	/// A host-installed operator body, a native-operator extension point.
	/// "Native operator hook". The evaluator dispatches it exactly like any other leaf.
	Native(Rc<dyn Fn(&VariableTable) -> Result<Value, EvalError>>),
}

impl std::fmt::Debug for Body {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Body::Numeric(n) => f.debug_tuple("Numeric").field(n).finish(),
			Body::VarRef(name) => f.debug_tuple("VarRef").field(name).finish(),
			Body::NullaryCall(id) => f.debug_tuple("NullaryCall").field(id).finish(),
			Body::UnaryCall(id, a) => f.debug_tuple("UnaryCall").field(id).field(a).finish(),
			Body::BinaryCall(id, l, r) => f.debug_tuple("BinaryCall").field(id).field(l).field(r).finish(),
			Body::Pair(l, r) => f.debug_tuple("Pair").field(l).field(r).finish(),
			Body::Native(_) => f.write_str("Native(..)"),
		}
	}
}
