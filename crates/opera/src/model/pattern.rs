use std::collections::HashSet;

use crate::{
	api::diagnostics::EvalError,
	model::{bindings::VariableTable, value::Value},
};

/// A parameter pattern from an operator signature. Drives both compile-time
/// local-name collection and runtime argument decomposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
	/// Binds any value to `name`.
	Named(String),
	/// Like `Named`, but the matched value must be a numeric leaf.
	Restricted(String),
	/// Matches only the numeric leaf equal to `value`; binds nothing. `name` is carried for
	/// diagnostics/display parity with the source signature even though it never binds.
	NumericLit(String, i64),
	/// Matches a pair value whose components match `p1` and `p2` respectively.
	Pair(Box<Pattern>, Box<Pattern>),
}

impl Pattern {
	/// The set of names this pattern binds, used to build an overload's local name set.
	pub fn collect_names(&self, names: &mut HashSet<String>) {
		match self {
			Pattern::Named(name) | Pattern::Restricted(name) => {
				names.insert(name.clone());
			},
			Pattern::NumericLit(..) => {},
			Pattern::Pair(p1, p2) => {
				p1.collect_names(names);
				p2.collect_names(names);
			},
		}
	}

	/// Matches `value` against this pattern, writing any bindings into `bindings`. Per
	/// the corrected (non-buggy) decomposition rule, a `Pair` pattern recurses into each
	/// component of a `Value::Pair` separately - `p1` only ever sees `v1`, `p2` only ever sees
	/// `v2` - unlike the source this was distilled from, which passed the whole undecomposed
	/// value to both sub-patterns.
	pub fn decompose(&self, value: &Value, bindings: &mut VariableTable) -> Result<(), EvalError> {
		match self {
			Pattern::Named(name) => bindings
				.bind(name.clone(), value.clone())
				.map_err(|()| EvalError::RebindingMismatch { name: name.clone() }),
			Pattern::Restricted(name) => {
				if value.as_num().is_none() {
					return Err(EvalError::ExpectedNumeric);
				}
				bindings
					.bind(name.clone(), value.clone())
					.map_err(|()| EvalError::RebindingMismatch { name: name.clone() })
			},
			Pattern::NumericLit(_, expected) => match value.as_num() {
				Some(found) if found == *expected => Ok(()),
				Some(found) => Err(EvalError::NumericValueMismatch { expected: *expected, found }),
				None => Err(EvalError::ExpectedNumeric),
			},
			Pattern::Pair(p1, p2) => match value {
				Value::Pair(v1, v2) => {
					p1.decompose(v1, bindings)?;
					p2.decompose(v2, bindings)
				},
				Value::Num(_) => Err(EvalError::PatternShapeMismatch),
			},
		}
	}
}

impl std::fmt::Display for Pattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Pattern::Named(name) => write!(f, "{name}"),
			Pattern::Restricted(name) => write!(f, "{{{name}}}"),
			Pattern::NumericLit(_, value) => write!(f, "{value}"),
			Pattern::Pair(p1, p2) => write!(f, "{{{p1}, {p2}}}"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pair_pattern_recurses_into_each_component_not_the_whole_value() {
		let pattern = Pattern::Pair(Box::new(Pattern::Named("a".into())), Box::new(Pattern::Named("b".into())));
		let value = Value::pair(Value::Num(1), Value::Num(2));
		let mut bindings = VariableTable::new();
		pattern.decompose(&value, &mut bindings).unwrap();
		assert_eq!(bindings.lookup("a"), Some(&Value::Num(1)));
		assert_eq!(bindings.lookup("b"), Some(&Value::Num(2)));
	}

	#[test]
	fn rebinding_the_same_name_to_a_different_value_fails() {
		let pattern = Pattern::Pair(Box::new(Pattern::Named("x".into())), Box::new(Pattern::Named("x".into())));
		let value = Value::pair(Value::Num(1), Value::Num(2));
		let mut bindings = VariableTable::new();
		assert!(pattern.decompose(&value, &mut bindings).is_err());
	}

	#[test]
	fn numeric_literal_pattern_binds_nothing() {
		let pattern = Pattern::NumericLit("k".into(), 0);
		let mut bindings = VariableTable::new();
		pattern.decompose(&Value::Num(0), &mut bindings).unwrap();
		assert_eq!(bindings.lookup("k"), None);
	}
}
