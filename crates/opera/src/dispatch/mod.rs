use crate::{
	api::diagnostics::EvalError,
	eval::eval,
	model::{OpId, VariableTable, Value},
	table::OperatorTable,
};

/// Invokes a nullary operator: there is nothing to decompose, so the first registered overload
/// always wins: overloads are tried in insertion order.
pub fn invoke_nullary(table: &OperatorTable, op_id: OpId) -> Result<Value, EvalError> {
	let overloads = table.nullary_overloads(op_id);
	let overload = overloads.first().ok_or_else(|| EvalError::NoMatchingOverload { name: "<nullary>".to_owned() })?;
	eval(&overload.body, &VariableTable::new(), table)
}

pub fn invoke_unary(table: &OperatorTable, op_id: OpId, argument: Value) -> Result<Value, EvalError> {
	let overloads = match op_id {
		OpId::Prefix(_) => table.prefix_overloads(op_id),
		OpId::Postfix(_) => table.postfix_overloads(op_id),
		_ => unreachable!("invoke_unary called with a non-unary OpId"),
	};

	for overload in overloads {
		let mut bindings = VariableTable::new();
		if overload.pattern.decompose(&argument, &mut bindings).is_ok() {
			return eval(&overload.body, &bindings, table);
		}
	}
	Err(EvalError::NoMatchingOverload { name: "<unary>".to_owned() })
}

pub fn invoke_binary(table: &OperatorTable, op_id: OpId, left: Value, right: Value) -> Result<Value, EvalError> {
	for overload in table.binary_overloads(op_id) {
		let mut bindings = VariableTable::new();
		let matched = overload.left.decompose(&left, &mut bindings).is_ok() && overload.right.decompose(&right, &mut bindings).is_ok();
		if matched {
			return eval(&overload.body, &bindings, table);
		}
	}
	Err(EvalError::NoMatchingOverload { name: "<binary>".to_owned() })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{model::{Format, Pattern}, table::OverloadPre};

	#[test]
	fn binary_dispatch_enforces_the_binding_merge_discipline() {
		let mut table = OperatorTable::new();
		// same(X, X) only succeeds when both sides are equal.
		let id = table
			.register_overload("same", Format::Xfx, 700, OverloadPre::Binary(Pattern::Named("X".into()), Pattern::Named("X".into()), body_numeric_one()))
			.unwrap();

		assert_eq!(invoke_binary(&table, id, Value::Num(3), Value::Num(3)), Ok(Value::Num(1)));
		assert!(invoke_binary(&table, id, Value::Num(3), Value::Num(4)).is_err());
	}

	fn body_numeric_one() -> crate::model::Body {
		crate::model::Body::Numeric(1)
	}
}
