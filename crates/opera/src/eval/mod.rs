use crate::{
	api::diagnostics::EvalError,
	dispatch,
	model::{Body, VariableTable, Value},
	table::OperatorTable,
};

/// Walks a post-resolution body against a binding table, producing a `Value`.
/// `Sequence` and `Terminal` never reach here - the resolver's post-condition guarantees the tree
/// holds only post-resolution variants; seeing one would be an internal invariant violation, not
/// a user-facing error, but those variants simply have no constructor in [`Body`] at all, so
/// there is nothing to match here and nothing that can go wrong on that front.
pub fn eval(body: &Body, bindings: &VariableTable, table: &OperatorTable) -> Result<Value, EvalError> {
	match body {
		Body::Numeric(n) => Ok(Value::Num(*n)),
		Body::VarRef(name) => bindings.lookup(name).cloned().ok_or_else(|| EvalError::UnboundVariable(name.clone())),
		Body::Pair(a, b) => {
			let left = eval(a, bindings, table)?;
			let right = eval(b, bindings, table)?;
			Ok(Value::pair(left, right))
		},
		Body::NullaryCall(op_id) => dispatch::invoke_nullary(table, *op_id),
		Body::UnaryCall(op_id, arg) => {
			let argument = eval(arg, bindings, table)?;
			dispatch::invoke_unary(table, *op_id, argument)
		},
		Body::BinaryCall(op_id, left, right) => {
			let left_value = eval(left, bindings, table)?;
			let right_value = eval(right, bindings, table)?;
			dispatch::invoke_binary(table, *op_id, left_value, right_value)
		},
		Body::Native(native) => native(bindings),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{model::Pattern, table::OverloadPre};

	#[test]
	fn pair_evaluates_components_in_order() {
		let body = Body::Pair(Box::new(Body::Numeric(1)), Box::new(Body::Pair(Box::new(Body::Numeric(2)), Box::new(Body::Numeric(3)))));
		let value = eval(&body, &VariableTable::new(), &OperatorTable::new()).unwrap();
		assert_eq!(value, Value::pair(Value::Num(1), Value::pair(Value::Num(2), Value::Num(3))));
	}

	#[test]
	fn nullary_call_dispatches_through_the_table() {
		let mut table = OperatorTable::new();
		let id = table.register_overload("seven", crate::model::Format::F, 0, OverloadPre::Nullary(Body::Numeric(7))).unwrap();
		let value = eval(&Body::NullaryCall(id), &VariableTable::new(), &table).unwrap();
		assert_eq!(value, Value::Num(7));
	}

	#[test]
	fn unbound_variable_reference_is_reported() {
		let error = eval(&Body::VarRef("x".into()), &VariableTable::new(), &OperatorTable::new()).unwrap_err();
		assert!(matches!(error, EvalError::UnboundVariable(_)));
	}

	#[test]
	fn first_matching_overload_wins_value_dispatch() {
		let mut table = OperatorTable::new();
		let id = table
			.register_overload("fact", crate::model::Format::Xf, 300, OverloadPre::Postfix(Pattern::NumericLit("0".into(), 0), Body::Numeric(1)))
			.unwrap();
		table.register_overload("fact", crate::model::Format::Xf, 300, OverloadPre::Postfix(Pattern::Named("X".into()), Body::VarRef("X".into()))).unwrap();

		let value = eval(&Body::UnaryCall(id, Box::new(Body::Numeric(0))), &VariableTable::new(), &table).unwrap();
		assert_eq!(value, Value::Num(1));
	}
}
