use std::collections::HashMap;

use crate::model::value::Value;

/// The name-to-value map established when an overload's parameter patterns decompose the call's
/// actual arguments. Scoped to a single overload invocation;
/// never escapes it.
#[derive(Debug, Clone, Default)]
pub struct VariableTable(HashMap<String, Value>);

impl VariableTable {
	pub fn new() -> Self {
		VariableTable(HashMap::new())
	}

	pub fn lookup(&self, name: &str) -> Option<&Value> {
		self.0.get(name)
	}

	/// Binds `name` to `value`, enforcing the binding-merge discipline: a
	/// name bound twice within the same overload (possible when the same parameter name appears
	/// on both sides of a binary signature) must be bound to structurally equal values both
	/// times, or the whole overload is rejected.
	pub fn bind(&mut self, name: String, value: Value) -> Result<(), ()> {
		match self.0.get(&name) {
			Some(existing) if *existing != value => Err(()),
			_ => {
				self.0.insert(name, value);
				Ok(())
			},
		}
	}
}
