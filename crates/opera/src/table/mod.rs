use indexmap::IndexMap;

use crate::{
	api::diagnostics::DefinitionError,
	model::{Body, Format, OpId, Pattern},
};

pub struct NullaryOverload {
	pub body: Body,
}

pub struct UnaryOverload {
	pub pattern: Pattern,
	pub body: Body,
}

pub struct BinaryOverload {
	pub left: Pattern,
	pub right: Pattern,
	pub body: Body,
}

/// The data an `OperatorDef` contributes to its (name, arity) entry, once its body has been
/// resolved. Carries the `Format` along so the table can (re)derive operand-priority bounds.
pub enum OverloadPre {
	Nullary(Body),
	Prefix(Pattern, Body),
	Postfix(Pattern, Body),
	Binary(Pattern, Pattern, Body),
}

struct NullaryEntry {
	priority: i64,
	overloads: Vec<NullaryOverload>,
}

struct PrefixEntry {
	priority: i64,
	max_operand_priority: i64,
	overloads: Vec<UnaryOverload>,
}

struct PostfixEntry {
	priority: i64,
	max_operand_priority: i64,
	overloads: Vec<UnaryOverload>,
}

struct BinaryEntry {
	priority: i64,
	max_left_priority: i64,
	max_right_priority: i64,
	overloads: Vec<BinaryOverload>,
}

/// The operator/category registry: five insertion-ordered maps, one for
/// categories and one per operator arity. Threaded explicitly through the driver rather than
/// living behind a singleton, so independent programs can run against independent tables.
#[derive(Default)]
pub struct OperatorTable {
	categories: IndexMap<String, i64>,
	nullary: IndexMap<String, NullaryEntry>,
	prefix: IndexMap<String, PrefixEntry>,
	postfix: IndexMap<String, PostfixEntry>,
	binary: IndexMap<String, BinaryEntry>,
}

impl OperatorTable {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert_category(&mut self, name: &str) -> Result<(), DefinitionError> {
		if self.nullary.contains_key(name) {
			return Err(DefinitionError::NameConflict { name: name.to_owned() });
		}
		if !self.categories.contains_key(name) {
			let value = self.categories.len() as i64;
			self.categories.insert(name.to_owned(), value);
		}
		Ok(())
	}

	pub fn exists_category(&self, name: &str) -> bool {
		self.categories.contains_key(name)
	}

	pub fn category_value(&self, name: &str) -> Option<i64> {
		self.categories.get(name).copied()
	}

	pub fn exists_nullary(&self, name: &str) -> bool {
		self.nullary.contains_key(name)
	}

	pub fn exists_prefix(&self, name: &str) -> bool {
		self.prefix.contains_key(name)
	}

	pub fn exists_postfix(&self, name: &str) -> bool {
		self.postfix.contains_key(name)
	}

	pub fn exists_binary(&self, name: &str) -> bool {
		self.binary.contains_key(name)
	}

	pub fn category_names(&self) -> impl Iterator<Item = &str> {
		self.categories.keys().map(String::as_str)
	}

	pub fn nullary_names(&self) -> impl Iterator<Item = &str> {
		self.nullary.keys().map(String::as_str)
	}

	pub fn prefix_names(&self) -> impl Iterator<Item = &str> {
		self.prefix.keys().map(String::as_str)
	}

	pub fn postfix_names(&self) -> impl Iterator<Item = &str> {
		self.postfix.keys().map(String::as_str)
	}

	pub fn binary_names(&self) -> impl Iterator<Item = &str> {
		self.binary.keys().map(String::as_str)
	}

	pub fn priority_of_nullary(&self, name: &str) -> Option<i64> {
		self.nullary.get(name).map(|entry| entry.priority)
	}

	pub fn priority_of_prefix(&self, name: &str) -> Option<i64> {
		self.prefix.get(name).map(|entry| entry.priority)
	}

	pub fn priority_of_postfix(&self, name: &str) -> Option<i64> {
		self.postfix.get(name).map(|entry| entry.priority)
	}

	pub fn priority_of_binary(&self, name: &str) -> Option<i64> {
		self.binary.get(name).map(|entry| entry.priority)
	}

	pub fn max_prefix_operand_priority(&self, name: &str) -> Option<i64> {
		self.prefix.get(name).map(|entry| entry.max_operand_priority)
	}

	pub fn max_postfix_operand_priority(&self, name: &str) -> Option<i64> {
		self.postfix.get(name).map(|entry| entry.max_operand_priority)
	}

	pub fn max_left_operand_priority(&self, name: &str) -> Option<i64> {
		self.binary.get(name).map(|entry| entry.max_left_priority)
	}

	pub fn max_right_operand_priority(&self, name: &str) -> Option<i64> {
		self.binary.get(name).map(|entry| entry.max_right_priority)
	}

	pub fn resolve_nullary(&self, name: &str) -> Option<OpId> {
		self.nullary.get_index_of(name).map(OpId::Nullary)
	}

	pub fn resolve_prefix(&self, name: &str) -> Option<OpId> {
		self.prefix.get_index_of(name).map(OpId::Prefix)
	}

	pub fn resolve_postfix(&self, name: &str) -> Option<OpId> {
		self.postfix.get_index_of(name).map(OpId::Postfix)
	}

	pub fn resolve_binary(&self, name: &str) -> Option<OpId> {
		self.binary.get_index_of(name).map(OpId::Binary)
	}

	pub fn last_registered_nullary(&self) -> Option<OpId> {
		if self.nullary.is_empty() {
			None
		} else {
			Some(OpId::Nullary(self.nullary.len() - 1))
		}
	}

	pub fn nullary_overloads(&self, id: OpId) -> &[NullaryOverload] {
		match id {
			OpId::Nullary(index) => &self.nullary.get_index(index).expect("stale OpId").1.overloads,
			_ => unreachable!("OpId arity mismatch: expected Nullary"),
		}
	}

	pub fn prefix_overloads(&self, id: OpId) -> &[UnaryOverload] {
		match id {
			OpId::Prefix(index) => &self.prefix.get_index(index).expect("stale OpId").1.overloads,
			_ => unreachable!("OpId arity mismatch: expected Prefix"),
		}
	}

	pub fn postfix_overloads(&self, id: OpId) -> &[UnaryOverload] {
		match id {
			OpId::Postfix(index) => &self.postfix.get_index(index).expect("stale OpId").1.overloads,
			_ => unreachable!("OpId arity mismatch: expected Postfix"),
		}
	}

	pub fn binary_overloads(&self, id: OpId) -> &[BinaryOverload] {
		match id {
			OpId::Binary(index) => &self.binary.get_index(index).expect("stale OpId").1.overloads,
			_ => unreachable!("OpId arity mismatch: expected Binary"),
		}
	}

	/// The single insertion point for every operator declaration. Rules, in
	/// order: a nullary name must not already be a category; a pre-existing entry's priority and
	/// derived operand bounds must match exactly; the overload is then appended, so insertion
	/// order is preserved as evaluation-selection order.
	pub fn register_overload(&mut self, name: &str, format: Format, priority: i64, overload: OverloadPre) -> Result<OpId, DefinitionError> {
		match overload {
			OverloadPre::Nullary(body) => {
				if self.categories.contains_key(name) {
					return Err(DefinitionError::NameConflict { name: name.to_owned() });
				}
				let entry = self.nullary.entry(name.to_owned()).or_insert_with(|| NullaryEntry { priority, overloads: Vec::new() });
				if entry.priority != priority {
					return Err(DefinitionError::PriorityConflict { name: name.to_owned(), existing: entry.priority, attempted: priority });
				}
				entry.overloads.push(NullaryOverload { body });
				Ok(OpId::Nullary(self.nullary.get_index_of(name).expect("entry was just inserted")))
			},
			OverloadPre::Prefix(pattern, body) => {
				let bound = format.max_prefix_operand_priority(priority);
				let existed = self.prefix.contains_key(name);
				let entry = self
					.prefix
					.entry(name.to_owned())
					.or_insert_with(|| PrefixEntry { priority, max_operand_priority: bound, overloads: Vec::new() });
				if existed {
					if entry.priority != priority {
						return Err(DefinitionError::PriorityConflict { name: name.to_owned(), existing: entry.priority, attempted: priority });
					}
					if entry.max_operand_priority != bound {
						return Err(DefinitionError::FormatConflict { name: name.to_owned() });
					}
				}
				entry.overloads.push(UnaryOverload { pattern, body });
				Ok(OpId::Prefix(self.prefix.get_index_of(name).expect("entry was just inserted")))
			},
			OverloadPre::Postfix(pattern, body) => {
				let bound = format.max_postfix_operand_priority(priority);
				let existed = self.postfix.contains_key(name);
				let entry = self
					.postfix
					.entry(name.to_owned())
					.or_insert_with(|| PostfixEntry { priority, max_operand_priority: bound, overloads: Vec::new() });
				if existed {
					if entry.priority != priority {
						return Err(DefinitionError::PriorityConflict { name: name.to_owned(), existing: entry.priority, attempted: priority });
					}
					if entry.max_operand_priority != bound {
						return Err(DefinitionError::FormatConflict { name: name.to_owned() });
					}
				}
				entry.overloads.push(UnaryOverload { pattern, body });
				Ok(OpId::Postfix(self.postfix.get_index_of(name).expect("entry was just inserted")))
			},
			OverloadPre::Binary(left, right, body) => {
				let left_bound = format.max_left_operand_priority(priority);
				let right_bound = format.max_right_operand_priority(priority);
				let existed = self.binary.contains_key(name);
				let entry = self.binary.entry(name.to_owned()).or_insert_with(|| BinaryEntry {
					priority,
					max_left_priority: left_bound,
					max_right_priority: right_bound,
					overloads: Vec::new(),
				});
				if existed {
					if entry.priority != priority {
						return Err(DefinitionError::PriorityConflict { name: name.to_owned(), existing: entry.priority, attempted: priority });
					}
					if entry.max_left_priority != left_bound || entry.max_right_priority != right_bound {
						return Err(DefinitionError::FormatConflict { name: name.to_owned() });
					}
				}
				entry.overloads.push(BinaryOverload { left, right, body });
				Ok(OpId::Binary(self.binary.get_index_of(name).expect("entry was just inserted")))
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn dummy_body() -> Body {
		Body::Numeric(0)
	}

	#[test]
	fn category_colliding_with_nullary_name_is_rejected() {
		let mut table = OperatorTable::new();
		table.register_overload("main", Format::F, 0, OverloadPre::Nullary(dummy_body())).unwrap();
		assert!(matches!(table.insert_category("main"), Err(DefinitionError::NameConflict { .. })));
	}

	#[test]
	fn nullary_colliding_with_category_name_is_rejected() {
		let mut table = OperatorTable::new();
		table.insert_category("red").unwrap();
		assert!(matches!(
			table.register_overload("red", Format::F, 0, OverloadPre::Nullary(dummy_body())),
			Err(DefinitionError::NameConflict { .. })
		));
	}

	#[test]
	fn conflicting_priority_on_redeclaration_is_rejected() {
		let mut table = OperatorTable::new();
		table
			.register_overload("plus", Format::Xfx, 500, OverloadPre::Binary(Pattern::Named("X".into()), Pattern::Named("Y".into()), dummy_body()))
			.unwrap();
		assert!(matches!(
			table.register_overload("plus", Format::Xfx, 400, OverloadPre::Binary(Pattern::Named("X".into()), Pattern::Named("Y".into()), dummy_body())),
			Err(DefinitionError::PriorityConflict { .. })
		));
	}

	#[test]
	fn conflicting_format_at_same_priority_is_rejected() {
		let mut table = OperatorTable::new();
		table.register_overload("fact", Format::Xf, 300, OverloadPre::Postfix(Pattern::Named("X".into()), dummy_body())).unwrap();
		assert!(matches!(
			table.register_overload("fact", Format::Yf, 300, OverloadPre::Postfix(Pattern::Named("X".into()), dummy_body())),
			Err(DefinitionError::FormatConflict { .. })
		));
	}

	#[test]
	fn overloads_accumulate_in_insertion_order() {
		let mut table = OperatorTable::new();
		let id1 = table
			.register_overload("fact", Format::Xf, 300, OverloadPre::Postfix(Pattern::NumericLit("0".into(), 0), dummy_body()))
			.unwrap();
		let id2 = table.register_overload("fact", Format::Xf, 300, OverloadPre::Postfix(Pattern::Named("X".into()), dummy_body())).unwrap();
		assert_eq!(id1, id2);
		assert_eq!(table.postfix_overloads(id1).len(), 2);
	}
}
