/// A runtime value: a numeric leaf, or a pair of values. Values are purely
/// functional - once built, a `Value` never mutates; `Clone` is a deep structural copy, cheap
/// enough here since pair trees built from source literals stay small.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
	Num(i64),
	Pair(Box<Value>, Box<Value>),
}

impl Value {
	pub fn pair(left: Value, right: Value) -> Self {
		Value::Pair(Box::new(left), Box::new(right))
	}

	pub const fn as_num(&self) -> Option<i64> {
		match self {
			Value::Num(n) => Some(*n),
			Value::Pair(..) => None,
		}
	}
}

impl std::fmt::Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Num(n) => write!(f, "{n}"),
			Value::Pair(left, right) => write!(f, "({left}, {right})"),
		}
	}
}
