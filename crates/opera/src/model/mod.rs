pub mod bindings;
pub mod body;
pub mod format;
pub mod op_id;
pub mod pattern;
pub mod value;

pub use bindings::VariableTable;
pub use body::{Body, BodyPre};
pub use format::{Arity, Format};
pub use op_id::OpId;
pub use pattern::Pattern;
pub use value::Value;
