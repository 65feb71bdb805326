//! Structural kinds of dynamically typed values.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shape of a [`Value`], used for type rules and mismatch reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
	Null,
	Boolean,
	Integer,
	Float,
	String,
	List,
	Dictionary,
}

impl ValueKind {
	/// Classifies a value. Numbers representable as `i64`/`u64` are integers.
	pub fn of(value: &Value) -> Self {
		match value {
			Value::Null => Self::Null,
			Value::Bool(_) => Self::Boolean,
			Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
			Value::Number(_) => Self::Float,
			Value::String(_) => Self::String,
			Value::Array(_) => Self::List,
			Value::Object(_) => Self::Dictionary,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Boolean => "boolean",
			Self::Integer => "integer",
			Self::Float => "float",
			Self::String => "string",
			Self::List => "list",
			Self::Dictionary => "dictionary",
		}
	}
}

impl fmt::Display for ValueKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
