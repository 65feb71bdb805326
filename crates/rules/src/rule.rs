//! The [`Rule`] contract and its built-in variants.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::TypeMismatch;
use crate::kind::ValueKind;

/// A schema constraint evaluated against a structured document.
///
/// `validate` returns `Ok(false)` for well-formed documents that break the
/// constraint (a missing key, a key of the wrong type) and reserves
/// `Err(TypeMismatch)` for values that are not dictionaries at all.
///
/// `Display` must print exactly [`Rule::describe`].
pub trait Rule: fmt::Debug + fmt::Display + Send + Sync {
	/// Checks the document without modifying it.
	fn validate(&self, object: &Value) -> Result<bool, TypeMismatch>;

	/// Stable, human-readable description used in diagnostics.
	fn describe(&self) -> String;
}

/// Borrows the dictionary behind `object`, or reports what was found instead.
pub(crate) fn as_dictionary(object: &Value) -> Result<&Map<String, Value>, TypeMismatch> {
	object.as_object().ok_or_else(|| TypeMismatch {
		expected: ValueKind::Dictionary,
		found: ValueKind::of(object),
	})
}

fn key_list(keys: &[String]) -> String {
	format!("[{}]", keys.join(", "))
}

/// Requires every listed key to be present.
///
/// Keys are checked in the order given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredRule {
	keys: Vec<String>,
}

impl RequiredRule {
	pub fn new<I, K>(keys: I) -> Self
	where
		I: IntoIterator<Item = K>,
		K: Into<String>,
	{
		Self {
			keys: keys.into_iter().map(Into::into).collect(),
		}
	}

	pub fn keys(&self) -> &[String] {
		&self.keys
	}
}

impl Rule for RequiredRule {
	fn validate(&self, object: &Value) -> Result<bool, TypeMismatch> {
		let map = as_dictionary(object)?;
		Ok(self.keys.iter().all(|key| map.contains_key(key)))
	}

	fn describe(&self) -> String {
		format!("properties are required: {}", key_list(&self.keys))
	}
}

impl fmt::Display for RequiredRule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.describe())
	}
}

/// Allows at most one of the listed keys to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusiveRule {
	keys: Vec<String>,
}

impl ExclusiveRule {
	pub fn new<I, K>(keys: I) -> Self
	where
		I: IntoIterator<Item = K>,
		K: Into<String>,
	{
		Self {
			keys: keys.into_iter().map(Into::into).collect(),
		}
	}

	pub fn keys(&self) -> &[String] {
		&self.keys
	}
}

impl Rule for ExclusiveRule {
	fn validate(&self, object: &Value) -> Result<bool, TypeMismatch> {
		let map = as_dictionary(object)?;
		let present = self.keys.iter().filter(|key| map.contains_key(*key)).count();
		Ok(present <= 1)
	}

	fn describe(&self) -> String {
		format!("properties are mutually exclusive: {}", key_list(&self.keys))
	}
}

impl fmt::Display for ExclusiveRule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.describe())
	}
}

/// Constrains the kind of a key's value when the key is present.
///
/// An absent key passes; pair with [`RequiredRule`] to demand presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRule {
	key: String,
	kind: ValueKind,
}

impl TypeRule {
	pub fn new(key: impl Into<String>, kind: ValueKind) -> Self {
		Self {
			key: key.into(),
			kind,
		}
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn kind(&self) -> ValueKind {
		self.kind
	}
}

impl Rule for TypeRule {
	fn validate(&self, object: &Value) -> Result<bool, TypeMismatch> {
		let map = as_dictionary(object)?;
		Ok(match map.get(&self.key) {
			Some(value) => ValueKind::of(value) == self.kind,
			None => true,
		})
	}

	fn describe(&self) -> String {
		format!("property '{}' must be of type {}", self.key, self.kind)
	}
}

impl fmt::Display for TypeRule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.describe())
	}
}
