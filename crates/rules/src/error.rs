//! Error types for rule evaluation.

use std::fmt;

use thiserror::Error;

use crate::kind::ValueKind;

/// A rule was evaluated against a value of the wrong structural kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found}")]
pub struct TypeMismatch {
	pub expected: ValueKind,
	pub found: ValueKind,
}

/// One failed rule inside a [`ValidationError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleFailure {
	/// The rule evaluated to `false`.
	Violated { rule: String },
	/// The rule could not inspect the document at all.
	Mismatch { rule: String, source: TypeMismatch },
}

impl RuleFailure {
	/// Description of the rule that failed.
	pub fn rule(&self) -> &str {
		match self {
			Self::Violated { rule } | Self::Mismatch { rule, .. } => rule,
		}
	}

	pub fn is_mismatch(&self) -> bool {
		matches!(self, Self::Mismatch { .. })
	}
}

impl fmt::Display for RuleFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Violated { rule } => f.write_str(rule),
			Self::Mismatch { rule, source } => write!(f, "{rule} ({source})"),
		}
	}
}

/// Every rule that rejected a document, in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
	pub failures: Vec<RuleFailure>,
}

impl ValidationError {
	/// Diagnostic of the first failing rule.
	pub fn first(&self) -> Option<&str> {
		self.failures.first().map(RuleFailure::rule)
	}
}

impl fmt::Display for ValidationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("document failed validation: ")?;
		for (i, failure) in self.failures.iter().enumerate() {
			if i > 0 {
				f.write_str("; ")?;
			}
			write!(f, "{failure}")?;
		}
		Ok(())
	}
}

impl std::error::Error for ValidationError {}
