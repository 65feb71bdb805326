//! Conjunction of rules with full failure reporting.

use serde_json::Value;

use crate::error::{RuleFailure, ValidationError};
use crate::rule::Rule;

/// Ordered set of rules that a document must satisfy together.
///
/// Every rule is evaluated, so the resulting [`ValidationError`] lists all
/// failures rather than only the first.
#[derive(Debug, Default)]
pub struct Validator {
	rules: Vec<Box<dyn Rule>>,
}

impl Validator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style [`Validator::push`].
	pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
		self.push(rule);
		self
	}

	pub fn push(&mut self, rule: impl Rule + 'static) {
		self.rules.push(Box::new(rule));
	}

	pub fn push_boxed(&mut self, rule: Box<dyn Rule>) {
		self.rules.push(rule);
	}

	pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
		self.rules.iter().map(|rule| rule.as_ref())
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// Evaluates every rule against `object`.
	pub fn check(&self, object: &Value) -> Result<(), ValidationError> {
		let failures: Vec<RuleFailure> = self
			.rules
			.iter()
			.filter_map(|rule| match rule.validate(object) {
				Ok(true) => None,
				Ok(false) => Some(RuleFailure::Violated {
					rule: rule.describe(),
				}),
				Err(source) => Some(RuleFailure::Mismatch {
					rule: rule.describe(),
					source,
				}),
			})
			.collect();

		if failures.is_empty() {
			Ok(())
		} else {
			Err(ValidationError { failures })
		}
	}

	/// Returns `true` when [`Validator::check`] would succeed.
	pub fn is_valid(&self, object: &Value) -> bool {
		self.check(object).is_ok()
	}
}
