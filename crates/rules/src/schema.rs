//! Declarative schema documents that build a [`Validator`].

use serde::{Deserialize, Serialize};

use crate::kind::ValueKind;
use crate::rule::{ExclusiveRule, RequiredRule, Rule, TypeRule};
use crate::validator::Validator;

/// Serialized form of a single rule.
///
/// ```json
/// {"required": ["announce", "info"]}
/// {"exclusive": ["length", "files"]}
/// {"type": {"key": "piece length", "kind": "integer"}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSpec {
	Required(Vec<String>),
	Exclusive(Vec<String>),
	Type { key: String, kind: ValueKind },
}

impl RuleSpec {
	pub fn into_rule(self) -> Box<dyn Rule> {
		match self {
			Self::Required(keys) => Box::new(RequiredRule::new(keys)),
			Self::Exclusive(keys) => Box::new(ExclusiveRule::new(keys)),
			Self::Type { key, kind } => Box::new(TypeRule::new(key, kind)),
		}
	}
}

/// A list of rules loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
	#[serde(default)]
	pub rules: Vec<RuleSpec>,
}

impl Schema {
	pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
		serde_json::from_str(s)
	}

	pub fn into_validator(self) -> Validator {
		let mut validator = Validator::new();
		for spec in self.rules {
			validator.push_boxed(spec.into_rule());
		}
		validator
	}
}
