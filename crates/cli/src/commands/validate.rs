//! `bt validate`: check a JSON document against a rule schema.

use std::io::Read;

use anyhow::Context;
use bt_rules::{Schema, Validator};
use serde::Serialize;
use serde_json::Value;

use crate::cli::ValidateArgs;
use crate::error::{CliError, Result};
use crate::output;

/// Result line printed by `bt validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
	pub ok: bool,
	pub rules: usize,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub failures: Vec<String>,
}

pub fn validate_document(validator: &Validator, document: &Value) -> ValidationReport {
	let failures = match validator.check(document) {
		Ok(()) => Vec::new(),
		Err(err) => err.failures.iter().map(ToString::to_string).collect(),
	};
	ValidationReport {
		ok: failures.is_empty(),
		rules: validator.len(),
		failures,
	}
}

pub fn validate(args: ValidateArgs) -> Result<()> {
	let schema_text = std::fs::read_to_string(&args.schema)
		.with_context(|| format!("failed to read schema {}", args.schema.display()))?;
	let validator = Schema::from_json_str(&schema_text)
		.map_err(|source| CliError::Schema {
			path: args.schema.clone(),
			source,
		})?
		.into_validator();

	let input = match &args.input {
		Some(path) => std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?,
		None => {
			let mut buf = String::new();
			std::io::stdin().read_to_string(&mut buf)?;
			buf
		}
	};
	let document: Value = serde_json::from_str(&input)?;

	let report = validate_document(&validator, &document);
	output::emit(&report);

	if report.ok {
		Ok(())
	} else {
		Err(CliError::OutputAlreadyPrinted)
	}
}
