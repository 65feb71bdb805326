//! Schema rules for untrusted structured documents.
//!
//! Documents arrive as dynamically typed [`serde_json::Value`] trees. A [`Rule`]
//! checks one constraint against a dictionary without mutating it, and a
//! [`Validator`] composes rules by conjunction:
//!
//! ```text
//! Schema (JSON) ──► Validator ──► [RequiredRule, ExclusiveRule, TypeRule, ...]
//!                        │
//!                        └──► check(&Value) ──► Ok(()) | ValidationError { failures }
//! ```
//!
//! Evaluating a rule against a value that is not a dictionary yields a typed
//! [`TypeMismatch`] instead of panicking.

pub mod error;
pub mod kind;
pub mod rule;
pub mod schema;
pub mod validator;

pub use error::{RuleFailure, TypeMismatch, ValidationError};
pub use kind::ValueKind;
pub use rule::{ExclusiveRule, RequiredRule, Rule, TypeRule};
pub use schema::{RuleSpec, Schema};
pub use validator::Validator;
