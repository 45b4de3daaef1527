//! Natural-deduction step checking for first-order logic.
//!
//! Given a proof (a list of steps with their box structure) and, for one
//! step, a claimed rule plus evidence, decide whether the step follows.
//!
//! Entry point: `build_rulebook()` then `Rulebook::verify`. See `rulebook`
//! for the dispatch pipeline and `rules` (private) for the per-rule checks.
//!
//! Parsing proof text, editing proofs and choosing which rule to try are the
//! caller's business.

pub mod batch;
pub mod config;
pub mod error;
pub mod justification;
pub mod justifier;
pub mod proof;
pub mod rulebook;
mod rules;

pub use batch::{StepCheck, StepReport};
pub use config::RulebookConfig;
pub use error::{ConfigError, RuleError, VerifyError};
pub use justification::{Justification, Reference, Role, RuleKey, Side, Substitution, Verdict};
pub use proof::{Proof, ProofBuilder, Step};
pub use rulebook::{build_rulebook, Rule, RuleKind, Rulebook};
