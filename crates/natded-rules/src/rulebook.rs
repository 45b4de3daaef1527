//! The rule registry and the single-step verification entry point.
//!
//! ```text
//! verify(key, proof, step, justification)
//!   │
//!   ├─ lookup(key.name)           unknown ──────────────► Err(UnknownRule)
//!   ├─ pick verifier by key.role  mismatch ─────────────► StructuralError
//!   └─ Justifier::check
//!        ├─ side / references / substitution shape ─────► StructuralError
//!        └─ rule predicate (Engine: substitute, semantic_eq)
//!             ├─ holds ─────────────────────────────────► Valid
//!             └─ fails ─────────────────────────────────► Invalid(reason)
//! ```
//!
//! A `Rulebook` holds no per-proof state, so one instance can be shared across
//! threads and used for many proofs at once.

use natded_logic::{Engine, TraceHook};
use serde::{Deserialize, Serialize};

use crate::config::RulebookConfig;
use crate::error::VerifyError;
use crate::justification::{Justification, Role, RuleKey, Verdict};
use crate::justifier::Justifier;
use crate::proof::Proof;
use crate::rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Bookkeeping rules (premise, assumption).
    Simple,
    /// Rules derivable from the primitive ones (LEM, MT, PBC, copy).
    Derived,
    /// Primitive connective rules with intro and/or elim halves.
    Normal,
}

#[derive(Debug, Clone)]
enum Verifiers {
    Single(Justifier),
    Normal {
        intro: Option<Justifier>,
        elim: Option<Justifier>,
    },
}

#[derive(Debug, Clone)]
pub struct Rule {
    key: &'static str,
    aliases: &'static [&'static str],
    name: &'static str,
    kind: RuleKind,
    verifiers: Verifiers,
}

impl Rule {
    pub(crate) fn simple(key: &'static str, name: &'static str, verifier: Justifier) -> Self {
        Self::single(key, name, RuleKind::Simple, verifier)
    }

    pub(crate) fn derived(key: &'static str, name: &'static str, verifier: Justifier) -> Self {
        Self::single(key, name, RuleKind::Derived, verifier)
    }

    fn single(key: &'static str, name: &'static str, kind: RuleKind, verifier: Justifier) -> Self {
        Self {
            key,
            aliases: &[],
            name,
            kind,
            verifiers: Verifiers::Single(verifier),
        }
    }

    pub(crate) fn normal(
        key: &'static str,
        name: &'static str,
        intro: Option<Justifier>,
        elim: Option<Justifier>,
    ) -> Self {
        Self {
            key,
            aliases: &[],
            name,
            kind: RuleKind::Normal,
            verifiers: Verifiers::Normal { intro, elim },
        }
    }

    pub(crate) fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }

    pub fn display_name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    fn answers_to(&self, name: &str) -> bool {
        self.key == name || self.aliases.iter().any(|a| *a == name)
    }

    /// Roles this rule accepts; empty for single-verifier rules.
    pub fn roles(&self) -> Vec<Role> {
        match &self.verifiers {
            Verifiers::Single(_) => Vec::new(),
            Verifiers::Normal { intro, elim } => {
                let mut roles = Vec::new();
                if intro.is_some() {
                    roles.push(Role::Intro);
                }
                if elim.is_some() {
                    roles.push(Role::Elim);
                }
                roles
            }
        }
    }

    /// The verifier for the requested role, or the reason there is none.
    pub fn verifier(&self, role: Option<Role>) -> Result<&Justifier, String> {
        match (&self.verifiers, role) {
            (Verifiers::Single(v), None) => Ok(v),
            (Verifiers::Single(_), Some(role)) => Err(format!(
                "{} has no {role} form; cite it without a role",
                self.name
            )),
            (Verifiers::Normal { .. }, None) => Err(format!(
                "{} needs a role: intro or elim",
                self.name
            )),
            (Verifiers::Normal { intro, .. }, Some(Role::Intro)) => intro
                .as_ref()
                .ok_or_else(|| format!("{} has no intro form", self.name)),
            (Verifiers::Normal { elim, .. }, Some(Role::Elim)) => elim
                .as_ref()
                .ok_or_else(|| format!("{} has no elim form", self.name)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rulebook {
    rules: Vec<Rule>,
    engine: Engine,
    config: RulebookConfig,
}

impl Default for Rulebook {
    fn default() -> Self {
        Self::new()
    }
}

/// The standard first-order rulebook with default configuration.
pub fn build_rulebook() -> Rulebook {
    Rulebook::new()
}

impl Rulebook {
    pub fn new() -> Self {
        Self::with_config(RulebookConfig::default())
    }

    pub fn with_config(config: RulebookConfig) -> Self {
        Self {
            rules: rules::all(),
            engine: Engine::new(),
            config,
        }
    }

    /// Install a diagnostic hook called at every substitution and equality check.
    pub fn with_trace_hook(mut self, hook: TraceHook) -> Self {
        self.engine = Engine::with_trace_hook(hook);
        self
    }

    pub fn config(&self) -> &RulebookConfig {
        &self.config
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Find a rule by key or alias.
    pub fn lookup(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.answers_to(name))
    }

    /// All rules, in registration order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Check that step `step` (1-based) of `proof` follows by rule `key` from
    /// the evidence in `justification`.
    ///
    /// `Ok` carries the verdict, including `Invalid` for unsound steps and
    /// `StructuralError` for evidence of the wrong shape. `Err` is reserved for
    /// unknown rules, a bad target index and malformed expressions.
    pub fn verify(
        &self,
        key: &RuleKey,
        proof: &Proof,
        step: usize,
        justification: &Justification,
    ) -> Result<Verdict, VerifyError> {
        let rule = self
            .lookup(&key.name)
            .ok_or_else(|| VerifyError::UnknownRule(key.name.clone()))?;
        if proof.step(step).is_none() {
            return Err(VerifyError::StepOutOfRange {
                step,
                len: proof.len(),
            });
        }

        let verifier = match rule.verifier(key.role) {
            Ok(v) => v,
            Err(message) => {
                tracing::debug!(rule = %key, step, reason = %message, "rule role mismatch");
                return Ok(Verdict::StructuralError(message));
            }
        };

        let verdict = verifier.check(&self.engine, &self.config, proof, step, justification)?;
        tracing::debug!(rule = %key, step, valid = verdict.is_valid(), "verified step");
        Ok(verdict)
    }
}
