//! Rule definitions, grouped by family.
//!
//! Each module exposes constructors returning `Rule`s; `Rulebook::new`
//! registers them in `all()` order.

use crate::error::RuleError;
use crate::rulebook::Rule;

mod basic;
mod equality;
mod propositional;
mod quantifier;

pub(crate) fn all() -> Vec<Rule> {
    vec![
        basic::premise(),
        basic::assumption(),
        basic::lem(),
        basic::copy(),
        basic::modus_tollens(),
        basic::proof_by_contradiction(),
        basic::contradiction(),
        basic::double_negation(),
        propositional::implication(),
        propositional::conjunction(),
        propositional::disjunction(),
        propositional::negation(),
        quantifier::forall(),
        quantifier::exists(),
        equality::equality(),
    ]
}

/// `Err(Rejected(message))` unless `holds`.
fn ensure(holds: bool, message: impl FnOnce() -> String) -> Result<(), RuleError> {
    if holds {
        Ok(())
    } else {
        Err(RuleError::Rejected(message()))
    }
}

fn reject(message: impl Into<String>) -> RuleError {
    RuleError::Rejected(message.into())
}
