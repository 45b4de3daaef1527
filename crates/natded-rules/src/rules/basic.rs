//! Premises, assumptions and the derived propositional rules.

use natded_logic::Connective;

use super::{ensure, reject};
use crate::error::RuleError;
use crate::justifier::{Justifier, RefKind, RuleContext, Schema};
use crate::rulebook::Rule;

pub(super) fn premise() -> Rule {
    Rule::simple("premise", "Premise", Justifier::new(Schema::NONE, |_| Ok(())))
}

pub(super) fn assumption() -> Rule {
    Rule::simple(
        "assumption",
        "Assumption",
        Justifier::new(Schema::NONE, check_assumption),
    )
}

fn check_assumption(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    ensure(ctx.target.is_first_in_scope(), || {
        "Assumption: assumptions can only be made on the first line of a box.".to_string()
    })
}

pub(super) fn lem() -> Rule {
    Rule::derived("lem", "LEM", Justifier::new(Schema::NONE, check_lem))
}

fn check_lem(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    let (left, right) = ctx
        .sentence()
        .as_binary(Connective::Or)
        .ok_or_else(|| reject("LEM: must have the form φ ∨ ¬φ."))?;
    let negated = right.as_not().filter(|inner| ctx.eq(left, inner));
    ensure(negated.is_some(), || {
        "LEM: right side must be the negation of the left side.".to_string()
    })
}

pub(super) fn copy() -> Rule {
    Rule::derived(
        "copy",
        "Copy",
        Justifier::new(Schema::refs(&[RefKind::Line]), check_copy),
    )
}

fn check_copy(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    let (index, referenced) = ctx.line(0)?;
    ensure(ctx.eq(ctx.sentence(), referenced), || {
        format!("Copy: current step does not match step {index}.")
    })
}

pub(super) fn modus_tollens() -> Rule {
    Rule::derived(
        "mt",
        "MT",
        Justifier::new(Schema::refs(&[RefKind::Line, RefKind::Line]), check_mt),
    )
}

fn check_mt(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    let (_, implication) = ctx.line(0)?;
    let (_, negation) = ctx.line(1)?;
    let (antecedent, consequent) = implication
        .as_binary(Connective::Implies)
        .ok_or_else(|| reject("MT: first referenced step must be an implication."))?;
    let denied = negation.as_not().filter(|inner| ctx.eq(inner, consequent));
    ensure(denied.is_some(), || {
        "MT: second referenced step must be the negation of the implication's right side."
            .to_string()
    })?;
    let conclusion = ctx.sentence().as_not().filter(|inner| ctx.eq(inner, antecedent));
    ensure(conclusion.is_some(), || {
        "MT: current step must be the negation of the implication's left side.".to_string()
    })
}

pub(super) fn proof_by_contradiction() -> Rule {
    Rule::derived(
        "pbc",
        "PBC",
        Justifier::new(Schema::refs(&[RefKind::Range]), check_pbc),
    )
}

fn check_pbc(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    let (first, last) = ctx.range(0)?;
    ensure(ctx.is_contradiction(last.sentence()), || {
        "PBC: final step in the range must be a contradiction.".to_string()
    })?;
    let assumed = first.sentence().as_not().ok_or_else(|| {
        reject("PBC: assumption is not a negation. Might you be thinking of not-introduction?")
    })?;
    ensure(ctx.eq(assumed, ctx.sentence()), || {
        "PBC: negated assumption does not match the current step.".to_string()
    })
}

pub(super) fn contradiction() -> Rule {
    Rule::normal(
        "contra",
        "Contradiction",
        None,
        Some(Justifier::new(
            Schema::refs(&[RefKind::Line]),
            check_contradiction_elim,
        )),
    )
}

fn check_contradiction_elim(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    let (index, referenced) = ctx.line(0)?;
    ensure(ctx.is_contradiction(referenced), || {
        format!("Contradiction-Elim: step {index} is not a contradiction.")
    })
}

pub(super) fn double_negation() -> Rule {
    Rule::normal(
        "notnot",
        "Double-negation",
        None,
        Some(Justifier::new(
            Schema::refs(&[RefKind::Line]),
            check_double_negation_elim,
        )),
    )
}

fn check_double_negation_elim(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    let (index, referenced) = ctx.line(0)?;
    let inner = referenced
        .as_not()
        .and_then(|e| e.as_not())
        .ok_or_else(|| reject(format!("Notnot-Elim: step {index} is not a double negation.")))?;
    ensure(ctx.eq(inner, ctx.sentence()), || {
        "Notnot-Elim: removing the double negation does not give the current step.".to_string()
    })
}
