//! Introduction and elimination rules for →, ∧, ∨ and ¬.

use natded_logic::{Connective, Expression};

use super::{ensure, reject};
use crate::error::RuleError;
use crate::justifier::{Justifier, RefKind, RuleContext, Schema};
use crate::rulebook::Rule;

// ============================================================================
// Implication
// ============================================================================

pub(super) fn implication() -> Rule {
    Rule::normal(
        "->",
        "Implication",
        Some(Justifier::new(
            Schema::refs(&[RefKind::Range]),
            check_implies_intro,
        )),
        Some(Justifier::new(
            Schema::refs(&[RefKind::Line, RefKind::Line]),
            check_implies_elim,
        )),
    )
    .with_aliases(&["implies"])
}

fn check_implies_intro(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    let (first, last) = ctx.range(0)?;
    let (antecedent, consequent) = ctx
        .sentence()
        .as_binary(Connective::Implies)
        .ok_or_else(|| reject("Implies-Intro: current step is not an implication."))?;
    ensure(ctx.eq(antecedent, first.sentence()), || {
        "Implies-Intro: the left side does not match the assumption.".to_string()
    })?;
    ensure(ctx.eq(consequent, last.sentence()), || {
        "Implies-Intro: the right side does not match the end of the box.".to_string()
    })
}

fn check_implies_elim(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    let (implication_index, implication) = ctx.line(0)?;
    let (antecedent_index, premise) = ctx.line(1)?;
    ensure(
        implication_index < ctx.step && antecedent_index < ctx.step,
        || "Implies-Elim: referenced steps must precede the current step.".to_string(),
    )?;
    let (antecedent, consequent) = implication
        .as_binary(Connective::Implies)
        .ok_or_else(|| {
            reject(format!(
                "Implies-Elim: step {implication_index} is not an implication."
            ))
        })?;
    ensure(ctx.eq(antecedent, premise), || {
        format!(
            "Implies-Elim: the implication's left side does not match step {antecedent_index}."
        )
    })?;
    ensure(ctx.eq(consequent, ctx.sentence()), || {
        "Implies-Elim: the implication's right side does not match the current step.".to_string()
    })
}

// ============================================================================
// Conjunction
// ============================================================================

pub(super) fn conjunction() -> Rule {
    Rule::normal(
        "and",
        "And",
        Some(Justifier::new(
            Schema::refs(&[RefKind::Line, RefKind::Line]),
            check_and_intro,
        )),
        Some(Justifier::new(
            Schema::refs(&[RefKind::Line]).with_side(),
            check_and_elim,
        )),
    )
}

fn check_and_intro(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    let (left_index, left_step) = ctx.line(0)?;
    let (right_index, right_step) = ctx.line(1)?;
    let (left, right) = ctx
        .sentence()
        .as_binary(Connective::And)
        .ok_or_else(|| reject("And-Intro: current step is not a conjunction."))?;
    ensure(ctx.eq(left, left_step), || {
        format!("And-Intro: left side does not match step {left_index}.")
    })?;
    ensure(ctx.eq(right, right_step), || {
        format!("And-Intro: right side does not match step {right_index}.")
    })
}

fn check_and_elim(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    let side = ctx.selected_side()?;
    let (index, referenced) = ctx.line(0)?;
    let (left, right) = referenced
        .as_binary(Connective::And)
        .ok_or_else(|| reject(format!("And-Elim: step {index} is not a conjunction.")))?;
    ensure(ctx.eq(side.select(left, right), ctx.sentence()), || {
        format!("And-Elim: the {side} side of step {index} does not match the current step.")
    })
}

// ============================================================================
// Disjunction
// ============================================================================

pub(super) fn disjunction() -> Rule {
    Rule::normal(
        "or",
        "Or",
        Some(Justifier::new(
            Schema::refs(&[RefKind::Line]).with_side(),
            check_or_intro,
        )),
        Some(Justifier::new(
            Schema::refs(&[RefKind::Line, RefKind::Range, RefKind::Range]),
            check_or_elim,
        )),
    )
}

fn check_or_intro(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    let side = ctx.selected_side()?;
    let (index, referenced) = ctx.line(0)?;
    let (left, right) = ctx
        .sentence()
        .as_binary(Connective::Or)
        .ok_or_else(|| reject("Or-Intro: current step is not a disjunction."))?;
    ensure(ctx.eq(side.select(left, right), referenced), || {
        format!("Or-Intro: the {side} side does not match step {index}.")
    })
}

fn check_or_elim(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    let (index, disjunction) = ctx.line(0)?;
    let (left_first, left_last) = ctx.range(1)?;
    let (right_first, right_last) = ctx.range(2)?;
    let (left, right) = disjunction
        .as_binary(Connective::Or)
        .ok_or_else(|| reject(format!("Or-Elim: step {index} is not a disjunction.")))?;
    ensure(ctx.eq(left, left_first.sentence()), || {
        "Or-Elim: the first box does not assume the left side of the disjunction.".to_string()
    })?;
    ensure(ctx.eq(right, right_first.sentence()), || {
        "Or-Elim: the second box does not assume the right side of the disjunction.".to_string()
    })?;
    ensure(ctx.eq(left_last.sentence(), right_last.sentence()), || {
        "Or-Elim: the two boxes reach different conclusions.".to_string()
    })?;
    ensure(ctx.eq(left_last.sentence(), ctx.sentence()), || {
        "Or-Elim: current step does not match the boxes' conclusion.".to_string()
    })
}

// ============================================================================
// Negation
// ============================================================================

pub(super) fn negation() -> Rule {
    Rule::normal(
        "not",
        "Not",
        Some(Justifier::new(
            Schema::refs(&[RefKind::Range]),
            check_not_intro,
        )),
        Some(Justifier::new(
            Schema::refs(&[RefKind::Line, RefKind::Line]),
            check_not_elim,
        )),
    )
}

fn check_not_intro(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    let (first, last) = ctx.range(0)?;
    ensure(ctx.is_contradiction(last.sentence()), || {
        "Not-Intro: final step in the range must be a contradiction.".to_string()
    })?;
    let negated = ctx.sentence().as_not().ok_or_else(|| {
        reject("Not-Intro: current step is not a negation. Might you be thinking of PBC?")
    })?;
    ensure(ctx.eq(first.sentence(), negated), || {
        "Not-Intro: current step is not the negation of the assumption.".to_string()
    })
}

fn check_not_elim(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    ensure(ctx.is_contradiction(ctx.sentence()), || {
        format!(
            "Not-Elim: current step must be a contradiction, got {}.",
            ctx.sentence()
        )
    })?;
    let (_, a) = ctx.line(0)?;
    let (_, b) = ctx.line(1)?;
    if a.as_not().is_none() && b.as_not().is_none() {
        return Err(reject("Not-Elim: neither referenced step is a negation."));
    }
    let clash = |negation: &Expression, other: &Expression| {
        negation.as_not().is_some_and(|inner| ctx.eq(inner, other))
    };
    ensure(clash(a, b) || clash(b, a), || {
        "Not-Elim: the negated expression does not match the other step.".to_string()
    })
}
