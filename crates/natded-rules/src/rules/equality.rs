//! `=` rules: reflexivity and substitution of equals.

use natded_logic::Connective;

use super::{ensure, reject};
use crate::error::RuleError;
use crate::justifier::{Justifier, RefKind, RuleContext, Schema};
use crate::rulebook::Rule;

pub(super) fn equality() -> Rule {
    Rule::normal(
        "=",
        "Equality",
        Some(Justifier::new(Schema::NONE, check_eq_intro)),
        Some(Justifier::new(
            Schema::refs(&[RefKind::Line, RefKind::Line]),
            check_eq_elim,
        )),
    )
    .with_aliases(&["equality", "eq"])
}

fn check_eq_intro(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    let (left, right) = ctx.sentence().as_binary(Connective::Eq).ok_or_else(|| {
        reject(format!(
            "Equality-Intro: current step is not an equality, got {}.",
            ctx.sentence()
        ))
    })?;
    ensure(ctx.eq(left, right), || {
        "Equality-Intro: left and right sides do not match.".to_string()
    })
}

fn check_eq_elim(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    let (index, equation) = ctx.line(0)?;
    let (_, source) = ctx.line(1)?;
    let (left, right) = equation
        .as_binary(Connective::Eq)
        .ok_or_else(|| reject(format!("Equality-Elim: step {index} is not an equality.")))?;
    let target = ctx.sentence();
    let rewritten = ctx.engine.semantic_eq_rewriting(source, target, left, right)
        || (ctx.config.symmetric_equality_elim
            && ctx.engine.semantic_eq_rewriting(source, target, right, left));
    ensure(rewritten, || {
        "Equality-Elim: rewriting with the equality does not give the current step.".to_string()
    })
}
