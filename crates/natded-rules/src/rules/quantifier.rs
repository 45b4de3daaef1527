//! ∀ and ∃ rules.
//!
//! The substitution pair always reads "replace `variable` by `term`":
//!
//! | rule        | substituted expression | must match        |
//! |-------------|------------------------|-------------------|
//! | ∀-intro     | last line of the box   | body of target    |
//! | ∀-elim      | body of cited ∀        | target            |
//! | ∃-intro     | cited line             | body of target    |
//! | ∃-elim      | body of cited ∃        | first line of box |
//!
//! For ∀-intro `variable` is the box's eigenvariable; for ∃-elim `term` is.
//! Eigenvariable freshness is checked against the scope stacks recorded on
//! the steps, not derived.

use natded_logic::QuantifierKind;

use super::{ensure, reject};
use crate::error::RuleError;
use crate::justifier::{Justifier, RefKind, RuleContext, Schema};
use crate::rulebook::Rule;

pub(super) fn forall() -> Rule {
    Rule::normal(
        "a.",
        "ForAll",
        Some(Justifier::new(
            Schema::refs(&[RefKind::Range]).with_substitution(),
            check_forall_intro,
        )),
        Some(Justifier::new(
            Schema::refs(&[RefKind::Line]).with_substitution(),
            check_forall_elim,
        )),
    )
    .with_aliases(&["forall"])
}

fn check_forall_intro(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    let (first, last) = ctx.range(0)?;
    let subst = ctx.substitution()?;
    let (_, body) = ctx
        .sentence()
        .as_quantifier(QuantifierKind::ForAll)
        .ok_or_else(|| reject("All-Intro: current step is not a universal statement."))?;

    let eigen = first.innermost_eigenvariable().ok_or_else(|| {
        reject("All-Intro: not valid without an eigenvariable box (e.g. an x0 box).")
    })?;
    let scoped: Vec<&str> = first.scope().iter().flatten().map(String::as_str).collect();
    ensure(scoped.iter().all(|v| *v == subst.variable), || {
        format!(
            "All-Intro: substitution variable {} does not match scope: {}",
            subst.variable,
            scoped.join(", ")
        )
    })?;
    ensure(!ctx.sentence().occurs_free(eigen), || {
        format!("All-Intro: eigenvariable {eigen} must not occur in the current step.")
    })?;

    let generalized = ctx
        .engine
        .substitute(last.sentence(), &subst.variable, &subst.term)?;
    ensure(ctx.eq(&generalized, body), || {
        format!("All-Intro: last step in the box does not match the current step after {subst}.")
    })
}

fn check_forall_elim(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    let (index, referenced) = ctx.line(0)?;
    let subst = ctx.substitution()?;
    let (_, body) = referenced
        .as_quantifier(QuantifierKind::ForAll)
        .ok_or_else(|| reject(format!("All-Elim: step {index} is not a universal statement.")))?;
    let instance = ctx.engine.substitute(body, &subst.variable, &subst.term)?;
    ensure(ctx.eq(&instance, ctx.sentence()), || {
        format!("All-Elim: step {index} does not match the current step after {subst}.")
    })
}

pub(super) fn exists() -> Rule {
    Rule::normal(
        "e.",
        "Exists",
        Some(Justifier::new(
            Schema::refs(&[RefKind::Line]).with_substitution(),
            check_exists_intro,
        )),
        Some(Justifier::new(
            Schema::refs(&[RefKind::Line, RefKind::Range]).with_substitution(),
            check_exists_elim,
        )),
    )
    .with_aliases(&["exists"])
}

fn check_exists_intro(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    let (index, referenced) = ctx.line(0)?;
    let subst = ctx.substitution()?;
    let (_, body) = ctx
        .sentence()
        .as_quantifier(QuantifierKind::Exists)
        .ok_or_else(|| reject("Exists-Intro: current step is not an existential statement."))?;
    let abstracted = ctx
        .engine
        .substitute(referenced, &subst.variable, &subst.term)?;
    ensure(ctx.eq(&abstracted, body), || {
        format!("Exists-Intro: step {index} does not match the current step after {subst}.")
    })
}

fn check_exists_elim(ctx: &RuleContext<'_>) -> Result<(), RuleError> {
    let (index, referenced) = ctx.line(0)?;
    let (first, last) = ctx.range(1)?;
    let subst = ctx.substitution()?;
    let (_, body) = referenced
        .as_quantifier(QuantifierKind::Exists)
        .ok_or_else(|| {
            reject(format!(
                "Exists-Elim: step {index} is not an existential statement."
            ))
        })?;

    let eigen = first.innermost_eigenvariable().ok_or_else(|| {
        reject("Exists-Elim: the box must introduce an eigenvariable (e.g. an x0 box).")
    })?;
    ensure(subst.term.as_constant() == Some(eigen), || {
        format!(
            "Exists-Elim: substitution term must be the box's eigenvariable {eigen}, got {}.",
            subst.term
        )
    })?;

    let instance = ctx.engine.substitute(body, &subst.variable, &subst.term)?;
    ensure(ctx.eq(&instance, first.sentence()), || {
        format!("Exists-Elim: the box's assumption does not match step {index} for {eigen}.")
    })?;
    ensure(ctx.eq(last.sentence(), ctx.sentence()), || {
        "Exists-Elim: the box's last step does not match the current step.".to_string()
    })?;
    ensure(!ctx.sentence().occurs_free(eigen), || {
        format!("Exists-Elim: eigenvariable {eigen} must not occur in the current step.")
    })
}
