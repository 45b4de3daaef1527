//! Evidence-shape checking in front of rule logic.
//!
//! A `Justifier` pairs a rule's declared `Schema` with its soundness
//! predicate. `Justifier::check` rejects evidence of the wrong shape with
//! `Verdict::StructuralError` before the predicate ever runs, resolves the
//! cited steps, and then maps the predicate's outcome to a verdict.

use natded_logic::{Engine, Expression};

use crate::config::RulebookConfig;
use crate::error::{RuleError, VerifyError};
use crate::justification::{Justification, Reference, Side, Substitution, Verdict};
use crate::proof::{Proof, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Line,
    Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub requires_side: bool,
    /// `None`: references are not inspected (the rule looks at the target only).
    pub references: Option<&'static [RefKind]>,
    pub requires_substitution: bool,
}

impl Schema {
    /// Target-only rules.
    pub const NONE: Schema = Schema {
        requires_side: false,
        references: None,
        requires_substitution: false,
    };

    pub const fn refs(kinds: &'static [RefKind]) -> Self {
        Schema {
            requires_side: false,
            references: Some(kinds),
            requires_substitution: false,
        }
    }

    pub const fn with_side(mut self) -> Self {
        self.requires_side = true;
        self
    }

    pub const fn with_substitution(mut self) -> Self {
        self.requires_substitution = true;
        self
    }
}

/// A resolved reference.
#[derive(Debug, Clone, Copy)]
pub enum Cited<'a> {
    Line {
        index: usize,
        step: &'a Step,
    },
    Range {
        start: usize,
        end: usize,
        first: &'a Step,
        last: &'a Step,
    },
}

/// Everything a rule predicate may look at. Read-only.
pub struct RuleContext<'a> {
    pub engine: &'a Engine,
    pub config: &'a RulebookConfig,
    pub proof: &'a Proof,
    pub step: usize,
    pub target: &'a Step,
    pub side: Option<Side>,
    pub cited: Vec<Cited<'a>>,
    pub substitution: Option<&'a Substitution>,
}

impl<'a> RuleContext<'a> {
    pub fn sentence(&self) -> &'a Expression {
        self.target.sentence()
    }

    /// The `i`-th reference (0-based), which must be a single step.
    pub fn line(&self, i: usize) -> Result<(usize, &'a Expression), RuleError> {
        match self.cited.get(i) {
            Some(Cited::Line { index, step }) => Ok((*index, step.sentence())),
            _ => Err(RuleError::Shape(format!(
                "reference {} must be a single step",
                i + 1
            ))),
        }
    }

    /// The `i`-th reference (0-based), which must be a box: `(first, last)`.
    pub fn range(&self, i: usize) -> Result<(&'a Step, &'a Step), RuleError> {
        match self.cited.get(i) {
            Some(Cited::Range { first, last, .. }) => Ok((*first, *last)),
            _ => Err(RuleError::Shape(format!(
                "reference {} must be a step range",
                i + 1
            ))),
        }
    }

    pub fn selected_side(&self) -> Result<Side, RuleError> {
        self.side
            .ok_or_else(|| RuleError::Shape("a side (left/right) is required".to_string()))
    }

    pub fn substitution(&self) -> Result<&'a Substitution, RuleError> {
        self.substitution
            .ok_or_else(|| RuleError::Shape("a substitution is required".to_string()))
    }

    pub fn eq(&self, a: &Expression, b: &Expression) -> bool {
        self.engine.semantic_eq(a, b)
    }

    pub fn is_contradiction(&self, expr: &Expression) -> bool {
        self.config.is_contradiction(expr)
    }
}

pub type Predicate = fn(&RuleContext<'_>) -> Result<(), RuleError>;

#[derive(Clone, Copy)]
pub struct Justifier {
    schema: Schema,
    predicate: Predicate,
}

impl std::fmt::Debug for Justifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Justifier")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl Justifier {
    pub const fn new(schema: Schema, predicate: Predicate) -> Self {
        Self { schema, predicate }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validate the evidence shape, then run the predicate.
    ///
    /// `step` must be a valid index into `proof`.
    pub fn check(
        &self,
        engine: &Engine,
        config: &RulebookConfig,
        proof: &Proof,
        step: usize,
        justification: &Justification,
    ) -> Result<Verdict, VerifyError> {
        let Some(target) = proof.step(step) else {
            return Err(VerifyError::StepOutOfRange {
                step,
                len: proof.len(),
            });
        };

        match (self.schema.requires_side, justification.side) {
            (true, None) => {
                return Ok(Verdict::StructuralError(
                    "this rule needs a side (left or right)".to_string(),
                ))
            }
            (false, Some(side)) => {
                return Ok(Verdict::StructuralError(format!(
                    "this rule does not take a side, got `{side}`"
                )))
            }
            _ => {}
        }

        let cited = match self.schema.references {
            None => Vec::new(),
            Some(kinds) => match resolve(kinds, config, proof, step, &justification.references) {
                Ok(cited) => cited,
                Err(message) => return Ok(Verdict::StructuralError(message)),
            },
        };

        match (self.schema.requires_substitution, &justification.substitution) {
            (true, None) => {
                return Ok(Verdict::StructuralError(
                    "this rule needs a substitution".to_string(),
                ))
            }
            (false, Some(s)) => {
                return Ok(Verdict::StructuralError(format!(
                    "this rule does not take a substitution, got `{s}`"
                )))
            }
            _ => {}
        }

        target.sentence().check_well_formed()?;
        for c in &cited {
            match c {
                Cited::Line { step, .. } => step.sentence().check_well_formed()?,
                Cited::Range { first, last, .. } => {
                    first.sentence().check_well_formed()?;
                    last.sentence().check_well_formed()?;
                }
            }
        }
        if let Some(s) = &justification.substitution {
            s.term.check_well_formed()?;
        }

        let ctx = RuleContext {
            engine,
            config,
            proof,
            step,
            target,
            side: justification.side,
            cited,
            substitution: justification.substitution.as_ref(),
        };
        match (self.predicate)(&ctx) {
            Ok(()) => Ok(Verdict::Valid),
            Err(RuleError::Rejected(message)) => Ok(Verdict::Invalid(message)),
            Err(RuleError::Shape(message)) => Ok(Verdict::StructuralError(message)),
            Err(RuleError::Malformed(e)) => Err(VerifyError::Malformed(e)),
        }
    }
}

fn resolve<'a>(
    kinds: &[RefKind],
    config: &RulebookConfig,
    proof: &'a Proof,
    step: usize,
    references: &[Reference],
) -> Result<Vec<Cited<'a>>, String> {
    if kinds.len() != references.len() {
        return Err(format!(
            "expected {} reference(s) ({}), got {}",
            kinds.len(),
            describe(kinds),
            references.len()
        ));
    }

    let lookup = |index: usize| {
        proof
            .step(index)
            .ok_or_else(|| format!("referenced step {index} does not exist"))
    };

    let mut cited = Vec::with_capacity(kinds.len());
    for (position, (kind, reference)) in kinds.iter().zip(references).enumerate() {
        let position = position + 1;
        match (kind, *reference) {
            (RefKind::Line, Reference::Line(index)) => {
                let referenced = lookup(index)?;
                if config.check_reference_order && index >= step {
                    return Err(format!(
                        "reference {position} (step {index}) must come before step {step}"
                    ));
                }
                if config.check_box_boundaries {
                    proof.check_accessible(index, step)?;
                }
                cited.push(Cited::Line {
                    index,
                    step: referenced,
                });
            }
            (RefKind::Range, Reference::Range(start, end)) => {
                if start > end {
                    return Err(format!("reference {position} has an empty range {start}-{end}"));
                }
                let first = lookup(start)?;
                let last = lookup(end)?;
                if config.check_reference_order && end >= step {
                    return Err(format!(
                        "reference {position} (steps {start}-{end}) must come before step {step}"
                    ));
                }
                if config.check_box_boundaries {
                    proof.check_closed_box(start, end, step)?;
                    proof.check_box_accessible(start, step)?;
                }
                cited.push(Cited::Range {
                    start,
                    end,
                    first,
                    last,
                });
            }
            (RefKind::Line, Reference::Range(start, end)) => {
                return Err(format!(
                    "reference {position} must be a single step, got range {start}-{end}"
                ))
            }
            (RefKind::Range, Reference::Line(index)) => {
                return Err(format!(
                    "reference {position} must be a step range, got step {index}"
                ))
            }
        }
    }
    Ok(cited)
}

fn describe(kinds: &[RefKind]) -> String {
    kinds
        .iter()
        .map(|k| match k {
            RefKind::Line => "step",
            RefKind::Range => "range",
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::ProofBuilder;

    fn accept(_: &RuleContext<'_>) -> Result<(), RuleError> {
        Ok(())
    }

    fn reject(_: &RuleContext<'_>) -> Result<(), RuleError> {
        Err(RuleError::Rejected("no".to_string()))
    }

    const LINE: &[RefKind] = &[RefKind::Line];
    const LINE_RANGE: &[RefKind] = &[RefKind::Line, RefKind::Range];

    fn proof() -> Proof {
        let mut b = ProofBuilder::new();
        b.premise(Expression::atom("P"));
        b.assume(Expression::atom("Q"));
        b.step(Expression::atom("R"));
        b.close();
        b.step(Expression::atom("S"));
        b.build()
    }

    fn run(schema: Schema, j: &Justification, step: usize) -> Result<Verdict, VerifyError> {
        Justifier::new(schema, accept).check(
            &Engine::new(),
            &RulebookConfig::default(),
            &proof(),
            step,
            j,
        )
    }

    fn structural(v: Result<Verdict, VerifyError>) -> String {
        match v {
            Ok(Verdict::StructuralError(m)) => m,
            other => panic!("expected structural error, got {other:?}"),
        }
    }

    #[test]
    fn matching_shape_runs_predicate() {
        let j = Justification::new().line(1).range(2, 3);
        assert_eq!(run(Schema::refs(LINE_RANGE), &j, 4), Ok(Verdict::Valid));

        let rejected = Justifier::new(Schema::refs(LINE_RANGE), reject).check(
            &Engine::new(),
            &RulebookConfig::default(),
            &proof(),
            4,
            &j,
        );
        assert_eq!(rejected, Ok(Verdict::Invalid("no".to_string())));
    }

    #[test]
    fn side_presence_must_match_schema() {
        let m = structural(run(Schema::refs(LINE).with_side(), &Justification::new().line(1), 4));
        assert!(m.contains("needs a side"), "m={m}");
        let m = structural(run(
            Schema::refs(LINE),
            &Justification::new().line(1).side(Side::Left),
            4,
        ));
        assert!(m.contains("does not take a side"), "m={m}");
    }

    #[test]
    fn substitution_presence_must_match_schema() {
        let m = structural(run(
            Schema::refs(LINE).with_substitution(),
            &Justification::new().line(1),
            4,
        ));
        assert!(m.contains("needs a substitution"), "m={m}");
        let m = structural(run(
            Schema::refs(LINE),
            &Justification::new()
                .line(1)
                .substitution(Expression::atom("c"), "x"),
            4,
        ));
        assert!(m.contains("does not take a substitution"), "m={m}");
    }

    #[test]
    fn reference_count_and_kinds_are_checked() {
        let m = structural(run(Schema::refs(LINE_RANGE), &Justification::new().line(1), 4));
        assert!(m.contains("expected 2 reference(s) (step, range), got 1"), "m={m}");
        let m = structural(run(
            Schema::refs(LINE_RANGE),
            &Justification::new().range(2, 3).range(2, 3),
            4,
        ));
        assert!(m.contains("must be a single step"), "m={m}");
        let m = structural(run(
            Schema::refs(LINE_RANGE),
            &Justification::new().line(1).line(2),
            4,
        ));
        assert!(m.contains("must be a step range"), "m={m}");
    }

    #[test]
    fn references_must_exist_and_precede_target() {
        let m = structural(run(Schema::refs(LINE), &Justification::new().line(9), 4));
        assert!(m.contains("does not exist"), "m={m}");
        let m = structural(run(Schema::refs(LINE), &Justification::new().line(0), 4));
        assert!(m.contains("does not exist"), "m={m}");
        let m = structural(run(Schema::refs(LINE), &Justification::new().line(4), 4));
        assert!(m.contains("must come before"), "m={m}");
    }

    #[test]
    fn ranges_must_be_closed_boxes() {
        let m = structural(run(
            Schema::refs(LINE_RANGE),
            &Justification::new().line(1).range(1, 3),
            4,
        ));
        assert!(m.contains("opening line"), "m={m}");
        let m = structural(run(
            Schema::refs(LINE_RANGE),
            &Justification::new().line(1).range(3, 2),
            4,
        ));
        assert!(m.contains("empty range"), "m={m}");
    }

    #[test]
    fn ranges_must_end_before_target() {
        let m = structural(run(
            Schema::refs(&[RefKind::Range]),
            &Justification::new().range(2, 3),
            3,
        ));
        assert!(m.contains("(steps 2-3) must come before step 3"), "m={m}");
    }

    #[test]
    fn lines_inside_closed_boxes_cannot_be_cited() {
        let m = structural(run(Schema::refs(LINE), &Justification::new().line(3), 4));
        assert!(m.contains("closes before step 4"), "m={m}");
        assert_eq!(run(Schema::refs(LINE), &Justification::new().line(1), 4), Ok(Verdict::Valid));
    }

    #[test]
    fn unconstrained_schema_ignores_references() {
        let j = Justification::new().line(99).range(7, 3);
        assert_eq!(run(Schema::NONE, &j, 1), Ok(Verdict::Valid));
    }

    #[test]
    fn malformed_target_is_an_error_not_a_verdict() {
        let mut b = ProofBuilder::new();
        b.premise(Expression::apply("P", Vec::new()));
        let proof = b.build();
        let out = Justifier::new(Schema::NONE, accept).check(
            &Engine::new(),
            &RulebookConfig::default(),
            &proof,
            1,
            &Justification::new(),
        );
        assert!(matches!(out, Err(VerifyError::Malformed(_))), "out={out:?}");
    }
}
