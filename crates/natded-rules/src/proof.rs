//! Proofs as the editor layer hands them over.
//!
//! A proof is a 1-indexed sequence of steps. Each step records the stack of
//! assumption boxes open at that point (innermost last): `None` for a plain
//! assumption box, `Some(x0)` for a box that introduces eigenvariable `x0`.
//! Box identity is not stored; it is recovered from the scope stacks and the
//! `first_in_scope` flags, which is what `Proof::check_closed_box` does.

use natded_logic::{Expression, Name};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    sentence: Expression,
    #[serde(default)]
    first_in_scope: bool,
    #[serde(default)]
    scope: Vec<Option<Name>>,
}

impl Step {
    pub fn new(sentence: Expression, first_in_scope: bool, scope: Vec<Option<Name>>) -> Self {
        Self {
            sentence,
            first_in_scope,
            scope,
        }
    }

    pub fn sentence(&self) -> &Expression {
        &self.sentence
    }

    /// True for the opening line of a box.
    pub fn is_first_in_scope(&self) -> bool {
        self.first_in_scope
    }

    pub fn scope(&self) -> &[Option<Name>] {
        &self.scope
    }

    /// The eigenvariable of the innermost open box, if that box has one.
    pub fn innermost_eigenvariable(&self) -> Option<&str> {
        self.scope.last().and_then(|v| v.as_deref())
    }

    fn depth(&self) -> usize {
        self.scope.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Proof {
    steps: Vec<Step>,
}

impl Proof {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// 1-indexed lookup.
    pub fn step(&self, index: usize) -> Option<&Step> {
        index.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    pub fn steps(&self) -> impl Iterator<Item = (usize, &Step)> {
        self.steps.iter().enumerate().map(|(i, s)| (i + 1, s))
    }

    /// Check that `start..=end` is exactly one assumption box, and that the box
    /// has been closed by the time step `before` is reached.
    ///
    /// Indices must already be in range with `start <= end < before`.
    pub fn check_closed_box(&self, start: usize, end: usize, before: usize) -> Result<(), String> {
        let Some(first) = self.step(start) else {
            return Err(format!("step {start} does not exist"));
        };
        if !first.is_first_in_scope() || first.depth() == 0 {
            return Err(format!("range {start}-{end} must start at the opening line of a box"));
        }
        let depth = first.depth();
        let prefix = first.scope();

        for index in start + 1..=end {
            let Some(step) = self.step(index) else {
                return Err(format!("step {index} does not exist"));
            };
            if step.depth() < depth || step.scope()[..depth] != *prefix {
                return Err(format!(
                    "range {start}-{end} leaves the box opened at step {start} (step {index})"
                ));
            }
            if step.depth() == depth && step.is_first_in_scope() {
                return Err(format!(
                    "range {start}-{end} spans more than one box (another opens at step {index})"
                ));
            }
        }

        match self.step(end) {
            Some(last) if last.depth() == depth => {}
            _ => {
                return Err(format!(
                    "range {start}-{end} must end at the top level of its box, not inside a nested box"
                ))
            }
        }

        if self.first_exit(prefix, end, before).is_none() {
            return Err(format!(
                "box {start}-{end} is still open at step {before}"
            ));
        }
        Ok(())
    }

    /// Check that step `index` is still in scope at step `before`: no box
    /// enclosing it has closed in between.
    pub fn check_accessible(&self, index: usize, before: usize) -> Result<(), String> {
        let Some(cited) = self.step(index) else {
            return Err(format!("step {index} does not exist"));
        };
        match self.first_exit(cited.scope(), index, before) {
            Some(exit) => Err(format!(
                "step {index} is inside a box that closes before step {before} (at step {exit})"
            )),
            None => Ok(()),
        }
    }

    /// Check that the box opened at `start` is reachable from step `before`:
    /// the context it was opened in has not closed in between.
    pub fn check_box_accessible(&self, start: usize, before: usize) -> Result<(), String> {
        let Some(first) = self.step(start) else {
            return Err(format!("step {start} does not exist"));
        };
        let outer = &first.scope()[..first.depth().saturating_sub(1)];
        match self.first_exit(outer, start, before) {
            Some(exit) => Err(format!(
                "box opened at step {start} sits inside a box that closes before step {before} (at step {exit})"
            )),
            None => Ok(()),
        }
    }

    /// First step in `after+1..=until` that is outside the context `prefix`.
    fn first_exit(&self, prefix: &[Option<Name>], after: usize, until: usize) -> Option<usize> {
        (after + 1..=until).find(|&index| {
            self.step(index)
                .is_some_and(|step| leaves_context(step, prefix))
        })
    }
}

/// True once `step` no longer lies under `prefix`. A sibling box opening at
/// the prefix's own depth counts as leaving it.
fn leaves_context(step: &Step, prefix: &[Option<Name>]) -> bool {
    let depth = prefix.len();
    step.depth() < depth
        || step.scope()[..depth] != *prefix
        || (step.depth() == depth && step.is_first_in_scope())
}

/// Builds a `Proof` while tracking the box structure.
///
/// Every push method returns the 1-based index of the new step.
#[derive(Debug, Default)]
pub struct ProofBuilder {
    steps: Vec<Step>,
    scope: Vec<Option<Name>>,
    opening: bool,
}

impl ProofBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A step in the current box.
    pub fn step(&mut self, sentence: Expression) -> usize {
        let first = std::mem::take(&mut self.opening);
        self.steps.push(Step::new(sentence, first, self.scope.clone()));
        self.steps.len()
    }

    /// Alias of `step`, for readability at the top of a proof.
    pub fn premise(&mut self, sentence: Expression) -> usize {
        self.step(sentence)
    }

    /// Open a plain box whose first line is `sentence`.
    pub fn assume(&mut self, sentence: Expression) -> usize {
        self.scope.push(None);
        self.opening = true;
        self.step(sentence)
    }

    /// Open an eigenvariable box for `variable` whose first line is `sentence`.
    pub fn assume_fresh(&mut self, variable: impl Into<Name>, sentence: Expression) -> usize {
        self.fresh(variable);
        self.step(sentence)
    }

    /// Open an eigenvariable box; the next step becomes its first line.
    pub fn fresh(&mut self, variable: impl Into<Name>) {
        self.scope.push(Some(variable.into()));
        self.opening = true;
    }

    pub fn close(&mut self) {
        self.scope.pop();
        self.opening = false;
    }

    pub fn build(self) -> Proof {
        Proof::new(self.steps)
    }
}
