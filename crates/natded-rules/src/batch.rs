//! Checking many steps at once.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::VerifyError;
use crate::justification::{Justification, RuleKey, Verdict};
use crate::proof::Proof;
use crate::rulebook::Rulebook;

/// One step to check: its index, the claimed rule and the evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCheck {
    pub step: usize,
    pub rule: RuleKey,
    #[serde(default)]
    pub justification: Justification,
}

impl StepCheck {
    pub fn new(step: usize, rule: impl Into<RuleKey>, justification: Justification) -> Self {
        Self {
            step,
            rule: rule.into(),
            justification,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: usize,
    pub rule: RuleKey,
    pub outcome: Result<Verdict, VerifyError>,
}

impl StepReport {
    pub fn is_valid(&self) -> bool {
        matches!(&self.outcome, Ok(v) if v.is_valid())
    }
}

impl Rulebook {
    /// Verify every check against `proof` in parallel.
    ///
    /// Reports come back in the order of `checks`.
    pub fn verify_all(&self, proof: &Proof, checks: &[StepCheck]) -> Vec<StepReport> {
        let reports: Vec<StepReport> = checks
            .par_iter()
            .map(|check| StepReport {
                step: check.step,
                rule: check.rule.clone(),
                outcome: self.verify(&check.rule, proof, check.step, &check.justification),
            })
            .collect();
        let failed = reports.iter().filter(|r| !r.is_valid()).count();
        tracing::debug!(checked = reports.len(), failed, "verified proof steps");
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::ProofBuilder;
    use natded_logic::Expression;

    #[test]
    fn reports_follow_input_order() {
        let mut b = ProofBuilder::new();
        let p = Expression::atom("P");
        b.premise(p.clone());
        b.step(p.clone());
        b.step(Expression::atom("Q"));
        let proof = b.build();

        let checks = vec![
            StepCheck::new(3, "copy", Justification::new().line(1)),
            StepCheck::new(1, "premise", Justification::new()),
            StepCheck::new(2, "copy", Justification::new().line(1)),
            StepCheck::new(9, "premise", Justification::new()),
        ];
        let reports = Rulebook::new().verify_all(&proof, &checks);

        let steps: Vec<usize> = reports.iter().map(|r| r.step).collect();
        assert_eq!(steps, vec![3, 1, 2, 9]);
        assert!(matches!(reports[0].outcome, Ok(Verdict::Invalid(_))));
        assert!(reports[1].is_valid());
        assert!(reports[2].is_valid());
        assert_eq!(
            reports[3].outcome,
            Err(VerifyError::StepOutOfRange { step: 9, len: 3 })
        );
    }

    #[test]
    fn step_checks_deserialize_from_json() {
        let check: StepCheck = serde_json::from_str(
            r#"{"step": 3, "rule": {"name": "and", "role": "elim"}, "justification": {"side": "right", "references": [1]}}"#,
        )
        .expect("parse");
        assert_eq!(check.rule, RuleKey::elim("and"));
        assert_eq!(check.justification.references.len(), 1);
    }
}
