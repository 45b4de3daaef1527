use natded_logic::MalformedExpression;
use thiserror::Error;

/// Failures that are not verdicts: unknown rules, bad target indices and
/// malformed input trees. A wrong proof step is never reported this way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("unknown rule `{0}`")]
    UnknownRule(String),
    #[error("step {step} is out of range (proof has {len} steps)")]
    StepOutOfRange { step: usize, len: usize },
    #[error(transparent)]
    Malformed(#[from] MalformedExpression),
}

/// What a rule predicate can report besides success.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The soundness condition does not hold; becomes `Verdict::Invalid`.
    #[error("{0}")]
    Rejected(String),
    /// The evidence does not have the shape the predicate expects; becomes
    /// `Verdict::StructuralError`.
    #[error("{0}")]
    Shape(String),
    #[error(transparent)]
    Malformed(#[from] MalformedExpression),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
