use thiserror::Error;

/// An expression that violates the parser's well-formedness contract.
///
/// This is a defect in whatever produced the tree, never a verification
/// outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedExpression {
    #[error("malformed expression: atom with an empty name")]
    EmptyName,
    #[error("malformed expression: quantifier binds an empty variable name")]
    EmptyBinder,
    #[error("malformed expression: atom `{name}` has an empty argument list")]
    EmptyArguments { name: String },
}
