//! First-order expression trees.
//!
//! Expressions arrive from an external parser and are never mutated here:
//! substitution and every other transformation allocates a new tree.
//!
//! Well-formedness contract (checked by `Expression::check_well_formed`):
//! - atom names and quantifier binders are non-empty,
//! - an atom either has no argument list (a proposition, constant or
//!   variable) or a non-empty one (a predicate/function application).

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MalformedExpression;

pub type Name = String;

/// Binary connectives (equality is treated as one for structural purposes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connective {
    And,
    Or,
    Implies,
    Iff,
    Eq,
}

impl Connective {
    pub fn symbol(self) -> &'static str {
        match self {
            Connective::And => "∧",
            Connective::Or => "∨",
            Connective::Implies => "→",
            Connective::Iff => "↔",
            Connective::Eq => "=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantifierKind {
    ForAll,
    Exists,
}

impl QuantifierKind {
    pub fn symbol(self) -> &'static str {
        match self {
            QuantifierKind::ForAll => "∀",
            QuantifierKind::Exists => "∃",
        }
    }
}

/// A first-order expression.
///
/// The derived `PartialEq` is plain syntactic equality (grouping included).
/// Use the equality engine for comparisons modulo grouping and bound-variable
/// renaming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum Expression {
    Atom {
        name: Name,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        args: Option<Vec<Expression>>,
    },
    Not {
        operand: Box<Expression>,
    },
    Binary {
        op: Connective,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Quantifier {
        kind: QuantifierKind,
        variable: Name,
        body: Box<Expression>,
    },
    Paren {
        inner: Box<Expression>,
    },
}

// ============================================================================
// Constructors
// ============================================================================

impl Expression {
    /// A 0-ary atom: propositional constant, individual constant or variable.
    pub fn atom(name: impl Into<Name>) -> Self {
        Expression::Atom {
            name: name.into(),
            args: None,
        }
    }

    /// A predicate or function application `name(args...)`.
    pub fn apply(name: impl Into<Name>, args: Vec<Expression>) -> Self {
        Expression::Atom {
            name: name.into(),
            args: Some(args),
        }
    }

    /// Shorthand for a predicate applied to 0-ary atoms: `pred("P", &["x"])`.
    pub fn pred(name: impl Into<Name>, args: &[&str]) -> Self {
        Self::apply(name, args.iter().map(|a| Self::atom(*a)).collect())
    }

    pub fn not(operand: Expression) -> Self {
        Expression::Not {
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: Connective, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Self::binary(Connective::And, left, right)
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Self::binary(Connective::Or, left, right)
    }

    pub fn implies(left: Expression, right: Expression) -> Self {
        Self::binary(Connective::Implies, left, right)
    }

    pub fn iff(left: Expression, right: Expression) -> Self {
        Self::binary(Connective::Iff, left, right)
    }

    pub fn equals(left: Expression, right: Expression) -> Self {
        Self::binary(Connective::Eq, left, right)
    }

    pub fn quantifier(kind: QuantifierKind, variable: impl Into<Name>, body: Expression) -> Self {
        Expression::Quantifier {
            kind,
            variable: variable.into(),
            body: Box::new(body),
        }
    }

    pub fn forall(variable: impl Into<Name>, body: Expression) -> Self {
        Self::quantifier(QuantifierKind::ForAll, variable, body)
    }

    pub fn exists(variable: impl Into<Name>, body: Expression) -> Self {
        Self::quantifier(QuantifierKind::Exists, variable, body)
    }

    pub fn paren(inner: Expression) -> Self {
        Expression::Paren {
            inner: Box::new(inner),
        }
    }
}

// ============================================================================
// Structural views (grouping is always looked through)
// ============================================================================

impl Expression {
    /// Strip any number of `Paren` wrappers.
    pub fn unparen(&self) -> &Expression {
        let mut expr = self;
        while let Expression::Paren { inner } = expr {
            expr = inner;
        }
        expr
    }

    pub fn as_not(&self) -> Option<&Expression> {
        match self.unparen() {
            Expression::Not { operand } => Some(operand),
            _ => None,
        }
    }

    /// `(left, right)` if this is a binary expression with connective `op`.
    pub fn as_binary(&self, op: Connective) -> Option<(&Expression, &Expression)> {
        match self.unparen() {
            Expression::Binary {
                op: found,
                left,
                right,
            } if *found == op => Some((left, right)),
            _ => None,
        }
    }

    /// `(variable, body)` if this is a quantifier of the given kind.
    pub fn as_quantifier(&self, kind: QuantifierKind) -> Option<(&str, &Expression)> {
        match self.unparen() {
            Expression::Quantifier {
                kind: found,
                variable,
                body,
            } if *found == kind => Some((variable.as_str(), body)),
            _ => None,
        }
    }

    /// The name of a 0-ary atom.
    pub fn as_constant(&self) -> Option<&str> {
        match self.unparen() {
            Expression::Atom { name, args: None } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Validate the well-formedness contract over the whole tree.
    pub fn check_well_formed(&self) -> Result<(), MalformedExpression> {
        match self {
            Expression::Atom { name, args } => {
                if name.is_empty() {
                    return Err(MalformedExpression::EmptyName);
                }
                match args {
                    None => Ok(()),
                    Some(args) if args.is_empty() => Err(MalformedExpression::EmptyArguments {
                        name: name.clone(),
                    }),
                    Some(args) => args.iter().try_for_each(Expression::check_well_formed),
                }
            }
            Expression::Not { operand } => operand.check_well_formed(),
            Expression::Binary { left, right, .. } => {
                left.check_well_formed()?;
                right.check_well_formed()
            }
            Expression::Quantifier { variable, body, .. } => {
                if variable.is_empty() {
                    return Err(MalformedExpression::EmptyBinder);
                }
                body.check_well_formed()
            }
            Expression::Paren { inner } => inner.check_well_formed(),
        }
    }

    /// Names of 0-ary atoms that occur outside the scope of a binder for them.
    pub fn free_variables(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        let mut bound = Vec::new();
        collect_free(self, &mut bound, &mut out);
        out
    }

    pub fn occurs_free(&self, name: &str) -> bool {
        self.free_variables().contains(name)
    }
}

fn collect_free<'a>(expr: &'a Expression, bound: &mut Vec<&'a str>, out: &mut BTreeSet<&'a str>) {
    match expr {
        Expression::Atom { name, args: None } => {
            if !bound.contains(&name.as_str()) {
                out.insert(name.as_str());
            }
        }
        Expression::Atom {
            args: Some(args), ..
        } => {
            for arg in args {
                collect_free(arg, bound, out);
            }
        }
        Expression::Not { operand } => collect_free(operand, bound, out),
        Expression::Binary { left, right, .. } => {
            collect_free(left, bound, out);
            collect_free(right, bound, out);
        }
        Expression::Quantifier { variable, body, .. } => {
            bound.push(variable.as_str());
            collect_free(body, bound, out);
            bound.pop();
        }
        Expression::Paren { inner } => collect_free(inner, bound, out),
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Atom { name, args: None } => write!(f, "{name}"),
            Expression::Atom {
                name,
                args: Some(args),
            } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Expression::Not { operand } => {
                write!(f, "¬")?;
                write_operand(f, operand)
            }
            Expression::Binary { op, left, right } => {
                write_operand(f, left)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(f, right)
            }
            Expression::Quantifier {
                kind,
                variable,
                body,
            } => {
                write!(f, "{}{variable}.", kind.symbol())?;
                write_operand(f, body)
            }
            Expression::Paren { inner } => write!(f, "({inner})"),
        }
    }
}

/// Binary sub-expressions are parenthesized so the rendering stays unambiguous.
fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expression) -> fmt::Result {
    match expr {
        Expression::Binary { .. } => write!(f, "({expr})"),
        _ => write!(f, "{expr}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparen_strips_nested_grouping() {
        let p = Expression::atom("P");
        let wrapped = Expression::paren(Expression::paren(p.clone()));
        assert_eq!(wrapped.unparen(), &p);
        assert_eq!(wrapped.as_constant(), Some("P"));
    }

    #[test]
    fn structural_views_look_through_parens() {
        let e = Expression::paren(Expression::implies(
            Expression::atom("P"),
            Expression::atom("Q"),
        ));
        let (l, r) = e.as_binary(Connective::Implies).expect("implication");
        assert_eq!(l.as_constant(), Some("P"));
        assert_eq!(r.as_constant(), Some("Q"));
        assert!(e.as_binary(Connective::And).is_none());
    }

    #[test]
    fn free_variables_skip_bound_occurrences() {
        // ∀x.(P(x, y)) ∧ Q(x)
        let e = Expression::and(
            Expression::forall("x", Expression::pred("P", &["x", "y"])),
            Expression::pred("Q", &["x"]),
        );
        let free: Vec<&str> = e.free_variables().into_iter().collect();
        assert_eq!(free, vec!["x", "y"]);

        let closed = Expression::forall("x", Expression::pred("P", &["x"]));
        assert!(!closed.occurs_free("x"));
    }

    #[test]
    fn well_formedness_rejects_empty_argument_lists() {
        let bad = Expression::not(Expression::apply("P", Vec::new()));
        assert_eq!(
            bad.check_well_formed(),
            Err(MalformedExpression::EmptyArguments {
                name: "P".to_string()
            })
        );
        assert_eq!(
            Expression::forall("", Expression::atom("P")).check_well_formed(),
            Err(MalformedExpression::EmptyBinder)
        );
        assert!(Expression::pred("P", &["x"]).check_well_formed().is_ok());
    }

    #[test]
    fn display_is_unambiguous() {
        let e = Expression::implies(
            Expression::and(Expression::atom("P"), Expression::atom("Q")),
            Expression::forall("x", Expression::pred("R", &["x", "c"])),
        );
        assert_eq!(e.to_string(), "(P ∧ Q) → ∀x.R(x, c)");
    }

    #[test]
    fn serde_uses_tagged_shape() {
        let e = Expression::not(Expression::atom("P"));
        let json = serde_json::to_string(&e).expect("serialize");
        assert_eq!(
            json,
            r#"{"tag":"not","operand":{"tag":"atom","name":"P"}}"#
        );
        let back: Expression = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, e);
    }
}
