//! Structural equality modulo grouping and bound-variable renaming.
//!
//! Two modes:
//!
//! - `alpha_eq(a, b)`: the trees agree on every connective, quantifier kind,
//!   predicate symbol and arity, and their variables agree positionally:
//!   a bound variable on the left matches only the variable bound by the
//!   binder at the same depth on the right, and free variables match by name.
//!   So `∀x.P(x) ≡ ∀y.P(y)` while `∀x.P(x) ≢ ∃x.P(x)`.
//! - `alpha_eq_rewriting(a, b, from, to)`: as above, but any subtree of `a`
//!   that is `≡ from` may instead correspond to a subtree of `b` that is
//!   `≡ to`, provided neither subtree mentions a variable captured by an
//!   enclosing binder. This is "`b` is `a` with some occurrences of `from`
//!   replaced by `to`".

use crate::expr::Expression;

pub fn alpha_eq(a: &Expression, b: &Expression) -> bool {
    Matcher { rewrite: None }.matches(a, b, &mut Binders::default())
}

pub fn alpha_eq_rewriting(
    a: &Expression,
    b: &Expression,
    from: &Expression,
    to: &Expression,
) -> bool {
    Matcher {
        rewrite: Some((from, to)),
    }
    .matches(a, b, &mut Binders::default())
}

/// Binder pairs opened while descending both trees in lockstep, innermost last.
#[derive(Debug, Default)]
struct Binders<'a> {
    pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> Binders<'a> {
    fn left_depth(&self, name: &str) -> Option<usize> {
        self.pairs.iter().rposition(|(l, _)| *l == name)
    }

    fn right_depth(&self, name: &str) -> Option<usize> {
        self.pairs.iter().rposition(|(_, r)| *r == name)
    }

    fn same_variable(&self, left: &str, right: &str) -> bool {
        match (self.left_depth(left), self.right_depth(right)) {
            (Some(i), Some(j)) => i == j,
            (None, None) => left == right,
            _ => false,
        }
    }

    fn captures_left(&self, expr: &Expression) -> bool {
        expr.free_variables()
            .into_iter()
            .any(|v| self.left_depth(v).is_some())
    }

    fn captures_right(&self, expr: &Expression) -> bool {
        expr.free_variables()
            .into_iter()
            .any(|v| self.right_depth(v).is_some())
    }
}

struct Matcher<'r> {
    rewrite: Option<(&'r Expression, &'r Expression)>,
}

impl Matcher<'_> {
    fn matches<'a>(&self, a: &'a Expression, b: &'a Expression, binders: &mut Binders<'a>) -> bool {
        let a = a.unparen();
        let b = b.unparen();

        if let Some((from, to)) = self.rewrite {
            if alpha_eq(a, from)
                && !binders.captures_left(a)
                && alpha_eq(to, b)
                && !binders.captures_right(b)
            {
                return true;
            }
        }

        match (a, b) {
            (
                Expression::Binary {
                    op: op_a,
                    left: left_a,
                    right: right_a,
                },
                Expression::Binary {
                    op: op_b,
                    left: left_b,
                    right: right_b,
                },
            ) => {
                op_a == op_b
                    && self.matches(left_a, left_b, binders)
                    && self.matches(right_a, right_b, binders)
            }
            (Expression::Not { operand: a }, Expression::Not { operand: b }) => {
                self.matches(a, b, binders)
            }
            (
                Expression::Quantifier {
                    kind: kind_a,
                    variable: var_a,
                    body: body_a,
                },
                Expression::Quantifier {
                    kind: kind_b,
                    variable: var_b,
                    body: body_b,
                },
            ) => {
                if kind_a != kind_b {
                    return false;
                }
                binders.pairs.push((var_a.as_str(), var_b.as_str()));
                let same = self.matches(body_a, body_b, binders);
                binders.pairs.pop();
                same
            }
            (
                Expression::Atom {
                    name: name_a,
                    args: None,
                },
                Expression::Atom {
                    name: name_b,
                    args: None,
                },
            ) => binders.same_variable(name_a, name_b),
            (
                Expression::Atom {
                    name: name_a,
                    args: Some(args_a),
                },
                Expression::Atom {
                    name: name_b,
                    args: Some(args_b),
                },
            ) => {
                name_a == name_b
                    && args_a.len() == args_b.len()
                    && args_a
                        .iter()
                        .zip(args_b)
                        .all(|(x, y)| self.matches(x, y, binders))
            }
            _ => false,
        }
    }
}
