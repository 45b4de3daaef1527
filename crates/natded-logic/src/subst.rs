//! Capture-aware term substitution.
//!
//! `substitute(e, x, t)` replaces every free occurrence of the 0-ary atom `x`
//! in `e` with `t`. Occurrences under a quantifier that re-binds `x` are left
//! alone. Nothing is renamed: callers must pick `x` so that `t` is not captured
//! by a binder inside `e` (eigenvariables are fresh by construction of the
//! proof's scope discipline, which the rule layer checks).
//!
//! Grouping (`Paren`) is erased in the output. Predicate and function symbols
//! are never substituted, only 0-ary atoms.

use crate::error::MalformedExpression;
use crate::expr::Expression;

pub fn substitute(
    expr: &Expression,
    variable: &str,
    replacement: &Expression,
) -> Result<Expression, MalformedExpression> {
    let mut bound = Vec::new();
    substitute_under(expr, variable, replacement, &mut bound)
}

fn substitute_under<'a>(
    expr: &'a Expression,
    variable: &str,
    replacement: &Expression,
    bound: &mut Vec<&'a str>,
) -> Result<Expression, MalformedExpression> {
    match expr {
        Expression::Paren { inner } => substitute_under(inner, variable, replacement, bound),
        Expression::Binary { op, left, right } => Ok(Expression::binary(
            *op,
            substitute_under(left, variable, replacement, bound)?,
            substitute_under(right, variable, replacement, bound)?,
        )),
        Expression::Not { operand } => Ok(Expression::not(substitute_under(
            operand,
            variable,
            replacement,
            bound,
        )?)),
        Expression::Quantifier {
            kind,
            variable: binder,
            body,
        } => {
            if binder.is_empty() {
                return Err(MalformedExpression::EmptyBinder);
            }
            bound.push(binder.as_str());
            let body = substitute_under(body, variable, replacement, bound);
            bound.pop();
            Ok(Expression::quantifier(*kind, binder.clone(), body?))
        }
        Expression::Atom { name, args: None } => {
            if name.is_empty() {
                return Err(MalformedExpression::EmptyName);
            }
            if name == variable && !bound.iter().any(|b| *b == variable) {
                Ok(replacement.clone())
            } else {
                Ok(expr.clone())
            }
        }
        Expression::Atom {
            name,
            args: Some(args),
        } => {
            if name.is_empty() {
                return Err(MalformedExpression::EmptyName);
            }
            if args.is_empty() {
                return Err(MalformedExpression::EmptyArguments { name: name.clone() });
            }
            let args = args
                .iter()
                .map(|arg| substitute_under(arg, variable, replacement, bound))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expression::apply(name.clone(), args))
        }
    }
}
