//! The engine handed to rule predicates: substitution + equality with tracing.

use std::fmt;

use crate::equality;
use crate::error::MalformedExpression;
use crate::expr::Expression;
use crate::subst;
use crate::trace::{TraceEvent, TraceHook};

/// Stateless apart from the optional trace hook; cheap to clone and `Sync`.
#[derive(Clone, Default)]
pub struct Engine {
    hook: Option<TraceHook>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("hook", &self.hook.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace_hook(hook: TraceHook) -> Self {
        Self { hook: Some(hook) }
    }

    fn emit(&self, event: TraceEvent<'_>) {
        if let Some(hook) = &self.hook {
            hook(&event);
        }
    }

    /// Replace free occurrences of `variable` in `expr` with `replacement`.
    ///
    /// See `subst` for the capture precondition.
    pub fn substitute(
        &self,
        expr: &Expression,
        variable: &str,
        replacement: &Expression,
    ) -> Result<Expression, MalformedExpression> {
        tracing::trace!(%expr, variable, %replacement, "substitute");
        self.emit(TraceEvent::Substitute {
            expr,
            variable,
            replacement,
        });
        subst::substitute(expr, variable, replacement)
    }

    pub fn semantic_eq(&self, left: &Expression, right: &Expression) -> bool {
        tracing::trace!(%left, %right, "semantic_eq");
        self.emit(TraceEvent::SemanticEq {
            left,
            right,
            rewrite: None,
        });
        equality::alpha_eq(left, right)
    }

    /// `right` is `left` with some free occurrences of `from` replaced by `to`.
    pub fn semantic_eq_rewriting(
        &self,
        left: &Expression,
        right: &Expression,
        from: &Expression,
        to: &Expression,
    ) -> bool {
        tracing::trace!(%left, %right, %from, %to, "semantic_eq_rewriting");
        self.emit(TraceEvent::SemanticEq {
            left,
            right,
            rewrite: Some((from, to)),
        });
        equality::alpha_eq_rewriting(left, right, from, to)
    }
}
