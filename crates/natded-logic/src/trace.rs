//! Diagnostic hook invoked at engine entry points.
//!
//! The hook observes; it cannot change results. Engines also emit `tracing`
//! events at the same points, so a subscriber is enough for most debugging.

use std::sync::Arc;

use crate::expr::Expression;

#[derive(Debug, Clone, Copy)]
pub enum TraceEvent<'a> {
    Substitute {
        expr: &'a Expression,
        variable: &'a str,
        replacement: &'a Expression,
    },
    SemanticEq {
        left: &'a Expression,
        right: &'a Expression,
        /// `(from, to)` when comparing modulo a rewrite.
        rewrite: Option<(&'a Expression, &'a Expression)>,
    },
}

pub type TraceHook = Arc<dyn Fn(&TraceEvent<'_>) + Send + Sync>;
