//! First-order logic core for natural-deduction checking.
//!
//! - `expr`: the expression tree consumed from the parser layer.
//! - `subst`: capture-aware substitution of 0-ary atoms by terms.
//! - `equality`: alpha-equivalence, optionally modulo a rewrite `from ↦ to`.
//! - `engine`: the two above behind one handle with a diagnostic hook.
//!
//! Everything here is pure: inputs are borrowed, outputs are fresh trees.

pub mod engine;
pub mod equality;
pub mod error;
pub mod expr;
pub mod subst;
pub mod trace;

pub use engine::Engine;
pub use error::MalformedExpression;
pub use expr::{Connective, Expression, Name, QuantifierKind};
pub use trace::{TraceEvent, TraceHook};
