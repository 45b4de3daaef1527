//! Rulebook configuration.
//!
//! Every loadable field has a default, so an empty JSON object is a valid
//! config. Unknown keys are rejected.

use std::path::Path;

use anyhow::{Context, Result};
use natded_logic::Expression;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulebookConfig {
    /// 0-ary atom names that denote falsum.
    pub contradiction_symbols: Vec<String>,
    /// Cited steps must come strictly before the checked step.
    ///
    /// Unsafe debugging switch: turning it off lets unsound steps verify.
    /// Not loadable from JSON.
    #[serde(skip)]
    pub check_reference_order: bool,
    /// Cited ranges must cover exactly one closed box, and every cited step
    /// or box must still be in scope at the checked step.
    ///
    /// Unsafe debugging switch: turning it off lets unsound steps verify.
    /// Not loadable from JSON.
    #[serde(skip)]
    pub check_box_boundaries: bool,
    /// Equality elimination may also rewrite right-to-left.
    pub symmetric_equality_elim: bool,
}

impl Default for RulebookConfig {
    fn default() -> Self {
        Self {
            contradiction_symbols: vec!["_|_".to_string(), "contradiction".to_string()],
            check_reference_order: true,
            check_box_boundaries: true,
            symmetric_equality_elim: true,
        }
    }
}

impl RulebookConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rulebook config {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("failed to load rulebook config {}", path.display()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.contradiction_symbols.is_empty() {
            return Err(ConfigError::Invalid(
                "contradiction_symbols must name at least one symbol".to_string(),
            ));
        }
        if let Some(bad) = self.contradiction_symbols.iter().find(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "contradiction symbol {bad:?} is blank"
            )));
        }
        Ok(())
    }

    pub fn is_contradiction(&self, expr: &Expression) -> bool {
        expr.as_constant()
            .is_some_and(|name| self.contradiction_symbols.iter().any(|s| s == name))
    }
}
