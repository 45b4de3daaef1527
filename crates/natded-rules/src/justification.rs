//! Caller-supplied evidence for one proof step, and the resulting verdict.

use std::fmt;

use natded_logic::{Expression, Name};
use serde::{Deserialize, Serialize};

/// Side selector for `∧`-elimination and `∨`-introduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn select<T>(self, left: T, right: T) -> T {
        match self {
            Side::Left => left,
            Side::Right => right,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Left => "left",
            Side::Right => "right",
        })
    }
}

/// Which half of a connective rule to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Intro,
    Elim,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Intro => "intro",
            Role::Elim => "elim",
        })
    }
}

/// A rule name plus, for connective rules, the role.
///
/// Textual form: `"copy"`, `"and-elim"`, `"->-intro"`, `"a.-elim"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleKey {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl RuleKey {
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
        }
    }

    pub fn intro(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: Some(Role::Intro),
        }
    }

    pub fn elim(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: Some(Role::Elim),
        }
    }
}

impl From<&str> for RuleKey {
    fn from(text: &str) -> Self {
        let text = text.trim();
        if let Some(name) = text.strip_suffix("-intro").filter(|n| !n.is_empty()) {
            return Self::intro(name);
        }
        if let Some(name) = text.strip_suffix("-elim").filter(|n| !n.is_empty()) {
            return Self::elim(name);
        }
        Self::simple(text)
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            Some(role) => write!(f, "{}-{role}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A cited step (`3`) or a cited box (`[4, 7]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    Line(usize),
    Range(usize, usize),
}

/// Replace free occurrences of `variable` by `term`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub term: Expression,
    pub variable: Name,
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.term, self.variable)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Justification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitution: Option<Substitution>,
}

impl Justification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(mut self, index: usize) -> Self {
        self.references.push(Reference::Line(index));
        self
    }

    pub fn range(mut self, start: usize, end: usize) -> Self {
        self.references.push(Reference::Range(start, end));
        self
    }

    pub fn side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    /// `term` replaces `variable`.
    pub fn substitution(mut self, term: Expression, variable: impl Into<Name>) -> Self {
        self.substitution = Some(Substitution {
            term,
            variable: variable.into(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "message", rename_all = "snake_case")]
pub enum Verdict {
    Valid,
    /// The step does not follow by the named rule.
    Invalid(String),
    /// The evidence does not fit the rule's declared shape; rule logic never ran.
    StructuralError(String),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Verdict::Valid => None,
            Verdict::Invalid(m) | Verdict::StructuralError(m) => Some(m),
        }
    }
}
