//! Checks — verification requests over pairs of contracts

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of verification requested for a contract pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    /// Assumptions and guarantees of both contracts can hold together
    Compatibility,
    /// Guarantees of both contracts do not contradict each other
    Consistency,
}

impl CheckKind {
    pub const ALL: [CheckKind; 2] = [CheckKind::Compatibility, CheckKind::Consistency];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Compatibility => "compatibility",
            CheckKind::Consistency => "consistency",
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized check kind token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCheckKind(pub String);

impl std::fmt::Display for UnknownCheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let known: Vec<&str> = CheckKind::ALL.iter().map(|k| k.as_str()).collect();
        write!(
            f,
            "unknown check kind '{}' (expected one of: {})",
            self.0,
            known.join(", ")
        )
    }
}

impl std::error::Error for UnknownCheckKind {}

impl FromStr for CheckKind {
    type Err = UnknownCheckKind;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        CheckKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownCheckKind(s.to_string()))
    }
}

/// A check applied to an ordered pair of contracts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    pub kind: CheckKind,
    /// Contract names, in the order written
    pub contracts: [String; 2],
}

impl Check {
    pub fn new(kind: CheckKind, first: impl Into<String>, second: impl Into<String>) -> Self {
        Check {
            kind,
            contracts: [first.into(), second.into()],
        }
    }

    pub fn first(&self) -> &str {
        &self.contracts[0]
    }

    pub fn second(&self) -> &str {
        &self.contracts[1]
    }
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}({}, {})", self.kind, self.first(), self.second())
    }
}

/// Checks in declaration order
///
/// The order is load-bearing: it fixes the order of emitted `LTLSPEC`
/// clauses and therefore the order engine verdicts are paired back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checks {
    checks: Vec<Check>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_check(&mut self, check: Check) {
        self.checks.push(check);
    }

    pub fn get(&self, index: usize) -> Option<&Check> {
        self.checks.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Check> {
        self.checks.iter()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl<'a> IntoIterator for &'a Checks {
    type Item = &'a Check;
    type IntoIter = std::slice::Iter<'a, Check>;

    fn into_iter(self) -> Self::IntoIter {
        self.checks.iter()
    }
}
