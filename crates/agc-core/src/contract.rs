//! Contract model — variables, assumptions, guarantees
//!
//! A contract is filled in field by field while the parser walks its block,
//! then saturated exactly once before any check formula reads it.

use serde::{Deserialize, Serialize};

/// A declared boolean state variable with its initial-value expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    /// Emitted verbatim into `init(name) := value;`
    pub initial: String,
}

impl Variable {
    pub fn new(name: impl Into<String>, initial: impl Into<String>) -> Self {
        Variable {
            name: name.into(),
            initial: initial.into(),
        }
    }
}

/// Single-expression form of a contract, produced by saturation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Saturated {
    pub assumptions: String,
    pub guarantees: String,
}

/// An assume-guarantee contract
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub name: String,
    pub variables: Vec<Variable>,
    pub assumptions: Vec<String>,
    pub guarantees: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturated: Option<Saturated>,
}

impl Contract {
    pub fn new(name: impl Into<String>) -> Self {
        Contract {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_variables(&mut self, variables: Vec<Variable>) {
        self.variables = variables;
    }

    pub fn set_assumptions(&mut self, assumptions: Vec<String>) {
        self.assumptions = assumptions;
    }

    pub fn set_guarantees(&mut self, guarantees: Vec<String>) {
        self.guarantees = guarantees;
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Saturated form, `None` until [`crate::algebra::saturate`] has run
    pub fn saturated(&self) -> Option<&Saturated> {
        self.saturated.as_ref()
    }

    pub fn is_saturated(&self) -> bool {
        self.saturated.is_some()
    }
}

/// Contracts keyed by name, in declaration order
///
/// Declaration order matters: the module preamble is taken from the
/// first contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contracts {
    contracts: Vec<Contract>,
}

impl Contracts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a contract; returns it back if the name is already taken
    pub fn add_contract(&mut self, contract: Contract) -> std::result::Result<(), Contract> {
        if self.contains(&contract.name) {
            return Err(contract);
        }
        self.contracts.push(contract);
        Ok(())
    }

    pub fn get_contract(&self, name: &str) -> Option<&Contract> {
        self.contracts.iter().find(|c| c.name == name)
    }

    pub fn get_contract_mut(&mut self, name: &str) -> Option<&mut Contract> {
        self.contracts.iter_mut().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get_contract(name).is_some()
    }

    pub fn first(&self) -> Option<&Contract> {
        self.contracts.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Contract> {
        self.contracts.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Contract> {
        self.contracts.iter_mut()
    }

    pub fn names(&self) -> Vec<&str> {
        self.contracts.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

impl<'a> IntoIterator for &'a Contracts {
    type Item = &'a Contract;
    type IntoIter = std::slice::Iter<'a, Contract>;

    fn into_iter(self) -> Self::IntoIter {
        self.contracts.iter()
    }
}
