//! Check synthesis — LTL verification clauses and SMV module generation
//!
//! Each check becomes one `LTLSPEC` clause asserting that its failure
//! condition never occurs. Clauses are written in check order; the verdict
//! interpreter relies on that order to pair engine results with checks.
//!
//! # Module layout
//!
//! ```text
//! MODULE main
//! VAR
//! 	request: boolean;
//! ASSIGN
//! 	init(request) := FALSE;
//!
//! 	LTLSPEC !(G1 & G2);
//! ```
//!
//! The `VAR`/`ASSIGN` preamble comes from the first declared contract. All
//! contracts must therefore share one variable set; a mismatch is an error,
//! never silently resolved.

use std::fmt::Write as _;

use tracing::debug;

use crate::check::{Check, CheckKind};
use crate::contract::{Contract, Contracts, Saturated};
use crate::{algebra, Error, Result, Specification};

/// Compatibility clause: no behavior where both assumptions hold yet the
/// guarantees cannot jointly hold
pub fn compatibility(a: &Saturated, b: &Saturated) -> String {
    format!(
        "!( ({} & {}) | !({} & {}) )",
        a.assumptions, b.assumptions, a.guarantees, b.guarantees
    )
}

/// Consistency clause: the guarantees together are not contradictory
pub fn consistency(a: &Saturated, b: &Saturated) -> String {
    format!("!({} & {})", a.guarantees, b.guarantees)
}

/// Verification formula for one check over saturated contracts
pub fn formula(check: &Check, contracts: &Contracts) -> Result<String> {
    let a = saturated(contracts, check.first())?;
    let b = saturated(contracts, check.second())?;
    Ok(match check.kind {
        CheckKind::Compatibility => compatibility(a, b),
        CheckKind::Consistency => consistency(a, b),
    })
}

fn saturated<'a>(contracts: &'a Contracts, name: &str) -> Result<&'a Saturated> {
    let contract = contracts
        .get_contract(name)
        .ok_or_else(|| Error::Unsaturated(name.to_string()))?;
    contract
        .saturated()
        .ok_or_else(|| Error::Unsaturated(name.to_string()))
}

/// Ensure every contract declares the same variables as the first one
///
/// Names and initial values must agree; declaration order may differ.
pub fn check_variable_sets(contracts: &Contracts) -> Result<()> {
    let Some(reference) = contracts.first() else {
        return Ok(());
    };

    for contract in contracts.iter().skip(1) {
        if let Some(detail) = variable_set_difference(reference, contract) {
            return Err(Error::VariableSetMismatch {
                reference: reference.name.clone(),
                contract: contract.name.clone(),
                detail,
            });
        }
    }
    Ok(())
}

fn variable_set_difference(reference: &Contract, other: &Contract) -> Option<String> {
    for var in &reference.variables {
        match other.variable(&var.name) {
            None => return Some(format!("missing variable '{}'", var.name)),
            Some(found) if found.initial != var.initial => {
                return Some(format!(
                    "variable '{}' starts at '{}' instead of '{}'",
                    var.name, found.initial, var.initial
                ))
            }
            Some(_) => {}
        }
    }
    other
        .variables
        .iter()
        .find(|v| reference.variable(&v.name).is_none())
        .map(|v| format!("extra variable '{}'", v.name))
}

/// Render the module for already-saturated contracts
///
/// # Errors
/// `VariableSetMismatch` if contracts disagree on variables, `Unsaturated`
/// if a checked contract was never saturated.
pub fn generate_module(spec: &Specification) -> Result<String> {
    check_variable_sets(&spec.contracts)?;

    let mut out = String::new();
    out.push_str("MODULE main\n");

    out.push_str("VAR\n");
    let variables = spec
        .contracts
        .first()
        .map(|c| c.variables.as_slice())
        .unwrap_or_default();
    for var in variables {
        let _ = writeln!(out, "\t{}: boolean;", var.name);
    }

    out.push_str("ASSIGN\n");
    for var in variables {
        let _ = writeln!(out, "\tinit({}) := {};", var.name, var.initial);
    }

    out.push('\n');

    for (index, check) in spec.checks.iter().enumerate() {
        let clause = formula(check, &spec.contracts)?;
        debug!(index, check = %check, clause = %clause, "synthesized clause");
        let _ = writeln!(out, "\tLTLSPEC {};", clause);
    }

    Ok(out)
}

/// Saturate every contract, then render the module
pub fn compile(spec: &mut Specification) -> Result<String> {
    algebra::saturate_all(&mut spec.contracts);
    generate_module(spec)
}
