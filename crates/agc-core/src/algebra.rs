//! Contract algebra — saturation, composition, conjunction
//!
//! Saturation folds a contract's raw assumption and guarantee clauses into
//! one conjunction each, the form the formula synthesizer consumes.
//! Formulas stay opaque text; only parenthesization is inspected, so a
//! clause such as `a | b` cannot bind across the inserted `&`.

use tracing::debug;

use crate::contract::{Contract, Contracts, Saturated};
use crate::{Error, Result};

/// Identity element of conjunction
pub const TRUE: &str = "TRUE";

/// Saturate one contract in place
///
/// Clauses are conjoined in declaration order; a contract with no clauses
/// saturates to `TRUE`. Running it twice yields the same result.
pub fn saturate(contract: &mut Contract) {
    let saturated = Saturated {
        assumptions: conjunction(&contract.assumptions),
        guarantees: conjunction(&contract.guarantees),
    };
    debug!(
        contract = %contract.name,
        assumptions = %saturated.assumptions,
        guarantees = %saturated.guarantees,
        "saturated contract"
    );
    contract.saturated = Some(saturated);
}

/// Saturate every contract of a specification
pub fn saturate_all(contracts: &mut Contracts) {
    for contract in contracts.iter_mut() {
        saturate(contract);
    }
}

/// Conjoin clauses with `&`, parenthesizing those that need it
pub fn conjunction<S: AsRef<str>>(clauses: &[S]) -> String {
    if clauses.is_empty() {
        return TRUE.to_string();
    }
    clauses
        .iter()
        .map(|c| group(c.as_ref()))
        .collect::<Vec<_>>()
        .join(" & ")
}

/// Composition of two saturated contracts
///
/// A = (A1 & A2) | !(G1 & G2), G = G1 & G2. The result is saturated and
/// declares the variables of `a` followed by any only `b` declares.
pub fn compose(name: &str, a: &Contract, b: &Contract) -> Result<Contract> {
    let (sa, sb) = (saturated(a)?, saturated(b)?);
    let assumption = format!(
        "({} & {}) | !({} & {})",
        sa.assumptions, sb.assumptions, sa.guarantees, sb.guarantees
    );
    Ok(combine(name, a, b, assumption))
}

/// Conjunction of two saturated contracts
///
/// A = A1 | A2, G = G1 & G2.
pub fn conjoin(name: &str, a: &Contract, b: &Contract) -> Result<Contract> {
    let (sa, sb) = (saturated(a)?, saturated(b)?);
    let assumption = format!("{} | {}", group(&sa.assumptions), group(&sb.assumptions));
    Ok(combine(name, a, b, assumption))
}

fn combine(name: &str, a: &Contract, b: &Contract, assumption: String) -> Contract {
    let mut result = Contract::new(name);

    let mut variables = a.variables.clone();
    for var in &b.variables {
        if a.variable(&var.name).is_none() {
            variables.push(var.clone());
        }
    }
    result.set_variables(variables);
    result.set_assumptions(vec![assumption]);
    result.set_guarantees(a.guarantees.iter().chain(&b.guarantees).cloned().collect());

    saturate(&mut result);
    result
}

fn saturated(contract: &Contract) -> Result<&Saturated> {
    contract
        .saturated()
        .ok_or_else(|| Error::Unsaturated(contract.name.clone()))
}

/// Wrap `expr` in parentheses unless it is already self-delimited
pub fn group(expr: &str) -> String {
    let expr = expr.trim();
    if is_self_delimited(expr) {
        expr.to_string()
    } else {
        format!("({})", expr)
    }
}

/// Whether `expr` parses as a single operand without extra parentheses
///
/// True for identifiers and constants, negations of a self-delimited
/// operand, and a parenthesized group optionally preceded by an operator
/// name such as `G`, `F` or `next`.
pub fn is_self_delimited(expr: &str) -> bool {
    let expr = expr.trim();
    if expr.is_empty() {
        return false;
    }
    if let Some(rest) = expr.strip_prefix('!') {
        return is_self_delimited(rest);
    }
    if expr.chars().all(is_atom_char) {
        return true;
    }
    if !expr.ends_with(')') {
        return false;
    }

    match matching_open_paren(expr) {
        Some(open) => {
            let prefix = &expr[..open];
            prefix.is_empty() || prefix.chars().all(is_atom_char)
        }
        None => false,
    }
}

fn is_atom_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '#' | '.')
}

/// Byte index of the `(` matching the trailing `)`
fn matching_open_paren(expr: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in expr.char_indices().rev() {
        match ch {
            ')' => depth += 1,
            '(' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}
