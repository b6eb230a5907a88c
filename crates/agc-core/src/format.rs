//! Canonical formatter — one textual form per specification
//!
//! Renders a parsed specification back to specification text with fixed
//! 2-space indentation, fixed field order and no comments. Declaration
//! order is preserved everywhere since it is meaningful: it fixes variable
//! declaration order and the order of emitted clauses.
//!
//! # Guarantees
//!
//! - **Idempotent**: `format(parse(format(x))) == format(x)`
//! - **Faithful**: `parse(format(x)) == x` for an unsaturated `x`
//! - **Deterministic**: the semantic hash depends only on the canonical text

use sha2::{Digest, Sha256};

use crate::contract::Contract;
use crate::parser::{
    ASSUMPTIONS_HEADER, CHECKS_HEADER, CONTRACT_HEADER, GUARANTEES_HEADER, NAME_HEADER,
    VARIABLES_HEADER,
};
use crate::Specification;

/// Render a specification in canonical form
///
/// Only raw clauses are written; saturated expressions are derived data.
pub fn to_canonical(spec: &Specification) -> String {
    let mut blocks: Vec<String> = spec.contracts.iter().map(serialize_contract).collect();

    if !spec.checks.is_empty() {
        let mut out = String::new();
        out.push_str(CHECKS_HEADER);
        out.push('\n');
        for check in &spec.checks {
            write_line(&mut out, 1, &check.to_string());
        }
        blocks.push(out);
    }

    blocks.join("\n")
}

fn serialize_contract(contract: &Contract) -> String {
    let mut out = String::new();
    out.push_str(CONTRACT_HEADER);
    out.push('\n');

    write_line(&mut out, 1, NAME_HEADER);
    write_line(&mut out, 2, &contract.name);

    if !contract.variables.is_empty() {
        write_line(&mut out, 1, VARIABLES_HEADER);
        for var in &contract.variables {
            write_line(&mut out, 2, &format!("{} := {}", var.name, var.initial));
        }
    }

    write_section(&mut out, ASSUMPTIONS_HEADER, &contract.assumptions);
    write_section(&mut out, GUARANTEES_HEADER, &contract.guarantees);
    out
}

fn write_section(out: &mut String, header: &str, clauses: &[String]) {
    if clauses.is_empty() {
        return;
    }
    write_line(out, 1, header);
    for clause in clauses {
        write_line(out, 2, clause);
    }
}

fn write_line(out: &mut String, level: usize, text: &str) {
    for _ in 0..level {
        out.push_str("  ");
    }
    out.push_str(text);
    out.push('\n');
}

/// Parse and re-render specification text
pub fn format(text: &str) -> crate::Result<String> {
    let spec = crate::parser::parse(text)?;
    Ok(to_canonical(&spec))
}

/// SHA-256 of the canonical form, lowercase hex
///
/// Comments, blank lines and indentation style do not affect the hash.
pub fn semantic_hash(spec: &Specification) -> String {
    let canonical = to_canonical(spec);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    const MESSY: &str = "\
## two contracts, tab-indented, with comments
CONTRACT:
\tNAME:
\t\twaiter    ## the server side
\tGUARANTEES:
\t\tG(request -> X service)
\tVARIABLES:
\t\trequest:=FALSE
\t\tservice   :=   FALSE


CONTRACT:
   NAME:
     customer
   VARIABLES:
     request := FALSE
     service := FALSE
   ASSUMPTIONS:
     TRUE
CHECKS:
  consistency(waiter,customer)
";

    const CANONICAL: &str = "\
CONTRACT:
  NAME:
    waiter
  VARIABLES:
    request := FALSE
    service := FALSE
  GUARANTEES:
    G(request -> X service)

CONTRACT:
  NAME:
    customer
  VARIABLES:
    request := FALSE
    service := FALSE
  ASSUMPTIONS:
    TRUE

CHECKS:
  consistency(waiter, customer)
";

    #[test]
    fn test_format_canonical_layout() {
        assert_eq!(format(MESSY).unwrap(), CANONICAL);
    }

    #[test]
    fn test_format_idempotent() {
        let once = format(MESSY).unwrap();
        let twice = format(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_format_preserves_meaning() {
        let original = parse(MESSY).unwrap();
        let reparsed = parse(&to_canonical(&original)).unwrap();
        assert_eq!(original, reparsed);
    }

    #[test]
    fn test_format_empty_specification() {
        assert_eq!(format("## empty\n").unwrap(), "");
    }

    #[test]
    fn test_semantic_hash_shape() {
        let hash = semantic_hash(&parse(MESSY).unwrap());
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_semantic_hash_ignores_layout() {
        let a = semantic_hash(&parse(MESSY).unwrap());
        let b = semantic_hash(&parse(CANONICAL).unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn test_semantic_hash_sensitive_to_check_order() {
        let reordered = CANONICAL.replace(
            "  consistency(waiter, customer)\n",
            "  consistency(customer, waiter)\n",
        );
        let a = semantic_hash(&parse(CANONICAL).unwrap());
        let b = semantic_hash(&parse(&reordered).unwrap());
        assert_ne!(a, b);
    }

    #[test]
    fn test_semantic_hash_determinism_100_iterations() {
        let spec = parse(CANONICAL).unwrap();
        let first = semantic_hash(&spec);
        for i in 0..100 {
            assert_eq!(first, semantic_hash(&spec), "Non-determinism at iteration {}", i);
        }
    }
}
