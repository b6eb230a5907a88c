//! Specification parser — lexer, data-line tokenizer, and block parser
//!
//! Converts specification text into a [`Specification`]: the declared
//! contracts and the ordered list of checks over them.
//!
//! # Format
//!
//! ```text
//! CONTRACT:
//!   NAME:
//!     waiter
//!   VARIABLES:
//!     request := FALSE
//!   ASSUMPTIONS:
//!     TRUE
//!   GUARANTEES:
//!     G(request -> X service)
//!
//! CHECKS:
//!   consistency(waiter, customer)
//! ```
//!
//! Structure is carried by indentation alone. A block runs until the first
//! line indented at or above its header.

pub mod lexer;
pub mod tokenizer;

use tracing::debug;

use crate::check::{Check, CheckKind, Checks};
use crate::contract::{Contract, Contracts, Variable};
use crate::{Error, Result, Specification};
use lexer::Line;

pub const CONTRACT_HEADER: &str = "CONTRACT:";
pub const NAME_HEADER: &str = "NAME:";
pub const VARIABLES_HEADER: &str = "VARIABLES:";
pub const ASSUMPTIONS_HEADER: &str = "ASSUMPTIONS:";
pub const GUARANTEES_HEADER: &str = "GUARANTEES:";
pub const CHECKS_HEADER: &str = "CHECKS:";

/// Parse specification text into contracts and checks
///
/// # Guarantees
/// - Deterministic: same input always produces the same specification
/// - All-or-nothing: the first error aborts the parse
///
/// # Errors
/// Returns `ParseError` with the offending line number for a malformed
/// header, unknown field, unknown check kind, or unresolved contract
/// reference.
pub fn parse(text: &str) -> Result<Specification> {
    Parser::new(lexer::lines(text)).parse_specification()
}

/// Contract sub-block selected by a field header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Variables,
    Assumptions,
    Guarantees,
}

impl Field {
    const ALL: [Field; 4] = [
        Field::Name,
        Field::Variables,
        Field::Assumptions,
        Field::Guarantees,
    ];

    fn header(self) -> &'static str {
        match self {
            Field::Name => NAME_HEADER,
            Field::Variables => VARIABLES_HEADER,
            Field::Assumptions => ASSUMPTIONS_HEADER,
            Field::Guarantees => GUARANTEES_HEADER,
        }
    }

    fn from_header(text: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| text.contains(f.header()))
    }
}

/// Lines collected under each field header of one contract block
#[derive(Default)]
struct FieldLines {
    name: Vec<Line>,
    variables: Vec<Line>,
    assumptions: Vec<Line>,
    guarantees: Vec<Line>,
}

impl FieldLines {
    fn push(&mut self, field: Field, line: Line) {
        match field {
            Field::Name => self.name.push(line),
            Field::Variables => self.variables.push(line),
            Field::Assumptions => self.assumptions.push(line),
            Field::Guarantees => self.guarantees.push(line),
        }
    }
}

/// Recursive-descent parser over cleaned lines
struct Parser {
    lines: Vec<Line>,
    position: usize,
}

impl Parser {
    fn new(lines: Vec<Line>) -> Self {
        Parser { lines, position: 0 }
    }

    fn peek(&self) -> Option<&Line> {
        self.lines.get(self.position)
    }

    fn advance(&mut self) -> Option<Line> {
        let line = self.lines.get(self.position).cloned();
        if line.is_some() {
            self.position += 1;
        }
        line
    }

    /// Take the next line only if it sits deeper than `floor`
    fn advance_within(&mut self, floor: usize) -> Option<Line> {
        match self.peek() {
            Some(line) if line.depth > floor => self.advance(),
            _ => None,
        }
    }

    // ── Top level ──────────────────────────────────────────

    fn parse_specification(&mut self) -> Result<Specification> {
        let mut contracts = Contracts::new();
        let mut checks = Checks::new();

        while let Some(header) = self.advance() {
            if header.text.contains(CONTRACT_HEADER) {
                let contract = self.parse_contract(&header)?;
                debug!(
                    contract = %contract.name,
                    variables = contract.variables.len(),
                    assumptions = contract.assumptions.len(),
                    guarantees = contract.guarantees.len(),
                    "parsed contract"
                );
                contracts.add_contract(contract).map_err(|dup| {
                    Error::parse(
                        header.number,
                        format!("duplicate contract name '{}'", dup.name),
                    )
                })?;
            } else if header.text.contains(CHECKS_HEADER) {
                let before = checks.len();
                self.parse_checks(&header, &contracts, &mut checks)?;
                debug!(checks = checks.len() - before, "parsed checks block");
            } else {
                return Err(Error::parse(
                    header.number,
                    format!(
                        "expected '{}' or '{}' header, found '{}'",
                        CONTRACT_HEADER,
                        CHECKS_HEADER,
                        header.content()
                    ),
                ));
            }
        }

        Ok(Specification { contracts, checks })
    }

    // ── Contract block ─────────────────────────────────────

    fn parse_contract(&mut self, header: &Line) -> Result<Contract> {
        let floor = header.depth;
        let mut fields = FieldLines::default();
        let mut active: Option<Field> = None;

        while let Some(line) = self.advance_within(floor) {
            if line.depth == floor + 1 {
                let field = Field::from_header(&line.text).ok_or_else(|| {
                    Error::parse(
                        line.number,
                        format!("unknown contract field '{}'", line.content()),
                    )
                })?;
                active = Some(field);
            } else {
                let field = active.ok_or_else(|| {
                    Error::parse(
                        line.number,
                        format!("'{}' appears before any field header", line.content()),
                    )
                })?;
                fields.push(field, line);
            }
        }

        finish_contract(header, fields)
    }

    // ── Checks block ───────────────────────────────────────

    fn parse_checks(
        &mut self,
        header: &Line,
        contracts: &Contracts,
        checks: &mut Checks,
    ) -> Result<()> {
        while let Some(line) = self.advance_within(header.depth) {
            checks.add_check(parse_check(&line, contracts)?);
        }
        Ok(())
    }
}

/// Apply the accumulated field lines to a fresh contract
fn finish_contract(header: &Line, fields: FieldLines) -> Result<Contract> {
    let mut contract = Contract::default();

    let name = match fields.name.as_slice() {
        [line] => line,
        [] => {
            return Err(Error::parse(
                header.number,
                format!("contract has no {} entry", NAME_HEADER),
            ))
        }
        [_, extra, ..] => {
            return Err(Error::parse(
                extra.number,
                format!("{} takes a single line", NAME_HEADER),
            ))
        }
    };
    if !tokenizer::is_identifier(name.content()) {
        return Err(Error::parse(
            name.number,
            format!("invalid contract name '{}'", name.content()),
        ));
    }
    contract.set_name(name.content());

    let mut variables: Vec<Variable> = Vec::with_capacity(fields.variables.len());
    for line in &fields.variables {
        let decl = tokenizer::assignment(line.content(), line.number)?;
        if variables.iter().any(|v| v.name == decl.name) {
            return Err(Error::parse(
                line.number,
                format!(
                    "variable '{}' declared twice in contract '{}'",
                    decl.name, contract.name
                ),
            ));
        }
        variables.push(Variable::new(decl.name, decl.value));
    }
    contract.set_variables(variables);

    contract.set_assumptions(contents(&fields.assumptions));
    contract.set_guarantees(contents(&fields.guarantees));

    Ok(contract)
}

fn contents(lines: &[Line]) -> Vec<String> {
    lines.iter().map(|l| l.content().to_string()).collect()
}

fn parse_check(line: &Line, contracts: &Contracts) -> Result<Check> {
    let call = tokenizer::call(line.content(), line.number)?;

    let kind: CheckKind = call
        .callee
        .parse()
        .map_err(|e: crate::check::UnknownCheckKind| {
            Error::parse(line.number, format!("{} at {}", e, call.callee_span))
        })?;

    let [first, second] = <[String; 2]>::try_from(call.args).map_err(|args| {
        Error::parse(
            line.number,
            format!("{} takes exactly 2 contracts, found {}", kind, args.len()),
        )
    })?;

    for name in [&first, &second] {
        if !contracts.contains(name) {
            return Err(Error::parse(
                line.number,
                format!("{} refers to undeclared contract '{}'", kind, name),
            ));
        }
    }

    Ok(Check::new(kind, first, second))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAITER_CUSTOMER: &str = "\
## Waiter / customer model
CONTRACT:
  NAME:
    waiter
  VARIABLES:
    request := FALSE
    service := FALSE
  ASSUMPTIONS:
    TRUE
  GUARANTEES:
    G(!request -> X !service)   ## no spontaneous service
    G(request -> X service)

CONTRACT:
\tNAME:
\t\tcustomer
\tVARIABLES:
\t\trequest := FALSE
\t\tservice := FALSE
\tASSUMPTIONS:
\t\tTRUE
\tGUARANTEES:
\t\t(F request)
\t\tG((request & !service) -> X request)
\t\tG(service -> X !request)

CHECKS:
  compatibility(waiter, customer)
  consistency(waiter, customer)
";

    fn parse_err(input: &str) -> (usize, String) {
        match parse(input) {
            Err(Error::ParseError { line, message }) => (line, message),
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    // ── Well-formed input ──────────────────────────────

    #[test]
    fn test_parse_waiter_customer() {
        let spec = parse(WAITER_CUSTOMER).unwrap();

        let mut waiter = Contract::new("waiter");
        waiter.set_variables(vec![
            Variable::new("request", "FALSE"),
            Variable::new("service", "FALSE"),
        ]);
        waiter.set_assumptions(vec!["TRUE".into()]);
        waiter.set_guarantees(vec![
            "G(!request -> X !service)".into(),
            "G(request -> X service)".into(),
        ]);

        let mut customer = Contract::new("customer");
        customer.set_variables(waiter.variables.clone());
        customer.set_assumptions(vec!["TRUE".into()]);
        customer.set_guarantees(vec![
            "(F request)".into(),
            "G((request & !service) -> X request)".into(),
            "G(service -> X !request)".into(),
        ]);

        assert_eq!(spec.contracts.get_contract("waiter"), Some(&waiter));
        assert_eq!(spec.contracts.get_contract("customer"), Some(&customer));

        let mut expected = Contracts::new();
        expected.add_contract(waiter).unwrap();
        expected.add_contract(customer).unwrap();
        assert_eq!(spec.contracts, expected);

        let mut checks = Checks::new();
        checks.add_check(Check::new(CheckKind::Compatibility, "waiter", "customer"));
        checks.add_check(Check::new(CheckKind::Consistency, "waiter", "customer"));
        assert_eq!(spec.checks, checks);
    }

    #[test]
    fn test_parse_determinism_100_iterations() {
        let first = parse(WAITER_CUSTOMER).unwrap();
        for i in 0..100 {
            let result = parse(WAITER_CUSTOMER).unwrap();
            assert_eq!(first, result, "Determinism failure at iteration {}", i);
        }
    }

    #[test]
    fn test_parse_empty_input() {
        let spec = parse("## nothing here\n\n").unwrap();
        assert!(spec.contracts.is_empty());
        assert!(spec.checks.is_empty());
    }

    #[test]
    fn test_adjacent_contract_blocks() {
        let input = "\
CONTRACT:
  NAME:
    a
CONTRACT:
  NAME:
    b
";
        let spec = parse(input).unwrap();
        assert_eq!(spec.contracts.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let spec = parse("CONTRACT:\n  NAME:\n    lonely\n").unwrap();
        let c = spec.contracts.get_contract("lonely").unwrap();
        assert!(c.variables.is_empty());
        assert!(c.assumptions.is_empty());
        assert!(c.guarantees.is_empty());
    }

    #[test]
    fn test_partial_indent_rounds_down() {
        // three spaces is depth 1, five is depth 2
        let input = "CONTRACT:\n   NAME:\n     odd\n";
        let spec = parse(input).unwrap();
        assert!(spec.contracts.contains("odd"));
    }

    #[test]
    fn test_checks_preserve_declaration_order() {
        let input = "\
CONTRACT:
  NAME:
    a
CONTRACT:
  NAME:
    b
CHECKS:
  consistency(b, a)
  compatibility(a, b)
  consistency(a, a)
";
        let spec = parse(input).unwrap();
        let rendered: Vec<String> = spec.checks.iter().map(|c| c.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["consistency(b, a)", "compatibility(a, b)", "consistency(a, a)"]
        );
    }

    #[test]
    fn test_multiple_checks_blocks_append() {
        let input = "\
CONTRACT:
  NAME:
    a
CHECKS:
  consistency(a, a)
CHECKS:
  compatibility(a, a)
";
        let spec = parse(input).unwrap();
        assert_eq!(spec.checks.len(), 2);
        assert_eq!(spec.checks.get(1).unwrap().kind, CheckKind::Compatibility);
    }

    #[test]
    fn test_nested_contract_header() {
        let input = "  CONTRACT:\n    NAME:\n      deep\n";
        let spec = parse(input).unwrap();
        assert!(spec.contracts.contains("deep"));
    }

    // ── Errors ─────────────────────────────────────────

    #[test]
    fn test_unknown_field_header() {
        let input = "CONTRACT:\n  NAME:\n    a\n  OWNER:\n    me\n";
        let (line, message) = parse_err(input);
        assert_eq!(line, 4);
        assert!(message.contains("unknown contract field 'OWNER:'"));
    }

    #[test]
    fn test_unknown_check_kind() {
        let input = "CONTRACT:\n  NAME:\n    a\nCHECKS:\n  refinement(a, a)\n";
        let (line, message) = parse_err(input);
        assert_eq!(line, 5);
        assert!(message.contains("unknown check kind 'refinement'"));
    }

    #[test]
    fn test_unresolved_contract_reference() {
        let input = WAITER_CUSTOMER.replace(
            "consistency(waiter, customer)",
            "compatibility(waiter, unknown)",
        );
        let (line, message) = parse_err(&input);
        assert_eq!(line, 29);
        assert!(message.contains("undeclared contract 'unknown'"));
    }

    #[test]
    fn test_check_before_contract_is_unresolved() {
        let input = "CHECKS:\n  consistency(a, a)\nCONTRACT:\n  NAME:\n    a\n";
        let (line, _) = parse_err(input);
        assert_eq!(line, 2);
    }

    #[test]
    fn test_check_arity() {
        let input = "CONTRACT:\n  NAME:\n    a\nCHECKS:\n  consistency(a, a, a)\n";
        let (_, message) = parse_err(input);
        assert!(message.contains("exactly 2 contracts, found 3"));
    }

    #[test]
    fn test_stray_top_level_line() {
        let (line, message) = parse_err("hello\n");
        assert_eq!(line, 1);
        assert!(message.contains("expected 'CONTRACT:' or 'CHECKS:' header"));
    }

    #[test]
    fn test_data_before_field_header() {
        let (line, _) = parse_err("CONTRACT:\n    orphan\n");
        assert_eq!(line, 2);
    }

    #[test]
    fn test_missing_name() {
        let (line, message) = parse_err("CONTRACT:\n  ASSUMPTIONS:\n    TRUE\n");
        assert_eq!(line, 1);
        assert!(message.contains("no NAME: entry"));
    }

    #[test]
    fn test_name_spanning_two_lines() {
        let (line, _) = parse_err("CONTRACT:\n  NAME:\n    a\n    b\n");
        assert_eq!(line, 4);
    }

    #[test]
    fn test_invalid_contract_name() {
        let (_, message) = parse_err("CONTRACT:\n  NAME:\n    two words\n");
        assert!(message.contains("invalid contract name"));
    }

    #[test]
    fn test_duplicate_contract() {
        let input = "CONTRACT:\n  NAME:\n    a\nCONTRACT:\n  NAME:\n    a\n";
        let (line, message) = parse_err(input);
        assert_eq!(line, 4);
        assert!(message.contains("duplicate contract name 'a'"));
    }

    #[test]
    fn test_duplicate_variable() {
        let input = "CONTRACT:\n  NAME:\n    a\n  VARIABLES:\n    x := TRUE\n    x := FALSE\n";
        let (line, message) = parse_err(input);
        assert_eq!(line, 6);
        assert!(message.contains("variable 'x' declared twice"));
    }

    #[test]
    fn test_malformed_variable() {
        let input = "CONTRACT:\n  NAME:\n    a\n  VARIABLES:\n    x = TRUE\n";
        let (line, _) = parse_err(input);
        assert_eq!(line, 5);
    }
}
