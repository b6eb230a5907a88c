//! Verdict interpretation — engine result lines back to per-check outcomes
//!
//! Every synthesized clause asserts that a check's failure condition never
//! happens. An engine reporting the clause "is true" therefore means the
//! contract pair is compatible (or consistent); "is false" means it is not.

use serde::Serialize;

use crate::check::{Check, Checks};
use crate::{Error, Result};

/// Prefix of engine lines that report one `LTLSPEC` result
pub const SPECIFICATION_PREFIX: &str = "-- specification";

const HOLDS: &str = "is true";
const FAILS: &str = "is false";

/// Engine lines reporting specification results, in output order
pub fn result_lines<S: AsRef<str>>(output: &[S]) -> Vec<&str> {
    output
        .iter()
        .map(|l| l.as_ref())
        .filter(|l| l.starts_with(SPECIFICATION_PREFIX))
        .collect()
}

/// Map engine output to one verdict per check, `true` when the check holds
///
/// # Errors
/// `VerdictCountMismatch` when the number of result lines differs from
/// `check_count`; `MalformedVerdict` for a result line that is neither
/// true nor false.
pub fn interpret<S: AsRef<str>>(output: &[S], check_count: usize) -> Result<Vec<bool>> {
    let lines = result_lines(output);
    if lines.len() != check_count {
        return Err(Error::VerdictCountMismatch {
            expected: check_count,
            found: lines.len(),
        });
    }

    lines
        .iter()
        .enumerate()
        .map(|(index, line)| verdict(index, line))
        .collect()
}

fn verdict(index: usize, line: &str) -> Result<bool> {
    // The formula text sits between the prefix and the verdict, so only
    // the tail decides.
    if line.ends_with(HOLDS) {
        Ok(true)
    } else if line.ends_with(FAILS) {
        Ok(false)
    } else if line.contains(HOLDS) && !line.contains(FAILS) {
        Ok(true)
    } else if line.contains(FAILS) && !line.contains(HOLDS) {
        Ok(false)
    } else {
        Err(Error::MalformedVerdict {
            index,
            line: line.to_string(),
        })
    }
}

/// A check paired with the engine's verdict on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub index: usize,
    pub check: Check,
    pub holds: bool,
    /// Raw engine line the verdict came from
    pub engine_line: String,
}

/// Interpret engine output against `checks`, keeping the evidence
pub fn outcomes<S: AsRef<str>>(output: &[S], checks: &Checks) -> Result<Vec<CheckOutcome>> {
    let verdicts = interpret(output, checks.len())?;
    let lines = result_lines(output);

    Ok(checks
        .iter()
        .zip(verdicts)
        .zip(lines)
        .enumerate()
        .map(|(index, ((check, holds), line))| CheckOutcome {
            index,
            check: check.clone(),
            holds,
            engine_line: line.to_string(),
        })
        .collect())
}
