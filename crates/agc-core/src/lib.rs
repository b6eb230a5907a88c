//! AGC Core - assume-guarantee contract checking
//!
//! Parses contract specifications, saturates their clauses, synthesizes one
//! LTL verification clause per requested check, and maps the model checker's
//! verdicts back onto those checks. Model checking itself is delegated to an
//! external NuSMV-compatible engine.
//!
//! # Architecture
//!
//! ```text
//! Spec text → Lexer → Block parser → Contracts + Checks
//!                                        ↓
//!                         Algebra (saturate, in place)
//!                                        ↓
//!                         Synthesizer → SMV module → [engine]
//!                                                       ↓
//!                         Verdict interpreter ← engine output lines
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic**: same text always yields the same module
//! - **Positional**: the Nth `LTLSPEC` clause belongs to the Nth check
//! - **Fail-fast**: no module is written unless parsing and synthesis succeed

pub mod algebra;
pub mod check;
pub mod contract;
pub mod engine;
pub mod error;
pub mod format;
pub mod parser;
pub mod synth;
pub mod verdict;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use check::{Check, CheckKind, Checks};
pub use contract::{Contract, Contracts, Saturated, Variable};
pub use engine::{EngineConfig, ModelChecker, NuSmv};
pub use error::{Error, Result};
pub use verdict::CheckOutcome;

/// A parsed specification: declared contracts and the checks over them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    pub contracts: Contracts,
    pub checks: Checks,
}

impl Specification {
    /// Parse specification text
    pub fn parse(text: &str) -> Result<Self> {
        parser::parse(text)
    }

    /// Read and parse a specification file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loaded specification");
        Self::parse(&text)
    }

    /// Saturate all contracts and render the SMV module
    pub fn compile(&mut self) -> Result<String> {
        synth::compile(self)
    }
}

/// Run every check of `spec` through `engine`
///
/// Saturates and compiles, writes the module to `module_path`, invokes the
/// engine, and pairs each verdict with its check. Nothing is written if
/// compilation fails.
pub fn run_checks(
    spec: &mut Specification,
    engine: &dyn ModelChecker,
    module_path: &Path,
) -> Result<Vec<CheckOutcome>> {
    let module = spec.compile()?;
    engine::write_module(module_path, &module)?;
    let output = engine.check(module_path)?;
    verdict::outcomes(&output, &spec.checks)
}
