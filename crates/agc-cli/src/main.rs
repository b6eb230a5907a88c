use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

use agc_core::engine::{self, EngineConfig, DEFAULT_ENGINE, DEFAULT_MODULE_PATH};
use agc_core::{format, synth, verdict, CheckOutcome, NuSmv, Specification};

/// AGC — assume-guarantee contract checker
///
/// Validate contract specifications, compile them to SMV modules, and check
/// contract compatibility and consistency with a NuSMV-compatible engine.
#[derive(Parser)]
#[command(name = "agc", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress normal output on success
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a specification (syntax, references, shared variables)
    Validate {
        /// Path to specification file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compile a specification to an SMV module
    Compile {
        /// Path to specification file
        file: PathBuf,
        /// Write the module here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run every check through the model checker
    Check {
        /// Path to specification file
        file: PathBuf,
        /// Model checker executable
        #[arg(long, default_value = DEFAULT_ENGINE)]
        engine: PathBuf,
        /// Where to write the generated module
        #[arg(long, default_value = DEFAULT_MODULE_PATH)]
        module: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interpret saved model checker output against a specification's checks
    Interpret {
        /// Path to specification file
        file: PathBuf,
        /// Captured engine stdout
        engine_output: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Format a specification to canonical style
    Fmt {
        /// Path to specification file
        file: PathBuf,
        /// Rewrite the file in place
        #[arg(long)]
        write: bool,
    },

    /// Compute semantic hash (SHA-256) of a specification
    Hash {
        /// Path to specification file
        file: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let quiet = cli.quiet;
    let exit_code = match cli.command {
        Commands::Validate { file, json } => cmd_validate(&file, json, quiet),
        Commands::Compile { file, output } => cmd_compile(&file, output.as_deref(), quiet),
        Commands::Check {
            file,
            engine,
            module,
            json,
        } => {
            let config = EngineConfig::default()
                .with_executable(engine)
                .with_module_path(module);
            cmd_check(&file, &config, json, quiet)
        }
        Commands::Interpret {
            file,
            engine_output,
            json,
        } => cmd_interpret(&file, &engine_output, json, quiet),
        Commands::Fmt { file, write } => cmd_fmt(&file, write, quiet),
        Commands::Hash { file } => cmd_hash(&file),
        Commands::Version => {
            println!(
                "agc {} (agc-core {})",
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_VERSION")
            );
            0
        }
    };

    process::exit(exit_code);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ── Helpers ───────────────────────────────────────────────

/// Print an error and return the error exit code
fn fail(err: impl Display) -> i32 {
    eprintln!("{} {}", "error:".red().bold(), err);
    2
}

fn read_file(path: &Path) -> Result<String, i32> {
    fs::read_to_string(path).map_err(|e| fail(format!("cannot read {}: {}", path.display(), e)))
}

fn load(path: &Path) -> Result<Specification, i32> {
    let text = read_file(path)?;
    Specification::parse(&text).map_err(fail)
}

fn print_json(value: &impl serde::Serialize) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{}", s);
            0
        }
        Err(e) => fail(e),
    }
}

fn report(file: &Path, outcomes: &[CheckOutcome], json: bool, quiet: bool) -> i32 {
    let failed = outcomes.iter().filter(|o| !o.holds).count();
    let exit_code = if failed == 0 { 0 } else { 1 };

    if json {
        let code = print_json(&outcomes);
        return if code == 0 { exit_code } else { code };
    }

    if !quiet || failed > 0 {
        for outcome in outcomes {
            let status = if outcome.holds {
                "PASS".green().bold()
            } else {
                "FAIL".red().bold()
            };
            println!("  {} {}", status, outcome.check);
        }
        println!(
            "{}: {} checks, {} passed, {} failed",
            file.display(),
            outcomes.len(),
            outcomes.len() - failed,
            failed
        );
    }
    exit_code
}

// ── Commands ──────────────────────────────────────────────

fn cmd_validate(file: &Path, json: bool, quiet: bool) -> i32 {
    let text = match read_file(file) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let result = Specification::parse(&text).and_then(|spec| {
        synth::check_variable_sets(&spec.contracts)?;
        Ok(spec)
    });

    if json {
        let (contracts, checks) = match &result {
            Ok(spec) => (spec.contracts.len(), spec.checks.len()),
            Err(_) => (0, 0),
        };
        let errors: Vec<String> = result.as_ref().err().map(|e| e.to_string()).into_iter().collect();
        let code = print_json(&serde_json::json!({
            "valid": result.is_ok(),
            "contracts": contracts,
            "checks": checks,
            "errors": errors,
        }));
        if code != 0 {
            return code;
        }
        return if result.is_ok() { 0 } else { 1 };
    }

    match result {
        Ok(spec) => {
            if !quiet {
                println!(
                    "{} {} is valid ({} contracts, {} checks)",
                    "✓".green().bold(),
                    file.display(),
                    spec.contracts.len(),
                    spec.checks.len()
                );
            }
            0
        }
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            1
        }
    }
}

fn cmd_compile(file: &Path, output: Option<&Path>, quiet: bool) -> i32 {
    let mut spec = match load(file) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let module = match spec.compile() {
        Ok(m) => m,
        Err(e) => return fail(e),
    };

    match output {
        Some(path) => {
            if let Err(e) = engine::write_module(path, &module) {
                return fail(e);
            }
            if !quiet {
                println!("wrote {} ({} checks)", path.display(), spec.checks.len());
            }
        }
        None => print!("{}", module),
    }
    0
}

fn cmd_check(file: &Path, config: &EngineConfig, json: bool, quiet: bool) -> i32 {
    let mut spec = match load(file) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let engine = NuSmv::from_config(config);
    info!(
        file = %file.display(),
        checks = spec.checks.len(),
        engine = %config.executable.display(),
        "running checks"
    );

    match agc_core::run_checks(&mut spec, &engine, &config.module_path) {
        Ok(outcomes) => report(file, &outcomes, json, quiet),
        Err(e) => fail(e),
    }
}

fn cmd_interpret(file: &Path, engine_output: &Path, json: bool, quiet: bool) -> i32 {
    let spec = match load(file) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let transcript = match read_file(engine_output) {
        Ok(t) => t,
        Err(code) => return code,
    };
    let lines: Vec<&str> = transcript.lines().collect();

    match verdict::outcomes(&lines, &spec.checks) {
        Ok(outcomes) => report(file, &outcomes, json, quiet),
        Err(e) => fail(e),
    }
}

fn cmd_fmt(file: &Path, write: bool, quiet: bool) -> i32 {
    let text = match read_file(file) {
        Ok(t) => t,
        Err(code) => return code,
    };
    let canonical = match format::format(&text) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    if write {
        if let Err(e) = fs::write(file, &canonical) {
            return fail(format!("cannot write {}: {}", file.display(), e));
        }
        if !quiet {
            println!("formatted {}", file.display());
        }
    } else {
        print!("{}", canonical);
    }
    0
}

fn cmd_hash(file: &Path) -> i32 {
    match load(file) {
        Ok(spec) => {
            println!("{}", format::semantic_hash(&spec));
            0
        }
        Err(code) => code,
    }
}
