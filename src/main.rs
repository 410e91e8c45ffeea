//! CLI tool to scan and parse Lox expressions, directly or step by step.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lox_trace::{Reporter, printer};
use tracing_subscriber::EnvFilter;

/// Scan and parse Lox expressions, optionally printing every step.
///
/// Without a subcommand, starts an interactive prompt.
#[derive(Parser, Debug)]
#[command(name = "lox-trace", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tokens of each file.
    Scan {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the expression tree of each file.
    Parse {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print every scanner snapshot of each file.
    TraceScan {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print every parser snapshot of each file.
    TraceParse {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Parse one expression per line from stdin and print its tree.
    Repl,
}

/// Handles one file's contents; returns `false` if anything failed.
type Runner = fn(&str, &mut dyn Reporter) -> bool;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lox_trace=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let (files, run) = match cli.command.unwrap_or(Command::Repl) {
        Command::Scan { files } => (files, run_scan as Runner),
        Command::Parse { files } => (files, run_parse as Runner),
        Command::TraceScan { files } => (files, run_trace_scan as Runner),
        Command::TraceParse { files } => (files, run_trace_parse as Runner),
        Command::Repl => {
            if let Err(e) = repl(io::stdin().lock(), io::stdout().lock()) {
                eprintln!("repl: {e}");
                return ExitCode::FAILURE;
            }
            return ExitCode::SUCCESS;
        }
    };

    if run_files(&files, run) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Run `run` over every file; returns `false` if any file failed.
fn run_files(files: &[PathBuf], run: Runner) -> bool {
    let mut ok = true;

    for path in files {
        let name = path.display();
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{name}: {e}");
                ok = false;
                continue;
            }
        };

        tracing::info!(file = %name, bytes = content.len(), "processing");
        let mut reporter = |message: &str| eprintln!("{name}: {message}");
        if !run(&content, &mut reporter) {
            ok = false;
        }
    }

    ok
}

/// Read lines until end of input, printing each line's tree or its errors.
fn repl(input: impl BufRead, mut output: impl Write) -> io::Result<()> {
    write!(output, "> ")?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            let mut messages = Vec::new();
            let ok = run_parse_into(&line, &mut output, &mut |m: &str| {
                messages.push(m.to_string());
            })?;
            for message in &messages {
                writeln!(output, "error: {message}")?;
            }
            tracing::debug!(ok, "repl line");
        }
        write!(output, "> ")?;
        output.flush()?;
    }

    writeln!(output)
}

fn run_scan(source: &str, reporter: &mut dyn Reporter) -> bool {
    let out = lox_trace::scan_with(source, reporter);
    for token in &out.tokens {
        println!(
            "{:>4}:{:<3} {:<13} {:?}",
            token.line, token.start, token.kind, token.lexeme
        );
    }
    !out.had_error()
}

fn run_parse(source: &str, reporter: &mut dyn Reporter) -> bool {
    run_parse_into(source, &mut io::stdout().lock(), reporter).unwrap_or(false)
}

/// Scan and parse `source`, writing the prefix form of the tree on success.
fn run_parse_into(
    source: &str,
    output: &mut impl Write,
    reporter: &mut dyn Reporter,
) -> io::Result<bool> {
    let out = lox_trace::scan_with(source, reporter);
    if out.had_error() {
        return Ok(false);
    }
    let Ok(expr) = lox_trace::parse_with(&out.tokens, reporter) else {
        return Ok(false);
    };
    writeln!(output, "{}", printer::format(&expr))?;
    Ok(true)
}

fn run_trace_scan(source: &str, reporter: &mut dyn Reporter) -> bool {
    let trace = lox_trace::scan_with_trace(source, reporter);
    for (step, snapshot) in trace.snapshots.iter().enumerate() {
        println!("{step:>4} {}", printer::format_scanner_snapshot(snapshot));
    }
    !trace.had_error()
}

fn run_trace_parse(source: &str, reporter: &mut dyn Reporter) -> bool {
    let out = lox_trace::scan_with(source, reporter);
    if out.had_error() {
        return false;
    }
    let trace = lox_trace::parse_with_trace(&out.tokens, reporter);
    for (step, snapshot) in trace.snapshots.iter().enumerate() {
        println!("--- step {step}");
        print!("{}", printer::format_parser_snapshot(snapshot));
    }
    trace.result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use lox_trace::Silent;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_repl() {
        let cli = Cli::try_parse_from(["lox-trace"]).expect("should parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn file_commands_require_a_file() {
        assert!(Cli::try_parse_from(["lox-trace", "parse"]).is_err());
        let cli = Cli::try_parse_from(["lox-trace", "trace-parse", "a.lox", "b.lox"])
            .expect("should parse");
        assert!(matches!(
            cli.command,
            Some(Command::TraceParse { ref files }) if files.len() == 2
        ));
    }

    #[test]
    fn parse_writes_prefix_form() {
        let mut output = Vec::new();
        let result = run_parse_into("1 + 2 * 3", &mut output, &mut Silent);
        assert!(result.expect("write failed"));
        assert_eq!(String::from_utf8(output).expect("utf-8"), "(+ 1 (* 2 3))\n");
    }

    #[test]
    fn parse_failure_writes_nothing() {
        let mut output = Vec::new();
        let result = run_parse_into("1 +", &mut output, &mut Silent);
        assert!(!result.expect("write failed"));
        assert!(output.is_empty());
        assert!(!run_parse("@", &mut Silent));
    }

    #[test]
    fn missing_file_fails() {
        let files = [PathBuf::from("/nonexistent/lox-trace/input.lox")];
        assert!(!run_files(&files, run_scan));
    }

    #[test]
    fn repl_prints_tree_or_errors_per_line() {
        let input = "1 - 2 - 3\n\n(1\n1 +\n";
        let mut output = Vec::new();
        repl(input.as_bytes(), &mut output).expect("repl failed");
        assert_eq!(
            String::from_utf8(output).expect("utf-8"),
            "> (- (- 1 2) 3)\n\
             > > (group 1)\n\
             error: expected ')' after expression at end on line 1\n\
             > error: expected expression at end on line 1\n\
             > \n"
        );
    }
}
