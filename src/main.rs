// Reads gate literals from stdin, one per line, and prints the canonical
// form and the JSON encoding of each.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use probsql::circuit;
use probsql::settings::{Settings, init_logging};
use tracing::{error, info};

fn main() -> ExitCode {
    let settings = match Settings::load("probsql") {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&settings);
    info!(condition_column = %settings.condition_column, "settings loaded");

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut failures = 0usize;
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "could not read input");
                return ExitCode::FAILURE;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let printed = circuit::parse(&line).and_then(|gate| {
            let json = circuit::encode(&gate)?;
            Ok(format!("{}\t{}", gate, json))
        });
        match printed {
            Ok(text) => {
                if writeln!(stdout, "{text}").is_err() {
                    return ExitCode::FAILURE;
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("{e}");
            }
        }
    }
    if failures > 0 { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
