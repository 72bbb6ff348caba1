// Copyright 2025-2026 Cornell University
// released under MIT license
// author: Kevin Laeufer <laeufer@cornell.edu>

use clap::Parser;
use log::{error, warn};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::io::{BufRead, ErrorKind, Write};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "ndc")]
#[command(version)]
#[command(about = "No-division calculator: expands expressions over +, -, * and ^ into canonical polynomials.", long_about = None)]
struct Args {
    #[arg(
        short = 'c',
        value_name = "EXPRESSION",
        num_args = 0..=1,
        help = "Evaluate the expression and print the result. Starts an interactive session if omitted or empty."
    )]
    command: Option<Option<String>>,
    #[arg(short, long, action = clap::ArgAction::Count, help = "Print log messages (-v: info, -vv: debug, -vvv: trace).")]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);
    match args.command.flatten() {
        Some(expression) => run_once(&expression),
        None => interactive(),
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn run_once(expression: &str) -> ExitCode {
    match ndc::calculate(expression) {
        Ok(value) => {
            println!("{}", ndc::format(&value));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Reads one expression per line until the end of input. Errors are printed and the
/// session continues, Ctrl-C ends it.
fn interactive() -> ExitCode {
    if let Err(e) = ctrlc::set_handler(|| std::process::exit(0)) {
        warn!("failed to install interrupt handler: {e}");
    }
    println!("Welcome to the no-division calculator!");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut line = String::new();
    loop {
        print!(">");
        if let Err(e) = stdout.flush() {
            error!("failed to write prompt: {e}");
            return ExitCode::FAILURE;
        }
        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => {
                // end of input
                println!();
                return ExitCode::SUCCESS;
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                println!("{e}");
                continue;
            }
            Err(e) => {
                error!("failed to read input: {e}");
                return ExitCode::FAILURE;
            }
        }
        let expression = line.trim();
        if expression.is_empty() {
            continue;
        }
        match ndc::calculate(expression) {
            Ok(value) => println!("{value}"),
            Err(e) => println!("{e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args() {
        let args = Args::try_parse_from(["ndc", "-c", "x*x"]).unwrap();
        assert_eq!(args.command.flatten().as_deref(), Some("x*x"));
        // `-c` without an expression falls back to the interactive session
        let args = Args::try_parse_from(["ndc", "-c"]).unwrap();
        assert_eq!(args.command.flatten(), None);
        let args = Args::try_parse_from(["ndc", "-vv"]).unwrap();
        assert_eq!(args.command, None);
        assert_eq!(args.verbose, 2);
    }
}
