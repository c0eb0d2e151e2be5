//! Command-line interface for the coursmd content linter.
//!
//! Usage:
//!   coursmd-lint                       - lint every file under the corpus root
//!   coursmd-lint `<path>`              - lint one file or directory
//!   coursmd-lint `<id>`                - lint files whose name contains `<id>`
//!
//! Exits with status 1 when any critical finding is reported, when no file
//! matches, or on any error, usage errors included.

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};
use coursmd_lint::{LintConfig, Severity, discover, validate_corpus};
use std::path::PathBuf;
use std::process::ExitCode;

fn cli() -> Command {
    Command::new("coursmd-lint")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Checks coursmd YAML content for schema and markup problems")
        .arg(
            Arg::new("path")
                .help("File, directory or fuzzy id (default: the whole corpus root)")
                .index(1),
        )
        .arg(
            Arg::new("root")
                .long("root")
                .short('r')
                .value_parser(clap::value_parser!(PathBuf))
                .help("Corpus root (default: content)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_parser(clap::value_parser!(PathBuf))
                .help("YAML configuration file"),
        )
        .arg(
            Arg::new("min-severity")
                .long("min-severity")
                .short('s')
                .value_parser(clap::value_parser!(Severity))
                .help("Least severe finding to print: critical, high, medium or low"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
}

fn main() -> ExitCode {
    let matches = match cli().try_get_matches() {
        Ok(matches) => matches,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    let default_level = if matches.get_flag("verbose") {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => match LintConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error: {}", err);
                return ExitCode::FAILURE;
            }
        },
        None => LintConfig::default(),
    };
    if let Some(root) = matches.get_one::<PathBuf>("root") {
        config.root = root.clone();
    }
    if let Some(severity) = matches.get_one::<Severity>("min-severity") {
        config.min_severity = *severity;
    }

    let target = matches.get_one::<String>("path").map(String::as_str);
    let files = match discover(target, &config) {
        Ok(files) => files,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };
    if files.is_empty() {
        eprintln!(
            "No content files found for `{}` under {}",
            target.unwrap_or("*"),
            config.root.display()
        );
        return ExitCode::FAILURE;
    }

    let report = validate_corpus(&files);
    println!("{}", report.render(config.min_severity));

    if report.has_critical() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
