use crate::solving::solver::Solver;
use clap::{Arg, Command};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ssp_instance::{Instance, InstanceError};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, error};
use tracing_subscriber::{filter::LevelFilter, util::SubscriberInitExt, EnvFilter};

mod report;

mod solving {
    pub mod solver;
}

/// Files with this extension are loaded when the input is a directory.
const INSTANCE_EXTENSION: &str = "txt";

fn main() -> ExitCode {
    let matches = Command::new("ssp")
        .version("0.1.0")
        .about("Enumerates every subset of a set of integers that sums to a target (branch and prune)")
        .arg(
            Arg::new("input")
                .required(true)
                .value_name("SIZE|FILE|DIRECTORY")
                .allow_negative_numbers(true)
                .help("Size of a random instance, an instance file, or a directory of *.txt instance files"),
        )
        .get_matches();

    init_logging();

    let Some(input) = matches.get_one::<String>("input") else {
        return ExitCode::FAILURE;
    };
    let mut stdout = io::stdout().lock();
    match run(input, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so they never mix with the report on stdout. `RUST_LOG` overrides the
/// default level.
fn init_logging() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .without_time()
        .finish()
        .try_init();
    if let Err(err) = result {
        eprintln!("failed to set up logging: {err}");
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("argument is not an integer or a valid file/directory: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Instance(#[from] InstanceError),

    #[error("cannot read directory {}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write the report")]
    Output(#[from] io::Error),
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Size(i64),
    File(PathBuf),
    Directory(PathBuf),
}

/// An integer wins over a path of the same name.
fn classify(argument: &str) -> Result<Input, CliError> {
    if let Ok(size) = argument.parse::<i64>() {
        return Ok(Input::Size(size));
    }
    let path = Path::new(argument);
    if path.is_file() {
        Ok(Input::File(path.to_path_buf()))
    } else if path.is_dir() {
        Ok(Input::Directory(path.to_path_buf()))
    } else {
        Err(CliError::InvalidArgument(argument.to_string()))
    }
}

fn run(argument: &str, out: &mut impl Write) -> Result<(), CliError> {
    match classify(argument)? {
        Input::Size(size) => {
            let seed = clock_seed();
            debug!(seed, "seeding instance generator");
            let mut rng = StdRng::seed_from_u64(seed);
            let instance = ssp_instance::generate(size, &mut rng)?;
            process_instance(&instance, out)?;
        }
        Input::File(path) => {
            let instance = ssp_instance::load(&path)?;
            process_instance(&instance, out)?;
        }
        Input::Directory(path) => {
            let summary = process_directory(&path, out)?;
            debug!(solved = summary.solved, failed = summary.failed, "directory processed");
        }
    }
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

/// Solves one instance and writes its report. Only the search itself is timed.
fn process_instance(instance: &Instance, out: &mut impl Write) -> io::Result<()> {
    report::write_instance(out, instance)?;
    write!(out, "Running bp ... ")?;
    out.flush()?;

    let mut solver = Solver::new(instance);
    let result = solver.solve();

    writeln!(out, "done!")?;
    report::write_result(out, &result, &solver.statistics)?;
    out.flush()
}

#[derive(Debug, Default, PartialEq, Eq)]
struct DirectorySummary {
    solved: usize,
    failed: usize,
}

/// Solves every instance file directly inside `dir`, in file name order. A file that fails to
/// load is logged and skipped.
fn process_directory(dir: &Path, out: &mut impl Write) -> Result<DirectorySummary, CliError> {
    let directory_error = |source| CliError::Directory {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(directory_error)? {
        let path = entry.map_err(directory_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == INSTANCE_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();

    let mut summary = DirectorySummary::default();
    for path in files {
        let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
        writeln!(out, "Processing file: {name}")?;
        match ssp_instance::load(&path) {
            Ok(instance) => {
                process_instance(&instance, out)?;
                summary.solved += 1;
            }
            Err(err) => {
                error!("skipping {name}: {err}");
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_string(argument: &str) -> Result<String, CliError> {
        let mut out = Vec::new();
        run(argument, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("12").unwrap(), Input::Size(12));
        assert_eq!(classify("-3").unwrap(), Input::Size(-3));
        assert_eq!(
            classify("./test_instances/scenario_a.txt").unwrap(),
            Input::File(PathBuf::from("./test_instances/scenario_a.txt"))
        );
        assert_eq!(
            classify("./test_instances").unwrap(),
            Input::Directory(PathBuf::from("./test_instances"))
        );
        assert!(matches!(
            classify("./test_instances/does_not_exist"),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_random_mode() {
        let output = run_to_string("8").unwrap();
        assert!(output.starts_with("SSP(n = 8; target = "));
        assert!(output.contains("Original set = [1, 2, 3, 4, 5, 6, 7, 8]\n"));
        assert!(output.contains("Running bp ... done!\n"));
        assert!(output.contains("elapsed time "));
    }

    #[test]
    fn test_random_mode_rejects_small_sizes() {
        assert!(matches!(
            run_to_string("2"),
            Err(CliError::Instance(InstanceError::InvalidSize(2)))
        ));
        assert!(matches!(
            run_to_string("-3"),
            Err(CliError::Instance(InstanceError::InvalidSize(-3)))
        ));
    }

    #[test]
    fn test_file_mode() {
        let output = run_to_string("./test_instances/scenario_a.txt").unwrap();
        assert!(output.starts_with(
            "SSP(n = 4; target = 5)\nOriginal set = [4, 3, 2, 1]\nTarget is 5\n\nRunning bp ... done!\n[3, 2]\n[4, 1]\nelapsed time "
        ));
    }

    #[test]
    fn test_file_mode_many_solutions() {
        let output = run_to_string("./test_instances/many_solutions.txt").unwrap();
        assert!(output.contains("bp found 64 solutions\n"));
    }

    #[test]
    fn test_file_mode_errors() {
        assert!(matches!(
            run_to_string("./test_instances/truncated.txt"),
            Err(CliError::Instance(InstanceError::TruncatedBody))
        ));
        assert!(matches!(
            run_to_string("./test_instances/bad_size.txt"),
            Err(CliError::Instance(InstanceError::MalformedHeader { .. }))
        ));
    }

    #[test]
    fn test_directory_mode_skips_bad_files() {
        let mut out = Vec::new();
        let summary = process_directory(Path::new("./test_instances"), &mut out).unwrap();
        assert_eq!(summary, DirectorySummary { solved: 4, failed: 2 });

        let output = String::from_utf8(out).unwrap();
        let processed: Vec<&str> = output
            .lines()
            .filter_map(|line| line.strip_prefix("Processing file: "))
            .collect();
        assert_eq!(
            processed,
            vec![
                "bad_size.txt",
                "extra_tokens.txt",
                "many_solutions.txt",
                "scenario_a.txt",
                "scenario_c.txt",
                "truncated.txt"
            ]
        );
        assert!(output.contains("[12, 3]\n"));
        assert!(!output.contains("README"));
    }

    #[test]
    fn test_directory_mode_ignores_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.txt"), "3\n3\n1 2 3\n").unwrap();
        fs::write(dir.path().join("two.dat"), "3\n3\n1 2 3\n").unwrap();
        fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let mut out = Vec::new();
        let summary = process_directory(dir.path(), &mut out).unwrap();
        assert_eq!(summary, DirectorySummary { solved: 1, failed: 0 });
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("[2, 1]\n[3]\n"));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output = run_to_string(dir.path().to_str().unwrap()).unwrap();
        assert!(output.is_empty());
    }
}
