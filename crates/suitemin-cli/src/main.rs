//! suitemin CLI
//!
//! - `suitemin normalize …` - Convert raw tool output into record files
//! - `suitemin formulate <project-dir> <config>` - Write the solver model
//! - `suitemin extract <project-dir> <solution> <out-file>` - Read a solver
//!   result back into a minimized suite

mod logging;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use suitemin_core::run_formulation;
use suitemin_extract::{extract, ExtractOptions, ReportSource};
use suitemin_ir::types::RecordKind;
use suitemin_normalize::{normalize, NormalizeOptions, RequirementsStrategy};

#[derive(Parser)]
#[command(name = "suitemin")]
#[command(about = "Multi-criteria test suite minimization as integer programming")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert raw listings into cov.info, fault.info and rtime.info
    Normalize {
        /// One raw test name per line
        all_tests: PathBuf,
        /// `test,requirement,…` rows
        requirements: PathBuf,
        /// `test,violation,…` rows after a header
        violations: PathBuf,
        /// CSV with `test` and `time(ns)` columns
        times: PathBuf,
        /// Project directory to write into (created when missing)
        out_dir: PathBuf,
        /// Requirements are `tr<k>` items written as `k`
        #[arg(long)]
        legacy_requirements: bool,
    },
    /// Formulate the model described by a config
    Formulate {
        project_dir: PathBuf,
        /// Config file, relative to the project directory
        config: PathBuf,
    },
    /// Extract the selected tests from a solver result
    Extract {
        project_dir: PathBuf,
        /// Solver result, relative to the project directory
        solution: PathBuf,
        /// Selected tests are written here, one per line
        out_file: PathBuf,
        /// Compact mapping file for MINTS results
        #[arg(long)]
        mapping: Option<PathBuf>,
        /// Statement coverage record file
        #[arg(long, default_value = "cov.info")]
        cov: String,
        /// Fault record file
        #[arg(long, default_value = "fault.info")]
        fault: String,
    },
}

fn main() -> anyhow::Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize {
            all_tests,
            requirements,
            violations,
            times,
            out_dir,
            legacy_requirements,
        } => {
            let requirements_strategy = if legacy_requirements {
                RequirementsStrategy::LegacyTrSuffix
            } else {
                RequirementsStrategy::Interned
            };
            let options = NormalizeOptions {
                all_tests,
                requirements,
                violations,
                times,
                out_dir,
                requirements_strategy,
            };
            let report = normalize(&options).context("normalization failed")?;
            println!(
                "{} tests, {} requirements, {} violations, {} timed",
                report.tests, report.requirements, report.violations, report.timed_tests
            );
            for path in &report.written {
                println!("wrote {}", path.display());
            }
        }
        Commands::Formulate {
            project_dir,
            config,
        } => {
            let report = run_formulation(&project_dir, &config)
                .with_context(|| format!("formulating {}", config.display()))?;
            for path in &report.written {
                println!("wrote {}", path.display());
            }
        }
        Commands::Extract {
            project_dir,
            solution,
            out_file,
            mapping,
            cov,
            fault,
        } => {
            let mut options = ExtractOptions::new(project_dir, solution, out_file);
            options.mapping = mapping;
            options.reports = vec![
                ReportSource::new("Statements", &cov, RecordKind::Coverage),
                ReportSource::new("Faults", &fault, RecordKind::Coverage),
            ];
            let extraction = extract(&options).context("extraction failed")?;
            let names: Vec<&str> = extraction.selected.iter().map(|t| t.as_str()).collect();
            println!("Minimized test suite: {}", names.join(" "));
            println!("# Minimized test suite: {}", names.len());
            for report in &extraction.reports {
                println!("{report}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_flags() {
        let cli = Cli::try_parse_from([
            "suitemin",
            "normalize",
            "all.txt",
            "req.csv",
            "viol.csv",
            "times.csv",
            "out",
            "--legacy-requirements",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Normalize {
                legacy_requirements: true,
                ..
            }
        ));
    }

    #[test]
    fn test_extract_defaults() {
        let cli =
            Cli::try_parse_from(["suitemin", "extract", "proj", "run.minisat", "out.txt"]).unwrap();
        let Commands::Extract {
            mapping, cov, fault, ..
        } = cli.command
        else {
            panic!("expected extract");
        };
        assert!(mapping.is_none());
        assert_eq!(cov, "cov.info");
        assert_eq!(fault, "fault.info");
    }

    #[test]
    fn test_formulate_requires_config() {
        assert!(Cli::try_parse_from(["suitemin", "formulate", "proj"]).is_err());
    }
}
