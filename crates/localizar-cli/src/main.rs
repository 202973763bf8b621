//! Localizador CLI: locator validation and generation for DOM snapshots
//!
//! ## Usage
//!
//! ```bash
//! localizador validate page.json                # Validate interactive elements
//! localizador validate page.json -e login-btn   # Validate a single element
//! localizador validate page.json --all          # Validate every element
//! localizador generate page.json                # Print locators as JSON
//! localizador generate page.json -o out.json    # Write locators to a file
//! ```

use clap::Parser;
use localizador::{
    Cli, CliConfig, CliError, CliResult, Commands, GenerateArgs, ProgressReporter, ValidateArgs,
    Verbosity,
};
use localizar::{
    synthesize, validate_element, BatchReport, ElementValidation, LocatorExport, NodeId, Snapshot,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    // Build configuration from CLI args
    let config = build_config(&cli);
    init_tracing(&config);

    match cli.command {
        Commands::Validate(args) => run_validate(&config, &args),
        Commands::Generate(args) => run_generate(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(cli.color.into())
}

fn init_tracing(config: &CliConfig) {
    let default = match config.verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "info",
        Verbosity::Debug => "debug",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_snapshot(path: &Path) -> CliResult<Snapshot> {
    let raw = std::fs::read_to_string(path)?;
    Ok(Snapshot::from_json(&raw)?)
}

/// Resolve which elements a command operates on.
///
/// `--element` addresses one element by uid or id. `--all` takes every node.
/// The default is the interactive subset.
fn select_targets(snapshot: &Snapshot, element: Option<&str>, all: bool) -> CliResult<Vec<NodeId>> {
    if let Some(identifier) = element {
        let id = snapshot
            .find_by_uid(identifier)
            .or_else(|| snapshot.find_by_id(identifier))
            .ok_or_else(|| {
                CliError::invalid_argument(format!("element `{identifier}` not found in snapshot"))
            })?;
        return Ok(vec![id]);
    }

    if all {
        return Ok(snapshot.iter_ids().collect());
    }

    Ok(snapshot.interactive_elements())
}

fn default_report_path(snapshot: &Path) -> PathBuf {
    let stem = snapshot.file_stem().map_or_else(
        || "snapshot".to_string(),
        |s| s.to_string_lossy().into_owned(),
    );
    snapshot.with_file_name(format!("{stem}-validation-results.json"))
}

fn print_outcome(reporter: &ProgressReporter, outcome: &ElementValidation) {
    let label = outcome
        .element_uid
        .as_deref()
        .or(outcome.element_tag.as_deref())
        .unwrap_or("<element>");

    let verdict = format!(
        "{label}: {}/{} selectors valid",
        outcome.report.valid_selectors, outcome.report.total_selectors
    );
    if outcome.success {
        reporter.success(&verdict);
    } else {
        reporter.failure(&verdict);
    }

    for result in &outcome.report.results {
        reporter.selector_line(&result.selector, result.is_valid, result.reason.as_deref());
    }
    for warning in &outcome.report.warnings {
        reporter.warning(warning);
    }
    for recommendation in outcome.recommendations() {
        reporter.info(recommendation);
    }
}

fn run_validate(config: &CliConfig, args: &ValidateArgs) -> CliResult<ExitCode> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let options = config
        .validation_options()
        .with_min_valid_selectors(args.min_valid)
        .with_require_css(!args.no_css)
        .with_require_xpath(!args.no_xpath);

    let targets = select_targets(&snapshot, args.element.as_deref(), args.all)?;
    if targets.is_empty() {
        return Err(CliError::invalid_argument(
            "snapshot contains no interactive elements; use --all or --element",
        ));
    }
    debug!(targets = targets.len(), "selected validation targets");

    let mut reporter =
        ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    let single = args.element.is_some();

    let outcomes = if single {
        let outcome = validate_element(&snapshot, targets[0], options);
        print_outcome(&reporter, &outcome);
        vec![outcome]
    } else {
        reporter.start_progress(targets.len() as u64, "Validating elements");
        let mut collected = Vec::with_capacity(targets.len());
        for &id in &targets {
            collected.push(validate_element(&snapshot, id, options));
            reporter.increment(1);
        }
        reporter.finish();
        collected
    };

    let report = BatchReport::from_outcomes(&outcomes);
    if !single {
        for line in report.failure_digest() {
            reporter.failure(&line);
        }
    }
    reporter.summary(report.successful, report.failed);

    // Single-element runs only write a report when asked; batch runs default
    // to a sibling of the snapshot.
    let report_path = args.output.clone().or_else(|| {
        if single {
            None
        } else {
            Some(default_report_path(&args.snapshot))
        }
    });
    if let Some(path) = report_path {
        report.write_json(&path)?;
        reporter.info(&format!("report written to {}", path.display()));
    }

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_generate(config: &CliConfig, args: &GenerateArgs) -> CliResult<ExitCode> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let targets = select_targets(&snapshot, args.element.as_deref(), false)?;
    if targets.is_empty() {
        return Err(CliError::invalid_argument(
            "snapshot contains no interactive elements; use --element",
        ));
    }
    debug!(targets = targets.len(), "selected generation targets");

    let exports: Vec<LocatorExport> = targets
        .iter()
        .map(|&id| {
            let node = snapshot.node(id);
            LocatorExport {
                element_uid: node.uid.clone(),
                element_tag: node.tag.clone(),
                locators: synthesize(&snapshot, id),
            }
        })
        .collect();

    let json = if args.element.is_some() {
        serde_json::to_string_pretty(&exports[0])?
    } else {
        serde_json::to_string_pretty(&exports)?
    };

    if let Some(path) = &args.output {
        std::fs::write(path, &json)?;
        let reporter =
            ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
        reporter.info(&format!("locators written to {}", path.display()));
    } else {
        println!("{json}");
    }

    Ok(ExitCode::SUCCESS)
}
