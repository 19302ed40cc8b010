//! outdir CLI
//!
//! Relocates and cleans the build output of a Gradle project tree.

use clap::{Parser, Subcommand};
use outdir_cli::output::{self, Status};
use outdir_cli::progress;
use outdir_core::config::Config;
use outdir_core::error::{exit_codes, Error};
use outdir_layout::{BuildDirectoryManager, CleanOptions, ConfiguredLayout};
use outdir_telemetry::TelemetryConfig;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "outdir")]
#[command(about = "Relocate and clean build output for Gradle project trees")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Root project directory (where settings.gradle[.kts] lives)
    #[arg(short = 'C', long, global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Machine-readable output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the build directory of every project
    Plan,

    /// Show the project evaluation order
    Order,

    /// Create the relocated build directories
    Prepare,

    /// Delete the relocated build root
    Clean {
        /// Report what would be deleted without deleting
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let mut telemetry = TelemetryConfig::from_verbosity(cli.verbose, cli.quiet);
    telemetry.json = cli.json;
    if let Err(e) = outdir_telemetry::init_with_config(telemetry) {
        eprintln!("{}", e);
    }

    match run(&cli) {
        Ok(code) => exit(code),
        Err(err) => {
            if cli.json {
                println!("{}", json!({ "ok": false, "error": err.to_report() }));
            } else {
                Status::report(&err);
            }
            exit(err.exit_code())
        }
    }
}

fn exit(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn run(cli: &Cli) -> outdir_core::Result<i32> {
    let location = std::fs::canonicalize(&cli.project_dir).map_err(|e| {
        Error::from(e).with_context(format!("Project directory {}", cli.project_dir.display()))
    })?;
    let config = Config::load(cli.config.as_deref(), &location)?;
    let manager = BuildDirectoryManager::from_config(&config.schema);

    match &cli.command {
        Commands::Plan => {
            let layout = configure(&manager, &location, &config)?;
            print_plan(cli, &layout)?;
        }
        Commands::Order => {
            let layout = configure(&manager, &location, &config)?;
            print_order(cli, &layout)?;
        }
        Commands::Prepare => {
            let layout = configure(&manager, &location, &config)?;
            let created = outdir_telemetry::timed("prepare", || layout.prepare())?;
            if cli.json {
                println!("{}", json!({ "ok": true, "created": created }));
            } else if !cli.quiet {
                Status::success(&format!(
                    "Created {} under {}",
                    output::format_count(created.len() as u64, "directory", "directories"),
                    layout.assignment.root().display()
                ));
            }
        }
        Commands::Clean { dry_run } => {
            run_clean(cli, &manager, &location, *dry_run)?;
        }
    }

    Ok(exit_codes::SUCCESS)
}

fn configure(manager: &BuildDirectoryManager, location: &Path, config: &Config) -> outdir_core::Result<ConfiguredLayout> {
    let tree = outdir_gradle::load_project_tree(location, &config.schema)?;
    outdir_telemetry::timed("configure", || manager.configure(tree))
}

fn print_plan(cli: &Cli, layout: &ConfiguredLayout) -> outdir_core::Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&layout.assignment)?);
        return Ok(());
    }
    if cli.quiet {
        return Ok(());
    }

    Status::header("Build directories");
    let width = output::label_width(layout.assignment.iter().map(|e| e.name.as_str()));
    for entry in layout.assignment.iter() {
        Status::path_row(entry.name.as_str(), width, &entry.path);
    }
    if layout.assignment.modules().is_empty() {
        Status::warning("No subprojects found; only the root project is relocated");
    }
    Ok(())
}

fn print_order(cli: &Cli, layout: &ConfiguredLayout) -> outdir_core::Result<()> {
    let names: Vec<&str> = match &layout.order {
        Some(order) => order.sequence().iter().map(|n| n.as_str()).collect(),
        None => layout.tree.subprojects().iter().map(|m| m.name().as_str()).collect(),
    };

    if cli.json {
        let first = layout.order.as_ref().map(|o| o.first().as_str());
        println!("{}", serde_json::to_string_pretty(&json!({ "first": first, "sequence": names }))?);
        return Ok(());
    }
    if cli.quiet {
        return Ok(());
    }

    Status::header("Evaluation order");
    for (i, name) in names.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, name);
    }
    if layout.order.is_none() {
        Status::info("Evaluation order is not enforced");
    }
    Ok(())
}

fn run_clean(cli: &Cli, manager: &BuildDirectoryManager, location: &Path, dry_run: bool) -> outdir_core::Result<()> {
    let visible = !cli.quiet && !cli.json && console::Term::stderr().is_term();
    let root = manager.compute_root_directory(location);
    let pb = progress::spinner(&format!("Deleting {}...", root.path().display()), visible && !dry_run);

    let result = outdir_telemetry::timed("clean", || manager.clean(location, CleanOptions { dry_run }));
    progress::finish(&pb);
    let report = result?;

    if cli.json {
        println!("{}", json!({ "ok": true, "report": report }));
        return Ok(());
    }
    if cli.quiet {
        return Ok(());
    }

    if !report.existed {
        Status::info(&format!("Nothing to clean at {}", report.root.display()));
    } else if report.dry_run {
        Status::info(&format!(
            "Would delete {} ({}) under {}",
            output::format_count(report.files_removed, "file", "files"),
            output::format_size(report.bytes_removed),
            report.root.display()
        ));
    } else {
        Status::success(&format!(
            "Deleted {} ({}) from {}",
            output::format_count(report.files_removed, "file", "files"),
            output::format_size(report.bytes_removed),
            report.root.display()
        ));
    }
    Ok(())
}
