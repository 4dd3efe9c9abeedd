//! CLI entry point for the `la-harness` binary.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use harness_cli::{exit_code, logging, RunReport, Scenario, EXIT_ERROR};
use harness_core::{
    addi_fetch_script, addi_harness, BranchPath, HarnessConfig, ScriptedPort, SettleDelay,
};
use serde as _;
use serde_json as _;
#[cfg(test)]
use rstest as _;
#[cfg(test)]
use tempfile as _;
use tracing::info;
use tracing_subscriber as _;

/// Bus responder harness for a CPU under test on a logic-analyzer sideband bus.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Args {
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a JSON scenario file against the scripted requester.
    Run {
        /// Path to the scenario file.
        scenario: PathBuf,

        /// Busy-wait spins after each clock edge; overrides the file.
        #[arg(long)]
        settle_spins: Option<u32>,
    },
    /// Run the built-in `addi` compare-and-branch scenario.
    Demo {
        /// Which way the requester takes the branch.
        #[arg(long, value_enum, default_value_t = Branch::NotTaken)]
        branch: Branch,

        /// Busy-wait spins after each clock edge.
        #[arg(long, default_value_t = 0)]
        settle_spins: u32,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Branch {
    Taken,
    NotTaken,
}

impl From<Branch> for BranchPath {
    fn from(branch: Branch) -> Self {
        match branch {
            Branch::Taken => Self::Taken,
            Branch::NotTaken => Self::NotTaken,
        }
    }
}

fn run_demo(branch: Branch, settle_spins: u32) -> Result<RunReport> {
    let path = BranchPath::from(branch);
    let config = HarnessConfig {
        settle: SettleDelay::Spin(settle_spins),
        ..HarnessConfig::default()
    };
    let mut harness = addi_harness(config).context("demo image rejected")?;
    let mut port = ScriptedPort::from_transactions(addi_fetch_script(path));
    let outcome = harness.run(&mut port).context("harness run failed")?;
    Ok(RunReport {
        outcome,
        stats: *harness.stats(),
    })
}

fn execute(command: Command) -> Result<RunReport> {
    match command {
        Command::Run {
            scenario,
            settle_spins,
        } => Scenario::load(&scenario)?.run(settle_spins),
        Command::Demo {
            branch,
            settle_spins,
        } => run_demo(branch, settle_spins),
    }
}

fn print_report(report: &RunReport) {
    let tag = report.outcome.tag().byte();
    println!("{} (tag {tag:#04x})", report.outcome);
    println!(
        "cycles {} transactions {} rom {} ram-read {} ram-write {} unmapped {}",
        report.stats.cycles,
        report.stats.transactions,
        report.stats.rom_fetches,
        report.stats.ram_reads,
        report.stats.ram_writes,
        report.stats.unmapped
    );
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = logging::init(logging::level_filter(args.verbose.log_level())) {
        eprintln!("warning: {err:#}");
    }

    match execute(args.command) {
        Ok(report) => {
            info!(outcome = %report.outcome, "run finished");
            print_report(&report);
            ExitCode::from(exit_code(report.outcome))
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
