//! Virtual memory simulator CLI.
//!
//! This binary is the dispatch loop around `vmsim-core`. It performs:
//! 1. **Setup:** Parses the trace, builds the configuration from its header (or a JSON
//!    file), and prints the run banner.
//! 2. **Streaming run (FIFO, LRU):** Feeds the trace to the simulator one line at a time,
//!    honouring `print`, `debug` and `nodebug` directives as they appear.
//! 3. **Batch run (OPTIMAL):** Hands the whole trace to the simulator, which needs the
//!    future of every access; directives are replayed at their original positions.
//! 4. **Report:** Prints the final state as text or JSON.

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vmsim_core::sim::{Directive, Trace, TraceLine};
use vmsim_core::{ReplacementPolicy, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "vmsim",
    author,
    version,
    about = "Demand-paged virtual memory simulator",
    long_about = "Replay a memory access trace against a fixed pool of physical frames.\n\nUnless --config is given, the first non-comment line of the trace is the configuration header:\n  <page_size> <num_frames> <num_pages> <num_backing_slots>\nEvery following line is an access (r<hex> or w<hex>) or a directive (print, debug, nodebug).\n\nExamples:\n  vmsim FIFO traces/basic.txt\n  vmsim --verbose LRU traces/basic.txt\n  vmsim --json OPTIMAL traces/basic.txt\n  vmsim --config sizes.json LRU accesses.txt"
)]
struct Cli {
    /// Replacement policy: FIFO, LRU or OPTIMAL.
    policy: ReplacementPolicy,

    /// Trace file to replay.
    trace: PathBuf,

    /// Start with per-access debug tracing enabled (same as a leading `debug` line).
    #[arg(short, long)]
    verbose: bool,

    /// Print snapshots and the final state as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Append a statistics summary after the final state.
    #[arg(long)]
    summary: bool,

    /// JSON configuration file. The trace must then have no header line; its first
    /// line is an access.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,vmsim_core=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Loads the trace and configuration, runs the simulation, and prints the final state.
fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let (trace, config) = Trace::load(&cli.trace, cli.config.as_deref(), cli.policy)?;

    let mut sim = Simulator::new(&config)?;
    sim.set_verbose(cli.verbose);
    info!(policy = %config.policy, trace = %cli.trace.display(), "starting run");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !cli.json {
        write!(out, "{}", sim.banner())?;
    }

    if config.policy.needs_lookahead() {
        run_batch(&mut sim, &trace, cli.json, &mut out)?;
    } else {
        run_streaming(&mut sim, &trace, cli.json, &mut out)?;
    }

    render(&sim, cli.json, &mut out)?;
    if cli.summary {
        sim.stats().write_summary(&mut out)?;
    }
    out.flush()?;

    info!(
        references = sim.stats().pages_referenced,
        misses = sim.stats().page_miss_instances,
        "run complete"
    );
    Ok(())
}

/// Feeds the trace to the simulator one line at a time.
fn run_streaming<W: Write>(
    sim: &mut Simulator,
    trace: &Trace,
    json: bool,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    for entry in &trace.entries {
        match entry.line {
            TraceLine::Directive(directive) => apply(sim, directive, json, out)?,
            TraceLine::Access(record) => {
                let _ = sim.access_record(&record)?;
            }
        }
    }
    Ok(())
}

/// Runs the whole trace as one batch, replaying directives at their positions.
fn run_batch<W: Write>(
    sim: &mut Simulator,
    trace: &Trace,
    json: bool,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let batch = trace.to_batch();
    for directive in batch.directives_after(0) {
        apply(sim, directive, json, out)?;
    }

    let mut write_error: Option<io::Error> = None;
    let _ = sim.run_batch_with(&batch.records, |i, sim| {
        if write_error.is_some() {
            return;
        }
        for directive in batch.directives_after(i + 1) {
            if let Err(e) = apply(sim, directive, json, out) {
                write_error = Some(e);
                return;
            }
        }
    })?;

    match write_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Executes one in-band directive.
fn apply<W: Write>(
    sim: &mut Simulator,
    directive: Directive,
    json: bool,
    out: &mut W,
) -> io::Result<()> {
    match directive {
        Directive::Print => render(sim, json, out),
        Directive::Debug => {
            sim.set_verbose(true);
            Ok(())
        }
        Directive::NoDebug => {
            sim.set_verbose(false);
            Ok(())
        }
    }
}

/// Writes the current state as text or JSON.
fn render<W: Write>(sim: &Simulator, json: bool, out: &mut W) -> io::Result<()> {
    if json {
        let doc = sim.snapshot().to_json().map_err(io::Error::other)?;
        writeln!(out, "{doc}")
    } else {
        write!(out, "{}", sim.report())
    }
}
