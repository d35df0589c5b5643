use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;

use moesif_sim::{Simulator, TraceReader, NUM_CORES};

#[derive(Parser)]
#[command(name = "coherentsim", version, about = "MOESIF cache coherence simulator")]
struct Cli {
    /// Trace file, one `P<core> <read|write> <tag>` command per line
    trace: PathBuf,
}

fn main() -> ExitCode {
    // logging
    let env = Env::default()
        .filter_or("MOESIF_LOG", "warn")
        .write_style_or("MOESIF_LOG_STYLE", "auto");
    env_logger::init_from_env(env);

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // usage errors exit with 1, --help and --version with 0
        Err(e) if e.use_stderr() => {
            // nothing left to report to if stderr is gone
            e.print().ok();
            return ExitCode::from(1);
        },
        Err(e) => e.exit(),
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        },
    }
}

fn run(cli: &Cli) -> Result<()> {
    let file = File::open(&cli.trace)
        .with_context(|| format!("cannot open trace file {}", cli.trace.display()))?;
    let reader = TraceReader::new(BufReader::new(file), NUM_CORES);

    let mut sim = Simulator::new();
    let outcome = sim
        .replay(reader)
        .with_context(|| format!("while replaying {}", cli.trace.display()))?;

    // print stats
    let mut out = std::io::stdout().lock();
    write!(out, "{}", outcome.stats)?;
    out.flush()?;
    Ok(())
}
