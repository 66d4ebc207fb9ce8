mod debug_report;

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use tracing::debug;

/// Parse a rule document and report what each trigger would do.
#[derive(Parser, Debug)]
#[command(name = "cssc", version)]
#[command(about = "Inspect csscript rule documents without a host")]
struct Args {
    /// Rule document to read. Reads stdin when omitted or `-`.
    #[arg(value_name = "PATH")]
    input: Option<PathBuf>,

    /// Force ANSI color output.
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Disable ANSI color output.
    #[arg(long)]
    no_color: bool,

    /// Exit with status 1 when any effect call would be skipped.
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_tracing();

    let (name, source) = read_source(args.input.as_ref())?;
    if source.trim().is_empty() {
        bail!("no input provided");
    }

    let color = if args.color {
        true
    } else if args.no_color {
        false
    } else {
        io::stdout().is_terminal()
    };

    let blocks = csscript::parse(&source);
    debug!(blocks = blocks.len(), bytes = source.len(), "parsed document");

    let summary = debug_report::print_report(&name, &blocks, color);
    if args.strict && summary.skipped > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn read_source(path: Option<&PathBuf>) -> Result<(String, String)> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            let source =
                std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
            Ok((path.display().to_string(), source))
        }
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("failed to read stdin")?;
            Ok(("<stdin>".to_string(), buffer))
        }
    }
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("CSSC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}
