//! # blockwatch - Main Entry Point
//!
//! Resolves the target process, parses the agent configuration string,
//! and runs the monitor loop until Ctrl-C or target exit.

use anyhow::Result;
use clap::Parser;

use blockwatch::cli::Args;
use blockwatch::config::AgentConfig;
use blockwatch::domain::Pid;
use blockwatch::monitor::Monitor;
use blockwatch::process_lookup::find_process_by_name;
use blockwatch::snapshot::ProcfsSnapshotProvider;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    let args = Args::parse();
    init_logging(args.config.as_deref().unwrap_or(""));

    std::process::exit(match run(args) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e}");
            code
        }
    });
}

/// Initialize env_logger. The config string's `debug` key raises this
/// crate's level to debug when RUST_LOG is not set; an explicit RUST_LOG
/// always wins.
fn init_logging(config_str: &str) {
    let debug = config_str.split(',').any(|segment| segment.trim() == "debug");
    let mut builder = env_logger::Builder::from_default_env();
    if debug && std::env::var_os("RUST_LOG").is_none() {
        builder.filter_module("blockwatch", log::LevelFilter::Debug);
    }
    builder.init();
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.to_string().to_lowercase().contains("missing required argument") {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

/// Resolve the target PID from CLI arguments.
///
/// Supports two modes:
/// - `blockwatch my-app` - find process by name
/// - `blockwatch --pid 1234` - explicit PID
fn resolve_pid(args: &Args) -> Result<Pid> {
    if let Some(ref name) = args.process {
        if args.pid.is_some() {
            anyhow::bail!(
                "Cannot use PROCESS argument with --pid.\n\n\
                 Use either:\n  \
                 blockwatch my-app          (auto-detect)\n  \
                 blockwatch --pid 1234      (explicit PID)"
            );
        }
        let info = find_process_by_name(name)?;
        return Ok(info.pid);
    }

    if let Some(pid) = args.pid {
        if !std::path::Path::new(&format!("/proc/{pid}")).exists() {
            anyhow::bail!("process {pid} not found");
        }
        return Ok(Pid(pid));
    }

    anyhow::bail!(
        "Missing required argument: PROCESS or --pid\n\n\
         Usage:\n  \
         blockwatch my-app          Auto-detect PID by name\n  \
         blockwatch --pid 1234      Explicit PID\n\n\
         Run 'blockwatch --help' for more options"
    )
}

#[tokio::main]
async fn run(args: Args) -> Result<()> {
    let pid = resolve_pid(&args)?;
    let config = AgentConfig::parse(args.config.as_deref().unwrap_or(""))?;

    let provider = ProcfsSnapshotProvider::new(pid);
    let monitor = Monitor::new(provider, config);
    monitor.run(pid).await;

    Ok(())
}
