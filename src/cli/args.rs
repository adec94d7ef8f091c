//! CLI argument definitions

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "blockwatch",
    about = "Watch a process for threads that stay blocked and dump their stacks",
    after_help = "\
EXAMPLES:
    blockwatch my-app                                Auto-detect PID by name
    blockwatch --pid 1234                            Explicit PID
    blockwatch --pid 1234 --config debug,interval=500,threshold=30000

CONFIG KEYS:
    debug              verbose cycle logging (no value)
    path=DIR           dump directory (default: tmp)
    interval=MS        sampling period (default: 1000)
    threshold=MS       continuous block time before a dump (default: 60000)
    delay=MS           minimum spacing between dumps (default: 60000)
    filterRegex=RE     full-match filter on tracked thread names"
)]
pub struct Args {
    /// Process name to watch (auto-detects PID)
    #[arg(value_name = "PROCESS")]
    pub process: Option<String>,

    /// Process ID to watch
    #[arg(short, long)]
    pub pid: Option<i32>,

    /// Agent configuration string: comma-separated key=value pairs
    #[arg(short, long, value_name = "STRING")]
    pub config: Option<String>,
}
