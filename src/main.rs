//! ptsim - page table simulator
//!
//! Usage: ptsim [OPTIONS] [COMMANDS]...
//!
//! Commands:
//!   pfm                 Print the page free map
//!   ppt <p>             Print the page table of process p
//!   np <p> <n>          New process p with n data pages
//!   kp <p>              Kill process p
//!   sb <p> <a> <b>      Store byte b at virtual address a of process p
//!   lb <p> <a>          Load the byte at virtual address a of process p

use anyhow::{Result, bail};
use clap::Parser;
use log::debug;

use ptsim::constants::{PAGE_COUNT, PAGE_SIZE};
use ptsim::io::{parse_commands, read_script};
use ptsim::{Layout, VmManager, logger};

#[derive(Parser)]
#[command(name = "ptsim")]
#[command(about = "Single-level page table simulator")]
struct Args {
    /// Commands to run in order (pfm, ppt, np, kp, sb, lb)
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    commands: Vec<String>,

    /// Read commands from a file before the ones given on the command line
    #[arg(long)]
    script: Option<String>,

    /// Page size in bytes (power of two)
    #[arg(long, default_value_t = PAGE_SIZE)]
    page_size: usize,

    /// Number of physical pages
    #[arg(long, default_value_t = PAGE_COUNT)]
    page_count: usize,

    /// Offset of the page table directory in page 0 (default: page count)
    #[arg(long)]
    ptp_offset: Option<usize>,

    /// Total memory size; must equal page size * page count
    #[arg(long)]
    mem_size: Option<usize>,

    /// Log to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(logger::level_for_verbosity(args.verbose));

    // layout problems are fatal before any command runs
    let layout = match args.mem_size {
        Some(mem_size) => Layout::new(
            mem_size,
            args.page_size,
            args.page_count,
            args.ptp_offset.unwrap_or(args.page_count),
        )?,
        None => Layout::with_pages(args.page_size, args.page_count, args.ptp_offset)?,
    };

    let mut commands = match &args.script {
        Some(path) => read_script(path)?,
        None => Vec::new(),
    };
    commands.extend(parse_commands(&args.commands)?);

    if commands.is_empty() {
        bail!("usage: ptsim commands");
    }

    debug!(
        "layout: {} pages of {} bytes, directory at {}",
        layout.page_count(),
        layout.page_size(),
        layout.ptp_offset()
    );

    let mut vm = VmManager::new(layout);
    for command in &commands {
        debug!("running {}", command);
        match vm.execute(command) {
            Ok(output) => print!("{}", output),
            Err(e) => println!("{}", command.failure_message(&e)),
        }
    }

    Ok(())
}
