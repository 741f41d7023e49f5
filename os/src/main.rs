//! vmsim 命令行入口

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mm::MmConfig;
use std::path::PathBuf;
use vmsim::config::{
    INSTRUCTION_SIZE, KernelConfig, MAX_PROCESSES, MAX_REGISTERS, PAGE_SIZE, PHYSICAL_MEMORY_SIZE,
};
use vmsim::log::LogLevel;
use vmsim::{Kernel, loader};

/// Demand-paged virtual memory and round-robin scheduling simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Process image files, loaded in order as pid 0, 1, ...
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Page size in bytes
    #[arg(long, default_value_t = PAGE_SIZE)]
    page_size: usize,

    /// Physical memory size in bytes
    #[arg(long, default_value_t = PHYSICAL_MEMORY_SIZE)]
    physical_memory: usize,

    /// Bytes per instruction slot
    #[arg(long, default_value_t = INSTRUCTION_SIZE)]
    instruction_size: usize,

    /// Registers per process
    #[arg(long, default_value_t = MAX_REGISTERS)]
    registers: usize,

    /// Maximum number of processes
    #[arg(long, default_value_t = MAX_PROCESSES)]
    max_processes: usize,

    /// Backing store pages per process (default: the data region's page count)
    #[arg(long)]
    backing_pages: Option<usize>,

    /// Log level
    #[arg(long, value_enum, default_value_t = Level::Info)]
    log_level: Level,

    /// Only print the final summary
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => LogLevel::Error,
            Level::Warn => LogLevel::Warning,
            Level::Info => LogLevel::Info,
            Level::Debug => LogLevel::Debug,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let mut mm = MmConfig::new(args.page_size, args.physical_memory);
    if let Some(pages) = args.backing_pages {
        mm = mm.with_backing_pages(pages);
    }
    let config = KernelConfig {
        mm,
        instruction_size: args.instruction_size,
        max_registers: args.registers,
        max_processes: args.max_processes,
    };

    vmsim::log::init(args.log_level.into(), args.quiet);
    let mut kernel = Kernel::new(config).context("Failed to start kernel")?;

    for path in &args.images {
        let image = loader::load_image(path, config.instruction_size)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        kernel
            .spawn(image)
            .with_context(|| format!("Failed to spawn {}", path.display()))?;
    }

    let report = kernel.run().context("Simulation aborted")?;
    println!(
        "steps={} processes={} page_faults={} evictions={} dirty_flushes={} backing_restores={}",
        report.steps,
        report.finished.len(),
        report.stats.page_faults,
        report.stats.evictions,
        report.stats.dirty_flushes,
        report.stats.backing_restores
    );
    Ok(())
}
