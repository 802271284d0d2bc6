//! hoststat - prints disk and memory telemetry read directly from the kernel.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{Level, error};
use tracing_subscriber::EnvFilter;

use hoststat_core::collector;
use hoststat_core::fmt::{FmtStyle, escape_control, format_bytes, format_ms, format_percent, truncate};
use hoststat_core::model::{IoCounters, Partition, VirtualMemoryStat};

/// Host disk and memory telemetry.
#[derive(Parser)]
#[command(name = "hoststat", about = "Host disk and memory telemetry", version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List mounted filesystems.
    Partitions {
        /// Include pseudo filesystems and entries whose device is gone.
        #[arg(long)]
        all: bool,
    },
    /// Show per-disk I/O counters.
    Io {
        /// Only show these devices (e.g. ada0).
        names: Vec<String>,
    },
    /// Resolve the serial number of a block device.
    Serial {
        /// Device node, e.g. /dev/sda.
        device: PathBuf,
    },
    /// Show virtual memory usage.
    Memory,
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["hoststat", "hoststat_core"] {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_partitions(partitions: &[Partition]) {
    println!(
        "{:<24} {:<20} {:<8} OPTIONS",
        "DEVICE", "MOUNTPOINT", "TYPE"
    );
    for p in partitions {
        println!(
            "{:<24} {:<20} {:<8} {}",
            truncate(&p.device, 24),
            truncate(&p.mountpoint, 20),
            truncate(&p.fs_type, 8),
            p.options
        );
    }
}

fn print_io_counters(counters: &[&IoCounters]) {
    println!(
        "{:<10} {:>10} {:>10} {:>9} {:>9} {:>8} {:>8} {:>8}",
        "DEVICE", "READS", "WRITES", "RBYTES", "WBYTES", "RTIME", "WTIME", "BUSY"
    );
    for c in counters {
        println!(
            "{:<10} {:>10} {:>10} {:>9} {:>9} {:>8} {:>8} {:>8}",
            c.name,
            c.read_count,
            c.write_count,
            format_bytes(c.read_bytes, FmtStyle::Compact),
            format_bytes(c.write_bytes, FmtStyle::Compact),
            format_ms(c.read_time_ms, FmtStyle::Compact),
            format_ms(c.write_time_ms, FmtStyle::Compact),
            format_ms(c.busy_time_ms, FmtStyle::Compact),
        );
    }
}

fn print_memory(vm: &VirtualMemoryStat) {
    let rows = [
        ("total", vm.total),
        ("available", vm.available),
        ("used", vm.used),
        ("free", vm.free),
        ("active", vm.active),
        ("inactive", vm.inactive),
        ("wired", vm.wired),
    ];
    for (label, bytes) in rows {
        println!("{:<10} {}", label, format_bytes(bytes, FmtStyle::Detail));
    }
    println!("{:<10} {}", "used%", format_percent(vm.used_percent));
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    match &args.command {
        Command::Partitions { all } => {
            let partitions = collector::partitions(*all)?;
            if args.json {
                print_json(&partitions)?;
            } else {
                print_partitions(&partitions);
            }
        }
        Command::Io { names } => {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            let counters = collector::io_counters(&names)?;
            if args.json {
                print_json(&counters)?;
            } else {
                let mut sorted: Vec<&IoCounters> = counters.values().collect();
                sorted.sort_by(|a, b| a.name.cmp(&b.name));
                print_io_counters(&sorted);
            }
        }
        Command::Serial { device } => {
            let serial = collector::disk_serial_number(device);
            if args.json {
                print_json(&serial)?;
            } else {
                println!("{}", escape_control(&serial));
            }
        }
        Command::Memory => {
            let vm = collector::virtual_memory()?;
            if args.json {
                print_json(&vm)?;
            } else {
                print_memory(&vm);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_subcommands() {
        let args = Args::try_parse_from(["hoststat", "partitions", "--all"]).unwrap();
        assert!(matches!(args.command, Command::Partitions { all: true }));

        let args = Args::try_parse_from(["hoststat", "--json", "io", "ada0", "ada1"]).unwrap();
        assert!(args.json);
        match args.command {
            Command::Io { names } => assert_eq!(names, vec!["ada0", "ada1"]),
            _ => panic!("expected io"),
        }

        let args = Args::try_parse_from(["hoststat", "-vv", "memory"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(matches!(args.command, Command::Memory));
    }

    #[test]
    fn test_args_serial_requires_device() {
        assert!(Args::try_parse_from(["hoststat", "serial"]).is_err());
        let args = Args::try_parse_from(["hoststat", "serial", "/dev/sda"]).unwrap();
        assert!(matches!(args.command, Command::Serial { device } if device == PathBuf::from("/dev/sda")));
    }

    #[test]
    fn test_clap_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
