use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use mbus_telegram::util::hex::decode_hex;
use mbus_telegram::{
    init_logger, log_info, parse_telegram, MBusDeviceManager, ScanConfig, SerialConfig,
    SerialTransport,
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "mbus-cli")]
#[command(about = "CLI tool for wired M-Bus telegrams")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a telegram given as hex and print it as JSON
    Parse {
        /// Telegram octets, e.g. "68 0A 0A 68 ..." or "680A0A68..."
        hex: Option<String>,
        /// Read the hex text from a file instead
        #[arg(long)]
        file: Option<PathBuf>,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Send SND_NKE and report whether the slave acknowledged
    Ping {
        #[arg(short, long)]
        port: String,
        #[arg(short, long)]
        address: u8,
        #[arg(short, long, default_value = "2400")]
        baudrate: u32,
    },
    /// Send REQ_UD2 and print the decoded telegram
    Read {
        #[arg(short, long)]
        port: String,
        #[arg(short, long)]
        address: u8,
        #[arg(short, long, default_value = "2400")]
        baudrate: u32,
    },
    /// Ping an address range
    Scan {
        #[arg(short, long)]
        port: String,
        #[arg(long, default_value = "1")]
        start: u8,
        #[arg(long, default_value = "250")]
        end: u8,
        #[arg(long, default_value = "4")]
        concurrency: usize,
        /// Per-attempt timeout in seconds
        #[arg(long, default_value = "5")]
        timeout: u64,
        /// Also read every device found
        #[arg(long)]
        read: bool,
        #[arg(short, long, default_value = "2400")]
        baudrate: u32,
    },
}

fn manager(port: &str, baudrate: u32) -> MBusDeviceManager<SerialTransport> {
    let config = SerialConfig {
        baudrate,
        ..SerialConfig::default()
    };
    MBusDeviceManager::new(port, SerialTransport::with_config(port, config))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { hex, file, compact } => {
            let text = match (hex, file) {
                (Some(hex), None) => hex,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                _ => bail!("give either a hex string or --file"),
            };
            let data = decode_hex(text.trim()).context("decoding hex input")?;
            let telegram = parse_telegram(&data)?;
            println!("{}", telegram.to_json(!compact)?);
        }
        Commands::Ping {
            port,
            address,
            baudrate,
        } => {
            let state = manager(&port, baudrate).ping(address).await;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Commands::Read {
            port,
            address,
            baudrate,
        } => {
            let state = manager(&port, baudrate).read(address).await;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Commands::Scan {
            port,
            start,
            end,
            concurrency,
            timeout,
            read,
            baudrate,
        } => {
            let config = ScanConfig {
                start,
                end,
                concurrency,
                attempt_timeout: Duration::from_secs(timeout),
                read,
            };
            let report = manager(&port, baudrate).scan(&config).await?;
            log_info(&format!("Devices found: {:?}", report.alive()));
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
