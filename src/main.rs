use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use rust_network_recon_tool::commands::{Command, execute};
use rust_network_recon_tool::config::ReconConfig;
use rust_network_recon_tool::wifi::WiFiRecon;

#[derive(Parser, Debug)]
#[command(name = "rust_network_recon_tool")]
#[command(about = "802.11 station discovery and deauthentication")]
struct Args {
    /// Monitor-capable wireless interface
    #[arg(short, long)]
    interface: Option<String>,

    /// Replay frames from a radiotap pcap file instead of a live interface
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// JSON file station aliases are loaded from and saved to
    #[arg(long)]
    alias_file: Option<PathBuf>,

    /// Pause between injected deauth frames
    #[arg(long)]
    deauth_delay_ms: Option<u64>,

    /// Commands to run before the prompt, separated by ';'
    #[arg(short, long)]
    eval: Option<String>,
}

impl Args {
    fn apply(&self, config: &mut ReconConfig) {
        if let Some(interface) = &self.interface {
            config.interface = interface.clone();
        }
        if self.replay.is_some() {
            config.replay = self.replay.clone();
        }
        if self.alias_file.is_some() {
            config.alias_file = self.alias_file.clone();
        }
        if let Some(delay) = self.deauth_delay_ms {
            config.deauth_delay = Duration::from_millis(delay);
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

/// Returns false once the session should end.
fn handle_line(recon: &WiFiRecon, line: &str) -> bool {
    if line.trim().is_empty() {
        return true;
    }

    match Command::parse(line) {
        Ok(Command::Quit) => return false,
        Ok(command) => match execute(recon, &command) {
            Ok(Some(output)) => println!("{}", output),
            Ok(None) => {}
            Err(e) => eprintln!("{}", e),
        },
        Err(e) => eprintln!("{} (try 'help')", e),
    }
    true
}

fn run_session(recon: &WiFiRecon, preload: Option<String>) {
    for line in preload.iter().flat_map(|script| script.split(';')) {
        if !handle_line(recon, line) {
            return;
        }
    }

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("wifi> ");
        io::stdout().flush().ok();

        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => return,
            Ok(_) => {
                if !handle_line(recon, &line) {
                    return;
                }
            }
            Err(e) => {
                eprintln!("Failed to read command: {}", e);
                return;
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut config = ReconConfig::from_env();
    args.apply(&mut config);
    tracing::debug!("Configuration: {:?}", config);

    let recon = Arc::new(WiFiRecon::new(config)?);

    let interrupted = recon.clone();
    ctrlc::set_handler(move || {
        tracing::info!("Interrupt received, shutting down");
        if interrupted.is_running() {
            interrupted.stop().ok();
        }
        std::process::exit(0);
    })?;

    let session = recon.clone();
    let preload = args.eval.clone();
    tokio::task::spawn_blocking(move || run_session(&session, preload)).await?;

    if recon.is_running() {
        recon.stop()?;
    }
    Ok(())
}
