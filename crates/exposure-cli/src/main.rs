//! Exposure CLI - interactive consent-gated exposure scanning session.

use anyhow::{bail, Context, Result};
use clap::Parser;
use exposure_client::RemoteJobClient;
use exposure_core::AppConfig;
use exposure_fingerprint::{Fingerprint, FingerprintCollector, HostProbe};
use exposure_session::{ResultFragment, SessionController, SessionView};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "exposure")]
#[command(about = "Consent-gated exposure scanning client", long_about = None)]
struct Cli {
    /// Path to a config file (defaults to the XDG config location)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the scanning service base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Directory for exported artifacts (defaults to the current directory)
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

/// Terminal renderer for session effects.
struct TerminalView;

impl SessionView for TerminalView {
    fn consent_locked(&mut self) {
        println!("Consent recorded for this session.");
    }

    fn fingerprint_revealed(&mut self, fingerprint: &Fingerprint) {
        println!("\nFingerprint: {}", fingerprint.digest);
        match serde_json::to_string_pretty(&fingerprint.attributes) {
            Ok(attrs) => println!("{attrs}"),
            Err(_) => println!("(attributes unavailable)"),
        }
    }

    fn scan_unlocked(&mut self) {
        println!("Scanning enabled. Type 'help' for commands.\n");
    }

    fn progress(&mut self, percent: u8) {
        println!("[scan {percent:>3}%]");
    }

    fn progress_cleared(&mut self) {
        // Indicator is line-based; nothing to erase.
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("error: {message}");
    }

    fn show_fragments(&mut self, fragments: &[ResultFragment]) {
        if fragments.is_empty() {
            println!("No matches found.");
            return;
        }
        for fragment in fragments {
            println!("{fragment}\n");
        }
    }

    fn show_report(&mut self, report: &serde_json::Value) {
        match serde_json::to_string_pretty(report) {
            Ok(text) => println!("{text}"),
            Err(_) => println!("{report}"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::load().context("failed to load config")?,
    };
    config.apply_env_overrides();

    if let Some(base_url) = cli.base_url {
        config.service.base_url = base_url;
    }

    // Required-config check happens before any network use.
    config.validate().context("invalid configuration")?;

    let probe = HostProbe::new(config.environment.clone());
    let client = RemoteJobClient::new(&config.service).context("failed to create HTTP client")?;
    let mut controller = SessionController::new(FingerprintCollector::new(probe), client);
    let mut view = TerminalView;

    let export_dir = cli
        .export_dir
        .unwrap_or_else(|| PathBuf::from("."));

    consent_phase(&mut controller, &mut view).await?;
    command_loop(&mut controller, &mut view, &export_dir).await
}

/// Gather consent input until the grant succeeds.
///
/// The gate re-evaluates eligibility on every edit, so the enable
/// prompt is only offered once the condition holds.
async fn consent_phase(
    controller: &mut SessionController<HostProbe>,
    view: &mut TerminalView,
) -> Result<()> {
    println!("This tool derives a device fingerprint and sends it, with your");
    println!("queries, to the configured scanning service. Nothing is sent");
    println!("without your explicit consent.\n");

    loop {
        let phrase = prompt("Type the consent phrase (\"I CONSENT\"): ")?;
        controller.gate_mut().set_phrase(&phrase);

        let ack = prompt("I understand what will be sent [y/N]: ")?;
        controller
            .gate_mut()
            .set_acknowledged(ack.trim().eq_ignore_ascii_case("y"));

        if !controller.gate().is_eligible() {
            println!("Consent not recognized; please try again.\n");
            continue;
        }

        let confirm = prompt("Type 'allow' to enable scanning: ")?;
        if confirm.trim().eq_ignore_ascii_case("allow") {
            controller.on_consent_granted(view).await?;
            return Ok(());
        }
        println!("Not enabled.\n");
    }
}

/// Main command loop: scan, simulate, export, quit.
async fn command_loop(
    controller: &mut SessionController<HostProbe>,
    view: &mut TerminalView,
    export_dir: &std::path::Path,
) -> Result<()> {
    loop {
        let line = prompt("> ")?;
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        let outcome = match command {
            "scan" => controller.on_scan_requested(rest, view).await,
            "simulate" => controller.on_simulate_requested(view).await,
            "export" => match controller.export_last_job(export_dir) {
                Ok(path) => {
                    println!("Exported to {}", path.display());
                    Ok(())
                }
                Err(e) => Err(e),
            },
            "help" => {
                print_help();
                Ok(())
            }
            "quit" | "exit" => return Ok(()),
            "" => Ok(()),
            other => {
                println!("Unknown command '{other}'; type 'help'.");
                Ok(())
            }
        };

        // Every error is terminal for the action, never for the session.
        if let Err(e) = outcome {
            eprintln!("error: {e}");
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  scan <username>   run an OSINT scan for a username");
    println!("  simulate          request a tracking-simulation report");
    println!("  export            save the last results as JSON");
    println!("  quit              end the session");
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush().context("failed to flush stdout")?;

    let mut line = String::new();
    let read = io::stdin()
        .read_line(&mut line)
        .context("failed to read input")?;
    if read == 0 {
        bail!("input closed");
    }
    Ok(line)
}
