//! Command-line front end: convert images, print them, scan for printers.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use purrint_lib::AppConfig;
use purrint_lib::config::load_dotenv;
use purrint_lib::services::{self, ImageSource, RenderSession};

#[derive(Parser)]
#[command(name = "purrint")]
#[command(about = "Dither images into receipts for GB series cat printers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an image and write the monochrome PNG preview
    Render {
        /// Input image path, or "-" for stdin
        input: String,

        /// Output PNG path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the contrast stretch before dithering
        #[arg(long)]
        no_contrast_stretch: bool,
    },
    /// Convert an image and send it to the printer
    Print {
        /// Input image path, or "-" for stdin
        input: String,

        /// Printer MAC address or UUID (overrides PRINTER_ADDRESS)
        #[arg(short, long)]
        address: Option<String>,

        /// Log the job instead of printing (overrides DRY_RUN_MODE)
        #[arg(long)]
        dry_run: bool,

        /// Also write the PNG preview to this path
        #[arg(long)]
        preview: Option<PathBuf>,

        /// Skip the contrast stretch before dithering
        #[arg(long)]
        no_contrast_stretch: bool,
    },
    /// List nearby printers
    Scan {
        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Scan window in seconds (overrides SCAN_TIMEOUT_SECS)
        #[arg(short, long)]
        timeout: Option<u64>,
    },
    /// Show the effective configuration
    Config {
        /// Print settings as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    load_dotenv();
    let mut config = AppConfig::load().context("Failed to load configuration")?;

    match cli.command {
        Commands::Render {
            input,
            output,
            no_contrast_stretch,
        } => {
            if no_contrast_stretch {
                config.contrast_stretch = false;
            }
            let source = ImageSource::from_arg(&input);
            let surface = services::render_source(source, config.render_options())
                .await
                .with_context(|| format!("Failed to convert {input}"))?;
            services::write_preview(&surface, output.as_deref())
                .await
                .context("Failed to write preview")?;
        }
        Commands::Print {
            input,
            address,
            dry_run,
            preview,
            no_contrast_stretch,
        } => {
            if let Some(address) = address {
                config
                    .set_printer_address(&address)
                    .context("Invalid --address")?;
            }
            if dry_run {
                config.dry_run_mode = true;
            }
            if no_contrast_stretch {
                config.contrast_stretch = false;
            }

            let session = RenderSession::new();
            let rendered = session
                .submit(ImageSource::from_arg(&input), config.render_options())
                .await
                .with_context(|| format!("Failed to convert {input}"))?;
            if let Some(path) = preview {
                services::write_preview(&rendered.surface, Some(&path))
                    .await
                    .context("Failed to write preview")?;
            }

            let transport = services::transport_for(&config);
            session
                .print_current(transport.as_ref())
                .await
                .context("Print failed")?;
            tracing::info!(transport = transport.name(), "Print job complete");
        }
        Commands::Scan { json, timeout } => {
            if let Some(secs) = timeout {
                anyhow::ensure!(
                    (1..=60).contains(&secs),
                    "--timeout must be between 1 and 60 seconds"
                );
                config.scan_timeout_secs = secs;
            }
            let printers = services::scan_printers(config.scan_timeout())
                .await
                .context("Bluetooth scan failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&printers)?);
            } else if printers.is_empty() {
                println!("No printers found");
            } else {
                for p in &printers {
                    let name = if p.name.is_empty() { "(unnamed)" } else { p.name.as_str() };
                    println!("{}\t{}\t{}", p.mac_address, name, p.last_seen);
                }
            }
        }
        Commands::Config { json } => {
            let settings = config.settings();
            if json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                for s in &settings {
                    let marker = if s.is_default { " (default)" } else { "" };
                    println!("{}={}{}\t# {}", s.key, s.value, marker, s.description);
                }
            }
        }
    }

    Ok(())
}
