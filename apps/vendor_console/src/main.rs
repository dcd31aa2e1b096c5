use std::{path::PathBuf, sync::Arc, thread};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use client_core::{HttpOrderClient, VendorOrdersController};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;

use commands::{ConsoleCommand, HELP_TEXT};

const UI_EVENT_QUEUE: usize = 256;

#[derive(Parser, Debug)]
#[command(about = "Watch a vendor's orders and accept or reject them")]
struct Args {
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long)]
    api_base: Option<String>,
    #[arg(long)]
    poll_interval_secs: Option<u64>,
    /// 0 disables the timeout.
    #[arg(long)]
    request_timeout_secs: Option<u64>,
    /// Start watching this vendor right away.
    #[arg(long)]
    vendor_id: Option<String>,
}

impl Args {
    fn apply(&self, settings: &mut config::Settings) {
        if let Some(v) = &self.api_base {
            settings.api_base = v.clone();
        }
        if let Some(v) = self.poll_interval_secs {
            settings.poll_interval_secs = v;
        }
        if let Some(v) = self.request_timeout_secs {
            settings.request_timeout_secs = v;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(&args.config)?;
    args.apply(&mut settings);
    let client = HttpOrderClient::new(settings.client_config()?)
        .context("failed to build order client")?;
    info!(
        api_base = %client.api_base(),
        poll_interval_secs = settings.poll_interval_secs,
        "vendor console starting"
    );

    let (ui_tx, ui_rx) = crossbeam_channel::bounded(UI_EVENT_QUEUE);
    let renderer = thread::spawn(move || render::run(ui_rx));
    let handle =
        VendorOrdersController::spawn(Arc::new(client), settings.controller_settings(), ui_tx);

    println!("{HELP_TEXT}");
    if let Some(vendor_id) = &args.vendor_id {
        handle.set_vendor_id(vendor_id.as_str());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match commands::parse_command(&line) {
            Ok(Some(ConsoleCommand::Quit)) => break,
            Ok(Some(ConsoleCommand::Help)) => println!("{HELP_TEXT}"),
            Ok(Some(command)) => {
                if !commands::dispatch_command(&handle, command) {
                    break;
                }
            }
            Ok(None) => {}
            Err(err) => eprintln!("{err}"),
        }
    }

    let state = handle.shutdown().await?;
    renderer
        .join()
        .map_err(|_| anyhow!("render thread panicked"))?;
    info!(orders = state.orders.len(), "vendor console stopped");
    Ok(())
}
