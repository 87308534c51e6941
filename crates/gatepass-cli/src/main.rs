//! Gatepass terminal, host build.
//!
//! Runs the real attendance controller against the real backend and chat
//! webhook, with the card reader replaced by operator input on stdin.
//! Configuration comes from `GATEPASS_*` environment variables (see
//! `gatepass_core::config`); logging is controlled by `RUST_LOG`.

mod console;
mod session;

use anyhow::Context;
use gatepass_core::TerminalConfig;
use gatepass_hardware::mock::MockRfid;
use gatepass_network::{
    ChatNotifier, DirectoryClient, DirectoryClientConfig, ScanReporter, ScanReporterConfig,
    WebhookConfig,
};
use gatepass_terminal::{AttendanceController, ControllerConfig, Peripherals, Services};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use console::{ConsoleBuzzer, HostLink};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .compact()
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let result = runtime.block_on(run());
    // The console task may still be blocked on stdin
    runtime.shutdown_background();
    result
}

async fn run() -> anyhow::Result<()> {
    info!("Gatepass {}", gatepass_core::VERSION);
    let config = TerminalConfig::from_env().context("invalid terminal configuration")?;

    let services = Services {
        directory: DirectoryClient::new(DirectoryClientConfig::new(config.directory_url()))
            .context("failed to build directory client")?,
        reporter: ScanReporter::new(ScanReporterConfig::new(config.report_url()))
            .context("failed to build scan reporter")?,
        chat: ChatNotifier::new(WebhookConfig::new(config.webhook_url.clone(), config.tts))
            .context("failed to build chat notifier")?,
    };

    let (reader, cards) = MockRfid::with_name("Console reader".to_string());
    let peripherals = Peripherals {
        reader,
        buzzer: ConsoleBuzzer,
        link: HostLink,
    };

    let mut controller = AttendanceController::new(
        peripherals,
        services,
        ControllerConfig::builder()
            .wifi_ssid(config.wifi_ssid.clone())
            .build(),
    );

    let (command_tx, mut commands) = mpsc::channel(8);
    tokio::spawn(console::read_console(command_tx));

    let load = controller.boot().await?;
    if !load.is_loaded() {
        error!("Terminal halted; restart required");
        loop {
            controller.tick().await;
        }
    }

    let decisions = session::serve(&mut controller, &cards, &mut commands).await?;
    info!("{} scans handled", decisions);

    info!("Console closed, shutting down");
    Ok(())
}
