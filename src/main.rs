//! Talkback - push-to-talk voice chat client
//!
//! Main entry point for the Talkback application.

use anyhow::Result;
use eframe::egui;
use talkback::session::{InteractionSession, SessionConfig};
use talkback::ui::TalkbackApp;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "talkback=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = SessionConfig::default();
    if let Ok(url) = std::env::var("TALKBACK_SERVER_URL") {
        config = config.with_server_url(url);
    }
    config.validate()?;

    info!(
        "Starting Talkback, server {}",
        config.transport.server_url
    );

    let session = InteractionSession::new(config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 640.0])
            .with_min_inner_size([360.0, 480.0])
            .with_title("Talkback"),
        ..Default::default()
    };

    eframe::run_native(
        "Talkback",
        options,
        Box::new(move |cc| Ok(Box::new(TalkbackApp::new(cc, session)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run UI: {}", e))?;

    Ok(())
}
