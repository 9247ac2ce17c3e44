mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::app::{PersistedDesktopSettings, SETTINGS_STORAGE_KEY};
use crate::ui::{DesktopGuiApp, StartupConfig};

/// Desktop client for the NotesDesk notes-sharing service.
#[derive(Debug, Parser)]
#[command(name = "notesdesk", version, about)]
struct Cli {
    /// Pre-fill the server URL on the connect screen
    /// (otherwise the last used URL, or http://127.0.0.1:5000).
    #[arg(long)]
    server_url: Option<String>,

    /// Pre-fill the email address on the connect screen.
    #[arg(long)]
    email: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();
    let startup = StartupConfig {
        server_url: cli.server_url,
        email: cli.email,
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("NotesDesk")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([980.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "NotesDesk",
        options,
        Box::new(|cc| {
            let persisted_settings = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedDesktopSettings>(&text).ok())
            });
            Ok(Box::new(DesktopGuiApp::new(
                cmd_tx,
                ui_rx,
                persisted_settings,
                startup,
            )))
        }),
    )
}
