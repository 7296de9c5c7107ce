mod app;
mod backend;
mod command;
mod paths;
mod registry;
mod render;
mod settings;

use std::fs::File;
use std::time::{Duration, Instant};

use simplelog::{Config, LevelFilter, WriteLogger};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use umkm_grid::notify::NotifyCenter;

use crate::app::{App, Flow};
use crate::backend::Registry;
use crate::command::Command;
use crate::settings::ConsoleSettings;

/// Rows in the demo registry.
const SEED_ROWS: u32 = 57;

fn init_logging() {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        return;
    };
    match File::create(&path) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(LevelFilter::Debug, Config::default(), file) {
                eprintln!("Failed to initialize logger: {}", e);
            }
        }
        Err(e) => eprintln!("Failed to create log file {}: {}", path.display(), e),
    }
}

fn load_settings() -> ConsoleSettings {
    let Some(path) = paths::settings_file() else {
        return ConsoleSettings::default();
    };
    ConsoleSettings::load(&path).unwrap_or_else(|e| {
        log::warn!("[settings] {}: {}", path.display(), e);
        eprintln!("Ignoring settings file {}: {}", path.display(), e);
        ConsoleSettings::default()
    })
}

async fn run(app: &mut App) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    app.start().await;
    stdout.write_all(b"UMKM registry. Type `help` for commands.\n").await?;

    loop {
        app.prune(Instant::now());
        stdout.write_all(app.screen().as_bytes()).await?;
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                app.report(&e);
                continue;
            }
        };

        match app.handle(command).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Show(text)) => {
                stdout.write_all(text.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
            }
            Ok(Flow::Quit) => break,
            Err(e) => app.report(&e),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_logging();
    log::info!("umkm-console starting");

    let settings = load_settings();
    let registry = Registry::new(
        registry::seed(SEED_ROWS),
        Duration::from_millis(settings.latency_ms),
    );
    log::info!("{} businesses loaded", registry.len());
    let mut app = App::new(settings, registry, NotifyCenter::new());

    if let Err(e) = run(&mut app).await {
        eprintln!("Error: {}", e);
    }

    if let Some(path) = paths::settings_file() {
        if let Err(e) = app.settings().save(&path) {
            eprintln!("Failed to save settings: {}", e);
        }
    }
    log::info!("umkm-console stopped at {:?}", app.table().options());
}
