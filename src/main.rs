mod country;
mod observer;
mod presence;
mod render;
mod resolver;
mod state;
mod sync;
mod types;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};

use country::{CountryCodeProvider, LocaleCountry};
use observer::{MprisObserver, NoPlayer, PlaybackObserver};
use presence::LogPublisher;
use resolver::MetadataResolver;
use state::{create_state, SharedState};
use sync::PresenceSynchronizer;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting TIDAL presence sync");

    let country_code = std::env::var("TIDAL_COUNTRY")
        .ok()
        .filter(|code| !code.is_empty())
        .unwrap_or_else(|| LocaleCountry.get());
    log::info!("Using country code {}", country_code);

    let state = create_state();

    // Failure to initialize the presence channel is the only fatal startup
    // condition.
    let publisher = LogPublisher::connect().context("Failed to initialize presence channel")?;

    let player_fragment =
        std::env::var("TIDAL_PRESENCE_PLAYER").unwrap_or_else(|_| "tidal".to_string());
    let observer: Box<dyn PlaybackObserver> = match MprisObserver::connect(&player_fragment) {
        Ok(observer) => {
            log::info!("Watching MPRIS players matching '{}'", player_fragment);
            Box::new(observer)
        }
        Err(e) => {
            // Observer faults degrade to the waiting state instead of
            // aborting.
            log::warn!("MPRIS unavailable, presence will stay idle: {:#}", e);
            Box::new(NoPlayer)
        }
    };

    let resolver =
        MetadataResolver::new(country_code).context("Failed to build the search client")?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            log::info!("Received interrupt signal, shutting down...");
            shutdown.store(true, Ordering::SeqCst);
        })
        .context("Failed to set Ctrl+C handler")?;
    }

    // Control surface: stdin commands stand in for the original tray menu.
    {
        let state = state.clone();
        let shutdown = shutdown.clone();
        thread::spawn(move || control_loop(&state, &shutdown));
    }

    let mut synchronizer = PresenceSynchronizer::new(
        observer,
        Box::new(resolver),
        Box::new(publisher),
        state,
    );
    // Runs until shutdown flips, then issues the final presence clear.
    synchronizer.run(&shutdown);

    log::info!("Goodbye");
    Ok(())
}

/// Minimal control surface: `toggle` flips presence publishing on or off,
/// `status` prints the current status line, `quit` stops the process.
fn control_loop(state: &SharedState, shutdown: &AtomicBool) {
    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        line.clear();
        match stdin.read_line(&mut line) {
            // stdin closed; keep the sync loop running until Ctrl+C
            Ok(0) => break,
            Ok(_) => match line.trim() {
                "toggle" => {
                    let mut state_guard = state.write();
                    state_guard.presence_active = !state_guard.presence_active;
                    if state_guard.presence_active {
                        println!("presence enabled");
                    } else {
                        println!("presence disabled (type 'toggle' to re-enable)");
                    }
                }
                "status" => println!("Status: {}", state.read().status),
                "quit" | "exit" => {
                    shutdown.store(true, Ordering::SeqCst);
                    break;
                }
                "" => {}
                other => println!("unknown command '{}': expected toggle, status or quit", other),
            },
            Err(e) => {
                log::error!("Control surface read failed: {}", e);
                break;
            }
        }
    }
}
