mod commands;
mod config;
mod db;
mod error;
mod handlers;
mod memory;
mod models;
mod tasks;
mod toast;
mod view;
mod voting;

use commands::{Command, HELP};
use config::Config;
use db::Database;
use error::AppError;
use handlers::App;
use log::{debug, error, info};
use memory::FileVoteMemory;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

fn print_update(app: &mut App) {
    for notification in app.take_notifications() {
        println!("{}", notification.render());
    }
    println!("\n{}", app.render());
}

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    // Initialize database
    let database = match Database::new(&config.database_url).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return;
        }
    };

    let memory = match FileVoteMemory::open(&config.memory_path) {
        Ok(memory) => memory,
        Err(e) => {
            error!("Failed to open local vote memory: {}", e);
            return;
        }
    };
    info!("Remembering this client's vote in {}", memory.path().display());

    // Picks up votes written by other clients
    let watcher = tokio::spawn(tasks::change_watcher::watch_tally_changes(
        Arc::clone(&database),
        config.poll_interval,
    ));

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut app = App::new(database, Box::new(memory));
    app.mount(events_tx).await;
    debug!("Listening for tally changes: {}", app.is_subscribed());

    println!("{}\n", HELP);
    print_update(&mut app);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                };

                let command = match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };

                match app.handle_command(command).await {
                    Ok(()) => {}
                    Err(AppError::Wizard(e)) => println!("{}", e),
                    // Already surfaced as a notification.
                    Err(e) => debug!("Command failed: {}", e),
                }
                print_update(&mut app);
            }
            Some(event) = events_rx.recv() => {
                app.handle_event(event).await;
                print_update(&mut app);
            }
        }
    }

    app.unmount();
    watcher.abort();
    info!("Goodbye");
}
