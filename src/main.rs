use std::io;

use anyhow::{Context, Result};
use bookstore_inventory::{BookStore, Controller, StoreConfig};
use log::{info, LevelFilter};

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let store = BookStore::open(StoreConfig::default())
        .context("Error - could not connect to database")?;
    store
        .seed_defaults()
        .context("Error - could not seed default books")?;
    info!("book store ready");

    let outcome = {
        let stdin = io::stdin();
        let mut controller = Controller::new(&store, stdin.lock(), io::stdout());
        controller.run()
    };

    store.close()?;
    outcome
}
