//! Resets the configured database and loads a dataset into it.
//!
//! Usage: `seed [DATA_DIR]`. Without a directory the bundled test data is used.

use error_chain::ChainedError;
use nc_news::config::Config;
use nc_news::db::seed::{seed, SeedData};
use nc_news::{db, logging};
use std::{env, process};
use tracing::{error, info};

fn run() -> db::Result<()> {
    let config = Config::from_env()?;
    let data = match env::args().nth(1) {
        Some(dir) => {
            info!(%dir, "loading seed data");
            SeedData::from_dir(dir)?
        }
        None => SeedData::test()?,
    };
    let pool = db::connect(&config)?;
    seed(&mut *pool.get()?, &data)?;
    Ok(())
}

fn main() {
    logging::init();
    if let Err(e) = run() {
        error!("seeding failed: {}", e.display_chain());
        process::exit(1);
    }
}
