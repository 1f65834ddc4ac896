use error_chain::ChainedError;
use nc_news::config::Config;
use nc_news::{db, logging};
use std::process;
use tracing::error;

#[rocket::main]
async fn main() {
    logging::init();

    let pool = match Config::from_env().and_then(|config| db::connect(&config)) {
        Ok(pool) => pool,
        Err(e) => {
            error!("failed to set up the database: {}", e.display_chain());
            process::exit(1);
        }
    };

    if let Err(e) = nc_news::rocket(pool).launch().await {
        error!(error = %e, "server stopped");
        process::exit(1);
    }
}
