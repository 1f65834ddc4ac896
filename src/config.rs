use dotenv::dotenv;
use std::env;

use crate::db::{ErrorKind, Result, ResultExt};

pub const DEFAULT_POOL_SIZE: u32 = 8;
const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub pool_size: u32,
}

impl Config {
    /// Reads `DATABASE_URL` and `DATABASE_POOL_SIZE`, after loading `.env`.
    pub fn from_env() -> Result<Config> {
        dotenv().ok();
        let database_url = env::var("DATABASE_URL").chain_err(|| "DATABASE_URL must be set")?;
        let pool_size = match env::var("DATABASE_POOL_SIZE") {
            Ok(raw) => parse_pool_size(&raw).ok_or(ErrorKind::InvalidConfig("DATABASE_POOL_SIZE", raw))?,
            Err(env::VarError::NotPresent) => DEFAULT_POOL_SIZE,
            Err(e) => return Err(e.into()),
        };
        Ok(Config::new(database_url, pool_size))
    }

    pub fn new<S: Into<String>>(database_url: S, pool_size: u32) -> Config {
        let database_url = database_url.into();
        let pool_size = if database_url == IN_MEMORY { 1 } else { pool_size };
        Config {
            database_url,
            pool_size,
        }
    }

    pub fn in_memory() -> Config {
        Config::new(IN_MEMORY, 1)
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_url == IN_MEMORY
    }
}

fn parse_pool_size(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|size| *size > 0)
}
