use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::ConnectionManager;
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use rocket::http::Status;
use rocket::outcome::{try_outcome, Outcome};
use rocket::request::{self, FromRequest, Request};
use rocket::State;
use std::ops::{Deref, DerefMut};
use tracing::{error, info};

use crate::config::Config;

pub mod schema;
pub mod seed;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

// An alias to the type for a pool of Diesel SQLite connections.
pub type Pool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub struct DbConnection(pub r2d2::PooledConnection<ConnectionManager<SqliteConnection>>);

error_chain! {
    foreign_links {
        Var(::std::env::VarError);
        Io(::std::io::Error);
        Json(::serde_json::Error);
        R2D2(r2d2::Error);
        Diesel(DieselError);
    }

    errors {
        Migration(reason: String) {
            description("failed to run database migrations")
            display("failed to run database migrations: {}", reason)
        }
        InvalidConfig(key: &'static str, value: String) {
            description("invalid configuration value")
            display("invalid value for {}: {:?}", key, value)
        }
    }
}

/// SQLite leaves foreign keys off unless asked, per connection.
#[derive(Debug)]
struct SqlitePragmas;

impl r2d2::CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> ::std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Attempts to retrieve a single connection from the managed database pool. If
/// no pool is currently managed, or no connection can be checked out in time,
/// fails with an `InternalServerError` status.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for DbConnection {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, ()> {
        let pool = try_outcome!(request.guard::<&State<Pool>>().await);
        match pool.get() {
            Ok(conn) => Outcome::Success(DbConnection(conn)),
            Err(e) => {
                error!(error = %e, "could not check out a database connection");
                Outcome::Error((Status::InternalServerError, ()))
            }
        }
    }
}

// For the convenience of using a &mut DbConnection as a &mut SqliteConnection.
impl Deref for DbConnection {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DbConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

pub fn init_pool(config: &Config) -> Result<Pool> {
    let manager = ConnectionManager::<SqliteConnection>::new(config.database_url.as_str());
    let mut builder = Pool::builder()
        .max_size(config.pool_size)
        .connection_customizer(Box::new(SqlitePragmas));
    if config.is_in_memory() {
        // every new connection to :memory: is a brand new, empty database
        builder = builder.idle_timeout(None).max_lifetime(None);
    }
    let pool = builder.build(manager)?;
    info!(url = %config.database_url, size = config.pool_size, "database pool ready");
    Ok(pool)
}

pub fn run_migrations(connection: &mut SqliteConnection) -> Result<()> {
    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| ErrorKind::Migration(e.to_string()))?;
    for version in applied {
        info!(%version, "applied migration");
    }
    Ok(())
}

/// A pool whose database has every migration applied.
pub fn connect(config: &Config) -> Result<Pool> {
    let pool = init_pool(config)?;
    run_migrations(&mut *pool.get()?)?;
    Ok(pool)
}

/// Single-row lookup by primary key.
pub trait FindByKey
where
    Self: Sized,
{
    type Key: ?Sized;

    fn find_by_key(key: &Self::Key, connection: &mut SqliteConnection) -> QueryResult<Option<Self>>;

    fn exists(key: &Self::Key, connection: &mut SqliteConnection) -> QueryResult<bool> {
        Self::find_by_key(key, connection).map(|found| found.is_some())
    }
}
