use anyhow::Result;
use sqlx::{PgPool, postgres::PgPoolOptions};

pub mod memory;
pub mod models;
pub mod postgres;
pub mod repositories;
pub mod store;
pub mod utils;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{Store, UnitOfWork};

pub async fn init_database(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    log::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Migrations completed successfully");

    Ok(pool)
}
