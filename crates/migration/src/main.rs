//! Standalone migration runner for operating on a database outside the app.

use sea_orm::Database;
use sea_orm_migration::prelude::*;

fn database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./tirelire.db?mode=rwc".to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let command = std::env::args().nth(1);
    let db = Database::connect(database_url()).await?;

    match command.as_deref() {
        Some("up") | None => migration::Migrator::up(&db, None).await?,
        Some("down") => migration::Migrator::down(&db, None).await?,
        Some("fresh") => migration::Migrator::fresh(&db).await?,
        Some("status") => {
            migration::Migrator::status(&db).await?;
        }
        Some(other) => {
            eprintln!("unknown command {other:?}; expected up, down, fresh, or status");
            std::process::exit(2);
        }
    }

    Ok(())
}
