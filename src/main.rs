use dotenvy::dotenv;
use expense_tracker::config::{database, settings};
use expense_tracker::errors::Result;
use expense_tracker::repositories::UnitOfWork;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = settings::load_app_configuration(CONFIG_PATH)
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    info!(token_issuer = %app_config.auth.issuer, "Configuration loaded");

    // 4. Connect and bring the schema up to date
    let db = database::create_connection(&app_config.database.url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Report what the store holds
    let uow = UnitOfWork::begin(&db).await?;
    let users = uow.users().count().await?;
    let categories = uow.categories().count().await?;
    let expenses = uow.expenses().count().await?;
    let budgets = uow.budgets().count().await?;
    drop(uow);

    info!(users, categories, expenses, budgets, "Expense tracker store is ready");
    Ok(())
}
