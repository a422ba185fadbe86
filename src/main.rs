use dotenvy::dotenv;
use order_desk::applog::ActionLog;
use order_desk::errors::Result;
use order_desk::{config, db};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

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

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()?;
    info!("Successfully processed application configuration.");

    // 4. Initialize database (schema before anything else)
    let db_pool = db::init_db(&app_config.database_path)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Open the user-facing action log and record the launch
    let action_log = ActionLog::open(&app_config.action_log_path)
        .inspect_err(|e| error!("Failed to open action log: {}", e))?;
    action_log.log("Application started.")?;

    // 6. Report where things stand before any screen mounts on top
    let (year, month) = db::current_month();
    let stats = db::dashboard_stats(&db_pool, year, month)
        .await
        .inspect_err(|e| error!("Failed to compute dashboard stats: {}", e))?;
    info!(
        "{} customers on file; {} orders in {:04}-{:02} for {:.2} (avg {:.2}).",
        stats.total_customers,
        stats.orders_this_month,
        year,
        month,
        stats.revenue_this_month,
        stats.average_order_value
    );

    Ok(())
}
