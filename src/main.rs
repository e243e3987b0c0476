//! PTSP WhatsApp Bot
//!
//! Main application entry point

use std::path::PathBuf;
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use ptsp_bot::{
    config::Settings,
    database::{create_pool, run_migrations, DatabaseService},
    models::{AdminRole, CatalogImport, CreateAdminRequest},
    services::ServiceFactory,
    utils::{helpers::generate_random_string, logging},
    web::{build_router, AppState},
};

#[derive(Parser)]
#[command(name = "ptsp-bot")]
#[command(version, about = "WhatsApp service information bot and admin API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run migrations and start the HTTP server (default)
    Serve,
    /// Apply database migrations and exit
    Migrate,
    /// Create an admin account
    CreateAdmin {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: Option<String>,
        /// `super_admin` or `admin`
        #[arg(long, default_value = "super_admin")]
        role: String,
    },
    /// Upsert categories and services from a JSON catalog file
    ImportCatalog {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let mut settings = Settings::new().context("Failed to load configuration")?;

    // Logging first so validation warnings are not lost; the guard flushes the log file on exit
    let _log_guard = logging::init_and_validate(&settings)?;

    if settings.admin.session_secret.is_empty() {
        warn!("SECRET_KEY not set, generating a random session secret; admin sessions will not survive a restart");
        settings.admin.session_secret = generate_random_string(48);
    }

    // Initialize database connection
    info!("Connecting to database...");
    let pool = create_pool(&settings.database).await?;

    info!("Running database migrations...");
    run_migrations(&pool).await?;

    let services = ServiceFactory::new(DatabaseService::new(pool), &settings)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(services, settings).await,
        Commands::Migrate => {
            info!("Migrations applied");
            Ok(())
        }
        Commands::CreateAdmin {
            username,
            password,
            email,
            role,
        } => {
            let Some(role) = AdminRole::parse(&role) else {
                bail!("Unknown role {}, expected super_admin or admin", role);
            };
            let request = CreateAdminRequest {
                username,
                password,
                email,
                role,
                is_active: true,
            };
            let admin = services.admin_service.register(&request).await?;
            info!(admin_id = admin.id, username = %admin.username, role = %admin.role, "Admin account created");
            println!("Admin {} ({}) created", admin.username, admin.role);
            Ok(())
        }
        Commands::ImportCatalog { file } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let catalog: CatalogImport = serde_json::from_str(&content)
                .with_context(|| format!("Invalid catalog file {}", file.display()))?;

            let summary = services.catalog_service.import(&catalog).await?;
            println!(
                "Imported {} categories and {} services from {}",
                summary.kategori,
                summary.layanan,
                file.display()
            );
            Ok(())
        }
    }
}

async fn serve(services: ServiceFactory, settings: Settings) -> anyhow::Result<()> {
    if services.db.admins.count().await? == 0 {
        warn!("No admin account exists yet; create one with `ptsp-bot create-admin`");
    }
    if !services.db.catalog.has_catalog().await? {
        warn!("Service catalog is empty; load one with `ptsp-bot import-catalog <file>`");
    }
    if !settings.whatsapp_configured() {
        warn!("WHATSAPP_TOKEN or PHONE_NUMBER_ID missing, replies will be logged as failed");
    }

    let address = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    let app = build_router(AppState::new(services, settings));

    info!("{} listening on {}", ptsp_bot::info(), address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("PTSP bot has been shut down.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
