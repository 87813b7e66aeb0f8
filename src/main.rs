//! Billed CLI
//!
//! Boots the router over a headless document and prints what a page renders:
//! - Navigate to a path and print the resulting document
//! - List the bills the configured store returns
//! - Print a default configuration file

use anyhow::Context;
use billed::config::{generate_default_config, Config, StoreBackend};
use billed::containers::sort_most_recent_first;
use billed::dom::{Document, Element};
use billed::format::best_effort;
use billed::model::Session;
use billed::router::{Router, ROOT_ID};
use billed::session::{FileStorage, SessionProvider, StaticSession, StorageSession};
use billed::store::{HttpStore, MemoryStore, RemoteStore};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "billed")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Expense reports: route, render and sync bills")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/billed/config.toml or ./billed.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Act as this employee instead of the persisted session
    #[arg(long, global = true)]
    pub email: Option<String>,

    /// With --email, act as an administrator
    #[arg(long, global = true)]
    pub admin: bool,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Navigate to a path and print the rendered document
    Navigate {
        /// Route path, e.g. "#employee/bills"; the session's landing page if omitted
        path: Option<String>,
    },

    /// List bills, most recent first
    Bills,

    /// Print a default configuration file
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config = cli.command {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config);

    tracing::info!("Billed v{}", env!("CARGO_PKG_VERSION"));

    let store = build_store(&config)?;
    let session = build_session(&cli, &config);

    match cli.command {
        Commands::Navigate { path } => navigate(store, session, path, &config).await,
        Commands::Bills => list_bills(store, &cli.format).await,
        Commands::Config => Ok(()),
    }
}

/// Load the config with a stderr subscriber in place, so events raised while
/// loading are reported before the configured subscriber exists.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "billed=info".into());
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::with_default(bootstrap, || match path {
        Some(path) => Config::load_with_env(path).context("Failed to load config"),
        None => Ok(Config::load_default()),
    })
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("billed={}", config.logging.level).into());
    let json = config.logging.format == "json";

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn build_store(config: &Config) -> anyhow::Result<Arc<dyn RemoteStore>> {
    match config.store.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory store with sample bills");
            Ok(Arc::new(MemoryStore::with_fixtures()))
        }
        StoreBackend::Http => {
            tracing::info!("Using REST store at {}", config.store.base_url);
            let store = HttpStore::new(config.store.http()).context("Failed to create HTTP store")?;
            Ok(Arc::new(store))
        }
    }
}

fn build_session(cli: &Cli, config: &Config) -> Arc<dyn SessionProvider> {
    match &cli.email {
        Some(email) if cli.admin => Arc::new(StaticSession::new(Session::admin(email.clone()))),
        Some(email) => Arc::new(StaticSession::new(Session::employee(email.clone()))),
        None => {
            let storage = FileStorage::new(config.session.storage_path());
            tracing::debug!(path = ?storage.path(), "Reading persisted session");
            Arc::new(StorageSession::with_key(Arc::new(storage), config.session.key.clone()))
        }
    }
}

async fn navigate(
    store: Arc<dyn RemoteStore>,
    session: Arc<dyn SessionProvider>,
    path: Option<String>,
    config: &Config,
) -> anyhow::Result<()> {
    let document = Document::new();
    document.append_to_body(Element::new("div").id(ROOT_ID));

    let router = Router::new(document.clone(), Some(store), session)?;
    let path = path
        .or_else(|| config.app.initial_path.clone())
        .unwrap_or_else(|| router.landing_path().to_string());

    router.navigate(&path).settled().await;

    tracing::info!(state = ?router.state(), "Navigation settled");
    println!("{}", document.to_html());
    Ok(())
}

async fn list_bills(store: Arc<dyn RemoteStore>, format: &str) -> anyhow::Result<()> {
    let mut bills = store.bills().list().await.context("Failed to fetch bills")?;
    sort_most_recent_first(&mut bills);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&bills)?);
        return Ok(());
    }

    println!(
        "{:<22} {:<12} {:<20} {:<24} {:>10} {:<12}",
        "ID", "DATE", "TYPE", "NAME", "AMOUNT", "STATUS"
    );
    println!("{}", "-".repeat(104));
    for display in bills.into_iter().map(best_effort) {
        let bill = &display.bill;
        println!(
            "{:<22} {:<12} {:<20} {:<24} {:>10.2} {:<12}",
            bill.id,
            display.date,
            bill.expense_type.label(),
            bill.name,
            bill.amount,
            display.status
        );
    }
    Ok(())
}
