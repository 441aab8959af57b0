use anyhow::Result;
use clap::Parser;
use farmstead::app::{FarmServices, FixtureBundle};
use farmstead::config::Config;
use farmstead::server;
use farmstead::storage::open_storage;
use std::path::PathBuf;
use tracing::info;

/// Console-logging server without a config file, for local poking at the
/// GraphQL API.
#[derive(Parser)]
#[command(name = "graphql_server")]
#[command(about = "Lightweight GraphQL API server for farm records")]
#[command(version = "0.1.0")]
struct Cli {
    /// Port to run the server on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Use database storage instead of in-memory
    #[arg(long)]
    use_database: bool,

    /// Fixture bundle to import on startup
    #[arg(long)]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    let mut config = Config::default();
    config.server.port = cli.port;

    let storage = open_storage(&config, cli.use_database).await?;
    let services = FarmServices::new(storage);
    if let Some(path) = &cli.seed {
        FixtureBundle::load(path)?.import(&services.records).await?;
        info!("Seeded from {}", path.display());
    }

    println!("Server endpoints:");
    println!("   GraphQL API: http://localhost:{}/graphql", cli.port);
    println!("   GraphiQL UI: http://localhost:{}/graphiql", cli.port);
    println!("   Health check: http://localhost:{}/health", cli.port);

    server::start_server(&config.server, services).await
}
