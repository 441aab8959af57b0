use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use farmstead::app::{FarmServices, FixtureBundle};
use farmstead::config::{Config, DEFAULT_CONFIG_PATH};
use farmstead::logging::init_logging;
use farmstead::server;
use farmstead::storage::{open_storage, InMemoryStorage};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};

#[derive(Parser)]
#[command(name = "farmstead")]
#[command(about = "Farm record keeping: animals, lineage, products and infrastructure")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP + GraphQL server
    Serve {
        /// Port to run the server on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Use database storage instead of in-memory
        #[arg(long)]
        use_database: bool,

        /// Fixture bundle to import before serving
        #[arg(long)]
        seed: Option<PathBuf>,
    },
    /// Validate a fixture bundle without serving it
    Check {
        /// Fixture bundle (JSON)
        file: PathBuf,
    },
    /// Run database migrations
    #[cfg(feature = "db")]
    Migrate,
}

async fn serve(
    mut config: Config,
    port: Option<u16>,
    use_database: bool,
    seed: Option<PathBuf>,
) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    let storage = open_storage(&config, use_database).await?;
    let services = FarmServices::new(storage);

    let seed = seed.or_else(|| config.storage.seed_path.as_ref().map(PathBuf::from));
    if let Some(path) = seed {
        info!("Seeding from {}", path.display());
        let bundle = FixtureBundle::load(&path)?;
        bundle.import(&services.records).await?;
    }

    server::start_server(&config.server, services).await
}

async fn check(file: PathBuf) -> Result<()> {
    let bundle = FixtureBundle::load(&file)
        .with_context(|| format!("Could not load {}", file.display()))?;

    println!("Fixture bundle {}:", file.display());
    for (kind, count) in bundle.counts() {
        if count > 0 {
            println!("   {kind}: {count}");
        }
    }

    let dangling = bundle.dangling_references();
    for problem in &dangling {
        warn!("Dangling reference: {}", problem);
        println!("   dangling: {problem}");
    }

    let bad_mixes = bundle.invalid_breed_mixes();
    for problem in &bad_mixes {
        warn!("Invalid breed mix: {}", problem);
        println!("   breed mix: {problem}");
    }

    let services = FarmServices::new(Arc::new(InMemoryStorage::new()));
    bundle.import(&services.records).await?;
    let cycles = services.lineage.parentage_cycles().await?;
    for cycle in &cycles {
        let ids: Vec<String> = cycle.iter().map(|id| id.to_string()).collect();
        warn!("Parentage cycle: {}", ids.join(" -> "));
        println!("   cycle: {}", ids.join(" -> "));
    }

    if !dangling.is_empty() || !bad_mixes.is_empty() || !cycles.is_empty() {
        bail!(
            "{} dangling reference(s), {} invalid breed mix(es), {} parentage cycle(s)",
            dangling.len(),
            bad_mixes.len(),
            cycles.len()
        );
    }
    println!("No problems found");
    Ok(())
}

#[cfg(feature = "db")]
async fn migrate(config: &Config) -> Result<()> {
    let manager = farmstead::db::DatabaseManager::new(&config.database).await?;
    manager.run_migrations().await?;
    println!("Migrations applied");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::load_or_default(&cli.config)?;
    let _guard = init_logging(&config.logging)?;
    if !cli.config.exists() {
        warn!("Config file '{}' not found, using defaults", cli.config.display());
    }

    let outcome = match cli.command {
        Commands::Serve {
            port,
            use_database,
            seed,
        } => {
            serve(config, port, use_database, seed)
                .instrument(info_span!("serve"))
                .await
        }
        Commands::Check { file } => check(file).instrument(info_span!("check")).await,
        #[cfg(feature = "db")]
        Commands::Migrate => migrate(&config).instrument(info_span!("migrate")).await,
    };

    if let Err(e) = &outcome {
        error!("{:#}", e);
    }
    outcome
}
