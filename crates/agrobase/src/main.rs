use std::path::PathBuf;

use agrobase_core::company::create_company;
use agrobase_core::config::AppConfig;
use agrobase_core::db;
use agrobase_core::memory::MemoryStore;
use agrobase_core::plan::seed_plan;
use agrobase_core::postgres::PgTenantStore;
use agrobase_core::rows::BatchKind;
use agrobase_core::seed::{run_seed, SeedOutcome};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table as TextTable;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(author, version, about = "Agrobase tenant tooling", long_about = None)]
struct Cli {
    /// Optional TOML config file; environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run database migrations
    Migrate,
    /// Create a company and seed its starter data
    CreateCompany(CreateCompanyArgs),
    /// Seed starter data for an existing tenant
    SeedTenant(SeedTenantArgs),
    /// Print the seed layer plan
    Plan,
}

#[derive(Args, Debug)]
struct CreateCompanyArgs {
    /// Display name of the company
    #[arg(long)]
    name: String,
    /// Skip running migrations first
    #[arg(long)]
    skip_migrations: bool,
}

#[derive(Args, Debug)]
struct SeedTenantArgs {
    /// Tenant (company) id to seed
    #[arg(long)]
    tenant_id: Uuid,
    /// Seed into an in-memory store and print the report instead of writing to Postgres
    #[arg(long)]
    dry_run: bool,
    /// Skip running migrations first
    #[arg(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Migrate => {
            let config = load_config(cli.config)?;
            let pool = db::connect(&config.database).await?;
            db::run_migrations(&pool).await?;
            info!("Database migrations applied");
            Ok(())
        }
        Command::CreateCompany(args) => {
            let config = load_config(cli.config)?;
            let store = connect_store(&config, args.skip_migrations).await?;
            let company = create_company(&store, &args.name).await?;
            println!("{}", serde_json::to_string_pretty(&company)?);
            Ok(())
        }
        Command::SeedTenant(args) => handle_seed_tenant(cli.config, args).await,
        Command::Plan => print_plan(),
    }
}

async fn handle_seed_tenant(config: Option<PathBuf>, args: SeedTenantArgs) -> Result<()> {
    if args.dry_run {
        let store = MemoryStore::new();
        return report(run_seed(&store, args.tenant_id).await);
    }

    let config = load_config(config)?;
    let store = connect_store(&config, args.skip_migrations).await?;
    report(run_seed(&store, args.tenant_id).await)
}

fn report(outcome: SeedOutcome) -> Result<()> {
    match outcome {
        SeedOutcome::Seeded(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        SeedOutcome::AlreadySeeded { existing } => {
            println!("tenant already seeded ({existing} resource categories)");
            Ok(())
        }
        SeedOutcome::FailedAt { stage, cause } => {
            Err(anyhow::Error::new(cause).context(format!("seeding failed at {stage}")))
        }
    }
}

fn print_plan() -> Result<()> {
    let plan = seed_plan()?;
    let mut table = TextTable::new();
    table.set_header(vec!["Layer", "Step", "Writes"]);
    for (offset, steps) in plan.layers().iter().enumerate() {
        for step in steps {
            let writes = step
                .writes()
                .iter()
                .map(|(target, kind)| match kind {
                    BatchKind::Insert => format!("insert {target}"),
                    BatchKind::Link => format!("link {target}"),
                })
                .collect::<Vec<_>>()
                .join(", ");
            table.add_row(vec![(offset + 1).to_string(), step.to_string(), writes]);
        }
    }
    println!("{table}");
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<AppConfig> {
    AppConfig::load(path.as_deref()).context("failed to load configuration")
}

async fn connect_store(config: &AppConfig, skip_migrations: bool) -> Result<PgTenantStore> {
    let pool = db::connect(&config.database).await?;
    if skip_migrations {
        warn!("Skipping migrations at user request");
    } else {
        db::run_migrations(&pool).await?;
    }
    Ok(PgTenantStore::new(pool))
}
