use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use quokka_agent::{is_generate_config_action, ConfigGenerator, GlmClient, GENERATE_CONFIG_ACTION};
use quokka_pool::{env, PoolMetric, PoolMetricsProvider, PoolProviderConfig, TtlCache};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "info,quokka_pool=debug,quokka_agent=debug";

/// Raydium CLMM pool metrics and ladder-step liquidity configs.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch metrics from the pool-info endpoint.
    PoolInfo {
        /// Pool to query, defaults to POOL_ID.
        #[arg(long)]
        pool_id: Option<String>,
        /// Print the metric as JSON instead of the text report.
        #[arg(long)]
        json: bool,
    },
    /// Fetch metrics from the dynamic-info endpoint.
    DynamicInfo {
        #[arg(long)]
        pool_id: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Print the text report, degrading to a fixed message on failure.
    Report {
        #[arg(long)]
        pool_id: Option<String>,
    },
    /// Generate a ladder-step liquidity config from a wallet description.
    GenerateConfig {
        /// Free-text description of the tokens held.
        #[arg(long, short)]
        message: String,
        #[arg(long)]
        pool_id: Option<String>,
        /// Action name, any alias of the config action is accepted.
        #[arg(long, default_value = GENERATE_CONFIG_ACTION)]
        action: String,
    },
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_new(env::logging::rust_log_filter(DEFAULT_LOG_FILTER))
        .context("Invalid RUST_LOG filter")?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("Failed to set global default tracing subscriber")?;
    Ok(())
}

fn print_metric(provider: &PoolMetricsProvider, metric: &PoolMetric, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(metric)?);
    } else {
        println!("{}", provider.format_pool_info(metric));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG may come from .env, so load it first and log once tracing is up
    let dotenv = env::load_dotenv();
    init_tracing()?;
    match dotenv {
        Ok(Some(path)) => debug!(path = %path.display(), "Loaded .env file"),
        Ok(None) => debug!("No .env file found"),
        Err(e) => warn!(error = %e, "Failed to load .env file"),
    }

    let cli = Cli::parse();

    let config = PoolProviderConfig::from_env();
    let cache = Arc::new(TtlCache::new(config.cache_ttl));
    let provider = Arc::new(
        PoolMetricsProvider::from_config(config, cache)
            .context("Failed to create pool metrics provider")?,
    );
    let default_pool = provider.config().default_pool_id.clone();

    match cli.command {
        Commands::PoolInfo { pool_id, json } => {
            let pool_id = pool_id.unwrap_or(default_pool);
            let metric = provider
                .get_pool_info(&pool_id)
                .await
                .with_context(|| format!("Failed to fetch pool info for {pool_id}"))?;
            print_metric(&provider, &metric, json)?;
        }
        Commands::DynamicInfo { pool_id, json } => {
            let pool_id = pool_id.unwrap_or(default_pool);
            let metric = provider
                .get_dynamic_pool_info(&pool_id)
                .await
                .with_context(|| format!("Failed to fetch dynamic info for {pool_id}"))?;
            print_metric(&provider, &metric, json)?;
        }
        Commands::Report { pool_id } => {
            let pool_id = pool_id.unwrap_or(default_pool);
            println!("{}", provider.get_formatted_pool_report(&pool_id).await);
        }
        Commands::GenerateConfig {
            message,
            pool_id,
            action,
        } => {
            if !is_generate_config_action(&action) {
                bail!("Unknown action '{action}', expected {GENERATE_CONFIG_ACTION}");
            }
            info!(%action, "Starting generate raydium clmm config");

            let llm = Arc::new(GlmClient::from_env()?);
            let generator = ConfigGenerator::new(Arc::clone(&provider), llm)?;
            let generated = match pool_id {
                Some(pool_id) => generator.generate_for_pool(&pool_id, &message).await?,
                None => generator.generate(&message).await?,
            };

            println!("{}", generated.text);
            println!("{}", serde_json::to_string_pretty(&generated)?);
        }
    }

    Ok(())
}
