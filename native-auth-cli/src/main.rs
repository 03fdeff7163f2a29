//! Native auth CLI
//!
//! Inspects file-backed native auth token caches without signing anything.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Args, Parser, Subcommand};
use colored::*;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use native_auth_cache::{CacheStatus, IssuerConfig, TokenIssuer};
use native_auth_core::constants::{
    API_URL_MAINNET, ENV_API_URL, ENV_EXPIRY_SECONDS, ENV_HOST, ENV_PRIVATE_KEY, ENV_SHARD,
    EXPIRY_SECONDS_DEFAULT, FRESHNESS_MARGIN_SECONDS, SHARD_UNSPECIFIED,
};
use native_auth_core::{CacheKey, RawParameters, RequestParameters};
use native_auth_store::FileStore;

/// Native auth token cache tool
#[derive(Parser)]
#[command(name = "native-auth")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every cached token in a store file
    Inspect {
        /// Path to the token store file
        #[arg(short, long, env = "NATIVE_AUTH_STORE")]
        store: PathBuf,
        /// Seconds of validity a token needs left to count as fresh
        #[arg(long, default_value_t = FRESHNESS_MARGIN_SECONDS)]
        margin: i64,
    },

    /// Check whether a fresh token is cached for the given parameters
    Check {
        /// Path to the token store file
        #[arg(short, long, env = "NATIVE_AUTH_STORE")]
        store: PathBuf,
        /// Seconds of validity a token needs left to count as fresh
        #[arg(long, default_value_t = FRESHNESS_MARGIN_SECONDS)]
        margin: i64,
        #[command(flatten)]
        params: ParamArgs,
    },
}

/// Signing parameters, mirroring the host form.
#[derive(Args)]
struct ParamArgs {
    /// Origin the token is issued for
    #[arg(long, env = ENV_HOST)]
    host: Option<String>,
    /// Network API URL or name (devnet, testnet, mainnet)
    #[arg(long, env = ENV_API_URL, default_value = API_URL_MAINNET)]
    api_url: String,
    /// Shard id, or '-' for unspecified
    #[arg(long, env = ENV_SHARD, default_value = SHARD_UNSPECIFIED, allow_hyphen_values = true)]
    shard: String,
    /// Token lifetime in seconds
    #[arg(long, env = ENV_EXPIRY_SECONDS, default_value_t = EXPIRY_SECONDS_DEFAULT)]
    expiry_seconds: u64,
    /// File holding the PEM private key (defaults to $NATIVE_AUTH_PRIVATE_KEY)
    #[arg(long)]
    private_key_file: Option<PathBuf>,
}

impl ParamArgs {
    fn into_raw(self) -> Result<RawParameters> {
        let private_key = match &self.private_key_file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read private key from {}", path.display()))?,
            None => std::env::var(ENV_PRIVATE_KEY).unwrap_or_default(),
        };

        let mut raw = RawParameters::new(self.host.unwrap_or_default(), private_key);
        raw.api_url = self.api_url;
        raw.shard = self.shard;
        raw.expiry_seconds = self.expiry_seconds;
        Ok(raw)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json);

    match cli.command {
        Commands::Inspect { store, margin } => cmd_inspect(&store, margin).await,
        Commands::Check { store, margin, params } => cmd_check(&store, margin, params).await,
    }
}

fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        "native_auth=debug,info"
    } else {
        "native_auth=info,warn"
    };

    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()));

    // Logs go to stderr so command output stays pipeable
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// List cached tokens
async fn cmd_inspect(path: &Path, margin: i64) -> Result<ExitCode> {
    let store = open_store(path).await?;
    let config = IssuerConfig::default().with_freshness_margin(margin);
    let now = Utc::now();

    println!("{} {}", "🔎 Token store:".cyan().bold(), path.display());

    let rows = classify_entries(store.entries(), now, &config);
    if rows.is_empty() {
        println!("\n{}", "Store is empty.".yellow());
        return Ok(ExitCode::SUCCESS);
    }

    println!();
    for (key, status) in &rows {
        println!("   {}  {}", key.to_string().dimmed(), describe(status, now));
    }

    let summary = Summary::of(&rows);
    println!(
        "\n   {} fresh, {} stale, {} corrupt",
        summary.fresh.to_string().green(),
        summary.stale.to_string().yellow(),
        summary.corrupt.to_string().red()
    );

    Ok(ExitCode::SUCCESS)
}

/// Check one parameter set
async fn cmd_check(path: &Path, margin: i64, args: ParamArgs) -> Result<ExitCode> {
    let params = RequestParameters::try_from(args.into_raw()?).context("Invalid parameters")?;
    let store = open_store(path).await?;
    let config = IssuerConfig::default().with_freshness_margin(margin);

    let status = check_status(store, &params, config).await;
    let now = Utc::now();

    println!(
        "{} {} on {} (shard {})",
        "🔑 Token for".cyan().bold(),
        params.host(),
        params.network().name(),
        params.shard()
    );
    println!("   {}", describe(&status, now));

    if status.is_fresh() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Looks up the cached token through a signer-less issuer.
async fn check_status(store: FileStore, params: &RequestParameters, config: IssuerConfig) -> CacheStatus {
    debug!(key = %CacheKey::derive(params), "Looking up cached token");
    TokenIssuer::new(store, ()).with_config(config).lookup(params).await
}

async fn open_store(path: &Path) -> Result<FileStore> {
    FileStore::new(path)
        .await
        .with_context(|| format!("Failed to open token store {}", path.display()))
}

/// Classifies every stored entry, soonest expiry first, corrupt entries last.
fn classify_entries(
    entries: Vec<(String, String)>,
    now: DateTime<Utc>,
    config: &IssuerConfig,
) -> Vec<(CacheKey, CacheStatus)> {
    let mut rows: Vec<(CacheKey, CacheStatus)> = entries
        .into_iter()
        .map(|(key, value)| {
            let status = CacheStatus::classify(Some(&value), now, config);
            (CacheKey::from_raw(key), status)
        })
        .collect();

    rows.sort_by_key(|(_, status)| match status {
        CacheStatus::Fresh { expiry_date } | CacheStatus::Stale { expiry_date } => (0, *expiry_date),
        CacheStatus::Missing | CacheStatus::Corrupt => (1, DateTime::<Utc>::MAX_UTC),
    });

    rows
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    fresh: usize,
    stale: usize,
    corrupt: usize,
}

impl Summary {
    fn of(rows: &[(CacheKey, CacheStatus)]) -> Self {
        let mut summary = Summary::default();
        for (_, status) in rows {
            match status {
                CacheStatus::Fresh { .. } => summary.fresh += 1,
                CacheStatus::Stale { .. } => summary.stale += 1,
                CacheStatus::Corrupt | CacheStatus::Missing => summary.corrupt += 1,
            }
        }
        summary
    }
}

fn describe(status: &CacheStatus, now: DateTime<Utc>) -> String {
    match status {
        CacheStatus::Missing => format!("{}", "missing".red()),
        CacheStatus::Corrupt => format!("{}", "corrupt".red()),
        CacheStatus::Fresh { expiry_date } => format!(
            "{} until {} ({} left)",
            "fresh".green(),
            expiry_date.to_rfc3339(),
            format_remaining(*expiry_date - now)
        ),
        CacheStatus::Stale { expiry_date } if *expiry_date <= now => {
            format!("{} since {}", "expired".yellow(), expiry_date.to_rfc3339())
        }
        CacheStatus::Stale { expiry_date } => format!(
            "{} at {} ({} left)",
            "expiring".yellow(),
            expiry_date.to_rfc3339(),
            format_remaining(*expiry_date - now)
        ),
    }
}

fn format_remaining(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
