use std::path::PathBuf;

use access_gate::{AccessGate, GateConfig};
use anyhow::{Context, Result};
use catalog::OrderCatalog;
use clap::{Parser, Subcommand};
use query::{run_query, QueryState};
use server_api::identity::mint_session_token;
use shared::{
    domain::{format_order_date, SortField},
    protocol::SessionProfile,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    /// Order catalog in TOML; the bundled sample set when omitted.
    #[arg(long)]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a search/filter/sort over the catalog.
    Query {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        direction: Option<String>,
        /// Simulate header clicks, applied in order after the other options.
        #[arg(long = "click")]
        clicks: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Load and validate the catalog.
    Validate,
    /// Show what the access gate does with a path.
    CheckRoute {
        path: String,
        #[arg(long)]
        session: bool,
        #[arg(long = "public-path")]
        public_paths: Vec<String>,
        #[arg(long = "bypass")]
        bypass_patterns: Vec<String>,
    },
    /// Mint a development session token.
    MintSession {
        #[arg(long, env = "NEXTAUTH_SECRET")]
        secret: String,
        #[arg(long, default_value = "dev-user")]
        subject: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, default_value_t = 3600)]
        ttl_seconds: i64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Query {
            search,
            status,
            sort,
            direction,
            clicks,
            json,
        } => {
            let catalog = open_catalog(cli.catalog.as_deref())?;
            let mut state = QueryState::parse(
                search.as_deref(),
                status.as_deref(),
                sort.as_deref(),
                direction.as_deref(),
            )?;
            for click in &clicks {
                state.sort_by(click.parse::<SortField>()?);
            }

            let outcome = run_query(catalog.orders(), &state);
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.orders)?);
                return Ok(());
            }
            println!(
                "{} (sorted by {} {})",
                outcome.caption(),
                state.sort_field.name(),
                state.sort_direction.name()
            );
            for order in &outcome.orders {
                println!(
                    "{:<8} {:<16} {:<16} {:>3}  {}  {}",
                    order.id,
                    order.customer_name,
                    order.pizza_type,
                    order.quantity,
                    format_order_date(&order.order_date),
                    order.status
                );
            }
            for (status, count) in &outcome.status_counts {
                println!("{status}: {count}");
            }
        }
        Command::Validate => {
            let catalog = open_catalog(cli.catalog.as_deref())?;
            println!("catalog ok: {} orders", catalog.len());
        }
        Command::CheckRoute {
            path,
            session,
            public_paths,
            bypass_patterns,
        } => {
            let mut config = GateConfig::default();
            if !public_paths.is_empty() {
                config.public_paths = public_paths;
            }
            if !bypass_patterns.is_empty() {
                config.bypass_patterns = bypass_patterns;
            }
            let gate = AccessGate::new(config)?;
            match gate.evaluate(&path, session) {
                None => println!("{path}: bypassed"),
                Some(decision) => match gate.redirect_target(decision) {
                    Some(target) => println!("{path}: {decision:?} -> {target}"),
                    None => println!("{path}: {decision:?}"),
                },
            }
        }
        Command::MintSession {
            secret,
            subject,
            name,
            email,
            ttl_seconds,
        } => {
            let profile = SessionProfile {
                name,
                email,
                image: None,
            };
            let token = mint_session_token(&secret, &subject, &profile, ttl_seconds)
                .context("failed to mint session token")?;
            info!(%subject, ttl_seconds, "minted session token");
            println!("{token}");
        }
    }

    Ok(())
}

fn open_catalog(path: Option<&std::path::Path>) -> Result<OrderCatalog> {
    match path {
        Some(path) => OrderCatalog::load(path)
            .with_context(|| format!("failed to load catalog '{}'", path.display())),
        None => OrderCatalog::sample().context("bundled catalog is invalid"),
    }
}
