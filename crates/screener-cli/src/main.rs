//! screener-cli: Evaluate a ticker against a strategy rule set, the Shariah
//! screen, and price-target projection, printing the full report as JSON.
//!
//! Usage:
//!   cargo run -p screener-cli -- AAPL
//!   cargo run -p screener-cli -- AAPL --strategy graham
//!   cargo run -p screener-cli -- --search "saudi aramco"

use boycott_client::BoycottClient;
use screening_core::{StrategyKind, SymbolSearch};
use screening_orchestrator::ScreeningOrchestrator;
use std::sync::Arc;
use yahoo_client::YahooClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "screener_cli=info,screening_orchestrator=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let ticker = args
        .get(1)
        .filter(|a| !a.starts_with("--"))
        .map(|s| s.to_uppercase());

    let search_query = args
        .iter()
        .position(|a| a == "--search")
        .and_then(|i| args.get(i + 1));

    let strategy = match args
        .iter()
        .position(|a| a == "--strategy")
        .and_then(|i| args.get(i + 1))
    {
        Some(name) => match StrategyKind::from_name(name) {
            Some(kind) => kind,
            None => {
                eprintln!("Unknown strategy: {} (expected mizan, graham, or lynch)", name);
                std::process::exit(1);
            }
        },
        None => StrategyKind::Mizan,
    };

    let yahoo = YahooClient::new();

    if let Some(query) = search_query {
        let matches = yahoo.search(query).await?;
        tracing::info!("{} match(es) for '{}'", matches.len(), query);
        if matches.is_empty() {
            println!("No symbols found for '{}'", query);
        }
        for m in &matches {
            println!("{:<10} {}", m.symbol, m.display_name);
        }
        return Ok(());
    }

    let ticker = match ticker {
        Some(t) => t,
        None => {
            eprintln!("Usage:");
            eprintln!("  screener-cli TICKER                  Evaluate under the Mizan strategy");
            eprintln!("  screener-cli TICKER --strategy NAME  Evaluate under mizan, graham, or lynch");
            eprintln!("  screener-cli --search QUERY          Look up ticker symbols by name");
            std::process::exit(1);
        }
    };

    let orchestrator = ScreeningOrchestrator::new(Arc::new(yahoo), Arc::new(BoycottClient::new()));
    let report = orchestrator.evaluate(&ticker, strategy).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
