use crate::{FinancialSnapshot, ScreeningError, SymbolMatch};
use async_trait::async_trait;

/// Trait for market-data providers building evaluation snapshots.
/// A failure here is terminal for the ticker: no partial snapshots.
#[async_trait]
pub trait FinancialDataProvider: Send + Sync {
    async fn fetch_snapshot(&self, ticker: &str) -> Result<FinancialSnapshot, ScreeningError>;
}

/// Trait for free-text symbol lookup. An empty result is a valid outcome.
#[async_trait]
pub trait SymbolSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, ScreeningError>;
}

/// Trait for boycott-list registries. Callers treat errors and timeouts as
/// "not listed" (fail-open); the policy lives in the orchestrator.
#[async_trait]
pub trait BoycottRegistry: Send + Sync {
    async fn is_listed(&self, company_name: &str) -> Result<bool, ScreeningError>;
}
