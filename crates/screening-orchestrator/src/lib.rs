use screening_core::{
    BoycottRegistry, EvaluationReport, FinancialDataProvider, ScreeningError, StrategyKind,
};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_BOYCOTT_TIMEOUT_SECS: u64 = 2;

/// Runs the full evaluation pipeline for one ticker: snapshot fetch, ratio
/// derivation, strategy criteria, Shariah screen, and price targets.
pub struct ScreeningOrchestrator {
    provider: Arc<dyn FinancialDataProvider>,
    registry: Arc<dyn BoycottRegistry>,
    /// Budget for the boycott registry round trip before failing open
    boycott_timeout: Duration,
}

impl ScreeningOrchestrator {
    pub fn new(
        provider: Arc<dyn FinancialDataProvider>,
        registry: Arc<dyn BoycottRegistry>,
    ) -> Self {
        Self {
            provider,
            registry,
            boycott_timeout: Duration::from_secs(DEFAULT_BOYCOTT_TIMEOUT_SECS),
        }
    }

    /// Override the boycott registry deadline
    pub fn with_boycott_timeout(mut self, timeout: Duration) -> Self {
        self.boycott_timeout = timeout;
        self
    }

    /// Evaluate one ticker under one strategy. A provider failure is terminal;
    /// a registry failure only degrades the boycott flag to "not listed".
    pub async fn evaluate(
        &self,
        ticker: &str,
        strategy: StrategyKind,
    ) -> Result<EvaluationReport, ScreeningError> {
        tracing::info!("Evaluating {} under {}", ticker, strategy.label());

        let snapshot = self.provider.fetch_snapshot(ticker).await?;
        let ratios = ratio_analysis::compute_ratios(&snapshot);
        let criteria = strategy_analysis::evaluate(strategy, &snapshot, &ratios);

        let boycotted = self.check_boycott(&snapshot.name).await;
        let compliance = shariah_screening::screen(&snapshot, &ratios, boycotted);
        let targets = price_targets::project(&snapshot, &ratios);

        tracing::info!(
            "Completed {}: {}/{} criteria passed, compliance {:?}",
            snapshot.ticker,
            criteria.iter().filter(|c| c.passed).count(),
            criteria.len(),
            compliance.status
        );

        Ok(EvaluationReport {
            snapshot,
            ratios,
            strategy,
            criteria,
            compliance,
            targets,
            generated_at: chrono::Utc::now(),
        })
    }

    /// Resolve the boycott flag without letting a slow or broken registry
    /// sink the evaluation. Any failure reads as "not listed".
    async fn check_boycott(&self, company_name: &str) -> bool {
        let query = clean_company_name(company_name);
        if query.is_empty() {
            return false;
        }

        match tokio::time::timeout(self.boycott_timeout, self.registry.is_listed(&query)).await {
            Ok(Ok(listed)) => listed,
            Ok(Err(e)) => {
                tracing::warn!("Boycott registry lookup failed for {}: {}", query, e);
                false
            }
            Err(_) => {
                tracing::warn!("Boycott registry lookup timed out for {}", query);
                false
            }
        }
    }
}

/// Strip legal suffixes and share-class tails so the registry sees the name
/// an activist list would carry.
pub fn clean_company_name(name: &str) -> String {
    let stripped = name.replace(" Inc.", "").replace(" Corporation", "");
    stripped
        .split(" - ")
        .next()
        .unwrap_or(&stripped)
        .trim()
        .to_string()
}
