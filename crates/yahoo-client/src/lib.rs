use async_trait::async_trait;
use chrono::DateTime;
use screening_core::{
    FinancialDataProvider, FinancialSnapshot, PricePoint, ScreeningError, SymbolMatch,
    SymbolSearch,
};
use serde_json::Value;
use std::time::Duration;

const BASE_URL: &str = "https://query2.finance.yahoo.com";

// Yahoo rejects requests without a browser user agent
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const QUOTE_SUMMARY_MODULES: &str = "price,summaryProfile,summaryDetail,financialData,defaultKeyStatistics,incomeStatementHistory,balanceSheetHistory,cashflowStatementHistory";

/// Financial Data Provider + Symbol Search over the public Yahoo Finance
/// endpoints. No API key; `YAHOO_BASE_URL` overrides the host for testing.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    pub fn new() -> Self {
        let base_url = std::env::var("YAHOO_BASE_URL").unwrap_or_else(|_| BASE_URL.to_string());
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, base_url }
    }

    async fn get_json(&self, url: &str) -> Result<Value, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }
        response.json().await.map_err(|e| e.to_string())
    }

    async fn quote_summary(&self, ticker: &str) -> Result<Value, ScreeningError> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules={}",
            self.base_url,
            urlencoding::encode(ticker),
            QUOTE_SUMMARY_MODULES
        );
        let json = self.get_json(&url).await.map_err(|e| {
            ScreeningError::DataUnavailable(format!("Quote summary for {}: {}", ticker, e))
        })?;
        json.get("quoteSummary")
            .and_then(|v| v.get("result"))
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .cloned()
            .ok_or_else(|| {
                ScreeningError::DataUnavailable(format!("No quote summary for {}", ticker))
            })
    }

    async fn price_history(&self, ticker: &str) -> Result<Vec<PricePoint>, String> {
        let url = format!(
            "{}/v8/finance/chart/{}?range=1y&interval=1d",
            self.base_url,
            urlencoding::encode(ticker)
        );
        let json = self.get_json(&url).await?;
        Ok(history_from_chart(&json))
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FinancialDataProvider for YahooClient {
    async fn fetch_snapshot(&self, ticker: &str) -> Result<FinancialSnapshot, ScreeningError> {
        let summary = self.quote_summary(ticker).await?;

        // Missing history reads as momentum 0 / trend unknown downstream,
        // so a chart failure never sinks the snapshot
        let history = match self.price_history(ticker).await {
            Ok(points) => points,
            Err(e) => {
                tracing::warn!("Price history unavailable for {}: {}", ticker, e);
                Vec::new()
            }
        };

        Ok(snapshot_from_summary(ticker, &summary, history))
    }
}

#[async_trait]
impl SymbolSearch for YahooClient {
    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, ScreeningError> {
        let url = format!(
            "{}/v1/finance/search?q={}",
            self.base_url,
            urlencoding::encode(query)
        );
        let json = self
            .get_json(&url)
            .await
            .map_err(|e| ScreeningError::Collaborator(format!("Symbol search: {}", e)))?;
        Ok(matches_from_search(&json))
    }
}

/// Map one quoteSummary result into a snapshot.
///
/// Missing numerics collapse to 0, except the optional valuation inputs and
/// the revenue series, which stay `None` so downstream tri-state handling
/// can tell "not reported" from zero. Capex keeps Yahoo's negative sign.
pub fn snapshot_from_summary(
    ticker: &str,
    summary: &Value,
    price_history: Vec<PricePoint>,
) -> FinancialSnapshot {
    let price = summary.get("price");
    let profile = summary.get("summaryProfile");
    let detail = summary.get("summaryDetail");
    let financial = summary.get("financialData");
    let key_stats = summary.get("defaultKeyStatistics");

    let income = statement_entries(summary, "incomeStatementHistory", "incomeStatementHistory");
    let latest_income = income.first().copied();
    let prior_income = income.get(1).copied();
    let latest_balance =
        statement_entries(summary, "balanceSheetHistory", "balanceSheetStatements")
            .first()
            .copied();
    let latest_cashflow =
        statement_entries(summary, "cashflowStatementHistory", "cashflowStatements")
            .first()
            .copied();

    FinancialSnapshot {
        ticker: ticker.to_uppercase(),
        name: text_field(price, "longName"),
        industry: text_field(profile, "industry"),
        sector: text_field(profile, "sector"),
        description: text_field(profile, "longBusinessSummary"),
        currency: text_field(price, "currency"),

        current_price: raw_field(financial, "currentPrice")
            .or_else(|| raw_field(price, "regularMarketPrice"))
            .unwrap_or(0.0),
        market_cap: raw_field(price, "marketCap").unwrap_or(0.0),
        shares_outstanding: raw_field(key_stats, "sharesOutstanding").unwrap_or(0.0),

        trailing_pe: raw_field(detail, "trailingPE"),
        trailing_eps: raw_field(key_stats, "trailingEps").unwrap_or(0.0),
        price_to_book: raw_field(key_stats, "priceToBook"),
        peg_ratio: raw_field(key_stats, "pegRatio"),

        return_on_equity: raw_field(financial, "returnOnEquity").unwrap_or(0.0),
        operating_margin: raw_field(financial, "operatingMargins").unwrap_or(0.0),

        current_ratio: raw_field(financial, "currentRatio").unwrap_or(0.0),
        debt_to_equity: raw_field(financial, "debtToEquity").unwrap_or(0.0),
        total_debt: raw_field(financial, "totalDebt").unwrap_or(0.0),
        total_cash: raw_field(financial, "totalCash").unwrap_or(0.0),
        ebitda: raw_field(financial, "ebitda").unwrap_or(0.0),

        operating_cash_flow: raw_field(financial, "operatingCashflow").unwrap_or(0.0),
        capital_expenditure: raw_field(latest_cashflow, "capitalExpenditures").unwrap_or(0.0),

        total_revenue: raw_field(latest_income, "totalRevenue"),
        prior_revenue: raw_field(prior_income, "totalRevenue"),
        ebit: raw_field(latest_income, "ebit").unwrap_or(0.0),
        interest_expense: raw_field(latest_income, "interestExpense").unwrap_or(0.0),
        interest_income: raw_field(latest_income, "interestIncome").unwrap_or(0.0),

        total_assets: raw_field(latest_balance, "totalAssets").unwrap_or(0.0),
        current_assets: raw_field(latest_balance, "totalCurrentAssets").unwrap_or(0.0),
        net_ppe: raw_field(latest_balance, "propertyPlantEquipment").unwrap_or(0.0),
        goodwill: raw_field(latest_balance, "goodWill").unwrap_or(0.0),
        intangible_assets: raw_field(latest_balance, "intangibleAssets").unwrap_or(0.0),
        inventory: raw_field(latest_balance, "inventory").unwrap_or(0.0),

        price_history,
    }
    .normalize()
}

/// Closes from a v8 chart payload, oldest first. Null closes (halted days)
/// drop out; any malformed payload is just an empty history.
pub fn history_from_chart(payload: &Value) -> Vec<PricePoint> {
    let result = match payload
        .get("chart")
        .and_then(|v| v.get("result"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
    {
        Some(r) => r,
        None => return Vec::new(),
    };

    let timestamps = result.get("timestamp").and_then(|v| v.as_array());
    let closes = result
        .get("indicators")
        .and_then(|v| v.get("quote"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|q| q.get("close"))
        .and_then(|v| v.as_array());

    let (timestamps, closes) = match (timestamps, closes) {
        (Some(t), Some(c)) => (t, c),
        _ => return Vec::new(),
    };

    timestamps
        .iter()
        .zip(closes.iter())
        .filter_map(|(ts, close)| {
            let timestamp = DateTime::from_timestamp(ts.as_i64()?, 0)?;
            Some(PricePoint {
                timestamp,
                close: close.as_f64()?,
            })
        })
        .collect()
}

/// Candidates from a v1 search payload. Entries without a symbol drop out;
/// the symbol stands in for a missing display name.
pub fn matches_from_search(payload: &Value) -> Vec<SymbolMatch> {
    payload
        .get("quotes")
        .and_then(|v| v.as_array())
        .map(|quotes| {
            quotes
                .iter()
                .filter_map(|q| {
                    let symbol = q.get("symbol")?.as_str()?.to_string();
                    let display_name = q
                        .get("shortname")
                        .or_else(|| q.get("longname"))
                        .and_then(|v| v.as_str())
                        .unwrap_or(&symbol)
                        .to_string();
                    Some(SymbolMatch {
                        symbol,
                        display_name,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Unwrap Yahoo's `{"raw": n, "fmt": "..."}` number wrapper.
fn raw_field(node: Option<&Value>, key: &str) -> Option<f64> {
    node?.get(key)?.get("raw")?.as_f64()
}

fn text_field(node: Option<&Value>, key: &str) -> String {
    node.and_then(|n| n.get(key))
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

fn statement_entries<'a>(summary: &'a Value, module: &str, list: &str) -> Vec<&'a Value> {
    summary
        .get(module)
        .and_then(|m| m.get(list))
        .and_then(|v| v.as_array())
        .map(|entries| entries.iter().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_summary() -> Value {
        json!({
            "price": {
                "longName": "Apple Inc.",
                "currency": "USD",
                "marketCap": {"raw": 3.0e12},
                "regularMarketPrice": {"raw": 195.0}
            },
            "summaryProfile": {
                "industry": "Consumer Electronics",
                "sector": "Technology",
                "longBusinessSummary": "Designs smartphones and services."
            },
            "summaryDetail": { "trailingPE": {"raw": 29.5} },
            "financialData": {
                "currentPrice": {"raw": 195.5},
                "returnOnEquity": {"raw": 1.47},
                "operatingMargins": {"raw": 0.30},
                "currentRatio": {"raw": 0.99},
                "debtToEquity": {"raw": 176.0},
                "totalDebt": {"raw": 1.1e11},
                "totalCash": {"raw": 6.2e10},
                "ebitda": {"raw": 1.3e11},
                "operatingCashflow": {"raw": 1.1e11}
            },
            "defaultKeyStatistics": {
                "trailingEps": {"raw": 6.42},
                "pegRatio": {"raw": 2.1},
                "sharesOutstanding": {"raw": 1.54e10}
            },
            "incomeStatementHistory": { "incomeStatementHistory": [
                {
                    "totalRevenue": {"raw": 3.9e11},
                    "ebit": {"raw": 1.2e11},
                    "interestExpense": {"raw": -3.9e9}
                },
                { "totalRevenue": {"raw": 3.7e11} }
            ]},
            "balanceSheetHistory": { "balanceSheetStatements": [
                {
                    "totalAssets": {"raw": 3.5e11},
                    "totalCurrentAssets": {"raw": 1.4e11},
                    "propertyPlantEquipment": {"raw": 4.4e10},
                    "inventory": {"raw": 6.3e9}
                }
            ]},
            "cashflowStatementHistory": { "cashflowStatements": [
                { "capitalExpenditures": {"raw": -1.1e10} }
            ]}
        })
    }

    #[test]
    fn test_snapshot_mapping_core_fields() {
        let snapshot = snapshot_from_summary("aapl", &sample_summary(), Vec::new());
        assert_eq!(snapshot.ticker, "AAPL");
        assert_eq!(snapshot.name, "Apple Inc.");
        assert_eq!(snapshot.industry, "Consumer Electronics");
        assert_eq!(snapshot.currency, "USD");
        // financialData's currentPrice wins over the price module
        assert_eq!(snapshot.current_price, 195.5);
        assert_eq!(snapshot.trailing_pe, Some(29.5));
        assert_eq!(snapshot.total_revenue, Some(3.9e11));
        assert_eq!(snapshot.prior_revenue, Some(3.7e11));
        assert_eq!(snapshot.ebit, 1.2e11);
        assert_eq!(snapshot.net_ppe, 4.4e10);
    }

    #[test]
    fn test_snapshot_mapping_preserves_signs() {
        let snapshot = snapshot_from_summary("AAPL", &sample_summary(), Vec::new());
        // Capex and interest expense arrive negative and must stay so
        assert_eq!(snapshot.capital_expenditure, -1.1e10);
        assert_eq!(snapshot.interest_expense, -3.9e9);
    }

    #[test]
    fn test_snapshot_mapping_missing_optionals_stay_none() {
        let snapshot = snapshot_from_summary("X", &json!({}), Vec::new());
        assert_eq!(snapshot.trailing_pe, None);
        assert_eq!(snapshot.peg_ratio, None);
        assert_eq!(snapshot.price_to_book, None);
        assert_eq!(snapshot.total_revenue, None);
        assert_eq!(snapshot.prior_revenue, None);
        // Divisors come back floored by normalize()
        assert_eq!(snapshot.market_cap, 1.0);
        assert_eq!(snapshot.total_assets, 1.0);
    }

    #[test]
    fn test_history_from_chart_drops_null_closes() {
        let payload = json!({
            "chart": { "result": [ {
                "timestamp": [1700000000, 1700086400, 1700172800],
                "indicators": { "quote": [ { "close": [189.1, null, 191.3] } ] }
            } ] }
        });
        let history = history_from_chart(&payload);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].close, 189.1);
        assert_eq!(history[1].close, 191.3);
        assert!(history[0].timestamp < history[1].timestamp);
    }

    #[test]
    fn test_history_from_chart_malformed_is_empty() {
        assert!(history_from_chart(&json!({})).is_empty());
        assert!(history_from_chart(&json!({"chart": {"result": []}})).is_empty());
    }

    #[test]
    fn test_matches_from_search() {
        let payload = json!({
            "quotes": [
                { "symbol": "AAPL", "shortname": "Apple Inc." },
                { "symbol": "APC.F", "longname": "Apple Inc. (Frankfurt)" },
                { "isYieldCurve": true }
            ]
        });
        let matches = matches_from_search(&payload);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].symbol, "AAPL");
        assert_eq!(matches[0].display_name, "Apple Inc.");
        assert_eq!(matches[1].display_name, "Apple Inc. (Frankfurt)");
    }

    #[test]
    fn test_matches_from_search_empty_is_valid() {
        assert!(matches_from_search(&json!({"quotes": []})).is_empty());
        assert!(matches_from_search(&json!({})).is_empty());
    }
}
