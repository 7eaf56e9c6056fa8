use chrono::Duration;
use screening_core::{FinancialSnapshot, PricePoint, RatioSet, ReportedRatio};

/// Coverage assigned to companies with no interest expense: treated as
/// maximally covered. A policy constant, not a measured ratio.
pub const DEBT_FREE_COVERAGE: f64 = 100.0;

/// Momentum lookback, anchored at the newest price point.
const MOMENTUM_WINDOW_DAYS: i64 = 90;

/// Derive every secondary metric from a snapshot.
///
/// Pure arithmetic with guarded denominators: a missing or degenerate input
/// falls back per metric, it never errors and never produces NaN/Infinity.
/// The optional valuation inputs are resolved here, once, into comparison
/// value + display text; downstream rules never see an unresolved Option.
pub fn compute_ratios(snapshot: &FinancialSnapshot) -> RatioSet {
    RatioSet {
        fcf_yield: fcf_yield(snapshot),
        net_debt_ebitda: net_debt_ebitda(snapshot),
        revenue_growth: revenue_growth(snapshot),
        revenue_per_share: revenue_per_share(snapshot),
        interest_coverage: interest_coverage(snapshot),
        momentum_3m: momentum_3m(&snapshot.price_history),
        illiquid_asset_ratio: illiquid_asset_ratio(snapshot),
        trailing_pe: ReportedRatio::from_raw(snapshot.trailing_pe).resolve(),
        peg_ratio: ReportedRatio::from_raw(snapshot.peg_ratio).resolve(),
        price_to_book: ReportedRatio::from_raw(snapshot.price_to_book).resolve(),
    }
}

/// Free cash flow yield %: (operating cash flow + capex) / market cap.
/// Capex arrives negative, so the sum is already free cash flow.
pub fn fcf_yield(snapshot: &FinancialSnapshot) -> f64 {
    if snapshot.market_cap <= 0.0 {
        return 0.0;
    }
    (snapshot.operating_cash_flow + snapshot.capital_expenditure) / snapshot.market_cap * 100.0
}

/// Net debt over EBITDA. Zero when EBITDA is unreported, never infinity.
pub fn net_debt_ebitda(snapshot: &FinancialSnapshot) -> f64 {
    if snapshot.ebitda == 0.0 {
        return 0.0;
    }
    (snapshot.total_debt - snapshot.total_cash) / snapshot.ebitda
}

/// Period-over-period revenue growth %. Zero without two comparable periods.
pub fn revenue_growth(snapshot: &FinancialSnapshot) -> f64 {
    match (snapshot.total_revenue, snapshot.prior_revenue) {
        (Some(latest), Some(prior)) if prior != 0.0 => (latest - prior) / prior * 100.0,
        _ => 0.0,
    }
}

/// Latest revenue per share, with the share count floored at 1.
pub fn revenue_per_share(snapshot: &FinancialSnapshot) -> f64 {
    match snapshot.total_revenue {
        Some(revenue) => revenue / snapshot.shares_outstanding.max(1.0),
        None => 0.0,
    }
}

/// EBIT over absolute interest expense; [`DEBT_FREE_COVERAGE`] when there is
/// no interest expense to cover.
pub fn interest_coverage(snapshot: &FinancialSnapshot) -> f64 {
    let expense = snapshot.interest_expense.abs();
    if expense > 0.0 {
        snapshot.ebit / expense
    } else {
        DEBT_FREE_COVERAGE
    }
}

/// Close-to-close change % across the trailing three-month window.
/// Zero with fewer than two points inside the window.
pub fn momentum_3m(history: &[PricePoint]) -> f64 {
    let last = match history.last() {
        Some(point) => point,
        None => return 0.0,
    };
    let cutoff = last.timestamp - Duration::days(MOMENTUM_WINDOW_DAYS);
    let window: Vec<&PricePoint> = history.iter().filter(|p| p.timestamp >= cutoff).collect();
    if window.len() < 2 {
        return 0.0;
    }
    let base = window[0].close;
    if base == 0.0 {
        return 0.0;
    }
    (last.close - base) / base * 100.0
}

/// Share of total assets held in illiquid/tangible form, as %.
///
/// When every granular line item is unreported, the current/non-current
/// split stands in as the estimate. Inconsistent payloads can push that
/// estimate negative; it clamps to zero with a data-quality warning.
pub fn illiquid_asset_ratio(snapshot: &FinancialSnapshot) -> f64 {
    let mut illiquid =
        snapshot.net_ppe + snapshot.goodwill + snapshot.intangible_assets + snapshot.inventory;

    if illiquid == 0.0 && snapshot.current_assets > 0.0 {
        illiquid = snapshot.total_assets - snapshot.current_assets;
        if illiquid < 0.0 {
            tracing::warn!(
                "Illiquid-asset fallback negative for {}: current assets {} exceed total assets {}, clamping to 0",
                snapshot.ticker,
                snapshot.current_assets,
                snapshot.total_assets
            );
            illiquid = 0.0;
        }
    }

    let total_assets = if snapshot.total_assets > 0.0 {
        snapshot.total_assets
    } else {
        1.0
    };
    illiquid / total_assets * 100.0
}
