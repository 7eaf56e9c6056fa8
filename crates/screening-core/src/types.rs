use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Daily closing price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

/// Normalized fundamentals for a single ticker.
///
/// Built once per evaluation from the provider payload and never mutated;
/// every derived metric lives in a separate [`RatioSet`]. Numeric fields the
/// provider did not report are 0, except the valuation inputs and revenue
/// series, which stay `None` so "not reported" is distinguishable from a
/// reported zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialSnapshot {
    // Identity
    pub ticker: String,
    pub name: String,
    pub industry: String,
    pub sector: String,
    pub description: String,
    pub currency: String,

    // Market
    pub current_price: f64,
    pub market_cap: f64,
    pub shares_outstanding: f64,

    // Valuation inputs
    pub trailing_pe: Option<f64>,
    pub trailing_eps: f64,
    pub price_to_book: Option<f64>,
    pub peg_ratio: Option<f64>,

    // Profitability (fractions, 0 if unavailable)
    pub return_on_equity: f64,
    pub operating_margin: f64,

    // Liquidity / leverage
    pub current_ratio: f64,
    pub debt_to_equity: f64,
    pub total_debt: f64,
    pub total_cash: f64,
    pub ebitda: f64,

    // Cash flow (capex conventionally negative, so FCF = ocf + capex)
    pub operating_cash_flow: f64,
    pub capital_expenditure: f64,

    // Income statement
    pub total_revenue: Option<f64>,
    pub prior_revenue: Option<f64>,
    pub ebit: f64,
    pub interest_expense: f64,
    pub interest_income: f64,

    // Balance sheet
    pub total_assets: f64,
    pub current_assets: f64,
    pub net_ppe: f64,
    pub goodwill: f64,
    pub intangible_assets: f64,
    pub inventory: f64,

    /// Daily closes, ascending, up to one year. May be empty.
    pub price_history: Vec<PricePoint>,
}

impl FinancialSnapshot {
    /// Floor the divisor fields at 1.
    ///
    /// A zero, negative, or non-finite market cap / total assets is a
    /// data-quality gap in the provider payload, not a financial fact; the
    /// floor keeps every downstream ratio defined without asserting anything
    /// about the company.
    pub fn normalize(mut self) -> Self {
        if !self.market_cap.is_finite() || self.market_cap < 1.0 {
            self.market_cap = 1.0;
        }
        if !self.total_assets.is_finite() || self.total_assets < 1.0 {
            self.total_assets = 1.0;
        }
        self
    }
}

/// Provider-reported optional ratio before resolution.
///
/// Zero is a valid "undefined" sentinel for some provider fields but a wrong
/// default for less-than comparisons, so the three states are kept apart
/// until [`ReportedRatio::resolve`] collapses them at the ratio boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReportedRatio {
    Positive(f64),
    NonPositive(f64),
    Absent,
}

impl ReportedRatio {
    pub fn from_raw(raw: Option<f64>) -> Self {
        match raw {
            Some(v) if v > 0.0 => ReportedRatio::Positive(v),
            Some(v) => ReportedRatio::NonPositive(v),
            None => ReportedRatio::Absent,
        }
    }

    /// Collapse into the definite comparison value and display text used by
    /// every rule set. Undefined values compare as the fail sentinel so a
    /// company with negative or unreported earnings never passes a
    /// valuation screen by accident.
    pub fn resolve(self) -> ValuationRatio {
        match self {
            ReportedRatio::Positive(v) => ValuationRatio {
                value: v,
                display: format!("{:.2}", v),
            },
            ReportedRatio::NonPositive(_) | ReportedRatio::Absent => ValuationRatio {
                value: ValuationRatio::FAIL_SENTINEL,
                display: "N/A".to_string(),
            },
        }
    }
}

/// Resolved optional ratio: a total comparison value plus its display string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRatio {
    pub value: f64,
    pub display: String,
}

impl ValuationRatio {
    /// Guaranteed to fail any "less than" valuation threshold.
    pub const FAIL_SENTINEL: f64 = 999.0;

    pub fn is_defined(&self) -> bool {
        self.value != Self::FAIL_SENTINEL
    }
}

/// Derived metrics, computed once per snapshot and passed by value.
/// Percentages are expressed x100 (so 12.5 means 12.5%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioSet {
    pub fcf_yield: f64,
    pub net_debt_ebitda: f64,
    pub revenue_growth: f64,
    pub revenue_per_share: f64,
    pub interest_coverage: f64,
    pub momentum_3m: f64,
    pub illiquid_asset_ratio: f64,
    pub trailing_pe: ValuationRatio,
    pub peg_ratio: ValuationRatio,
    pub price_to_book: ValuationRatio,
}

impl RatioSet {
    /// Address a metric by name, for renderers that want a flat lookup.
    /// Resolved valuation ratios report their comparison value.
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "fcf_yield" => Some(self.fcf_yield),
            "net_debt_ebitda" => Some(self.net_debt_ebitda),
            "revenue_growth" => Some(self.revenue_growth),
            "revenue_per_share" => Some(self.revenue_per_share),
            "interest_coverage" => Some(self.interest_coverage),
            "momentum_3m" => Some(self.momentum_3m),
            "illiquid_asset_ratio" => Some(self.illiquid_asset_ratio),
            "per" => Some(self.trailing_pe.value),
            "peg" => Some(self.peg_ratio.value),
            "pb" => Some(self.price_to_book.value),
            _ => None,
        }
    }
}

/// Named rule set applied by the strategy evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    Mizan,
    Graham,
    Lynch,
}

impl StrategyKind {
    /// Human-readable label for the strategy
    pub fn label(&self) -> &'static str {
        match self {
            StrategyKind::Mizan => "Mizan Strategy (Quality Growth)",
            StrategyKind::Graham => "Ben Graham (Modern Value)",
            StrategyKind::Lynch => "Peter Lynch (Growth)",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mizan" => Some(StrategyKind::Mizan),
            "graham" => Some(StrategyKind::Graham),
            "lynch" => Some(StrategyKind::Lynch),
            _ => None,
        }
    }
}

/// One evaluated strategy criterion. `value` and `target` are display
/// strings; `passed` carries the verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionResult {
    pub metric: String,
    pub value: String,
    pub target: String,
    pub passed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
}

/// Aggregate Shariah screen verdict with itemized failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    pub status: ComplianceStatus,
    /// Every failing check's reason code, in screen order.
    pub failed_checks: Vec<String>,
    pub interest_income_ratio: f64,
    pub debt_ratio: f64,
    pub illiquid_asset_ratio: f64,
    pub liquidity_ok: bool,
    pub activity_ok: bool,
    /// "OK", or the sector/keyword attribution of the activity failure.
    pub activity_detail: String,
    pub boycotted: bool,
}

impl ComplianceVerdict {
    pub fn is_compliant(&self) -> bool {
        self.status == ComplianceStatus::Compliant
    }
}

/// Which fundamental the price targets were derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetBasis {
    Earnings,
    Sales,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendState {
    Intact,
    Broken,
    Unknown,
}

/// Price-target projection. `basis = None` means no positive earnings or
/// per-share revenue to project from; callers surface that as "insufficient
/// data", not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetProjection {
    pub basis: Option<TargetBasis>,
    pub tp1: Option<f64>,
    pub tp2: Option<f64>,
    pub ma50: Option<f64>,
    pub trend: TrendState,
}

/// Symbol search candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub symbol: String,
    pub display_name: String,
}

/// Complete evaluation of one ticker under one strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub snapshot: FinancialSnapshot,
    pub ratios: RatioSet,
    pub strategy: StrategyKind,
    pub criteria: Vec<CriterionResult>,
    pub compliance: ComplianceVerdict,
    pub targets: TargetProjection,
    pub generated_at: DateTime<Utc>,
}
