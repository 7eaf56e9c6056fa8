use screening_core::{CriterionResult, FinancialSnapshot, RatioSet, StrategyKind, ValuationRatio};

/// Metric addressed by a strategy rule. Couples the comparison value with
/// its display formatting so every rule set renders a metric the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    FcfYield,
    TrailingPe,
    OperatingMargin,
    NetDebtEbitda,
    CurrentRatio,
    DebtToEquity,
    InterestCoverage,
    ReturnOnEquity,
    PegRatio,
    RevenueGrowth,
}

impl Metric {
    pub fn key(self) -> &'static str {
        match self {
            Metric::FcfYield => "fcf_yield",
            Metric::TrailingPe => "per",
            Metric::OperatingMargin => "operating_margin",
            Metric::NetDebtEbitda => "net_debt_ebitda",
            Metric::CurrentRatio => "current_ratio",
            Metric::DebtToEquity => "debt_to_equity",
            Metric::InterestCoverage => "interest_coverage",
            Metric::ReturnOnEquity => "roe",
            Metric::PegRatio => "peg",
            Metric::RevenueGrowth => "revenue_growth",
        }
    }

    /// Value the threshold is compared against. Total for every input: the
    /// unresolved cases already carry their fail sentinels.
    pub fn comparison(self, snapshot: &FinancialSnapshot, ratios: &RatioSet) -> f64 {
        match self {
            Metric::FcfYield => ratios.fcf_yield,
            Metric::TrailingPe => ratios.trailing_pe.value,
            Metric::OperatingMargin => snapshot.operating_margin * 100.0,
            Metric::NetDebtEbitda => ratios.net_debt_ebitda,
            Metric::CurrentRatio => snapshot.current_ratio,
            Metric::DebtToEquity => {
                // 0 means unreported; the sentinel fails any leverage ceiling
                if snapshot.debt_to_equity == 0.0 {
                    ValuationRatio::FAIL_SENTINEL
                } else {
                    snapshot.debt_to_equity
                }
            }
            Metric::InterestCoverage => ratios.interest_coverage,
            Metric::ReturnOnEquity => snapshot.return_on_equity * 100.0,
            Metric::PegRatio => ratios.peg_ratio.value,
            Metric::RevenueGrowth => ratios.revenue_growth,
        }
    }

    pub fn display(self, snapshot: &FinancialSnapshot, ratios: &RatioSet) -> String {
        match self {
            Metric::FcfYield => format!("{:.2}%", ratios.fcf_yield),
            Metric::TrailingPe => ratios.trailing_pe.display.clone(),
            Metric::OperatingMargin => format!("{:.1}%", snapshot.operating_margin * 100.0),
            Metric::NetDebtEbitda => format!("{:.2}x", ratios.net_debt_ebitda),
            Metric::CurrentRatio => format!("{:.2}", snapshot.current_ratio),
            Metric::DebtToEquity => format!("{:.0}%", self.comparison(snapshot, ratios)),
            Metric::InterestCoverage => format!("{:.1}x", ratios.interest_coverage),
            Metric::ReturnOnEquity => format!("{:.2}%", snapshot.return_on_equity * 100.0),
            Metric::PegRatio => ratios.peg_ratio.display.clone(),
            Metric::RevenueGrowth => format!("{:.1}%", ratios.revenue_growth),
        }
    }
}

/// Pass condition for one rule row. The dynamic variant derives its limit
/// and label from the ratio set at evaluation time.
#[derive(Debug, Clone, Copy)]
pub enum Threshold {
    Below { limit: f64, label: &'static str },
    Above { limit: f64, label: &'static str },
    AboveDynamic(fn(&RatioSet) -> (f64, &'static str)),
}

/// One row of a strategy rule table
#[derive(Debug, Clone, Copy)]
pub struct CriterionDef {
    pub metric: Metric,
    pub threshold: Threshold,
}

/// Mizan's cash-yield bar moves with the growth regime: fast growers get a
/// lower free-cash-flow requirement than mature compounders.
fn growth_adjusted_fcf_target(ratios: &RatioSet) -> (f64, &'static str) {
    if ratios.revenue_growth > 10.0 {
        (2.5, "> 2.5% (Growth)")
    } else {
        (5.0, "> 5% (Mature)")
    }
}

const MIZAN_RULES: &[CriterionDef] = &[
    CriterionDef {
        metric: Metric::FcfYield,
        threshold: Threshold::AboveDynamic(growth_adjusted_fcf_target),
    },
    CriterionDef {
        metric: Metric::TrailingPe,
        threshold: Threshold::Below { limit: 25.0, label: "< 25" },
    },
    CriterionDef {
        metric: Metric::OperatingMargin,
        threshold: Threshold::Above { limit: 15.0, label: "> 15%" },
    },
    CriterionDef {
        metric: Metric::NetDebtEbitda,
        threshold: Threshold::Below { limit: 3.0, label: "< 3.0" },
    },
];

const GRAHAM_RULES: &[CriterionDef] = &[
    CriterionDef {
        metric: Metric::TrailingPe,
        threshold: Threshold::Below { limit: 15.0, label: "< 15" },
    },
    CriterionDef {
        metric: Metric::CurrentRatio,
        threshold: Threshold::Above { limit: 1.5, label: "> 1.5" },
    },
    CriterionDef {
        metric: Metric::DebtToEquity,
        threshold: Threshold::Below { limit: 50.0, label: "< 50%" },
    },
    CriterionDef {
        metric: Metric::InterestCoverage,
        threshold: Threshold::Above { limit: 3.0, label: "> 3.0x" },
    },
    CriterionDef {
        metric: Metric::ReturnOnEquity,
        threshold: Threshold::Above { limit: 8.0, label: "> 8%" },
    },
];

const LYNCH_RULES: &[CriterionDef] = &[
    CriterionDef {
        metric: Metric::PegRatio,
        threshold: Threshold::Below { limit: 1.0, label: "< 1.0" },
    },
    CriterionDef {
        metric: Metric::RevenueGrowth,
        threshold: Threshold::Above { limit: 15.0, label: "> 15%" },
    },
    CriterionDef {
        metric: Metric::DebtToEquity,
        threshold: Threshold::Below { limit: 80.0, label: "< 80%" },
    },
    CriterionDef {
        metric: Metric::TrailingPe,
        threshold: Threshold::Below { limit: 25.0, label: "< 25" },
    },
];

/// Declarative rule table for a strategy. Adding a strategy means adding a
/// table, not new control flow.
pub fn rule_table(strategy: StrategyKind) -> &'static [CriterionDef] {
    match strategy {
        StrategyKind::Mizan => MIZAN_RULES,
        StrategyKind::Graham => GRAHAM_RULES,
        StrategyKind::Lynch => LYNCH_RULES,
    }
}

/// Evaluate every criterion of the selected strategy, in table order.
///
/// All rows always evaluate; there is no short-circuit and no failure mode.
/// Callers aggregate per criterion, not into a single boolean.
pub fn evaluate(
    strategy: StrategyKind,
    snapshot: &FinancialSnapshot,
    ratios: &RatioSet,
) -> Vec<CriterionResult> {
    rule_table(strategy)
        .iter()
        .map(|def| {
            let value = def.metric.comparison(snapshot, ratios);
            let (passed, target) = match def.threshold {
                Threshold::Below { limit, label } => (value < limit, label),
                Threshold::Above { limit, label } => (value > limit, label),
                Threshold::AboveDynamic(target_fn) => {
                    let (limit, label) = target_fn(ratios);
                    (value > limit, label)
                }
            };
            CriterionResult {
                metric: def.metric.key().to_string(),
                value: def.metric.display(snapshot, ratios),
                target: target.to_string(),
                passed,
            }
        })
        .collect()
}
