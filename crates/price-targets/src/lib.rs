use screening_core::{FinancialSnapshot, RatioSet, TargetBasis, TargetProjection, TrendState};

/// Conservative and aggressive earnings-multiple bands
const EARNINGS_MULTIPLE_LOW: f64 = 15.0;
const EARNINGS_MULTIPLE_HIGH: f64 = 25.0;

/// Sales-multiple bands, the fallback for loss-makers with real revenue
const SALES_MULTIPLE_LOW: f64 = 6.0;
const SALES_MULTIPLE_HIGH: f64 = 10.0;

/// Trend window length in trading days
const TREND_WINDOW: usize = 50;

/// Project price targets and the trend state for one snapshot.
///
/// Model selection is mutually exclusive, in order: earnings bands when
/// trailing EPS is positive, sales bands when per-share revenue is, and no
/// targets otherwise. The no-target state is "insufficient data" for the
/// caller, never an error.
pub fn project(snapshot: &FinancialSnapshot, ratios: &RatioSet) -> TargetProjection {
    let (basis, tp1, tp2) = if snapshot.trailing_eps > 0.0 {
        (
            Some(TargetBasis::Earnings),
            Some(snapshot.trailing_eps * EARNINGS_MULTIPLE_LOW),
            Some(snapshot.trailing_eps * EARNINGS_MULTIPLE_HIGH),
        )
    } else if ratios.revenue_per_share > 0.0 {
        (
            Some(TargetBasis::Sales),
            Some(ratios.revenue_per_share * SALES_MULTIPLE_LOW),
            Some(ratios.revenue_per_share * SALES_MULTIPLE_HIGH),
        )
    } else {
        (None, None, None)
    };

    let closes: Vec<f64> = snapshot.price_history.iter().map(|p| p.close).collect();
    let ma50 = trailing_mean(&closes, TREND_WINDOW);
    let trend = match ma50 {
        Some(ma) if snapshot.current_price < ma => TrendState::Broken,
        Some(_) => TrendState::Intact,
        // Too little history to call the trend either way
        None => TrendState::Unknown,
    };

    TargetProjection {
        basis,
        tp1,
        tp2,
        ma50,
        trend,
    }
}

/// Mean of the last `period` values; None when the series is shorter.
fn trailing_mean(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period {
        return None;
    }
    let window = &data[data.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}
