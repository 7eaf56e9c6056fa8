#[cfg(test)]
mod tests {
    use super::super::ratios::*;
    use chrono::{Duration, Utc};
    use screening_core::{FinancialSnapshot, PricePoint, ValuationRatio};

    // Helper to build an ascending daily close series ending today
    fn daily_history(days: i64, start: f64, step: f64) -> Vec<PricePoint> {
        let now = Utc::now();
        (0..days)
            .map(|i| PricePoint {
                timestamp: now - Duration::days(days - 1 - i),
                close: start + step * i as f64,
            })
            .collect()
    }

    #[test]
    fn test_fcf_yield_basic() {
        let snapshot = FinancialSnapshot {
            operating_cash_flow: 120_000.0,
            capital_expenditure: -20_000.0,
            market_cap: 1_000_000.0,
            ..Default::default()
        };
        // (120k - 20k) / 1M = 10%
        assert!((fcf_yield(&snapshot) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_fcf_yield_zero_market_cap() {
        let snapshot = FinancialSnapshot {
            operating_cash_flow: 120_000.0,
            ..Default::default()
        };
        assert_eq!(fcf_yield(&snapshot), 0.0);
    }

    #[test]
    fn test_net_debt_ebitda_basic() {
        let snapshot = FinancialSnapshot {
            total_debt: 100.0,
            total_cash: 20.0,
            ebitda: 40.0,
            ..Default::default()
        };
        assert!((net_debt_ebitda(&snapshot) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_net_debt_ebitda_missing_ebitda_is_zero() {
        let snapshot = FinancialSnapshot {
            total_debt: 100.0,
            total_cash: 20.0,
            ..Default::default()
        };
        assert_eq!(net_debt_ebitda(&snapshot), 0.0);
    }

    #[test]
    fn test_net_debt_ebitda_negative_ebitda_passes_through() {
        let snapshot = FinancialSnapshot {
            total_debt: 100.0,
            ebitda: -50.0,
            ..Default::default()
        };
        let ratio = net_debt_ebitda(&snapshot);
        assert!(ratio.is_finite());
        assert!((ratio - (-2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_revenue_growth_two_periods() {
        let snapshot = FinancialSnapshot {
            total_revenue: Some(120.0),
            prior_revenue: Some(100.0),
            ..Default::default()
        };
        assert!((revenue_growth(&snapshot) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_revenue_growth_missing_prior_is_zero() {
        let snapshot = FinancialSnapshot {
            total_revenue: Some(120.0),
            ..Default::default()
        };
        assert_eq!(revenue_growth(&snapshot), 0.0);
    }

    #[test]
    fn test_revenue_growth_zero_prior_is_zero() {
        let snapshot = FinancialSnapshot {
            total_revenue: Some(120.0),
            prior_revenue: Some(0.0),
            ..Default::default()
        };
        assert_eq!(revenue_growth(&snapshot), 0.0);
    }

    #[test]
    fn test_revenue_per_share_basic() {
        let snapshot = FinancialSnapshot {
            total_revenue: Some(1000.0),
            shares_outstanding: 50.0,
            ..Default::default()
        };
        assert!((revenue_per_share(&snapshot) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_revenue_per_share_floors_share_count() {
        let snapshot = FinancialSnapshot {
            total_revenue: Some(1000.0),
            shares_outstanding: 0.0,
            ..Default::default()
        };
        // Share count floors at 1, so the ratio stays defined
        assert!((revenue_per_share(&snapshot) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_revenue_per_share_missing_revenue_is_zero() {
        let snapshot = FinancialSnapshot {
            shares_outstanding: 50.0,
            ..Default::default()
        };
        assert_eq!(revenue_per_share(&snapshot), 0.0);
    }

    #[test]
    fn test_interest_coverage_no_expense_is_sentinel() {
        let snapshot = FinancialSnapshot {
            ebit: 500.0,
            interest_expense: 0.0,
            ..Default::default()
        };
        assert_eq!(interest_coverage(&snapshot), DEBT_FREE_COVERAGE);
        assert_eq!(interest_coverage(&snapshot), 100.0);
    }

    #[test]
    fn test_interest_coverage_uses_absolute_expense() {
        let positive = FinancialSnapshot {
            ebit: 100.0,
            interest_expense: 25.0,
            ..Default::default()
        };
        let negative = FinancialSnapshot {
            ebit: 100.0,
            interest_expense: -25.0,
            ..Default::default()
        };
        assert!((interest_coverage(&positive) - 4.0).abs() < 1e-9);
        assert!((interest_coverage(&negative) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_momentum_rising_year() {
        let history = daily_history(365, 100.0, 0.5);
        let momentum = momentum_3m(&history);
        // Window starts 90 days before the last point: index 274 of 0..365
        // base = 100 + 0.5*274 = 237, last = 100 + 0.5*364 = 282
        assert!((momentum - (282.0 - 237.0) / 237.0 * 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_momentum_short_history_is_zero() {
        assert_eq!(momentum_3m(&[]), 0.0);
        assert_eq!(momentum_3m(&daily_history(1, 100.0, 0.0)), 0.0);
    }

    #[test]
    fn test_momentum_zero_base_price_is_zero() {
        let history = daily_history(2, 0.0, 5.0);
        assert_eq!(momentum_3m(&history), 0.0);
    }

    #[test]
    fn test_illiquid_ratio_granular_items() {
        let snapshot = FinancialSnapshot {
            net_ppe: 10.0,
            goodwill: 5.0,
            intangible_assets: 5.0,
            inventory: 5.0,
            total_assets: 100.0,
            ..Default::default()
        };
        assert!((illiquid_asset_ratio(&snapshot) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_illiquid_ratio_fallback_to_noncurrent_split() {
        let snapshot = FinancialSnapshot {
            current_assets: 40.0,
            total_assets: 100.0,
            ..Default::default()
        };
        // No granular items: estimate = total - current = 60
        assert!((illiquid_asset_ratio(&snapshot) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_illiquid_ratio_negative_fallback_clamps_to_zero() {
        let snapshot = FinancialSnapshot {
            current_assets: 150.0,
            total_assets: 100.0,
            ..Default::default()
        };
        assert_eq!(illiquid_asset_ratio(&snapshot), 0.0);
    }

    #[test]
    fn test_illiquid_ratio_zero_total_assets_behaves_as_one() {
        let snapshot = FinancialSnapshot {
            net_ppe: 5.0,
            total_assets: 0.0,
            ..Default::default()
        };
        let ratio = illiquid_asset_ratio(&snapshot);
        assert!(ratio.is_finite());
        assert!((ratio - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_valuation_resolution_absent_fails_with_na() {
        let snapshot = FinancialSnapshot::default();
        let ratios = compute_ratios(&snapshot);
        assert_eq!(ratios.trailing_pe.value, ValuationRatio::FAIL_SENTINEL);
        assert_eq!(ratios.trailing_pe.display, "N/A");
        assert!(!ratios.trailing_pe.is_defined());
    }

    #[test]
    fn test_valuation_resolution_non_positive_fails_with_na() {
        let snapshot = FinancialSnapshot {
            peg_ratio: Some(-0.5),
            ..Default::default()
        };
        let ratios = compute_ratios(&snapshot);
        assert_eq!(ratios.peg_ratio.value, ValuationRatio::FAIL_SENTINEL);
        assert_eq!(ratios.peg_ratio.display, "N/A");
    }

    #[test]
    fn test_valuation_resolution_positive_formats_two_decimals() {
        let snapshot = FinancialSnapshot {
            trailing_pe: Some(12.5),
            ..Default::default()
        };
        let ratios = compute_ratios(&snapshot);
        assert_eq!(ratios.trailing_pe.value, 12.5);
        assert_eq!(ratios.trailing_pe.display, "12.50");
    }

    #[test]
    fn test_normalize_floors_divisors() {
        let zeroed = FinancialSnapshot::default().normalize();
        assert_eq!(zeroed.market_cap, 1.0);
        assert_eq!(zeroed.total_assets, 1.0);

        let negative = FinancialSnapshot {
            market_cap: -5.0,
            total_assets: -1.0,
            ..Default::default()
        }
        .normalize();
        assert_eq!(negative.market_cap, 1.0);
        assert_eq!(negative.total_assets, 1.0);

        let real = FinancialSnapshot {
            market_cap: 2.0e12,
            total_assets: 3.5e11,
            ..Default::default()
        }
        .normalize();
        assert_eq!(real.market_cap, 2.0e12);
        assert_eq!(real.total_assets, 3.5e11);
    }

    #[test]
    fn test_compute_ratios_idempotent() {
        let snapshot = FinancialSnapshot {
            ticker: "TEST".to_string(),
            market_cap: 1_000_000.0,
            operating_cash_flow: 80_000.0,
            capital_expenditure: -30_000.0,
            total_debt: 200.0,
            total_cash: 50.0,
            ebitda: 100.0,
            total_revenue: Some(500.0),
            prior_revenue: Some(400.0),
            shares_outstanding: 25.0,
            ebit: 90.0,
            interest_expense: 10.0,
            trailing_pe: Some(18.0),
            total_assets: 1000.0,
            net_ppe: 400.0,
            price_history: daily_history(200, 50.0, 0.1),
            ..Default::default()
        };
        assert_eq!(compute_ratios(&snapshot), compute_ratios(&snapshot));
    }

    #[test]
    fn test_compute_ratios_empty_snapshot_all_finite() {
        let ratios = compute_ratios(&FinancialSnapshot::default());
        assert!(ratios.fcf_yield.is_finite());
        assert!(ratios.net_debt_ebitda.is_finite());
        assert!(ratios.revenue_growth.is_finite());
        assert!(ratios.revenue_per_share.is_finite());
        assert!(ratios.interest_coverage.is_finite());
        assert!(ratios.momentum_3m.is_finite());
        assert!(ratios.illiquid_asset_ratio.is_finite());
        assert!(ratios.trailing_pe.value.is_finite());
        assert!(ratios.peg_ratio.value.is_finite());
        assert!(ratios.price_to_book.value.is_finite());
    }
}
