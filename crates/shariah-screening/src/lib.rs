use screening_core::{ComplianceStatus, ComplianceVerdict, FinancialSnapshot, RatioSet};

/// Industry/sector families excluded outright. Matched case-insensitively as
/// substrings of the provider's industry and sector strings.
pub const SECTOR_BLACKLIST: &[&str] = &[
    "Banks",
    "Insurance",
    "Capital Markets",
    "Credit Services",
    "Mortgage",
    "Beverages - Wineries & Distilleries",
    "Beverages - Brewers",
    "Tobacco",
    "Gambling",
    "Casinos",
    "Defense",
];

/// Description scan fallback, consulted only when the sector data is clean.
pub const KEYWORD_BLACKLIST: &[&str] = &[
    "alcohol", "liquor", "wine", "beer", "brewery", "pork", "gambling", "casino", "betting",
    "tobacco", "interest", "lending", "banking", "adult",
];

const MAX_INTEREST_INCOME_PCT: f64 = 5.0;
const MAX_DEBT_PCT: f64 = 33.0;
const MIN_ILLIQUID_ASSET_PCT: f64 = 20.0;

/// Run the full Shariah screen over one snapshot.
///
/// `boycotted` arrives already resolved; the registry lookup and its
/// fail-open policy live with the orchestrator. Every check runs regardless
/// of earlier failures, and `failed_checks` is assembled in the fixed screen
/// order: activity, boycott, interest, debt, illiquid assets, liquidity.
pub fn screen(
    snapshot: &FinancialSnapshot,
    ratios: &RatioSet,
    boycotted: bool,
) -> ComplianceVerdict {
    let (activity_ok, activity_detail) = business_activity(snapshot);

    let interest_income_ratio = match snapshot.total_revenue {
        Some(revenue) if revenue != 0.0 => snapshot.interest_income / revenue * 100.0,
        _ => 0.0,
    };

    let total_assets = if snapshot.total_assets > 0.0 {
        snapshot.total_assets
    } else {
        1.0
    };
    let debt_ratio = snapshot.total_debt / total_assets * 100.0;

    let illiquid_asset_ratio = ratios.illiquid_asset_ratio;

    // Liquid assets dominating the valuation points at a cash shell, not an
    // operating business
    let liquidity_ok = snapshot.current_assets < snapshot.market_cap;

    let mut failed_checks = Vec::new();
    if !activity_ok {
        failed_checks.push("Activity".to_string());
    }
    if boycotted {
        failed_checks.push("Boycott Listed".to_string());
    }
    if interest_income_ratio >= MAX_INTEREST_INCOME_PCT {
        failed_checks.push("Interest > 5%".to_string());
    }
    if debt_ratio >= MAX_DEBT_PCT {
        failed_checks.push("Debt > 33%".to_string());
    }
    if illiquid_asset_ratio <= MIN_ILLIQUID_ASSET_PCT {
        failed_checks.push("Real Assets < 20%".to_string());
    }
    if !liquidity_ok {
        failed_checks.push("Cash > Cap".to_string());
    }

    let status = if failed_checks.is_empty() {
        ComplianceStatus::Compliant
    } else {
        ComplianceStatus::NonCompliant
    };

    ComplianceVerdict {
        status,
        failed_checks,
        interest_income_ratio,
        debt_ratio,
        illiquid_asset_ratio,
        liquidity_ok,
        activity_ok,
        activity_detail,
        boycotted,
    }
}

/// Business-activity classification, sector first.
///
/// The keyword scan only runs when no sector entry matched: sector data that
/// already resolved the question must not be overridden by an incidental
/// keyword somewhere in the description.
fn business_activity(snapshot: &FinancialSnapshot) -> (bool, String) {
    let industry = snapshot.industry.to_lowercase();
    let sector = snapshot.sector.to_lowercase();

    let sector_hits: Vec<String> = SECTOR_BLACKLIST
        .iter()
        .filter(|entry| {
            let needle = entry.to_lowercase();
            industry.contains(&needle) || sector.contains(&needle)
        })
        .map(|entry| format!("Sector: {}", entry))
        .collect();

    if !sector_hits.is_empty() {
        return (false, sector_hits.join(", "));
    }

    let description = snapshot.description.to_lowercase();
    for keyword in KEYWORD_BLACKLIST {
        if contains_word(&description, keyword) {
            return (false, format!("Keyword: {}", keyword));
        }
    }

    (true, "OK".to_string())
}

/// Whole-word match: "interest" must not fire on "interesting".
fn contains_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}
