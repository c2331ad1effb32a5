//! # Freshness Engine
//!
//! Derives a perishability signal from a flower's arrival date and its
//! shelf-life window (`freshness_days`).
//!
//! ## Decay Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Linear decay over calendar days (shelf-life = 10 days)                 │
//! │                                                                         │
//! │  100% ┤●                                                                │
//! │       │   ●                       FRESH       >= 70                     │
//! │   70% ┤──────●─────────────────────────────────────                     │
//! │       │         ●                 ACCEPTABLE  40..69                    │
//! │   40% ┤────────────●───────────────────────────────                     │
//! │       │               ●           EXPIRED     < 40                      │
//! │    0% ┤                  ●  ●  ●  (clamped, never negative)             │
//! │       └──┬──┬──┬──┬──┬──┬──┬──┬──┬──┬──┬──► days since arrival          │
//! │          0  1  2  3  4  5  6  7  8  9  10                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Freshness is date-granular: the time of day never matters. Arrivals dated
//! in the future count as 100% fresh.
//!
//! ## Rounding
//! Percentages are rounded half up using exact integer arithmetic, so
//! `87.5` becomes `88` and `50.0` stays `50`.
//!
//! The `_on` variants take `today` explicitly and are pure. The plain
//! variants read the local calendar date and delegate.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Percentage at or above which a flower is `Fresh`.
pub const FRESH_MIN_PERCENTAGE: u8 = 70;

/// Percentage at or above which a flower is still `Acceptable`.
pub const ACCEPTABLE_MIN_PERCENTAGE: u8 = 40;

// =============================================================================
// Freshness Status
// =============================================================================

/// Three-tier freshness label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FreshnessStatus {
    Fresh,
    Acceptable,
    Expired,
}

impl FreshnessStatus {
    /// Human-readable name used in labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            FreshnessStatus::Fresh => "Fresh",
            FreshnessStatus::Acceptable => "Acceptable",
            FreshnessStatus::Expired => "Expired",
        }
    }
}

impl fmt::Display for FreshnessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Freshness Report
// =============================================================================

/// Structured freshness result for display.
///
/// `label` is pre-rendered for convenience; consumers that localize should
/// format from `percentage` and `status` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FreshnessReport {
    pub percentage: u8,
    pub status: FreshnessStatus,
    pub label: String,
}

// =============================================================================
// Calculations
// =============================================================================

/// Today's date in local time, normalized to the calendar day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Freshness percentage in `[0, 100]` as of `today`.
///
/// ## Rules
/// - no arrival date, or `max_fresh_days <= 0` → 0
/// - arrival after today → 100
/// - `days_passed >= max_fresh_days` → 0
/// - otherwise `round(100 * (1 - days_passed / max_fresh_days))`
///
/// ## Example
/// ```rust
/// use bloom_core::freshness::calculate_freshness_percentage_on;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
/// assert_eq!(calculate_freshness_percentage_on(Some(today), 10, today), 100);
/// assert_eq!(calculate_freshness_percentage_on(None, 10, today), 0);
/// ```
pub fn calculate_freshness_percentage_on(
    arrival_date: Option<NaiveDate>,
    max_fresh_days: i64,
    today: NaiveDate,
) -> u8 {
    let Some(arrival) = arrival_date else {
        return 0;
    };
    if max_fresh_days <= 0 {
        return 0;
    }

    if arrival > today {
        return 100;
    }

    let days_passed = (today - arrival).num_days();
    if days_passed >= max_fresh_days {
        return 0;
    }

    // 100 * (m - d) / m, rounded half up: floor((200 * (m - d) + m) / (2 * m)).
    // i128 keeps absurd shelf-lives from overflowing.
    let remaining = (max_fresh_days - days_passed) as i128;
    let max = max_fresh_days as i128;
    let rounded = (200 * remaining + max) / (2 * max);

    rounded.clamp(0, 100) as u8
}

/// Freshness percentage as of the local calendar day.
pub fn calculate_freshness_percentage(arrival_date: Option<NaiveDate>, max_fresh_days: i64) -> u8 {
    calculate_freshness_percentage_on(arrival_date, max_fresh_days, today())
}

/// Maps a percentage onto its status tier.
pub fn get_freshness_status(percentage: u8) -> FreshnessStatus {
    if percentage >= FRESH_MIN_PERCENTAGE {
        FreshnessStatus::Fresh
    } else if percentage >= ACCEPTABLE_MIN_PERCENTAGE {
        FreshnessStatus::Acceptable
    } else {
        FreshnessStatus::Expired
    }
}

/// `"<Status> (<percentage>%)"` as of `today`.
pub fn get_freshness_label_on(
    arrival_date: Option<NaiveDate>,
    max_fresh_days: i64,
    today: NaiveDate,
) -> String {
    compute_freshness_on(arrival_date, max_fresh_days, today).label
}

/// `"<Status> (<percentage>%)"` as of the local calendar day.
pub fn get_freshness_label(arrival_date: Option<NaiveDate>, max_fresh_days: i64) -> String {
    get_freshness_label_on(arrival_date, max_fresh_days, today())
}

/// Percentage, status and label together, as of `today`.
pub fn compute_freshness_on(
    arrival_date: Option<NaiveDate>,
    freshness_days: i64,
    today: NaiveDate,
) -> FreshnessReport {
    let percentage = calculate_freshness_percentage_on(arrival_date, freshness_days, today);
    let status = get_freshness_status(percentage);

    FreshnessReport {
        percentage,
        status,
        label: format!("{} ({}%)", status, percentage),
    }
}

/// Percentage, status and label together, as of the local calendar day.
pub fn compute_freshness(arrival_date: Option<NaiveDate>, freshness_days: i64) -> FreshnessReport {
    compute_freshness_on(arrival_date, freshness_days, today())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn days_ago(today: NaiveDate, n: i64) -> Option<NaiveDate> {
        Some(today - Duration::days(n))
    }

    #[test]
    fn test_arrival_today_is_fully_fresh() {
        let today = day(2026, 4, 15);
        assert_eq!(calculate_freshness_percentage_on(Some(today), 10, today), 100);
    }

    #[test]
    fn test_shelf_life_used_up_is_zero() {
        let today = day(2026, 4, 15);
        assert_eq!(calculate_freshness_percentage_on(days_ago(today, 10), 10, today), 0);
        assert_eq!(calculate_freshness_percentage_on(days_ago(today, 11), 10, today), 0);
    }

    #[test]
    fn test_half_of_shelf_life_is_fifty_and_acceptable() {
        let today = day(2026, 4, 15);
        let pct = calculate_freshness_percentage_on(days_ago(today, 5), 10, today);
        assert_eq!(pct, 50);
        assert_eq!(get_freshness_status(pct), FreshnessStatus::Acceptable);
    }

    #[test]
    fn test_future_arrival_is_fully_fresh() {
        let today = day(2026, 4, 15);
        let next_week = Some(today + Duration::days(7));
        assert_eq!(calculate_freshness_percentage_on(next_week, 1, today), 100);
        assert_eq!(calculate_freshness_percentage_on(next_week, 30, today), 100);
    }

    #[test]
    fn test_degenerate_inputs_are_zero() {
        let today = day(2026, 4, 15);
        assert_eq!(calculate_freshness_percentage_on(None, 10, today), 0);
        assert_eq!(calculate_freshness_percentage_on(Some(today), 0, today), 0);
        assert_eq!(calculate_freshness_percentage_on(Some(today), -3, today), 0);
        // Degenerate window wins even for future arrivals
        assert_eq!(
            calculate_freshness_percentage_on(Some(today + Duration::days(2)), 0, today),
            0
        );
    }

    #[test]
    fn test_far_past_is_clamped_not_negative() {
        let today = day(2026, 4, 15);
        assert_eq!(calculate_freshness_percentage_on(Some(day(1999, 1, 1)), 7, today), 0);
    }

    #[test]
    fn test_rounds_half_up() {
        let today = day(2026, 4, 15);
        // 1 of 8 days: 87.5 → 88
        assert_eq!(calculate_freshness_percentage_on(days_ago(today, 1), 8, today), 88);
        // 3 of 8 days: 62.5 → 63
        assert_eq!(calculate_freshness_percentage_on(days_ago(today, 3), 8, today), 63);
        // 1 of 3 days: 66.67 → 67
        assert_eq!(calculate_freshness_percentage_on(days_ago(today, 1), 3, today), 67);
        // 2 of 3 days: 33.33 → 33
        assert_eq!(calculate_freshness_percentage_on(days_ago(today, 2), 3, today), 33);
    }

    #[test]
    fn test_day_boundary_crosses_month() {
        let today = day(2026, 3, 2);
        // Feb 2026 has 28 days: Feb 27 → Mar 2 is 3 days
        assert_eq!(calculate_freshness_percentage_on(Some(day(2026, 2, 27)), 10, today), 70);
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(get_freshness_status(100), FreshnessStatus::Fresh);
        assert_eq!(get_freshness_status(70), FreshnessStatus::Fresh);
        assert_eq!(get_freshness_status(69), FreshnessStatus::Acceptable);
        assert_eq!(get_freshness_status(40), FreshnessStatus::Acceptable);
        assert_eq!(get_freshness_status(39), FreshnessStatus::Expired);
        assert_eq!(get_freshness_status(0), FreshnessStatus::Expired);
    }

    #[test]
    fn test_label_format() {
        let today = day(2026, 4, 15);
        assert_eq!(get_freshness_label_on(Some(today), 5, today), "Fresh (100%)");
        assert_eq!(get_freshness_label_on(days_ago(today, 5), 10, today), "Acceptable (50%)");
        assert_eq!(get_freshness_label_on(None, 5, today), "Expired (0%)");
    }

    #[test]
    fn test_compute_freshness_fields_agree() {
        let today = day(2026, 4, 15);
        let report = compute_freshness_on(days_ago(today, 2), 10, today);
        assert_eq!(report.percentage, 80);
        assert_eq!(report.status, FreshnessStatus::Fresh);
        assert_eq!(report.label, "Fresh (80%)");
    }

    #[test]
    fn test_wall_clock_variant_matches_pure_variant() {
        let now = today();
        assert_eq!(calculate_freshness_percentage(Some(now), 10), 100);
        assert_eq!(
            compute_freshness(days_ago(now, 5), 10),
            compute_freshness_on(days_ago(now, 5), 10, now)
        );
    }

    #[test]
    fn test_status_serializes_screaming_case() {
        let json = serde_json::to_string(&FreshnessStatus::Acceptable).unwrap();
        assert_eq!(json, "\"ACCEPTABLE\"");
    }
}
