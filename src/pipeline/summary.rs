//! Headline KPIs and the lag-aware profit and trend views.

use chrono::NaiveDate;
use serde::Serialize;

use super::blend::{blend, lag_business_metrics};
use super::daily::aggregate_daily;
use super::derived::safe_div;
use super::filter::filter;
use super::frame::{rolling_average, Frame};
use crate::config::DashboardDefaults;
use crate::models::{AdVolume, BlendedDailyKpi, BusinessRecord, DateRange, FilterSpec, Record, Targets};

const PROFIT_ROLLING_COLUMNS: [&str; 2] = ["contribution_after_ads", "profit_roas"];
const TREND_ROLLING_COLUMNS: [&str; 4] = ["spend", "total_revenue", "mer", "blended_cac"];

/// Knobs shared by the time-series views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewOptions {
    pub rolling_window: usize,
    pub lag_days: usize,
    pub top_n: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self::from(&DashboardDefaults::default())
    }
}

impl From<&DashboardDefaults> for ViewOptions {
    fn from(defaults: &DashboardDefaults) -> Self {
        Self {
            rolling_window: defaults.rolling_window,
            lag_days: 0,
            top_n: defaults.top_n,
        }
    }
}

/// Distance from each configured target, positive when better than target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TargetDeltas {
    pub mer: Option<f64>,
    pub cac: Option<f64>,
    pub roas: Option<f64>,
    pub profit_roas: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ExecutiveSummary {
    pub total_spend: f64,
    /// Business revenue over days present in both sources.
    pub total_revenue: f64,
    pub total_attributed_revenue: f64,
    pub total_new_customers: f64,
    pub total_gross_profit: f64,
    pub contribution_after_ads: f64,
    pub mer: f64,
    pub blended_cac: f64,
    pub attributed_roas: f64,
    pub profit_roas: f64,
    pub joined_days: usize,
    pub deltas: TargetDeltas,
}

/// Totals for already filtered marketing rows against business rows for the same window.
///
/// Spend and attributed revenue cover every marketing row. Business figures only count days
/// that survive the join, so MER and CAC compare like with like.
pub fn executive_summary<R: Record + AdVolume>(
    marketing: &[R],
    business: &[BusinessRecord],
    targets: &Targets,
) -> ExecutiveSummary {
    let daily = aggregate_daily(marketing);
    let blended = blend(&daily, business);

    let total_spend: f64 = daily.iter().map(|d| d.spend).sum();
    let total_attributed_revenue: f64 = marketing.iter().map(AdVolume::attributed_revenue).sum();
    let total_revenue: f64 = blended.iter().map(|b| b.total_revenue).sum();
    let total_new_customers: f64 = blended.iter().map(|b| b.new_customers).sum();
    let total_gross_profit: f64 = blended.iter().map(|b| b.gross_profit).sum();
    let contribution_after_ads: f64 = blended.iter().map(|b| b.contribution_after_ads).sum();

    let mer = safe_div(total_revenue, total_spend);
    let blended_cac = safe_div(total_spend, total_new_customers);
    let attributed_roas = safe_div(total_attributed_revenue, total_spend);
    let profit_roas = safe_div(total_gross_profit, total_spend);

    ExecutiveSummary {
        total_spend,
        total_revenue,
        total_attributed_revenue,
        total_new_customers,
        total_gross_profit,
        contribution_after_ads,
        mer,
        blended_cac,
        attributed_roas,
        profit_roas,
        joined_days: blended.len(),
        deltas: TargetDeltas {
            mer: targets.mer.map(|t| mer - t),
            // lower CAC is better
            cac: targets.cac.map(|t| t - blended_cac),
            roas: targets.roas.map(|t| attributed_roas - t),
            profit_roas: targets.profit_roas.map(|t| profit_roas - t),
        },
    }
}

/// Relative change of each headline figure, `(current - previous) / previous`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryChanges {
    pub total_spend: f64,
    pub total_revenue: f64,
    pub total_attributed_revenue: f64,
    pub mer: f64,
    pub blended_cac: f64,
    pub attributed_roas: f64,
    pub profit_roas: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub current_range: DateRange,
    pub previous_range: DateRange,
    pub current: ExecutiveSummary,
    pub previous: ExecutiveSummary,
    pub changes: SummaryChanges,
}

/// Summarise the filtered window and the equally long window right before it.
///
/// `marketing` and `business` are unfiltered; category filters from `spec` apply to both
/// periods. Returns `None` when `spec` carries no date range or the previous window is not
/// representable.
pub fn compare_previous_period<R: Record + AdVolume + Clone>(
    marketing: &[R],
    business: &[BusinessRecord],
    spec: &FilterSpec,
    targets: &Targets,
) -> Option<PeriodComparison> {
    let current_range = spec.date_bounds()?;
    let previous_range = current_range.previous()?;
    let previous_spec = FilterSpec {
        date_range: vec![previous_range.start, previous_range.end],
        ..spec.clone()
    };

    let summarise = |spec: &FilterSpec| {
        executive_summary(&filter(marketing, spec), &filter(business, spec), targets)
    };
    let current = summarise(spec);
    let previous = summarise(&previous_spec);

    let change = |cur: f64, prev: f64| safe_div(cur - prev, prev);
    let changes = SummaryChanges {
        total_spend: change(current.total_spend, previous.total_spend),
        total_revenue: change(current.total_revenue, previous.total_revenue),
        total_attributed_revenue: change(
            current.total_attributed_revenue,
            previous.total_attributed_revenue,
        ),
        mer: change(current.mer, previous.mer),
        blended_cac: change(current.blended_cac, previous.blended_cac),
        attributed_roas: change(current.attributed_roas, previous.attributed_roas),
        profit_roas: change(current.profit_roas, previous.profit_roas),
    };

    Some(PeriodComparison {
        current_range,
        previous_range,
        current,
        previous,
        changes,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayCallout {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfitDay {
    pub date: NaiveDate,
    pub contribution_after_ads: f64,
    pub profit_roas: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitView {
    /// Lagged daily KPIs with contribution and profit ROAS smoothed.
    pub series: Frame,
    pub total_contribution: f64,
    pub avg_profit_roas: f64,
    pub avg_gross_margin_pct: f64,
    pub top_days: Vec<ProfitDay>,
    pub bottom_days: Vec<ProfitDay>,
}

/// Contribution and profit ROAS over time with best and worst days.
///
/// Totals and the day rankings use the lagged, unsmoothed rows.
pub fn profit_view(blended: &[BlendedDailyKpi], options: &ViewOptions) -> ProfitView {
    let lagged = lag_business_metrics(blended, options.lag_days);
    let series = rolling_average(
        &Frame::from_records(&lagged),
        &PROFIT_ROLLING_COLUMNS,
        options.rolling_window,
    );

    let days = lagged.len() as f64;
    let total_contribution: f64 = lagged.iter().map(|r| r.contribution_after_ads).sum();
    let avg_profit_roas = safe_div(lagged.iter().map(|r| r.profit_roas).sum(), days);
    let avg_gross_margin_pct = safe_div(lagged.iter().map(|r| r.gross_margin_pct).sum(), days);

    let mut ranked: Vec<ProfitDay> = lagged
        .iter()
        .map(|r| ProfitDay {
            date: r.date,
            contribution_after_ads: r.contribution_after_ads,
            profit_roas: r.profit_roas,
        })
        .collect();
    ranked.sort_by(|a, b| b.contribution_after_ads.total_cmp(&a.contribution_after_ads));
    let top_days: Vec<ProfitDay> = ranked.iter().take(options.top_n).copied().collect();
    ranked.sort_by(|a, b| a.contribution_after_ads.total_cmp(&b.contribution_after_ads));
    let bottom_days: Vec<ProfitDay> = ranked.iter().take(options.top_n).copied().collect();

    ProfitView {
        series,
        total_contribution,
        avg_profit_roas,
        avg_gross_margin_pct,
        top_days,
        bottom_days,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendsView {
    /// Lagged daily KPIs with spend, revenue, MER and CAC smoothed.
    pub series: Frame,
    pub max_revenue_day: Option<DayCallout>,
    pub max_spend_day: Option<DayCallout>,
    pub min_cac_day: Option<DayCallout>,
}

/// Spend against business outcomes over time, with the notable days called out.
pub fn trends_view(blended: &[BlendedDailyKpi], options: &ViewOptions) -> TrendsView {
    let lagged = lag_business_metrics(blended, options.lag_days);
    let series = rolling_average(
        &Frame::from_records(&lagged),
        &TREND_ROLLING_COLUMNS,
        options.rolling_window,
    );

    TrendsView {
        series,
        max_revenue_day: extreme_day(&lagged, |r| r.total_revenue, |v, best| v > best),
        max_spend_day: extreme_day(&lagged, |r| r.spend, |v, best| v > best),
        min_cac_day: extreme_day(&lagged, |r| r.blended_cac, |v, best| v < best),
    }
}

// Earliest row wins ties.
fn extreme_day(
    rows: &[BlendedDailyKpi],
    value: impl Fn(&BlendedDailyKpi) -> f64,
    better: impl Fn(f64, f64) -> bool,
) -> Option<DayCallout> {
    rows.iter().fold(None, |best: Option<DayCallout>, row| {
        let v = value(row);
        match best {
            Some(b) if !better(v, b.value) => Some(b),
            _ => Some(DayCallout {
                date: row.date,
                value: v,
            }),
        }
    })
}
