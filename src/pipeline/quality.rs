//! Coverage, zero counts, revenue reconciliation and CPC outliers over the loaded sources.

use chrono::NaiveDate;
use serde::Serialize;

use super::derived::safe_div;
use crate::models::{BusinessRecord, Channel, MarketingRecord, Record};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Coverage {
    pub rows: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl Coverage {
    fn of<R: Record>(rows: &[R]) -> Self {
        Self {
            rows: rows.len(),
            first_date: rows.iter().map(Record::date).min(),
            last_date: rows.iter().map(Record::date).max(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnQuality {
    pub column: String,
    pub nulls: usize,
    pub zeros: usize,
}

fn column_quality<R: Record>(rows: &[R], columns: &[&str]) -> Vec<ColumnQuality> {
    columns
        .iter()
        .map(|column| {
            let values = rows.iter().map(|row| row.measure(column));
            let (nulls, zeros) = values.fold((0, 0), |(nulls, zeros), value| match value {
                None => (nulls + 1, zeros),
                Some(v) if v == 0.0 => (nulls, zeros + 1),
                Some(_) => (nulls, zeros),
            });
            ColumnQuality {
                column: column.to_string(),
                nulls,
                zeros,
            }
        })
        .collect()
}

/// Platform-attributed revenue against what the business actually booked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RevenueReconciliation {
    pub platform_attributed_revenue: f64,
    pub business_revenue: f64,
    /// Business minus platform.
    pub delta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierStatus {
    NoMarketingData,
    NoClickedRows,
    ZeroDeviation,
    Evaluated,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpcOutlier {
    pub date: NaiveDate,
    pub channel: Channel,
    pub tactic: String,
    pub state: String,
    pub campaign: String,
    pub clicks: f64,
    pub spend: f64,
    pub cpc: f64,
    pub cpc_z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpcOutliers {
    pub status: OutlierStatus,
    pub threshold: f64,
    pub mean_cpc: Option<f64>,
    pub std_cpc: Option<f64>,
    /// Largest `|z|` first.
    pub rows: Vec<CpcOutlier>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataQualityReport {
    pub marketing: Coverage,
    pub business: Coverage,
    pub marketing_columns: Vec<ColumnQuality>,
    pub business_columns: Vec<ColumnQuality>,
    pub reconciliation: RevenueReconciliation,
    pub cpc_outliers: CpcOutliers,
}

pub fn data_quality_report(
    marketing: &[MarketingRecord],
    business: &[BusinessRecord],
    z_threshold: f64,
) -> DataQualityReport {
    let platform_attributed_revenue: f64 = marketing.iter().map(|r| r.attributed_revenue).sum();
    let business_revenue: f64 = business.iter().map(|r| r.total_revenue).sum();

    DataQualityReport {
        marketing: Coverage::of(marketing),
        business: Coverage::of(business),
        marketing_columns: column_quality(marketing, &MarketingRecord::MEASURES),
        business_columns: column_quality(business, &BusinessRecord::MEASURES),
        reconciliation: RevenueReconciliation {
            platform_attributed_revenue,
            business_revenue,
            delta: business_revenue - platform_attributed_revenue,
        },
        cpc_outliers: cpc_outliers(marketing, z_threshold),
    }
}

/// Rows whose CPC sits more than `threshold` population standard deviations from the mean.
///
/// Only rows with clicks contribute to the mean and deviation.
pub fn cpc_outliers(marketing: &[MarketingRecord], threshold: f64) -> CpcOutliers {
    let empty = |status: OutlierStatus| CpcOutliers {
        status,
        threshold,
        mean_cpc: None,
        std_cpc: None,
        rows: Vec::new(),
    };
    if marketing.is_empty() {
        return empty(OutlierStatus::NoMarketingData);
    }

    let clicked: Vec<(&MarketingRecord, f64)> = marketing
        .iter()
        .filter(|r| r.clicks > 0.0)
        .map(|r| (r, safe_div(r.spend, r.clicks)))
        .collect();
    if clicked.is_empty() {
        return empty(OutlierStatus::NoClickedRows);
    }

    let n = clicked.len() as f64;
    let mean = clicked.iter().map(|(_, cpc)| cpc).sum::<f64>() / n;
    let variance = clicked.iter().map(|(_, cpc)| (cpc - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();
    if std == 0.0 || !std.is_finite() {
        return CpcOutliers {
            mean_cpc: Some(mean),
            std_cpc: Some(std),
            ..empty(OutlierStatus::ZeroDeviation)
        };
    }

    let mut rows: Vec<CpcOutlier> = clicked
        .into_iter()
        .filter_map(|(record, cpc)| {
            let cpc_z = (cpc - mean) / std;
            (cpc_z.abs() > threshold).then(|| CpcOutlier {
                date: record.date,
                channel: record.channel.clone(),
                tactic: record.tactic.clone(),
                state: record.state.clone(),
                campaign: record.campaign.clone(),
                clicks: record.clicks,
                spend: record.spend,
                cpc,
                cpc_z,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.cpc_z.abs().total_cmp(&a.cpc_z.abs()));

    CpcOutliers {
        status: OutlierStatus::Evaluated,
        threshold,
        mean_cpc: Some(mean),
        std_cpc: Some(std),
        rows,
    }
}
