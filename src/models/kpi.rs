use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::business::BusinessTotals;
use super::record::{AdVolume, Dimension, Record};

/// Ratio metrics derived from advertising volume.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub ctr: f64,
    pub cpc: f64,
    pub cpm: f64,
    pub roas: f64,
}

/// A row of any table with its derived metrics appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Derived<R> {
    #[serde(flatten)]
    pub record: R,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
}

impl<R: Record> Record for Derived<R> {
    fn date(&self) -> NaiveDate {
        self.record.date()
    }

    fn label(&self, dimension: Dimension) -> Option<&str> {
        self.record.label(dimension)
    }

    fn dimensions() -> &'static [Dimension] {
        R::dimensions()
    }

    fn measure_names() -> &'static [&'static str] {
        R::measure_names()
    }

    fn measure(&self, name: &str) -> Option<f64> {
        match name {
            "ctr" => Some(self.metrics.ctr),
            "cpc" => Some(self.metrics.cpc),
            "cpm" => Some(self.metrics.cpm),
            "roas" => Some(self.metrics.roas),
            _ => self.record.measure(name),
        }
    }
}

impl<R: AdVolume> AdVolume for Derived<R> {
    fn impressions(&self) -> f64 {
        self.record.impressions()
    }
    fn clicks(&self) -> f64 {
        self.record.clicks()
    }
    fn spend(&self) -> f64 {
        self.record.spend()
    }
    fn attributed_revenue(&self) -> f64 {
        self.record.attributed_revenue()
    }
}

/// Daily marketing totals joined with business totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendedDailyKpi {
    pub date: NaiveDate,
    pub spend: f64,
    pub attributed_revenue: f64,
    pub orders: f64,
    pub new_customers: f64,
    pub total_revenue: f64,
    pub gross_profit: f64,
    pub mer: f64,
    pub blended_cac: f64,
    pub aov: f64,
    pub gross_margin_pct: f64,
    pub contribution_after_ads: f64,
    pub profit_roas: f64,
}

impl BlendedDailyKpi {
    pub const MEASURES: [&'static str; 12] = [
        "spend",
        "attributed_revenue",
        "orders",
        "new_customers",
        "total_revenue",
        "gross_profit",
        "mer",
        "blended_cac",
        "aov",
        "gross_margin_pct",
        "contribution_after_ads",
        "profit_roas",
    ];

    pub fn business_totals(&self) -> BusinessTotals {
        BusinessTotals {
            orders: self.orders,
            new_customers: self.new_customers,
            total_revenue: self.total_revenue,
            gross_profit: self.gross_profit,
        }
    }
}

impl Record for BlendedDailyKpi {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn measure_names() -> &'static [&'static str] {
        &Self::MEASURES
    }

    fn measure(&self, name: &str) -> Option<f64> {
        match name {
            "spend" => Some(self.spend),
            "attributed_revenue" => Some(self.attributed_revenue),
            "orders" => Some(self.orders),
            "new_customers" => Some(self.new_customers),
            "total_revenue" => Some(self.total_revenue),
            "gross_profit" => Some(self.gross_profit),
            "mer" => Some(self.mer),
            "blended_cac" => Some(self.blended_cac),
            "aov" => Some(self.aov),
            "gross_margin_pct" => Some(self.gross_margin_pct),
            "contribution_after_ads" => Some(self.contribution_after_ads),
            "profit_roas" => Some(self.profit_roas),
            _ => None,
        }
    }
}
