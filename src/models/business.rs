use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::Record;

/// Pre-aggregated business totals for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub date: NaiveDate,
    pub orders: f64,
    pub new_orders: f64,
    pub new_customers: f64,
    pub total_revenue: f64,
    pub gross_profit: f64,
    pub cogs: f64,
}

impl BusinessRecord {
    pub const COLUMNS: [&'static str; 7] = [
        "date",
        "orders",
        "new_orders",
        "new_customers",
        "total_revenue",
        "gross_profit",
        "cogs",
    ];
    pub const MEASURES: [&'static str; 6] = [
        "orders",
        "new_orders",
        "new_customers",
        "total_revenue",
        "gross_profit",
        "cogs",
    ];

    pub fn totals(&self) -> BusinessTotals {
        BusinessTotals {
            orders: self.orders,
            new_customers: self.new_customers,
            total_revenue: self.total_revenue,
            gross_profit: self.gross_profit,
        }
    }
}

impl Record for BusinessRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn measure_names() -> &'static [&'static str] {
        &Self::MEASURES
    }

    fn measure(&self, name: &str) -> Option<f64> {
        match name {
            "orders" => Some(self.orders),
            "new_orders" => Some(self.new_orders),
            "new_customers" => Some(self.new_customers),
            "total_revenue" => Some(self.total_revenue),
            "gross_profit" => Some(self.gross_profit),
            "cogs" => Some(self.cogs),
            _ => None,
        }
    }
}

/// The business primitives every blended KPI is rebuilt from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BusinessTotals {
    pub orders: f64,
    pub new_customers: f64,
    pub total_revenue: f64,
    pub gross_profit: f64,
}
