use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::{AdVolume, Dimension, Record};

/// Advertising platform a row was exported from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Channel {
    Facebook,
    Google,
    TikTok,
    Other(String),
}

impl Channel {
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "Facebook" => Channel::Facebook,
            "Google" => Channel::Google,
            "TikTok" => Channel::TikTok,
            other => Channel::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Channel::Facebook => "Facebook",
            Channel::Google => "Google",
            Channel::TikTok => "TikTok",
            Channel::Other(name) => name,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Channel {
    fn from(name: String) -> Self {
        Channel::from_name(&name)
    }
}

impl From<Channel> for String {
    fn from(channel: Channel) -> Self {
        channel.as_str().to_string()
    }
}

// Ordered by name so sorting matches the textual channel column.
impl Ord for Channel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Channel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One campaign-day observation from a channel export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingRecord {
    pub date: NaiveDate,
    pub channel: Channel,
    pub tactic: String,
    pub state: String,
    pub campaign: String,
    pub impressions: f64,
    pub clicks: f64,
    pub spend: f64,
    pub attributed_revenue: f64,
    /// Source columns outside the canonical schema, in source order. Serialised as trailing keys.
    #[serde(flatten, with = "trailing_columns")]
    pub extras: Vec<(String, String)>,
}

mod trailing_columns {
    use serde::de::{Deserializer, MapAccess, Visitor};
    use serde::ser::{SerializeMap, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(
        columns: &[(String, String)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(columns.len()))?;
        for (name, value) in columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, String)>, D::Error> {
        struct ColumnsVisitor;

        impl<'de> Visitor<'de> for ColumnsVisitor {
            type Value = Vec<(String, String)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of extra source columns")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut columns = Vec::new();
                while let Some((name, value)) = access.next_entry::<String, serde_json::Value>()? {
                    let value = match value {
                        serde_json::Value::String(s) => s,
                        serde_json::Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    columns.push((name, value));
                }
                Ok(columns)
            }
        }

        deserializer.deserialize_map(ColumnsVisitor)
    }
}

impl MarketingRecord {
    pub const COLUMNS: [&'static str; 9] = [
        "date",
        "channel",
        "tactic",
        "state",
        "campaign",
        "impressions",
        "clicks",
        "spend",
        "attributed_revenue",
    ];
    pub const MEASURES: [&'static str; 4] = ["impressions", "clicks", "spend", "attributed_revenue"];
}

impl Record for MarketingRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn label(&self, dimension: Dimension) -> Option<&str> {
        Some(match dimension {
            Dimension::Channel => self.channel.as_str(),
            Dimension::Tactic => &self.tactic,
            Dimension::State => &self.state,
            Dimension::Campaign => &self.campaign,
        })
    }

    fn dimensions() -> &'static [Dimension] {
        &Dimension::ALL
    }

    fn measure_names() -> &'static [&'static str] {
        &Self::MEASURES
    }

    fn measure(&self, name: &str) -> Option<f64> {
        match name {
            "impressions" => Some(self.impressions),
            "clicks" => Some(self.clicks),
            "spend" => Some(self.spend),
            "attributed_revenue" => Some(self.attributed_revenue),
            _ => None,
        }
    }
}

impl AdVolume for MarketingRecord {
    fn impressions(&self) -> f64 {
        self.impressions
    }
    fn clicks(&self) -> f64 {
        self.clicks
    }
    fn spend(&self) -> f64 {
        self.spend
    }
    fn attributed_revenue(&self) -> f64 {
        self.attributed_revenue
    }
}

/// All channels collapsed to one row per date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyMarketingAggregate {
    pub date: NaiveDate,
    pub impressions: f64,
    pub clicks: f64,
    pub spend: f64,
    pub attributed_revenue: f64,
}

impl DailyMarketingAggregate {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            impressions: 0.0,
            clicks: 0.0,
            spend: 0.0,
            attributed_revenue: 0.0,
        }
    }
}

impl Record for DailyMarketingAggregate {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn measure_names() -> &'static [&'static str] {
        &MarketingRecord::MEASURES
    }

    fn measure(&self, name: &str) -> Option<f64> {
        match name {
            "impressions" => Some(self.impressions),
            "clicks" => Some(self.clicks),
            "spend" => Some(self.spend),
            "attributed_revenue" => Some(self.attributed_revenue),
            _ => None,
        }
    }
}

impl AdVolume for DailyMarketingAggregate {
    fn impressions(&self) -> f64 {
        self.impressions
    }
    fn clicks(&self) -> f64 {
        self.clicks
    }
    fn spend(&self) -> f64 {
        self.spend
    }
    fn attributed_revenue(&self) -> f64 {
        self.attributed_revenue
    }
}
