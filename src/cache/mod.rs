//! Snapshot loading with write-once memoisation keyed by source modification time.

use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::DataConfig;
use crate::ingest::{ingest_business_with_stats, ingest_channel_with_stats, IngestStats, RawTable};
use crate::metrics::Metrics;
use crate::models::{BusinessRecord, Channel, DailyMarketingAggregate, MarketingRecord};
use crate::pipeline::{aggregate_daily, build_unified};
use crate::services::SourceProvider;

const BUSINESS_SOURCE: &str = "business";

/// Identity of one source file's contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotKey {
    pub path: PathBuf,
    /// `None` when the file does not exist.
    pub modified: Option<SystemTime>,
}

/// Write-once memoisation table.
///
/// An entry is never replaced once stored; a changed input produces a different key instead.
/// Keys it supersedes can be dropped on insert with [`Memo::insert_superseding`].
#[derive(Debug)]
pub struct Memo<K, V> {
    entries: RwLock<HashMap<K, Arc<V>>>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash, V> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    /// Store `value` unless `key` is already present, and return whichever value is stored.
    pub fn insert(&self, key: K, value: V) -> Arc<V> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.entry(key).or_insert_with(|| Arc::new(value)).clone()
    }

    /// Like [`Memo::insert`], but first drops every other entry for which `superseded` holds.
    pub fn insert_superseding<F>(&self, key: K, value: V, superseded: F) -> Arc<V>
    where
        F: Fn(&K) -> bool,
    {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.retain(|existing, _| *existing == key || !superseded(existing));
        entries.entry(key).or_insert_with(|| Arc::new(value)).clone()
    }

    pub fn get_or_insert_with<F: FnOnce() -> V>(&self, key: K, compute: F) -> Arc<V> {
        if let Some(value) = self.get(&key) {
            return value;
        }
        self.insert(key, compute())
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ingestion outcome for one source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub path: PathBuf,
    pub found: bool,
    pub stats: IngestStats,
}

/// Unified marketing table and its daily aggregate, built from one set of channel snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketingSnapshot {
    pub unified: Vec<MarketingRecord>,
    pub daily: Vec<DailyMarketingAggregate>,
    pub sources: Vec<SourceReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessSnapshot {
    pub records: Vec<BusinessRecord>,
    pub source: SourceReport,
}

/// Everything the views work from.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub marketing: Arc<MarketingSnapshot>,
    pub business: Arc<BusinessSnapshot>,
}

impl LoadedData {
    pub fn unified(&self) -> &[MarketingRecord] {
        &self.marketing.unified
    }

    pub fn daily(&self) -> &[DailyMarketingAggregate] {
        &self.marketing.daily
    }

    pub fn business(&self) -> &[BusinessRecord] {
        &self.business.records
    }

    /// Unified marketing, business and daily marketing tables.
    pub fn tables(&self) -> (&[MarketingRecord], &[BusinessRecord], &[DailyMarketingAggregate]) {
        (self.unified(), self.business(), self.daily())
    }
}

type MarketingKey = Vec<(Channel, SnapshotKey)>;

/// Loads source snapshots through a provider, reusing results while files are unchanged.
pub struct DataLoader {
    config: DataConfig,
    source: Arc<dyn SourceProvider + Send + Sync>,
    metrics: Option<Arc<Metrics>>,
    marketing: Memo<MarketingKey, MarketingSnapshot>,
    business: Memo<SnapshotKey, BusinessSnapshot>,
}

impl DataLoader {
    pub fn new(
        config: DataConfig,
        source: Arc<dyn SourceProvider + Send + Sync>,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        Self {
            config,
            source,
            metrics,
            marketing: Memo::new(),
            business: Memo::new(),
        }
    }

    pub fn config(&self) -> &DataConfig {
        &self.config
    }

    /// Number of memoised marketing and business snapshots.
    pub fn cached_snapshots(&self) -> usize {
        self.marketing.len() + self.business.len()
    }

    fn snapshot_key(&self, path: &Path) -> SnapshotKey {
        SnapshotKey {
            path: path.to_path_buf(),
            modified: self.source.modified(path),
        }
    }

    fn record_cache(&self, hit: bool) {
        if let Some(metrics) = &self.metrics {
            if hit {
                metrics.snapshot_cache_hits_total.inc();
            } else {
                metrics.snapshot_cache_misses_total.inc();
            }
        }
    }

    fn record_ingest(&self, source: &str, stats: &IngestStats) {
        if let Some(metrics) = &self.metrics {
            metrics
                .source_rows_ingested_total
                .with_label_values(&[source])
                .inc_by(stats.rows_kept as u64);
            metrics
                .source_rows_dropped_total
                .with_label_values(&[source])
                .inc_by(stats.rows_dropped as u64);
        }
    }

    /// Read one source. A missing file is an empty table; a failing read is an empty table
    /// flagged as failed so the result is not memoised.
    fn read_source(&self, name: &str, key: &SnapshotKey) -> (RawTable, bool) {
        if key.modified.is_none() {
            info!(source = %name, path = %key.path.display(), "source file not found, using empty table");
            return (RawTable::default(), false);
        }
        match self.source.read(&key.path) {
            Ok(table) => (table, false),
            Err(e) => {
                warn!(
                    source = %name,
                    path = %e.path().display(),
                    error = %e,
                    "failed to read source, using empty table"
                );
                (RawTable::default(), true)
            }
        }
    }

    pub fn load_marketing(&self) -> Arc<MarketingSnapshot> {
        let key: MarketingKey = self
            .config
            .channels
            .iter()
            .map(|c| (c.channel.clone(), self.snapshot_key(&c.path)))
            .collect();

        if let Some(snapshot) = self.marketing.get(&key) {
            self.record_cache(true);
            return snapshot;
        }
        self.record_cache(false);

        let mut failed = false;
        let mut sources = Vec::with_capacity(key.len());
        let mut outputs = Vec::with_capacity(key.len());
        for (channel, snapshot_key) in &key {
            let (raw, read_failed) = self.read_source(channel.as_str(), snapshot_key);
            failed |= read_failed;
            let (records, stats) = ingest_channel_with_stats(&raw, channel);
            self.record_ingest(channel.as_str(), &stats);
            info!(
                channel = %channel,
                rows = stats.rows_kept,
                dropped = stats.rows_dropped,
                numeric_defaults = stats.numeric_defaults,
                "loaded channel source"
            );
            sources.push(SourceReport {
                source: channel.to_string(),
                path: snapshot_key.path.clone(),
                found: snapshot_key.modified.is_some() && !read_failed,
                stats,
            });
            outputs.push(records);
        }

        let unified = build_unified(outputs);
        let daily = aggregate_daily(&unified);
        let snapshot = MarketingSnapshot {
            unified,
            daily,
            sources,
        };
        if failed {
            Arc::new(snapshot)
        } else {
            let same_sources = |other: &MarketingKey| {
                other.len() == key.len()
                    && other.iter().zip(&key).all(|((a, ka), (b, kb))| a == b && ka.path == kb.path)
            };
            self.marketing.insert_superseding(key.clone(), snapshot, same_sources)
        }
    }

    pub fn load_business(&self) -> Arc<BusinessSnapshot> {
        let key = self.snapshot_key(&self.config.business_path);
        if let Some(snapshot) = self.business.get(&key) {
            self.record_cache(true);
            return snapshot;
        }
        self.record_cache(false);

        let (raw, failed) = self.read_source(BUSINESS_SOURCE, &key);
        let (records, stats) = ingest_business_with_stats(&raw);
        self.record_ingest(BUSINESS_SOURCE, &stats);
        info!(
            rows = stats.rows_kept,
            dropped = stats.rows_dropped,
            numeric_defaults = stats.numeric_defaults,
            "loaded business source"
        );
        let snapshot = BusinessSnapshot {
            records,
            source: SourceReport {
                source: BUSINESS_SOURCE.to_string(),
                path: key.path.clone(),
                found: key.modified.is_some() && !failed,
                stats,
            },
        };
        if failed {
            Arc::new(snapshot)
        } else {
            let path = key.path.clone();
            self.business
                .insert_superseding(key, snapshot, |other| other.path == path)
        }
    }

    pub fn load_all(&self) -> LoadedData {
        LoadedData {
            marketing: self.load_marketing(),
            business: self.load_business(),
        }
    }
}
