//! Prometheus metrics for the API server and the ingestion pipeline.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    pub source_rows_ingested_total: IntCounterVec,
    pub source_rows_dropped_total: IntCounterVec,
    pub snapshot_cache_hits_total: IntCounter,
    pub snapshot_cache_misses_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight = IntGauge::new(
            "http_requests_in_flight",
            "Number of HTTP requests currently being served",
        )?;
        let source_rows_ingested_total = IntCounterVec::new(
            Opts::new(
                "source_rows_ingested_total",
                "Rows kept after ingesting a source file",
            ),
            &["source"],
        )?;
        let source_rows_dropped_total = IntCounterVec::new(
            Opts::new(
                "source_rows_dropped_total",
                "Rows dropped at ingestion because the date did not parse",
            ),
            &["source"],
        )?;
        let snapshot_cache_hits_total = IntCounter::new(
            "snapshot_cache_hits_total",
            "Loads served from the snapshot cache",
        )?;
        let snapshot_cache_misses_total = IntCounter::new(
            "snapshot_cache_misses_total",
            "Loads that had to re-read source files",
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(source_rows_ingested_total.clone()))?;
        registry.register(Box::new(source_rows_dropped_total.clone()))?;
        registry.register(Box::new(snapshot_cache_hits_total.clone()))?;
        registry.register(Box::new(snapshot_cache_misses_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            source_rows_ingested_total,
            source_rows_dropped_total,
            snapshot_cache_hits_total,
            snapshot_cache_misses_total,
        })
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
