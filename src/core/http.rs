//! JSON API over the marketing pipeline using Axum

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::cache::{DataLoader, LoadedData};
use crate::config::{DashboardDefaults, DataConfig};
use crate::metrics::Metrics;
use crate::models::{BusinessRecord, FilterSpec, MarketingRecord, Record, Targets};
use crate::pipeline::{
    aggregate_daily, available_filter_values, blend, campaign_breakdown, channel_breakdown,
    channel_daily_series, compare_previous_period, data_quality_report, default_date_range,
    executive_summary, filter, lag_business_metrics, profit_view, rolling_average_by,
    state_breakdown, tactic_breakdown, top_by, trends_view, with_derived_metrics, RankBy,
    ViewOptions,
};
use crate::services::FileSystemSource;

const CHANNEL_ROLLING_COLUMNS: [&str; 2] = ["spend", "roas"];

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub loader: Arc<DataLoader>,
    pub defaults: DashboardDefaults,
}

impl AppState {
    pub fn new(loader: Arc<DataLoader>, metrics: Arc<Metrics>, defaults: DashboardDefaults) -> Self {
        Self {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics,
            start_time: Arc::new(Instant::now()),
            loader,
            defaults,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "marketing-intel-api"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state.metrics.export().map_err(|e| {
        error!(error = %e, "Failed to export metrics");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Filters, targets and view options shared by every data endpoint.
///
/// List parameters are comma-separated. A date range applies when `start` or `end` is given;
/// the missing side defaults to the matching bound of the loaded data.
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub channels: Option<String>,
    pub tactics: Option<String>,
    pub states: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub target_mer: Option<f64>,
    pub target_cac: Option<f64>,
    pub target_roas: Option<f64>,
    pub target_profit_roas: Option<f64>,
    pub window: Option<usize>,
    pub lag: Option<usize>,
    pub top_n: Option<usize>,
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

impl ViewQuery {
    pub fn filter_spec(&self, marketing: &[MarketingRecord]) -> FilterSpec {
        let mut spec = FilterSpec::default()
            .with_channels(split_list(self.channels.as_deref()))
            .with_tactics(split_list(self.tactics.as_deref()))
            .with_states(split_list(self.states.as_deref()));

        if self.start.is_some() || self.end.is_some() {
            let first = marketing.iter().map(Record::date).min();
            let last = marketing.iter().map(Record::date).max();
            if let (Some(start), Some(end)) = (self.start.or(first), self.end.or(last)) {
                spec = spec.with_date_range(start, end);
            } else if let Some(day) = self.start.or(self.end) {
                spec = spec.with_date_range(day, day);
            }
        }
        spec
    }

    pub fn targets(&self) -> Targets {
        Targets {
            mer: self.target_mer,
            cac: self.target_cac,
            roas: self.target_roas,
            profit_roas: self.target_profit_roas,
        }
    }

    /// View options, rejecting a lag beyond what the dashboard allows.
    pub fn view_options(&self, defaults: &DashboardDefaults) -> Result<ViewOptions, StatusCode> {
        let lag_days = self.lag.unwrap_or(0);
        if lag_days > defaults.max_lag_days {
            return Err(StatusCode::BAD_REQUEST);
        }
        Ok(ViewOptions {
            rolling_window: self.window.unwrap_or(defaults.rolling_window),
            lag_days,
            top_n: self.top_n.unwrap_or(defaults.top_n),
        })
    }
}

/// Load through the snapshot cache off the async runtime.
async fn load(state: &AppState) -> Result<LoadedData, StatusCode> {
    let loader = state.loader.clone();
    tokio::task::spawn_blocking(move || loader.load_all())
        .await
        .map_err(|e| {
            error!(error = %e, "Data load task failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

struct Selection {
    spec: FilterSpec,
    marketing: Vec<MarketingRecord>,
    business: Vec<BusinessRecord>,
}

fn select(data: &LoadedData, query: &ViewQuery) -> Selection {
    let spec = query.filter_spec(data.unified());
    Selection {
        marketing: filter(data.unified(), &spec),
        business: filter(data.business(), &spec),
        spec,
    }
}

async fn get_filters(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let data = load(&state).await?;
    let values = available_filter_values(data.unified());
    let default_range = default_date_range(data.unified(), state.defaults.lookback_days);
    Ok(Json(json!({
        "values": values,
        "default_range": default_range,
        "max_lag_days": state.defaults.max_lag_days,
    })))
}

async fn get_marketing(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<Value>, StatusCode> {
    let data = load(&state).await?;
    let selection = select(&data, &query);
    Ok(Json(json!(with_derived_metrics(&selection.marketing))))
}

async fn get_blended(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<Value>, StatusCode> {
    let options = query.view_options(&state.defaults)?;
    let data = load(&state).await?;
    let selection = select(&data, &query);
    let blended = blend(&aggregate_daily(&selection.marketing), &selection.business);
    Ok(Json(json!(lag_business_metrics(&blended, options.lag_days))))
}

async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<Value>, StatusCode> {
    let data = load(&state).await?;
    let selection = select(&data, &query);
    let targets = query.targets();
    let summary = executive_summary(&selection.marketing, &selection.business, &targets);
    let previous =
        compare_previous_period(data.unified(), data.business(), &selection.spec, &targets);
    Ok(Json(json!({
        "summary": summary,
        "channels": channel_breakdown(&selection.marketing),
        "previous_period": previous,
    })))
}

async fn get_drilldown(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<Value>, StatusCode> {
    let data = load(&state).await?;
    let selection = select(&data, &query);
    Ok(Json(json!({
        "channels": channel_breakdown(&selection.marketing),
        "campaigns": campaign_breakdown(&selection.marketing),
    })))
}

async fn get_geo_tactic(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<Value>, StatusCode> {
    let options = query.view_options(&state.defaults)?;
    let data = load(&state).await?;
    let selection = select(&data, &query);
    let states = state_breakdown(&selection.marketing);
    Ok(Json(json!({
        "top_states_by_spend": top_by(&states, RankBy::Spend, options.top_n),
        "top_states_by_roas": top_by(&states, RankBy::Roas, options.top_n),
        "tactics": tactic_breakdown(&selection.marketing),
    })))
}

async fn get_trends(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<Value>, StatusCode> {
    let options = query.view_options(&state.defaults)?;
    let data = load(&state).await?;
    let selection = select(&data, &query);
    let blended = blend(&aggregate_daily(&selection.marketing), &selection.business);
    let channel_series = rolling_average_by(
        &channel_daily_series(&selection.marketing),
        "channel",
        &CHANNEL_ROLLING_COLUMNS,
        options.rolling_window,
    );
    Ok(Json(json!({
        "trends": trends_view(&blended, &options),
        "channels": channel_series,
    })))
}

async fn get_profit(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<Value>, StatusCode> {
    let options = query.view_options(&state.defaults)?;
    let data = load(&state).await?;
    let selection = select(&data, &query);
    let blended = blend(&aggregate_daily(&selection.marketing), &selection.business);
    Ok(Json(json!(profit_view(&blended, &options))))
}

async fn get_quality(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let data = load(&state).await?;
    let report = data_quality_report(
        data.unified(),
        data.business(),
        state.defaults.outlier_z_threshold,
    );
    let sources: Vec<_> = data
        .marketing
        .sources
        .iter()
        .chain(std::iter::once(&data.business.source))
        .collect();
    Ok(Json(json!({
        "report": report,
        "sources": sources,
    })))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/filters", get(get_filters))
        .route("/api/marketing", get(get_marketing))
        .route("/api/blended", get(get_blended))
        .route("/api/summary", get(get_summary))
        .route("/api/drilldown", get(get_drilldown))
        .route("/api/geo-tactic", get(get_geo_tactic))
        .route("/api/trends", get(get_trends))
        .route("/api/profit", get(get_profit))
        .route("/api/quality", get(get_quality))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let config = DataConfig::from_env();
    info!(
        data_dir = %config.data_dir.display(),
        channels = config.channels.len(),
        "Serving marketing data"
    );
    let loader = Arc::new(DataLoader::new(
        config,
        Arc::new(FileSystemSource),
        Some(metrics.clone()),
    ));

    let state = AppState::new(loader, metrics, DashboardDefaults::default());
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
