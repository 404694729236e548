//! Load every configured source once and log a headline summary.

use std::sync::Arc;

use dotenvy::dotenv;
use marketing_intel::config::{DashboardDefaults, DataConfig};
use marketing_intel::logging;
use marketing_intel::models::{Dimension, FilterSpec, Targets};
use marketing_intel::pipeline::{
    channel_breakdown, data_quality_report, default_date_range, executive_summary, filter,
};
use marketing_intel::services::FileSystemSource;
use marketing_intel::DataLoader;
use tracing::{info, warn};

fn main() {
    dotenv().ok();
    logging::init_logging();

    let config = DataConfig::from_env();
    let defaults = DashboardDefaults::default();
    let loader = DataLoader::new(config, Arc::new(FileSystemSource), None);
    info!(
        data_dir = %loader.config().data_dir.display(),
        channels = loader.config().channels.len(),
        "Loading marketing sources"
    );
    let data = loader.load_all();

    for source in data
        .marketing
        .sources
        .iter()
        .chain(std::iter::once(&data.business.source))
    {
        if !source.found {
            warn!(source = %source.source, path = %source.path.display(), "Source unavailable");
            continue;
        }
        info!(
            source = %source.source,
            rows = source.stats.rows_kept,
            dropped = source.stats.rows_dropped,
            numeric_defaults = source.stats.numeric_defaults,
            "Source loaded"
        );
    }

    let Some(range) = default_date_range(data.unified(), defaults.lookback_days) else {
        warn!("No marketing rows loaded, nothing to summarise");
        return;
    };
    info!(start = %range.start, end = %range.end, "Default reporting window");

    let spec = FilterSpec::default().with_date_range(range.start, range.end);
    let marketing = filter(data.unified(), &spec);
    let business = filter(data.business(), &spec);
    let summary = executive_summary(&marketing, &business, &Targets::default());
    info!(
        spend = summary.total_spend,
        revenue = summary.total_revenue,
        attributed_revenue = summary.total_attributed_revenue,
        mer = summary.mer,
        blended_cac = summary.blended_cac,
        attributed_roas = summary.attributed_roas,
        contribution_after_ads = summary.contribution_after_ads,
        joined_days = summary.joined_days,
        "Headline KPIs"
    );

    for channel in channel_breakdown(&marketing) {
        info!(
            channel = channel.label(Dimension::Channel).unwrap_or_default(),
            spend = channel.spend,
            roas = channel.metrics.roas,
            "Channel"
        );
    }

    let quality = data_quality_report(data.unified(), data.business(), defaults.outlier_z_threshold);
    info!(
        revenue_delta = quality.reconciliation.delta,
        cpc_outliers = quality.cpc_outliers.rows.len(),
        "Data quality"
    );
}
