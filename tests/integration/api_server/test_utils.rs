//! Test utilities for API server integration tests

use axum_test::TestServer;
use marketing_intel::config::{DashboardDefaults, DataConfig};
use marketing_intel::core::http::{create_router, AppState};
use marketing_intel::metrics::Metrics;
use marketing_intel::models::Channel;
use marketing_intel::services::FileSystemSource;
use marketing_intel::DataLoader;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const HEADER: &str = "date,tactic,state,campaign,impression,clicks,spend,attributed revenue\n";

pub const GOOGLE_ROWS: &str = "2024-01-01,Search,CA,Brand,1000,50,100,300\n\
                               2024-01-02,Search,NY,Generic,2000,40,200,200\n\
                               2024-01-03,Display,CA,Brand,500,5,50,25\n";
pub const FACEBOOK_ROWS: &str = "2024-01-01,Social,TX,Prospecting,4000,80,40,200\n\
                                 2024-01-04,Social,CA,Retargeting,1000,20,10,60\n";
pub const BUSINESS_ROWS: &str = "2024-01-01,10,8,5,500,200,300\n\
                                 2024-01-02,4,2,2,300,150,150\n\
                                 2024-01-03,6,3,3,240,90,150\n";

/// Write channel and business fixtures into a fresh directory.
pub fn write_fixtures() -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(dir.path().join("Google.csv"), format!("{HEADER}{GOOGLE_ROWS}"))
        .expect("write Google.csv");
    fs::write(dir.path().join("Facebook.csv"), format!("{HEADER}{FACEBOOK_ROWS}"))
        .expect("write Facebook.csv");
    fs::write(
        dir.path().join("business.csv"),
        format!(
            "date,# of orders,# of new orders,new customers,total revenue,gross profit,COGS\n{BUSINESS_ROWS}"
        ),
    )
    .expect("write business.csv");
    dir
}

/// Test helper for API server integration tests
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub data_dir: TempDir,
}

impl TestApiServer {
    pub async fn new() -> Self {
        let data_dir = write_fixtures();
        let config = DataConfig::new(
            data_dir.path(),
            &[Channel::Facebook, Channel::Google, Channel::TikTok],
        );
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let loader = Arc::new(DataLoader::new(
            config,
            Arc::new(FileSystemSource),
            Some(metrics.clone()),
        ));
        let state = AppState::new(loader, metrics.clone(), DashboardDefaults::default());

        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");

        Self {
            server,
            metrics,
            data_dir,
        }
    }
}
