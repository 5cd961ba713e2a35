use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};

pub const MEMBERS_SCRAPED: &str = "legco_members_scraped_total";
pub const MEETINGS_DOWNLOADED: &str = "legco_meetings_downloaded_total";
pub const MEETINGS_SKIPPED: &str = "legco_meetings_skipped_total";
pub const MOTIONS: &str = "legco_motions_total";
pub const VOTES_UNRESOLVED: &str = "legco_votes_unresolved_total";
pub const PIPELINE_DURATION: &str = "legco_pipeline_duration_seconds";

/// Installs the global Prometheus recorder. Returns `None` if one is already installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Prometheus recorder install failed: {}", e);
            None
        }
    }
}

pub fn record_count(name: &'static str, year: &str, value: usize) {
    counter!(name, "year" => year.to_string()).increment(value as u64);
}

pub fn record_duration(pipeline: &'static str, secs: f64) {
    histogram!(PIPELINE_DURATION, "pipeline" => pipeline).record(secs);
}

/// Pushes the rendered registry to a Pushgateway. Failures are logged only.
pub async fn push_to_gateway(handle: &PrometheusHandle, base_url: &str) {
    let push_url = format!("{}/metrics/job/legco_scraper", base_url.trim_end_matches('/'));
    let body = handle.render();

    let result = reqwest::Client::new()
        .post(&push_url)
        .header("Content-Type", "text/plain; version=0.0.4")
        .body(body)
        .send()
        .await;

    match result {
        Ok(r) if r.status().is_success() => info!("Pushed metrics to {}", push_url),
        Ok(r) => warn!("Pushgateway responded with status {}", r.status().as_u16()),
        Err(e) => warn!("Failed to push metrics to {}: {}", push_url, e),
    }
}
