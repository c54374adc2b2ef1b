use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

pub const OUTCOME_CACHE_HIT: &str = "cache_hit";
pub const OUTCOME_FETCHED: &str = "fetched";
pub const OUTCOME_ERROR: &str = "error";

static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Lazily builds the process-wide metrics registry.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

/// Prometheus text exposition of every registered metric.
pub async fn render_metrics() -> anyhow::Result<String> {
    let metrics = get_metrics().await;
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&metrics.registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Caller facing
    pub token_requests: IntCounterVec,
    pub invalidations: IntCounter,

    // Acquisition
    pub acquisition_attempts: IntCounterVec,
    pub acquisition_failures: IntCounterVec,
    pub acquisition_duration: HistogramVec,

    // Cache
    pub token_expiry_unix: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        Arc::new(Self::build().unwrap_or_else(|e| {
            // metric definitions are static, a failure here means a programming error
            panic!("invalid metric definition: {e}")
        }))
    }

    fn build() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some("tokenmanager".into()), None)?;

        let metrics = Self {
            token_requests: IntCounterVec::new(Opts::new("token_requests_total", "Token requests by outcome"), &["outcome"])?,
            invalidations: IntCounter::new("token_invalidations_total", "Explicit token invalidations")?,

            acquisition_attempts: IntCounterVec::new(Opts::new("acquisition_attempts_total", "Requests sent to token endpoints"), &["encoding"])?,
            acquisition_failures: IntCounterVec::new(Opts::new("acquisition_failures_total", "Per-endpoint acquisition failures by reason"), &["reason"])?,
            acquisition_duration: HistogramVec::new(HistogramOpts::new("acquisition_duration_seconds", "Full acquisition duration seconds").buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 15.0, 30.0, 90.0]), &["result"])?,

            token_expiry_unix: IntGauge::new("token_expiry_unix_seconds", "Expiry of the cached token, 0 when unknown")?,

            registry,
        };

        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_requests.clone()))?;
        reg.register(Box::new(metrics.invalidations.clone()))?;
        reg.register(Box::new(metrics.acquisition_attempts.clone()))?;
        reg.register(Box::new(metrics.acquisition_failures.clone()))?;
        reg.register(Box::new(metrics.acquisition_duration.clone()))?;
        reg.register(Box::new(metrics.token_expiry_unix.clone()))?;

        Ok(metrics)
    }
}
