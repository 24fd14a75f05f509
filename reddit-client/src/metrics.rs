use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiMetrics {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub rate_limited_requests: u64,
    pub total_response_time: Duration,
    pub last_request_time: Option<SystemTime>,
    pub requests_by_endpoint: HashMap<String, EndpointMetrics>,
}

impl ApiMetrics {
    pub fn average_response_time(&self) -> Duration {
        average(self.total_response_time, self.total_requests)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointMetrics {
    pub request_count: u64,
    pub success_count: u64,
    pub error_count: u64,
    pub total_response_time: Duration,
    pub min_response_time: Duration,
    pub max_response_time: Duration,
}

/// Outcome of a single API call.
#[derive(Debug, Clone)]
pub struct RequestMetrics {
    /// Endpoint label with ids stripped, e.g. `/comments`.
    pub endpoint: String,
    pub method: String,
    pub status_code: Option<u16>,
    pub response_time: Duration,
    pub success: bool,
    pub rate_limited: bool,
}

impl EndpointMetrics {
    fn new() -> Self {
        Self {
            request_count: 0,
            success_count: 0,
            error_count: 0,
            total_response_time: Duration::ZERO,
            min_response_time: Duration::MAX,
            max_response_time: Duration::ZERO,
        }
    }

    fn update(&mut self, metrics: &RequestMetrics) {
        self.request_count += 1;
        self.total_response_time += metrics.response_time;
        self.min_response_time = self.min_response_time.min(metrics.response_time);
        self.max_response_time = self.max_response_time.max(metrics.response_time);

        if metrics.success {
            self.success_count += 1;
        } else {
            self.error_count += 1;
        }
    }

    pub fn average_response_time(&self) -> Duration {
        average(self.total_response_time, self.request_count)
    }

    pub fn success_rate(&self) -> f64 {
        if self.request_count == 0 {
            0.0
        } else {
            self.success_count as f64 / self.request_count as f64
        }
    }
}

fn average(total: Duration, count: u64) -> Duration {
    if count == 0 {
        Duration::ZERO
    } else {
        total / u32::try_from(count).unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Default)]
pub struct MetricsCollector {
    metrics: RwLock<ApiMetrics>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_request(&self, request_metrics: RequestMetrics) {
        debug!(
            method = %request_metrics.method,
            endpoint = %request_metrics.endpoint,
            status = request_metrics.status_code.unwrap_or_default(),
            elapsed_ms = request_metrics.response_time.as_millis() as u64,
            "Request recorded"
        );
        let mut metrics = self.metrics.write().await;

        metrics.total_requests += 1;
        metrics.total_response_time += request_metrics.response_time;
        metrics.last_request_time = Some(SystemTime::now());

        if request_metrics.success {
            metrics.successful_requests += 1;
        } else {
            metrics.failed_requests += 1;
        }
        if request_metrics.rate_limited {
            metrics.rate_limited_requests += 1;
        }

        metrics
            .requests_by_endpoint
            .entry(request_metrics.endpoint.clone())
            .or_insert_with(EndpointMetrics::new)
            .update(&request_metrics);
    }

    pub async fn get_metrics(&self) -> ApiMetrics {
        self.metrics.read().await.clone()
    }

    pub async fn get_endpoint_metrics(&self, endpoint: &str) -> Option<EndpointMetrics> {
        self.metrics
            .read()
            .await
            .requests_by_endpoint
            .get(endpoint)
            .cloned()
    }

    pub async fn reset_metrics(&self) {
        *self.metrics.write().await = ApiMetrics::default();
    }

    pub async fn export_metrics(&self) -> Result<String, serde_json::Error> {
        let metrics = self.get_metrics().await;
        serde_json::to_string_pretty(&metrics)
    }

    /// Emit one debug line per endpoint plus the totals.
    pub async fn log_summary(&self) {
        let metrics = self.metrics.read().await;
        for (endpoint, stats) in &metrics.requests_by_endpoint {
            debug!(
                endpoint = %endpoint,
                requests = stats.request_count,
                success_rate = stats.success_rate(),
                avg_ms = stats.average_response_time().as_millis() as u64,
                "Endpoint metrics"
            );
        }
        debug!(
            total = metrics.total_requests,
            failed = metrics.failed_requests,
            rate_limited = metrics.rate_limited_requests,
            avg_ms = metrics.average_response_time().as_millis() as u64,
            "API metrics"
        );
    }
}
