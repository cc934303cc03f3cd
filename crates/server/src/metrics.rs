//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the titlerank server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Snapshot polling outcomes and size
//! - Catalog rebuilds
//! - Torrent actions dispatched upstream

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use regex_lite::Regex;
use tracing::warn;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "titlerank_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("titlerank_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "titlerank_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Snapshot Metrics
// =============================================================================

/// Snapshot fetches by result ("ok" or "error").
pub static SNAPSHOT_POLLS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "titlerank_snapshot_polls_total",
            "Release snapshot fetches by result",
        ),
        &["result"],
    )
    .unwrap()
});

/// Releases in the current snapshot.
pub static SNAPSHOT_RELEASES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "titlerank_snapshot_releases",
        "Number of releases in the current snapshot",
    )
    .unwrap()
});

/// Catalog rebuilds (snapshot or filter changed).
pub static CATALOG_REBUILDS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "titlerank_catalog_rebuilds_total",
        "Title catalog rebuilds since startup",
    )
    .unwrap()
});

// =============================================================================
// Action Metrics
// =============================================================================

/// Torrent actions by action name and result.
pub static TORRENT_ACTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "titlerank_torrent_actions_total",
            "Torrent actions dispatched upstream",
        ),
        &["action", "result"],
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Snapshot
    registry
        .register(Box::new(SNAPSHOT_POLLS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(SNAPSHOT_RELEASES.clone()))
        .unwrap();
    registry
        .register(Box::new(CATALOG_REBUILDS_TOTAL.clone()))
        .unwrap();

    // Actions
    registry
        .register(Box::new(TORRENT_ACTIONS_TOTAL.clone()))
        .unwrap();
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}

static HASH_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9a-fA-F]{40}").unwrap());

static TITLE_ACTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(/api/v1/titles/)[^/]+/(pause|resume|recheck|delete|category-change)$").unwrap()
});

/// Normalize a path for metric labels (replace hashes with placeholders).
pub fn normalize_path(path: &str) -> String {
    let result = HASH_REGEX.replace_all(path, "{hash}");
    let result = TITLE_ACTION_REGEX.replace_all(&result, "$1{hash}/$2");
    result.to_string()
}
