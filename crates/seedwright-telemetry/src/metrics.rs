//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! Every collector lives in a private registry owned by [`Metrics`]; handlers only see
//! the recording methods below.

use std::sync::Arc;
use std::time::Duration;

use prometheus::core::Collector;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{CollectorStage, Result, TelemetryError};

/// Cloneable handle onto the Seedwright collectors.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    directory_listings_total: IntCounter,
    torrent_jobs_total: IntCounterVec,
    torrent_jobs_in_flight: IntGauge,
    torrent_job_last_duration_ms: IntGauge,
    downloads_total: IntCounterVec,
    uploads_total: IntCounter,
}

/// Terminal outcome label recorded for a torrent creation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcomeLabel {
    /// The external tool exited with status zero.
    Succeeded,
    /// The external tool ran but did not exit cleanly.
    Failed,
    /// The external tool could not be started.
    LaunchFailed,
}

impl JobOutcomeLabel {
    /// Stable label value used in the exposition format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::LaunchFailed => "launch_failed",
        }
    }
}

/// Point-in-time values embedded in the health document.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Total directory listings served.
    pub directory_listings_total: u64,
    /// Jobs currently awaiting their external process.
    pub torrent_jobs_in_flight: i64,
    /// Wall-clock duration (ms) of the most recently finished job.
    pub torrent_job_last_duration_ms: i64,
    /// Total uploads stored.
    pub uploads_total: u64,
}

impl Metrics {
    /// Create a fresh registry holding every Seedwright collector.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Collector`] naming the first collector Prometheus rejects.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = install(
            &registry,
            "http_requests_total",
            "Total HTTP requests received",
            |opts| IntCounterVec::new(opts, &["route", "code"]),
        )?;
        let directory_listings_total = install(
            &registry,
            "directory_listings_total",
            "Directory listings produced by the browser",
            IntCounter::with_opts,
        )?;
        let torrent_jobs_total = install(
            &registry,
            "torrent_jobs_total",
            "Torrent creation jobs finished by outcome",
            |opts| IntCounterVec::new(opts, &["outcome"]),
        )?;
        let torrent_jobs_in_flight = install(
            &registry,
            "torrent_jobs_in_flight",
            "Torrent creation jobs awaiting the external tool",
            IntGauge::with_opts,
        )?;
        let torrent_job_last_duration_ms = install(
            &registry,
            "torrent_job_last_duration_ms",
            "Duration of the most recently finished torrent job (ms)",
            IntGauge::with_opts,
        )?;
        let downloads_total = install(
            &registry,
            "downloads_total",
            "Artifact download requests by outcome",
            |opts| IntCounterVec::new(opts, &["outcome"]),
        )?;
        let uploads_total = install(
            &registry,
            "uploads_total",
            "Auxiliary files stored via upload",
            IntCounter::with_opts,
        )?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                directory_listings_total,
                torrent_jobs_total,
                torrent_jobs_in_flight,
                torrent_job_last_duration_ms,
                downloads_total,
                uploads_total,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Increment the directory listing counter.
    pub fn inc_directory_listing(&self) {
        self.inner.directory_listings_total.inc();
    }

    /// Mark a job as started; pair with [`Metrics::job_finished`].
    pub fn job_started(&self) {
        self.inner.torrent_jobs_in_flight.inc();
    }

    /// Record the terminal outcome and duration of a job.
    pub fn job_finished(&self, outcome: JobOutcomeLabel, elapsed: Duration) {
        self.inner.torrent_jobs_in_flight.dec();
        self.inner
            .torrent_jobs_total
            .with_label_values(&[outcome.as_str()])
            .inc();
        self.inner
            .torrent_job_last_duration_ms
            .set(i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX));
    }

    /// Increment the download counter (`served`, `not_found`, `rejected`, `failed`).
    pub fn inc_download(&self, outcome: &str) {
        self.inner
            .downloads_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Increment the upload counter.
    pub fn inc_upload(&self) {
        self.inner.uploads_total.inc();
    }

    /// Text exposition of every collector, as served on `/metrics`.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Exposition`] or [`TelemetryError::ExpositionText`] when
    /// encoding fails.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.inner.registry.gather(), &mut buffer)
            .map_err(|source| TelemetryError::Exposition { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::ExpositionText { source })
    }

    /// Current values of the collectors reported by the health endpoint.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            directory_listings_total: self.inner.directory_listings_total.get(),
            torrent_jobs_in_flight: self.inner.torrent_jobs_in_flight.get(),
            torrent_job_last_duration_ms: self.inner.torrent_job_last_duration_ms.get(),
            uploads_total: self.inner.uploads_total.get(),
        }
    }
}

/// Build a collector from `metric`/`help` and add it to `registry`.
fn install<C, F>(registry: &Registry, metric: &'static str, help: &str, build: F) -> Result<C>
where
    C: Collector + Clone + 'static,
    F: FnOnce(Opts) -> prometheus::Result<C>,
{
    let collector = build(Opts::new(metric, help)).map_err(|source| TelemetryError::Collector {
        metric,
        stage: CollectorStage::Build,
        source,
    })?;
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::Collector {
            metric,
            stage: CollectorStage::Register,
            source,
        })?;
    Ok(collector)
}
