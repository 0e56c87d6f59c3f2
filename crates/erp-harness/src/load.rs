//! Staged-ramp load test
//!
//! Virtual users (VUs) loop over the record list endpoints with a shared
//! bearer token. The number of running VUs follows a ramp of stages; each
//! stage moves linearly from the previous target to its own target over its
//! duration. Every request is recorded and the run is judged against
//! latency and error-rate thresholds.

use crate::error::{HarnessError, HarnessResult};
use erp_client::ApiClient;
use erp_core::{Config, config::LoadConfig};
use parking_lot::Mutex;
use serde::Serialize;
use std::{fmt, str::FromStr, sync::Arc, time::Duration};
use tokio::{
    task::JoinSet,
    time::{Instant, MissedTickBehavior, interval, sleep},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One ramp stage: reach `target` VUs over `duration`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    /// Time to reach the target
    pub duration: Duration,
    /// VU count at the end of the stage
    pub target: u32,
}

impl Stage {
    /// Create a stage
    pub const fn new(duration: Duration, target: u32) -> Self {
        Self { duration, target }
    }
}

impl FromStr for Stage {
    type Err = HarnessError;

    /// Parse `DURATION:TARGET`, e.g. `2m:10` or `30s:0`
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (duration, target) = input
            .split_once(':')
            .ok_or_else(|| HarnessError::invalid_stage(input, "expected DURATION:TARGET"))?;
        let duration = parse_duration(duration.trim())
            .map_err(|reason| HarnessError::invalid_stage(input, reason))?;
        let target = target
            .trim()
            .parse()
            .map_err(|_| HarnessError::invalid_stage(input, "target is not a whole number"))?;
        Ok(Self { duration, target })
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s→{}", self.duration.as_secs_f64(), self.target)
    }
}

/// Parse `500ms`, `30s`, `2m` or `1h`
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| format!("missing unit in '{input}'"))?;
    let (value, unit) = input.split_at(split);
    let value: u64 = value
        .parse()
        .map_err(|_| format!("invalid number in '{input}'"))?;
    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value.saturating_mul(60))),
        "h" => Ok(Duration::from_secs(value.saturating_mul(3600))),
        other => Err(format!("unknown unit '{other}'")),
    }
}

/// The ramp `2m→10`, `5m→20`, `2m→0`
pub fn default_stages() -> Vec<Stage> {
    vec![
        Stage::new(Duration::from_secs(120), 10),
        Stage::new(Duration::from_secs(300), 20),
        Stage::new(Duration::from_secs(120), 0),
    ]
}

/// Sequence of stages starting from zero VUs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ramp {
    stages: Vec<Stage>,
}

impl Ramp {
    /// Ramp over `stages`
    pub const fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// Same ramp with every duration multiplied by `scale`
    #[must_use]
    pub fn scaled(&self, scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self {
            stages: self
                .stages
                .iter()
                .map(|stage| Stage::new(stage.duration.mul_f64(scale), stage.target))
                .collect(),
        }
    }

    /// Stages in order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Length of the whole ramp
    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|stage| stage.duration).sum()
    }

    /// Highest target of any stage
    pub fn peak(&self) -> u32 {
        self.stages.iter().map(|stage| stage.target).max().unwrap_or(0)
    }

    /// VU count the ramp asks for `elapsed` after the start
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn target_vus_at(&self, elapsed: Duration) -> u32 {
        let mut start = Duration::ZERO;
        let mut from = 0_u32;

        for stage in &self.stages {
            let end = start + stage.duration;
            if elapsed < end {
                let progress =
                    (elapsed - start).as_secs_f64() / stage.duration.as_secs_f64();
                let from_f = f64::from(from);
                let value = (f64::from(stage.target) - from_f).mul_add(progress, from_f);
                return value.round().max(0.0) as u32;
            }
            start = end;
            from = stage.target;
        }
        from
    }
}

impl Default for Ramp {
    fn default() -> Self {
        Self::new(default_stages())
    }
}

/// Value at percentile `p` (0-100) of ascending `sorted`, interpolating between ranks
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let Some(last) = sorted.len().checked_sub(1) else {
        return 0.0;
    };
    let rank = (p.clamp(0.0, 100.0) / 100.0) * last as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let (Some(low), Some(high)) = (sorted.get(lower), sorted.get(upper)) else {
        return 0.0;
    };
    (high - low).mul_add(rank - lower as f64, *low)
}

/// One recorded request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Time to response
    pub latency: Duration,
    /// Whether the response was 2xx
    pub ok: bool,
}

/// Samples appended by every VU
#[derive(Debug, Default)]
pub struct SampleLog {
    samples: Mutex<Vec<Sample>>,
}

impl SampleLog {
    /// Append a sample
    pub fn record(&self, sample: Sample) {
        self.samples.lock().push(sample);
    }

    /// Number of samples so far
    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.samples.lock().is_empty()
    }

    /// Take every sample, leaving the log empty
    pub fn take(&self) -> Vec<Sample> {
        std::mem::take(&mut *self.samples.lock())
    }
}

/// Aggregated result of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    /// Requests sent
    pub requests: usize,
    /// Requests that failed or returned non-2xx
    pub failures: usize,
    /// `failures / requests`, 0 when nothing was sent
    pub error_rate: f64,
    /// Median latency in milliseconds
    pub p50_ms: f64,
    /// 95th percentile latency in milliseconds
    pub p95_ms: f64,
    /// 99th percentile latency in milliseconds
    pub p99_ms: f64,
    /// Slowest request in milliseconds
    pub max_ms: f64,
    /// Most VUs running at once
    pub peak_vus: usize,
    /// Wall time of the run in seconds
    pub duration_secs: f64,
}

impl LoadReport {
    /// Summarise `samples`
    #[allow(clippy::cast_precision_loss)]
    pub fn from_samples(samples: &[Sample], duration: Duration, peak_vus: usize) -> Self {
        let mut latencies: Vec<f64> = samples
            .iter()
            .map(|sample| sample.latency.as_secs_f64() * 1000.0)
            .collect();
        latencies.sort_by(f64::total_cmp);

        let failures = samples.iter().filter(|sample| !sample.ok).count();
        let error_rate = if samples.is_empty() {
            0.0
        } else {
            failures as f64 / samples.len() as f64
        };

        Self {
            requests: samples.len(),
            failures,
            error_rate,
            p50_ms: percentile(&latencies, 50.0),
            p95_ms: percentile(&latencies, 95.0),
            p99_ms: percentile(&latencies, 99.0),
            max_ms: latencies.last().copied().unwrap_or(0.0),
            peak_vus,
            duration_secs: duration.as_secs_f64(),
        }
    }

    /// Requests per second over the run
    #[allow(clippy::cast_precision_loss)]
    pub fn throughput(&self) -> f64 {
        if self.duration_secs > 0.0 {
            self.requests as f64 / self.duration_secs
        } else {
            0.0
        }
    }
}

/// Pass/fail limits of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// p95 latency must stay below this, in milliseconds
    pub p95_ms: f64,
    /// Error rate must stay below this
    pub max_error_rate: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::from(&LoadConfig::default())
    }
}

impl From<&LoadConfig> for Thresholds {
    #[allow(clippy::cast_precision_loss)]
    fn from(config: &LoadConfig) -> Self {
        Self {
            p95_ms: config.p95_threshold_ms as f64,
            max_error_rate: config.max_error_rate,
        }
    }
}

/// Verdict on one threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdResult {
    /// Threshold expression, e.g. `p(95)<2000`
    pub name: String,
    /// Measured value
    pub observed: f64,
    /// Limit
    pub limit: f64,
    /// Whether the measurement is below the limit
    pub passed: bool,
}

impl Thresholds {
    /// Judge `report`
    pub fn evaluate(&self, report: &LoadReport) -> Vec<ThresholdResult> {
        vec![
            ThresholdResult {
                name: format!("http_req_duration p(95)<{}", self.p95_ms),
                observed: report.p95_ms,
                limit: self.p95_ms,
                passed: report.p95_ms < self.p95_ms,
            },
            ThresholdResult {
                name: format!("http_req_failed rate<{}", self.max_error_rate),
                observed: report.error_rate,
                limit: self.max_error_rate,
                passed: report.error_rate < self.max_error_rate,
            },
        ]
    }
}

/// What every VU requests and with which token
#[derive(Clone)]
pub struct LoadTarget {
    http: reqwest::Client,
    base_url: Arc<str>,
    token: Arc<str>,
    paths: Arc<[String]>,
}

impl LoadTarget {
    /// Target with a token obtained elsewhere
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        token: Arc<str>,
        paths: Vec<String>,
        timeout: Duration,
    ) -> HarnessResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(erp_client::ClientError::Transport)?;
        Ok(Self {
            http,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            token,
            paths: paths.into(),
        })
    }

    /// Sign in to `api.base_url` once and target the list endpoint of every configured resource
    ///
    /// # Errors
    ///
    /// Returns an error if sign-in fails.
    pub async fn connect(config: &Config) -> HarnessResult<Self> {
        let timeout = Duration::from_secs(config.api.request_timeout);
        let client = ApiClient::from_config(&config.api)?;
        client
            .login(&config.api.username, &config.api.password)
            .await?;
        let token = client
            .token()
            .ok_or_else(|| HarnessError::setup("login returned no token"))?;

        let paths = config
            .harness
            .resources
            .iter()
            .map(|resource| format!("/api/{resource}"))
            .collect();
        Self::new(client.base_url(), token, paths, timeout)
    }

    /// Paths requested in rotation
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    async fn request(&self, n: usize) -> Sample {
        let path = self
            .paths
            .get(n % self.paths.len().max(1))
            .map_or("/health", String::as_str);
        let url = format!("{}{path}", self.base_url);

        let started = Instant::now();
        let ok = match self.http.get(&url).bearer_auth(&*self.token).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(%url, error = %e, "request failed");
                false
            }
        };
        Sample {
            latency: started.elapsed(),
            ok,
        }
    }
}

impl fmt::Debug for LoadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadTarget")
            .field("base_url", &self.base_url)
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

/// Timing of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Pause between iterations of one VU
    pub think_time: Duration,
    /// How often the VU count is adjusted to the ramp
    pub tick: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            think_time: Duration::from_secs(1),
            tick: Duration::from_millis(100),
        }
    }
}

async fn virtual_user(
    id: usize,
    target: LoadTarget,
    samples: Arc<SampleLog>,
    stop: CancellationToken,
    think_time: Duration,
) {
    debug!(vu = id, "virtual user started");
    let mut iteration = id;
    loop {
        let sample = tokio::select! {
            () = stop.cancelled() => break,
            sample = target.request(iteration) => sample,
        };
        samples.record(sample);
        iteration = iteration.wrapping_add(1);

        tokio::select! {
            () = stop.cancelled() => break,
            () = sleep(think_time) => {}
        }
    }
    debug!(vu = id, "virtual user stopped");
}

/// Drive VUs along `ramp` until it ends or `shutdown` fires
pub async fn run_load(
    target: LoadTarget,
    ramp: &Ramp,
    options: RunOptions,
    shutdown: CancellationToken,
) -> LoadReport {
    let samples = Arc::new(SampleLog::default());
    let mut tasks = JoinSet::new();
    let mut running: Vec<CancellationToken> = Vec::new();
    let mut spawned = 0_usize;
    let mut peak = 0_usize;

    let total = ramp.total_duration();
    let mut ticker = interval(options.tick.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let started = Instant::now();

    info!(
        stages = ramp.stages().len(),
        total_secs = total.as_secs_f64(),
        peak = ramp.peak(),
        "load test started"
    );

    loop {
        tokio::select! {
            () = shutdown.cancelled() => {
                warn!("load test interrupted");
                break;
            }
            _ = ticker.tick() => {}
        }

        let elapsed = started.elapsed();
        if elapsed >= total {
            break;
        }

        let wanted = ramp.target_vus_at(elapsed) as usize;
        while running.len() < wanted {
            let stop = shutdown.child_token();
            tasks.spawn(virtual_user(
                spawned,
                target.clone(),
                Arc::clone(&samples),
                stop.clone(),
                options.think_time,
            ));
            running.push(stop);
            spawned += 1;
        }
        while running.len() > wanted {
            if let Some(stop) = running.pop() {
                stop.cancel();
            }
        }
        peak = peak.max(running.len());
    }

    for stop in &running {
        stop.cancel();
    }
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "virtual user task failed");
        }
    }

    let report = LoadReport::from_samples(&samples.take(), started.elapsed(), peak);
    info!(
        requests = report.requests,
        failures = report.failures,
        p95_ms = report.p95_ms,
        "load test finished"
    );
    report
}
