use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{Endpoint, ErrorRate, FaultKind, LatencyRange};

/// Knobs for the injector. Defaults reproduce the production profile:
/// faults on, 100ms..2s latency, entropy-seeded randomness.
#[derive(Clone, Debug)]
pub struct FaultInjectorConfig {
    /// When false, no fault is ever selected. Latency still applies.
    pub enabled: bool,
    pub latency: LatencyRange,
    /// Fixed seed for reproducible runs.
    pub seed: Option<u64>,
    /// Replaces every call-site error rate when set.
    pub error_rate_override: Option<ErrorRate>,
}

impl Default for FaultInjectorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            latency: LatencyRange::default(),
            seed: None,
            error_rate_override: None,
        }
    }
}

impl FaultInjectorConfig {
    /// No latency and no faults.
    pub const fn quiet() -> Self {
        Self {
            enabled: false,
            latency: LatencyRange::zero(),
            seed: None,
            error_rate_override: None,
        }
    }

    pub const fn with_latency(mut self, latency: LatencyRange) -> Self {
        self.latency = latency;
        self
    }

    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub const fn with_error_rate_override(mut self, rate: ErrorRate) -> Self {
        self.enabled = true;
        self.error_rate_override = Some(rate);
        self
    }
}

/// Snapshot of what the injector has done since startup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChaosStats {
    pub total_calls: u64,
    pub faults_injected: u64,
    pub internal_errors: u64,
    pub unavailable: u64,
    pub gateway_timeouts: u64,
    pub latency_samples: u64,
    pub total_latency_ms: u64,
}

impl ChaosStats {
    #[allow(clippy::cast_precision_loss)]
    pub fn actual_fault_rate(&self) -> f64 {
        if self.total_calls == 0 {
            0.0
        } else {
            self.faults_injected as f64 / self.total_calls as f64
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    calls: AtomicU64,
    internal_errors: AtomicU64,
    unavailable: AtomicU64,
    gateway_timeouts: AtomicU64,
    latency_samples: AtomicU64,
    latency_ms: AtomicU64,
}

impl Counters {
    fn record_fault(&self, kind: FaultKind) {
        let counter = match kind {
            FaultKind::InternalError => &self.internal_errors,
            FaultKind::Unavailable => &self.unavailable,
            FaultKind::GatewayTimeout => &self.gateway_timeouts,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> ChaosStats {
        let internal_errors = self.internal_errors.load(Ordering::Relaxed);
        let unavailable = self.unavailable.load(Ordering::Relaxed);
        let gateway_timeouts = self.gateway_timeouts.load(Ordering::Relaxed);
        ChaosStats {
            total_calls: self.calls.load(Ordering::Relaxed),
            faults_injected: internal_errors + unavailable + gateway_timeouts,
            internal_errors,
            unavailable,
            gateway_timeouts,
            latency_samples: self.latency_samples.load(Ordering::Relaxed),
            total_latency_ms: self.latency_ms.load(Ordering::Relaxed),
        }
    }
}

/// Makes an in-memory lookup behave like a flaky remote call.
///
/// The injector is shared by every request. Its random source sits behind a
/// mutex that is only held for a single draw, never across an `.await`.
#[derive(Debug)]
pub struct FaultInjector {
    config: FaultInjectorConfig,
    rng: Mutex<StdRng>,
    counters: Counters,
}

impl Default for FaultInjector {
    fn default() -> Self {
        Self::new(FaultInjectorConfig::default())
    }
}

impl FaultInjector {
    pub fn new(config: FaultInjectorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng: Mutex::new(rng),
            counters: Counters::default(),
        }
    }

    /// Draw a delay without sleeping.
    pub fn sample_latency(&self) -> Duration {
        let mut rng = self.rng.lock();
        self.config.latency.sample(&mut *rng)
    }

    /// Sleep for a random delay and report how long it was.
    #[allow(clippy::cast_possible_truncation)]
    pub async fn simulate_latency(&self) -> Duration {
        let delay = self.sample_latency();
        self.counters.latency_samples.fetch_add(1, Ordering::Relaxed);
        self.counters
            .latency_ms
            .fetch_add(delay.as_millis() as u64, Ordering::Relaxed);
        debug!(delay_ms = delay.as_millis() as u64, "simulating latency");
        tokio::time::sleep(delay).await;
        delay
    }

    fn draw(&self) -> f64 {
        self.rng.lock().gen_range(0.0..1.0)
    }

    fn effective_rate(&self, rate: ErrorRate) -> ErrorRate {
        self.config.error_rate_override.unwrap_or(rate)
    }

    /// Roll `error_rate` once. `Err` means the caller must stop and surface
    /// the fault instead of serving data.
    pub fn maybe_fail(&self, error_rate: ErrorRate) -> Result<(), FaultKind> {
        self.counters.calls.fetch_add(1, Ordering::Relaxed);
        if !self.config.enabled {
            return Ok(());
        }
        let rate = self.effective_rate(error_rate);
        match rate.classify(self.draw()) {
            Some(kind) => {
                self.counters.record_fault(kind);
                Err(kind)
            }
            None => Ok(()),
        }
    }

    /// Fault check for a known call site. Sites without an error rate
    /// always pass.
    pub fn check(&self, endpoint: Endpoint) -> Result<(), FaultKind> {
        let Some(rate) = endpoint.error_rate() else {
            return Ok(());
        };
        self.maybe_fail(rate).inspect_err(|kind| {
            warn!(
                endpoint = endpoint.label(),
                fault = %kind,
                status = kind.status_code(),
                "injected fault"
            );
        })
    }

    /// Latency followed by the fault check: the prologue of every data
    /// handler.
    pub async fn guard(&self, endpoint: Endpoint) -> Result<Duration, FaultKind> {
        let delay = self.simulate_latency().await;
        self.check(endpoint)?;
        Ok(delay)
    }

    /// Standalone probe used by the health check. Skips latency and can only
    /// produce `Unavailable`.
    pub fn health_probe(&self, rate: ErrorRate) -> Result<(), FaultKind> {
        self.counters.calls.fetch_add(1, Ordering::Relaxed);
        if !self.config.enabled {
            return Ok(());
        }
        let rate = self.effective_rate(rate);
        if self.draw() < rate.value() {
            self.counters.record_fault(FaultKind::Unavailable);
            warn!(endpoint = Endpoint::Health.label(), "injected health check failure");
            return Err(FaultKind::Unavailable);
        }
        Ok(())
    }

    pub fn stats(&self) -> ChaosStats {
        self.counters.snapshot()
    }
}
