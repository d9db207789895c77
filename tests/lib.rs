//! Shared helpers for the cross-crate integration tests.

use platform_chaos::{Endpoint, FaultInjector, FaultInjectorConfig, FaultKind};
use platform_db::Dataset;

/// Fault injector with zero latency and a fixed seed.
pub fn seeded_injector(seed: u64) -> FaultInjector {
    FaultInjector::new(FaultInjectorConfig {
        enabled: true,
        ..FaultInjectorConfig::quiet().with_seed(seed)
    })
}

/// Per-kind tallies from repeated checks of one endpoint.
#[derive(Debug, Default)]
pub struct Tally {
    pub calls: u32,
    pub internal_errors: u32,
    pub unavailable: u32,
    pub gateway_timeouts: u32,
}

impl Tally {
    pub fn faults(&self) -> u32 {
        self.internal_errors + self.unavailable + self.gateway_timeouts
    }

    pub fn fault_rate(&self) -> f64 {
        f64::from(self.faults()) / f64::from(self.calls)
    }

    pub fn share(&self, count: u32) -> f64 {
        f64::from(count) / f64::from(self.faults())
    }
}

pub fn roll(injector: &FaultInjector, endpoint: Endpoint, calls: u32) -> Tally {
    let mut tally = Tally {
        calls,
        ..Tally::default()
    };
    for _ in 0..calls {
        match injector.check(endpoint) {
            Ok(()) => {}
            Err(FaultKind::InternalError) => tally.internal_errors += 1,
            Err(FaultKind::Unavailable) => tally.unavailable += 1,
            Err(FaultKind::GatewayTimeout) => tally.gateway_timeouts += 1,
        }
    }
    tally
}

/// The built-in dataset, validated.
pub fn sample_dataset() -> Dataset {
    let dataset = Dataset::builtin();
    if let Err(err) = dataset.validate() {
        panic!("built-in fixture is invalid: {err}");
    }
    dataset
}
