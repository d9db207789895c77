//! Fault injection primitives.
//!
//! Every data-access path of the API goes through a [`FaultInjector`]: it
//! first sleeps for a random delay, then rolls the endpoint's error rate and
//! either lets the call through or hands back a [`FaultKind`] that the caller
//! must propagate instead of touching the data.

mod endpoint;
mod fault;
mod injector;
mod latency;

use thiserror::Error;

pub use endpoint::Endpoint;
pub use fault::{ErrorRate, FaultKind};
pub use injector::{ChaosStats, FaultInjector, FaultInjectorConfig};
pub use latency::LatencyRange;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChaosError {
    #[error("error rate {0} is outside [0, 1]")]
    InvalidRate(f64),
    #[error("error rate {0:?} is not a number")]
    UnparsableRate(String),
    #[error("latency minimum {min_ms}ms exceeds maximum {max_ms}ms")]
    InvalidLatencyRange { min_ms: u128, max_ms: u128 },
}

pub type ChaosResult<T> = Result<T, ChaosError>;
