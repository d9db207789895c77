use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{ChaosError, ChaosResult};

/// Share of the error rate that turns into `InternalError`.
const INTERNAL_SHARE: f64 = 0.4;
/// Cumulative share covering `InternalError` and `Unavailable`.
const UNAVAILABLE_SHARE: f64 = 0.7;

/// Transient failure categories the injector can select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    InternalError,
    Unavailable,
    GatewayTimeout,
}

impl FaultKind {
    pub const fn status_code(self) -> u16 {
        match self {
            FaultKind::InternalError => 500,
            FaultKind::Unavailable => 503,
            FaultKind::GatewayTimeout => 504,
        }
    }

    /// Human readable detail sent back to the caller.
    pub const fn detail(self) -> &'static str {
        match self {
            FaultKind::InternalError => "Internal server error - database timeout",
            FaultKind::Unavailable => "Service temporarily unavailable",
            FaultKind::GatewayTimeout => "Gateway timeout",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            FaultKind::InternalError => "internal_error",
            FaultKind::Unavailable => "unavailable",
            FaultKind::GatewayTimeout => "gateway_timeout",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability in `[0, 1]` that a call fails.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ErrorRate(f64);

impl ErrorRate {
    pub const NEVER: Self = Self(0.0);
    pub const ALWAYS: Self = Self(1.0);

    pub fn new(rate: f64) -> ChaosResult<Self> {
        if (0.0..=1.0).contains(&rate) {
            Ok(Self(rate))
        } else {
            Err(ChaosError::InvalidRate(rate))
        }
    }

    /// Only for compile-time constants already known to be in range.
    pub(crate) const fn fixed(rate: f64) -> Self {
        Self(rate)
    }

    pub const fn value(self) -> f64 {
        self.0
    }

    /// Map a uniform sample `r` in `[0, 1)` onto an outcome. The interval is
    /// split at `0.4p`, `0.7p` and `p`; anything at or above `p` passes.
    pub fn classify(self, r: f64) -> Option<FaultKind> {
        let p = self.0;
        if r < p * INTERNAL_SHARE {
            Some(FaultKind::InternalError)
        } else if r < p * UNAVAILABLE_SHARE {
            Some(FaultKind::Unavailable)
        } else if r < p {
            Some(FaultKind::GatewayTimeout)
        } else {
            None
        }
    }
}

impl FromStr for ErrorRate {
    type Err = ChaosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rate = s
            .trim()
            .parse::<f64>()
            .map_err(|_| ChaosError::UnparsableRate(s.to_string()))?;
        Self::new(rate)
    }
}
