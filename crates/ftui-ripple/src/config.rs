#![forbid(unsafe_code)]

//! Immutable timing and geometry constants for a ripple instance.
//!
//! A [`RippleConfig`] is injected once at construction and never mutated
//! afterwards. All durations and scale factors used by the geometry
//! calculator and the timing estimator come from here.

use std::fmt;

use web_time::Duration;

/// Smallest accepted [`RippleConfig::opacity_duration_divisor`].
pub const MIN_OPACITY_DURATION_DIVISOR: f64 = 1e-3;

/// Constants driving ripple geometry and deactivation timing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RippleConfig {
    /// Extra radius added to the surface diagonal (default: 10.0).
    pub padding: f64,
    /// Fraction of the larger surface dimension used as the initial
    /// foreground size (default: 0.6).
    pub initial_origin_scale: f64,
    /// Delay before the unbounded foreground starts growing (default: 80ms).
    pub fg_transform_delay: Duration,
    /// Time for the foreground to reach full opacity while pressed (default: 110ms).
    pub active_opacity_duration: Duration,
    /// Floor for the unbounded fade-out (default: 200ms).
    pub min_opacity_duration: Duration,
    /// Divisor applied to the fade-out duration (default: 3.0).
    pub opacity_duration_divisor: f64,
    /// Transform duration used for unbounded deactivation (default: 200ms).
    pub unbounded_transform_duration: Duration,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            padding: 10.0,
            initial_origin_scale: 0.6,
            fg_transform_delay: Duration::from_millis(80),
            active_opacity_duration: Duration::from_millis(110),
            min_opacity_duration: Duration::from_millis(200),
            opacity_duration_divisor: 3.0,
            unbounded_transform_duration: Duration::from_millis(200),
        }
    }
}

impl RippleConfig {
    /// Check that every constant is usable by the geometry and timing math.
    pub fn validate(&self) -> Result<(), RippleConfigError> {
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(RippleConfigError::InvalidPadding {
                padding: self.padding,
            });
        }
        if !(self.initial_origin_scale > 0.0 && self.initial_origin_scale <= 1.0) {
            return Err(RippleConfigError::InvalidOriginScale {
                scale: self.initial_origin_scale,
            });
        }
        if !(self.opacity_duration_divisor.is_finite()
            && self.opacity_duration_divisor >= MIN_OPACITY_DURATION_DIVISOR)
        {
            return Err(RippleConfigError::InvalidOpacityDivisor {
                divisor: self.opacity_duration_divisor,
            });
        }
        if self.active_opacity_duration.is_zero() {
            return Err(RippleConfigError::ZeroActiveOpacityDuration);
        }
        Ok(())
    }
}

/// Reason a [`RippleConfig`] was rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RippleConfigError {
    InvalidPadding { padding: f64 },
    InvalidOriginScale { scale: f64 },
    InvalidOpacityDivisor { divisor: f64 },
    ZeroActiveOpacityDuration,
}

impl fmt::Display for RippleConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPadding { padding } => {
                write!(f, "padding must be finite and >= 0 (got {padding})")
            }
            Self::InvalidOriginScale { scale } => {
                write!(f, "initial origin scale must be in (0, 1] (got {scale})")
            }
            Self::InvalidOpacityDivisor { divisor } => {
                write!(
                    f,
                    "opacity duration divisor must be finite and >= {MIN_OPACITY_DURATION_DIVISOR} (got {divisor})"
                )
            }
            Self::ZeroActiveOpacityDuration => {
                write!(f, "active opacity duration must be non-zero")
            }
        }
    }
}

impl std::error::Error for RippleConfigError {}
