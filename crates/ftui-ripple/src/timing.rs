#![forbid(unsafe_code)]

//! Timing estimator for unbounded deactivation.
//!
//! When an unbounded ripple is released, the fade-out should start from the
//! scale and opacity the foreground had visually reached, not snap to a
//! fixed state. [`estimate_unbounded_deactivation`] approximates that from
//! the time elapsed since activation.
//!
//! # Invariants
//!
//! 1. `approx_cur_scale` is 0 until `fg_transform_delay` has passed, then grows
//!    linearly and saturates at `fg_scale`.
//! 2. `approx_opacity` is non-decreasing in elapsed time and saturates at 1
//!    once `active_opacity_duration` has passed.
//! 3. `opacity_duration` never drops below `min_opacity_duration`.

use web_time::Duration;

use crate::config::RippleConfig;
use crate::geometry::LayoutMetrics;

/// Parameters for an unbounded fade-out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnboundedDeactivation {
    pub transform_duration: Duration,
    pub opacity_duration: Duration,
    pub approx_cur_scale: f64,
}

/// Approximate foreground opacity after `elapsed` of activation, in `[0, 1]`.
#[must_use]
pub fn approx_opacity(elapsed: Duration, config: &RippleConfig) -> f64 {
    let active = config.active_opacity_duration.as_secs_f64();
    if active <= 0.0 {
        return 1.0;
    }
    (elapsed.as_secs_f64() / active).min(1.0)
}

/// Approximate foreground scale after `elapsed` of activation.
#[must_use]
pub fn approx_scale(elapsed: Duration, metrics: &LayoutMetrics, config: &RippleConfig) -> f64 {
    if elapsed <= config.fg_transform_delay {
        return 0.0;
    }
    let growing_ms = (elapsed - config.fg_transform_delay).as_secs_f64() * 1000.0;
    let progress = if metrics.xf_duration_ms > 0.0 {
        (growing_ms / metrics.xf_duration_ms).min(1.0)
    } else {
        1.0
    };
    progress * metrics.fg_scale
}

/// Estimate fade-out parameters for a release `elapsed` after activation.
#[must_use]
pub fn estimate_unbounded_deactivation(
    elapsed: Duration,
    metrics: &LayoutMetrics,
    config: &RippleConfig,
) -> UnboundedDeactivation {
    let opacity = approx_opacity(elapsed, config);
    let scaled_ms = 1000.0 * opacity / config.opacity_duration_divisor;
    // Out-of-range results saturate; NaN and negatives fall to the floor.
    let opacity_duration = Duration::try_from_secs_f64(scaled_ms / 1000.0)
        .unwrap_or(if scaled_ms > 0.0 {
            Duration::MAX
        } else {
            Duration::ZERO
        })
        .max(config.min_opacity_duration);
    UnboundedDeactivation {
        transform_duration: config.unbounded_transform_duration,
        opacity_duration,
        approx_cur_scale: approx_scale(elapsed, metrics, config),
    }
}
