#![forbid(unsafe_code)]

//! Geometry calculator: surface measurements to ripple layout metrics.
//!
//! All functions here are pure and total. A zero-size surface is a valid
//! (degenerate) input: the initial size and scale come out as zero instead
//! of dividing by zero.
//!
//! # Formulas
//!
//! ```text
//! initial_size = initial_origin_scale * max(width, height)
//! max_radius   = sqrt(width² + height²) + padding
//! fg_scale     = max_radius / initial_size          (0 when initial_size == 0)
//! xf_duration  = 1000 * sqrt(max_radius / 1024) ms
//! ```

use crate::config::RippleConfig;

/// Radius at which the foreground transform takes exactly one second.
const XF_REFERENCE_RADIUS: f64 = 1024.0;

/// A point in surface or page space (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding box reported by the host, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    #[inline]
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// The size part of the box.
    #[inline]
    #[must_use]
    pub const fn frame(&self) -> Frame {
        Frame {
            width: self.width,
            height: self.height,
        }
    }
}

/// Last-measured surface size. Only the layout pass updates it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
}

impl Frame {
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Center of the surface in surface space.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Parameters derived from a [`Frame`] on every layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutMetrics {
    /// Diameter of the foreground at the start of the effect.
    pub initial_size: f64,
    /// Radius the effect must reach to cover the surface.
    pub max_radius: f64,
    /// Scale taking the foreground from `initial_size` to full coverage.
    pub fg_scale: f64,
    /// Foreground transform duration in milliseconds.
    pub xf_duration_ms: f64,
}

/// Offset placing a centered unbounded foreground.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UnboundedCoords {
    pub left: f64,
    pub top: f64,
}

/// Translation vectors for a bounded deactivation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundedTranslation {
    /// Foreground origin at the point of interaction.
    pub start: Point,
    /// Foreground origin at the surface center.
    pub end: Point,
}

/// Compute layout metrics for a measured frame.
#[must_use]
pub fn compute_layout_metrics(frame: Frame, config: &RippleConfig) -> LayoutMetrics {
    let max_dim = frame.width.max(frame.height);
    let diagonal = frame.width.hypot(frame.height);
    let initial_size = max_dim * config.initial_origin_scale;
    let max_radius = diagonal + config.padding;
    let fg_scale = if initial_size > 0.0 {
        max_radius / initial_size
    } else {
        0.0
    };
    LayoutMetrics {
        initial_size,
        max_radius,
        fg_scale,
        xf_duration_ms: 1000.0 * (max_radius / XF_REFERENCE_RADIUS).sqrt(),
    }
}

/// Rounded offset of a centered foreground of `initial_size`.
#[must_use]
pub fn unbounded_coords(frame: Frame, metrics: &LayoutMetrics) -> UnboundedCoords {
    let half = metrics.initial_size / 2.0;
    UnboundedCoords {
        left: (frame.width / 2.0 - half).round(),
        top: (frame.height / 2.0 - half).round(),
    }
}

/// Map a page-space position into surface space.
#[must_use]
pub fn normalized_event_coords(page: Point, viewport_offset: Point, bbox: BoundingBox) -> Point {
    let document_x = viewport_offset.x + bbox.left;
    let document_y = viewport_offset.y + bbox.top;
    Point::new(page.x - document_x, page.y - document_y)
}

/// Translation from `origin` (surface space) toward the surface center,
/// both offset so the foreground is centered on them.
#[must_use]
pub fn bounded_translation(
    frame: Frame,
    metrics: &LayoutMetrics,
    origin: Point,
) -> BoundedTranslation {
    let half = metrics.initial_size / 2.0;
    let center = frame.center();
    BoundedTranslation {
        start: Point::new(origin.x - half, origin.y - half),
        end: Point::new(center.x - half, center.y - half),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn metrics_for_wide_surface() {
        let m = compute_layout_metrics(Frame::new(100.0, 50.0), &RippleConfig::default());
        assert!(approx(m.initial_size, 60.0));
        assert!(approx(m.max_radius, 111.803_398_874_989_5 + 10.0));
        assert!(approx(m.fg_scale, m.max_radius / 60.0));
        assert!(approx(m.xf_duration_ms, 1000.0 * (m.max_radius / 1024.0).sqrt()));
    }

    #[test]
    fn metrics_use_larger_dimension() {
        let config = RippleConfig::default();
        let tall = compute_layout_metrics(Frame::new(20.0, 200.0), &config);
        assert!(approx(tall.initial_size, 120.0));
    }

    #[test]
    fn zero_frame_is_degenerate_not_failing() {
        let m = compute_layout_metrics(Frame::default(), &RippleConfig::default());
        assert_eq!(m.initial_size, 0.0);
        assert_eq!(m.fg_scale, 0.0);
        assert!(approx(m.max_radius, 10.0));
        assert!(m.xf_duration_ms.is_finite());
    }

    #[test]
    fn unbounded_coords_are_rounded() {
        let frame = Frame::new(41.0, 41.0);
        let m = compute_layout_metrics(frame, &RippleConfig::default());
        // initial 24.6, center 20.5 -> 8.2 -> 8
        let coords = unbounded_coords(frame, &m);
        assert_eq!(coords, UnboundedCoords { left: 8.0, top: 8.0 });
    }

    #[test]
    fn normalization_subtracts_viewport_and_box() {
        let p = normalized_event_coords(
            Point::new(130.0, 90.0),
            Point::new(100.0, 50.0),
            BoundingBox::new(20.0, 30.0, 10.0, 10.0),
        );
        assert_eq!(p, Point::new(10.0, 10.0));
    }

    #[test]
    fn bounded_translation_centers_foreground() {
        let frame = Frame::new(100.0, 50.0);
        let m = compute_layout_metrics(frame, &RippleConfig::default());
        let t = bounded_translation(frame, &m, Point::new(10.0, 10.0));
        assert_eq!(t.start, Point::new(-20.0, -20.0));
        assert_eq!(t.end, Point::new(20.0, -5.0));
    }
}
