#![forbid(unsafe_code)]

//! Style markers and style variables published to the surface.
//!
//! Markers are boolean presentation flags (the host typically maps them to
//! CSS classes or widget style variants). Style variables carry the numbers
//! computed by the geometry and timing components so the host can drive its
//! own transitions from them.

use std::fmt;

use bitflags::bitflags;

use crate::geometry::Point;

/// A boolean presentation flag toggled on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateMarker {
    /// The surface has been upgraded with ripple behavior.
    Root,
    /// The surface renders in unbounded mode.
    Unbounded,
    /// The background highlight is showing.
    BackgroundActive,
    /// Bounded background fill animation.
    BackgroundBoundedActiveFill,
    /// Bounded foreground fill animation.
    ForegroundBoundedActiveFill,
    /// Unbounded foreground growth while pressed.
    ForegroundUnboundedActivation,
    /// Unbounded foreground fade-out after release.
    ForegroundUnboundedDeactivation,
}

impl StateMarker {
    /// Every marker, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Root,
        Self::Unbounded,
        Self::BackgroundActive,
        Self::BackgroundBoundedActiveFill,
        Self::ForegroundBoundedActiveFill,
        Self::ForegroundUnboundedActivation,
        Self::ForegroundUnboundedDeactivation,
    ];

    /// Class-style name a host can apply verbatim.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Root => "ripple-upgraded",
            Self::Unbounded => "ripple-upgraded--unbounded",
            Self::BackgroundActive => "ripple-upgraded--background-active",
            Self::BackgroundBoundedActiveFill => "ripple-upgraded--background-bounded-active-fill",
            Self::ForegroundBoundedActiveFill => "ripple-upgraded--foreground-bounded-active-fill",
            Self::ForegroundUnboundedActivation => {
                "ripple-upgraded--foreground-unbounded-activation"
            }
            Self::ForegroundUnboundedDeactivation => {
                "ripple-upgraded--foreground-unbounded-deactivation"
            }
        }
    }

    /// The single-bit [`MarkerSet`] for this marker.
    #[must_use]
    pub const fn flag(self) -> MarkerSet {
        match self {
            Self::Root => MarkerSet::ROOT,
            Self::Unbounded => MarkerSet::UNBOUNDED,
            Self::BackgroundActive => MarkerSet::BG_ACTIVE,
            Self::BackgroundBoundedActiveFill => MarkerSet::BG_BOUNDED_FILL,
            Self::ForegroundBoundedActiveFill => MarkerSet::FG_BOUNDED_FILL,
            Self::ForegroundUnboundedActivation => MarkerSet::FG_UNBOUNDED_ACTIVATION,
            Self::ForegroundUnboundedDeactivation => MarkerSet::FG_UNBOUNDED_DEACTIVATION,
        }
    }
}

impl fmt::Display for StateMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

bitflags! {
    /// Set of markers currently applied to a surface.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MarkerSet: u8 {
        const ROOT                      = 0b0000_0001;
        const UNBOUNDED                 = 0b0000_0010;
        const BG_ACTIVE                 = 0b0000_0100;
        const BG_BOUNDED_FILL           = 0b0000_1000;
        const FG_BOUNDED_FILL           = 0b0001_0000;
        const FG_UNBOUNDED_ACTIVATION   = 0b0010_0000;
        const FG_UNBOUNDED_DEACTIVATION = 0b0100_0000;
    }
}

impl MarkerSet {
    /// Whether `marker` is part of this set.
    #[inline]
    #[must_use]
    pub fn has(self, marker: StateMarker) -> bool {
        self.contains(marker.flag())
    }
}

/// An externally visible style variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleVar {
    SurfaceWidth,
    SurfaceHeight,
    FgSize,
    FgScale,
    FgUnboundedTransformDuration,
    FgUnboundedOpacityDuration,
    FgApproxTransform,
    FgTranslateStart,
    FgTranslateEnd,
    Left,
    Top,
}

impl StyleVar {
    /// Every variable; teardown clears all of them.
    pub const ALL: [Self; 11] = [
        Self::SurfaceWidth,
        Self::SurfaceHeight,
        Self::FgSize,
        Self::FgScale,
        Self::FgUnboundedTransformDuration,
        Self::FgUnboundedOpacityDuration,
        Self::FgApproxTransform,
        Self::FgTranslateStart,
        Self::FgTranslateEnd,
        Self::Left,
        Self::Top,
    ];

    /// Custom-property style name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SurfaceWidth => "--ripple-surface-width",
            Self::SurfaceHeight => "--ripple-surface-height",
            Self::FgSize => "--ripple-fg-size",
            Self::FgScale => "--ripple-fg-scale",
            Self::FgUnboundedTransformDuration => "--ripple-fg-unbounded-transform-duration",
            Self::FgUnboundedOpacityDuration => "--ripple-fg-unbounded-opacity-duration",
            Self::FgApproxTransform => "--ripple-fg-approx-xf",
            Self::FgTranslateStart => "--ripple-fg-translate-start",
            Self::FgTranslateEnd => "--ripple-fg-translate-end",
            Self::Left => "--ripple-left",
            Self::Top => "--ripple-top",
        }
    }
}

/// Typed value for a [`StyleVar`].
///
/// `Display` renders the CSS-like text form (`60px`, `200ms`, `scale(1.5)`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleValue {
    /// Length in pixels.
    Px(f64),
    /// Duration in milliseconds.
    Ms(f64),
    /// Unitless number.
    Number(f64),
    /// Uniform scale transform.
    Scale(f64),
    /// Two-axis translation in pixels.
    Translate(Point),
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Ms(v) => write!(f, "{v}ms"),
            Self::Number(v) => write!(f, "{v}"),
            Self::Scale(v) => write!(f, "scale({v})"),
            Self::Translate(p) => write!(f, "{}px, {}px", p.x, p.y),
        }
    }
}
