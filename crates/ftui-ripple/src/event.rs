#![forbid(unsafe_code)]

//! Input events consumed by the ripple state machine.
//!
//! The host translates whatever its input backend produces (DOM events,
//! terminal mouse reports, touch frames) into [`RippleEvent`] values. Only the
//! kind and the page position matter to the core.
//!
//! # Pairing table
//!
//! Every deactivation kind pairs with exactly one activation kind:
//!
//! | deactivation | activation   |
//! |--------------|--------------|
//! | `MouseUp`    | `MouseDown`  |
//! | `PointerUp`  | `PointerDown`|
//! | `TouchEnd`   | `TouchStart` |
//! | `KeyUp`      | `KeyDown`    |
//! | `Blur`       | `Focus`      |
//!
//! The table is a `match`, so adding an [`EventKind`] forces a decision here.

use crate::geometry::Point;

/// Kind of input signal delivered to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    TouchStart,
    TouchEnd,
    PointerDown,
    PointerUp,
    MouseDown,
    MouseUp,
    KeyDown,
    KeyUp,
    Focus,
    Blur,
    /// A style transition finished on the surface.
    TransitionEnd,
    /// A keyframe animation finished on the surface.
    AnimationEnd,
}

impl EventKind {
    /// Kinds that start an activation cycle.
    pub const ACTIVATION: [Self; 4] = [
        Self::TouchStart,
        Self::PointerDown,
        Self::MouseDown,
        Self::KeyDown,
    ];

    /// Kinds that may end an activation cycle.
    pub const DEACTIVATION: [Self; 4] = [
        Self::TouchEnd,
        Self::PointerUp,
        Self::MouseUp,
        Self::KeyUp,
    ];

    /// The activation kind this deactivation kind pairs with.
    ///
    /// Returns `None` for kinds that are not deactivations.
    #[must_use]
    pub const fn paired_activation(self) -> Option<Self> {
        match self {
            Self::MouseUp => Some(Self::MouseDown),
            Self::PointerUp => Some(Self::PointerDown),
            Self::TouchEnd => Some(Self::TouchStart),
            Self::KeyUp => Some(Self::KeyDown),
            Self::Blur => Some(Self::Focus),
            Self::TouchStart
            | Self::PointerDown
            | Self::MouseDown
            | Self::KeyDown
            | Self::Focus
            | Self::TransitionEnd
            | Self::AnimationEnd => None,
        }
    }

    /// Whether this kind originates from a pointing device gesture.
    #[must_use]
    pub const fn is_pointer_activation(self) -> bool {
        matches!(self, Self::PointerDown | Self::TouchStart | Self::MouseDown)
    }

    /// Whether this kind originates from the keyboard.
    #[must_use]
    pub const fn is_keyboard(self) -> bool {
        matches!(self, Self::KeyDown | Self::KeyUp)
    }

    /// DOM-style event name, for hosts that bind by string.
    #[must_use]
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::TouchStart => "touchstart",
            Self::TouchEnd => "touchend",
            Self::PointerDown => "pointerdown",
            Self::PointerUp => "pointerup",
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::TransitionEnd => "transitionend",
            Self::AnimationEnd => "animationend",
        }
    }
}

/// One input signal, normalized by the host.
///
/// For touch events `page` is the page position of the first changed touch.
/// Keyboard and focus events carry whatever the host has (usually the origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleEvent {
    pub kind: EventKind,
    pub page: Point,
}

impl RippleEvent {
    /// Event at a page position.
    #[inline]
    #[must_use]
    pub const fn new(kind: EventKind, page: Point) -> Self {
        Self { kind, page }
    }

    /// Event without a meaningful position (keyboard, focus, completion signals).
    #[inline]
    #[must_use]
    pub const fn positionless(kind: EventKind) -> Self {
        Self::new(kind, Point::ORIGIN)
    }
}
