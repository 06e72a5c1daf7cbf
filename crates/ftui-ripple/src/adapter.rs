#![forbid(unsafe_code)]

//! Capability interface between the ripple core and its host surface.
//!
//! The core never touches rendering, styling or input devices directly. It
//! calls the verbs on [`RippleAdapter`]; the host implements them against
//! whatever it renders into.
//!
//! Input handlers are identified by [`InputHandler`] tokens rather than
//! closures. The host remembers which tokens were registered for which
//! [`EventKind`] and forwards matching events to
//! [`RippleFoundation::handle_event`](crate::RippleFoundation::handle_event).

use crate::animation::AnimationSlot;
use crate::event::EventKind;
use crate::geometry::{BoundingBox, Point};
use crate::marker::{StateMarker, StyleValue, StyleVar};

/// Identity of a handler the core registers with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputHandler {
    /// Starts an activation cycle.
    Activate,
    /// May end an activation cycle.
    Deactivate,
    /// Focus gained; shows the background highlight.
    Focus,
    /// Focus lost; hides the background highlight.
    Blur,
    /// Completion signal of an in-flight animation.
    AnimationComplete(AnimationSlot),
    /// Surface resized.
    Resize,
}

/// Host capabilities required by the ripple core.
pub trait RippleAdapter {
    /// Whether the environment can render the effect at all.
    ///
    /// Queried once at construction; the answer is cached for the lifetime
    /// of the foundation.
    fn supports_required_feature(&self) -> bool;

    /// Whether the surface uses unbounded mode.
    fn is_unbounded(&self) -> bool;

    /// Whether the surface currently reports a pressed/active state.
    fn is_surface_pressed(&self) -> bool;

    fn add_marker(&mut self, marker: StateMarker);

    fn remove_marker(&mut self, marker: StateMarker);

    fn register_input_handler(&mut self, kind: EventKind, handler: InputHandler);

    fn unregister_input_handler(&mut self, kind: EventKind, handler: InputHandler);

    fn register_resize_handler(&mut self, handler: InputHandler);

    fn unregister_resize_handler(&mut self, handler: InputHandler);

    /// Set a style variable, or clear it with `None`.
    fn set_style_var(&mut self, var: StyleVar, value: Option<StyleValue>);

    /// Current bounding box of the surface in viewport coordinates.
    fn measure_bounding_box(&self) -> BoundingBox;

    /// Scroll offset of the viewport within the page.
    fn viewport_offset(&self) -> Point;
}
