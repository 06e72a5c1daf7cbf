#![forbid(unsafe_code)]

//! Recording adapter for deterministic tests.
//!
//! [`RecordingAdapter`] implements [`RippleAdapter`] against in-memory state:
//! the applied marker set, the current style variables, registered handlers,
//! and an ordered log of every call the core made.

use std::collections::{BTreeMap, BTreeSet};

use crate::adapter::{InputHandler, RippleAdapter};
use crate::event::EventKind;
use crate::geometry::{BoundingBox, Point};
use crate::marker::{MarkerSet, StateMarker, StyleValue, StyleVar};

/// One adapter call, as observed by [`RecordingAdapter`].
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterCall {
    AddMarker(StateMarker),
    RemoveMarker(StateMarker),
    Register(EventKind, InputHandler),
    Unregister(EventKind, InputHandler),
    RegisterResize(InputHandler),
    UnregisterResize(InputHandler),
    SetStyleVar(StyleVar, Option<StyleValue>),
}

/// In-memory [`RippleAdapter`] with a call log.
#[derive(Debug, Clone)]
pub struct RecordingAdapter {
    supported: bool,
    unbounded: bool,
    pressed: bool,
    bounding_box: BoundingBox,
    viewport_offset: Point,
    markers: MarkerSet,
    style_vars: BTreeMap<StyleVar, StyleValue>,
    handlers: BTreeSet<(EventKind, InputHandler)>,
    resize_handlers: BTreeSet<InputHandler>,
    calls: Vec<AdapterCall>,
}

impl Default for RecordingAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingAdapter {
    /// Supported, bounded, unpressed surface measuring 100×50 at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            supported: true,
            unbounded: false,
            pressed: false,
            bounding_box: BoundingBox::new(0.0, 0.0, 100.0, 50.0),
            viewport_offset: Point::ORIGIN,
            markers: MarkerSet::empty(),
            style_vars: BTreeMap::new(),
            handlers: BTreeSet::new(),
            resize_handlers: BTreeSet::new(),
            calls: Vec::new(),
        }
    }

    #[must_use]
    pub fn unsupported(mut self) -> Self {
        self.supported = false;
        self
    }

    #[must_use]
    pub fn unbounded(mut self) -> Self {
        self.unbounded = true;
        self
    }

    #[must_use]
    pub fn with_bounding_box(mut self, bbox: BoundingBox) -> Self {
        self.bounding_box = bbox;
        self
    }

    #[must_use]
    pub fn with_viewport_offset(mut self, offset: Point) -> Self {
        self.viewport_offset = offset;
        self
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    /// Simulate the surface being resized.
    pub fn set_bounding_box(&mut self, bbox: BoundingBox) {
        self.bounding_box = bbox;
    }

    #[must_use]
    pub fn markers(&self) -> MarkerSet {
        self.markers
    }

    #[must_use]
    pub fn has_marker(&self, marker: StateMarker) -> bool {
        self.markers.has(marker)
    }

    #[must_use]
    pub fn style_var(&self, var: StyleVar) -> Option<StyleValue> {
        self.style_vars.get(&var).copied()
    }

    /// Number of style variables currently set.
    #[must_use]
    pub fn style_var_count(&self) -> usize {
        self.style_vars.len()
    }

    #[must_use]
    pub fn is_registered(&self, kind: EventKind, handler: InputHandler) -> bool {
        self.handlers.contains(&(kind, handler))
    }

    /// Handlers registered for `kind`, in a stable order.
    pub fn handlers_for(&self, kind: EventKind) -> impl Iterator<Item = InputHandler> + '_ {
        self.handlers
            .iter()
            .filter(move |(k, _)| *k == kind)
            .map(|(_, handler)| *handler)
    }

    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_resize_registered(&self, handler: InputHandler) -> bool {
        self.resize_handlers.contains(&handler)
    }

    /// Every call made so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[AdapterCall] {
        &self.calls
    }

    /// Whether `marker` was ever added.
    #[must_use]
    pub fn was_added(&self, marker: StateMarker) -> bool {
        self.calls.contains(&AdapterCall::AddMarker(marker))
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl RippleAdapter for RecordingAdapter {
    fn supports_required_feature(&self) -> bool {
        self.supported
    }

    fn is_unbounded(&self) -> bool {
        self.unbounded
    }

    fn is_surface_pressed(&self) -> bool {
        self.pressed
    }

    fn add_marker(&mut self, marker: StateMarker) {
        self.markers.insert(marker.flag());
        self.calls.push(AdapterCall::AddMarker(marker));
    }

    fn remove_marker(&mut self, marker: StateMarker) {
        self.markers.remove(marker.flag());
        self.calls.push(AdapterCall::RemoveMarker(marker));
    }

    fn register_input_handler(&mut self, kind: EventKind, handler: InputHandler) {
        self.handlers.insert((kind, handler));
        self.calls.push(AdapterCall::Register(kind, handler));
    }

    fn unregister_input_handler(&mut self, kind: EventKind, handler: InputHandler) {
        self.handlers.remove(&(kind, handler));
        self.calls.push(AdapterCall::Unregister(kind, handler));
    }

    fn register_resize_handler(&mut self, handler: InputHandler) {
        self.resize_handlers.insert(handler);
        self.calls.push(AdapterCall::RegisterResize(handler));
    }

    fn unregister_resize_handler(&mut self, handler: InputHandler) {
        self.resize_handlers.remove(&handler);
        self.calls.push(AdapterCall::UnregisterResize(handler));
    }

    fn set_style_var(&mut self, var: StyleVar, value: Option<StyleValue>) {
        match value {
            Some(v) => {
                self.style_vars.insert(var, v);
            }
            None => {
                self.style_vars.remove(&var);
            }
        }
        self.calls.push(AdapterCall::SetStyleVar(var, value));
    }

    fn measure_bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    fn viewport_offset(&self) -> Point {
        self.viewport_offset
    }
}
