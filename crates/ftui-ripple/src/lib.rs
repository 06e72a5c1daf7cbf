#![cfg_attr(not(test), forbid(unsafe_code))]

//! Ripple: press-feedback lifecycle and timing for interactive surfaces.
//!
//! # Role in FrankenTUI
//! `ftui-ripple` is the host-independent core of the surface-press ripple
//! effect. It listens to activation and deactivation signals, computes
//! geometry-dependent animation parameters, and toggles style markers and
//! style variables on the surface. Rendering, styling and input plumbing stay
//! with the host behind [`RippleAdapter`].
//!
//! # Primary responsibilities
//! - **RippleFoundation**: activation state machine, layout pass, public surface.
//! - **Geometry**: initial size, max radius, scale and transform duration.
//! - **Timing**: unbounded fade-out estimation from elapsed press time.
//! - **AnimationCoordinator**: cancellable animation slots and the fade timer.
//!
//! # How it fits in the system
//! The host owns a [`Scheduler`] (next-frame callbacks, one-shot timers, the
//! clock) and a [`RippleAdapter`]. Every deferred step is plain data
//! ([`FrameTask`], [`TimerTask`]) that the host hands back when it fires, so
//! the whole lifecycle can be replayed deterministically with
//! [`ManualScheduler`] and [`testing::RecordingAdapter`].
//!
//! ```
//! use ftui_ripple::testing::RecordingAdapter;
//! use ftui_ripple::{EventKind, ManualScheduler, Point, RippleEvent, RippleFoundation, StateMarker};
//!
//! let mut ripple = RippleFoundation::new(RecordingAdapter::new(), ManualScheduler::new());
//! ripple.initialize();
//! ripple.run_frame();
//!
//! ripple.on_activation_event(RippleEvent::new(EventKind::MouseDown, Point::new(10.0, 10.0)));
//! ripple.run_frame();
//! assert!(ripple.adapter().has_marker(StateMarker::BackgroundActive));
//! ```

pub mod adapter;
pub mod animation;
pub mod config;
pub mod event;
pub mod foundation;
pub mod geometry;
pub mod marker;
pub mod scheduler;
pub mod testing;
pub mod timing;

pub use adapter::{InputHandler, RippleAdapter};
pub use animation::{AnimationCoordinator, AnimationOutcome, AnimationPhase, AnimationSlot};
pub use config::{RippleConfig, RippleConfigError};
pub use event::{EventKind, RippleEvent};
pub use foundation::{ActivationPhase, ActivationState, LISTENER_BINDINGS, RippleFoundation};
pub use geometry::{
    BoundedTranslation, BoundingBox, Frame, LayoutMetrics, Point, UnboundedCoords,
    compute_layout_metrics,
};
pub use marker::{MarkerSet, StateMarker, StyleValue, StyleVar};
pub use scheduler::{FrameHandle, FrameTask, ManualScheduler, Scheduler, TimerHandle, TimerTask};
pub use timing::{UnboundedDeactivation, estimate_unbounded_deactivation};
