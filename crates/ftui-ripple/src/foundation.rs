#![forbid(unsafe_code)]

//! Activation state machine and layout pass.
//!
//! [`RippleFoundation`] consumes input events routed from the host, decides
//! whether each one starts, continues or ends an activation cycle, and drives
//! the [`AnimationCoordinator`] accordingly.
//!
//! # State Machine
//!
//! ```text
//! Idle ──activation──► Activating ──confirmed next frame──► Active
//!   ▲                      │                                  │
//!   │                      └──not confirmed (keyboard)────────┤
//!   │                                                         ▼
//!   └──────────reset (matching end / mouse-up)─────────── Deactivating
//! ```
//!
//! # Invariants
//!
//! 1. `activation_event` is `Some` whenever `is_activated` is true. The at-rest
//!    state is exactly [`ActivationState::default`].
//! 2. [`ActivationState`] is replaced wholesale at cycle boundaries, never
//!    patched across them.
//! 3. A second activation while activated is a no-op.
//! 4. Deactivation visuals use a snapshot of the state taken when the
//!    deactivation decision was made, not whatever state exists when the
//!    deferred frame runs.
//! 5. For pointer-activated cycles only `MouseUp` resets state, so the
//!    touch-end / synthesized mouse-up pair cannot trample each other.
//!
//! # Failure Modes
//!
//! - Deactivation without a prior activation, or with an unpaired kind, is
//!   ignored.
//! - An unsupported environment turns `initialize`, `teardown` and
//!   `trigger_layout` into no-ops; no handlers are registered and no timers
//!   are armed.
//! - A keyboard activation whose surface never reports pressed is reset on
//!   the confirmation frame without adding any marker.

use std::fmt;

use web_time::{Duration, Instant};

use crate::adapter::{InputHandler, RippleAdapter};
use crate::animation::AnimationCoordinator;
use crate::config::{RippleConfig, RippleConfigError};
use crate::event::{EventKind, RippleEvent};
use crate::geometry::{
    Frame, LayoutMetrics, UnboundedCoords, bounded_translation, compute_layout_metrics,
    normalized_event_coords, unbounded_coords,
};
use crate::marker::{StateMarker, StyleValue, StyleVar};
use crate::scheduler::{FrameHandle, FrameTask, ManualScheduler, Scheduler, TimerTask};
use crate::timing::estimate_unbounded_deactivation;

/// Handler registrations performed by [`RippleFoundation::initialize`].
pub const LISTENER_BINDINGS: [(EventKind, InputHandler); 10] = [
    (EventKind::TouchStart, InputHandler::Activate),
    (EventKind::TouchEnd, InputHandler::Deactivate),
    (EventKind::PointerDown, InputHandler::Activate),
    (EventKind::PointerUp, InputHandler::Deactivate),
    (EventKind::MouseDown, InputHandler::Activate),
    (EventKind::MouseUp, InputHandler::Deactivate),
    (EventKind::KeyDown, InputHandler::Activate),
    (EventKind::KeyUp, InputHandler::Deactivate),
    (EventKind::Focus, InputHandler::Focus),
    (EventKind::Blur, InputHandler::Blur),
];

/// State of the current activation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActivationState {
    /// True between activation start and full reset.
    pub is_activated: bool,
    /// Event that started the current cycle.
    pub activation_event: Option<RippleEvent>,
    /// The cycle started from a pointer or touch gesture.
    pub was_activated_by_pointer: bool,
    /// The surface's pressed state was confirmed.
    pub was_element_made_active: bool,
    /// When the cycle started.
    pub activation_start_time: Option<Instant>,
    /// Monotonic cycle id; 0 at rest.
    pub cycle: u64,
}

impl ActivationState {
    /// Whether this is the default at-rest state.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        *self == Self::default()
    }
}

/// Coarse lifecycle phase derived from the activation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationPhase {
    Idle,
    /// Activation received, confirmation frame pending.
    Activating,
    /// Confirmed; activation visuals running.
    Active,
    /// A matching end event was seen but the cycle is not finalized yet.
    Deactivating,
}

/// Surface-press ripple: activation state machine plus layout pass.
pub struct RippleFoundation<A, S> {
    adapter: A,
    scheduler: S,
    config: RippleConfig,
    supported: bool,
    attached: bool,
    state: ActivationState,
    next_cycle: u64,
    release_seen: bool,
    frame: Frame,
    metrics: LayoutMetrics,
    unbounded_coords: UnboundedCoords,
    layout_frame: Option<FrameHandle>,
    animations: AnimationCoordinator,
}

impl<A, S> fmt::Debug for RippleFoundation<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RippleFoundation")
            .field("supported", &self.supported)
            .field("attached", &self.attached)
            .field("state", &self.state)
            .field("frame", &self.frame)
            .field("metrics", &self.metrics)
            .field("animations", &self.animations)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Construction and public surface
// ---------------------------------------------------------------------------

impl<A: RippleAdapter, S: Scheduler> RippleFoundation<A, S> {
    /// Create a foundation with the default configuration.
    #[must_use]
    pub fn new(adapter: A, scheduler: S) -> Self {
        Self::build(adapter, scheduler, RippleConfig::default())
    }

    /// Create a foundation with a validated configuration.
    pub fn with_config(
        adapter: A,
        scheduler: S,
        config: RippleConfig,
    ) -> Result<Self, RippleConfigError> {
        config.validate()?;
        Ok(Self::build(adapter, scheduler, config))
    }

    fn build(adapter: A, scheduler: S, config: RippleConfig) -> Self {
        let supported = adapter.supports_required_feature();
        Self {
            adapter,
            scheduler,
            config,
            supported,
            attached: false,
            state: ActivationState::default(),
            next_cycle: 0,
            release_seen: false,
            frame: Frame::default(),
            metrics: LayoutMetrics::default(),
            unbounded_coords: UnboundedCoords::default(),
            layout_frame: None,
            animations: AnimationCoordinator::new(),
        }
    }

    /// Register handlers and schedule the first layout pass.
    pub fn initialize(&mut self) {
        if !self.supported {
            #[cfg(feature = "tracing")]
            tracing::debug!("ripple unsupported; initialize skipped");
            return;
        }
        for (kind, handler) in LISTENER_BINDINGS {
            self.adapter.register_input_handler(kind, handler);
        }
        self.adapter.register_resize_handler(InputHandler::Resize);
        self.attached = true;
        self.scheduler.request_frame(FrameTask::Initialize);
        #[cfg(feature = "tracing")]
        tracing::debug!("ripple initialized");
    }

    /// Unregister handlers, stop every animation, and schedule cleanup.
    pub fn teardown(&mut self) {
        if !self.supported {
            return;
        }
        for (kind, handler) in LISTENER_BINDINGS {
            self.adapter.unregister_input_handler(kind, handler);
        }
        self.adapter.unregister_resize_handler(InputHandler::Resize);
        if let Some(pending) = self.layout_frame.take() {
            self.scheduler.cancel_frame(pending);
        }
        self.animations
            .cancel_all(&mut self.adapter, &mut self.scheduler);
        self.reset_state();
        self.attached = false;
        self.scheduler.request_frame(FrameTask::Teardown);
        #[cfg(feature = "tracing")]
        tracing::debug!("ripple torn down");
    }

    /// Request a layout pass before the next frame.
    ///
    /// A pending request is replaced, so any number of calls within one frame
    /// produce a single pass.
    pub fn trigger_layout(&mut self) {
        if !self.supported {
            return;
        }
        if let Some(pending) = self.layout_frame.take() {
            self.scheduler.cancel_frame(pending);
        }
        self.layout_frame = Some(self.scheduler.request_frame(FrameTask::Layout));
    }

    /// Route an event the host received for a registered handler.
    pub fn handle_event(&mut self, handler: InputHandler, event: &RippleEvent) {
        if !self.attached {
            return;
        }
        match handler {
            InputHandler::Activate => self.on_activation_event(*event),
            InputHandler::Deactivate => self.on_deactivation_event(*event),
            InputHandler::Focus => {
                self.scheduler
                    .request_frame(FrameTask::FocusChanged { focused: true });
            }
            InputHandler::Blur => {
                self.scheduler
                    .request_frame(FrameTask::FocusChanged { focused: false });
            }
            InputHandler::AnimationComplete(slot) => {
                self.animations.complete(&mut self.adapter, slot);
            }
            InputHandler::Resize => self.trigger_layout(),
        }
    }

    /// Start an activation cycle, unless one is already running.
    pub fn on_activation_event(&mut self, event: RippleEvent) {
        if !self.attached {
            return;
        }
        if self.state.is_activated {
            #[cfg(feature = "tracing")]
            tracing::trace!(kind = ?event.kind, "duplicate activation ignored");
            return;
        }
        self.next_cycle += 1;
        let cycle = self.next_cycle;
        self.state = ActivationState {
            is_activated: true,
            activation_event: Some(event),
            was_activated_by_pointer: event.kind.is_pointer_activation(),
            was_element_made_active: false,
            activation_start_time: Some(self.scheduler.now()),
            cycle,
        };
        self.release_seen = false;
        self.scheduler
            .request_frame(FrameTask::ConfirmActivation { cycle, event });
        #[cfg(feature = "tracing")]
        tracing::debug!(kind = ?event.kind, cycle, "activation started");
    }

    /// Possibly end the current activation cycle.
    pub fn on_deactivation_event(&mut self, event: RippleEvent) {
        if !self.attached || !self.state.is_activated {
            return;
        }
        let Some(activation) = self.state.activation_event else {
            return;
        };
        let needs_deactivation_ux = event.kind.paired_activation() == Some(activation.kind);
        let needs_reset = if self.state.was_activated_by_pointer {
            event.kind == EventKind::MouseUp
        } else {
            needs_deactivation_ux
        };

        let snapshot = self.state;
        if needs_deactivation_ux {
            self.release_seen = true;
            self.scheduler
                .request_frame(FrameTask::AnimateDeactivation { event, snapshot });
        }
        if needs_reset {
            self.reset_state();
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            kind = ?event.kind,
            cycle = snapshot.cycle,
            needs_deactivation_ux,
            needs_reset,
            "deactivation decided"
        );
    }

    /// Run a frame task previously handed to the scheduler.
    pub fn run_frame_task(&mut self, task: FrameTask) {
        match task {
            FrameTask::Initialize => {
                if !self.attached {
                    return;
                }
                self.adapter.add_marker(StateMarker::Root);
                if self.adapter.is_unbounded() {
                    self.adapter.add_marker(StateMarker::Unbounded);
                }
                self.layout_now();
            }
            FrameTask::Teardown => {
                self.adapter.remove_marker(StateMarker::Root);
                self.adapter.remove_marker(StateMarker::Unbounded);
                for var in StyleVar::ALL {
                    self.adapter.set_style_var(var, None);
                }
            }
            _ if !self.attached => {}
            FrameTask::Layout => {
                self.layout_frame = None;
                self.layout_now();
            }
            FrameTask::ConfirmActivation { cycle, event } => self.confirm_activation(cycle, event),
            FrameTask::AnimateDeactivation { event, snapshot } => {
                self.animate_deactivation(event, snapshot);
            }
            FrameTask::StartAnimation { slot, generation } => {
                self.animations
                    .apply_pending_start(&mut self.adapter, slot, generation);
            }
            FrameTask::FocusChanged { focused: true } => {
                self.adapter.add_marker(StateMarker::BackgroundActive);
            }
            FrameTask::FocusChanged { focused: false } => {
                self.adapter.remove_marker(StateMarker::BackgroundActive);
            }
        }
    }

    /// Run a timer task previously handed to the scheduler.
    pub fn run_timer_task(&mut self, task: TimerTask) {
        match task {
            TimerTask::UnboundedFadeComplete => self.animations.finish_fade(&mut self.adapter),
        }
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl<A, S> RippleFoundation<A, S> {
    /// Whether the environment supports the effect (cached at construction).
    #[inline]
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    #[inline]
    #[must_use]
    pub fn activation_state(&self) -> &ActivationState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> ActivationPhase {
        if !self.state.is_activated {
            ActivationPhase::Idle
        } else if self.release_seen {
            ActivationPhase::Deactivating
        } else if self.state.was_element_made_active {
            ActivationPhase::Active
        } else {
            ActivationPhase::Activating
        }
    }

    #[inline]
    #[must_use]
    pub fn frame(&self) -> Frame {
        self.frame
    }

    #[inline]
    #[must_use]
    pub fn layout_metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    #[inline]
    #[must_use]
    pub fn unbounded_coords(&self) -> UnboundedCoords {
        self.unbounded_coords
    }

    #[inline]
    #[must_use]
    pub fn animations(&self) -> &AnimationCoordinator {
        &self.animations
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &RippleConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    #[inline]
    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    #[inline]
    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    #[inline]
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

// ---------------------------------------------------------------------------
// Deferred steps
// ---------------------------------------------------------------------------

impl<A: RippleAdapter, S: Scheduler> RippleFoundation<A, S> {
    fn confirm_activation(&mut self, cycle: u64, event: RippleEvent) {
        // Pressed state is only reliable outside the event handler turn.
        let made_active = if event.kind.is_keyboard() {
            self.adapter.is_surface_pressed()
        } else {
            true
        };
        let still_current = self.state.is_activated && self.state.cycle == cycle;
        if still_current {
            self.state.was_element_made_active = made_active;
        }

        if made_active {
            let unbounded = self.adapter.is_unbounded();
            self.animations
                .start_activation(&mut self.adapter, &mut self.scheduler, unbounded);
        } else if still_current {
            #[cfg(feature = "tracing")]
            tracing::debug!(cycle, "activation never registered; resetting");
            self.reset_state();
        }
    }

    fn animate_deactivation(&mut self, event: RippleEvent, snapshot: ActivationState) {
        if !(snapshot.was_activated_by_pointer || snapshot.was_element_made_active) {
            return;
        }
        self.adapter.remove_marker(StateMarker::BackgroundActive);

        if self.adapter.is_unbounded() {
            let elapsed = snapshot
                .activation_start_time
                .map(|start| self.scheduler.now().saturating_duration_since(start))
                .unwrap_or(Duration::ZERO);
            let info = estimate_unbounded_deactivation(elapsed, &self.metrics, &self.config);
            self.animations
                .start_unbounded_deactivation(&mut self.adapter, &mut self.scheduler, info);
        } else {
            let origin = if snapshot.was_activated_by_pointer {
                normalized_event_coords(
                    event.page,
                    self.adapter.viewport_offset(),
                    self.adapter.measure_bounding_box(),
                )
            } else {
                self.frame.center()
            };
            let translation = bounded_translation(self.frame, &self.metrics, origin);
            self.animations.start_bounded_deactivation(
                &mut self.adapter,
                &mut self.scheduler,
                translation,
            );
        }
    }

    fn layout_now(&mut self) {
        self.frame = self.adapter.measure_bounding_box().frame();
        self.metrics = compute_layout_metrics(self.frame, &self.config);

        let adapter = &mut self.adapter;
        adapter.set_style_var(StyleVar::SurfaceWidth, Some(StyleValue::Px(self.frame.width)));
        adapter.set_style_var(
            StyleVar::SurfaceHeight,
            Some(StyleValue::Px(self.frame.height)),
        );
        adapter.set_style_var(
            StyleVar::FgSize,
            Some(StyleValue::Px(self.metrics.initial_size)),
        );
        adapter.set_style_var(
            StyleVar::FgUnboundedTransformDuration,
            Some(StyleValue::Ms(self.metrics.xf_duration_ms.round())),
        );
        adapter.set_style_var(
            StyleVar::FgScale,
            Some(StyleValue::Number(self.metrics.fg_scale)),
        );

        if adapter.is_unbounded() {
            self.unbounded_coords = unbounded_coords(self.frame, &self.metrics);
            adapter.set_style_var(
                StyleVar::Left,
                Some(StyleValue::Px(self.unbounded_coords.left)),
            );
            adapter.set_style_var(
                StyleVar::Top,
                Some(StyleValue::Px(self.unbounded_coords.top)),
            );
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(
            width = self.frame.width,
            height = self.frame.height,
            fg_scale = self.metrics.fg_scale,
            "ripple layout"
        );
    }

    fn reset_state(&mut self) {
        self.state = ActivationState::default();
        self.release_seen = false;
    }
}

// ---------------------------------------------------------------------------
// Deterministic driving
// ---------------------------------------------------------------------------

impl<A: RippleAdapter> RippleFoundation<A, ManualScheduler> {
    /// Run every frame task queued before this call.
    ///
    /// Tasks queued while running land in the next frame. Returns the number
    /// of tasks run.
    pub fn run_frame(&mut self) -> usize {
        let tasks = self.scheduler.take_frame_tasks();
        let count = tasks.len();
        for task in tasks {
            self.run_frame_task(task);
        }
        count
    }

    /// Advance the virtual clock and fire any timers that came due.
    pub fn advance(&mut self, dt: Duration) -> usize {
        self.scheduler.advance_clock(dt);
        let due = self.scheduler.take_due_timers();
        let count = due.len();
        for task in due {
            self.run_timer_task(task);
        }
        count
    }
}
