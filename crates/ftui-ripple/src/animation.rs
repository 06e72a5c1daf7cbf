#![forbid(unsafe_code)]

//! Animation coordinator: style markers, cancellable animations, fade timer.
//!
//! The coordinator owns three independently cancellable animation slots and
//! a single one-shot timer for the unbounded fade-out. It does not decide
//! *when* to animate; the activation state machine does that and calls in.
//!
//! # Slot lifecycle
//!
//! ```text
//! Idle ──begin──► Running ──completion signal──► Idle (Completed)
//!                    │
//!                    └──cancel / begin again──► Idle (Cancelled)
//! ```
//!
//! # Invariants
//!
//! 1. At most one animation is running per slot. Beginning a new one in an
//!    occupied slot cancels the previous one first.
//! 2. After [`AnimationCoordinator::start_activation`], no slot is running
//!    except the unbounded activation it may itself begin, and the fade
//!    timer is disarmed.
//! 3. The fade timer is replaced, never stacked.
//! 4. A deferred marker application for a cancelled animation is dropped
//!    (generation check), so a cancel can never be undone by a late frame.

use crate::adapter::{InputHandler, RippleAdapter};
use crate::event::EventKind;
use crate::geometry::BoundedTranslation;
use crate::marker::{StateMarker, StyleValue, StyleVar};
use crate::scheduler::{FrameHandle, FrameTask, Scheduler, TimerHandle, TimerTask};
use crate::timing::UnboundedDeactivation;

/// One of the three independently cancellable animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnimationSlot {
    /// Bounded background fill.
    BackgroundBounded,
    /// Bounded foreground fill.
    ForegroundBounded,
    /// Unbounded foreground growth while activated.
    ForegroundUnbounded,
}

impl AnimationSlot {
    pub const ALL: [Self; 3] = [
        Self::BackgroundBounded,
        Self::ForegroundBounded,
        Self::ForegroundUnbounded,
    ];

    /// Marker that drives this animation on the surface.
    #[must_use]
    pub const fn marker(self) -> StateMarker {
        match self {
            Self::BackgroundBounded => StateMarker::BackgroundBoundedActiveFill,
            Self::ForegroundBounded => StateMarker::ForegroundBoundedActiveFill,
            Self::ForegroundUnbounded => StateMarker::ForegroundUnboundedActivation,
        }
    }

    /// Surface signal that completes this animation, if it completes on its own.
    ///
    /// The unbounded activation has no completion signal: it runs until the
    /// deactivation swaps it out.
    #[must_use]
    pub const fn completion_event(self) -> Option<EventKind> {
        match self {
            Self::BackgroundBounded => Some(EventKind::TransitionEnd),
            Self::ForegroundBounded => Some(EventKind::AnimationEnd),
            Self::ForegroundUnbounded => None,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::BackgroundBounded => 0,
            Self::ForegroundBounded => 1,
            Self::ForegroundUnbounded => 2,
        }
    }
}

/// Whether a slot currently holds an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    Idle,
    Running,
}

/// How the most recent animation in a slot ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationOutcome {
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
struct RunningAnimation {
    generation: u64,
    /// Frame that will apply the marker, while still pending.
    pending_start: Option<FrameHandle>,
}

#[derive(Debug, Clone, Copy, Default)]
struct SlotState {
    running: Option<RunningAnimation>,
    last_outcome: Option<AnimationOutcome>,
}

/// Owner of in-flight animation handles and the fade timer.
#[derive(Debug, Clone, Default)]
pub struct AnimationCoordinator {
    slots: [SlotState; 3],
    next_generation: u64,
    fade_timer: Option<TimerHandle>,
}

impl AnimationCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase of `slot`.
    #[must_use]
    pub fn phase(&self, slot: AnimationSlot) -> AnimationPhase {
        if self.slots[slot.index()].running.is_some() {
            AnimationPhase::Running
        } else {
            AnimationPhase::Idle
        }
    }

    /// How the last animation in `slot` ended, if any has ended.
    #[must_use]
    pub fn last_outcome(&self, slot: AnimationSlot) -> Option<AnimationOutcome> {
        self.slots[slot.index()].last_outcome
    }

    /// Whether the unbounded fade-out timer is armed.
    #[must_use]
    pub fn is_fade_armed(&self) -> bool {
        self.fade_timer.is_some()
    }

    /// Reset visuals for a new activation and show the pressed state.
    pub fn start_activation(
        &mut self,
        adapter: &mut impl RippleAdapter,
        scheduler: &mut impl Scheduler,
        unbounded: bool,
    ) {
        adapter.remove_marker(StateMarker::BackgroundBoundedActiveFill);
        adapter.remove_marker(StateMarker::ForegroundUnboundedDeactivation);
        adapter.remove_marker(StateMarker::ForegroundBoundedActiveFill);
        self.cancel_all(adapter, scheduler);

        adapter.add_marker(StateMarker::BackgroundActive);
        if unbounded {
            let slot = AnimationSlot::ForegroundUnbounded;
            let generation = self.bump_generation();
            self.slots[slot.index()].running = Some(RunningAnimation {
                generation,
                pending_start: None,
            });
            adapter.add_marker(slot.marker());
        }
    }

    /// Publish translation vectors and begin both bounded fill animations.
    pub fn start_bounded_deactivation(
        &mut self,
        adapter: &mut impl RippleAdapter,
        scheduler: &mut impl Scheduler,
        translation: BoundedTranslation,
    ) {
        adapter.set_style_var(
            StyleVar::FgTranslateStart,
            Some(StyleValue::Translate(translation.start)),
        );
        adapter.set_style_var(
            StyleVar::FgTranslateEnd,
            Some(StyleValue::Translate(translation.end)),
        );
        self.begin_with_marker(adapter, scheduler, AnimationSlot::BackgroundBounded);
        self.begin_with_marker(adapter, scheduler, AnimationSlot::ForegroundBounded);
    }

    /// Swap the unbounded activation for a fade-out and arm its timer.
    pub fn start_unbounded_deactivation(
        &mut self,
        adapter: &mut impl RippleAdapter,
        scheduler: &mut impl Scheduler,
        info: UnboundedDeactivation,
    ) {
        adapter.set_style_var(
            StyleVar::FgApproxTransform,
            Some(StyleValue::Scale(info.approx_cur_scale)),
        );
        adapter.set_style_var(
            StyleVar::FgUnboundedOpacityDuration,
            Some(StyleValue::Ms(millis(info.opacity_duration))),
        );
        adapter.set_style_var(
            StyleVar::FgUnboundedTransformDuration,
            Some(StyleValue::Ms(millis(info.transform_duration))),
        );
        adapter.add_marker(StateMarker::ForegroundUnboundedDeactivation);
        adapter.remove_marker(StateMarker::ForegroundUnboundedActivation);

        let slot = &mut self.slots[AnimationSlot::ForegroundUnbounded.index()];
        if slot.running.take().is_some() {
            slot.last_outcome = Some(AnimationOutcome::Completed);
        }

        self.disarm_fade(scheduler);
        self.fade_timer =
            Some(scheduler.arm_timer(info.opacity_duration, TimerTask::UnboundedFadeComplete));
    }

    /// Deferred marker application for an animation begun earlier.
    pub fn apply_pending_start(
        &mut self,
        adapter: &mut impl RippleAdapter,
        slot: AnimationSlot,
        generation: u64,
    ) {
        let state = &mut self.slots[slot.index()];
        match state.running.as_mut() {
            Some(running) if running.generation == generation => {
                running.pending_start = None;
                adapter.add_marker(slot.marker());
            }
            _ => {
                #[cfg(feature = "tracing")]
                tracing::trace!(?slot, generation, "dropping stale animation start");
            }
        }
    }

    /// Completion signal for `slot`: the animation removes its own marker.
    pub fn complete(&mut self, adapter: &mut impl RippleAdapter, slot: AnimationSlot) {
        let state = &mut self.slots[slot.index()];
        if state.running.take().is_none() {
            return;
        }
        state.last_outcome = Some(AnimationOutcome::Completed);
        adapter.remove_marker(slot.marker());
        if let Some(kind) = slot.completion_event() {
            adapter.unregister_input_handler(kind, InputHandler::AnimationComplete(slot));
        }
    }

    /// Fade-out timer fired.
    pub fn finish_fade(&mut self, adapter: &mut impl RippleAdapter) {
        if self.fade_timer.take().is_some() {
            adapter.remove_marker(StateMarker::ForegroundUnboundedDeactivation);
        }
    }

    /// Cancel the animation in `slot`. Idempotent.
    pub fn cancel(
        &mut self,
        adapter: &mut impl RippleAdapter,
        scheduler: &mut impl Scheduler,
        slot: AnimationSlot,
    ) {
        let state = &mut self.slots[slot.index()];
        let Some(running) = state.running.take() else {
            return;
        };
        state.last_outcome = Some(AnimationOutcome::Cancelled);
        if let Some(frame) = running.pending_start {
            scheduler.cancel_frame(frame);
        }
        adapter.remove_marker(slot.marker());
        if let Some(kind) = slot.completion_event() {
            adapter.unregister_input_handler(kind, InputHandler::AnimationComplete(slot));
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(?slot, generation = running.generation, "animation cancelled");
    }

    /// Cancel every slot and disarm the fade timer.
    pub fn cancel_all(&mut self, adapter: &mut impl RippleAdapter, scheduler: &mut impl Scheduler) {
        for slot in AnimationSlot::ALL {
            self.cancel(adapter, scheduler, slot);
        }
        self.disarm_fade(scheduler);
    }

    fn begin_with_marker(
        &mut self,
        adapter: &mut impl RippleAdapter,
        scheduler: &mut impl Scheduler,
        slot: AnimationSlot,
    ) {
        self.cancel(adapter, scheduler, slot);
        let generation = self.bump_generation();
        if let Some(kind) = slot.completion_event() {
            adapter.register_input_handler(kind, InputHandler::AnimationComplete(slot));
        }
        let frame = scheduler.request_frame(FrameTask::StartAnimation { slot, generation });
        self.slots[slot.index()].running = Some(RunningAnimation {
            generation,
            pending_start: Some(frame),
        });
    }

    fn disarm_fade(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(timer) = self.fade_timer.take() {
            scheduler.disarm_timer(timer);
        }
    }

    fn bump_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }
}

fn millis(duration: web_time::Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
