#![forbid(unsafe_code)]

//! Deferred execution: next-frame callbacks, one-shot timers, and the clock.
//!
//! The ripple core never sleeps or spawns. Anything that must happen later
//! is described as data ([`FrameTask`] or [`TimerTask`]) and handed to a
//! [`Scheduler`]. When the host's frame or timer fires, it passes the task
//! back to [`RippleFoundation::run_frame_task`] or
//! [`RippleFoundation::run_timer_task`].
//!
//! [`ManualScheduler`] is a deterministic implementation with a virtual
//! clock, suitable for tests and for hosts that pump frames themselves.
//!
//! [`RippleFoundation::run_frame_task`]: crate::RippleFoundation::run_frame_task
//! [`RippleFoundation::run_timer_task`]: crate::RippleFoundation::run_timer_task

use web_time::{Duration, Instant};

use crate::animation::AnimationSlot;
use crate::event::RippleEvent;
use crate::foundation::ActivationState;

/// Handle to a pending frame task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

/// Handle to an armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Work deferred to just before the next render.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameTask {
    /// Apply root markers and run the first layout pass.
    Initialize,
    /// Remove root markers and clear style variables.
    Teardown,
    /// Coalesced layout pass.
    Layout,
    /// Confirm that activation cycle `cycle` visually registered.
    ConfirmActivation { cycle: u64, event: RippleEvent },
    /// Play deactivation visuals from the state captured at decision time.
    AnimateDeactivation {
        event: RippleEvent,
        snapshot: ActivationState,
    },
    /// Apply the marker of an animation registered earlier.
    StartAnimation { slot: AnimationSlot, generation: u64 },
    /// Independent focus highlight channel.
    FocusChanged { focused: bool },
}

/// Work fired by a one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// The unbounded fade-out finished.
    UnboundedFadeComplete,
}

/// Frame, timer and clock capabilities injected into the foundation.
pub trait Scheduler {
    /// Current time.
    fn now(&self) -> Instant;

    /// Run `task` before the next render.
    fn request_frame(&mut self, task: FrameTask) -> FrameHandle;

    /// Drop a pending frame task. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Fire `task` once after `delay`.
    fn arm_timer(&mut self, delay: Duration, task: TimerTask) -> TimerHandle;

    /// Disarm a timer. Unknown or already fired handles are ignored.
    fn disarm_timer(&mut self, handle: TimerHandle);
}

#[derive(Debug, Clone)]
struct ArmedTimer {
    handle: TimerHandle,
    deadline: Duration,
    task: TimerTask,
}

/// Deterministic scheduler driven by explicit frame and clock advances.
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    origin: Instant,
    elapsed: Duration,
    next_id: u64,
    frames: Vec<(FrameHandle, FrameTask)>,
    timers: Vec<ArmedTimer>,
}

impl ManualScheduler {
    /// Create a scheduler whose virtual clock starts now.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a scheduler whose virtual clock starts at `origin`.
    #[must_use]
    pub fn starting_at(origin: Instant) -> Self {
        Self {
            origin,
            elapsed: Duration::ZERO,
            next_id: 1,
            frames: Vec::new(),
            timers: Vec::new(),
        }
    }

    /// Move the virtual clock forward.
    pub fn advance_clock(&mut self, dt: Duration) {
        self.elapsed += dt;
    }

    /// Virtual time since the scheduler was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Remove and return every pending frame task, in request order.
    pub fn take_frame_tasks(&mut self) -> Vec<FrameTask> {
        self.frames.drain(..).map(|(_, task)| task).collect()
    }

    /// Remove and return timers whose deadline has passed, earliest first.
    pub fn take_due_timers(&mut self) -> Vec<TimerTask> {
        let now = self.elapsed;
        let mut due: Vec<ArmedTimer> = Vec::new();
        self.timers.retain(|timer| {
            if timer.deadline <= now {
                due.push(timer.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|timer| (timer.deadline, timer.handle));
        due.into_iter().map(|timer| timer.task).collect()
    }

    /// Pending frame tasks, in request order.
    pub fn pending_frames(&self) -> impl Iterator<Item = &FrameTask> {
        self.frames.iter().map(|(_, task)| task)
    }

    /// Number of armed timers.
    #[must_use]
    pub fn armed_timers(&self) -> usize {
        self.timers.len()
    }

    /// Time left until the earliest armed timer fires.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers
            .iter()
            .map(|timer| timer.deadline.saturating_sub(self.elapsed))
            .min()
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    fn request_frame(&mut self, task: FrameTask) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.frames.push((handle, task));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.retain(|(h, _)| *h != handle);
    }

    fn arm_timer(&mut self, delay: Duration, task: TimerTask) -> TimerHandle {
        let handle = TimerHandle(self.next_id());
        self.timers.push(ArmedTimer {
            handle,
            deadline: self.elapsed.saturating_add(delay),
            task,
        });
        handle
    }

    fn disarm_timer(&mut self, handle: TimerHandle) {
        self.timers.retain(|timer| timer.handle != handle);
    }
}
