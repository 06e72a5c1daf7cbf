//! End-to-end activation/deactivation scenarios driven through the public API.

use ftui_ripple::config::MIN_OPACITY_DURATION_DIVISOR;
use ftui_ripple::testing::{AdapterCall, RecordingAdapter};
use ftui_ripple::{
    ActivationPhase, AnimationOutcome, AnimationSlot, BoundingBox, EventKind, FrameTask,
    InputHandler, ManualScheduler, Point, RippleConfig, RippleConfigError, RippleEvent,
    RippleFoundation, StateMarker, StyleValue, StyleVar,
};
use pretty_assertions::assert_eq;
use web_time::Duration;

type Ripple = RippleFoundation<RecordingAdapter, ManualScheduler>;

fn ripple(adapter: RecordingAdapter) -> Ripple {
    let mut ripple = RippleFoundation::new(adapter, ManualScheduler::new());
    ripple.initialize();
    ripple.run_frame();
    ripple
}

fn at(kind: EventKind, x: f64, y: f64) -> RippleEvent {
    RippleEvent::new(kind, Point::new(x, y))
}

fn key(kind: EventKind) -> RippleEvent {
    RippleEvent::positionless(kind)
}

fn pending_deactivations(ripple: &Ripple) -> usize {
    ripple
        .scheduler()
        .pending_frames()
        .filter(|task| matches!(task, FrameTask::AnimateDeactivation { .. }))
        .count()
}

// ---------------------------------------------------------------------------
// Initialization and layout
// ---------------------------------------------------------------------------

#[test]
fn initialize_registers_every_listener_and_lays_out() {
    let ripple = ripple(RecordingAdapter::new());
    let adapter = ripple.adapter();

    for kind in EventKind::ACTIVATION {
        assert!(adapter.is_registered(kind, InputHandler::Activate), "{kind:?}");
    }
    for kind in EventKind::DEACTIVATION {
        assert!(adapter.is_registered(kind, InputHandler::Deactivate), "{kind:?}");
    }
    assert!(adapter.is_registered(EventKind::Focus, InputHandler::Focus));
    assert!(adapter.is_registered(EventKind::Blur, InputHandler::Blur));
    assert!(adapter.is_resize_registered(InputHandler::Resize));

    assert!(adapter.has_marker(StateMarker::Root));
    assert!(!adapter.has_marker(StateMarker::Unbounded));
    assert_eq!(
        adapter.style_var(StyleVar::SurfaceWidth),
        Some(StyleValue::Px(100.0))
    );
    assert_eq!(adapter.style_var(StyleVar::FgSize), Some(StyleValue::Px(60.0)));
    assert_eq!(adapter.style_var(StyleVar::Left), None);

    let metrics = ripple.layout_metrics();
    assert!((metrics.max_radius - 121.803).abs() < 1e-3);
    assert_eq!(
        adapter.style_var(StyleVar::FgScale),
        Some(StyleValue::Number(metrics.fg_scale))
    );
    assert_eq!(
        adapter.style_var(StyleVar::FgUnboundedTransformDuration),
        Some(StyleValue::Ms(metrics.xf_duration_ms.round()))
    );
}

#[test]
fn unbounded_layout_publishes_centered_coords() {
    let adapter = RecordingAdapter::new()
        .unbounded()
        .with_bounding_box(BoundingBox::new(0.0, 0.0, 40.0, 40.0));
    let ripple = ripple(adapter);

    assert!(ripple.adapter().has_marker(StateMarker::Unbounded));
    // initial 24, centered at 20 -> 8
    assert_eq!(ripple.unbounded_coords().left, 8.0);
    assert_eq!(
        ripple.adapter().style_var(StyleVar::Top),
        Some(StyleValue::Px(8.0))
    );
}

#[test]
fn layout_requests_coalesce_per_frame() {
    let mut ripple = ripple(RecordingAdapter::new());
    ripple.trigger_layout();
    ripple.trigger_layout();
    ripple.handle_event(InputHandler::Resize, &key(EventKind::Focus));
    assert_eq!(ripple.scheduler().pending_frames().count(), 1);

    ripple
        .adapter_mut()
        .set_bounding_box(BoundingBox::new(0.0, 0.0, 200.0, 80.0));
    assert_eq!(ripple.run_frame(), 1);
    assert_eq!(ripple.frame().width, 200.0);
    assert_eq!(ripple.layout_metrics().initial_size, 120.0);
    assert_eq!(
        ripple.adapter().style_var(StyleVar::SurfaceHeight),
        Some(StyleValue::Px(80.0))
    );
}

// ---------------------------------------------------------------------------
// Bounded cycles
// ---------------------------------------------------------------------------

#[test]
fn bounded_mouse_cycle_translates_from_press_point_to_center() {
    let mut ripple = ripple(RecordingAdapter::new());

    ripple.on_activation_event(at(EventKind::MouseDown, 10.0, 10.0));
    assert!(ripple.activation_state().was_activated_by_pointer);
    ripple.run_frame();
    assert!(ripple.adapter().has_marker(StateMarker::BackgroundActive));
    assert!(ripple.activation_state().was_element_made_active);

    ripple.on_deactivation_event(at(EventKind::MouseUp, 10.0, 10.0));
    assert!(ripple.activation_state().is_at_rest());
    assert_eq!(pending_deactivations(&ripple), 1);

    ripple.run_frame();
    let adapter = ripple.adapter();
    assert!(!adapter.has_marker(StateMarker::BackgroundActive));
    assert_eq!(
        adapter.style_var(StyleVar::FgTranslateStart),
        Some(StyleValue::Translate(Point::new(-20.0, -20.0)))
    );
    assert_eq!(
        adapter.style_var(StyleVar::FgTranslateEnd),
        Some(StyleValue::Translate(Point::new(20.0, -5.0)))
    );

    ripple.run_frame();
    assert!(ripple
        .adapter()
        .has_marker(StateMarker::BackgroundBoundedActiveFill));
    assert!(ripple
        .adapter()
        .has_marker(StateMarker::ForegroundBoundedActiveFill));

    ripple.handle_event(
        InputHandler::AnimationComplete(AnimationSlot::BackgroundBounded),
        &key(EventKind::TransitionEnd),
    );
    ripple.handle_event(
        InputHandler::AnimationComplete(AnimationSlot::ForegroundBounded),
        &key(EventKind::AnimationEnd),
    );
    assert!(!ripple
        .adapter()
        .has_marker(StateMarker::BackgroundBoundedActiveFill));
    assert!(!ripple
        .adapter()
        .has_marker(StateMarker::ForegroundBoundedActiveFill));
    assert_eq!(
        ripple.animations().last_outcome(AnimationSlot::ForegroundBounded),
        Some(AnimationOutcome::Completed)
    );
}

#[test]
fn press_point_is_normalized_by_viewport_and_box() {
    let adapter = RecordingAdapter::new()
        .with_bounding_box(BoundingBox::new(30.0, 40.0, 100.0, 50.0))
        .with_viewport_offset(Point::new(0.0, 200.0));
    let mut ripple = ripple(adapter);

    ripple.on_activation_event(at(EventKind::MouseDown, 40.0, 250.0));
    ripple.run_frame();
    ripple.on_deactivation_event(at(EventKind::MouseUp, 40.0, 250.0));
    ripple.run_frame();

    // page (40, 250) - (30, 240) = (10, 10)
    assert_eq!(
        ripple.adapter().style_var(StyleVar::FgTranslateStart),
        Some(StyleValue::Translate(Point::new(-20.0, -20.0)))
    );
}

#[test]
fn keyboard_cycle_ripples_from_center() {
    let mut ripple = ripple(RecordingAdapter::new());
    ripple.adapter_mut().set_pressed(true);

    ripple.on_activation_event(key(EventKind::KeyDown));
    assert!(!ripple.activation_state().was_activated_by_pointer);
    ripple.run_frame();
    assert_eq!(ripple.phase(), ActivationPhase::Active);

    ripple.on_deactivation_event(key(EventKind::KeyUp));
    assert!(ripple.activation_state().is_at_rest());
    ripple.run_frame();

    let center = Some(StyleValue::Translate(Point::new(20.0, -5.0)));
    assert_eq!(ripple.adapter().style_var(StyleVar::FgTranslateStart), center);
    assert_eq!(ripple.adapter().style_var(StyleVar::FgTranslateEnd), center);
}

#[test]
fn keyboard_without_pressed_surface_resets_and_adds_nothing() {
    let mut ripple = ripple(RecordingAdapter::new());
    ripple.adapter_mut().clear_calls();

    ripple.on_activation_event(key(EventKind::KeyDown));
    assert!(ripple.activation_state().is_activated);
    ripple.run_frame();

    assert!(ripple.activation_state().is_at_rest());
    assert!(
        !ripple
            .adapter()
            .calls()
            .iter()
            .any(|call| matches!(call, AdapterCall::AddMarker(_))),
        "{:?}",
        ripple.adapter().calls()
    );
}

#[test]
fn fast_tap_within_one_frame_still_plays_both_halves() {
    let mut ripple = ripple(RecordingAdapter::new());

    ripple.on_activation_event(at(EventKind::MouseDown, 50.0, 25.0));
    ripple.on_deactivation_event(at(EventKind::MouseUp, 50.0, 25.0));
    assert!(ripple.activation_state().is_at_rest());

    ripple.run_frame();
    assert!(ripple.adapter().was_added(StateMarker::BackgroundActive));
    assert!(!ripple.adapter().has_marker(StateMarker::BackgroundActive));

    ripple.run_frame();
    assert!(ripple
        .adapter()
        .has_marker(StateMarker::ForegroundBoundedActiveFill));
}

// ---------------------------------------------------------------------------
// Pairing and duplicate events
// ---------------------------------------------------------------------------

#[test]
fn touch_then_synthesized_mouse_up_plays_once_and_resets_on_mouse_up() {
    let mut ripple = ripple(RecordingAdapter::new());

    ripple.on_activation_event(at(EventKind::TouchStart, 10.0, 10.0));
    ripple.run_frame();

    ripple.on_deactivation_event(at(EventKind::TouchEnd, 10.0, 10.0));
    assert_eq!(pending_deactivations(&ripple), 1);
    assert!(ripple.activation_state().is_activated);
    assert_eq!(ripple.phase(), ActivationPhase::Deactivating);

    ripple.on_deactivation_event(at(EventKind::MouseUp, 10.0, 10.0));
    assert_eq!(pending_deactivations(&ripple), 1);
    assert!(ripple.activation_state().is_at_rest());

    ripple.run_frame();
    ripple.run_frame();
    for marker in [
        StateMarker::BackgroundBoundedActiveFill,
        StateMarker::ForegroundBoundedActiveFill,
    ] {
        let adds = ripple
            .adapter()
            .calls()
            .iter()
            .filter(|call| **call == AdapterCall::AddMarker(marker))
            .count();
        assert_eq!(adds, 1, "{marker:?}");
        assert!(ripple.adapter().has_marker(marker));
    }
}

#[test]
fn duplicate_activation_is_a_no_op() {
    let mut ripple = ripple(RecordingAdapter::new());

    ripple.on_activation_event(at(EventKind::TouchStart, 10.0, 10.0));
    let before = *ripple.activation_state();
    let frames_before = ripple.scheduler().pending_frames().count();

    ripple.handle_event(InputHandler::Activate, &at(EventKind::PointerDown, 99.0, 99.0));
    ripple.on_activation_event(at(EventKind::MouseDown, 5.0, 5.0));

    assert_eq!(*ripple.activation_state(), before);
    assert_eq!(ripple.scheduler().pending_frames().count(), frames_before);
}

#[test]
fn deactivation_without_activation_is_ignored() {
    let mut ripple = ripple(RecordingAdapter::new());
    ripple.adapter_mut().clear_calls();

    ripple.on_deactivation_event(at(EventKind::MouseUp, 1.0, 1.0));
    ripple.handle_event(InputHandler::Deactivate, &key(EventKind::KeyUp));

    assert!(ripple.activation_state().is_at_rest());
    assert_eq!(ripple.scheduler().pending_frames().count(), 0);
    assert!(ripple.adapter().calls().is_empty());
}

#[test]
fn unpaired_end_event_leaves_keyboard_cycle_running() {
    let mut ripple = ripple(RecordingAdapter::new());
    ripple.adapter_mut().set_pressed(true);

    ripple.on_activation_event(key(EventKind::KeyDown));
    ripple.run_frame();
    ripple.on_deactivation_event(at(EventKind::MouseUp, 1.0, 1.0));

    assert_eq!(pending_deactivations(&ripple), 0);
    assert_eq!(ripple.phase(), ActivationPhase::Active);
}

#[test]
fn pointer_cycle_mouse_up_resets_without_visuals() {
    let mut ripple = ripple(RecordingAdapter::new());

    ripple.on_activation_event(at(EventKind::PointerDown, 10.0, 10.0));
    ripple.run_frame();
    ripple.on_deactivation_event(at(EventKind::MouseUp, 10.0, 10.0));

    assert_eq!(pending_deactivations(&ripple), 0);
    assert!(ripple.activation_state().is_at_rest());
}

// ---------------------------------------------------------------------------
// Unbounded cycles
// ---------------------------------------------------------------------------

#[test]
fn unbounded_release_fades_from_reached_scale() {
    let mut ripple = ripple(RecordingAdapter::new().unbounded());

    ripple.on_activation_event(at(EventKind::PointerDown, 10.0, 10.0));
    ripple.run_frame();
    assert!(ripple
        .adapter()
        .has_marker(StateMarker::ForegroundUnboundedActivation));

    ripple.advance(Duration::from_millis(500));
    ripple.on_deactivation_event(at(EventKind::PointerUp, 10.0, 10.0));
    ripple.run_frame();

    let fg_scale = ripple.layout_metrics().fg_scale;
    let adapter = ripple.adapter();
    assert!(!adapter.has_marker(StateMarker::ForegroundUnboundedActivation));
    assert!(adapter.has_marker(StateMarker::ForegroundUnboundedDeactivation));
    assert_eq!(
        adapter.style_var(StyleVar::FgApproxTransform),
        Some(StyleValue::Scale(fg_scale))
    );
    assert_eq!(
        adapter.style_var(StyleVar::FgUnboundedTransformDuration),
        Some(StyleValue::Ms(200.0))
    );
    assert!(ripple.animations().is_fade_armed());

    // Fade lasts 1000 / 3 ms.
    assert_eq!(ripple.advance(Duration::from_millis(333)), 0);
    assert_eq!(ripple.advance(Duration::from_millis(1)), 1);
    assert!(!ripple
        .adapter()
        .has_marker(StateMarker::ForegroundUnboundedDeactivation));
}

#[test]
fn quick_unbounded_release_uses_minimum_fade() {
    let mut ripple = ripple(RecordingAdapter::new().unbounded());

    ripple.on_activation_event(at(EventKind::MouseDown, 0.0, 0.0));
    ripple.run_frame();
    ripple.advance(Duration::from_millis(20));
    ripple.on_deactivation_event(at(EventKind::MouseUp, 0.0, 0.0));
    ripple.run_frame();

    assert_eq!(
        ripple.adapter().style_var(StyleVar::FgApproxTransform),
        Some(StyleValue::Scale(0.0))
    );
    assert_eq!(
        ripple
            .adapter()
            .style_var(StyleVar::FgUnboundedOpacityDuration),
        Some(StyleValue::Ms(200.0))
    );
}

#[test]
fn new_activation_disarms_pending_fade() {
    let mut ripple = ripple(RecordingAdapter::new().unbounded());

    ripple.on_activation_event(at(EventKind::PointerDown, 10.0, 10.0));
    ripple.run_frame();
    ripple.on_deactivation_event(at(EventKind::PointerUp, 10.0, 10.0));
    ripple.run_frame();
    assert_eq!(ripple.scheduler().armed_timers(), 1);

    ripple.on_deactivation_event(at(EventKind::MouseUp, 10.0, 10.0));
    ripple.on_activation_event(at(EventKind::PointerDown, 10.0, 10.0));
    ripple.run_frame();

    assert_eq!(ripple.scheduler().armed_timers(), 0);
    assert!(!ripple.animations().is_fade_armed());
    assert!(!ripple
        .adapter()
        .has_marker(StateMarker::ForegroundUnboundedDeactivation));
    assert!(ripple
        .adapter()
        .has_marker(StateMarker::ForegroundUnboundedActivation));
}

// ---------------------------------------------------------------------------
// Focus channel, teardown, unsupported environments
// ---------------------------------------------------------------------------

#[test]
fn focus_channel_is_independent_of_activation() {
    let mut ripple = ripple(RecordingAdapter::new());

    ripple.handle_event(InputHandler::Focus, &key(EventKind::Focus));
    ripple.run_frame();
    assert!(ripple.adapter().has_marker(StateMarker::BackgroundActive));
    assert!(ripple.activation_state().is_at_rest());

    ripple.handle_event(InputHandler::Blur, &key(EventKind::Blur));
    ripple.run_frame();
    assert!(!ripple.adapter().has_marker(StateMarker::BackgroundActive));
    assert!(ripple.activation_state().is_at_rest());
}

#[test]
fn teardown_unregisters_and_clears_surface() {
    let mut ripple = ripple(RecordingAdapter::new());
    ripple.on_activation_event(at(EventKind::MouseDown, 10.0, 10.0));
    ripple.run_frame();
    ripple.on_deactivation_event(at(EventKind::MouseUp, 10.0, 10.0));
    ripple.run_frame();
    ripple.trigger_layout();

    ripple.teardown();
    assert_eq!(ripple.adapter().handler_count(), 0);
    assert!(!ripple.adapter().is_resize_registered(InputHandler::Resize));
    assert_eq!(
        ripple.animations().last_outcome(AnimationSlot::BackgroundBounded),
        Some(AnimationOutcome::Cancelled)
    );

    ripple.run_frame();
    assert!(!ripple.adapter().has_marker(StateMarker::Root));
    assert_eq!(ripple.adapter().style_var_count(), 0);
    assert!(ripple.adapter().markers().is_empty());

    // Late input after teardown does nothing.
    ripple.on_activation_event(at(EventKind::MouseDown, 10.0, 10.0));
    assert!(ripple.activation_state().is_at_rest());
}

#[test]
fn unsupported_environment_is_inert() {
    let mut ripple = RippleFoundation::new(
        RecordingAdapter::new().unsupported(),
        ManualScheduler::new(),
    );
    assert!(!ripple.is_supported());

    ripple.initialize();
    ripple.trigger_layout();
    ripple.on_activation_event(at(EventKind::MouseDown, 1.0, 1.0));
    assert_eq!(ripple.run_frame(), 0);
    ripple.teardown();

    assert!(ripple.adapter().calls().is_empty());
    assert_eq!(ripple.scheduler().armed_timers(), 0);
    assert_eq!(ripple.scheduler().pending_frames().count(), 0);
}

#[test]
fn invalid_config_is_rejected() {
    let config = RippleConfig {
        opacity_duration_divisor: -1.0,
        ..RippleConfig::default()
    };
    let result =
        RippleFoundation::with_config(RecordingAdapter::new(), ManualScheduler::new(), config);
    assert!(matches!(
        result,
        Err(RippleConfigError::InvalidOpacityDivisor { .. })
    ));
}

#[test]
fn vanishing_opacity_divisor_is_rejected() {
    let config = RippleConfig {
        opacity_duration_divisor: 1e-300,
        ..RippleConfig::default()
    };
    let result = RippleFoundation::with_config(
        RecordingAdapter::new().unbounded(),
        ManualScheduler::new(),
        config,
    );
    assert!(matches!(
        result,
        Err(RippleConfigError::InvalidOpacityDivisor { .. })
    ));
}

#[test]
fn smallest_opacity_divisor_gives_long_fade() {
    let config = RippleConfig {
        opacity_duration_divisor: MIN_OPACITY_DURATION_DIVISOR,
        ..RippleConfig::default()
    };
    let mut ripple = RippleFoundation::with_config(
        RecordingAdapter::new().unbounded(),
        ManualScheduler::new(),
        config,
    )
    .expect("valid config");
    ripple.initialize();
    ripple.run_frame();

    ripple.on_activation_event(at(EventKind::MouseDown, 10.0, 10.0));
    ripple.run_frame();
    ripple.advance(Duration::from_millis(500));
    ripple.on_deactivation_event(at(EventKind::MouseUp, 10.0, 10.0));
    ripple.run_frame();

    // Full opacity over a 1e-3 divisor: 1000s.
    assert_eq!(
        ripple.scheduler().next_deadline(),
        Some(Duration::from_secs(1000))
    );
    assert_eq!(ripple.advance(Duration::from_secs(1000)), 1);
    assert!(!ripple
        .adapter()
        .has_marker(StateMarker::ForegroundUnboundedDeactivation));
}

#[test]
fn custom_config_changes_geometry() {
    let config = RippleConfig {
        padding: 0.0,
        initial_origin_scale: 0.5,
        ..RippleConfig::default()
    };
    let mut ripple =
        RippleFoundation::with_config(RecordingAdapter::new(), ManualScheduler::new(), config)
            .expect("valid config");
    ripple.initialize();
    ripple.run_frame();
    assert_eq!(ripple.layout_metrics().initial_size, 50.0);
    assert!((ripple.layout_metrics().max_radius - 111.803).abs() < 1e-3);
}
