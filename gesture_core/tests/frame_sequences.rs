//! Frame-sequence behaviour of the controller, driven through the public API.

use gesture_core::synthetic::pose_at;
use gesture_core::{
    Action, ControlConfig, FingerState, GestureController, HandFrame, Key, KeyLog, PolicyKind,
};

fn motion_controller() -> GestureController {
    GestureController::new(ControlConfig {
        policy: PolicyKind::Motion,
        ..ControlConfig::default()
    })
}

fn two_hand_motion_controller() -> GestureController {
    GestureController::new(ControlConfig {
        policy: PolicyKind::Motion,
        max_hands: 2,
        ..ControlConfig::default()
    })
}

/// Open palms at the given pixel x positions, all at y = 200.
fn palms_px(t: f64, xs: &[f32]) -> HandFrame {
    HandFrame {
        timestamp: t,
        hands: xs
            .iter()
            .map(|x| pose_at(x / 640.0, 200.0 / 480.0, FingerState::OPEN))
            .collect(),
    }
}

/// Open palm with its centroid at pixel `(x, y)` of a 640×480 frame.
fn palm_px(t: f64, x: f32, y: f32) -> HandFrame {
    HandFrame::single(t, pose_at(x / 640.0, y / 480.0, FingerState::OPEN))
}

#[test]
fn open_palm_swipe_right() {
    let mut c = motion_controller();
    let mut sink = KeyLog::default();
    let path = [(100.0, 200.0), (100.0, 200.0), (100.0, 200.0), (180.0, 205.0)];
    let mut last = None;
    for (i, (x, y)) in path.into_iter().enumerate() {
        last = Some(c.process_frame(&palm_px(i as f64 * 0.033, x, y), &mut sink));
    }
    let last = last.unwrap();
    assert_eq!(last.hands[0].action, Action::MoveRight);
    assert_eq!(sink.keys, vec![Key::Right]);
    assert_eq!(c.latched_action(), Some(Action::MoveRight));
}

#[test]
fn open_palm_swipe_up_and_down() {
    let mut c = motion_controller();
    let mut sink = KeyLog::default();
    c.process_frame(&palm_px(0.0, 320.0, 300.0), &mut sink);
    c.process_frame(&palm_px(0.033, 322.0, 220.0), &mut sink);
    assert_eq!(sink.keys, vec![Key::Up]);

    // Hand leaves, history starts over.
    c.process_frame(&HandFrame::empty(0.5), &mut sink);
    c.process_frame(&palm_px(0.533, 320.0, 200.0), &mut sink);
    c.process_frame(&palm_px(0.566, 318.0, 290.0), &mut sink);
    assert_eq!(sink.keys, vec![Key::Up, Key::Down]);
}

#[test]
fn still_open_palm_does_nothing() {
    let mut c = motion_controller();
    let mut sink = KeyLog::default();
    for i in 0..10 {
        c.process_frame(&palm_px(i as f64 * 0.033, 320.0, 240.0), &mut sink);
    }
    assert!(sink.keys.is_empty());
}

#[test]
fn motion_cannot_span_a_detection_gap() {
    let mut c = motion_controller();
    let mut sink = KeyLog::default();
    c.process_frame(&palm_px(0.0, 100.0, 240.0), &mut sink);
    c.process_frame(&HandFrame::empty(0.033), &mut sink);
    assert!(!c.hand_present());
    assert_eq!(c.latched_action(), None);

    // Without the gap this pair would be a right swipe.
    let r = c.process_frame(&palm_px(0.066, 300.0, 240.0), &mut sink);
    assert_eq!(r.hands[0].action, Action::None);
    assert!(sink.keys.is_empty());
}

#[test]
fn gap_clears_latched_label_in_static_mode() {
    let mut c = GestureController::new(ControlConfig::default());
    let mut sink = KeyLog::default();
    let point = pose_at(0.5, 0.5, FingerState::from_bits([0, 1, 0, 0, 0]));
    c.process_frame(&HandFrame::single(0.0, point), &mut sink);
    assert_eq!(c.label(), Some("Swipe Right"));
    c.process_frame(&HandFrame::empty(0.1), &mut sink);
    assert_eq!(c.label(), None);
}

#[test]
fn held_pose_repeats_only_after_cooldown() {
    let mut c = GestureController::new(ControlConfig::default());
    let mut sink = KeyLog::default();
    let peace = pose_at(0.5, 0.5, FingerState::from_bits([0, 1, 1, 0, 0]));

    // 8 fps for one second.
    for i in 0..8 {
        c.process_frame(&HandFrame::single(i as f64 * 0.125, peace.clone()), &mut sink);
    }
    // Fires at 0.0, 0.375 and 0.75.
    assert_eq!(sink.keys, vec![Key::Left; 3]);
}

#[test]
fn dispatches_are_spaced_by_more_than_cooldown() {
    let cfg = ControlConfig { cooldown_seconds: 0.25, ..ControlConfig::default() };
    let mut c = GestureController::new(cfg);
    let mut sink = KeyLog::default();
    let poses = [
        FingerState::from_bits([0, 1, 0, 0, 0]),
        FingerState::OPEN,
        FingerState::CLOSED,
        FingerState::from_bits([0, 1, 1, 0, 0]),
        FingerState::from_bits([1, 0, 1, 0, 1]),
    ];

    let mut times = Vec::new();
    for i in 0..120 {
        let t = i as f64 * 0.02;
        let hand = pose_at(0.5, 0.5, poses[i % poses.len()]);
        let r = c.process_frame(&HandFrame::single(t, hand), &mut sink);
        if !r.dispatched.is_empty() {
            times.push(t);
        }
    }
    assert!(times.len() > 2);
    for w in times.windows(2) {
        assert!(w[1] - w[0] > 0.25, "dispatches at {} and {}", w[0], w[1]);
    }
}

#[test]
fn config_file_round_trip_through_yaml() {
    let c = ControlConfig::from_yaml("policy: motion\nmovement_threshold_px: 50\n").unwrap();
    let mut ctrl = GestureController::new(c);
    let mut sink = KeyLog::default();
    ctrl.process_frame(&palm_px(0.0, 100.0, 240.0), &mut sink);
    ctrl.process_frame(&palm_px(0.033, 140.0, 240.0), &mut sink);
    // 40 px is under the raised threshold.
    assert!(sink.keys.is_empty());
    ctrl.process_frame(&palm_px(0.066, 170.0, 240.0), &mut sink);
    assert_eq!(sink.keys, vec![Key::Right]);
}

#[test]
fn hand_leaving_is_not_a_swipe_for_the_other() {
    let mut c = two_hand_motion_controller();
    let mut sink = KeyLog::default();
    c.process_frame(&palms_px(0.0, &[100.0, 500.0]), &mut sink);
    // The left palm drops out; the right one has not moved.
    let r = c.process_frame(&palms_px(0.033, &[500.0]), &mut sink);
    assert_eq!(r.hands[0].action, Action::None);
    assert!(sink.keys.is_empty());
}

#[test]
fn swapped_detection_order_is_not_a_swipe() {
    let mut c = two_hand_motion_controller();
    let mut sink = KeyLog::default();
    c.process_frame(&palms_px(0.0, &[100.0, 500.0]), &mut sink);
    c.process_frame(&palms_px(0.033, &[500.0, 100.0]), &mut sink);
    c.process_frame(&palms_px(0.066, &[100.0, 500.0]), &mut sink);
    assert!(sink.keys.is_empty());
}

#[test]
fn hand_count_changes_keep_each_hand_history() {
    let mut c = two_hand_motion_controller();
    let mut sink = KeyLog::default();

    c.process_frame(&palms_px(0.0, &[100.0, 500.0]), &mut sink);
    let r = c.process_frame(&palms_px(0.033, &[500.0]), &mut sink);
    let slot = r.hands[0].slot;
    assert_eq!(slot, 1);

    // The remaining palm swipes right using the history it built with two hands in view.
    let r = c.process_frame(&palms_px(0.066, &[580.0]), &mut sink);
    assert_eq!(r.hands[0].slot, slot);
    assert_eq!(sink.keys, vec![Key::Right]);

    // A newcomer starts from an empty history and takes the free slot.
    let r = c.process_frame(&palms_px(0.5, &[580.0, 300.0]), &mut sink);
    assert_eq!(r.hands[1].slot, 0);
    assert_eq!(r.hands[1].action, Action::None);
}
