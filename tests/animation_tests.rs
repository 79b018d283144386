//! Animation Playback Tests
//!
//! Tests for:
//! - KeyframeStore construction, ordering checks and stateless sampling
//! - Channel cursor: first-frame boundary, looping, flat extrapolation
//! - Interpolatable implementations (f32, Vec3, shortest-arc Quat)
//! - AnimatedInstance enable/disable and channel reset

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::sync::Arc;

use glam::{Quat, Vec3};

use marrow::MarrowError;
use marrow::animation::{
    AnimatedInstance, Channel, Interpolatable, Keyframe, KeyframeStore, Sequence,
};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_quat(a: Quat, b: Quat) -> bool {
    // q and -q are the same rotation
    a.dot(b).abs() > 1.0 - EPSILON
}

/// Two keys, `0.0` at t=0 and `10.0` at t=1, one-second clip.
fn ramp(duration: f32) -> Arc<KeyframeStore<f32>> {
    Arc::new(KeyframeStore::from_samples(&[0.0, 10.0], 1.0, duration))
}

fn sampled(channel: &mut Channel<f32>, delta: f32) -> f32 {
    channel.advance(delta);
    channel.update();
    channel.value()
}

// ============================================================================
// KeyframeStore
// ============================================================================

#[test]
fn store_duration_covers_last_key() {
    let store = KeyframeStore::from_samples(&[0.0_f32, 1.0, 2.0], 0.5, 0.25);
    assert!(approx(store.duration_seconds(), 1.0));

    let store = KeyframeStore::from_samples(&[0.0_f32, 1.0], 0.5, 3.0);
    assert!(approx(store.duration_seconds(), 3.0));
}

#[test]
fn store_accepts_repeated_times() {
    let store = KeyframeStore::new(
        vec![Keyframe::new(0.0, 1.0_f32), Keyframe::new(0.0, 2.0)],
        0.0,
    )
    .unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn store_sample_clamps_both_ends() {
    let store = KeyframeStore::new(
        vec![Keyframe::new(1.0, 10.0_f32), Keyframe::new(2.0, 20.0)],
        2.0,
    )
    .unwrap();

    assert!(approx(store.sample(-5.0), 10.0));
    assert!(approx(store.sample(0.5), 10.0));
    assert!(approx(store.sample(1.5), 15.0));
    assert!(approx(store.sample(9.0), 20.0));
    assert!(approx(store.pre_infinity(), 10.0));
    assert!(approx(store.post_infinity(), 20.0));
}

#[test]
fn store_empty_evaluates_to_default() {
    let store = KeyframeStore::<Quat>::empty();
    assert!(store.is_empty());
    assert_eq!(store.sample(0.5), Quat::IDENTITY);
}

// ============================================================================
// Channel: Boundaries
// ============================================================================

#[test]
fn channel_zero_advance_yields_first_key() {
    let mut channel = Channel::new(ramp(1.0), 1.0);
    let value = sampled(&mut channel, 0.0);
    assert_eq!(value, 0.0, "alpha must be exactly zero on the first frame");
    assert_eq!(channel.current_frame(), 0);
}

#[test]
fn channel_midpoint_interpolates() {
    let mut channel = Channel::new(ramp(1.0), 1.0);
    let value = sampled(&mut channel, 0.5);
    assert!(approx(value, 5.0), "Expected 5.0, got {value}");
}

#[test]
fn channel_full_duration_loops_to_first_key() {
    let mut channel = Channel::new(ramp(1.0), 1.0);
    let value = sampled(&mut channel, 1.0);
    assert!(approx(value, 0.0), "Expected 0.0, got {value}");
    assert_eq!(channel.current_frame(), 0);
    assert!(channel.current_time_seconds() < 1.0);
}

#[test]
fn channel_incremental_steps_wrap() {
    let mut channel = Channel::new(ramp(1.0), 1.0);
    for _ in 0..3 {
        sampled(&mut channel, 0.25);
    }
    let value = sampled(&mut channel, 0.5);
    assert!(approx(value, 2.5), "Expected 2.5 after wrapping, got {value}");
}

#[test]
fn channel_large_delta_skips_whole_loops() {
    let mut channel = Channel::new(ramp(1.0), 1.0);
    let value = sampled(&mut channel, 2.25);
    assert!(approx(value, 2.5), "Expected 2.5, got {value}");
}

#[test]
fn channel_negative_delta_wraps_backwards() {
    let mut channel = Channel::new(ramp(1.0), 1.0);
    let value = sampled(&mut channel, -0.25);
    assert!(approx(value, 7.5), "Expected 7.5, got {value}");
    assert!(channel.current_time_seconds() >= 0.0);
}

#[test]
fn channel_holds_last_key_until_clip_ends() {
    // Keys end at 1s, the clip runs to 2s
    let mut channel = Channel::new(ramp(2.0), 1.0);
    let value = sampled(&mut channel, 1.5);
    assert!(approx(value, 10.0), "Expected flat 10.0, got {value}");
    assert_eq!(channel.current_frame(), 1);
}

#[test]
fn channel_single_key_is_time_invariant() {
    let store = Arc::new(KeyframeStore::from_samples(&[7.0_f32], 1.0, 1.0));
    let mut channel = Channel::new(store, 1.0);

    for delta in [0.0, 0.3, 5.0, 123.0, -2.0] {
        assert!(approx(sampled(&mut channel, delta), 7.0));
    }
    assert_eq!(channel.current_frame(), 0);
}

#[test]
fn channel_empty_store_writes_default() {
    let mut channel = Channel::new(Arc::new(KeyframeStore::<Vec3>::empty()), 1.0);
    channel.advance(0.5);
    channel.update();
    assert_eq!(channel.value(), Vec3::ZERO);
}

#[test]
fn channel_without_store_is_inert() {
    let mut channel = Channel::<f32>::default();
    assert!(approx(sampled(&mut channel, 1.0), 0.0));
    assert!(channel.data_source().is_none());
}

#[test]
fn channel_rebinding_resets_cursor() {
    let mut channel = Channel::new(ramp(1.0), 1.0);
    sampled(&mut channel, 0.75);

    channel.set_data_source(ramp(1.0), 1.0);
    assert_eq!(channel.current_frame(), 0);
    assert!(approx(channel.current_time_seconds(), 0.0));
}

// ============================================================================
// Interpolatable
// ============================================================================

#[test]
fn interpolate_vec3_is_linear() {
    let v = Vec3::interpolate(&Vec3::ZERO, &Vec3::new(2.0, 4.0, -6.0), 0.25);
    assert!(v.abs_diff_eq(Vec3::new(0.5, 1.0, -1.5), EPSILON));
}

#[test]
fn interpolate_scalar_extrapolates() {
    assert!(approx(f32::interpolate(&0.0, &10.0, 1.5), 15.0));
}

#[test]
fn interpolate_quat_halfway() {
    let from = Quat::IDENTITY;
    let to = Quat::from_rotation_z(FRAC_PI_2);
    let q = Quat::interpolate(&from, &to, 0.5);

    assert!(approx_quat(q, Quat::from_rotation_z(FRAC_PI_4)));
    assert!(approx(q.length(), 1.0));
}

#[test]
fn interpolate_quat_takes_shortest_arc() {
    let from = Quat::from_rotation_y(0.2);
    // Same rotation as rotation_y(0.6), stored in the opposite hemisphere
    let to = -Quat::from_rotation_y(0.6);

    let q = Quat::interpolate(&from, &to, 0.5);
    assert!(approx_quat(q, Quat::from_rotation_y(0.4)), "got {q}");
}

// ============================================================================
// AnimatedInstance
// ============================================================================

fn slide_and_turn() -> Arc<Sequence> {
    let sequence = Sequence::new(
        "slide",
        0.5,
        1.0,
        vec![KeyframeStore::from_samples(
            &[Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0)],
            0.5,
            1.0,
        )],
        vec![KeyframeStore::from_samples(
            &[
                Quat::IDENTITY,
                Quat::from_rotation_x(FRAC_PI_4),
                Quat::from_rotation_x(FRAC_PI_2),
            ],
            0.5,
            1.0,
        )],
    )
    .unwrap();
    Arc::new(sequence)
}

#[test]
fn sequence_rejects_mismatched_tracks() {
    let err = Sequence::new(
        "broken",
        1.0,
        1.0,
        vec![KeyframeStore::empty(), KeyframeStore::empty()],
        vec![KeyframeStore::empty()],
    )
    .unwrap_err();
    assert!(matches!(err, MarrowError::InvalidSequence { .. }));
}

#[test]
fn instance_reset_samples_first_frame() {
    let mut instance = AnimatedInstance::new(slide_and_turn());
    assert!(!instance.is_started());

    instance.reset_channels();
    assert!(instance.is_started());
    assert_eq!(instance.position(0), Vec3::ZERO);
    assert!(approx_quat(instance.rotation(0), Quat::IDENTITY));

    instance.advance(0.75);
    assert!(instance.position(0).abs_diff_eq(Vec3::new(1.5, 0.0, 0.0), EPSILON));

    instance.reset_channels();
    assert_eq!(instance.position(0), Vec3::ZERO);
    assert_eq!(instance.translation_channel(0).current_frame(), 0);
}

#[test]
fn instance_disabled_pose_is_frozen() {
    let mut instance = AnimatedInstance::new(slide_and_turn());
    instance.reset_channels();
    instance.advance(0.3);

    let before = instance.pose();
    instance.set_enabled(false);
    instance.advance(10.0);
    let after = instance.pose();

    assert_eq!(before, after);
    assert!(approx(instance.translation_channel(0).current_time_seconds(), 0.3));

    instance.set_enabled(true);
    instance.advance(0.2);
    assert!(instance.position(0).abs_diff_eq(Vec3::X, EPSILON));
}

#[test]
fn instance_get_pose_copies_overlap_only() {
    let mut instance = AnimatedInstance::new(slide_and_turn());
    instance.reset_channels();
    instance.advance(0.5);

    let mut positions = [Vec3::splat(9.0); 3];
    let mut rotations = [Quat::from_rotation_z(1.0); 3];
    instance.get_pose(&mut positions, &mut rotations);

    assert!(positions[0].abs_diff_eq(Vec3::X, EPSILON));
    assert!(approx_quat(rotations[0], Quat::from_rotation_x(FRAC_PI_4)));
    assert_eq!(positions[1], Vec3::splat(9.0));
    assert_eq!(rotations[2], Quat::from_rotation_z(1.0));
}

#[test]
fn instances_share_keyframe_data() {
    let sequence = slide_and_turn();
    let mut a = AnimatedInstance::new(Arc::clone(&sequence));
    let mut b = AnimatedInstance::new(Arc::clone(&sequence));
    a.reset_channels();
    b.reset_channels();

    a.advance(0.5);

    assert!(Arc::ptr_eq(a.sequence(), b.sequence()));
    assert!(Arc::ptr_eq(
        a.translation_channel(0).data_source().unwrap(),
        sequence.translation(0)
    ));
    assert!(a.position(0).abs_diff_eq(Vec3::X, EPSILON));
    assert_eq!(b.position(0), Vec3::ZERO);
}

/// Translation keys run to 1.5s, rotation keys stop at 0.5s (1.0s declared).
fn uneven_tracks() -> Arc<Sequence> {
    let sequence = Sequence::new(
        "uneven",
        0.5,
        1.0,
        vec![KeyframeStore::from_samples(
            &[Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0)],
            0.5,
            1.0,
        )],
        vec![KeyframeStore::from_samples(
            &[Quat::IDENTITY, Quat::from_rotation_z(FRAC_PI_2)],
            0.5,
            1.0,
        )],
    )
    .unwrap();
    Arc::new(sequence)
}

#[test]
fn instance_tracks_loop_at_clip_duration() {
    let sequence = uneven_tracks();
    assert!(approx(sequence.duration_seconds(), 1.5));

    let mut instance = AnimatedInstance::new(Arc::clone(&sequence));
    instance.reset_channels();
    assert!(approx(instance.rotation_channel(0).loop_duration_seconds(), 1.5));

    // Past the rotation keys but inside the clip: the short track holds its last key
    instance.advance(1.2);
    assert!(approx_quat(instance.rotation(0), Quat::from_rotation_z(FRAC_PI_2)));

    instance.reset_channels();
    instance.advance(1.5);
    assert!(instance.position(0).abs_diff_eq(Vec3::ZERO, EPSILON));
    assert!(
        approx_quat(instance.rotation(0), Quat::IDENTITY),
        "got {}",
        instance.rotation(0)
    );
}

#[test]
fn channel_loop_duration_never_cuts_the_store_short() {
    let channel = Channel::with_loop_duration(ramp(1.0), 1.0, 0.25);
    assert!(approx(channel.loop_duration_seconds(), 1.0));
}
