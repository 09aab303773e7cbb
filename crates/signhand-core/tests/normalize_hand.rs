use approx::assert_relative_eq;
use nalgebra::Point2;
use signhand_core::{
    normalize, to_pixel_landmarks, Hand, Keypoint, LandmarkNormalizer, NormalizerParams,
    PixelClamp, FEATURE_LEN, HAND_LANDMARK_COUNT,
};

fn hand_from(points: &[(f32, f32)]) -> Hand {
    Hand::new(points.iter().map(|&(x, y)| Keypoint::new(x, y)).collect()).expect("hand")
}

/// Deterministic, hand-like spread of keypoints around `(cx, cy)`.
fn spread_hand(cx: f32, cy: f32, size: f32) -> Hand {
    let points: Vec<(f32, f32)> = (0..HAND_LANDMARK_COUNT)
        .map(|i| {
            let finger = (i.max(1) - 1) / 4;
            let joint = (i.max(1) - 1) % 4;
            if i == 0 {
                (cx, cy)
            } else {
                (
                    cx + size * (finger as f32 - 2.0) * 0.2,
                    cy - size * (joint as f32 + 1.0) * 0.2,
                )
            }
        })
        .collect();
    hand_from(&points)
}

#[test]
fn single_displaced_joint_becomes_unit_x() {
    let mut points = vec![(0.1, 0.1); HAND_LANDMARK_COUNT];
    points[1] = (0.6, 0.1);
    let hand = hand_from(&points);

    let pixels = to_pixel_landmarks(hand.keypoints(), 100, 100, PixelClamp::UpperOnly)
        .expect("pixels");
    assert_eq!(pixels.points()[0], Point2::new(10, 10));
    assert_eq!(pixels.points()[1], Point2::new(60, 10));
    assert!(pixels.points()[2..].iter().all(|p| *p == Point2::new(10, 10)));

    let features = normalize(&pixels);
    let mut expected = vec![0.0f32; FEATURE_LEN];
    expected[2] = 1.0;
    assert_eq!(features.as_slice(), expected.as_slice());
}

#[test]
fn features_start_at_origin_and_have_unit_max() {
    let normalizer = LandmarkNormalizer::default();
    for (cx, cy, size, w, h) in [
        (0.5, 0.8, 0.4, 640, 480),
        (0.2, 0.6, 0.3, 1920, 1080),
        (0.9, 0.95, 0.5, 224, 224),
    ] {
        let hand = spread_hand(cx, cy, size);
        let out = normalizer.normalize_hand(&hand, w, h).expect("normalized");
        assert!(!out.degenerate);
        assert_eq!(out.features.len(), FEATURE_LEN);
        assert_eq!(&out.features.as_slice()[..2], &[0.0, 0.0]);
        assert_eq!(out.features.max_abs(), 1.0);
        for p in out.pixels.points() {
            assert!(p.x < w as i32 && p.y < h as i32);
        }
    }
}

#[test]
fn features_do_not_depend_on_hand_position() {
    let normalizer = LandmarkNormalizer::default();
    let a = normalizer
        .normalize_hand(&spread_hand(0.3, 0.7, 0.4), 1000, 1000)
        .expect("a");
    let b = normalizer
        .normalize_hand(&spread_hand(0.5, 0.6, 0.4), 1000, 1000)
        .expect("b");
    for (x, y) in a.features.as_slice().iter().zip(b.features.as_slice()) {
        assert_relative_eq!(*x, *y, epsilon = 0.02);
    }
}

#[test]
fn clamp_policy_only_changes_negative_coordinates() {
    let mut points = vec![(0.4, 0.4); HAND_LANDMARK_COUNT];
    points[4] = (-0.1, 0.3);
    let hand = hand_from(&points);

    let parity = LandmarkNormalizer::default()
        .to_pixel_landmarks(&hand, 100, 100)
        .expect("pixels");
    let clamped = LandmarkNormalizer::new(NormalizerParams {
        pixel_clamp: PixelClamp::Both,
    })
    .to_pixel_landmarks(&hand, 100, 100)
    .expect("pixels");

    assert!(parity.points()[4].x < 0);
    assert_eq!(clamped.points()[4].x, 0);
    assert_eq!(parity.points()[4].y, clamped.points()[4].y);
    assert_eq!(parity.points()[0], clamped.points()[0]);
}
