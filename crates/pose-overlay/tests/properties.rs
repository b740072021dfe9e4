use approx::assert_relative_eq;
use pose_overlay::{
    hand::hand_present,
    image::{Color, Image, Resolution},
    options::OverlayStyle,
    pose::{BodyPart, Keypoint, Pose, Position},
    render::{draw_keypoints, draw_skeleton},
    surface::{Command, DisplayList, Surface},
    topology::PoseNetTopology,
};

const ITERATIONS: usize = 500;

/// Generates a pose with a distinct position for every keypoint and random scores.
///
/// Some scores are set to exactly `min_confidence` to exercise the threshold boundary.
fn random_pose(rng: &mut fastrand::Rng, min_confidence: f32) -> Pose {
    BodyPart::ALL
        .into_iter()
        .enumerate()
        .map(|(i, part)| {
            let position = Position::new(
                i as f32 * 28.0 + rng.f32() * 20.0,
                rng.f32() * 360.0,
            );
            let score = if rng.u8(..8) == 0 {
                min_confidence
            } else {
                rng.f32()
            };
            Keypoint::new(part, position, score)
        })
        .collect()
}

fn render(pose: &Pose, min_confidence: f32) -> DisplayList {
    let style = OverlayStyle::default();
    let mut list = DisplayList::new(Resolution::RES_360P);
    draw_keypoints(&mut list, pose, min_confidence, &style);
    draw_skeleton(&mut list, pose, min_confidence, &PoseNetTopology, &style);
    list
}

#[test]
fn unconfident_keypoints_leave_no_trace() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for _ in 0..ITERATIONS {
        let min_confidence = rng.f32();
        let pose = random_pose(&mut rng, min_confidence);
        let list = render(&pose, min_confidence);

        for kp in pose.keypoints().iter().filter(|kp| kp.score() <= min_confidence) {
            let pos = kp.position();
            assert!(list.circles().all(|c| c != pos), "marker drawn for {kp:?}");
            assert!(list.texts().all(|t| t != kp.part().name()), "label drawn for {kp:?}");
            assert!(
                list.lines().all(|(a, b)| a != pos && b != pos),
                "edge drawn to {kp:?}"
            );
        }
    }
}

#[test]
fn confident_keypoints_get_one_marker_and_label() {
    let mut rng = fastrand::Rng::with_seed(42);
    for _ in 0..ITERATIONS {
        let min_confidence = rng.f32();
        let pose = random_pose(&mut rng, min_confidence);
        let list = render(&pose, min_confidence);

        let confident: Vec<_> = pose
            .keypoints()
            .iter()
            .filter(|kp| kp.score() > min_confidence)
            .collect();
        assert_eq!(list.circles().count(), confident.len());
        assert_eq!(list.texts().count(), confident.len());

        for kp in confident {
            let pos = kp.position();
            assert_eq!(list.circles().filter(|&c| c == pos).count(), 1);
            assert_eq!(
                list.texts().filter(|&t| t == kp.part().name()).count(),
                1
            );
        }
    }
}

#[test]
fn labels_are_offset_from_markers() {
    let style = OverlayStyle::default();
    let pose = Pose::new(vec![Keypoint::new(
        BodyPart::LeftKnee,
        Position::new(101.3, 57.9),
        0.75,
    )]);
    let mut list = DisplayList::new(Resolution::RES_360P);
    draw_keypoints(&mut list, &pose, 0.5, &style);

    let Some(Command::Text { at, text, color }) = list.commands().get(1) else {
        panic!("expected a label after the marker, got {:?}", list.commands());
    };
    assert_eq!(text, "leftKnee");
    assert_eq!(*color, Color::WHITE);
    assert_relative_eq!(at.x, 111.3);
    assert_relative_eq!(at.y, 61.9);
}

#[test]
fn hand_presence_follows_wrists() {
    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..ITERATIONS {
        let pose = random_pose(&mut rng, 0.5);
        let expected =
            pose.score(BodyPart::LeftWrist) > 0.5 || pose.score(BodyPart::RightWrist) > 0.5;

        assert_eq!(hand_present(&pose, 0.5), expected);
        assert_eq!(hand_present(&pose, 0.5), hand_present(&pose, 0.5));
    }
}

#[test]
fn clearing_restores_empty_surface() {
    let mut rng = fastrand::Rng::with_seed(1234);
    for _ in 0..20 {
        let pose = random_pose(&mut rng, 0.3);

        let mut list = render(&pose, 0.3);
        list.clear();
        assert!(list.is_empty());

        let mut image = Image::new(480, 360);
        let style = OverlayStyle::default();
        draw_keypoints(&mut image, &pose, 0.3, &style);
        draw_skeleton(&mut image, &pose, 0.3, &PoseNetTopology, &style);
        Surface::clear(&mut image);
        assert!(image.is_uniform(Color::NONE));
    }
}
