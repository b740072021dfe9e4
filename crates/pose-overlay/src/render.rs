//! Pose overlay rendering.

use std::f32::consts::PI;

use overlay_image::{Color, Rect};

use crate::{
    options::OverlayStyle,
    pose::{Pose, Position},
    surface::{Style, Surface},
    topology::Topology,
};

/// Draws a filled marker and a name label for every keypoint scoring above `min_confidence`.
///
/// Keypoints at or below the threshold are skipped entirely.
pub fn draw_keypoints<S: Surface + ?Sized>(
    surface: &mut S,
    pose: &Pose,
    min_confidence: f32,
    style: &OverlayStyle,
) {
    let (dx, dy) = style.label_offset;
    for kp in pose.confident(min_confidence) {
        let pos = kp.position();
        surface.circle(pos, style.marker_radius, Style::fill(style.marker_color));
        surface.text(pos.offset(dx, dy), kp.part().name(), style.label_color);
    }
}

/// Draws a line for every skeleton edge `topology` reports for `pose` at `min_confidence`.
pub fn draw_skeleton<S: Surface + ?Sized>(
    surface: &mut S,
    pose: &Pose,
    min_confidence: f32,
    topology: &dyn Topology,
    style: &OverlayStyle,
) {
    for pair in topology.adjacent_pairs(pose, min_confidence) {
        surface.line(
            pair.from.position(),
            pair.to.position(),
            style.edge_color,
            style.edge_width,
        );
    }
}

const LAMP_ON: Color = Color::from_hex(0xffe066);
const LAMP_OFF: Color = Color::from_hex(0xbbbbbb);
const LAMP_METAL: Color = Color::from_hex(0x888888);
const LAMP_FILAMENT: Color = Color::from_hex(0xffae00);

/// Draws a light bulb indicator into the top right corner of `surface`.
///
/// The bulb is lit and emits rays when `lit` is `true`. The corner area is cleared first, so the
/// lamp can be redrawn without clearing the whole surface.
pub fn draw_lamp<S: Surface + ?Sized>(surface: &mut S, lit: bool) {
    let w = surface.resolution().width() as i32;
    let right = w as f32;

    surface.clear_rect(Rect::from_top_left(w - 60, 5, 55, 80));

    let bulb = Position::new(right - 32.0, 32.0);
    let glass = if lit { LAMP_ON } else { LAMP_OFF };
    surface.circle(bulb, 18.0, Style::stroke(LAMP_METAL, 2).with_fill(glass));
    // The glass is a dome: keep the row through the center, erase everything below it.
    surface.clear_rect(Rect::from_top_left(w - 52, 33, 40, 19));

    surface.rect(
        Rect::from_top_left(w - 42, 50, 20, 12),
        Style::fill(LAMP_METAL),
    );

    surface.line(
        Position::new(right - 38.0, 38.0),
        Position::new(right - 26.0, 38.0),
        LAMP_FILAMENT,
        2,
    );

    if lit {
        for i in 0..8 {
            let angle = PI / 8.0 + i as f32 * PI / 4.0;
            let (sin, cos) = angle.sin_cos();
            surface.line(
                bulb.offset(cos * 22.0, sin * 22.0),
                bulb.offset(cos * 32.0, sin * 32.0),
                LAMP_ON,
                3,
            );
        }
    }

    surface.text(Position::new(right - 54.0, 75.0), "Lâmpada", Color::WHITE);
}

#[cfg(test)]
mod tests {
    use overlay_image::{Image, Resolution};

    use crate::{
        pose::{BodyPart, Keypoint},
        surface::{Command, DisplayList},
        topology::PoseNetTopology,
    };

    use super::*;

    fn list() -> DisplayList {
        DisplayList::new(Resolution::RES_360P)
    }

    #[test]
    fn markers_and_labels() {
        let pose = Pose::new(vec![
            Keypoint::new(BodyPart::Nose, Position::new(100.0, 50.0), 0.9),
            Keypoint::new(BodyPart::LeftEye, Position::new(110.0, 45.0), 0.5),
            Keypoint::new(BodyPart::RightEye, Position::new(90.0, 45.0), 0.2),
        ]);
        let style = OverlayStyle::default();
        let mut surface = list();
        draw_keypoints(&mut surface, &pose, 0.5, &style);

        assert_eq!(
            surface.commands(),
            [
                Command::Circle {
                    center: Position::new(100.0, 50.0),
                    radius: 8.0,
                    style: Style::fill(Color::from_hex(0x00ffea)),
                },
                Command::Text {
                    at: Position::new(110.0, 54.0),
                    text: "nose".into(),
                    color: Color::WHITE,
                },
            ]
        );
    }

    #[test]
    fn skeleton_edges() {
        let pose = Pose::uniform(Position::new(5.0, 5.0), 0.1)
            .with_score(BodyPart::LeftShoulder, 0.9)
            .with_score(BodyPart::RightShoulder, 0.9)
            .with_score(BodyPart::LeftElbow, 0.9);
        let mut surface = list();
        draw_skeleton(
            &mut surface,
            &pose,
            0.5,
            &PoseNetTopology,
            &OverlayStyle::default(),
        );

        // leftElbow-leftShoulder and leftShoulder-rightShoulder
        assert_eq!(surface.lines().count(), 2);
        assert!(surface.commands().iter().all(|cmd| matches!(
            cmd,
            Command::Line { color, width: 3, .. } if *color == Color::from_hex(0xff0055)
        )));
    }

    #[test]
    fn nothing_confident_draws_nothing() {
        let pose = Pose::uniform(Position::new(5.0, 5.0), 0.5);
        let style = OverlayStyle::default();
        let mut surface = list();
        draw_keypoints(&mut surface, &pose, 0.5, &style);
        draw_skeleton(&mut surface, &pose, 0.5, &PoseNetTopology, &style);
        assert!(surface.is_empty());
    }

    #[test]
    fn lamp_rays_only_when_lit() {
        let mut off = list();
        draw_lamp(&mut off, false);
        let mut on = list();
        draw_lamp(&mut on, true);

        assert_eq!(on.lines().count(), off.lines().count() + 8);
        assert_eq!(on.texts().collect::<Vec<_>>(), ["Lâmpada"]);
        assert_eq!(
            off.commands()[0],
            Command::ClearRect(Rect::from_top_left(420, 5, 55, 80))
        );
        assert_eq!(
            off.commands()[2],
            Command::ClearRect(Rect::from_top_left(428, 33, 40, 19))
        );
    }

    #[test]
    fn lamp_on_image() {
        let mut image = Image::new(480, 360);
        draw_lamp(&mut image, true);
        assert_eq!(image.get(448, 32), LAMP_ON);
        assert_eq!(image.get(448, 20), LAMP_ON);
        // Only the upper half of the bulb is drawn.
        assert_eq!(image.get(448, 45), Color::NONE);
        assert_eq!(image.get(436, 44), Color::NONE);
        // Outside the lamp corner nothing is touched.
        assert_eq!(image.get(10, 300), Color::NONE);

        draw_lamp(&mut image, false);
        assert_eq!(image.get(448, 32), LAMP_OFF);
    }
}
