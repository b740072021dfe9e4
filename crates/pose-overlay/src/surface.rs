//! Immediate-mode drawing targets for the overlay.
//!
//! Renderers only talk to the [`Surface`] trait. It is implemented for [`Image`], which
//! rasterizes every primitive, and for [`DisplayList`], which records the draw commands so that
//! render output can be inspected.

use overlay_image::{draw, Color, Image, Rect, Resolution};

use crate::pose::Position;

/// Stroke and fill parameters of a drawn shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// Outline color and width in pixels.
    pub stroke: Option<(Color, u32)>,
    /// Interior color.
    pub fill: Option<Color>,
}

impl Style {
    /// A filled shape without outline.
    pub const fn fill(color: Color) -> Self {
        Self {
            stroke: None,
            fill: Some(color),
        }
    }

    /// An outline of the given width, without interior.
    pub const fn stroke(color: Color, width: u32) -> Self {
        Self {
            stroke: Some((color, width)),
            fill: None,
        }
    }

    /// Adds an interior color to `self`.
    pub const fn with_fill(self, color: Color) -> Self {
        Self {
            fill: Some(color),
            ..self
        }
    }
}

/// A 2D drawing target with a fixed logical size.
pub trait Surface {
    /// Returns the logical size of the surface.
    fn resolution(&self) -> Resolution;

    /// Erases everything drawn onto the surface.
    fn clear(&mut self);

    /// Erases the area covered by `rect`.
    fn clear_rect(&mut self, rect: Rect);

    fn circle(&mut self, center: Position, radius: f32, style: Style);

    fn line(&mut self, from: Position, to: Position, color: Color, width: u32);

    fn rect(&mut self, rect: Rect, style: Style);

    /// Draws `text` with its baseline starting at `at`.
    fn text(&mut self, at: Position, text: &str, color: Color);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn resolution(&self) -> Resolution {
        (**self).resolution()
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn clear_rect(&mut self, rect: Rect) {
        (**self).clear_rect(rect)
    }

    fn circle(&mut self, center: Position, radius: f32, style: Style) {
        (**self).circle(center, radius, style)
    }

    fn line(&mut self, from: Position, to: Position, color: Color, width: u32) {
        (**self).line(from, to, color, width)
    }

    fn rect(&mut self, rect: Rect, style: Style) {
        (**self).rect(rect, style)
    }

    fn text(&mut self, at: Position, text: &str, color: Color) {
        (**self).text(at, text, color)
    }
}

/// Text origins are clamped to this magnitude before rasterization, far outside of any surface.
const MAX_COORD: f32 = 1_000_000.0;

/// Circles larger than this are not drawn. The rasterizer works in `i32` and would overflow.
const MAX_RADIUS: f32 = 4096.0;

/// Line widths are capped to this many pixels.
const MAX_STROKE: u32 = 1024;

fn pixel(pos: Position) -> (i32, i32) {
    // NaN becomes 0 after the cast.
    let clamp = |v: f32| v.clamp(-MAX_COORD, MAX_COORD).round() as i32;
    (clamp(pos.x), clamp(pos.y))
}

/// Clips the segment `from`-`to` to the area `[-margin, width + margin] x [-margin, height +
/// margin]` (Liang-Barsky).
///
/// Returns [`None`] if no part of the segment lies inside the area or an endpoint is not finite.
fn clip_segment(
    from: Position,
    to: Position,
    res: Resolution,
    margin: f32,
) -> Option<(Position, Position)> {
    if ![from.x, from.y, to.x, to.y].iter().all(|v| v.is_finite()) {
        return None;
    }

    let (min_x, min_y) = (-margin, -margin);
    let max_x = res.width() as f32 + margin;
    let max_y = res.height() as f32 + margin;
    let (dx, dy) = (to.x - from.x, to.y - from.y);

    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;
    for (p, q) in [
        (-dx, from.x - min_x),
        (dx, max_x - from.x),
        (-dy, from.y - min_y),
        (dy, max_y - from.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        from.offset(t0 * dx, t0 * dy),
        from.offset(t1 * dx, t1 * dy),
    ))
}

/// Images are cleared to fully transparent black, so they can be composited onto a frame.
///
/// Shapes outside of the image, shapes with non-finite coordinates and circles with a radius
/// above 4096 pixels are skipped.
impl Surface for Image {
    fn resolution(&self) -> Resolution {
        Image::resolution(self)
    }

    fn clear(&mut self) {
        Image::clear(self, Color::NONE);
    }

    fn clear_rect(&mut self, rect: Rect) {
        Image::clear_rect(self, rect, Color::NONE);
    }

    fn circle(&mut self, center: Position, radius: f32, style: Style) {
        let finite = center.x.is_finite() && center.y.is_finite();
        if !finite || radius.is_nan() || radius > MAX_RADIUS {
            return;
        }
        let radius = radius.max(0.0);
        let stroke = style.stroke.map_or(0, |(_, width)| width.min(MAX_STROKE));
        let extent = radius + stroke as f32 + 1.0;
        let res = Image::resolution(self);
        if center.x + extent < 0.0
            || center.y + extent < 0.0
            || center.x - extent > res.width() as f32
            || center.y - extent > res.height() as f32
        {
            return;
        }

        let (x, y) = pixel(center);
        let diameter = (radius * 2.0).round() as u32 + 1;
        let mut guard = draw::circle(self, x, y, diameter);
        match style.stroke {
            Some((color, _)) => guard.color(color).stroke_width(stroke),
            None => guard.stroke_width(0),
        };
        if let Some(fill) = style.fill {
            guard.fill(fill);
        }
    }

    fn line(&mut self, from: Position, to: Position, color: Color, width: u32) {
        let width = width.min(MAX_STROKE);
        let margin = width as f32 + 1.0;
        let Some((from, to)) = clip_segment(from, to, Image::resolution(self), margin) else {
            return;
        };
        let (sx, sy) = pixel(from);
        let (ex, ey) = pixel(to);
        draw::line(self, sx, sy, ex, ey)
            .color(color)
            .stroke_width(width);
    }

    fn rect(&mut self, rect: Rect, style: Style) {
        let mut guard = draw::rect(self, rect);
        match style.stroke {
            Some((color, width)) => guard.color(color).stroke_width(width),
            None => guard.stroke_width(0),
        };
        if let Some(fill) = style.fill {
            guard.fill(fill);
        }
    }

    fn text(&mut self, at: Position, text: &str, color: Color) {
        let (x, y) = pixel(at);
        draw::text(self, x, y, text)
            .color(color)
            .align_left()
            .align_baseline();
    }
}

/// A draw command recorded by a [`DisplayList`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ClearRect(Rect),
    Circle {
        center: Position,
        radius: f32,
        style: Style,
    },
    Line {
        from: Position,
        to: Position,
        color: Color,
        width: u32,
    },
    Rect {
        rect: Rect,
        style: Style,
    },
    Text {
        at: Position,
        text: String,
        color: Color,
    },
}

/// A [`Surface`] that records draw commands instead of rasterizing them.
///
/// [`Surface::clear`] discards all recorded commands, so a cleared list is empty again.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    resolution: Resolution,
    commands: Vec<Command>,
}

impl DisplayList {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns the centers of all recorded circles.
    pub fn circles(&self) -> impl Iterator<Item = Position> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            Command::Circle { center, .. } => Some(*center),
            _ => None,
        })
    }

    /// Returns the endpoints of all recorded lines.
    pub fn lines(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            Command::Line { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
    }

    /// Returns all recorded text strings.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            Command::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for DisplayList {
    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn clear(&mut self) {
        self.commands.clear();
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.commands.push(Command::ClearRect(rect));
    }

    fn circle(&mut self, center: Position, radius: f32, style: Style) {
        self.commands.push(Command::Circle {
            center,
            radius,
            style,
        });
    }

    fn line(&mut self, from: Position, to: Position, color: Color, width: u32) {
        self.commands.push(Command::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn rect(&mut self, rect: Rect, style: Style) {
        self.commands.push(Command::Rect { rect, style });
    }

    fn text(&mut self, at: Position, text: &str, color: Color) {
        self.commands.push(Command::Text {
            at,
            text: text.to_string(),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_surface_clears_to_transparent() {
        let mut image = Image::new(32, 32);
        image.circle(Position::new(16.0, 16.0), 8.0, Style::fill(Color::RED));
        image.line(
            Position::new(0.0, 0.0),
            Position::new(31.0, 31.0),
            Color::BLUE,
            3,
        );
        image.text(Position::new(2.0, 12.0), "nose", Color::WHITE);
        assert_eq!(image.get(16, 10), Color::RED);
        assert_eq!(image.get(16, 16), Color::BLUE);

        Surface::clear(&mut image);
        assert!(image.is_uniform(Color::NONE));
    }

    #[test]
    fn image_surface_ignores_bad_coordinates() {
        let mut image = Image::new(8, 8);
        image.circle(Position::new(f32::NAN, -1e30), 8.0, Style::fill(Color::RED));
        image.circle(Position::new(1e30, 1e30), 8.0, Style::fill(Color::RED));
        image.line(
            Position::new(f32::INFINITY, 0.0),
            Position::new(1e9, 1e9),
            Color::RED,
            1,
        );
        assert!(image.is_uniform(Color::NONE));
    }

    #[test]
    fn long_lines_are_clipped() {
        let mut image = Image::new(32, 32);
        image.line(
            Position::new(4.0, 10.0),
            Position::new(50_000.0, 10.0),
            Color::RED,
            3,
        );
        assert_eq!(image.get(4, 10), Color::RED);
        assert_eq!(image.get(31, 10), Color::RED);
        assert_eq!(image.get(2, 10), Color::NONE);

        image.line(
            Position::new(-1e7, 20.0),
            Position::new(1e7, 20.0),
            Color::GREEN,
            1,
        );
        assert_eq!(image.get(0, 20), Color::GREEN);
        assert_eq!(image.get(31, 20), Color::GREEN);

        image.line(
            Position::new(-50_000.0, -50_000.0),
            Position::new(50_000.0, -50_000.0),
            Color::BLUE,
            3,
        );
        for y in 0..32 {
            for x in 0..32 {
                assert_ne!(image.get(x, y), Color::BLUE);
            }
        }
    }

    #[test]
    fn clip_keeps_inner_segments() {
        let res = Resolution::new(100, 100);
        let seg = (Position::new(10.0, 20.0), Position::new(30.0, 40.0));
        assert_eq!(clip_segment(seg.0, seg.1, res, 2.0), Some(seg));

        let (from, to) =
            clip_segment(Position::new(50.0, -100.0), Position::new(50.0, 300.0), res, 0.0)
                .unwrap();
        assert_eq!(from, Position::new(50.0, 0.0));
        assert_eq!(to, Position::new(50.0, 100.0));

        assert_eq!(
            clip_segment(Position::new(-10.0, -10.0), Position::new(-5.0, 200.0), res, 2.0),
            None
        );
        assert_eq!(
            clip_segment(Position::new(f32::NAN, 0.0), Position::new(5.0, 5.0), res, 2.0),
            None
        );
    }

    #[test]
    fn huge_circles_are_skipped() {
        let mut image = Image::new(16, 16);
        image.circle(Position::new(8.0, 8.0), f32::MAX, Style::fill(Color::RED));
        image.circle(Position::new(8.0, 8.0), f32::INFINITY, Style::fill(Color::RED));
        image.circle(
            Position::new(8.0, 8.0),
            1e9,
            Style::stroke(Color::RED, u32::MAX),
        );
        assert!(image.is_uniform(Color::NONE));

        image.circle(Position::new(8.0, 8.0), 3.0, Style::fill(Color::RED));
        assert_eq!(image.get(8, 8), Color::RED);
    }

    #[test]
    fn display_list_records_and_clears() {
        let mut list = DisplayList::new(Resolution::new(480, 360));
        list.circle(Position::new(1.0, 2.0), 8.0, Style::fill(Color::GREEN));
        list.text(Position::new(11.0, 6.0), "nose", Color::WHITE);
        list.line(Position::default(), Position::new(3.0, 4.0), Color::RED, 3);

        assert_eq!(list.circles().collect::<Vec<_>>(), [Position::new(1.0, 2.0)]);
        assert_eq!(list.texts().collect::<Vec<_>>(), ["nose"]);
        assert_eq!(list.lines().count(), 1);

        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.resolution(), Resolution::new(480, 360));
    }
}
