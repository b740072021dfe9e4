//! Overlay configuration.

use std::env;

use overlay_image::Color;

/// Default confidence threshold for drawing keypoints and detecting hands.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.5;

/// Colors and sizes used to draw the pose overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    /// Radius of the filled keypoint marker, in pixels.
    pub marker_radius: f32,
    pub marker_color: Color,
    pub label_color: Color,
    /// Offset of a label's baseline origin from its keypoint.
    pub label_offset: (f32, f32),
    pub edge_color: Color,
    pub edge_width: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            marker_radius: 8.0,
            marker_color: Color::from_hex(0x00ffea),
            label_color: Color::WHITE,
            label_offset: (10.0, 4.0),
            edge_color: Color::from_hex(0xff0055),
            edge_width: 3,
        }
    }
}

/// Options controlling the frame loop.
///
/// Created with [`OverlayOptions::default`] or [`OverlayOptions::from_env`] and customized with
/// the builder methods.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayOptions {
    min_confidence: f32,
    lamp: bool,
    refresh_rate: u32,
    style: OverlayStyle,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            lamp: false,
            refresh_rate: 60,
            style: OverlayStyle::default(),
        }
    }
}

impl OverlayOptions {
    /// Creates the default options, then applies overrides from the environment.
    ///
    /// See the crate documentation for the supported variables. Invalid values are logged and
    /// ignored.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides obtained from `lookup`, which maps a variable name to its value.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = lookup("POSE_OVERLAY_MIN_CONFIDENCE") {
            match value.trim().parse::<f32>() {
                Ok(v) if (0.0..=1.0).contains(&v) => self.min_confidence = v,
                _ => log::warn!(
                    "ignoring POSE_OVERLAY_MIN_CONFIDENCE='{value}' (expected a number between 0 and 1)"
                ),
            }
        }
        if let Some(value) = lookup("POSE_OVERLAY_LAMP") {
            match value.trim() {
                "1" | "true" => self.lamp = true,
                "0" | "false" => self.lamp = false,
                _ => log::warn!("ignoring POSE_OVERLAY_LAMP='{value}' (expected 0, 1, true or false)"),
            }
        }
        if let Some(value) = lookup("POSE_OVERLAY_FPS") {
            match value.trim().parse::<u32>() {
                Ok(fps) if fps > 0 => self.refresh_rate = fps,
                _ => log::warn!("ignoring POSE_OVERLAY_FPS='{value}' (expected a positive integer)"),
            }
        }
        self
    }

    /// Sets the confidence threshold. Keypoints, edges and wrists must score strictly above it.
    ///
    /// # Panics
    ///
    /// Panics if `min_confidence` is not in range 0.0 to 1.0.
    pub fn min_confidence(self, min_confidence: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&min_confidence),
            "confidence threshold must be between 0 and 1"
        );
        Self {
            min_confidence,
            ..self
        }
    }

    /// Enables or disables the lamp indicator in the top right corner of the overlay.
    pub fn lamp(self, lamp: bool) -> Self {
        Self { lamp, ..self }
    }

    /// Sets the display refresh rate the loop is paced to, in frames per second.
    ///
    /// # Panics
    ///
    /// Panics if `fps` is zero.
    pub fn refresh_rate(self, fps: u32) -> Self {
        assert!(fps != 0, "refresh rate must be non-zero");
        Self {
            refresh_rate: fps,
            ..self
        }
    }

    pub fn style(self, style: OverlayStyle) -> Self {
        Self { style, ..self }
    }

    #[inline]
    pub fn confidence_threshold(&self) -> f32 {
        self.min_confidence
    }

    #[inline]
    pub fn lamp_enabled(&self) -> bool {
        self.lamp
    }

    #[inline]
    pub fn frames_per_second(&self) -> u32 {
        self.refresh_rate
    }

    #[inline]
    pub fn overlay_style(&self) -> &OverlayStyle {
        &self.style
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let opts = OverlayOptions::default();
        assert_eq!(opts.confidence_threshold(), 0.5);
        assert!(!opts.lamp_enabled());
        assert_eq!(opts.frames_per_second(), 60);
        assert_eq!(opts.overlay_style().marker_radius, 8.0);
        assert_eq!(opts.overlay_style().edge_width, 3);
    }

    #[test]
    fn overrides() {
        let opts = OverlayOptions::default().with_overrides(env(&[
            ("POSE_OVERLAY_MIN_CONFIDENCE", "0.3"),
            ("POSE_OVERLAY_LAMP", "true"),
            ("POSE_OVERLAY_FPS", " 30 "),
        ]));
        assert_eq!(opts.confidence_threshold(), 0.3);
        assert!(opts.lamp_enabled());
        assert_eq!(opts.frames_per_second(), 30);
    }

    #[test]
    fn invalid_overrides_are_ignored() {
        let opts = OverlayOptions::default().with_overrides(env(&[
            ("POSE_OVERLAY_MIN_CONFIDENCE", "1.5"),
            ("POSE_OVERLAY_LAMP", "yes"),
            ("POSE_OVERLAY_FPS", "0"),
        ]));
        assert_eq!(opts, OverlayOptions::default());
    }

    #[test]
    #[should_panic(expected = "between 0 and 1")]
    fn threshold_out_of_range() {
        OverlayOptions::default().min_confidence(-0.1);
    }
}
