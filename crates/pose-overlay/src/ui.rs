//! Publishing the hand presence signal to UI elements.
//!
//! UI elements are injected once as trait objects and any of them may be absent. Publishing never
//! fails: a missing element is simply skipped.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, PoisonError,
};

pub const HAND_DETECTED: &str = "Mão detectada!";
pub const HAND_NOT_DETECTED: &str = "Mão não detectada.";
pub const READY: &str = "Movimente a mão na frente da câmera!";
pub const NO_POSE: &str = "Nenhuma pose detectada.";

/// A UI element holding a checked/unchecked state, like a checkbox or switch.
pub trait Toggle {
    fn set_checked(&mut self, checked: bool);
}

/// A UI element displaying a line of text.
pub trait TextSink {
    fn set_text(&mut self, text: &str);
}

/// What a successful frame found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    /// Number of keypoints scoring above the confidence threshold.
    pub confident: usize,
    pub hand_detected: bool,
}

/// Returns the short text describing the hand presence signal.
pub fn hand_text(hand_detected: bool) -> &'static str {
    if hand_detected {
        HAND_DETECTED
    } else {
        HAND_NOT_DETECTED
    }
}

/// Formats the combined status line shown in the info element.
pub fn info_line(status: &Status) -> String {
    let hand = if status.hand_detected {
        " | Mão detectada! Tocha acesa."
    } else {
        " | Mão não detectada."
    };
    format!("Pontos detectados: {}{}", status.confident, hand)
}

/// The set of UI elements the frame loop writes to.
#[derive(Default)]
pub struct UiSinks {
    torch_switch: Option<Box<dyn Toggle>>,
    torch_text: Option<Box<dyn TextSink>>,
    info: Option<Box<dyn TextSink>>,
}

impl UiSinks {
    /// Creates an empty set of sinks. Publishing to it does nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the toggle that is checked while a hand is detected.
    pub fn torch_switch(self, toggle: impl Toggle + 'static) -> Self {
        Self {
            torch_switch: Some(Box::new(toggle)),
            ..self
        }
    }

    /// Sets the element that receives the short hand detection text.
    pub fn torch_text(self, sink: impl TextSink + 'static) -> Self {
        Self {
            torch_text: Some(Box::new(sink)),
            ..self
        }
    }

    /// Sets the element that receives the combined status line.
    pub fn info(self, sink: impl TextSink + 'static) -> Self {
        Self {
            info: Some(Box::new(sink)),
            ..self
        }
    }

    /// Shows the initial instructions once the loop starts running.
    pub fn announce_ready(&mut self) {
        if let Some(info) = &mut self.info {
            info.set_text(READY);
        }
    }

    /// Resets every element to the "no pose" state after a failed frame.
    pub fn publish_no_pose(&mut self) {
        self.write(false, NO_POSE);
    }

    fn write(&mut self, hand_detected: bool, info_text: &str) {
        if let Some(toggle) = &mut self.torch_switch {
            toggle.set_checked(hand_detected);
        }
        if let Some(text) = &mut self.torch_text {
            text.set_text(hand_text(hand_detected));
        }
        if let Some(info) = &mut self.info {
            info.set_text(info_text);
        }
    }
}

/// Writes the outcome of a frame to `sinks`.
pub fn publish(status: &Status, sinks: &mut UiSinks) {
    sinks.write(status.hand_detected, &info_line(status));
}

/// A shared in-memory checkbox.
///
/// Clones refer to the same state, so one clone can be handed to [`UiSinks`] while another one is
/// used to read the state back.
#[derive(Debug, Clone, Default)]
pub struct Checkbox(Arc<AtomicBool>);

impl Checkbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_checked(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Toggle for Checkbox {
    fn set_checked(&mut self, checked: bool) {
        self.0.store(checked, Ordering::Relaxed);
    }
}

/// A shared in-memory text label.
///
/// Clones refer to the same text.
#[derive(Debug, Clone, Default)]
pub struct Label(Arc<Mutex<String>>);

impl Label {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl TextSink for Label {
    fn set_text(&mut self, text: &str) {
        let mut current = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        current.clear();
        current.push_str(text);
    }
}

/// A text sink that logs its text whenever it changes.
pub struct LogLabel {
    name: &'static str,
    last: Option<String>,
}

impl LogLabel {
    pub fn new(name: &'static str) -> Self {
        Self { name, last: None }
    }
}

impl TextSink for LogLabel {
    fn set_text(&mut self, text: &str) {
        if self.last.as_deref() != Some(text) {
            log::info!("{}: {}", self.name, text);
            self.last = Some(text.to_string());
        }
    }
}

/// A toggle that logs its state whenever it changes.
impl Toggle for LogLabel {
    fn set_checked(&mut self, checked: bool) {
        let text = if checked { "on" } else { "off" };
        self.set_text(text);
    }
}
