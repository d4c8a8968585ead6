//! Text output side channel.
//!
//! User-visible messages (objectives, rejected transitions, remote step
//! errors) are rendered through a [`TextOutput`] instead of crossing the
//! controller boundary as errors.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// RGBA colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    // Matches the engine's yellow, which is not pure (1, 1, 0).
    pub const YELLOW: Self = Self::rgb(1.0, 0.92, 0.016);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldAndItalic,
}

/// The line currently shown on a text output.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedText {
    pub text: String,
    pub color: Color,
    pub style: FontStyle,
}

impl Default for DisplayedText {
    fn default() -> Self {
        Self {
            text: String::new(),
            color: Color::BLACK,
            style: FontStyle::Normal,
        }
    }
}

/// Sink for user-visible text.
pub trait TextOutput {
    /// Replaces the displayed text.
    fn show(&mut self, text: &str, color: Color, style: FontStyle);

    /// Removes any displayed text.
    fn clear(&mut self) {
        self.show("", Color::BLACK, FontStyle::Normal);
    }
}

/// Cloneable text output; every clone displays the same line.
///
/// Hosts hand one clone to a controller and keep another to read back
/// what is displayed.
#[derive(Debug, Clone, Default)]
pub struct TextPanel {
    current: Rc<RefCell<DisplayedText>>,
}

impl TextPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> DisplayedText {
        self.current.borrow().clone()
    }

    pub fn text(&self) -> String {
        self.current.borrow().text.clone()
    }
}

impl TextOutput for TextPanel {
    fn show(&mut self, text: &str, color: Color, style: FontStyle) {
        let mut current = self.current.borrow_mut();
        current.text = text.to_string();
        current.color = color;
        current.style = style;
    }
}
