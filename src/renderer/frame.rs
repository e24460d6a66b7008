//! Display list for one frame
//!
//! The compose step emits a [`Frame`] of [`DrawCmd`]s; a [`Surface`] executes
//! it. Keeping the two apart means frames can be inspected headlessly.

use glam::Vec2;

/// sRGB colour with straight alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS colour string for canvas fill/stroke styles
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

pub mod palette {
    use super::Color;

    pub const SKY: Color = Color::rgb(0x87, 0xCE, 0xEB);
    pub const BRICK: Color = Color::rgb(0x8B, 0x45, 0x13);
    pub const BRICK_EDGE: Color = Color::rgb(0x65, 0x43, 0x21);
    pub const AVATAR_FALLBACK: Color = Color::rgb(0xFF, 0xD7, 0x00);
    pub const HAZARD_FALLBACK: Color = Color::rgb(0xFF, 0x00, 0x00);
    pub const HEART: Color = Color::rgb(0xFF, 0x00, 0x00);
    pub const HUD_TEXT: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const PROMPT: Color = Color::rgba(0, 0, 0, 0.7);
}

/// Which themed image a command refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    Avatar,
    Obstacle,
    Hazard,
}

/// A loaded image as seen by the compose step: which slot, and its natural size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageHandle {
    pub slot: ImageSlot,
    pub width: f32,
    pub height: f32,
}

impl ImageHandle {
    /// Height when scaled to `width`, or None for a degenerate image
    pub fn height_at_width(&self, width: f32) -> Option<f32> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some(width * self.height / self.width)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Fill the whole surface
    Clear(Color),
    FillRect {
        pos: Vec2,
        size: Vec2,
        color: Color,
    },
    StrokeRect {
        pos: Vec2,
        size: Vec2,
        color: Color,
        line_width: f32,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    /// Draw `slot` stretched into the rect, rotated about its centre
    Image {
        slot: ImageSlot,
        pos: Vec2,
        size: Vec2,
        rotation_deg: f32,
    },
    Text {
        text: String,
        pos: Vec2,
        font_px: f32,
        bold: bool,
        align: TextAlign,
        color: Color,
    },
}

/// Everything needed to paint one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCmd>,
}

impl Frame {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::with_capacity(64),
        }
    }

    #[inline]
    pub fn push(&mut self, cmd: DrawCmd) {
        self.commands.push(cmd);
    }

    /// All text drawn this frame, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn images(&self, slot: ImageSlot) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::Image { slot: s, .. } if *s == slot))
            .count()
    }
}

/// Something that can paint a [`Frame`]
pub trait Surface {
    fn present(&mut self, frame: &Frame);
}

/// Keeps the most recent frame; used by the native build and tests
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub frames_presented: u64,
    pub last: Option<Frame>,
}

impl Surface for RecordingSurface {
    fn present(&mut self, frame: &Frame) {
        self.frames_presented += 1;
        self.last = Some(frame.clone());
    }
}
