//! Canvas rendering module
//!
//! Composition is pure and runs everywhere; only the canvas backend is
//! browser specific.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod compose;
pub mod frame;

#[cfg(target_arch = "wasm32")]
pub use canvas::{CanvasSurface, ImageBank};
pub use compose::{FrameImages, HudOptions, ObstacleStyle, compose_frame};
pub use frame::{Color, DrawCmd, Frame, ImageHandle, ImageSlot, RecordingSurface, Surface};
