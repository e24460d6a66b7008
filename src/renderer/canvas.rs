//! Canvas 2D backend (wasm32 only)

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::frame::{DrawCmd, Frame, ImageHandle, ImageSlot, Surface, TextAlign};

/// Image elements shared between the asset provider (which loads them) and
/// the canvas (which draws them)
#[derive(Default)]
pub struct ImageBank {
    images: HashMap<ImageSlot, HtmlImageElement>,
}

impl ImageBank {
    pub fn insert(&mut self, slot: ImageSlot, image: HtmlImageElement) {
        self.images.insert(slot, image);
    }

    pub fn remove(&mut self, slot: ImageSlot) {
        self.images.remove(&slot);
    }

    /// Handle for `slot`, only once the browser has decoded the image
    pub fn handle(&self, slot: ImageSlot) -> Option<ImageHandle> {
        let image = self.images.get(&slot)?;
        if !image.complete() || image.natural_width() == 0 {
            return None;
        }
        Some(ImageHandle {
            slot,
            width: image.natural_width() as f32,
            height: image.natural_height() as f32,
        })
    }

    fn element(&self, slot: ImageSlot) -> Option<&HtmlImageElement> {
        self.images.get(&slot)
    }
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    images: Rc<RefCell<ImageBank>>,
}

impl CanvasSurface {
    /// Returns None if the canvas has no 2D context
    pub fn new(canvas: HtmlCanvasElement, images: Rc<RefCell<ImageBank>>) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            canvas,
            ctx,
            images,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn draw(&self, cmd: &DrawCmd, frame: &Frame) {
        let ctx = &self.ctx;
        match cmd {
            DrawCmd::Clear(color) => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_rect(0.0, 0.0, frame.width as f64, frame.height as f64);
            }
            DrawCmd::FillRect { pos, size, color } => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
            }
            DrawCmd::StrokeRect {
                pos,
                size,
                color,
                line_width,
            } => {
                ctx.set_stroke_style_str(&color.to_css());
                ctx.set_line_width(*line_width as f64);
                ctx.stroke_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
            }
            DrawCmd::FillCircle {
                center,
                radius,
                color,
            } => {
                ctx.begin_path();
                ctx.set_fill_style_str(&color.to_css());
                ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    *radius as f64,
                    0.0,
                    std::f64::consts::TAU,
                )
                .ok();
                ctx.fill();
            }
            DrawCmd::Image {
                slot,
                pos,
                size,
                rotation_deg,
            } => {
                let images = self.images.borrow();
                // Unloaded between compose and present: skip this frame
                let Some(image) = images.element(*slot) else {
                    return;
                };
                let (w, h) = (size.x as f64, size.y as f64);
                if *rotation_deg == 0.0 {
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        image,
                        pos.x as f64,
                        pos.y as f64,
                        w,
                        h,
                    )
                    .ok();
                } else {
                    ctx.save();
                    ctx.translate(pos.x as f64 + w / 2.0, pos.y as f64 + h / 2.0)
                        .ok();
                    ctx.rotate((*rotation_deg as f64).to_radians()).ok();
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        image,
                        -w / 2.0,
                        -h / 2.0,
                        w,
                        h,
                    )
                    .ok();
                    ctx.restore();
                }
            }
            DrawCmd::Text {
                text,
                pos,
                font_px,
                bold,
                align,
                color,
            } => {
                let weight = if *bold { "bold " } else { "" };
                ctx.set_font(&format!("{weight}{font_px}px Arial"));
                ctx.set_text_align(match align {
                    TextAlign::Left => "left",
                    TextAlign::Center => "center",
                });
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
            }
        }
    }
}

impl Surface for CanvasSurface {
    fn present(&mut self, frame: &Frame) {
        for cmd in &frame.commands {
            self.draw(cmd, frame);
        }
    }
}
