//! Frame composition
//!
//! Projects the game state into a display list. Takes the state by shared
//! reference and never mutates it.

use glam::Vec2;

use super::frame::{DrawCmd, Frame, ImageHandle, TextAlign, palette};
use crate::sim::state::{GamePhase, GameState, GatedObstacle};

const HEART_GLYPH: &str = "❤️";

/// Images that are loaded right now; `None` means draw the fallback shape
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameImages {
    pub avatar: Option<ImageHandle>,
    pub obstacle: Option<ImageHandle>,
    pub hazard: Option<ImageHandle>,
}

/// HUD toggles from settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudOptions {
    pub show_speed: bool,
}

impl Default for HudOptions {
    fn default() -> Self {
        Self { show_speed: true }
    }
}

/// How gated obstacles are painted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObstacleStyle {
    /// Themed image repeated down each column
    Tiled { image: ImageHandle, tile_height: f32 },
    /// Solid brown columns with a darker outline
    Brick,
}

impl ObstacleStyle {
    pub fn for_width(image: Option<ImageHandle>, width: f32) -> Self {
        match image.and_then(|img| img.height_at_width(width).map(|h| (img, h))) {
            Some((image, tile_height)) => ObstacleStyle::Tiled { image, tile_height },
            None => ObstacleStyle::Brick,
        }
    }
}

/// Build the display list for the current state
pub fn compose_frame(state: &GameState, images: &FrameImages, hud: &HudOptions) -> Frame {
    let field = state.playfield;
    let mut frame = Frame::new(field.width, field.height);
    frame.push(DrawCmd::Clear(palette::SKY));

    for obstacle in &state.obstacles {
        let style = ObstacleStyle::for_width(images.obstacle, obstacle.width);
        draw_obstacle(&mut frame, obstacle, style, field.height);
    }

    for hazard in &state.hazards {
        let size = Vec2::splat(hazard.size);
        match images.hazard {
            Some(image) => frame.push(DrawCmd::Image {
                slot: image.slot,
                pos: hazard.pos - size / 2.0,
                size,
                rotation_deg: 0.0,
            }),
            None => frame.push(DrawCmd::FillCircle {
                center: hazard.pos,
                radius: hazard.size / 2.0,
                color: palette::HAZARD_FALLBACK,
            }),
        }
    }

    for pickup in state.pickups.iter().filter(|p| !p.collected) {
        frame.push(DrawCmd::Text {
            text: HEART_GLYPH.to_string(),
            pos: pickup.pos,
            font_px: pickup.size,
            bold: false,
            align: TextAlign::Center,
            color: palette::HEART,
        });
    }

    draw_avatar(&mut frame, state, images.avatar);

    match state.run.phase {
        GamePhase::AwaitingInput => draw_prompt(
            &mut frame,
            [("TAP TO START", 48.0), ("Press SPACE or Click", 32.0)],
        ),
        GamePhase::GameOver => draw_prompt(
            &mut frame,
            [("GAME OVER", 48.0), ("Tap to play again", 32.0)],
        ),
        GamePhase::Playing => {}
    }

    draw_hud(&mut frame, state, hud);
    frame
}

fn draw_obstacle(frame: &mut Frame, obstacle: &GatedObstacle, style: ObstacleStyle, height: f32) {
    let x = obstacle.x;
    let w = obstacle.width;
    // (top, bottom) of the upper and lower columns
    let columns = [(0.0, obstacle.gap_top), (obstacle.gap_bottom(), height)];

    match style {
        ObstacleStyle::Tiled { image, tile_height } => {
            for (top, bottom) in columns {
                let mut y = top;
                while y < bottom {
                    frame.push(DrawCmd::Image {
                        slot: image.slot,
                        pos: Vec2::new(x, y),
                        size: Vec2::new(w, tile_height.min(bottom - y)),
                        rotation_deg: 0.0,
                    });
                    y += tile_height;
                }
            }
        }
        ObstacleStyle::Brick => {
            for (top, bottom) in columns {
                let pos = Vec2::new(x, top);
                let size = Vec2::new(w, (bottom - top).max(0.0));
                frame.push(DrawCmd::FillRect {
                    pos,
                    size,
                    color: palette::BRICK,
                });
                frame.push(DrawCmd::StrokeRect {
                    pos,
                    size,
                    color: palette::BRICK_EDGE,
                    line_width: 2.0,
                });
            }
        }
    }
}

fn draw_avatar(frame: &mut Frame, state: &GameState, image: Option<ImageHandle>) {
    let center = state.avatar_center();
    let size = state.tuning.avatar_size;
    match image {
        Some(image) => frame.push(DrawCmd::Image {
            slot: image.slot,
            pos: center - Vec2::splat(size / 2.0),
            size: Vec2::splat(size),
            rotation_deg: state.avatar.rotation,
        }),
        None => frame.push(DrawCmd::FillCircle {
            center,
            radius: size / 2.0,
            color: palette::AVATAR_FALLBACK,
        }),
    }
}

/// Two centred lines below the avatar's start position
fn draw_prompt(frame: &mut Frame, lines: [(&str, f32); 2]) {
    let cx = frame.width / 2.0;
    let cy = frame.height / 2.0;
    for ((text, font_px), dy) in lines.into_iter().zip([100.0, 150.0]) {
        frame.push(DrawCmd::Text {
            text: text.to_string(),
            pos: Vec2::new(cx, cy + dy),
            font_px,
            bold: true,
            align: TextAlign::Center,
            color: palette::PROMPT,
        });
    }
}

fn draw_hud(frame: &mut Frame, state: &GameState, hud: &HudOptions) {
    for i in 0..state.run.lives {
        frame.push(DrawCmd::Text {
            text: HEART_GLYPH.to_string(),
            pos: Vec2::new(20.0 + f32::from(i) * 40.0, 130.0),
            font_px: 30.0,
            bold: false,
            align: TextAlign::Left,
            color: palette::HEART,
        });
    }

    let mut lines = vec![format!("Score: {}", state.run.score)];
    if hud.show_speed {
        lines.push(format!("Speed: {:.1}x", state.run.scroll_speed));
    }
    for (i, text) in lines.into_iter().enumerate() {
        frame.push(DrawCmd::Text {
            text,
            pos: Vec2::new(20.0, 50.0 + i as f32 * 40.0),
            font_px: 36.0,
            bold: true,
            align: TextAlign::Left,
            color: palette::HUD_TEXT,
        });
    }
}
