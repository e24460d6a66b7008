//! Hitbox geometry
//!
//! The avatar is treated as an axis-aligned square of `avatar_size` centred on
//! its position. Hazards and pickups use a combined half-extent proximity test
//! on each axis (a square "radius" check), which is cheap and forgiving.

use glam::Vec2;

use super::state::{GatedObstacle, PathHazard, Pickup};

/// Avatar hitbox: centre plus half edge length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub center: Vec2,
    pub half: f32,
}

impl Hitbox {
    pub fn new(center: Vec2, size: f32) -> Self {
        Self {
            center,
            half: size / 2.0,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.half
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.half
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.half
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.half
    }
}

/// Avatar overlaps the obstacle's columns and is not entirely inside the gap
pub fn hits_gated_obstacle(avatar: &Hitbox, obstacle: &GatedObstacle) -> bool {
    let overlaps_x = avatar.right() > obstacle.x && avatar.left() < obstacle.right();
    if !overlaps_x {
        return false;
    }
    avatar.top() < obstacle.gap_top || avatar.bottom() > obstacle.gap_bottom()
}

/// Square proximity test between two centres with a combined half-extent
#[inline]
pub fn within_reach(a: Vec2, b: Vec2, reach: f32) -> bool {
    let d = (a - b).abs();
    d.x < reach && d.y < reach
}

pub fn hits_hazard(avatar: &Hitbox, hazard: &PathHazard) -> bool {
    within_reach(avatar.center, hazard.pos, avatar.half + hazard.size / 2.0)
}

pub fn touches_pickup(avatar: &Hitbox, pickup: &Pickup) -> bool {
    within_reach(avatar.center, pickup.pos, avatar.half + pickup.size / 2.0)
}

/// Avatar pokes out of the top or bottom of the playfield
pub fn out_of_bounds(avatar: &Hitbox, playfield_height: f32) -> bool {
    avatar.top() < 0.0 || avatar.bottom() > playfield_height
}
