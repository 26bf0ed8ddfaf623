//! Collision detection and response for axis-aligned bodies
//!
//! The tricky part of Breakout: once a moving rectangle is known to overlap a
//! stationary one, work out which side it came through. Each axis is swept
//! back over the last tick to find when its leading edge crossed the
//! obstacle's facing edge; the axis crossed *last* is the one that was hit.

use serde::{Deserialize, Serialize};

use super::body::{KineticBody, Rect};
use crate::consts::{MENU_HEIGHT, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Result of a collision check
///
/// Built fresh for every check and consumed by the bounce step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollisionResult {
    hit_x: bool,
    hit_y: bool,
    x_penetration: i32,
    y_penetration: i32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self::default()
    }

    /// Collision happened on the X axis (left or right side)
    #[inline]
    pub fn hit_x(&self) -> bool {
        self.hit_x
    }

    /// Collision happened on the Y axis (top or bottom side)
    #[inline]
    pub fn hit_y(&self) -> bool {
        self.hit_y
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.hit_x || self.hit_y
    }

    /// Signed overshoot on X, one unit short of the raw overlap
    #[inline]
    pub fn x_penetration(&self) -> i32 {
        self.x_penetration
    }

    /// Signed overshoot on Y, one unit short of the raw overlap
    #[inline]
    pub fn y_penetration(&self) -> i32 {
        self.y_penetration
    }
}

/// Playfield edges: left is 0, the ceiling sits under the menu bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
    /// Lowest y the top of a body may reach
    pub top: i32,
}

impl Bounds {
    pub const fn screen() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            top: MENU_HEIGHT,
        }
    }

    /// Some part of `rect` lies past the left, right or top edge.
    /// Sitting flush against an edge is still inside.
    pub fn escaped_sides(&self, rect: &Rect) -> bool {
        rect.left() < 0 || rect.right() > self.width || rect.top() < self.top
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::screen()
    }
}

/// One of the four playfield edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    Left,
    Right,
    Ceiling,
    Floor,
}

/// Result of checking a body against the playfield edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundsContact {
    pub result: CollisionResult,
    /// Side wall breached, if any
    pub x_wall: Option<Wall>,
    /// Ceiling or floor breached, if any
    pub y_wall: Option<Wall>,
}

impl BoundsContact {
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.result.is_hit()
    }

    /// Breached walls, horizontal first
    pub fn walls(&self) -> impl Iterator<Item = Wall> {
        self.x_wall.into_iter().chain(self.y_wall)
    }
}

/// Work out how a moving body struck a stationary one
///
/// Only meaningful once `moving.rect().overlaps(stationary)` has been
/// confirmed. Corner hits, where both axes were crossed at the same instant,
/// report a hit on both axes.
pub fn body_collision(moving: &KineticBody, stationary: &Rect) -> CollisionResult {
    let rect = moving.rect();
    let velocity = moving.velocity;

    // A still axis can never be the one that was crossed last
    let mut x_time = f32::NEG_INFINITY;
    let mut y_time = f32::NEG_INFINITY;
    let mut x_penetration = 0;
    let mut y_penetration = 0;

    if moving.moving_right() {
        let previous_right = rect.right() - velocity.x;
        x_time = time_of_axis_collision(stationary.left(), previous_right, velocity.x);
        x_penetration = rect.right() - stationary.left() - 1;
    } else if moving.moving_left() {
        let previous_left = rect.left() - velocity.x;
        x_time = time_of_axis_collision(stationary.right(), previous_left, velocity.x);
        x_penetration = rect.left() - stationary.right() + 1;
    }

    if moving.moving_down() {
        let previous_bottom = rect.bottom() - velocity.y;
        y_time = time_of_axis_collision(stationary.top(), previous_bottom, velocity.y);
        y_penetration = rect.bottom() - stationary.top() - 1;
    } else if moving.moving_up() {
        let previous_top = rect.top() - velocity.y;
        y_time = time_of_axis_collision(stationary.bottom(), previous_top, velocity.y);
        y_penetration = rect.top() - stationary.bottom() + 1;
    }

    if velocity.x == 0 && velocity.y == 0 {
        log::warn!(
            "Resolving overlap for a body at rest at {}; reporting a corner hit",
            rect.position
        );
    }

    CollisionResult {
        hit_x: x_time >= y_time,
        hit_y: x_time <= y_time,
        x_penetration,
        y_penetration,
    }
}

/// Solve `moving_side + velocity * t = stationary_side` for `t`.
///
/// `moving_side` is the leading side before this tick's move. The result is
/// not clamped: negative values mean the sides had already crossed before
/// the tick began.
#[inline]
fn time_of_axis_collision(stationary_side: i32, moving_side: i32, velocity: i32) -> f32 {
    (stationary_side - moving_side) as f32 / velocity as f32
}

/// Check a moving body against the playfield edges
///
/// Unlike `body_collision` this may be called at any time. Each axis is
/// tested on its own, so a body in a corner reports both walls.
pub fn bounds_collision(moving: &KineticBody, bounds: &Bounds) -> BoundsContact {
    let rect = moving.rect();
    let mut contact = BoundsContact::default();

    if rect.right() >= bounds.width {
        contact.result.hit_x = true;
        contact.result.x_penetration = rect.right() - bounds.width - 1;
        contact.x_wall = Some(Wall::Right);
    } else if rect.left() <= 0 {
        contact.result.hit_x = true;
        contact.result.x_penetration = rect.left() + 1;
        contact.x_wall = Some(Wall::Left);
    }

    if rect.bottom() >= bounds.height {
        contact.result.hit_y = true;
        contact.result.y_penetration = rect.bottom() - bounds.height - 1;
        contact.y_wall = Some(Wall::Floor);
    } else if rect.top() <= bounds.top {
        contact.result.hit_y = true;
        contact.result.y_penetration = rect.top() - bounds.top + 1;
        contact.y_wall = Some(Wall::Ceiling);
    }

    contact
}
