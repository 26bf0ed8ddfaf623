//! Axis-aligned bodies
//!
//! A `Rect` is a static rectangle such as a brick. A
//! `KineticBody` embeds a `Rect` and adds an integer velocity. Ball and paddle
//! embed a `KineticBody`; nothing here uses dynamic dispatch.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::collision::CollisionResult;

/// Integer 2D point or per-tick displacement
pub type Vector2 = IVec2;

/// An axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub position: Vector2,
    /// Width and height, both positive
    size: Vector2,
    /// Hidden rects are skipped by collision checks and rendering
    pub visible: bool,
}

impl Rect {
    pub fn new(position: Vector2, size: Vector2) -> Self {
        debug_assert!(
            size.x > 0 && size.y > 0,
            "rect size must be positive, got {size}"
        );
        Self {
            position,
            size,
            visible: true,
        }
    }

    #[inline]
    pub fn size(&self) -> Vector2 {
        self.size
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.size.y
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.position.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.position.y
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.position.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.position.y + self.size.y
    }

    /// Center point, rounded toward the top-left
    pub fn center(&self) -> Vector2 {
        self.position + self.size / 2
    }

    /// True if the two rectangles share a nonzero area.
    ///
    /// Rectangles that only touch along an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let to_the_right = self.left() >= other.right();
        let to_the_left = self.right() <= other.left();
        let below = self.top() >= other.bottom();
        let above = self.bottom() <= other.top();

        !(to_the_right || to_the_left || below || above)
    }

    pub fn translate_x(&mut self, delta: i32) {
        self.position.x += delta;
    }

    pub fn translate_y(&mut self, delta: i32) {
        self.position.y += delta;
    }
}

/// A rectangle that moves by `velocity` every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KineticBody {
    pub rect: Rect,
    /// A zero component means the body is not moving on that axis
    pub velocity: Vector2,
}

impl KineticBody {
    pub fn new(position: Vector2, size: Vector2, velocity: Vector2) -> Self {
        Self {
            rect: Rect::new(position, size),
            velocity,
        }
    }

    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    /// Advance one tick along the current velocity
    pub fn step(&mut self) {
        self.rect.translate_x(self.velocity.x);
        self.rect.translate_y(self.velocity.y);
    }

    pub fn flip_x(&mut self) {
        self.velocity.x = -self.velocity.x;
    }

    pub fn flip_y(&mut self) {
        self.velocity.y = -self.velocity.y;
    }

    #[inline]
    pub fn moving_right(&self) -> bool {
        self.velocity.x > 0
    }

    #[inline]
    pub fn moving_left(&self) -> bool {
        self.velocity.x < 0
    }

    #[inline]
    pub fn moving_up(&self) -> bool {
        self.velocity.y < 0
    }

    #[inline]
    pub fn moving_down(&self) -> bool {
        self.velocity.y > 0
    }

    /// Reverse direction on each axis that was hit and push the body back out.
    ///
    /// Moving by twice the penetration mirrors the overshoot, leaving the
    /// body where an elastic bounce at the moment of contact would have put it.
    pub fn bounce(&mut self, collision: &CollisionResult) {
        if collision.hit_x() {
            self.flip_x();
            self.rect.translate_x(-2 * collision.x_penetration());
        }
        if collision.hit_y() {
            self.flip_y();
            self.rect.translate_y(-2 * collision.y_penetration());
        }
    }
}
