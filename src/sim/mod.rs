//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed integer step per tick
//! - No randomness
//! - Stable iteration order (bricks in grid order)
//! - No rendering, timing or threading dependencies

pub mod body;
pub mod collision;
pub mod state;
pub mod tick;

pub use body::{KineticBody, Rect, Vector2};
pub use collision::{Bounds, BoundsContact, CollisionResult, Wall, body_collision, bounds_collision};
pub use state::{Ball, Brick, GameEvent, GamePhase, GameState, Level, Paddle, RAINBOW_HUES};
pub use tick::{TickInput, tick};
