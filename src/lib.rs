//! Kinetic Breakout - a fixed-tick brick breaker
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, swept collisions, game state, tick)
//! - `session`: Shared state guarded for the simulation loop and its collaborators
//! - `settings`: Tick rates and game rules, loadable from JSON

pub mod session;
pub mod settings;
pub mod sim;

pub use session::{Frame, Key, Session};
pub use settings::{Rules, Settings, WallResponse};

/// Game configuration constants
pub mod consts {
    /// Screen dimensions (pixels)
    pub const SCREEN_WIDTH: i32 = 300;
    pub const SCREEN_HEIGHT: i32 = 400;
    /// Height of the menu bar at the top; the ball bounces off its lower edge
    pub const MENU_HEIGHT: i32 = 40;

    /// Normal simulation rate
    pub const TICK_HZ: u32 = 60;
    /// Simulation rate while fast mode is on
    pub const FAST_TICK_HZ: u32 = 125;

    /// Ball defaults
    pub const BALL_SIZE: i32 = 10;
    /// Distance the ball moves on each axis per tick
    pub const BALL_SPEED: i32 = 3;
    pub const BALL_START_X: i32 = 145;
    pub const BALL_START_Y: i32 = 200;

    /// Paddle defaults
    pub const PADDLE_WIDTH: i32 = 50;
    pub const PADDLE_HEIGHT: i32 = 8;
    pub const PADDLE_START_X: i32 = 150;
    pub const PADDLE_START_Y: i32 = 355;
    /// Distance the paddle moves per tick while a direction key is held
    pub const PADDLE_SPEED: i32 = 5;

    /// Brick grid layout
    pub const BRICK_WIDTH: i32 = 30;
    pub const BRICK_HEIGHT: i32 = 10;
    pub const BRICK_COLUMNS: i32 = 10;
    pub const BRICK_ROWS: i32 = 7;
    /// Leaves room under the menu bar for the ball to bounce above the grid
    pub const FIRST_ROW_Y: i32 = 60;

    /// Score for breaking a brick
    pub const BRICK_POINTS: u32 = 50;
    pub const STARTING_LIVES: u8 = 3;
}
