//! Game state and core simulation types
//!
//! Everything the renderer reads each frame lives here.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::body::{KineticBody, Rect, Vector2};
use super::collision::{Bounds, Wall};
use crate::consts::*;
use crate::settings::Rules;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ticks advance the simulation
    #[default]
    Running,
    /// Out of lives or quit; terminal
    Finished,
}

/// Something that happened during a tick, for sound/visual collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    BrickBroken { index: usize, row: u8 },
    WallBounce(Wall),
    PaddleBounce,
    LifeLost { lives_left: u8 },
    LevelCleared { level: u32 },
    GameOver { score: u32 },
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ball {
    body: KineticBody,
}

impl Ball {
    /// New ball at `position`, heading down and to the right
    pub fn new(position: Vector2) -> Self {
        Self::with_velocity(position, IVec2::splat(BALL_SPEED))
    }

    pub fn with_velocity(position: Vector2, velocity: Vector2) -> Self {
        Self {
            body: KineticBody::new(position, IVec2::splat(BALL_SIZE), velocity),
        }
    }

    /// Fresh ball at the fixed spawn point (start of game, life lost, level cleared)
    pub fn spawn() -> Self {
        Self::new(IVec2::new(BALL_START_X, BALL_START_Y))
    }

    #[inline]
    pub fn body(&self) -> &KineticBody {
        &self.body
    }

    #[inline]
    pub fn body_mut(&mut self) -> &mut KineticBody {
        &mut self.body
    }

    #[inline]
    pub fn rect(&self) -> &Rect {
        self.body.rect()
    }

    #[inline]
    pub fn velocity(&self) -> Vector2 {
        self.body.velocity
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::spawn()
    }
}

/// The player's paddle
///
/// Only moves horizontally; its velocity is set from the held keys each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paddle {
    body: KineticBody,
}

impl Default for Paddle {
    fn default() -> Self {
        Self::at(IVec2::new(PADDLE_START_X, PADDLE_START_Y))
    }
}

impl Paddle {
    pub fn at(position: Vector2) -> Self {
        Self {
            body: KineticBody::new(
                position,
                IVec2::new(PADDLE_WIDTH, PADDLE_HEIGHT),
                IVec2::ZERO,
            ),
        }
    }

    /// Move one step. `direction` is -1 for left, +1 for right, 0 to stay put.
    pub fn steer(&mut self, direction: i32) {
        self.body.velocity = IVec2::new(PADDLE_SPEED * direction.signum(), 0);
        self.body.step();
    }

    /// Keep the paddle fully on screen
    pub fn clamp_on_screen(&mut self, screen_width: i32) {
        let left = self.body.rect.left();
        let max_left = (screen_width - self.body.rect.width()).max(0);
        self.body.rect.translate_x(left.clamp(0, max_left) - left);
    }

    #[inline]
    pub fn body(&self) -> &KineticBody {
        &self.body
    }

    #[inline]
    pub fn rect(&self) -> &Rect {
        self.body.rect()
    }
}

/// Hues of the row colours, red through violet, in the -1.0..=1.0 range
/// where 0.0 is red
pub const RAINBOW_HUES: [f32; 7] = [
    0.0 / 6.0,
    1.0 / 6.0,
    2.0 / 6.0,
    4.0 / 6.0,
    6.0 / 6.0,
    -4.0 / 6.0,
    -2.0 / 6.0,
];

/// A destructible brick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brick {
    pub body: Rect,
    /// Grid row, 0 at the top
    pub row: u8,
}

impl Brick {
    pub fn new(position: Vector2, row: u8) -> Self {
        Self {
            body: Rect::new(position, IVec2::new(BRICK_WIDTH, BRICK_HEIGHT)),
            row,
        }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.body.visible
    }

    /// Row colour, wrapping if there are more rows than hues
    pub fn hue(&self) -> f32 {
        RAINBOW_HUES[self.row as usize % RAINBOW_HUES.len()]
    }
}

/// The brick grid for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Row-major, top-left first; order never changes within a level
    bricks: Vec<Brick>,
    remaining: usize,
}

impl Default for Level {
    fn default() -> Self {
        Self::new()
    }
}

impl Level {
    /// Full grid of rainbow rows at the top of the screen
    pub fn new() -> Self {
        let mut bricks = Vec::with_capacity((BRICK_COLUMNS * BRICK_ROWS) as usize);
        for row in 0..BRICK_ROWS {
            let y = FIRST_ROW_Y + row * BRICK_HEIGHT;
            for column in 0..BRICK_COLUMNS {
                bricks.push(Brick::new(IVec2::new(column * BRICK_WIDTH, y), row as u8));
            }
        }
        Self::from_bricks(bricks)
    }

    /// Level with a custom brick layout
    pub fn from_bricks(bricks: Vec<Brick>) -> Self {
        let remaining = bricks.iter().filter(|b| b.is_visible()).count();
        Self { bricks, remaining }
    }

    /// All bricks, including broken (invisible) ones
    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    /// Number of bricks still standing
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn is_cleared(&self) -> bool {
        self.remaining == 0
    }

    /// Index of the first standing brick that overlaps `rect`
    pub fn first_hit(&self, rect: &Rect) -> Option<usize> {
        self.bricks
            .iter()
            .position(|b| b.is_visible() && b.body.overlaps(rect))
    }

    /// Knock out a brick. Returns how many are left standing.
    pub fn brick_destroyed(&mut self, index: usize) -> usize {
        match self.bricks.get_mut(index) {
            Some(brick) if brick.body.visible => {
                brick.body.visible = false;
                self.remaining -= 1;
            }
            _ => {}
        }
        self.remaining
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub rules: Rules,
    pub bounds: Bounds,
    pub phase: GamePhase,
    pub ball: Ball,
    pub paddle: Paddle,
    pub level: Level,
    /// Levels cleared so far
    pub level_index: u32,
    pub score: u32,
    pub lives: u8,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

impl GameState {
    pub fn new(rules: Rules) -> Self {
        Self {
            rules,
            bounds: Bounds::screen(),
            phase: GamePhase::Running,
            ball: Ball::spawn(),
            paddle: Paddle::default(),
            level: Level::new(),
            level_index: 0,
            score: 0,
            lives: rules.starting_lives,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    pub fn bricks(&self) -> &[Brick] {
        self.level.bricks()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    /// End the game now (quit key)
    pub fn finish(&mut self) {
        if !self.is_finished() {
            log::info!("Game stopped with score {}", self.score);
            self.phase = GamePhase::Finished;
        }
    }
}
