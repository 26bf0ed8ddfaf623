//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use serde::{Deserialize, Serialize};

use super::body::KineticBody;
use super::collision::{Bounds, BoundsContact, Wall, body_collision, bounds_collision};
use super::state::{Ball, GameEvent, GamePhase, GameState, Level};
use crate::settings::WallResponse;

/// Held keys for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
}

impl TickInput {
    /// -1 for left, +1 for right; both or neither held means no movement
    pub fn direction(&self) -> i32 {
        match (self.left, self.right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase == GamePhase::Finished {
        return;
    }

    state.events.clear();
    state.time_ticks += 1;

    state.paddle.steer(input.direction());
    state.paddle.clamp_on_screen(state.bounds.width);

    state.ball.body_mut().step();

    if !resolve_walls(state) {
        // Ball lost; nothing else to hit this tick
        return;
    }
    resolve_bricks(state);
    resolve_paddle(state);
    keep_in_bounds(state);
}

/// Bounce off the sides and ceiling. Returns false if the ball went out the bottom.
fn resolve_walls(state: &mut GameState) -> bool {
    let contact = bounds_collision(state.ball.body(), &state.bounds);

    if contact.y_wall == Some(Wall::Floor) {
        lose_life(state);
        return false;
    }
    if !contact.is_hit() {
        return true;
    }

    let ball = state.ball.body_mut();
    match state.rules.wall_response {
        WallResponse::Clamp => clamp_off_walls(ball, &contact, &state.bounds),
        WallResponse::Mirror => ball.bounce(&contact.result),
    }
    state.events.extend(contact.walls().map(GameEvent::WallBounce));
    true
}

/// Point the velocity away from each breached wall and sit the body flush against it
fn clamp_off_walls(body: &mut KineticBody, contact: &BoundsContact, bounds: &Bounds) {
    match contact.x_wall {
        Some(Wall::Left) => {
            if body.moving_left() {
                body.flip_x();
            }
            let overshoot = body.rect.left();
            body.rect.translate_x(-overshoot);
        }
        Some(Wall::Right) => {
            if body.moving_right() {
                body.flip_x();
            }
            let overshoot = body.rect.right() - bounds.width;
            body.rect.translate_x(-overshoot);
        }
        _ => {}
    }

    if contact.y_wall == Some(Wall::Ceiling) {
        if body.moving_up() {
            body.flip_y();
        }
        let overshoot = body.rect.top() - bounds.top;
        body.rect.translate_y(-overshoot);
    }
}

/// Pull the ball back inside if a brick or paddle bounce threw it past a side
/// wall or the ceiling. Always clamps, whatever the wall response.
fn keep_in_bounds(state: &mut GameState) {
    if !state.bounds.escaped_sides(state.ball.rect()) {
        return;
    }

    let contact = bounds_collision(state.ball.body(), &state.bounds);
    clamp_off_walls(state.ball.body_mut(), &contact, &state.bounds);
    state.events.extend(
        contact
            .walls()
            .filter(|wall| *wall != Wall::Floor)
            .map(GameEvent::WallBounce),
    );
    log::debug!("Ball pushed past a wall, clamped back inside");
}

fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    state.events.push(GameEvent::LifeLost {
        lives_left: state.lives,
    });

    if state.lives == 0 {
        log::info!("Last ball lost, game over with score {}", state.score);
        state.phase = GamePhase::Finished;
        state.events.push(GameEvent::GameOver { score: state.score });
    } else {
        log::info!("Ball lost, {} lives left", state.lives);
        state.ball = Ball::spawn();
    }
}

/// Break at most one brick: the first standing one the ball overlaps
fn resolve_bricks(state: &mut GameState) {
    let Some(index) = state.level.first_hit(state.ball.rect()) else {
        return;
    };

    let brick = state.level.bricks()[index];
    let collision = body_collision(state.ball.body(), &brick.body);
    state.ball.body_mut().bounce(&collision);

    let remaining = state.level.brick_destroyed(index);
    state.score = state.score.saturating_add(state.rules.brick_points);
    state.events.push(GameEvent::BrickBroken {
        index,
        row: brick.row,
    });
    log::debug!(
        "Brick {} (row {}) broken, {} left, score {}",
        index,
        brick.row,
        remaining,
        state.score
    );

    if remaining == 0 {
        state.level_index += 1;
        log::info!("Level {} cleared", state.level_index);
        state.events.push(GameEvent::LevelCleared {
            level: state.level_index,
        });
        state.level = Level::new();
        state.ball = Ball::spawn();
    }
}

fn resolve_paddle(state: &mut GameState) {
    if !state.ball.rect().overlaps(state.paddle.rect()) {
        return;
    }

    let collision = body_collision(state.ball.body(), state.paddle.rect());
    state.ball.body_mut().bounce(&collision);
    state.events.push(GameEvent::PaddleBounce);
    log::debug!(
        "Paddle hit (x: {}, y: {})",
        collision.hit_x(),
        collision.hit_y()
    );
}
