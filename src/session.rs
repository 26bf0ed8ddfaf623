//! A running game shared between the simulation loop and its collaborators
//!
//! All mutable state sits behind one mutex. Every tick, key event and frame
//! read is a single short critical section; nothing blocks while holding it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::{Brick, GameState, Rect, TickInput, tick};

/// Keys the input collaborator can forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    /// Switch to the fast tick rate
    Fast,
    /// Switch back to the normal tick rate
    Normal,
    ToggleSpeed,
    Quit,
}

impl Key {
    /// Map a key name from the UI layer (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "left" | "a" => Some(Key::Left),
            "right" | "d" => Some(Key::Right),
            "f" => Some(Key::Fast),
            "n" => Some(Key::Normal),
            "space" | "t" => Some(Key::ToggleSpeed),
            "s" | "q" | "escape" => Some(Key::Quit),
            _ => None,
        }
    }
}

/// Everything the renderer draws, copied out in one critical section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub ball: Rect,
    pub paddle: Rect,
    /// Every brick in grid order, broken ones included
    pub bricks: Vec<Brick>,
    pub score: u32,
    pub lives: u8,
    pub level: u32,
    pub tick: u64,
    pub finished: bool,
    pub fast: bool,
}

impl Frame {
    fn capture(state: &GameState, fast: bool) -> Self {
        Self {
            ball: *state.ball.rect(),
            paddle: *state.paddle.rect(),
            bricks: state.bricks().to_vec(),
            score: state.score,
            lives: state.lives,
            level: state.level_index,
            tick: state.time_ticks,
            finished: state.is_finished(),
            fast,
        }
    }
}

#[derive(Debug)]
struct Shared {
    state: GameState,
    /// Keys currently held down
    input: TickInput,
    fast: bool,
}

/// Outcome of one locked tick
#[derive(Debug, Clone, Copy)]
struct Stepped {
    finished: bool,
    fast: bool,
}

/// Handle to a running game; clones share the same state
#[derive(Debug, Clone)]
pub struct Session {
    shared: Arc<Mutex<Shared>>,
    settings: Arc<Settings>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let state = GameState::new(settings.rules);
        Self::with_state(settings, state)
    }

    /// Session starting from a prepared state
    pub fn with_state(settings: Settings, state: GameState) -> Self {
        let shared = Shared {
            state,
            input: TickInput::default(),
            fast: settings.start_fast,
        };
        Self {
            shared: Arc::new(Mutex::new(shared)),
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // Every critical section leaves the state consistent, so a panic
    // elsewhere while holding the lock does not invalidate it.
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn key_down(&self, key: Key) {
        let mut shared = self.lock();
        match key {
            Key::Left => shared.input.left = true,
            Key::Right => shared.input.right = true,
            Key::Fast => shared.fast = true,
            Key::Normal => shared.fast = false,
            Key::ToggleSpeed => {
                shared.fast = !shared.fast;
                log::debug!("Fast mode {}", if shared.fast { "on" } else { "off" });
            }
            Key::Quit => shared.state.finish(),
        }
    }

    pub fn key_up(&self, key: Key) {
        let mut shared = self.lock();
        match key {
            Key::Left => shared.input.left = false,
            Key::Right => shared.input.right = false,
            _ => {}
        }
    }

    /// Run one tick with the currently held keys. Returns false once the game is over.
    pub fn tick_once(&self) -> bool {
        matches!(self.step(), Some(Stepped { finished: false, .. }))
    }

    /// One tick under the lock with the held keys. None once the game is over.
    fn step(&self) -> Option<Stepped> {
        let mut shared = self.lock();
        if shared.state.is_finished() {
            return None;
        }
        let input = shared.input;
        tick(&mut shared.state, &input);
        Some(Stepped {
            finished: shared.state.is_finished(),
            fast: shared.fast,
        })
    }

    /// Snapshot for the renderer
    pub fn frame(&self) -> Frame {
        let shared = self.lock();
        Frame::capture(&shared.state, shared.fast)
    }

    pub fn is_finished(&self) -> bool {
        self.lock().state.is_finished()
    }

    pub fn is_fast(&self) -> bool {
        self.lock().fast
    }

    /// Tick at the configured rate until the game finishes.
    ///
    /// Returns the number of ticks run.
    pub fn run(&self) -> u64 {
        log::info!(
            "Simulation loop started ({} Hz, fast {} Hz)",
            self.settings.tick_hz,
            self.settings.fast_tick_hz
        );
        let mut ticks = 0;
        while let Some(stepped) = self.step() {
            ticks += 1;
            if stepped.finished {
                break;
            }
            thread::sleep(self.settings.tick_interval(stepped.fast));
        }
        log::info!("Simulation loop stopped after {} ticks", ticks);
        ticks
    }

    /// Start `run` on its own thread
    pub fn spawn_loop(&self) -> std::io::Result<JoinHandle<u64>> {
        let session = self.clone();
        thread::Builder::new()
            .name("simulation".into())
            .spawn(move || session.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::Ball;
    use glam::IVec2;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("Left"), Some(Key::Left));
        assert_eq!(Key::from_name("D"), Some(Key::Right));
        assert_eq!(Key::from_name("space"), Some(Key::ToggleSpeed));
        assert_eq!(Key::from_name("Escape"), Some(Key::Quit));
        assert_eq!(Key::from_name("x"), None);
    }

    #[test]
    fn test_held_keys_move_paddle() {
        let session = Session::new(Settings::default());
        let start = session.frame().paddle.left();

        session.key_down(Key::Left);
        session.tick_once();
        assert_eq!(session.frame().paddle.left(), start - PADDLE_SPEED);

        // Both held cancels out
        session.key_down(Key::Right);
        session.tick_once();
        assert_eq!(session.frame().paddle.left(), start - PADDLE_SPEED);

        session.key_up(Key::Left);
        session.tick_once();
        assert_eq!(session.frame().paddle.left(), start);

        session.key_up(Key::Right);
        session.tick_once();
        assert_eq!(session.frame().paddle.left(), start);
    }

    #[test]
    fn test_speed_keys() {
        let session = Session::new(Settings::default());
        assert!(!session.is_fast());

        session.key_down(Key::ToggleSpeed);
        assert!(session.is_fast());
        session.key_up(Key::ToggleSpeed);
        assert!(session.is_fast());
        session.key_down(Key::ToggleSpeed);
        assert!(!session.is_fast());

        session.key_down(Key::Fast);
        assert!(session.frame().fast);
        session.key_down(Key::Normal);
        assert!(!session.frame().fast);
    }

    #[test]
    fn test_quit_finishes_game() {
        let session = Session::new(Settings::default());
        assert!(session.tick_once());

        session.key_down(Key::Quit);
        assert!(session.is_finished());
        assert!(!session.tick_once());
        assert!(session.frame().finished);
    }

    #[test]
    fn test_frame_reflects_state() {
        let mut state = GameState::default();
        state.score = 150;
        state.lives = 2;
        state.ball = Ball::new(IVec2::new(20, 200));
        let session = Session::with_state(Settings::default(), state);

        let frame = session.frame();
        assert_eq!(frame.score, 150);
        assert_eq!(frame.lives, 2);
        assert_eq!(frame.ball.position, IVec2::new(20, 200));
        assert_eq!(frame.bricks.len(), (BRICK_COLUMNS * BRICK_ROWS) as usize);
        assert!(frame.bricks.iter().all(|b| b.is_visible()));
        assert!(!frame.finished);
    }

    #[test]
    fn test_loop_stops_on_quit() {
        let settings = Settings {
            tick_hz: 1000,
            fast_tick_hz: 1000,
            ..Default::default()
        };
        let session = Session::new(settings);
        let handle = session.spawn_loop().unwrap();

        while session.frame().tick < 5 {
            thread::sleep(std::time::Duration::from_millis(1));
        }
        session.key_down(Key::Quit);

        let ticks = handle.join().unwrap();
        assert!(ticks >= 5);
        // Nothing advances after the loop has exited
        let frame = session.frame();
        assert!(frame.finished);
        assert_eq!(frame.tick, ticks);
    }

    #[test]
    fn test_loop_ends_when_lives_run_out() {
        let settings = Settings {
            tick_hz: 1000,
            rules: crate::settings::Rules {
                starting_lives: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut state = GameState::new(settings.rules);
        // Straight down past the paddle's left side
        state.ball = Ball::with_velocity(IVec2::new(10, 300), IVec2::new(0, 3));
        let session = Session::with_state(settings, state);

        let ticks = session.spawn_loop().unwrap().join().unwrap();

        assert!(session.is_finished());
        assert_eq!(session.frame().lives, 0);
        assert!(ticks > 0);
        // The tick that lost the last ball is counted
        assert_eq!(session.frame().tick, ticks);
    }

    #[test]
    fn test_tick_once_and_loop_agree_on_finish() {
        let mut state = GameState::default();
        state.lives = 1;
        state.ball = Ball::with_velocity(
            IVec2::new(10, SCREEN_HEIGHT - BALL_SIZE - 1),
            IVec2::new(0, 3),
        );
        let session = Session::with_state(Settings::default(), state);

        assert!(!session.tick_once());
        assert_eq!(session.frame().tick, 1);
        // Finished games are left alone by both entry points
        assert!(!session.tick_once());
        assert_eq!(session.run(), 0);
        assert_eq!(session.frame().tick, 1);
    }
}
