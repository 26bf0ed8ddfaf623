//! Kinetic Breakout entry point
//!
//! Runs the simulation loop on its own thread and drives it headless: an
//! autopilot stands in for the keyboard and the log stands in for the screen.
//!
//! Usage: `breakout [--json] [settings.json]`

use std::thread;
use std::time::Duration;

use anyhow::Context;
use kinetic_breakout::{Frame, Key, Session, Settings};

/// Display refresh rate of the headless frame reader
const FRAME_HZ: f64 = 60.0;

/// Paddle stops chasing once the ball is this close to its center
const DEAD_ZONE: i32 = 4;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut json = false;
    let mut settings_path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            _ => settings_path = Some(arg),
        }
    }

    let settings = match settings_path {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    log::info!("Kinetic Breakout starting");

    let session = Session::new(settings);
    let simulation = session
        .spawn_loop()
        .context("failed to start simulation thread")?;

    let frame_interval = Duration::from_secs_f64(1.0 / FRAME_HZ);
    let mut pilot = Autopilot::default();
    let mut hud = None;
    let mut frames = 0;

    loop {
        let frame = session.frame();
        if frame.finished {
            break;
        }
        if frames >= session.settings().demo_frames {
            log::info!("Demo time is up");
            session.key_down(Key::Quit);
            break;
        }

        pilot.steer(&session, &frame);

        let line = (frame.score, frame.lives, frame.level);
        if hud != Some(line) {
            log::info!(
                "Score {} | Lives {} | Level {}",
                frame.score,
                frame.lives,
                frame.level + 1
            );
            hud = Some(line);
        }

        frames += 1;
        thread::sleep(frame_interval);
    }

    let ticks = simulation
        .join()
        .map_err(|_| anyhow::anyhow!("simulation thread panicked"))?;

    let frame = session.frame();
    if json {
        println!("{}", serde_json::to_string_pretty(&frame)?);
    } else {
        println!(
            "Game over after {} ticks: score {}, lives {}, level {}",
            ticks,
            frame.score,
            frame.lives,
            frame.level + 1
        );
    }
    Ok(())
}

/// Holds left or right to keep the paddle under the ball
#[derive(Debug, Default)]
struct Autopilot {
    held: Option<Key>,
}

impl Autopilot {
    fn steer(&mut self, session: &Session, frame: &Frame) {
        let offset = frame.ball.center().x - frame.paddle.center().x;
        let wanted = if offset < -DEAD_ZONE {
            Some(Key::Left)
        } else if offset > DEAD_ZONE {
            Some(Key::Right)
        } else {
            None
        };

        if wanted == self.held {
            return;
        }
        if let Some(key) = self.held {
            session.key_up(key);
        }
        if let Some(key) = wanted {
            session.key_down(key);
        }
        self.held = wanted;
    }
}
