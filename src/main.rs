use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glam::Vec3;
use stalker::{
    init_logging, AnimFloat, AnimationDriver, ControllerConfig, GameState, InputState, PhysicsWorld,
};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Role {
    Monster,
    Survivor,
}

/// Headless character controller simulation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file; overrides the role preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Preset to use when no config file is given
    #[arg(long, value_enum, default_value_t = Role::Monster)]
    role: Role,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 30.0)]
    seconds: f32,

    /// Ticks per simulated second
    #[arg(long, default_value_t = 60)]
    tick_rate: u32,

    /// When the scripted chase trigger fires
    #[arg(long, default_value_t = 8.0)]
    chase_at: f32,

    /// Pace ticks against the wall clock instead of stepping instantly
    #[arg(long)]
    realtime: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug)]
enum Cue {
    Key(KeyCode, bool),
    Mouse(MouseButton, bool),
    Look(f32, f32),
}

/// Time-ordered input script replayed against the controller.
struct Script {
    cues: Vec<(f32, Cue)>,
    next: usize,
}

impl Script {
    fn new(chase_at: f32, warmup: f32) -> Self {
        let tap = |at: f32, key: KeyCode| [(at, Cue::Key(key, true)), (at + 0.1, Cue::Key(key, false))];
        let click = |at: f32| {
            [
                (at, Cue::Mouse(MouseButton::Left, true)),
                (at + 0.1, Cue::Mouse(MouseButton::Left, false)),
            ]
        };

        let mut cues = vec![
            (0.0, Cue::Key(KeyCode::KeyW, true)),
            (1.0, Cue::Key(KeyCode::ShiftLeft, true)),
            (2.5, Cue::Key(KeyCode::ShiftLeft, false)),
            (3.5, Cue::Look(40.0, -10.0)),
            (5.0, Cue::Key(KeyCode::ControlLeft, true)),
            (6.0, Cue::Key(KeyCode::ControlLeft, false)),
        ];
        cues.extend(tap(2.0, KeyCode::Space));
        cues.extend(tap(3.0, KeyCode::KeyC));
        cues.extend(click(4.0));
        // Inside the cooldown; should be suppressed.
        cues.extend(click(4.5));
        cues.extend(tap(chase_at, KeyCode::KeyR));
        // Dropped: a session is already in flight.
        cues.extend(tap(chase_at + 2.0, KeyCode::KeyR));
        cues.extend(click(chase_at + warmup + 1.0));
        cues.extend(tap(chase_at + warmup + 2.0, KeyCode::KeyC));

        cues.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { cues, next: 0 }
    }

    fn apply_until(&mut self, t: f32, input: &mut InputState) {
        while let Some(&(at, cue)) = self.cues.get(self.next) {
            if at > t {
                break;
            }
            match cue {
                Cue::Key(key, true) => input.handle_key_press(key),
                Cue::Key(key, false) => input.handle_key_release(key),
                Cue::Mouse(button, pressed) => input.handle_mouse_button(button, pressed),
                Cue::Look(dx, dy) => input.handle_mouse_move(dx, dy),
            }
            self.next += 1;
        }
    }
}

fn load_config(args: &Args) -> Result<ControllerConfig> {
    match &args.config {
        Some(path) => ControllerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(match args.role {
            Role::Monster => ControllerConfig::monster(),
            Role::Survivor => ControllerConfig::survivor(),
        }),
    }
}

fn log_state(game: &GameState) {
    let controller = &game.controller;
    let body = controller.body();
    log::info!(
        "t={:5.2}s pos=({:6.2}, {:5.2}, {:6.2}) yaw={:6.1} pitch={:5.1} grounded={} sprint={} crouch={} chase={:?} stealth={} view={}",
        controller.clock(),
        body.position.x,
        body.position.y,
        body.position.z,
        body.yaw,
        body.pitch,
        body.grounded,
        controller.is_sprinting(),
        controller.is_crouching(),
        controller.chase_phase(),
        controller.is_stealthed(),
        if controller.view().is_first_person() { "first" } else { "third" },
    );
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    anyhow::ensure!(args.tick_rate > 0, "--tick-rate must be positive");
    anyhow::ensure!(
        args.seconds.is_finite() && args.seconds >= 0.0,
        "--seconds must be a non-negative number"
    );

    let config = load_config(&args)?;
    let physics = PhysicsWorld::flat_ground(200.0, 0.0).context("building floor")?;
    let mut script = Script::new(args.chase_at, config.chase_warmup);
    let mut game = GameState::new(config, physics, Vec3::ZERO, 0.0).context("building character")?;
    let mut input = InputState::new();

    let dt = 1.0 / args.tick_rate as f32;
    let ticks = (args.seconds * args.tick_rate as f32).round() as u64;
    log::info!("Running {ticks} ticks at {} Hz", args.tick_rate);

    for tick in 0..ticks {
        script.apply_until(game.controller.clock() as f32, &mut input);

        let report = if args.realtime {
            std::thread::sleep(Duration::from_secs_f32(dt));
            game.update(&input)
        } else {
            game.step(dt, &input)
        };
        input.end_frame();

        if report.landed {
            log::debug!("Landed at t={:.2}s", game.controller.clock());
        }
        for event in &report.chase_events {
            log::info!("Chase event {event:?}");
        }
        if let Some(animator) = game.controller.animator_mut() {
            for trigger in animator.take_triggers() {
                log::info!("Animation trigger {}", trigger.name());
            }
        }
        if (tick + 1) % u64::from(args.tick_rate) == 0 {
            log_state(&game);
        }
    }

    if let Some(animator) = game.controller.animator() {
        log::info!(
            "Final animation speed {:.2}",
            animator.float(AnimFloat::Speed)
        );
    }
    log_state(&game);
    Ok(())
}
