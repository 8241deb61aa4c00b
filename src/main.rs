use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};
use log::{debug, info, warn, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_invaders::controller::SessionTasks;
use space_invaders::display::presentation::Hud;
use space_invaders::display::{render, Surface, C_BACKGROUND};
use space_invaders::display::terminal::TerminalSurface;
use space_invaders::input::{Command, InputSampler};
use space_invaders::{Game, GameConfig, GameError, Phase};

#[derive(Parser)]
#[command(name = "space_invaders")]
#[command(about = "Defend the planet from descending invader waves, in your terminal")]
struct Args {
    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Where log output goes (the terminal is in raw mode)
    #[arg(long, default_value = "space_invaders.log")]
    log_file: PathBuf,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value = "info", value_parser = parse_level)]
    log_level: LevelFilter,

    /// Frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    LevelFilter::from_str(s).map_err(|_| format!("unknown log level '{}'", s))
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let args = Args::parse();

    if let Err(e) = simple_logging::log_to_file(&args.log_file, args.log_level) {
        eprintln!("cannot open log file {}: {}", args.log_file.display(), e);
        process::exit(1);
    }

    if let Err(e) = play(&args) {
        warn!("exiting with error: {}", e);
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn play(args: &Args) -> Result<(), GameError> {
    let game = Game::new(GameConfig::default())?;

    // Fail before touching the terminal if the play field cannot fit.
    let (cols, rows) = terminal::size()?;
    let surface = TerminalSurface::new(cols, rows, game.config())?;

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release events; terminals without support fall back to
    // the hold window in `InputSampler`.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, game, surface, args);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

// ── Frame loop ────────────────────────────────────────────────────────────────

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    mut game: Game,
    mut surface: TerminalSurface,
    args: &Args,
) -> Result<(), GameError> {
    let mut rng = match args.seed {
        Some(seed) => {
            info!("seeded session rng with {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let frame_len = Duration::from_secs_f64(1.0 / args.fps as f64);
    let clock = Instant::now();
    let mut hud = Hud::new(game.state(), game.config());
    let mut input = InputSampler::new();
    let mut tasks: Option<SessionTasks> = None;

    loop {
        let frame_start = Instant::now();
        let now = clock.elapsed().as_millis() as u64;
        input.next_frame(now);

        // ── Drain pending terminal events ─────────────────────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(key) => match input.handle_key(key) {
                    Some(Command::Quit) => return Ok(()),
                    Some(Command::Start)
                        if matches!(game.phase(), Phase::Idle | Phase::GameOver) =>
                    {
                        tasks = Some(game.restart(now));
                        input.clear();
                    }
                    Some(Command::Fire) => {
                        game.fire();
                    }
                    Some(Command::TogglePause) => {
                        game.toggle_pause();
                    }
                    _ => {}
                },
                Event::Resize(cols, rows) => match TerminalSurface::new(cols, rows, game.config()) {
                    Ok(resized) => surface = resized,
                    Err(e) => warn!("keeping previous layout: {}", e),
                },
                _ => {}
            }
        }

        // ── Scheduled tasks: input sampling, then the update ──────────────────
        let events = match tasks {
            Some(t) => {
                game.sample_input(t.input, &input.held_directions());
                game.frame(t.frame, now, &mut rng)
            }
            None => Vec::new(),
        };
        for event in &events {
            debug!("{:?}", event);
        }
        hud.apply(&events, game.state(), now);

        // ── Draw ──────────────────────────────────────────────────────────────
        let phase = game.phase();
        if phase != Phase::Idle {
            render(&mut surface, game.state(), game.config(), now)?;
        } else {
            surface.clear(C_BACKGROUND)?;
        }
        hud.draw(&mut surface, phase, now);
        surface.flush_to(out)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_len {
            thread::sleep(frame_len - elapsed);
        }
    }
}
