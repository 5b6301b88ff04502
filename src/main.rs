mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sky_flyer::audio::TerminalBell;
use sky_flyer::config::{log_filter, GameConfig};
use sky_flyer::levels::LevelCatalog;
use sky_flyer::scene::{Control, Game, Input};

/// Longest step fed to the simulation after a stall (window drag, suspend).
const MAX_STEP_MS: u32 = 100;

#[derive(Parser)]
#[command(name = "sky_flyer")]
#[command(about = "Endless side-scrolling flyer for the terminal")]
struct Args {
    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Level catalog (TOML) replacing the built-in levels
    #[arg(short, long)]
    levels: Option<PathBuf>,

    /// Fixed RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Skip the menus and start at this level (1-based)
    #[arg(long)]
    start_level: Option<usize>,

    /// Write logs here; the terminal is busy drawing the game
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Logging ───────────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn load_settings(args: &Args) -> sky_flyer::Result<(GameConfig, LevelCatalog)> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(levels) = &args.levels {
        config.levels_path = Some(levels.clone());
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(fps) = args.fps {
        config.fps = fps;
    }
    config.validate()?;
    let catalog = config.level_catalog()?;
    Ok((config, catalog))
}

/// Map a key press to a game input.  `None` for keys the game ignores.
fn map_key(code: KeyCode) -> Option<Input> {
    match code {
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(Input::Flap)
        }
        KeyCode::Enter => Some(Input::Confirm),
        KeyCode::Esc => Some(Input::Back),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Input::Quit),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(Input::ToggleMute),
        _ => None,
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        if let Err(err) = init_logging(path) {
            eprintln!("Failed to open log file {}: {}", path.display(), err);
            return ExitCode::FAILURE;
        }
    }

    // Settings errors are reported before the terminal is taken over.
    let (config, catalog) = match load_settings(&args) {
        Ok(loaded) => loaded,
        Err(err) => {
            error!(%err, "failed to load settings");
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = Game::new(catalog, config.viewport(), TerminalBell::new(stdout()), rng);
    if let Some(level) = args.start_level {
        game.start_at(level.saturating_sub(1));
    }

    match run_terminal(&mut game, config.frame_duration()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "terminal error");
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run_terminal<A, R>(game: &mut Game<A, R>, frame: Duration) -> std::io::Result<()>
where
    A: sky_flyer::audio::AudioSink,
    R: rand::Rng,
{
    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    info!("session started");
    let result = game_loop(&mut out, game, &rx, frame);
    info!(score = game.session().score(), "session ended");

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn game_loop<W, A, R>(
    out: &mut W,
    game: &mut Game<A, R>,
    rx: &mpsc::Receiver<Event>,
    frame: Duration,
) -> std::io::Result<()>
where
    W: Write,
    A: sky_flyer::audio::AudioSink,
    R: rand::Rng,
{
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            if kind != KeyEventKind::Press {
                continue;
            }
            if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(());
            }
            if let Some(input) = map_key(code) {
                if game.handle_input(input) == Control::Exit {
                    return Ok(());
                }
            }
        }

        let now = Instant::now();
        let dt_ms = (now.duration_since(last).as_millis() as u32).min(MAX_STEP_MS);
        last = now;
        game.update(dt_ms);

        let (cols, rows) = terminal::size()?;
        display::render(out, game, cols, rows)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            std::thread::sleep(frame - elapsed);
        }
    }
}
