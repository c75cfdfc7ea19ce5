mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;

use mamma_mia::{init_session, tick, FrameInput, GameSession, GameStatus, Hooks, LogHook, Tuning};

/// Set to a file path to write a log there.  The terminal itself is busy
/// drawing the game, so there is no stderr fallback.
const LOG_ENV: &str = "MAMMA_MIA_LOG";

// ── Held keys ─────────────────────────────────────────────────────────────────

/// Frames a key stays down after its last press or repeat.  Terminals without
/// release events only report OS auto-repeat, which arrives well inside this.
const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| is_held(key_frame, key, frame))
}

/// Reduce the held keys to this frame's actions.
fn frame_input(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> FrameInput {
    use KeyCode::{Char, Down, Left, Right, Up};
    FrameInput {
        left: any_held(key_frame, &[Left, Char('a'), Char('A')], frame),
        right: any_held(key_frame, &[Right, Char('d'), Char('D')], frame),
        up: any_held(key_frame, &[Up, Char('w'), Char('W')], frame),
        down: any_held(key_frame, &[Down, Char('s'), Char('S')], frame),
        melee: any_held(key_frame, &[Char(' ')], frame),
        shoot: any_held(key_frame, &[Char('f'), Char('F')], frame),
        grenade: any_held(key_frame, &[Char('g'), Char('G')], frame),
        restart: false,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Key events only update `key_frame`, the last frame each key was seen.
/// Once per frame the keys still inside `HOLD_WINDOW` become one
/// [`FrameInput`], so walking and swinging combine freely.  Holding an attack
/// key just keeps the flag set; the melee, gun and grenade cooldowns inside
/// `tick` decide how often it fires.  Release events, where the terminal
/// sends them, drop a key at once.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut GameSession,
    hooks: &mut Hooks,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let frame_time = Duration::from_millis(u64::from(session.tuning.frame_ms));
    let mut rng = thread_rng();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut restart = false;

        while let Ok(event) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = event
            else {
                continue;
            };
            match kind {
                // Quit and restart act on the press itself.
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => restart = true,
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let input = FrameInput {
            restart: restart && session.status == GameStatus::GameOver,
            ..frame_input(&key_frame, frame)
        };
        tick(session, &input, &mut rng);

        let events = session.drain_events();
        hooks.dispatch(&events);

        let (cols, rows) = terminal::size()?;
        display::render(out, session, cols, rows)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging() -> anyhow::Result<()> {
    let Some(path) = std::env::var_os(LOG_ENV) else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("creating log file {}", path.to_string_lossy()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let tuning = Tuning::load().context("loading gameplay tuning")?;
    log::info!("Mamma Mia starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw terminal mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Release events where supported; `HOLD_WINDOW` covers the rest.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread; the loop polls the channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let mut session = init_session(tuning);
    let mut hooks = Hooks::new();
    hooks.subscribe(LogHook);
    let result = game_loop(&mut out, &mut session, &mut hooks, &rx);

    // Restore the terminal whatever the loop returned.
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    log::info!("Mamma Mia exiting, best score {}", session.best_score);
    result.context("running the game loop")
}
