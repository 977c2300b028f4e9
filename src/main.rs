//! Tiles runner (default binary).
//!
//! Every subcommand loads the stored session, applies its change and saves the
//! snapshot back, so consecutive invocations continue the same game. `play`
//! runs an interactive session in the terminal using crossterm for input.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::{cursor, execute, terminal};
use log::{info, warn};

use tiles::codec::{decode_moves, encode_moves, parse_hex, to_hex, Submission};
use tiles::config::AppConfig;
use tiles::core::{EntropySeedSource, GameState, MoveOutcome, SeedSource};
use tiles::engine::{submission_for, verify, verify_claim, ReplayReport};
use tiles::input::{handle_key_event, should_quit, InputCommand, Throttle};
use tiles::store::{open_session, stored_best_score, FileStore, SnapshotStore};
use tiles::types::Direction;

#[derive(Debug, Parser)]
#[command(name = "tiles", version, about = "Deterministic 4x4 tile-merging game")]
struct Cli {
    /// Snapshot file (overrides TILES_STATE_PATH)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start a new session, keeping the best score
    New {
        /// Seed for the new session (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Apply one or more moves to the stored session
    Move {
        #[arg(required = true, value_parser = parse_direction)]
        directions: Vec<Direction>,
    },
    /// Print the stored session
    Show,
    /// Play interactively (default)
    Play,
    /// Print the submission payload for the stored session
    Submission {
        /// Print `seed moves count` instead of JSON
        #[arg(long)]
        plain: bool,
    },
    /// Replay a submission and report the result
    Verify {
        #[arg(long)]
        seed: u64,
        /// Packed moves as hex, e.g. 0x9c
        #[arg(long)]
        moves: String,
        #[arg(long)]
        count: u32,
        /// Claimed score to check against the replay
        #[arg(long)]
        score: Option<u32>,
    },
    /// Pack directions into the wire form
    Encode {
        #[arg(required = true, value_parser = parse_direction)]
        directions: Vec<Direction>,
    },
    /// Unpack the wire form into directions
    Decode {
        #[arg(long)]
        moves: String,
        #[arg(long)]
        count: u32,
    },
}

fn parse_direction(raw: &str) -> Result<Direction, String> {
    Direction::from_str(raw).ok_or_else(|| format!("unknown direction {:?}", raw))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    if let Some(path) = cli.state {
        config.store.state_path = path;
    }

    let mut store = FileStore::from_config(&config.store);
    info!("using snapshot {}", store.path().display());

    match cli.command.unwrap_or(Command::Play) {
        Command::New { seed } => {
            let seed = seed.unwrap_or_else(|| EntropySeedSource.next_seed());
            let best = best_score_or_zero(&store);
            let state = GameState::new(seed).with_best_score(best);
            store.save(&state.snapshot())?;
            print_state(&state);
        }
        Command::Move { directions } => {
            let mut state = open_session(&mut store, &mut EntropySeedSource)?;
            for direction in directions {
                let outcome = state.apply_move(direction);
                println!("{:<5} {}", direction.as_str(), describe(&outcome));
                if outcome.is_accepted() {
                    store.save(&state.snapshot())?;
                }
            }
            print_state(&state);
        }
        Command::Show => {
            let state = open_session(&mut store, &mut EntropySeedSource)?;
            print_state(&state);
        }
        Command::Play => {
            let state = open_session(&mut store, &mut EntropySeedSource)?;
            play(state, &mut store, config.throttle_ms)?;
        }
        Command::Submission { plain } => {
            let state = open_session(&mut store, &mut EntropySeedSource)?;
            let submission = submission_for(&state)?;
            if plain {
                println!(
                    "{} {} {}",
                    submission.seed,
                    submission.moves_hex(),
                    submission.move_count
                );
            } else {
                println!("{}", serde_json::to_string_pretty(&submission)?);
            }
        }
        Command::Verify {
            seed,
            moves,
            count,
            score,
        } => {
            let submission = Submission::from_hex(seed, &moves, count)?;
            let result = match score {
                Some(claimed) => verify_claim(&submission, claimed),
                None => verify(&submission),
            };
            match result {
                Ok(report) => print_report(&report),
                Err(e) => bail!("{} ({})", e, e.code()),
            }
        }
        Command::Encode { directions } => {
            let encoded = encode_moves(&directions)?;
            println!("{} {}", to_hex(&encoded.bytes), encoded.move_count);
        }
        Command::Decode { moves, count } => {
            let bytes = parse_hex(&moves)?;
            let directions = decode_moves(&bytes, count)?;
            let names: Vec<&str> = directions.iter().map(|d| d.as_str()).collect();
            println!("{}", names.join(" "));
        }
    }

    Ok(())
}

/// A stored snapshot that cannot be read still must not block a new game.
fn best_score_or_zero(store: &FileStore) -> u32 {
    match stored_best_score(store) {
        Ok(best) => best,
        Err(e) => {
            warn!("ignoring unreadable snapshot: {}", e);
            0
        }
    }
}

fn describe(outcome: &MoveOutcome) -> String {
    match outcome {
        MoveOutcome::Ignored => "ignored (session over)".to_string(),
        MoveOutcome::Rejected => "rejected (nothing moves)".to_string(),
        MoveOutcome::Accepted {
            score_delta,
            spawned,
            status,
            ..
        } => {
            let spawned = spawned
                .as_ref()
                .map(|t| format!("{} at ({}, {})", t.value, t.position.x, t.position.y))
                .unwrap_or_else(|| "nothing".to_string());
            format!("+{} spawned {} [{}]", score_delta, spawned, status.as_str())
        }
    }
}

fn status_line(state: &GameState) -> String {
    format!(
        "score {}  best {}  moves {}  status {}  seed {}",
        state.score(),
        state.best_score(),
        state.moves().len(),
        state.status().as_str(),
        state.seed()
    )
}

fn print_state(state: &GameState) {
    print!("{}", state.board());
    println!("{}", status_line(state));
}

fn print_report(report: &ReplayReport) {
    print!("{}", report.state.board());
    println!(
        "score {}  max tile {}  status {}  accepted {}  rejected {}  ignored {}",
        report.score(),
        report.max_tile(),
        report.status().as_str(),
        report.accepted,
        report.rejected,
        report.ignored
    );
}

fn play(mut state: GameState, store: &mut FileStore, throttle_ms: u64) -> Result<()> {
    terminal::enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

    let result = run(&mut state, store, throttle_ms, &mut stdout);

    // Always try to restore terminal state.
    let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    result
}

fn run(
    state: &mut GameState,
    store: &mut FileStore,
    throttle_ms: u64,
    out: &mut impl Write,
) -> Result<()> {
    let started = Instant::now();
    let mut throttle = Throttle::new(throttle_ms);
    let mut message = String::new();

    loop {
        draw(out, state, &message)?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if should_quit(key) {
            return Ok(());
        }

        match handle_key_event(key) {
            Some(InputCommand::Move(direction)) => {
                if !throttle.allow(started.elapsed().as_millis() as u64) {
                    continue;
                }
                let outcome = state.apply_move(direction);
                if outcome.is_accepted() {
                    store.save(&state.snapshot())?;
                }
                message = format!("{}: {}", direction, describe(&outcome));
            }
            Some(InputCommand::NewGame) => {
                state.new_game(&mut EntropySeedSource);
                store.save(&state.snapshot())?;
                throttle.reset();
                message = "new game".to_string();
            }
            Some(InputCommand::Submit) => {
                let submission = submission_for(state)?;
                message = format!(
                    "seed {} moves {} count {}",
                    submission.seed,
                    submission.moves_hex(),
                    submission.move_count
                );
            }
            None => {}
        }
    }
}

fn draw(out: &mut impl Write, state: &GameState, message: &str) -> Result<()> {
    execute!(
        out,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;
    // Raw mode needs explicit carriage returns.
    let board = state.board().to_string().replace('\n', "\r\n");
    write!(out, "{}", board)?;
    write!(out, "\r\n{}\r\n", status_line(state))?;
    write!(out, "arrows/hjkl/wasd move  n new  x submission  q quit\r\n")?;
    if !message.is_empty() {
        write!(out, "\r\n{}\r\n", message)?;
    }
    out.flush()?;
    Ok(())
}
