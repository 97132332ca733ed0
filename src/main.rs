use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coach_engine::{ChessRules, Difficulty, Engine, EngineConfig, EngineHost, Outcome, Position};
use cozy_chess::Color;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chess bot moves and coaching hints", long_about = None)]
struct Args {
    /// JSON config file overriding engine defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for reproducible output
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pick the bot's move for a position
    Move {
        #[arg(long)]
        fen: String,
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,
    },
    /// Rank and label candidate moves for the side to move
    Hints {
        #[arg(long)]
        fen: String,
        #[arg(long, default_value_t = 5)]
        count: usize,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Play bot-vs-bot games through the execution host
    Match {
        #[arg(long, default_value = "medium")]
        white: Difficulty,
        #[arg(long, default_value = "easy")]
        black: Difficulty,
        #[arg(long, default_value_t = 10)]
        games: usize,
        #[arg(long, default_value_t = 200)]
        max_plies: usize,
    },
}

#[derive(Serialize)]
struct SuggestionJson {
    uci: String,
    san: String,
    score: i32,
    label: String,
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::from_path(p).with_context(|| format!("loading config {}", p.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn engine(config: EngineConfig, seed: Option<u64>) -> Engine {
    match seed {
        Some(s) => Engine::seeded(config, s),
        None => Engine::new(config),
    }
}

fn run_move(config: EngineConfig, seed: Option<u64>, fen: &str, difficulty: Difficulty) -> Result<()> {
    let pos = Position::from_fen(fen)?;
    let mut eng = engine(config, seed);
    match eng.select_move_in(&pos, difficulty) {
        Some(mv) => println!("{} ({})", mv.uci(), pos.san(&mv)),
        None => println!("(none)"),
    }
    Ok(())
}

fn run_hints(config: EngineConfig, seed: Option<u64>, fen: &str, count: usize, json: bool) -> Result<()> {
    let pos = Position::from_fen(fen)?;
    let mut eng = engine(config, seed);
    let side = pos.side_to_move();
    let hints = eng.analyze_suggestions_in(&pos, side, count);
    if json {
        let out: Vec<SuggestionJson> = hints
            .iter()
            .map(|h| SuggestionJson { uci: h.mv.uci(), san: h.san.clone(), score: h.score, label: h.label.clone() })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    if hints.is_empty() {
        println!("No legal moves.");
    }
    for (i, h) in hints.iter().enumerate() {
        println!("{:>2}. {:<8} {:>7}  {}", i + 1, h.san, h.score, h.label);
    }
    Ok(())
}

#[derive(Default)]
struct Tally {
    white: usize,
    black: usize,
    draws: usize,
    fallbacks: usize,
}

fn play_game(host: &mut EngineHost, white: Difficulty, black: Difficulty, max_plies: usize, tally: &mut Tally) -> Result<()> {
    let mut pos = Position::startpos();
    for _ in 0..max_plies {
        if pos.is_game_over() { break; }
        let tier = if pos.side_to_move() == Color::White { white } else { black };
        let mv = match host.submit_move(&pos.fen(), tier)?.wait() {
            Outcome::Completed(m) => m,
            Outcome::TimedOut(m) => { tally.fallbacks += 1; m }
            Outcome::Superseded => anyhow::bail!("move request superseded during a sequential match"),
        };
        let Some(mv) = mv else { break };
        pos.play(&mv)?;
    }
    if pos.is_checkmate() {
        if pos.side_to_move() == Color::White { tally.black += 1; } else { tally.white += 1; }
    } else {
        tally.draws += 1;
    }
    Ok(())
}

fn run_match(config: EngineConfig, seed: Option<u64>, white: Difficulty, black: Difficulty, games: usize, max_plies: usize) -> Result<()> {
    let mut host = match seed {
        Some(s) => EngineHost::seeded(config, s),
        None => EngineHost::new(config),
    };
    let pb = ProgressBar::new(games as u64);
    pb.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} games {msg}")?);
    let mut tally = Tally::default();
    for _ in 0..games {
        play_game(&mut host, white, black, max_plies, &mut tally)?;
        pb.set_message(format!("+{} ={} -{}", tally.white, tally.draws, tally.black));
        pb.inc(1);
    }
    pb.finish();
    println!(
        "{white} (white) vs {black} (black): {} wins, {} draws, {} losses; {} watchdog fallbacks",
        tally.white, tally.draws, tally.black, tally.fallbacks
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;
    match args.command {
        Command::Move { fen, difficulty } => run_move(config, args.seed, &fen, difficulty),
        Command::Hints { fen, count, json } => run_hints(config, args.seed, &fen, count, json),
        Command::Match { white, black, games, max_plies } => run_match(config, args.seed, white, black, games, max_plies),
    }
}
