use circuitbot::config;
use circuitbot::controller::{LevelController, PlayStatus};
use circuitbot::level::Level;
use circuitbot::program::CircuitBoard;
use circuitbot::{assets, logging};

use clap::Parser;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;

// --- Command Line Arguments ---
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level file to play
    #[arg(required_unless_present_any = ["builtin", "list"], conflicts_with = "builtin")]
    level: Option<PathBuf>,

    /// Play a built-in level instead of a file
    #[arg(long)]
    builtin: Option<String>,

    /// Board file to run; defaults to the level's own board or a blank one
    #[arg(long)]
    board: Option<PathBuf>,

    /// Maximum number of ticks to simulate
    #[arg(long, default_value_t = config::MAX_TICKS)]
    ticks: u32,

    /// List the built-in levels and exit
    #[arg(long)]
    list: bool,

    /// Debug filter to specify log topics (e.g., "board,maze")
    /// Available topics: board, maze, robot, level
    #[arg(long)]
    debug_filter: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn read_file(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        error!("Cannot read {}: {}", path.display(), e);
        process::exit(1);
    })
}

fn load_level(args: &Args) -> Level {
    let (name, text) = match (&args.level, &args.builtin) {
        (Some(path), _) => {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| config::DEFAULT_LEVEL_NAME.to_string());
            (name, read_file(path))
        }
        (None, Some(name)) => match assets::level_text(name) {
            Some(text) => (name.clone(), text),
            None => {
                error!("No built-in level named {:?}, try --list", name);
                process::exit(1);
            }
        },
        (None, None) => (config::DEFAULT_LEVEL_NAME.to_string(), String::new()),
    };
    Level::parse(&name, &text).unwrap_or_else(|report| {
        error!("Level {:?} has errors:\n{}", name, report);
        process::exit(1);
    })
}

fn load_board(args: &Args, level: &Level) -> CircuitBoard {
    let board = match &args.board {
        Some(path) => read_file(path).parse::<CircuitBoard>(),
        None => level.load_board(),
    };
    board.unwrap_or_else(|report| {
        error!("Board has errors:\n{}", report);
        process::exit(1);
    })
}

fn main() {
    let args = Args::parse();

    let log_level = logging::parse_level(&args.log_level);
    if let Err(e) = logging::init_logger(log_level, args.debug_filter.clone()) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    if args.list {
        for name in assets::level_names() {
            println!("{}", name);
        }
        return;
    }

    let level = load_level(&args);
    let mut board = load_board(&args, &level);
    info!("Playing {:?}, board {}x{}", level.name, board.width(), board.height());

    let mut controller = LevelController::new(&level, &mut board).unwrap_or_else(|e| {
        error!("Cannot run board: {}", e);
        process::exit(1);
    });
    while controller.status() == PlayStatus::Running && controller.ticks() < args.ticks {
        controller.advance();
    }

    println!("{}", controller.maze());
    let outcome = match controller.status() {
        PlayStatus::Won => "level cleared",
        PlayStatus::Halted => "program halted",
        PlayStatus::Running => "out of ticks",
    };
    println!(
        "{}: {} after {} ticks, {} of {} flags, score {}",
        level.name,
        outcome,
        controller.ticks(),
        controller.maze().flags_captured(),
        controller.maze().flags(),
        controller.score()
    );
    println!("{}", controller.board());
    if controller.status() != PlayStatus::Won {
        process::exit(2);
    }
}
