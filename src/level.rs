// Level documents: keyed sections holding the maze, the board limits and the costs

use crate::config;
use crate::error::{ErrorReport, ParseError, StructuralError};
use crate::maze::{parse_maze, Maze};
use crate::program::{parse_board, Chip, ChipKind, CircuitBoard};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub name: String,
    pub maze: Maze, // Canonical maze, cloned for every play session
    pub board_width: usize,
    pub board_height: usize,
    pub chip_cost: i32,
    pub move_cost: i32,
    pub board: Option<String>, // Raw text of a stored solution, if the level ships one
}

/// Splits a document into `(key, value)` sections.
///
/// A key is a run of ASCII letters at the start of a line followed by `:`.
/// Text before the first key is returned under the empty key, and each value runs
/// up to the start of the next key line.
pub fn split_sections(source: &str) -> Vec<(String, &str)> {
    if source.is_empty() {
        return Vec::new();
    }
    let mut sections = Vec::new();
    let mut key = String::new();
    let mut value_start = 0;
    let mut line_start = 0;
    for line in source.split_inclusive('\n') {
        if let Some(key_len) = key_prefix(line) {
            if line_start != value_start {
                sections.push((key, &source[value_start..line_start]));
            }
            key = line[..key_len].to_string();
            value_start = line_start + key_len + 1;
        }
        line_start += line.len();
    }
    sections.push((key, &source[value_start..]));
    sections
}

/// Length of the key if `line` opens a section
fn key_prefix(line: &str) -> Option<usize> {
    let key_len = line.bytes().take_while(u8::is_ascii_alphabetic).count();
    (key_len > 0 && line.as_bytes().get(key_len) == Some(&b':')).then_some(key_len)
}

fn parse_int<T: FromStr>(key: &str, value: &str) -> Result<T, ParseError> {
    value.trim().parse().map_err(|_| ParseError::InvalidInteger {
        key: key.to_string(),
        value: value.trim().to_string(),
    })
}

impl Level {
    /// Parses a level document, collecting every problem found in any section
    pub fn parse(default_name: &str, source: &str) -> Result<Level, ErrorReport> {
        let mut report = ErrorReport::new();
        let mut name = default_name.to_string();
        let mut maze = None;
        let mut maze_given = false;
        let mut board_width = config::DEFAULT_BOARD_WIDTH;
        let mut board_height = config::DEFAULT_BOARD_HEIGHT;
        let mut chip_cost = config::DEFAULT_CHIP_COST;
        let mut move_cost = config::DEFAULT_MOVE_COST;
        let mut board = None;

        for (key, value) in split_sections(source) {
            let result = match key.to_lowercase().as_str() {
                "" | "maze" => {
                    maze_given = true;
                    match parse_maze(value) {
                        Ok(m) => maze = Some(m),
                        Err(errors) => report.extend(errors),
                    }
                    Ok(())
                }
                "name" => {
                    name = value.trim().to_string();
                    Ok(())
                }
                "boardwidth" => parse_int(&key, value).map(|v| board_width = v),
                "boardheight" => parse_int(&key, value).map(|v| board_height = v),
                "chipcost" => parse_int(&key, value).map(|v| chip_cost = v),
                "movecost" => parse_int(&key, value).map(|v| move_cost = v),
                "board" => {
                    if let Err(errors) = parse_board(value) {
                        report.extend(errors);
                    }
                    board = Some(value.to_string());
                    Ok(())
                }
                other => {
                    crate::debug_level!("Ignoring unknown section {:?}", other);
                    Ok(())
                }
            };
            if let Err(e) = result {
                report.push(e);
            }
        }

        let Some(maze) = maze else {
            // A broken maze section has already been reported
            if !maze_given {
                report.push(StructuralError::MissingMaze);
            }
            return Err(report);
        };
        let level = Level {
            name,
            maze,
            board_width,
            board_height,
            chip_cost,
            move_cost,
            board,
        };
        if report.is_empty() {
            crate::debug_level!(
                "Loaded level {:?}: maze {:?}, board {}x{}, {} flags",
                level.name,
                level.maze.size(),
                level.board_width,
                level.board_height,
                level.maze.flags()
            );
        }
        report.into_result(level)
    }

    pub fn board_size(&self) -> (usize, usize) {
        (self.board_width, self.board_height)
    }

    /// An empty board of the level's size with a Start chip in the middle
    pub fn blank_board(&self) -> CircuitBoard {
        let mut board = CircuitBoard::new(self.board_width, self.board_height);
        board.set_chip_at(
            (self.board_width / 2) as i32,
            (self.board_height / 2) as i32,
            Chip::new(ChipKind::Start),
        );
        board
    }

    /// The board stored with the level, or a blank one when there is none
    pub fn load_board(&self) -> Result<CircuitBoard, ErrorReport> {
        match &self.board {
            Some(text) => parse_board(text),
            None => Ok(self.blank_board()),
        }
    }
}
