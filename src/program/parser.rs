// Board text format: parses `|ST -> MF|` style grids into a CircuitBoard and prints them back

use super::board::CircuitBoard;
use super::chip::{Chip, ChipKind};
use crate::error::{ErrorReport, ParseError, StructuralError};
use crate::types::Orientation;
use std::fmt;
use std::str::FromStr;

/// Distance between two chip columns in a board line
const COLUMN_STRIDE: usize = 6;

/// Parses a board. Bad codes are all collected before giving up.
pub fn parse_board(source: &str) -> Result<CircuitBoard, ErrorReport> {
    let mut rows = Vec::new();
    for (i, line) in source.trim().lines().enumerate() {
        let line = line.trim();
        let inner = line
            .strip_prefix('|')
            .and_then(|l| l.strip_suffix('|'))
            .ok_or(ParseError::MissingFrame { line: i + 1 })?;
        rows.push(inner.as_bytes());
    }

    if rows.len() % 2 != 1 {
        return Err(StructuralError::EvenLineCount.into());
    }
    let height = rows.len().div_ceil(2);
    let line_len = rows[0].len();
    let width = (line_len + 4) / COLUMN_STRIDE;
    if width == 0 || width * COLUMN_STRIDE - 4 != line_len {
        return Err(StructuralError::WrongLineLength { line: 1 }.into());
    }
    if let Some(i) = rows.iter().position(|row| row.len() != line_len) {
        return Err(StructuralError::WrongLineLength { line: i + 1 }.into());
    }

    let mut board = CircuitBoard::new(width, height);
    let mut report = ErrorReport::new();
    let mut has_start = false;
    let code_at = |row: &[u8], col: usize| String::from_utf8_lossy(&row[col..col + 2]).into_owned();
    // Columns are reported 1-based and count the opening '|'
    let column = |col: usize| col + 2;

    // Kinds first, so arrow-no edits below see which chips are decisions
    for (i, &row) in rows.iter().enumerate().step_by(2) {
        let y = (i / 2) as i32;
        for x in 0..width {
            let col = x * COLUMN_STRIDE;
            let code = code_at(row, col);
            let Some(kind) = ChipKind::from_symbol(&code) else {
                report.push(ParseError::InvalidChipCode {
                    line: i + 1,
                    col: column(col),
                    code,
                });
                continue;
            };
            if kind == ChipKind::Start {
                if has_start {
                    report.push(StructuralError::SecondStart {
                        line: i + 1,
                        col: column(col),
                    });
                }
                has_start = true;
            }
            board.set_chip_at(x as i32, y, Chip::new(kind));
        }
    }

    for (i, &row) in rows.iter().enumerate() {
        let y = (i / 2) as i32;
        if i % 2 == 0 {
            for x in 0..width - 1 {
                let col = x * COLUMN_STRIDE + 3;
                let code = code_at(row, col);
                let (left, right) = (x as i32, x as i32 + 1);
                match code.as_str() {
                    "y>" | "->" => {
                        board.set_chip_at(left, y, board.chip_at(left, y).with_arrow_yes(Orientation::East))
                    }
                    "n>" => {
                        board.set_chip_at(left, y, board.chip_at(left, y).with_arrow_no(Orientation::East))
                    }
                    "<y" | "<-" => {
                        board.set_chip_at(right, y, board.chip_at(right, y).with_arrow_yes(Orientation::West))
                    }
                    "<n" => {
                        board.set_chip_at(right, y, board.chip_at(right, y).with_arrow_no(Orientation::West))
                    }
                    ".." | "  " => {}
                    _ => report.push(ParseError::InvalidArrowCode {
                        line: i + 1,
                        col: column(col),
                        code,
                    }),
                }
            }
        } else {
            for x in 0..width {
                let col = x * COLUMN_STRIDE;
                let code = code_at(row, col);
                let xi = x as i32;
                match code.as_str() {
                    "yv" | " v" => {
                        board.set_chip_at(xi, y, board.chip_at(xi, y).with_arrow_yes(Orientation::South))
                    }
                    "nv" => {
                        board.set_chip_at(xi, y, board.chip_at(xi, y).with_arrow_no(Orientation::South))
                    }
                    "y^" | " ^" => {
                        board.set_chip_at(xi, y + 1, board.chip_at(xi, y + 1).with_arrow_yes(Orientation::North))
                    }
                    "n^" => {
                        board.set_chip_at(xi, y + 1, board.chip_at(xi, y + 1).with_arrow_no(Orientation::North))
                    }
                    ".." | "  " => {}
                    _ => report.push(ParseError::InvalidArrowCode {
                        line: i + 1,
                        col: column(col),
                        code,
                    }),
                }
            }
        }
    }

    if !has_start {
        report.push(StructuralError::MissingStart);
    }
    report.into_result(board)
}

impl FromStr for CircuitBoard {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_board(s)
    }
}

fn horizontal_code(left: Chip, right: Chip) -> (&'static str, bool) {
    let from_left = if left.arrow_yes() == Some(Orientation::East) {
        Some(if left.is_decision() { "y>" } else { "->" })
    } else if left.arrow_no() == Some(Orientation::East) {
        Some("n>")
    } else {
        None
    };
    let from_right = if right.arrow_yes() == Some(Orientation::West) {
        Some(if right.is_decision() { "<y" } else { "<-" })
    } else if right.arrow_no() == Some(Orientation::West) {
        Some("<n")
    } else {
        None
    };
    match (from_left, from_right) {
        (Some(code), other) => (code, other.is_some()),
        (None, Some(code)) => (code, false),
        (None, None) => ("  ", false),
    }
}

fn vertical_code(upper: Chip, lower: Chip) -> (&'static str, bool) {
    let from_upper = if upper.arrow_yes() == Some(Orientation::South) {
        Some(if upper.is_decision() { "yv" } else { " v" })
    } else if upper.arrow_no() == Some(Orientation::South) {
        Some("nv")
    } else {
        None
    };
    let from_lower = if lower.arrow_yes() == Some(Orientation::North) {
        Some(if lower.is_decision() { "y^" } else { " ^" })
    } else if lower.arrow_no() == Some(Orientation::North) {
        Some("n^")
    } else {
        None
    };
    match (from_upper, from_lower) {
        (Some(code), other) => (code, other.is_some()),
        (None, Some(code)) => (code, false),
        (None, None) => ("  ", false),
    }
}

impl fmt::Display for CircuitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = (self.width() as i32, self.height() as i32);
        for y in 0..height {
            if y > 0 {
                // Arrow row between chip rows y - 1 and y
                f.write_str("|")?;
                for x in 0..width {
                    let (code, clash) = vertical_code(self.chip_at(x, y - 1), self.chip_at(x, y));
                    if clash {
                        log::warn!(target: "board", "Arrows at ({}, {}) and ({}, {}) share a gap, keeping the upper one", x, y - 1, x, y);
                    }
                    f.write_str(code)?;
                    if x < width - 1 {
                        f.write_str("    ")?;
                    }
                }
                writeln!(f, "|")?;
            }

            f.write_str("|")?;
            for x in 0..width {
                let chip = self.chip_at(x, y);
                f.write_str(chip.kind().symbol())?;
                if x < width - 1 {
                    let (code, clash) = horizontal_code(chip, self.chip_at(x + 1, y));
                    if clash {
                        log::warn!(target: "board", "Arrows at ({}, {}) and ({}, {}) share a gap, keeping the left one", x, y, x + 1, y);
                    }
                    write!(f, " {} ", code)?;
                }
            }
            f.write_str("|")?;
            if y < height - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
