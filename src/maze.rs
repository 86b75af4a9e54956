use crate::error::{ErrorReport, ParseError, StructuralError};
use crate::robot::Robot;
use crate::types::*;
use crate::utils::wrap;
use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// One maze square. Walls are stored on the north and west sides only;
    /// the south and east walls are read from the neighbours.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Cell: u8 {
        const NORTH_WALL  = 1 << 0;
        const WEST_WALL   = 1 << 1;
        const CORNER_WALL = 1 << 2; // North-west corner post
        const FLAG        = 1 << 3;
        const COLOR_LO    = 1 << 4;
        const COLOR_HI    = 1 << 5;
        const CAPTURED    = 1 << 6;

        const COLOR = Self::COLOR_LO.bits() | Self::COLOR_HI.bits();
    }
}

const COLOR_SHIFT: u8 = 4;

impl Cell {
    pub fn north_wall(self) -> bool {
        self.contains(Cell::NORTH_WALL)
    }

    pub fn west_wall(self) -> bool {
        self.contains(Cell::WEST_WALL)
    }

    pub fn corner_wall(self) -> bool {
        self.contains(Cell::CORNER_WALL)
    }

    pub fn flag(self) -> bool {
        self.contains(Cell::FLAG)
    }

    pub fn captured(self) -> bool {
        self.contains(Cell::CAPTURED)
    }

    pub fn color(self) -> Color {
        Color::from_bits((self & Cell::COLOR).bits() >> COLOR_SHIFT)
    }

    pub fn with_color(self, color: Color) -> Cell {
        (self - Cell::COLOR) | color.to_cell()
    }

    pub fn capture(self) -> Cell {
        self | Cell::CAPTURED
    }
}

impl Color {
    pub fn to_cell(self) -> Cell {
        Cell::from_bits_truncate(self.bits() << COLOR_SHIFT)
    }
}

/// The maze grid with its robot. Coordinates wrap around both edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    robot: Robot,
    flags: usize,    // Cells with a flag
    captured: usize, // Flagged cells already captured
}

impl Maze {
    /// Creates a bare maze with the robot in the top-left corner facing north.
    /// Both sides are at least one cell, so addressing always wraps.
    pub fn new(width: usize, height: usize) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Maze {
            width,
            height,
            cells: vec![Cell::empty(); width * height],
            robot: Robot::default(),
            flags: 0,
            captured: 0,
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn cell_index(&self, x: i32, y: i32) -> usize {
        let x = wrap(x, self.width as i32) as usize;
        let y = wrap(y, self.height as i32) as usize;
        x + y * self.width
    }

    pub fn cell_at(&self, x: i32, y: i32) -> Cell {
        self.cells[self.cell_index(x, y)]
    }

    /// Adds the bits of `cell` to the cell at (x, y), keeping the flag counters in step.
    /// A color in `cell` replaces the current floor color.
    pub fn update_cell_at(&mut self, x: i32, y: i32, cell: Cell) {
        let i = self.cell_index(x, y);
        let old = self.cells[i];
        let mut new = old | cell;
        if cell.color() != Color::NoColor {
            new = old.with_color(cell.color()) | (cell - Cell::COLOR);
        }
        if new.flag() && !old.flag() {
            self.flags += 1;
        }
        if new.captured() && !old.captured() && new.flag() {
            self.captured += 1;
        }
        // A capture bit without a flag means nothing
        if !new.flag() {
            new.remove(Cell::CAPTURED);
        }
        self.cells[i] = new;
    }

    /// Captures the flag at (x, y) if there is one still standing
    pub fn capture_flag(&mut self, x: i32, y: i32) -> bool {
        let i = self.cell_index(x, y);
        let cell = self.cells[i];
        if !cell.flag() || cell.captured() {
            return false;
        }
        self.cells[i] = cell.capture();
        self.captured += 1;
        true
    }

    pub fn paint_cell(&mut self, x: i32, y: i32, color: Color) {
        let i = self.cell_index(x, y);
        self.cells[i] = self.cells[i].with_color(color);
    }

    pub fn flags(&self) -> usize {
        self.flags
    }

    pub fn flags_captured(&self) -> usize {
        self.captured
    }

    pub fn flags_remaining(&self) -> usize {
        self.flags - self.captured
    }

    pub fn has_wall_at(&self, x: i32, y: i32, o: Orientation) -> bool {
        match o {
            Orientation::North => self.cell_at(x, y).north_wall(),
            Orientation::West => self.cell_at(x, y).west_wall(),
            Orientation::South => self.cell_at(x, y + 1).north_wall(),
            Orientation::East => self.cell_at(x + 1, y).west_wall(),
        }
    }

    /// What the robot senses from its current square and heading
    pub fn sensors(&self) -> SensorReading {
        let Position { x, y } = self.robot.position;
        SensorReading {
            wall_ahead: self.has_wall_at(x, y, self.robot.orientation),
            floor_color: self.cell_at(x, y).color(),
        }
    }

    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    pub fn place_robot(&mut self, robot: Robot) {
        self.robot = robot;
    }

    pub fn stop_robot(&mut self) {
        self.robot = self.robot.stop();
    }

    /// Commits the robot's pending motion, then captures and paints at its destination
    pub fn advance_robot(&mut self) {
        let mut robot = self.robot.advance();
        robot.position = Position::new(
            wrap(robot.position.x, self.width as i32),
            wrap(robot.position.y, self.height as i32),
        );
        let Position { x, y } = robot.position;
        if self.capture_flag(x, y) {
            log::info!(target: "maze", "Flag captured at {}, {} remaining", robot.position, self.flags_remaining());
        }
        if let Some(color) = robot.color_painting() {
            crate::debug_maze!("Painting {} {}", robot.position, color);
            self.paint_cell(x, y, color);
        }
        self.robot = robot;
    }

    /// Sets up the robot's motion for `command`. Returns true if it bumped into a wall,
    /// in which case the robot stays where it is.
    pub fn command_robot(&mut self, command: Command) -> bool {
        let mut next = self.robot.apply_command(command);
        let Position { x, y } = next.position;
        let crashed = next.is_moving_forward() && self.has_wall_at(x, y, next.orientation);
        if crashed {
            crate::debug_maze!("Robot at {} bumped into the {} wall", next.position, next.orientation);
            next = self.robot.apply_command(Command::NoCommand);
        }
        self.robot = next;
        crashed
    }
}

fn wrong_char(i: usize, j: usize, allowed: &'static str) -> ParseError {
    ParseError::WrongChar {
        line: i + 1,
        col: j + 1,
        allowed,
    }
}

/// Parses the maze grammar: `+`/`.` corners, `-` and `|` walls, `R`/`Y`/`B` floors,
/// `F` flags and one of `^ > v <` for the robot.
pub fn parse_maze(source: &str) -> Result<Maze, ErrorReport> {
    let rows: Vec<&[u8]> = source.trim().lines().map(str::as_bytes).collect();
    if rows.len() % 2 != 1 {
        return Err(StructuralError::EvenLineCount.into());
    }
    let height = (rows.len() - 1) / 2;
    if height == 0 {
        return Err(StructuralError::NoRows.into());
    }
    let line_len = rows[0].len();
    let width = line_len.saturating_sub(1) / 3;
    if width == 0 || width * 3 + 1 != line_len {
        return Err(StructuralError::WrongLineLength { line: 1 }.into());
    }
    if let Some(i) = rows.iter().position(|row| row.len() != line_len) {
        return Err(StructuralError::WrongLineLength { line: i + 1 }.into());
    }

    let mut maze = Maze::new(width, height);
    let mut report = ErrorReport::new();
    let mut robot: Option<Robot> = None;

    for (i, row) in rows.iter().enumerate() {
        let y = (i / 2) as i32;
        // The closing wall row is the torus seam: checked, not stored
        let record = (i / 2) < height;
        if i % 2 == 0 {
            for (j, &c) in row.iter().enumerate() {
                let x = (j / 3) as i32;
                if j / 3 == width {
                    if c != b'+' {
                        report.push(wrong_char(i, j, "+"));
                    }
                    continue;
                }
                match (j % 3, c) {
                    (0, b'+') if record => maze.update_cell_at(x, y, Cell::CORNER_WALL),
                    (0, b'+' | b'.') => {}
                    (0, _) => report.push(wrong_char(i, j, "+.")),
                    (1, b'-') if record => maze.update_cell_at(x, y, Cell::NORTH_WALL),
                    (1, b'-' | b' ') => {}
                    (1, _) => report.push(wrong_char(i, j, "- ")),
                    (_, b'-' | b' ') => {
                        // Second half of a wall must match the first
                        let first_is_wall = row[j - 1] == b'-';
                        if (c == b'-') != first_is_wall {
                            report.push(wrong_char(i, j, if first_is_wall { "-" } else { " " }));
                        }
                    }
                    (_, _) => report.push(wrong_char(i, j, "- ")),
                }
            }
        } else {
            for (j, &c) in row.iter().enumerate() {
                let x = (j / 3) as i32;
                if j / 3 == width {
                    if c != b'|' {
                        report.push(wrong_char(i, j, "|"));
                    }
                    continue;
                }
                match (j % 3, c) {
                    (0, b'|') => maze.update_cell_at(x, y, Cell::WEST_WALL),
                    (0, b' ') => {}
                    (0, _) => report.push(wrong_char(i, j, "| ")),
                    (1, b'R') => maze.update_cell_at(x, y, Color::Red.to_cell()),
                    (1, b'Y') => maze.update_cell_at(x, y, Color::Yellow.to_cell()),
                    (1, b'B') => maze.update_cell_at(x, y, Color::Blue.to_cell()),
                    (1, b' ') => {}
                    (1, _) => report.push(wrong_char(i, j, "RYB ")),
                    (_, b'F') => maze.update_cell_at(x, y, Cell::FLAG),
                    (_, b'^' | b'>' | b'v' | b'<') => {
                        if robot.is_some() {
                            report.push(StructuralError::SecondRobot {
                                line: i + 1,
                                col: j + 1,
                            });
                            continue;
                        }
                        robot = Some(Robot::new(Position::new(x, y), glyph_orientation(c)));
                    }
                    (_, b' ') => {}
                    (_, _) => report.push(wrong_char(i, j, "F^>v< ")),
                }
            }
        }
    }

    match robot {
        Some(robot) => maze.place_robot(robot),
        None => report.push(StructuralError::MissingRobot),
    }
    report.into_result(maze)
}

fn glyph_orientation(c: u8) -> Orientation {
    match c {
        b'>' => Orientation::East,
        b'<' => Orientation::West,
        b'v' => Orientation::South,
        _ => Orientation::North,
    }
}

fn orientation_glyph(o: Orientation) -> char {
    match o {
        Orientation::North => '^',
        Orientation::East => '>',
        Orientation::South => 'v',
        Orientation::West => '<',
    }
}

impl FromStr for Maze {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_maze(s)
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = (self.width as i32, self.height as i32);
        for y in 0..height {
            self.fmt_wall_row(f, y)?;
            writeln!(f)?;
            for x in 0..width {
                let cell = self.cell_at(x, y);
                let floor = match cell.color() {
                    Color::NoColor => ' ',
                    Color::Red => 'R',
                    Color::Yellow => 'Y',
                    Color::Blue => 'B',
                };
                let marker = if self.robot.position == Position::new(x, y) {
                    orientation_glyph(self.robot.orientation)
                } else if cell.flag() && !cell.captured() {
                    'F'
                } else {
                    ' '
                };
                write!(f, "{}{}{}", if cell.west_wall() { '|' } else { ' ' }, floor, marker)?;
            }
            writeln!(f, "|")?;
        }
        // Closing row repeats the first, the maze wraps around
        self.fmt_wall_row(f, 0)
    }
}

impl Maze {
    fn fmt_wall_row(&self, f: &mut fmt::Formatter<'_>, y: i32) -> fmt::Result {
        for x in 0..self.width as i32 {
            let cell = self.cell_at(x, y);
            f.write_str(if cell.corner_wall() { "+" } else { "." })?;
            f.write_str(if cell.north_wall() { "--" } else { "  " })?;
        }
        f.write_str("+")
    }
}
