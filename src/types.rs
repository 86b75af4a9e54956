// Shared value types: headings, motion, floor colors and robot commands

use std::f64::consts::FRAC_PI_2;
use std::fmt;

/// Heading of the robot or direction of a chip arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::North,
        Orientation::East,
        Orientation::South,
        Orientation::West,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Only the two low bits are used
    pub fn from_index(index: u8) -> Orientation {
        Self::ALL[(index & 0x3) as usize]
    }

    pub fn rotate(self, rotation: Rotation) -> Orientation {
        let turned = (self.index() as i32 + rotation.steps()).rem_euclid(4);
        Orientation::from_index(turned as u8)
    }

    pub fn reverse(self) -> Orientation {
        Orientation::from_index(self.index() + 2)
    }

    pub fn velocity_forward(self) -> Velocity {
        match self {
            Orientation::North => Velocity { dx: 0, dy: -1 },
            Orientation::East => Velocity { dx: 1, dy: 0 },
            Orientation::South => Velocity { dx: 0, dy: 1 },
            Orientation::West => Velocity { dx: -1, dy: 0 },
        }
    }

    /// Angle in radians, North is 0 and it grows clockwise
    pub fn angle(self) -> f64 {
        self.index() as f64 * FRAC_PI_2
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Orientation::North => "north",
            Orientation::East => "east",
            Orientation::South => "south",
            Orientation::West => "west",
        };
        f.write_str(name)
    }
}

/// Quarter turn in progress for the current tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    Left,
    Right,
    #[default]
    NoRotation,
}

impl Rotation {
    pub fn steps(self) -> i32 {
        match self {
            Rotation::Left => -1,
            Rotation::Right => 1,
            Rotation::NoRotation => 0,
        }
    }

    pub fn radians_at(self, t: f64) -> f64 {
        self.steps() as f64 * FRAC_PI_2 * t
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn move_by(self, v: Velocity) -> Position {
        Position {
            x: self.x + v.dx,
            y: self.y + v.dy,
        }
    }

    pub fn coords(self) -> (f64, f64) {
        (self.x as f64, self.y as f64)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Velocity {
    pub dx: i32,
    pub dy: i32,
}

impl Velocity {
    pub fn translation_at(self, t: f64) -> (f64, f64) {
        (self.dx as f64 * t, self.dy as f64 * t)
    }

    /// The heading of a unit step between neighbouring slots, if it is one
    pub fn orientation(self) -> Option<Orientation> {
        Orientation::ALL
            .into_iter()
            .find(|o| o.velocity_forward() == self)
    }
}

/// Floor color, stored in two bits of a maze cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    NoColor,
    Red,
    Yellow,
    Blue,
}

impl Color {
    pub fn from_bits(bits: u8) -> Color {
        match bits & 0x3 {
            1 => Color::Red,
            2 => Color::Yellow,
            3 => Color::Blue,
            _ => Color::NoColor,
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::NoColor => "no color",
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// One robot instruction, produced by the board once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Command {
    #[default]
    NoCommand,
    TurnLeft,
    TurnRight,
    MoveForward,
    PaintRed,
    PaintYellow,
    PaintBlue,
}

impl Command {
    pub fn paint_color(self) -> Option<Color> {
        match self {
            Command::PaintRed => Some(Color::Red),
            Command::PaintYellow => Some(Color::Yellow),
            Command::PaintBlue => Some(Color::Blue),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::NoCommand => "no command",
            Command::TurnLeft => "turn left",
            Command::TurnRight => "turn right",
            Command::MoveForward => "move forward",
            Command::PaintRed => "paint floor red",
            Command::PaintYellow => "paint floor yellow",
            Command::PaintBlue => "paint floor blue",
        };
        f.write_str(name)
    }
}

/// What the robot senses from where it stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorReading {
    pub wall_ahead: bool,
    pub floor_color: Color,
}
