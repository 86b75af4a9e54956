//! Robot maze puzzle core: players wire chips on a circuit board, and the board
//! steers a robot around a toroidal maze to capture every flag.

pub mod assets;
pub mod config;
pub mod controller;
pub mod error;
pub mod level;
pub mod logging;
pub mod maze;
pub mod program;
pub mod robot;
pub mod types;
pub mod utils;

pub use controller::{LevelController, PlayStatus};
pub use error::{ErrorReport, LevelError, ParseError, StructuralError};
pub use level::Level;
pub use maze::{Cell, Maze};
pub use program::{Chip, ChipKind, CircuitBoard};
pub use robot::Robot;
