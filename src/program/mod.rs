// Player program: chips, the circuit board, its text format and traversal

pub mod board;
pub mod chip;
pub mod executor;
pub mod parser;

pub use board::{Activation, CircuitBoard};
pub use chip::{ArrowKind, Chip, ChipKind};
pub use executor::{Trace, trace};
pub use parser::parse_board;
