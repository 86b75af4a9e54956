//! Configuration constants for levels and the headless driver.

// Level defaults, used when a level document leaves a key out
pub const DEFAULT_LEVEL_NAME: &str = "untitled";
pub const DEFAULT_BOARD_WIDTH: usize = 9;
pub const DEFAULT_BOARD_HEIGHT: usize = 9;
pub const DEFAULT_CHIP_COST: i32 = 10; // Score per chip placed on the board
pub const DEFAULT_MOVE_COST: i32 = 1; // Score spent per command produced

// Simulation pacing
pub const MAX_TICKS: u32 = 1000; // Ticks before the driver gives up
