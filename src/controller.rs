use crate::error::StructuralError;
use crate::level::Level;
use crate::maze::Maze;
use crate::program::{trace, CircuitBoard, Trace};
use crate::robot::Robot;
use crate::types::{Command, Position};
use log::info;

/// Where a play session stands after the latest tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayStatus {
    Won,
    /// The program hit a dead end and the robot has nothing left to do
    Halted,
    Running,
}

/// Runs the player's board against a working copy of a level's maze, one tick at a time.
///
/// The board is borrowed for the whole session so its activation marks can be shown
/// while the level plays. Rewinding means dropping the controller and building a new one.
#[derive(Debug)]
pub struct LevelController<'a> {
    board: &'a mut CircuitBoard,
    maze: Maze,
    cursor: Position,
    score: i32,
    dead_end: bool,
    move_cost: i32,
    ticks: u32,
}

impl<'a> LevelController<'a> {
    pub fn new(level: &Level, board: &'a mut CircuitBoard) -> Result<Self, StructuralError> {
        let cursor = match board.start_count() {
            0 => return Err(StructuralError::MissingStart),
            1 => board.start_pos().ok_or(StructuralError::MissingStart)?,
            _ => return Err(StructuralError::MultipleStarts),
        };
        let chips = i32::try_from(board.chip_count()).unwrap_or(i32::MAX);
        // Level text sets the costs, so the score saturates instead of overflowing
        let score = level.chip_cost.saturating_mul(chips);
        info!(target: "level", "Starting {:?} with {} chips, score {}", level.name, board.chip_count(), score);
        board.clear_active_chips();
        Ok(LevelController {
            board,
            maze: level.maze.clone(),
            cursor,
            score,
            dead_end: false,
            move_cost: level.move_cost,
            ticks: 0,
        })
    }

    /// Runs the board from the cursor against the robot's current sensors.
    /// Once a dead end is found every later call returns `NoCommand`.
    pub fn next_command(&mut self) -> Command {
        if self.dead_end {
            crate::debug_level!("Tick {}: dead end, no command", self.ticks);
            return Command::NoCommand;
        }
        let sensors = self.maze.sensors();
        let robot = self.maze.robot();
        crate::debug_level!(
            "Tick {}: robot at {}, facing {}, floor color {}, wall ahead {}",
            self.ticks,
            robot.position,
            robot.orientation,
            sensors.floor_color,
            sensors.wall_ahead
        );
        match trace(self.board, &mut self.cursor, sensors) {
            Trace::Command(command) => {
                self.score = self.score.saturating_sub(self.move_cost);
                command
            }
            Trace::DeadEnd => {
                info!(target: "level", "Tick {}: dead end at board slot {}", self.ticks, self.cursor);
                self.dead_end = true;
                Command::NoCommand
            }
        }
    }

    /// One simulation step: commit the last motion, then either finish or pick the next command
    pub fn advance(&mut self) {
        self.maze.advance_robot();
        if self.game_won() {
            // The robot is still moving only on the tick the last flag fell
            if !self.maze.robot().is_at_rest() {
                info!(target: "level", "Tick {}: level cleared, score {}", self.ticks, self.score);
            }
            self.board.clear_active_chips();
            self.maze.stop_robot();
            self.ticks += 1;
            return;
        }
        let command = self.next_command();
        if self.maze.command_robot(command) {
            crate::debug_level!("Tick {}: robot crashed into a wall", self.ticks);
        }
        self.ticks += 1;
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn board(&self) -> &CircuitBoard {
        self.board
    }

    pub fn robot(&self) -> &Robot {
        self.maze.robot()
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn game_won(&self) -> bool {
        self.maze.flags_remaining() == 0
    }

    pub fn is_dead_end(&self) -> bool {
        self.dead_end
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn status(&self) -> PlayStatus {
        if self.game_won() {
            PlayStatus::Won
        } else if self.dead_end && self.robot().is_at_rest() {
            PlayStatus::Halted
        } else {
            PlayStatus::Running
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::{parse_board, Chip, ChipKind};
    use crate::types::Orientation;

    const CORRIDOR: &str = "
+--+--+--+
| >     F|
+--+--+--+";

    fn level(maze: &str) -> Level {
        Level::parse("test", maze).expect("test level parses")
    }

    #[test]
    fn test_new_requires_one_start() {
        let level = level(CORRIDOR);
        let mut empty = CircuitBoard::new(2, 2);
        assert_eq!(
            LevelController::new(&level, &mut empty).unwrap_err(),
            StructuralError::MissingStart
        );

        let mut twice = parse_board("|ST -> MF|").unwrap();
        twice.set_chip_at(1, 0, Chip::new(ChipKind::Start));
        assert_eq!(
            LevelController::new(&level, &mut twice).unwrap_err(),
            StructuralError::MultipleStarts
        );
    }

    #[test]
    fn test_next_command_is_deterministic() {
        let level = level(CORRIDOR);
        let mut board = parse_board("|ST -> MF|").unwrap();
        let mut controller = LevelController::new(&level, &mut board).unwrap();
        assert_eq!(controller.score(), 20);
        for i in 1..=4 {
            assert_eq!(controller.next_command(), Command::MoveForward);
            assert_eq!(controller.cursor(), Position::new(1, 0));
            assert_eq!(controller.score(), 20 - i);
        }
        assert!(controller.board().is_active(1, 0));
    }

    #[test]
    fn test_huge_costs_saturate() {
        let pricey_chips = level(&format!("ChipCost: 2000000000\nMaze:{}", CORRIDOR));
        let mut board = parse_board("|ST -> MF|").unwrap();
        let mut controller = LevelController::new(&pricey_chips, &mut board).unwrap();
        assert_eq!(controller.score(), i32::MAX);
        controller.next_command();
        assert_eq!(controller.score(), i32::MAX - 1);

        let pricey_moves = level(&format!("MoveCost: 2147483647\nMaze:{}", CORRIDOR));
        let mut board = parse_board("|ST -> MF|").unwrap();
        let mut controller = LevelController::new(&pricey_moves, &mut board).unwrap();
        assert_eq!(controller.next_command(), Command::MoveForward);
        assert_eq!(controller.score(), 20 - i32::MAX);
        assert_eq!(controller.next_command(), Command::MoveForward);
        assert_eq!(controller.score(), i32::MIN);
    }

    #[test]
    fn test_plays_to_win() {
        let level = level(CORRIDOR);
        let mut board = parse_board("|ST -> MF|").unwrap();
        let mut controller = LevelController::new(&level, &mut board).unwrap();

        controller.advance();
        assert_eq!(controller.status(), PlayStatus::Running);
        controller.advance();
        assert_eq!(controller.robot().position, Position::new(1, 0));
        controller.advance();
        assert_eq!(controller.robot().position, Position::new(2, 0));
        assert!(controller.game_won());
        assert_eq!(controller.status(), PlayStatus::Won);
        assert_eq!(controller.ticks(), 3);
        assert_eq!(controller.score(), 18);
        assert!(controller.robot().is_at_rest());
        assert!(!controller.board().is_active(1, 0));

        // Further ticks change nothing
        controller.advance();
        assert_eq!(controller.robot().position, Position::new(2, 0));
        assert_eq!(controller.score(), 18);

        // The canonical maze is untouched
        assert_eq!(level.maze.flags_remaining(), 1);
    }

    #[test]
    fn test_dead_end_latches() {
        let level = level(CORRIDOR);
        let mut board = parse_board("|ST -> ..|").unwrap();
        let mut controller = LevelController::new(&level, &mut board).unwrap();
        assert_eq!(controller.score(), 10);

        controller.advance();
        assert!(controller.is_dead_end());
        assert_eq!(controller.status(), PlayStatus::Halted);
        for _ in 0..3 {
            assert_eq!(controller.next_command(), Command::NoCommand);
            assert!(controller.is_dead_end());
        }
        assert_eq!(controller.score(), 10);
        assert_eq!(controller.robot().position, Position::new(0, 0));
    }

    #[test]
    fn test_crash_keeps_robot_in_place() {
        let level = level("+--+--+\n| >| F|\n+--+--+");
        let mut board = parse_board("|ST -> MF|").unwrap();
        let mut controller = LevelController::new(&level, &mut board).unwrap();
        for _ in 0..5 {
            controller.advance();
        }
        assert_eq!(controller.robot().position, Position::new(0, 0));
        assert_eq!(controller.status(), PlayStatus::Running);
        assert_eq!(controller.score(), 20 - 5);
    }

    #[test]
    fn test_sensors_drive_decisions() {
        // Turn right when blocked, otherwise move
        let text = "
|ST -> W? y> TR|
|      nv     v|
|      MF <- ..|";
        let level = level("+--+--+\n| >  F|\n+--+--+");
        let mut board = parse_board(text).unwrap();
        let mut controller = LevelController::new(&level, &mut board).unwrap();
        assert_eq!(controller.next_command(), Command::MoveForward);
        assert!(controller.board().is_arrow_active(1, 0, Orientation::South));
        assert_eq!(controller.cursor(), Position::new(1, 1));
    }
}
