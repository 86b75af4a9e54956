// Board traversal: walks chip arrows from the cursor until a chip issues a command

use super::board::CircuitBoard;
use crate::types::{Command, Position, SensorReading};

/// Outcome of one traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trace {
    /// A chip produced a command; the cursor rests on the chip after it, or on it if it has no exit
    Command(Command),
    /// No chip can ever produce a command from here
    DeadEnd,
}

/// Follows arrows from `cursor` using one sensor snapshot.
///
/// Activation marks are cleared first and then set on every chip evaluated, so
/// after the call they show the path taken. They also serve as the visited set:
/// reaching an already lit chip without having produced a command means the
/// program loops forever and is reported as a dead end. A chip without an
/// outgoing arrow ends the program unless it issued a command, in which case the
/// cursor stays on it. An arrow that leads off the board counts as a missing arrow.
pub fn trace(board: &mut CircuitBoard, cursor: &mut Position, sensors: SensorReading) -> Trace {
    board.clear_active_chips();
    loop {
        let chip = board.chip_at(cursor.x, cursor.y);
        let (command, test_result) = chip.command(sensors.floor_color, sensors.wall_ahead);
        let next_dir = chip.arrow(test_result);
        board.activate_chip(cursor.x, cursor.y, next_dir);

        let next = next_dir
            .map(|o| cursor.move_by(o.velocity_forward()))
            .filter(|p| board.contains(p.x, p.y));
        match next {
            Some(next) => *cursor = next,
            // A command chip without an exit stays put and fires again next tick
            None if command != Command::NoCommand => {
                crate::debug_board!("Board stays at {}, command: {}", cursor, command);
                return Trace::Command(command);
            }
            None => {
                crate::debug_board!("Dead end at {} ({:?})", cursor, chip.kind());
                return Trace::DeadEnd;
            }
        }
        crate::debug_board!("Board -> {}, command: {}", cursor, command);

        if command != Command::NoCommand {
            return Trace::Command(command);
        }
        if board.is_active(cursor.x, cursor.y) {
            crate::debug_board!("Loop without command back at {}", cursor);
            return Trace::DeadEnd;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::chip::{Chip, ChipKind};
    use crate::program::parser::parse_board;
    use crate::types::{Color, Orientation};

    fn open_floor() -> SensorReading {
        SensorReading::default()
    }

    fn start_of(board: &CircuitBoard) -> Position {
        board.start_pos().expect("board has a start chip")
    }

    #[test]
    fn test_forward_program() {
        let mut board = parse_board("|ST -> MF|").unwrap();
        let mut cursor = start_of(&board);
        for _ in 0..3 {
            assert_eq!(trace(&mut board, &mut cursor, open_floor()), Trace::Command(Command::MoveForward));
            assert_eq!(cursor, Position::new(1, 0));
        }
        assert!(board.is_active(1, 0));
        assert!(!board.is_active(0, 0), "later traces start on MF");
    }

    #[test]
    fn test_command_chip_loop_repeats() {
        let mut board = parse_board("|ST -> MF|").unwrap();
        board.set_chip_at(1, 0, Chip::new(ChipKind::Forward).with_arrow_yes(Orientation::West));
        let mut cursor = start_of(&board);
        for _ in 0..5 {
            assert_eq!(trace(&mut board, &mut cursor, open_floor()), Trace::Command(Command::MoveForward));
            assert_eq!(cursor, Position::new(0, 0));
            assert!(board.is_arrow_active(0, 0, Orientation::East));
            assert!(board.is_arrow_active(1, 0, Orientation::West));
        }
    }

    #[test]
    fn test_decision_branches_on_sensors() {
        let text = "
|ST -> W? y> TL|
|      nv     v|
|      MF <- ..|";
        let mut board = parse_board(text).unwrap();
        let blocked = SensorReading {
            wall_ahead: true,
            floor_color: Color::NoColor,
        };

        let mut cursor = start_of(&board);
        assert_eq!(trace(&mut board, &mut cursor, blocked), Trace::Command(Command::TurnLeft));
        assert_eq!(cursor, Position::new(2, 1));

        let mut cursor = start_of(&board);
        assert_eq!(trace(&mut board, &mut cursor, open_floor()), Trace::Command(Command::MoveForward));
        assert!(board.is_arrow_active(1, 0, Orientation::South));
        assert!(!board.is_active(2, 0));
    }

    #[test]
    fn test_self_loop_is_dead_end() {
        let mut board = parse_board("|ST -> W?|").unwrap();
        // Yes leads back to the start chip, no is missing
        board.set_chip_at(
            1,
            0,
            Chip::new(ChipKind::IsWallAhead).with_arrow_yes(Orientation::West),
        );
        board.set_chip_at(0, 0, Chip::new(ChipKind::Start).with_arrow_yes(Orientation::East));
        let mut cursor = start_of(&board);
        let walled = SensorReading {
            wall_ahead: true,
            floor_color: Color::NoColor,
        };
        assert_eq!(trace(&mut board, &mut cursor, walled), Trace::DeadEnd);
    }

    #[test]
    fn test_cycle_of_decisions_is_dead_end() {
        let text = "
|ST -> R? y> Y?|
|      n^    nv|
|      B? <n B?|";
        let mut board = parse_board(text).unwrap();
        let mut cursor = start_of(&board);
        let red = SensorReading {
            wall_ahead: false,
            floor_color: Color::Red,
        };
        assert_eq!(trace(&mut board, &mut cursor, red), Trace::DeadEnd);
    }

    #[test]
    fn test_empty_chip_is_dead_end() {
        let mut board = parse_board("|ST -> ..|").unwrap();
        let mut cursor = start_of(&board);
        assert_eq!(trace(&mut board, &mut cursor, open_floor()), Trace::DeadEnd);
        assert!(board.is_active(1, 0));
    }

    #[test]
    fn test_arrow_off_the_board_is_dead_end() {
        let mut board = parse_board("|ST|").unwrap();
        board.set_chip_at(0, 0, Chip::new(ChipKind::Start).with_arrow_yes(Orientation::North));
        let mut cursor = start_of(&board);
        assert_eq!(trace(&mut board, &mut cursor, open_floor()), Trace::DeadEnd);
        assert_eq!(cursor, Position::new(0, 0));
    }

    #[test]
    fn test_activation_cleared_each_trace() {
        let text = "
|ST -> W? y> TL|
|      nv     v|
|      MF <- ..|";
        let mut board = parse_board(text).unwrap();
        let mut cursor = start_of(&board);
        trace(&mut board, &mut cursor, open_floor());
        assert!(board.is_active(1, 1));
        trace(&mut board, &mut cursor, open_floor());
        // Second trace starts on MF, which has no arrow
        assert!(!board.is_active(0, 0));
        assert!(board.is_active(1, 1));
    }
}
