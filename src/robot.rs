use crate::types::*;
use crate::utils::lerp_f64;

/// The maze robot. Position and orientation persist between ticks;
/// velocity, rotation and command describe the motion of the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Robot {
    pub position: Position,
    pub orientation: Orientation,
    pub velocity: Velocity,
    pub rotation: Rotation,
    pub command: Command, // Last applied command, decides floor painting
}

impl Robot {
    pub fn new(position: Position, orientation: Orientation) -> Self {
        Robot {
            position,
            orientation,
            ..Default::default()
        }
    }

    /// Sets up the motion for `command` without committing it
    pub fn apply_command(self, command: Command) -> Robot {
        let mut next = Robot {
            velocity: Velocity::default(),
            rotation: Rotation::NoRotation,
            command,
            ..self
        };
        match command {
            Command::TurnLeft => next.rotation = Rotation::Left,
            Command::TurnRight => next.rotation = Rotation::Right,
            Command::MoveForward => next.velocity = self.orientation.velocity_forward(),
            _ => {}
        }
        crate::debug_robot!(
            "Robot at {} facing {}: {} (velocity {:?}, rotation {:?})",
            next.position,
            next.orientation,
            command,
            next.velocity,
            next.rotation
        );
        next
    }

    /// Commits the pending motion. The command is kept so the maze can paint.
    pub fn advance(self) -> Robot {
        Robot {
            position: self.position.move_by(self.velocity),
            orientation: self.orientation.rotate(self.rotation),
            ..self
        }
    }

    /// Drops any pending motion
    pub fn stop(self) -> Robot {
        Robot {
            velocity: Velocity::default(),
            rotation: Rotation::NoRotation,
            command: Command::NoCommand,
            ..self
        }
    }

    pub fn is_moving_forward(&self) -> bool {
        self.velocity == self.orientation.velocity_forward()
    }

    pub fn is_at_rest(&self) -> bool {
        self.velocity == Velocity::default() && self.rotation == Rotation::NoRotation
    }

    pub fn color_painting(&self) -> Option<Color> {
        self.command.paint_color()
    }

    /// Interpolated coordinates `t` of the way through the pending motion
    pub fn coords_at(&self, t: f64) -> (f64, f64) {
        let (x, y) = self.position.coords();
        let (dx, dy) = self.velocity.translation_at(1.0);
        (lerp_f64(x, x + dx, t), lerp_f64(y, y + dy, t))
    }

    /// Interpolated heading in radians `t` of the way through the pending rotation
    pub fn angle_at(&self, t: f64) -> f64 {
        self.orientation.angle() + self.rotation.radians_at(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn robot_at(x: i32, y: i32, o: Orientation) -> Robot {
        Robot::new(Position::new(x, y), o)
    }

    #[test]
    fn test_move_forward() {
        let robot = robot_at(2, 2, Orientation::East).apply_command(Command::MoveForward);
        assert!(robot.is_moving_forward());
        assert_eq!(robot.position, Position::new(2, 2));

        let moved = robot.advance();
        assert_eq!(moved.position, Position::new(3, 2));
        assert_eq!(moved.orientation, Orientation::East);
    }

    #[test]
    fn test_turns() {
        let left = robot_at(0, 0, Orientation::North)
            .apply_command(Command::TurnLeft)
            .advance();
        assert_eq!(left.orientation, Orientation::West);
        assert_eq!(left.position, Position::new(0, 0));

        let right = robot_at(0, 0, Orientation::West)
            .apply_command(Command::TurnRight)
            .advance();
        assert_eq!(right.orientation, Orientation::North);
    }

    #[test]
    fn test_apply_command_overwrites_pending_motion() {
        let robot = robot_at(1, 1, Orientation::South)
            .apply_command(Command::MoveForward)
            .apply_command(Command::TurnLeft);
        assert_eq!(robot.velocity, Velocity::default());
        assert_eq!(robot.rotation, Rotation::Left);
        assert!(!robot.is_moving_forward());

        let idle = robot.apply_command(Command::NoCommand);
        assert!(idle.is_at_rest());
    }

    #[test]
    fn test_paint_commands() {
        let robot = robot_at(0, 0, Orientation::North).apply_command(Command::PaintYellow);
        assert!(robot.is_at_rest());
        assert_eq!(robot.color_painting(), Some(Color::Yellow));
        assert_eq!(robot.advance().color_painting(), Some(Color::Yellow));
        assert_eq!(robot.stop().color_painting(), None);
    }

    #[test]
    fn test_coords_at() {
        let robot = robot_at(2, 3, Orientation::North).apply_command(Command::MoveForward);
        let (x, y) = robot.coords_at(0.0);
        assert_approx_eq!(x, 2.0);
        assert_approx_eq!(y, 3.0);
        let (x, y) = robot.coords_at(0.5);
        assert_approx_eq!(x, 2.0);
        assert_approx_eq!(y, 2.5);
        let (_, y) = robot.coords_at(1.0);
        assert_approx_eq!(y, 2.0);
    }

    #[test]
    fn test_angle_at() {
        let robot = robot_at(0, 0, Orientation::East).apply_command(Command::TurnRight);
        assert_approx_eq!(robot.angle_at(0.0), FRAC_PI_2);
        assert_approx_eq!(robot.angle_at(0.5), FRAC_PI_2 + FRAC_PI_2 / 2.0);
        assert_approx_eq!(robot.angle_at(1.0), PI);
        assert_approx_eq!(robot.advance().angle_at(0.0), PI);
    }
}
