// Circuit board: the grid of chips plus per-slot activation marks

use crate::program::chip::{ArrowKind, Chip, ChipKind};
use crate::types::{Orientation, Position, Velocity};

/// Activation of one slot during the latest traversal.
/// Doubles as the visited set of the traversal and as render feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activation {
    #[default]
    Idle,
    /// The chip was evaluated; the arrow it left through, if any
    Lit(Option<Orientation>),
}

impl Activation {
    pub fn is_active(self) -> bool {
        matches!(self, Activation::Lit(_))
    }

    pub fn is_arrow_active(self, o: Orientation) -> bool {
        self == Activation::Lit(Some(o))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitBoard {
    width: usize,
    height: usize,
    chips: Vec<Chip>,
    active: Vec<Activation>,
    start_pos: Option<Position>,
}

impl CircuitBoard {
    /// Creates a board of empty chips
    pub fn new(width: usize, height: usize) -> Self {
        CircuitBoard {
            width,
            height,
            chips: vec![Chip::EMPTY; width * height],
            active: vec![Activation::Idle; width * height],
            start_pos: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.contains(x, y)
            .then(|| x as usize + self.width * y as usize)
    }

    /// Slots outside the board read as empty chips
    pub fn chip_at(&self, x: i32, y: i32) -> Chip {
        self.index(x, y)
            .map_or(Chip::EMPTY, |i| self.chips[i])
    }

    pub fn set_chip_at(&mut self, x: i32, y: i32, chip: Chip) {
        match self.index(x, y) {
            Some(i) => {
                if chip.kind() == ChipKind::Start {
                    self.start_pos = Some(Position::new(x, y));
                }
                self.chips[i] = chip;
            }
            None => log::warn!(target: "board", "Ignoring chip placed off the board at ({}, {})", x, y),
        }
    }

    pub fn activation_at(&self, x: i32, y: i32) -> Activation {
        self.index(x, y)
            .map_or(Activation::Idle, |i| self.active[i])
    }

    pub fn is_active(&self, x: i32, y: i32) -> bool {
        self.activation_at(x, y).is_active()
    }

    pub fn is_arrow_active(&self, x: i32, y: i32, o: Orientation) -> bool {
        self.activation_at(x, y).is_arrow_active(o)
    }

    /// Lights the chip at (x, y), along `arrow` when it has one
    pub fn activate_chip(&mut self, x: i32, y: i32, arrow: Option<Orientation>) {
        if let Some(i) = self.index(x, y) {
            self.active[i] = Activation::Lit(arrow);
        }
    }

    pub fn clear_active_chips(&mut self) {
        self.active.fill(Activation::Idle);
    }

    /// The position of the only Start chip, or None if there are zero or several
    pub fn start_pos(&self) -> Option<Position> {
        let mut starts = self
            .chips
            .iter()
            .enumerate()
            .filter(|(_, chip)| chip.kind() == ChipKind::Start)
            .map(|(i, _)| Position::new((i % self.width) as i32, (i / self.width) as i32));
        match (starts.next(), starts.next()) {
            (Some(pos), None) => Some(pos),
            _ => None,
        }
    }

    /// Number of start chips on the board
    pub fn start_count(&self) -> usize {
        self.chips
            .iter()
            .filter(|chip| chip.kind() == ChipKind::Start)
            .count()
    }

    /// Number of non-empty chips placed
    pub fn chip_count(&self) -> usize {
        self.chips.iter().filter(|chip| !chip.is_empty()).count()
    }

    /// Clears the board down to a lone Start chip, kept where the last one was
    pub fn reset(&mut self) {
        let start = self
            .start_pos
            .filter(|p| self.contains(p.x, p.y))
            .unwrap_or_default();
        self.chips.fill(Chip::EMPTY);
        self.clear_active_chips();
        self.set_chip_at(start.x, start.y, Chip::new(ChipKind::Start));
    }

    /// Sets the arrow leaving `from` towards the neighbouring slot `to`.
    /// `ArrowKind::NoArrow` erases, and then also removes any arrow coming back from `to`.
    /// Returns false if the slots are not neighbours on the board.
    pub fn draw_arrow(&mut self, from: Position, to: Position, arrow: ArrowKind) -> bool {
        if !self.contains(from.x, from.y) || !self.contains(to.x, to.y) {
            return false;
        }
        let step = Velocity {
            dx: to.x - from.x,
            dy: to.y - from.y,
        };
        let Some(o) = step.orientation() else {
            return false;
        };
        let chip = self.chip_at(from.x, from.y).with_arrow(o, arrow);
        self.set_chip_at(from.x, from.y, chip);
        if arrow == ArrowKind::NoArrow {
            let back = self.chip_at(to.x, to.y).clear_arrow(o.reverse());
            self.set_chip_at(to.x, to.y, back);
        }
        true
    }

    pub(crate) fn chips(&self) -> &[Chip] {
        &self.chips
    }
}
