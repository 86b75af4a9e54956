// Chip: one slot of the circuit board, an action or a decision with up to two arrows

use crate::error::ParseError;
use crate::types::{Color, Command, Orientation};

/// Chip kinds. Codes at or above 0x10 are decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ChipKind {
    #[default]
    Empty = 0x00,
    Start = 0x01,
    Forward = 0x02,
    TurnLeft = 0x03,
    TurnRight = 0x04,
    PaintRed = 0x05,
    PaintYellow = 0x06,
    PaintBlue = 0x07,
    IsWallAhead = 0x18,
    IsFloorRed = 0x19,
    IsFloorYellow = 0x1A,
    IsFloorBlue = 0x1B,
}

impl ChipKind {
    pub const ALL: [ChipKind; 12] = [
        ChipKind::Empty,
        ChipKind::Start,
        ChipKind::Forward,
        ChipKind::TurnLeft,
        ChipKind::TurnRight,
        ChipKind::PaintRed,
        ChipKind::PaintYellow,
        ChipKind::PaintBlue,
        ChipKind::IsWallAhead,
        ChipKind::IsFloorRed,
        ChipKind::IsFloorYellow,
        ChipKind::IsFloorBlue,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<ChipKind> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }

    pub fn is_decision(self) -> bool {
        self.code() >= 0x10
    }

    /// Two-character code used in board text
    pub fn symbol(self) -> &'static str {
        match self {
            ChipKind::Empty => "..",
            ChipKind::Start => "ST",
            ChipKind::Forward => "MF",
            ChipKind::TurnLeft => "TL",
            ChipKind::TurnRight => "TR",
            ChipKind::PaintRed => "PR",
            ChipKind::PaintYellow => "PY",
            ChipKind::PaintBlue => "PB",
            ChipKind::IsWallAhead => "W?",
            ChipKind::IsFloorRed => "R?",
            ChipKind::IsFloorYellow => "Y?",
            ChipKind::IsFloorBlue => "B?",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<ChipKind> {
        match symbol {
            ".." | "  " => Some(ChipKind::Empty),
            _ => Self::ALL.into_iter().find(|k| k.symbol() == symbol),
        }
    }
}

/// Which arrow slot an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrowKind {
    #[default]
    NoArrow,
    Yes,
    No,
}

/// A board instruction. Action chips only ever carry a yes arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Chip {
    kind: ChipKind,
    arrow_yes: Option<Orientation>,
    arrow_no: Option<Orientation>,
}

const ARROW_PRESENT: u16 = 0x4;

impl Chip {
    pub const EMPTY: Chip = Chip {
        kind: ChipKind::Empty,
        arrow_yes: None,
        arrow_no: None,
    };

    pub fn new(kind: ChipKind) -> Self {
        Chip {
            kind,
            ..Chip::EMPTY
        }
    }

    pub fn kind(&self) -> ChipKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.kind == ChipKind::Empty
    }

    pub fn is_decision(&self) -> bool {
        self.kind.is_decision()
    }

    pub fn arrow_yes(&self) -> Option<Orientation> {
        self.arrow_yes
    }

    pub fn arrow_no(&self) -> Option<Orientation> {
        self.arrow_no
    }

    /// The outgoing edge selected by a test result
    pub fn arrow(&self, test_result: bool) -> Option<Orientation> {
        if test_result {
            self.arrow_yes
        } else {
            self.arrow_no
        }
    }

    /// Changing the kind keeps the arrows, except an arrow-no that an action chip cannot hold
    pub fn with_kind(self, kind: ChipKind) -> Chip {
        Chip {
            kind,
            arrow_no: if kind.is_decision() { self.arrow_no } else { None },
            ..self
        }
    }

    pub fn clear_arrow_yes(self) -> Chip {
        Chip {
            arrow_yes: None,
            ..self
        }
    }

    pub fn clear_arrow_no(self) -> Chip {
        Chip {
            arrow_no: None,
            ..self
        }
    }

    /// Clears whichever arrow currently points along `o`
    pub fn clear_arrow(self, o: Orientation) -> Chip {
        if self.arrow_yes == Some(o) {
            self.clear_arrow_yes()
        } else if self.arrow_no == Some(o) {
            self.clear_arrow_no()
        } else {
            self
        }
    }

    pub fn with_arrow_yes(self, o: Orientation) -> Chip {
        Chip {
            arrow_yes: Some(o),
            ..self.clear_arrow(o)
        }
    }

    pub fn with_arrow_no(self, o: Orientation) -> Chip {
        if !self.is_decision() {
            return self;
        }
        Chip {
            arrow_no: Some(o),
            ..self.clear_arrow(o)
        }
    }

    pub fn with_arrow(self, o: Orientation, arrow: ArrowKind) -> Chip {
        match arrow {
            ArrowKind::Yes => self.with_arrow_yes(o),
            ArrowKind::No => self.with_arrow_no(o),
            ArrowKind::NoArrow => self.clear_arrow(o),
        }
    }

    /// Evaluates the chip against the current sensor values.
    /// Returns the command to issue and the test result that picks the outgoing arrow.
    pub fn command(&self, floor_color: Color, wall_ahead: bool) -> (Command, bool) {
        match self.kind {
            ChipKind::Start => (Command::NoCommand, true),
            ChipKind::Forward => (Command::MoveForward, true),
            ChipKind::TurnLeft => (Command::TurnLeft, true),
            ChipKind::TurnRight => (Command::TurnRight, true),
            ChipKind::PaintRed => (Command::PaintRed, true),
            ChipKind::PaintYellow => (Command::PaintYellow, true),
            ChipKind::PaintBlue => (Command::PaintBlue, true),
            ChipKind::IsWallAhead => (Command::NoCommand, wall_ahead),
            ChipKind::IsFloorRed => (Command::NoCommand, floor_color == Color::Red),
            ChipKind::IsFloorYellow => (Command::NoCommand, floor_color == Color::Yellow),
            ChipKind::IsFloorBlue => (Command::NoCommand, floor_color == Color::Blue),
            ChipKind::Empty => (Command::NoCommand, false),
        }
    }

    /// Packs the chip into 16 bits: kind in bits 0-7, arrow-yes in 8-11, arrow-no in 12-15
    pub fn to_bits(&self) -> u16 {
        let pack = |arrow: Option<Orientation>| match arrow {
            Some(o) => ARROW_PRESENT | o.index() as u16,
            None => 0,
        };
        self.kind.code() as u16 | pack(self.arrow_yes) << 8 | pack(self.arrow_no) << 12
    }

    pub fn from_bits(bits: u16) -> Result<Chip, ParseError> {
        let kind = ChipKind::from_code((bits & 0xff) as u8).ok_or(ParseError::InvalidChipBits(bits))?;
        let unpack = |nibble: u16| {
            (nibble & ARROW_PRESENT != 0).then(|| Orientation::from_index((nibble & 0x3) as u8))
        };
        let mut chip = Chip::new(kind);
        if let Some(o) = unpack((bits >> 8) & 0xf) {
            chip = chip.with_arrow_yes(o);
        }
        if let Some(o) = unpack((bits >> 12) & 0xf) {
            chip = chip.with_arrow_no(o);
        }
        Ok(chip)
    }
}

impl From<ChipKind> for Chip {
    fn from(kind: ChipKind) -> Self {
        Chip::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Orientation::*;

    const ARROW_KINDS: [ArrowKind; 3] = [ArrowKind::NoArrow, ArrowKind::Yes, ArrowKind::No];

    #[test]
    fn test_with_kind() {
        assert_eq!(Chip::EMPTY.with_kind(ChipKind::TurnLeft).kind(), ChipKind::TurnLeft);
        let twice = Chip::EMPTY
            .with_kind(ChipKind::Forward)
            .with_kind(ChipKind::IsFloorBlue);
        assert_eq!(twice.kind(), ChipKind::IsFloorBlue);
        let arrowed = Chip::new(ChipKind::Forward).with_arrow_yes(North);
        assert_eq!(arrowed.kind(), ChipKind::Forward);
    }

    #[test]
    fn test_arrow_yes() {
        assert_eq!(Chip::EMPTY.arrow_yes(), None);
        assert_eq!(Chip::EMPTY.with_arrow_yes(East).arrow_yes(), Some(East));
        assert_eq!(Chip::EMPTY.with_arrow_yes(East).clear_arrow_yes().arrow_yes(), None);
        assert_eq!(
            Chip::EMPTY.with_arrow_yes(South).clear_arrow_no().arrow_yes(),
            Some(South)
        );
        assert_eq!(
            Chip::EMPTY.with_arrow_yes(South).with_arrow_yes(West).arrow_yes(),
            Some(West)
        );
        assert_eq!(
            Chip::EMPTY.with_arrow_yes(North).with_kind(ChipKind::Forward).arrow_yes(),
            Some(North)
        );
    }

    #[test]
    fn test_arrow_no_only_on_decisions() {
        let forward = Chip::new(ChipKind::Forward);
        assert_eq!(forward.with_arrow_no(South), forward);
        assert_eq!(Chip::EMPTY.with_arrow_no(South).arrow_no(), None);

        let test = Chip::new(ChipKind::IsWallAhead).with_arrow_no(South);
        assert_eq!(test.arrow_no(), Some(South));
        assert_eq!(test.arrow_yes(), None);
    }

    #[test]
    fn test_arrows_never_share_a_direction() {
        let chip = Chip::new(ChipKind::IsFloorRed)
            .with_arrow_yes(East)
            .with_arrow_no(East);
        assert_eq!(chip.arrow_yes(), None);
        assert_eq!(chip.arrow_no(), Some(East));

        let chip = chip.with_arrow_yes(East);
        assert_eq!(chip.arrow_yes(), Some(East));
        assert_eq!(chip.arrow_no(), None);
    }

    #[test]
    fn test_clear_arrow_by_direction() {
        let chip = Chip::new(ChipKind::IsWallAhead)
            .with_arrow_yes(North)
            .with_arrow_no(West);
        assert_eq!(chip.clear_arrow(North).arrow_yes(), None);
        assert_eq!(chip.clear_arrow(North).arrow_no(), Some(West));
        assert_eq!(chip.clear_arrow(West).arrow_no(), None);
        assert_eq!(chip.clear_arrow(South), chip);
    }

    #[test]
    fn test_action_chip_drops_arrow_no_on_kind_change() {
        let chip = Chip::new(ChipKind::IsWallAhead)
            .with_arrow_yes(East)
            .with_arrow_no(South)
            .with_kind(ChipKind::Forward);
        assert_eq!(chip.arrow_yes(), Some(East));
        assert_eq!(chip.arrow_no(), None);
    }

    #[test]
    fn test_kind_and_arrows_are_independent() {
        for kind in ChipKind::ALL {
            for o in Orientation::ALL {
                for arrow in ARROW_KINDS {
                    let chip = Chip::new(kind).with_arrow(o, arrow);
                    assert_eq!(chip.kind(), kind, "{:?} {:?} {:?}", kind, o, arrow);

                    let expected_yes = (arrow == ArrowKind::Yes).then_some(o);
                    let expected_no = (arrow == ArrowKind::No && kind.is_decision()).then_some(o);
                    assert_eq!(chip.arrow_yes(), expected_yes);
                    assert_eq!(chip.arrow_no(), expected_no);

                    for other in ChipKind::ALL {
                        let changed = chip.with_kind(other);
                        assert_eq!(changed.kind(), other);
                        assert_eq!(changed.arrow_yes(), expected_yes);
                        if other.is_decision() {
                            assert_eq!(changed.arrow_no(), expected_no);
                        } else {
                            assert_eq!(changed.arrow_no(), None);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_command_and_test_result() {
        let start = Chip::new(ChipKind::Start);
        assert_eq!(start.command(Color::NoColor, false), (Command::NoCommand, true));

        let forward = Chip::new(ChipKind::Forward);
        assert_eq!(forward.command(Color::Red, true), (Command::MoveForward, true));

        let wall = Chip::new(ChipKind::IsWallAhead);
        assert_eq!(wall.command(Color::NoColor, true), (Command::NoCommand, true));
        assert_eq!(wall.command(Color::NoColor, false), (Command::NoCommand, false));

        let yellow = Chip::new(ChipKind::IsFloorYellow);
        assert_eq!(yellow.command(Color::Yellow, false), (Command::NoCommand, true));
        assert_eq!(yellow.command(Color::Blue, false), (Command::NoCommand, false));

        assert_eq!(Chip::EMPTY.command(Color::Red, true), (Command::NoCommand, false));
    }

    #[test]
    fn test_arrow_selection() {
        let chip = Chip::new(ChipKind::IsFloorRed)
            .with_arrow_yes(East)
            .with_arrow_no(South);
        assert_eq!(chip.arrow(true), Some(East));
        assert_eq!(chip.arrow(false), Some(South));
    }

    #[test]
    fn test_bit_packing_layout() {
        let chip = Chip::new(ChipKind::IsWallAhead)
            .with_arrow_yes(East)
            .with_arrow_no(South);
        assert_eq!(chip.to_bits(), 0x18 | 0x5 << 8 | 0x6 << 12);
        assert_eq!(Chip::from_bits(chip.to_bits()), Ok(chip));
        assert_eq!(Chip::EMPTY.to_bits(), 0);
    }

    #[test]
    fn test_from_bits_rejects_unknown_kind() {
        assert_eq!(Chip::from_bits(0x0042), Err(ParseError::InvalidChipBits(0x0042)));
    }

    #[test]
    fn test_from_bits_drops_arrow_no_on_action() {
        let chip = Chip::from_bits(0x02 | 0x4 << 12).unwrap();
        assert_eq!(chip, Chip::new(ChipKind::Forward));
    }

    #[test]
    fn test_symbols() {
        for kind in ChipKind::ALL {
            assert_eq!(ChipKind::from_symbol(kind.symbol()), Some(kind));
        }
        assert_eq!(ChipKind::from_symbol("  "), Some(ChipKind::Empty));
        assert_eq!(ChipKind::from_symbol("XX"), None);
    }
}
