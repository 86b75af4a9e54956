// Level loading errors: syntax errors, shape errors, and the collected report

use thiserror::Error;

/// Syntax errors in level, maze or board text
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ParseError {
    #[error("line {line} should start and end with a '|'")]
    MissingFrame { line: usize },
    #[error("wrong char line {line} col {col}: one of [{allowed}] allowed")]
    WrongChar {
        line: usize,
        col: usize,
        allowed: &'static str,
    },
    #[error("invalid chip code at line {line}, column {col}: {code:?}")]
    InvalidChipCode { line: usize, col: usize, code: String },
    #[error("invalid arrow code at line {line}, column {col}: {code:?}")]
    InvalidArrowCode { line: usize, col: usize, code: String },
    #[error("invalid chip bits {0:#06x}")]
    InvalidChipBits(u16),
    #[error("{key}: invalid integer {value:?}")]
    InvalidInteger { key: String, value: String },
}

/// Shape errors: wrong line counts, missing or duplicated unique pieces
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum StructuralError {
    #[error("need odd number of lines")]
    EvenLineCount,
    #[error("need at least 1 row")]
    NoRows,
    #[error("wrong length for line {line}")]
    WrongLineLength { line: usize },
    #[error("start chip missing")]
    MissingStart,
    #[error("only one start chip allowed: found second at line {line}, column {col}")]
    SecondStart { line: usize, col: usize },
    #[error("board has more than one start chip")]
    MultipleStarts,
    #[error("robot missing")]
    MissingRobot,
    #[error("only one robot allowed (second defined line {line}, col {col})")]
    SecondRobot { line: usize, col: usize },
    #[error("maze definition is missing")]
    MissingMaze,
}

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum LevelError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Structural(#[from] StructuralError),
}

/// All problems found in one document, reported together
#[derive(Error, Debug, Default, Clone, PartialEq, Eq)]
#[error("{}", join_lines(.errors))]
pub struct ErrorReport {
    errors: Vec<LevelError>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: impl Into<LevelError>) {
        self.errors.push(error.into());
    }

    pub fn extend(&mut self, other: ErrorReport) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[LevelError] {
        &self.errors
    }

    pub fn contains(&self, error: &LevelError) -> bool {
        self.errors.contains(error)
    }

    /// Returns `value` if nothing was reported, otherwise the report itself
    pub fn into_result<T>(self, value: T) -> Result<T, ErrorReport> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<LevelError> for ErrorReport {
    fn from(error: LevelError) -> Self {
        ErrorReport {
            errors: vec![error],
        }
    }
}

impl From<ParseError> for ErrorReport {
    fn from(error: ParseError) -> Self {
        LevelError::from(error).into()
    }
}

impl From<StructuralError> for ErrorReport {
    fn from(error: StructuralError) -> Self {
        LevelError::from(error).into()
    }
}

fn join_lines(errors: &[LevelError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
