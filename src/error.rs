//! Error types for layout loading.
//!
//! Search itself has no error path: an exhausted frontier is a normal outcome
//! reported through [`crate::solver::Termination::Exhausted`].

use thiserror::Error;

/// Failure while turning text (or a file) into a [`crate::engine::GameState`].
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Failed to read layout file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Layout is empty")]
    Empty,

    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Unrecognized character '{ch}' in row {row} col {col}")]
    UnrecognizedChar { ch: char, row: usize, col: usize },

    #[error("Layout has no actor ('P')")]
    MissingActor,

    #[error("Layout has more than one actor: second 'P' at row {row} col {col}")]
    MultipleActors { row: usize, col: usize },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
