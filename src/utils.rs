use crate::engine::{GameState, ItemGrid, Layout};
use crate::error::{LayoutError, Result};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Parses an array of string slices into a `GameState`.
///
/// Each string slice in the input array represents a row of the grid, starting from row 0.
/// All rows must have the same number of characters.
///
/// Valid characters are:
/// - '%' or '#': a wall
/// - '.' or ' ': empty floor
/// - 'F': floor holding an item
/// - 'P': the actor's starting cell (exactly one)
///
/// # Arguments
/// * `s`: A slice of string slices (`&[&str]`) representing the rows of the grid.
///
/// # Returns
/// * `Ok(GameState)` if parsing is successful.
/// * `Err(LayoutError)` if:
///     - `s` is empty or its first row is empty.
///     - A row's length differs from the first row's.
///     - An unrecognized character is encountered.
///     - There is no 'P', or more than one.
///
/// # Examples
/// ```
/// use grid_planner::utils::state_from_str_array;
///
/// let state = state_from_str_array(&[
///     "%%%%%",
///     "%P.F%",
///     "%%%%%",
/// ]).unwrap();
/// assert_eq!(state.position(), (1, 1));
/// assert_eq!(state.item_count(), 1);
/// assert!(state.layout().is_wall((0, 0)));
///
/// assert!(state_from_str_array(&["P.X"]).is_err());
/// assert!(state_from_str_array(&["P..", "."]).is_err());
/// ```
pub fn state_from_str_array(s: &[&str]) -> Result<GameState> {
    let cols = s.first().map_or(0, |row| row.chars().count());
    if cols == 0 {
        return Err(LayoutError::Empty);
    }
    let rows = s.len();

    let mut layout = Layout::new(rows, cols);
    let mut items = ItemGrid::new(rows, cols);
    let mut actor = None;

    for (r, row_str) in s.iter().enumerate() {
        let found = row_str.chars().count();
        if found != cols {
            return Err(LayoutError::RaggedRow {
                row: r,
                expected: cols,
                found,
            });
        }

        for (c, ch) in row_str.chars().enumerate() {
            match ch {
                '%' | '#' => layout.set_wall((r, c), true),
                '.' | ' ' => {}
                'F' => items.set((r, c), true),
                'P' => {
                    if actor.is_some() {
                        return Err(LayoutError::MultipleActors { row: r, col: c });
                    }
                    actor = Some((r, c));
                }
                _ => return Err(LayoutError::UnrecognizedChar { ch, row: r, col: c }),
            }
        }
    }

    let position = actor.ok_or(LayoutError::MissingActor)?;
    Ok(GameState::new(Arc::new(layout), position, items))
}

/// Reads a layout file and parses it with [`state_from_str_array`].
///
/// Trailing whitespace is trimmed from every line and blank lines are skipped,
/// so a file may end with a newline or be indented with trailing spaces.
pub fn read_layout_file(path: impl AsRef<Path>) -> Result<GameState> {
    let content = fs::read_to_string(path)?;
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect();
    state_from_str_array(&lines)
}

/// Installs the global `tracing` subscriber used by the binaries.
///
/// The filter comes from `RUST_LOG` when set, `grid_planner=info,warn` otherwise.
/// Calling it twice is harmless; the second call keeps the first subscriber.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("grid_planner=info,warn"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("Global subscriber already set");
    }
}
