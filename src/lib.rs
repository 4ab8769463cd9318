//! **mazegen** generates perfect mazes on rectangular grids with a randomized recursive backtracker.
//!
//! The maze is a grid of per cell wall bitmasks with a single exit on the right hand side of the last
//! column.
//!
//! ```
//! use mazegen::{generators, units::{Height, Width}};
//!
//! let maze = generators::generate_seeded(Width(10), Height(8), Some(7)).unwrap();
//! assert_eq!(maze.passages_count(), 10 * 8 - 1);
//! ```

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod pathing;
pub mod units;
pub mod walls;
mod utils;
