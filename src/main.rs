use docopt::Docopt;
use error_chain::bail;
use itertools::Itertools;
use log::info;
use serde_derive::Deserialize;
use mazegen::{
    cells::Cartesian2DCoordinate,
    generators,
    grid::WallGrid,
    pathing,
    units::{Height, Width},
};
use std::{
    env,
    io,
    io::prelude::*,
    fs::File,
};

const USAGE: &str = "Mazegen

Usage:
    mazegen_driver -h | --help
    mazegen_driver [(--grid-size=<n>|[--grid-width=<w> --grid-height=<h>])] [--seed=<s>] [--save-edges=<path>] [--save-cells=<path>] [(--solve-from-x=<x> --solve-from-y=<y>)] [--longest-path]

Options:
    -h --help              Show this screen.
    --grid-size=<n>        The grid size is n * n.
    --grid-width=<w>       The grid width in a w*h grid [default: 20].
    --grid-height=<h>      The grid height in a w*h grid [default: 20].
    --seed=<s>             Seed for the random number generator. The same seed and grid size always give the same maze.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
    --save-cells=<path>    Serialize the wall bitmask of every cell to a text file, one line per grid row (y), space separated by column (x). Bits: left=1 right=2 up=4 down=8.
    --solve-from-x=<x>     x coordinate of a cell to find the route to the exit from.
    --solve-from-y=<y>     y coordinate of a cell to find the route to the exit from. Both coordinates must be given.
    --longest-path         Report the longest route through the maze.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_grid_size: Option<usize>,
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_seed: Option<u64>,
    flag_save_edges: String,
    flag_save_cells: String,
    flag_solve_from_x: Option<u32>,
    flag_solve_from_y: Option<u32>,
    flag_longest_path: bool,
}

mod errors {
    #![allow(deprecated)]
    // Links the library errors and the driver's own foreign errors.
    // ResultExt adds the `chain_err` trait method.
    use error_chain::*;
    error_chain! {

        links {
            Maze(::mazegen::errors::Error, ::mazegen::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    log_builder(env::var("RUST_LOG").ok().as_deref()).init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let (width, height) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_grid_width, args.flag_grid_height)
    };

    let maze = generators::generate_seeded(Width(width), Height(height), args.flag_seed)?;
    info!("Generated a {}x{} maze with {} passages, exit at {:?}",
          width, height, maze.passages_count(), maze.exit());

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(&maze, &args.flag_save_edges)?;
        info!("Saved maze edges to {}", args.flag_save_edges);
    }

    if !args.flag_save_cells.is_empty() {
        save_maze_cells(&maze, &args.flag_save_cells)?;
        info!("Saved maze cells to {}", args.flag_save_cells);
    }

    if let (Some(x), Some(y)) = (args.flag_solve_from_x, args.flag_solve_from_y) {
        let from = Cartesian2DCoordinate::new(x, y);
        let path = pathing::path_to_exit(&maze, from)
            .ok_or_else(|| format!("No route to the exit from ({}, {})", x, y))?;
        info!("Route to the exit from ({}, {}) is {} cells long", x, y, path.len());
        println!("{}", format_path(&path));
    }

    if args.flag_longest_path {
        if let Some(path) = pathing::longest_path(&maze) {
            info!("Longest route is {} cells long", path.len());
            println!("{}", format_path(&path));
        }
    }

    Ok(())
}

// Info unless RUST_LOG says otherwise, a bare level such as `debug` included.
fn log_builder(env_filters: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Info);
    if let Some(filters) = env_filters {
        builder.parse_filters(filters);
    }
    builder
}

fn format_path(path: &[Cartesian2DCoordinate]) -> String {
    path.iter()
        .map(|coord| format!("({},{})", coord.x, coord.y))
        .join(" ")
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze: &WallGrid, file_path: &str) -> Result<()> {

    let mut graph_data = String::new();
    graph_data.push_str(&format!("{} {}\n", maze.size(), maze.passages_count()));

    for (src, dst) in maze.iter_links() {
        let (index_a, index_b) = match (maze.grid_coordinate_to_index(src),
                                        maze.grid_coordinate_to_index(dst)) {
            (Some(a), Some(b)) => (a, b),
            _ => bail!("Links iter gave a coordinate outside the grid"),
        };
        graph_data.push_str(&format!("{} {}\n", index_a + 1, index_b + 1));
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}

fn save_maze_cells(maze: &WallGrid, file_path: &str) -> Result<()> {

    let cells_data = maze.cell_bits_rows()
                         .iter()
                         .map(|row| row.iter().join(" "))
                         .join("\n");

    write_text_to_file(&cells_data, file_path)
        .chain_err(|| format!("Failed to write maze cells to text file {}", file_path))?;

    Ok(())
}

#[cfg(test)]
mod tests {

    use super::*;

    fn parse_args(argv: &[&str]) -> ::std::result::Result<MazeArgs, docopt::Error> {
        Docopt::new(USAGE).and_then(|d| d.argv(argv.iter().cloned()).deserialize())
    }

    #[test]
    fn solve_from_needs_both_coordinates() {
        assert!(parse_args(&["mazegen_driver", "--solve-from-x=1"]).is_err());
        assert!(parse_args(&["mazegen_driver", "--solve-from-y=1"]).is_err());

        let args = parse_args(&["mazegen_driver", "--solve-from-x=1", "--solve-from-y=2"]).unwrap();
        assert_eq!((args.flag_solve_from_x, args.flag_solve_from_y), (Some(1), Some(2)));

        let args = parse_args(&["mazegen_driver"]).unwrap();
        assert_eq!((args.flag_solve_from_x, args.flag_solve_from_y), (None, None));
        assert_eq!((args.flag_grid_width, args.flag_grid_height), (20, 20));
    }

    #[test]
    fn log_level_defaults_to_info() {
        let logger = log_builder(None).build();
        assert_eq!(logger.filter(), log::LevelFilter::Info);
    }

    #[test]
    fn bare_env_log_level_is_honoured() {
        let logger = log_builder(Some("debug")).build();
        assert_eq!(logger.filter(), log::LevelFilter::Debug);

        let logger = log_builder(Some("warn")).build();
        assert_eq!(logger.filter(), log::LevelFilter::Warn);
    }

    #[test]
    fn module_env_log_level_keeps_info_floor() {
        let logger = log_builder(Some("mazegen=trace")).build();
        assert_eq!(logger.filter(), log::LevelFilter::Trace);
    }
}
