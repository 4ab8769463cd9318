use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::cells::{Cartesian2DCoordinate, NeighbourSmallVec, Wall};
use crate::errors::*;
use crate::grid::WallGrid;
use crate::units::{Height, Width};
use crate::walls::WallState;


/// Counters from one run of the recursive backtracker.
///
/// For a grid of `n` cells a completed run always has `visits == n`, `carved == n - 1`,
/// `backtracks == n` and `iterations == 2n - 1`.
#[derive(Debug, Default, Eq, PartialEq, Copy, Clone)]
pub struct BacktrackStats {
    pub visits: usize,
    pub carved: usize,
    pub backtracks: usize,
    pub iterations: usize,
}

/// Generate a perfect maze with a single exit on the right hand side of the last column.
///
/// Every cell is reachable from every other cell by exactly one route. The returned grid has the
/// `VISITED` bookkeeping flag stripped from every cell.
///
/// Fails with `InvalidDimensions` if either dimension is zero.
pub fn generate<R: Rng>(width: Width, height: Height, rng: &mut R) -> Result<WallGrid> {
    let mut grid = WallGrid::new(width, height)?;

    let exit = carve_exit(&mut grid, rng);
    let stats = recursive_backtracker(&mut grid, rng);
    grid.clear_visited();

    debug!("Generated {}x{} maze, exit: {:?}, {:?}", width.0, height.0, exit, stats);
    Ok(grid)
}

/// `generate` with a fresh `XorShiftRng`.
///
/// The same seed and dimensions always produce an identical grid. Without a seed the generator is
/// seeded from system entropy.
pub fn generate_seeded(width: Width, height: Height, seed: Option<u64>) -> Result<WallGrid> {
    let mut rng = match seed {
        Some(s) => XorShiftRng::seed_from_u64(s),
        None => XorShiftRng::from_entropy(),
    };
    generate(width, height, &mut rng)
}

/// Open the right hand wall of a random cell in the last column, the maze's only way out.
/// There is no cell beyond that wall so nothing needs mirroring.
pub fn carve_exit<R: Rng>(grid: &mut WallGrid, rng: &mut R) -> Cartesian2DCoordinate {
    let (Width(w), Height(h)) = (grid.width(), grid.height());
    let exit_y = rng.gen_range(0..h);
    let exit = Cartesian2DCoordinate::new((w - 1) as u32, exit_y as u32);

    grid[exit].remove(WallState::RIGHT);
    grid.set_exit(exit);
    trace!("Carved exit at {:?}", exit);
    exit
}

/// Apply the recursive backtracker maze generation algorithm to the grid.
///
/// A random walk from a random cell that carves into unvisited neighbours. When a cell has no unvisited
/// neighbours left the walk backs up to the most recent cell that does. An explicit stack is used
/// rather than recursion so large grids cannot exhaust the call stack.
///
/// Expects a grid where no cell is marked visited. Leaves every cell marked visited.
pub fn recursive_backtracker<R: Rng>(grid: &mut WallGrid, rng: &mut R) -> BacktrackStats {
    let mut stats = BacktrackStats::default();

    let start = grid.random_cell(rng);
    grid[start].insert(WallState::VISITED);
    stats.visits += 1;

    let mut stack = Vec::with_capacity(grid.size());
    stack.push(start);

    while let Some(current) = stack.pop() {
        stats.iterations += 1;

        let neighbours = unvisited_neighbours(current, grid);
        if neighbours.is_empty() {
            stats.backtracks += 1;
            continue;
        }

        // The current cell may still have other unvisited neighbours to come back to.
        stack.push(current);

        let chosen = neighbours[rng.gen_range(0..neighbours.len())];
        carve_passage(grid, current, chosen.coord, chosen.shared_wall);
        stats.carved += 1;

        grid[chosen.coord].insert(WallState::VISITED);
        stats.visits += 1;
        stack.push(chosen.coord);
    }

    stats
}

// Both sides of the shared wall are cleared together.
#[inline]
fn carve_passage(grid: &mut WallGrid, from: Cartesian2DCoordinate, to: Cartesian2DCoordinate, shared_wall: Wall) {
    grid[from].remove(shared_wall.flag());
    grid[to].remove(shared_wall.opposite().flag());
}

/// The neighbours of a cell that have not been visited yet, each with the wall it shares with `coord`.
///
/// Neighbours are only looked for inside the grid, there is no wrap around. The order of the result
/// is not part of the contract.
pub fn unvisited_neighbours(coord: Cartesian2DCoordinate, grid: &WallGrid) -> NeighbourSmallVec {
    grid.neighbours(coord)
        .into_iter()
        .filter(|neighbour| !grid[neighbour.coord].is_visited())
        .collect()
}
