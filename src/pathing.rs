// Distances for a perfect maze. Every passage is one step from the previous cell and there are no
// weights on the links, so a breadth first flood fill is all the Dijkstra we need.

use std::fmt::{Debug, Display};

use num::traits::{Bounded, CheckedAdd, One, Unsigned, Zero};
use smallvec::SmallVec;

use crate::cells::Cartesian2DCoordinate;
use crate::grid::WallGrid;
use crate::utils;
use crate::utils::FnvHashMap;


// Trait (hack) used purely as a generic type parameter alias because it looks ugly to type this out each time
// Note generic parameter type aliases are not in the language.
pub trait MaxDistance: Zero + One + Bounded + Unsigned + CheckedAdd + Debug + Clone + Copy + Display + Ord {}
impl<T: Zero + One + Bounded + Unsigned + CheckedAdd + Debug + Clone + Copy + Display + Ord> MaxDistance for T {}


#[derive(Debug, Clone)]
pub struct Distances<MaxDistanceT = u32> {
    start_coordinate: Cartesian2DCoordinate,
    distances: FnvHashMap<Cartesian2DCoordinate, MaxDistanceT>,
    max_distance: MaxDistanceT,
}

impl<MaxDistanceT> Distances<MaxDistanceT>
    where MaxDistanceT: MaxDistance
{
    /// Flood fill the passages of the grid from `start_coordinate`.
    /// Returns None if the start coordinate is not on the grid, or if some reachable cell is further away than
    /// `MaxDistanceT` can count.
    pub fn new(grid: &WallGrid, start_coordinate: Cartesian2DCoordinate) -> Option<Distances<MaxDistanceT>> {

        if !grid.is_valid_coordinate(start_coordinate) {
            return None;
        }

        let mut max = Zero::zero();
        let mut distances = utils::fnv_hashmap(grid.size());
        distances.insert(start_coordinate, Zero::zero());

        // The distances map doubles as the visited set, a cell gets its shortest distance the first time it is
        // reached so the frontier never needs to be a set.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {

                let distance_to_cell: MaxDistanceT = distances[cell_coord];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                for link_coordinate in grid.links(*cell_coord).unwrap_or_default().iter() {
                    if !distances.contains_key(link_coordinate) {
                        let distance_to_link = distance_to_cell.checked_add(&One::one())?;
                        distances.insert(*link_coordinate, distance_to_link);
                        new_frontier.push(*link_coordinate);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> Cartesian2DCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> MaxDistanceT {
        self.max_distance
    }

    /// None for cells that cannot be reached from the start and for coordinates off the grid.
    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: Cartesian2DCoordinate) -> Option<MaxDistanceT> {
        self.distances.get(&coord).cloned()
    }

    /// How many cells, the start included, can be reached from the start.
    #[inline]
    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    /// The reachable cells at the maximum distance from the start, in coordinate order.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[Cartesian2DCoordinate; 8]> {
        let furthest_distance = self.max();
        let mut furthest = self.distances
                               .iter()
                               .filter(|&(_, distance)| *distance == furthest_distance)
                               .map(|(coord, _)| *coord)
                               .collect::<SmallVec<[Cartesian2DCoordinate; 8]>>();
        furthest.sort();
        furthest
    }
}

/// The route from the start of `distances_from_start` to `end_point`, both ends included.
/// None if the end point cannot be reached.
pub fn shortest_path<MaxDistanceT>(grid: &WallGrid,
                                   distances_from_start: &Distances<MaxDistanceT>,
                                   end_point: Cartesian2DCoordinate)
                                   -> Option<Vec<Cartesian2DCoordinate>>
    where MaxDistanceT: MaxDistance
{
    distances_from_start.distance_from_start_to(end_point)?;

    let mut path = vec![end_point];
    let start = distances_from_start.start();
    let mut current_coord = end_point;

    while current_coord != start {

        let current_distance_to_start = distances_from_start.distance_from_start_to(current_coord)?;

        // Walk back downhill towards the start
        let closest_to_start = grid.links(current_coord)?
                                   .iter()
                                   .filter_map(|coord| {
                                       distances_from_start.distance_from_start_to(*coord)
                                                           .map(|distance| (*coord, distance))
                                   })
                                   .min_by_key(|&(_, distance)| distance);

        match closest_to_start {
            Some((closer_coord, closer_distance)) if closer_distance < current_distance_to_start => {
                current_coord = closer_coord;
                path.push(current_coord);
            }
            // No linked neighbour is any closer - the distances do not belong to this grid.
            _ => return None,
        }
    }

    path.reverse();
    Some(path)
}

/// The longest route through the maze.
///
/// Works only as long as we are looking at a perfect maze, otherwise you get back some arbitrary path.
pub fn longest_path(grid: &WallGrid) -> Option<Vec<Cartesian2DCoordinate>> {
    let arbitrary_start_point = Cartesian2DCoordinate::new(0, 0);
    let first_distances = Distances::<u32>::new(grid, arbitrary_start_point)?;

    // The start of the longest path is just the point furthest away from an arbitrary initial point
    let long_path_start_coordinate = first_distances.furthest_points_on_grid()[0];

    let distances_from_start = Distances::<u32>::new(grid, long_path_start_coordinate)?;
    let end_point = distances_from_start.furthest_points_on_grid()[0];

    shortest_path(grid, &distances_from_start, end_point)
}

/// The route from `from` to the maze's exit cell, None if the maze has no exit or the exit cannot be reached.
pub fn path_to_exit(grid: &WallGrid, from: Cartesian2DCoordinate) -> Option<Vec<Cartesian2DCoordinate>> {
    let exit = grid.exit()?;
    let distances = Distances::<u32>::new(grid, from)?;
    shortest_path(grid, &distances, exit)
}
