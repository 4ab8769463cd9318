use error_chain::bail;
use rand::Rng;
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::cells::{Cartesian2DCoordinate, CoordinateSmallVec, Neighbour, NeighbourSmallVec, Wall};
use crate::errors::*;
use crate::units::{EdgesCount, Height, NodesCount, Width};
use crate::walls::WallState;


/// A rectangular grid of cell wall states, indexed by `[x][y]`.
///
/// Every cell starts with all four walls present. Passages are opened with `remove_wall`, which keeps
/// the two sides of an interior wall in agreement.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct WallGrid {
    cells: Vec<WallState>,
    width: Width,
    height: Height,
    exit: Option<Cartesian2DCoordinate>,
}

impl fmt::Debug for WallGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "WallGrid :: width: {:?}, height: {:?}, exit: {:?}",
               self.width, self.height, self.exit)
    }
}

impl WallGrid {
    /// Allocate a grid with every wall present.
    ///
    /// Fails with `InvalidDimensions` if either dimension is zero or the cell count does not fit in a `u32`.
    pub fn new(width: Width, height: Height) -> Result<WallGrid> {
        let (Width(w), Height(h)) = (width, height);
        let cells_count = w.checked_mul(h)
                           .filter(|&count| count <= u32::MAX as usize);
        match cells_count {
            Some(count) if w > 0 && h > 0 => {
                Ok(WallGrid {
                    cells: vec![WallState::ALL_WALLS; count],
                    width,
                    height,
                    exit: None,
                })
            }
            _ => bail!(ErrorKind::InvalidDimensions(w, h)),
        }
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Cells count and the number of interior walls between adjacent cells.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let (Width(w), Height(h)) = (self.width, self.height);
        (NodesCount(w * h), EdgesCount((w - 1) * h + w * (h - 1)))
    }

    /// The cell whose boundary wall was opened as the way out, if one has been carved.
    #[inline]
    pub fn exit(&self) -> Option<Cartesian2DCoordinate> {
        self.exit
    }

    #[inline]
    pub(crate) fn set_exit(&mut self, exit: Cartesian2DCoordinate) {
        self.exit = Some(exit);
    }

    /// Is the grid coordinate within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.width.0 && (coord.y as usize) < self.height.0
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Cells are stored column by column, so `[x][y]` lives at `x * height + y`.
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.x as usize * self.height.0 + coord.y as usize)
        } else {
            None
        }
    }

    #[inline]
    fn index_to_grid_coordinate(&self, index: usize) -> Cartesian2DCoordinate {
        let x = index / self.height.0;
        let y = index % self.height.0;
        Cartesian2DCoordinate::new(x as u32, y as u32)
    }

    #[inline]
    pub fn get(&self, coord: Cartesian2DCoordinate) -> Option<WallState> {
        self.grid_coordinate_to_index(coord).map(|index| self.cells[index])
    }

    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Cartesian2DCoordinate {
        let index = rng.gen_range(0..self.size());
        self.index_to_grid_coordinate(index)
    }

    pub fn neighbour_at_wall(&self, coord: Cartesian2DCoordinate, wall: Wall) -> Option<Cartesian2DCoordinate> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        wall.offset_coordinate(coord)
            .filter(|&neighbour_coord| self.is_valid_coordinate(neighbour_coord))
    }

    /// Cells to the left, below, above and right of a cell, whether or not a passage leads there.
    /// Boundary cells have fewer than 4 neighbours.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> NeighbourSmallVec {
        Wall::ALL.iter()
                 .filter_map(|&wall| {
                     self.neighbour_at_wall(coord, wall)
                         .map(|neighbour_coord| Neighbour { coord: neighbour_coord, shared_wall: wall })
                 })
                 .collect()
    }

    /// Open the wall on one edge of a cell.
    ///
    /// An interior wall is cleared on both cells sharing it. A boundary wall has nothing on the
    /// other side so only the one flag is cleared.
    pub fn remove_wall(&mut self, coord: Cartesian2DCoordinate, wall: Wall) -> Result<()> {
        if !self.is_valid_coordinate(coord) {
            bail!(ErrorKind::InvalidGridCoordinate(coord));
        }
        self[coord].remove(wall.flag());
        if let Some(neighbour_coord) = self.neighbour_at_wall(coord, wall) {
            self[neighbour_coord].remove(wall.opposite().flag());
        }
        Ok(())
    }

    /// Is the wall on this edge of the cell absent. False for invalid coordinates.
    #[inline]
    pub fn is_open(&self, coord: Cartesian2DCoordinate, wall: Wall) -> bool {
        self.get(coord).map_or(false, |state| !state.has_wall(wall))
    }

    /// Are two adjacent cells joined by a passage. Both sides of the shared wall must be open.
    pub fn is_linked(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        self.neighbours(a)
            .iter()
            .find(|neighbour| neighbour.coord == b)
            .map_or(false, |neighbour| self.is_passage(a, b, neighbour.shared_wall))
    }

    /// Cells that are linked to a particular cell by a passage.
    /// None if the coordinate is invalid.
    pub fn links(&self, coord: Cartesian2DCoordinate) -> Option<CoordinateSmallVec> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        let linked_cells = self.neighbours(coord)
                               .iter()
                               .filter(|neighbour| self.is_passage(coord, neighbour.coord, neighbour.shared_wall))
                               .map(|neighbour| neighbour.coord)
                               .collect();
        Some(linked_cells)
    }

    #[inline]
    fn is_passage(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate, wall: Wall) -> bool {
        self.is_open(a, wall) && self.is_open(b, wall.opposite())
    }

    /// Every passage between two cells, each reported once.
    pub fn iter_links(&self) -> impl Iterator<Item = (Cartesian2DCoordinate, Cartesian2DCoordinate)> + '_ {
        self.interior_walls()
            .filter(move |&(a, b, wall)| self.is_passage(a, b, wall))
            .map(|(a, b, _)| (a, b))
    }

    /// The number of interior walls that have been removed.
    pub fn passages_count(&self) -> usize {
        self.iter_links().count()
    }

    /// Interior walls where the two cells disagree about whether the wall is present.
    pub fn mismatched_walls(&self) -> Vec<(Cartesian2DCoordinate, Cartesian2DCoordinate)> {
        self.interior_walls()
            .filter(|&(a, b, wall)| self.is_open(a, wall) != self.is_open(b, wall.opposite()))
            .map(|(a, b, _)| (a, b))
            .collect()
    }

    /// Open walls on the outside edge of the grid.
    pub fn boundary_openings(&self) -> Vec<(Cartesian2DCoordinate, Wall)> {
        let mut openings = vec![];
        for coord in self.iter() {
            for &wall in Wall::ALL.iter() {
                if self.neighbour_at_wall(coord, wall).is_none() && self.is_open(coord, wall) {
                    openings.push((coord, wall));
                }
            }
        }
        openings
    }

    // Each interior wall once, from the cell on its left or below it.
    fn interior_walls(&self) -> impl Iterator<Item = (Cartesian2DCoordinate, Cartesian2DCoordinate, Wall)> + '_ {
        self.iter()
            .flat_map(move |coord| {
                [Wall::Right, Wall::Up]
                    .iter()
                    .filter_map(|&wall| self.neighbour_at_wall(coord, wall).map(|other| (coord, other, wall)))
                    .collect::<Vec<_>>()
            })
    }

    /// Strip the generation bookkeeping flag from every cell.
    pub fn clear_visited(&mut self) {
        for state in self.cells.iter_mut() {
            state.remove(WallState::VISITED);
        }
    }

    /// Iterate over every cell coordinate, column by column.
    pub fn iter(&self) -> CellIter {
        CellIter {
            height: self.height.0,
            current_cell_number: 0,
            cells_count: self.size(),
        }
    }

    /// Raw bitmask values one row per `y`, each row ordered by `x`.
    pub fn cell_bits_rows(&self) -> Vec<Vec<u8>> {
        (0..self.height.0)
            .map(|y| {
                (0..self.width.0)
                    .map(|x| self[Cartesian2DCoordinate::new(x as u32, y as u32)].bits())
                    .collect()
            })
            .collect()
    }
}

impl Index<Cartesian2DCoordinate> for WallGrid {
    type Output = WallState;

    /// Panics if the coordinate is outside the grid.
    fn index(&self, coord: Cartesian2DCoordinate) -> &WallState {
        match self.grid_coordinate_to_index(coord) {
            Some(index) => &self.cells[index],
            None => panic!("grid coordinate {:?} out of bounds for {:?}", coord, self),
        }
    }
}

impl IndexMut<Cartesian2DCoordinate> for WallGrid {
    fn index_mut(&mut self, coord: Cartesian2DCoordinate) -> &mut WallState {
        match self.grid_coordinate_to_index(coord) {
            Some(index) => &mut self.cells[index],
            None => panic!("grid coordinate {:?} out of bounds for {:?}", coord, self),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CellIter {
    height: usize,
    current_cell_number: usize,
    cells_count: usize,
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = Cartesian2DCoordinate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let x = self.current_cell_number / self.height;
            let y = self.current_cell_number % self.height;
            self.current_cell_number += 1;
            Some(Cartesian2DCoordinate::new(x as u32, y as u32))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells_count - self.current_cell_number;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::errors::ErrorKind;

    fn grid(w: usize, h: usize) -> WallGrid {
        WallGrid::new(Width(w), Height(h)).expect("valid grid dimensions")
    }

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        for &(w, h) in &[(0, 0), (0, 5), (5, 0)] {
            let err = WallGrid::new(Width(w), Height(h)).unwrap_err();
            match *err.kind() {
                ErrorKind::InvalidDimensions(ew, eh) => assert_eq!((ew, eh), (w, h)),
                ref other => panic!("unexpected error kind {:?}", other),
            }
        }
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let too_wide = u32::MAX as usize + 1;
        assert!(WallGrid::new(Width(too_wide), Height(1)).is_err());
        assert!(WallGrid::new(Width(usize::MAX), Height(2)).is_err());
    }

    #[test]
    fn fresh_grid_has_all_walls() {
        let g = grid(3, 4);
        assert_eq!(g.size(), 12);
        assert_eq!(g.exit(), None);
        for coord in g.iter() {
            assert_eq!(g[coord], WallState::ALL_WALLS);
        }
        assert_eq!(g.passages_count(), 0);
        assert!(g.boundary_openings().is_empty());
    }

    #[test]
    fn graph_size() {
        let g = grid(3, 4);
        assert_eq!(g.graph_size(), (NodesCount(12), EdgesCount(2 * 4 + 3 * 3)));
        assert_eq!(grid(1, 1).graph_size(), (NodesCount(1), EdgesCount(0)));
    }

    #[test]
    fn neighbour_cells() {
        let g = grid(10, 10);

        let check_expected_neighbours = |coord, expected_neighbours: &[Cartesian2DCoordinate]| {
            let neighbour_coords: Vec<Cartesian2DCoordinate> =
                g.neighbours(coord).iter().map(|n| n.coord).sorted().collect();
            let expected: Vec<Cartesian2DCoordinate> =
                expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(neighbour_coords, expected);
        };

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // side element examples
        check_expected_neighbours(gc(1, 0), &[gc(0, 0), gc(1, 1), gc(2, 0)]);
        check_expected_neighbours(gc(0, 1), &[gc(0, 0), gc(0, 2), gc(1, 1)]);
        check_expected_neighbours(gc(9, 8), &[gc(9, 7), gc(9, 9), gc(8, 8)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);

        assert!(g.neighbours(gc(10, 0)).is_empty());
    }

    #[test]
    fn neighbours_carry_shared_wall() {
        let g = grid(3, 3);
        for neighbour in g.neighbours(gc(1, 1)).iter() {
            assert_eq!(neighbour.shared_wall.offset_coordinate(gc(1, 1)), Some(neighbour.coord));
        }
        assert_eq!(g.neighbour_at_wall(gc(1, 1), Wall::Up), Some(gc(1, 2)));
        assert_eq!(g.neighbour_at_wall(gc(1, 1), Wall::Down), Some(gc(1, 0)));
        assert_eq!(g.neighbour_at_wall(gc(2, 1), Wall::Right), None);
        assert_eq!(g.neighbour_at_wall(gc(0, 1), Wall::Left), None);
    }

    #[test]
    fn single_column_and_row_neighbours() {
        let column = grid(1, 3);
        assert_eq!(column.neighbours(gc(0, 1)).len(), 2);
        assert_eq!(column.neighbours(gc(0, 0)).len(), 1);

        let single = grid(1, 1);
        assert!(single.neighbours(gc(0, 0)).is_empty());
    }

    #[test]
    fn grid_coordinate_as_index() {
        let g = grid(3, 2);
        let indices: Vec<Option<usize>> = g.iter()
                                            .map(|coord| g.grid_coordinate_to_index(coord))
                                            .collect();
        let expected = (0..6).map(Some).collect::<Vec<Option<usize>>>();
        assert_eq!(expected, indices);
        assert_eq!(g.grid_coordinate_to_index(gc(1, 0)), Some(2));

        assert_eq!(g.grid_coordinate_to_index(gc(3, 0)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(0, 2)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(u32::MAX, u32::MAX)), None);
    }

    #[test]
    fn cell_iter() {
        let g = grid(2, 2);
        let cells = g.iter();
        assert_eq!(cells.len(), 4);
        assert_eq!(cells.collect::<Vec<Cartesian2DCoordinate>>(),
                   &[gc(0, 0), gc(0, 1), gc(1, 0), gc(1, 1)]);
    }

    #[test]
    fn random_cell() {
        let g = grid(4, 3);
        let mut rng = XorShiftRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(g.is_valid_coordinate(g.random_cell(&mut rng)));
        }
    }

    #[test]
    fn removing_interior_wall_is_mirrored() {
        let mut g = grid(3, 3);
        g.remove_wall(gc(1, 1), Wall::Up).expect("valid coordinate");

        assert!(!g[gc(1, 1)].contains(WallState::UP));
        assert!(!g[gc(1, 2)].contains(WallState::DOWN));
        assert!(g.is_linked(gc(1, 1), gc(1, 2)));
        assert!(g.is_linked(gc(1, 2), gc(1, 1)));
        assert!(g.mismatched_walls().is_empty());
        assert_eq!(g.passages_count(), 1);

        g.remove_wall(gc(1, 1), Wall::Left).expect("valid coordinate");
        assert!(!g[gc(0, 1)].contains(WallState::RIGHT));
        assert_eq!(g.passages_count(), 2);
        assert_eq!(g.links(gc(1, 1)).unwrap().iter().cloned().sorted().collect::<Vec<_>>(),
                   vec![gc(0, 1), gc(1, 2)]);
        assert_eq!(&*g.links(gc(0, 1)).unwrap(), &[gc(1, 1)]);
        assert!(g.links(gc(2, 2)).unwrap().is_empty());
        assert_eq!(g.links(gc(5, 5)), None);
    }

    #[test]
    fn removing_boundary_wall_touches_one_cell() {
        let mut g = grid(2, 2);
        g.remove_wall(gc(1, 0), Wall::Right).expect("valid coordinate");
        assert_eq!(g[gc(1, 0)], WallState::LEFT | WallState::UP | WallState::DOWN);
        assert_eq!(g.passages_count(), 0);
        assert_eq!(g.boundary_openings(), vec![(gc(1, 0), Wall::Right)]);
        assert!(g.mismatched_walls().is_empty());
    }

    #[test]
    fn removing_wall_of_invalid_coordinate_fails() {
        let mut g = grid(2, 2);
        let err = g.remove_wall(gc(2, 0), Wall::Left).unwrap_err();
        match *err.kind() {
            ErrorKind::InvalidGridCoordinate(coord) => assert_eq!(coord, gc(2, 0)),
            ref other => panic!("unexpected error kind {:?}", other),
        }
        assert_eq!(g, grid(2, 2));
    }

    #[test]
    fn one_sided_walls_are_reported() {
        let mut g = grid(2, 2);
        g[gc(0, 0)].remove(WallState::RIGHT);
        assert_eq!(g.mismatched_walls(), vec![(gc(0, 0), gc(1, 0))]);
        assert!(!g.is_linked(gc(0, 0), gc(1, 0)));
        assert_eq!(g.passages_count(), 0);
    }

    #[test]
    fn non_adjacent_cells_are_never_linked() {
        let mut g = grid(3, 3);
        g.remove_wall(gc(0, 0), Wall::Right).unwrap();
        g.remove_wall(gc(1, 0), Wall::Right).unwrap();
        assert!(!g.is_linked(gc(0, 0), gc(2, 0)));
        assert!(!g.is_linked(gc(0, 0), gc(0, 0)));
    }

    #[test]
    fn iter_links_reports_each_passage_once() {
        let mut g = grid(2, 2);
        g.remove_wall(gc(0, 0), Wall::Right).unwrap();
        g.remove_wall(gc(1, 1), Wall::Down).unwrap();
        let links = g.iter_links().sorted().collect::<Vec<_>>();
        assert_eq!(links, vec![(gc(0, 0), gc(1, 0)), (gc(1, 0), gc(1, 1))]);
    }

    #[test]
    fn clear_visited_keeps_walls() {
        let mut g = grid(2, 1);
        g[gc(0, 0)].insert(WallState::VISITED);
        g.remove_wall(gc(0, 0), Wall::Right).unwrap();
        g.clear_visited();
        assert_eq!(g[gc(0, 0)], WallState::LEFT | WallState::UP | WallState::DOWN);
        assert!(g.iter().all(|coord| !g[coord].is_visited()));
    }

    #[test]
    fn cell_bits_rows_are_ordered_by_row() {
        let mut g = grid(2, 2);
        g.remove_wall(gc(0, 1), Wall::Right).unwrap();
        let rows = g.cell_bits_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec![0b1111, 0b1111]);
        assert_eq!(rows[1], vec![0b1101, 0b1110]);
    }

    #[test]
    #[should_panic]
    fn indexing_out_of_bounds_panics() {
        let g = grid(2, 2);
        let _ = g[gc(2, 2)];
    }
}
