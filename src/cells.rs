use smallvec::SmallVec;

use crate::walls::WallState;

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;
pub type NeighbourSmallVec = SmallVec<[Neighbour; 4]>;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

/// One of the four edges of a square cell.
///
/// `Up` faces increasing `y` and `Down` faces decreasing `y`.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub enum Wall {
    Left,
    Right,
    Up,
    Down,
}

impl Wall {
    pub const ALL: [Wall; 4] = [Wall::Left, Wall::Down, Wall::Up, Wall::Right];

    /// The same wall seen from the cell on the other side of it.
    #[inline]
    pub fn opposite(self) -> Wall {
        match self {
            Wall::Left => Wall::Right,
            Wall::Right => Wall::Left,
            Wall::Up => Wall::Down,
            Wall::Down => Wall::Up,
        }
    }

    #[inline]
    pub fn flag(self) -> WallState {
        match self {
            Wall::Left => WallState::LEFT,
            Wall::Right => WallState::RIGHT,
            Wall::Up => WallState::UP,
            Wall::Down => WallState::DOWN,
        }
    }

    /// Creates a new coordinate offset 1 cell away through this wall.
    /// Returns None if the coordinate is not representable, the grid's upper bounds are not checked.
    pub fn offset_coordinate(self, coord: Cartesian2DCoordinate) -> Option<Cartesian2DCoordinate> {
        let (x, y) = (coord.x, coord.y);
        match self {
            Wall::Left => x.checked_sub(1).map(|left_x| Cartesian2DCoordinate::new(left_x, y)),
            Wall::Right => x.checked_add(1).map(|right_x| Cartesian2DCoordinate::new(right_x, y)),
            Wall::Down => y.checked_sub(1).map(|down_y| Cartesian2DCoordinate::new(x, down_y)),
            Wall::Up => y.checked_add(1).map(|up_y| Cartesian2DCoordinate::new(x, up_y)),
        }
    }
}

/// An adjacent cell and the wall shared with it, from the perspective of the cell asking.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub struct Neighbour {
    pub coord: Cartesian2DCoordinate,
    pub shared_wall: Wall,
}
