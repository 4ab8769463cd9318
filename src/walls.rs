use bitflags::bitflags;
use std::convert::TryFrom;

use crate::cells::Wall;
use crate::errors::{Error, ErrorKind};

bitflags! {
    /// Per cell wall state. A set structural flag means the wall on that edge is present.
    ///
    /// `VISITED` is generation bookkeeping only and says nothing about the shape of the maze.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WallState: u8 {
        const LEFT    = 0b0_0001;
        const RIGHT   = 0b0_0010;
        const UP      = 0b0_0100;
        const DOWN    = 0b0_1000;
        const VISITED = 0b1_0000;

        const ALL_WALLS = Self::LEFT.bits() | Self::RIGHT.bits() | Self::UP.bits() | Self::DOWN.bits();
    }
}

impl WallState {
    /// The wall flags only, without the generation bookkeeping.
    #[inline]
    pub fn structural(self) -> WallState {
        self & WallState::ALL_WALLS
    }

    #[inline]
    pub fn is_visited(self) -> bool {
        self.contains(WallState::VISITED)
    }

    #[inline]
    pub fn has_wall(self, wall: Wall) -> bool {
        self.contains(wall.flag())
    }

    /// The mirrored flag for a single wall flag: left <-> right and up <-> down.
    ///
    /// Returns None for anything that is not exactly one of the four walls, e.g. `VISITED` or a
    /// combination of walls.
    pub fn opposite(self) -> Option<WallState> {
        Wall::try_from(self).ok().map(|wall| wall.opposite().flag())
    }
}

impl TryFrom<WallState> for Wall {
    type Error = Error;

    fn try_from(state: WallState) -> Result<Wall, Error> {
        Wall::ALL.iter()
                 .cloned()
                 .find(|wall| wall.flag() == state)
                 .ok_or_else(|| ErrorKind::NotASingleWall(state.bits()).into())
    }
}
