// Create the Error, ErrorKind, ResultExt, and Result types.
// Result is a typedef of std `Result` with the error type our own `Error`.
#![allow(deprecated)]

use error_chain::*;

use crate::cells::Cartesian2DCoordinate;

error_chain! {
    errors {
        InvalidDimensions(width: usize, height: usize) {
            description("invalid grid dimensions")
            display("invalid grid dimensions {}x{}: width and height must be at least 1 \
                     and the cell count must fit in a u32", width, height)
        }
        InvalidGridCoordinate(coord: Cartesian2DCoordinate) {
            description("grid coordinate out of range")
            display("grid coordinate ({}, {}) is outside the grid", coord.x, coord.y)
        }
        NotASingleWall(bits: u8) {
            description("not a single wall flag")
            display("wall state {:#07b} is not exactly one of left, right, up or down", bits)
        }
    }
}
