pub use self::{board::*, matrix::*, piece::*, point::*, tile::*};

pub(crate) mod board;
pub(crate) mod matrix;
pub(crate) mod piece;
pub(crate) mod point;
pub(crate) mod tile;
