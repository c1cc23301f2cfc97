pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding with the board or its walls")]
pub struct PieceCollisionError;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum RotateError {
    #[display("piece kind cannot be rotated")]
    Unrotatable,
    #[display("rotated piece colliding with the board or its walls")]
    Collision(PieceCollisionError),
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("tiles locked above the top of the board")]
pub struct TopOutError;
