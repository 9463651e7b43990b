//! Vertex data attached to a graph (embedding coordinates).

pub mod coordinates;

pub use coordinates::Coordinates;
