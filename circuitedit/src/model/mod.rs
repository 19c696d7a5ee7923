//! Connectivity graph model for boards and schematics.

pub mod anchor;
pub mod board;
pub mod circuit;
pub mod geometry;
pub mod schematic;

pub use anchor::*;
pub use board::*;
pub use circuit::*;
pub use geometry::Point;
pub use schematic::*;
