//! Elementary reversible commands on boards and schematics.

pub mod board;
pub mod items;

pub use board::{CmdFootprintStrokeTextRemove, CmdNetSegmentAddElements, CmdRemoveUnusedLibraryElements};
pub use items::*;
