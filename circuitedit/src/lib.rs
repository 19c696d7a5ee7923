//! CircuitEdit - connectivity-preserving structural editing for PCB and
//! schematic net segments
//!
//! Removing wires or anchors from a net segment may cut it into several
//! electrically separate pieces. This library keeps the model consistent:
//! every edit is a reversible command, composite edits commit atomically, and
//! whatever remains of a segment is re-partitioned into new segments.
//!
//! # Quick Start
//!
//! ```no_run
//! use circuitedit::prelude::*;
//!
//! # fn run(mut board: Board, trace: uuid::Uuid) -> EditResult<()> {
//! let mut stack = UndoStack::new();
//! let mut selection = BoardSelection::new();
//! selection.traces.insert(trace);
//!
//! stack.exec_cmd(&mut board, CmdRemoveBoardItems::new(selection))?;
//! stack.undo(&mut board)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Splitter**: partitions anchors and wires into connected components
//! - **Command engine**: reversible commands, atomic groups, undo stack
//! - **Orchestrators**: remove selected board/schematic items, copy and paste
//!   board items through a JSON clipboard payload

pub mod cmd;
pub mod core;
pub mod editor;
pub mod model;
pub mod resolver;
pub mod splitter;
pub mod undo;

// Re-export main types
pub use crate::core::{EditError, EditOptions, EditResult};
pub use editor::{
    BoardClipboardData, BoardClipboardDataBuilder, BoardSelection, CmdPasteBoardItems,
    CmdRemoveBoardItems, CmdRemoveSchematicItems, SchematicSelection,
};
pub use resolver::{AnchorMap, AnchorResolver, PadLookup};
pub use splitter::{BoardNetSegmentSplitter, NetSegmentSplitter, SchematicNetSegmentSplitter};
pub use undo::{CommandHandle, CommandState, UndoCommand, UndoCommandGroup, UndoStack};

/// Everything needed to build and edit a board or schematic.
pub mod prelude {
    pub use crate::core::{EditError, EditOptions, EditResult};
    pub use crate::editor::{
        BoardClipboardData, BoardClipboardDataBuilder, BoardSelection, CmdPasteBoardItems,
        CmdRemoveBoardItems, CmdRemoveSchematicItems, SchematicSelection,
    };
    pub use crate::model::*;
    pub use crate::undo::{CommandHandle, CommandState, UndoCommand, UndoCommandGroup, UndoStack};
}
