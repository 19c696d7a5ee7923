//! Edit orchestrators
//!
//! High-level edits built from a selection or a clipboard payload. Each
//! orchestrator is itself an [`UndoCommand`](crate::undo::UndoCommand)
//! wrapping an [`UndoCommandGroup`](crate::undo::UndoCommandGroup), so the
//! whole edit is committed or rolled back as one.

pub mod clipboard;
pub mod paste;
pub mod remove;
pub mod schematic;

pub use clipboard::{
    BoardClipboardData, BoardClipboardDataBuilder, ClipboardDevice, ClipboardNetSegment,
    ClipboardPlane,
};
pub use paste::CmdPasteBoardItems;
pub use remove::CmdRemoveBoardItems;
pub use schematic::{CmdRemoveSchematicItems, SchematicSelection};

use std::collections::HashSet;
use uuid::Uuid;

use crate::core::{EditError, EditResult};
use crate::model::Board;

/// Ids of selected board elements. Devices are identified by their
/// component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardSelection {
    pub devices: HashSet<Uuid>,
    pub junctions: HashSet<Uuid>,
    pub vias: HashSet<Uuid>,
    pub traces: HashSet<Uuid>,
    pub planes: HashSet<Uuid>,
    pub polygons: HashSet<Uuid>,
    pub stroke_texts: HashSet<Uuid>,
    pub holes: HashSet<Uuid>,
}

impl BoardSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
            && self.junctions.is_empty()
            && self.vias.is_empty()
            && self.traces.is_empty()
            && self.planes.is_empty()
            && self.polygons.is_empty()
            && self.stroke_texts.is_empty()
            && self.holes.is_empty()
    }

    /// Every selected id must name an element of `board`.
    pub fn validate(&self, board: &Board) -> EditResult<()> {
        fn check(kind: &'static str, ids: &HashSet<Uuid>, exists: impl Fn(&Uuid) -> bool) -> EditResult<()> {
            match ids.iter().find(|&id| !exists(id)) {
                Some(uuid) => Err(EditError::ElementNotFound { kind, uuid: *uuid }),
                None => Ok(()),
            }
        }

        check("device", &self.devices, |id| board.device(id).is_some())?;
        check("junction", &self.junctions, |id| board.segment_of_junction(id).is_some())?;
        check("via", &self.vias, |id| board.segment_of_via(id).is_some())?;
        check("trace", &self.traces, |id| board.segment_of_trace(id).is_some())?;
        check("plane", &self.planes, |id| board.planes.iter().any(|p| &p.uuid == id))?;
        check("polygon", &self.polygons, |id| board.polygons.iter().any(|p| &p.uuid == id))?;
        check("stroke text", &self.stroke_texts, |id| {
            board.stroke_texts.iter().any(|t| &t.uuid == id) || board.device_of_stroke_text(id).is_some()
        })?;
        check("hole", &self.holes, |id| board.holes.iter().any(|h| &h.uuid == id))
    }
}
