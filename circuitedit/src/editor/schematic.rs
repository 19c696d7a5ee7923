//! Remove selected schematic items
//!
//! Net lines attached to a selected junction are removed along with it. A
//! segment losing all of its net lines is removed as a whole, otherwise it is
//! split into its remaining connected pieces and its net labels are handed
//! to the nearest piece.

use std::collections::HashSet;
use uuid::Uuid;

use crate::cmd::{CmdSchematicNetSegmentAdd, CmdSchematicNetSegmentRemove};
use crate::core::{EditError, EditResult};
use crate::model::{AnchorRef, Junction, NetLine, Schematic, SchematicNetSegment};
use crate::resolver::AnchorMap;
use crate::splitter::SchematicNetSegmentSplitter;
use crate::undo::{UndoCommand, UndoCommandGroup};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchematicSelection {
    pub junctions: HashSet<Uuid>,
    pub netlines: HashSet<Uuid>,
    pub netlabels: HashSet<Uuid>,
}

impl SchematicSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.junctions.is_empty() && self.netlines.is_empty() && self.netlabels.is_empty()
    }

    pub fn validate(&self, schematic: &Schematic) -> EditResult<()> {
        let segments = &schematic.net_segments;
        if let Some(uuid) = self
            .junctions
            .iter()
            .find(|&id| !segments.iter().any(|s| s.junction(id).is_some()))
        {
            return Err(EditError::ElementNotFound { kind: "junction", uuid: *uuid });
        }
        if let Some(uuid) = self
            .netlines
            .iter()
            .find(|&id| !segments.iter().any(|s| s.netline(id).is_some()))
        {
            return Err(EditError::ElementNotFound { kind: "net line", uuid: *uuid });
        }
        if let Some(uuid) = self
            .netlabels
            .iter()
            .find(|&id| !segments.iter().any(|s| s.netlabels.iter().any(|l| &l.uuid == id)))
        {
            return Err(EditError::ElementNotFound { kind: "net label", uuid: *uuid });
        }
        Ok(())
    }
}

pub struct CmdRemoveSchematicItems {
    group: UndoCommandGroup<Schematic>,
    selection: SchematicSelection,
}

impl CmdRemoveSchematicItems {
    pub fn new(selection: SchematicSelection) -> Self {
        Self {
            group: UndoCommandGroup::new("Remove Schematic Items"),
            selection,
        }
    }
}

impl UndoCommand<Schematic> for CmdRemoveSchematicItems {
    fn text(&self) -> &str {
        "Remove Schematic Items"
    }

    fn perform_execute(&mut self, schematic: &mut Schematic) -> EditResult<bool> {
        let selection = &self.selection;
        self.group
            .execute_atomically(schematic, |group, schematic| remove_items(group, schematic, selection))
    }

    fn perform_undo(&mut self, schematic: &mut Schematic) -> EditResult<()> {
        self.group.undo_children(schematic)
    }

    fn perform_redo(&mut self, schematic: &mut Schematic) -> EditResult<()> {
        self.group.redo_children(schematic)
    }
}

fn remove_items(
    group: &mut UndoCommandGroup<Schematic>,
    schematic: &mut Schematic,
    selection: &SchematicSelection,
) -> EditResult<()> {
    selection.validate(schematic)?;

    let segments: Vec<SchematicNetSegment> = schematic.net_segments.clone();
    for segment in &segments {
        let junctions: HashSet<Uuid> = segment
            .junctions
            .iter()
            .map(|j| j.uuid)
            .filter(|u| selection.junctions.contains(u))
            .collect();
        let netlines: HashSet<Uuid> = segment
            .netlines
            .iter()
            .filter(|l| {
                selection.netlines.contains(&l.uuid)
                    || [l.start, l.end].iter().any(|a| match a {
                        AnchorRef::Junction(j) => junctions.contains(j),
                        _ => false,
                    })
            })
            .map(|l| l.uuid)
            .collect();
        let netlabels: HashSet<Uuid> = segment
            .netlabels
            .iter()
            .map(|l| l.uuid)
            .filter(|u| selection.netlabels.contains(u))
            .collect();
        if junctions.is_empty() && netlines.is_empty() && netlabels.is_empty() {
            continue;
        }

        if netlines.len() == segment.netlines.len() {
            tracing::debug!("Removing whole schematic net segment {}", segment.uuid);
            group.exec_new_child_cmd(schematic, CmdSchematicNetSegmentRemove::new(segment.uuid))?;
        } else {
            split_up_net_segment(group, schematic, segment, &junctions, &netlines, &netlabels)?;
        }
    }

    tracing::debug!("Removed schematic items with {} command(s)", group.child_count());
    Ok(())
}

fn split_up_net_segment(
    group: &mut UndoCommandGroup<Schematic>,
    schematic: &mut Schematic,
    segment: &SchematicNetSegment,
    junctions: &HashSet<Uuid>,
    netlines: &HashSet<Uuid>,
    netlabels: &HashSet<Uuid>,
) -> EditResult<()> {
    let mut splitter = SchematicNetSegmentSplitter::new();
    for junction in segment.junctions.iter().filter(|j| !junctions.contains(&j.uuid)) {
        splitter.add_junction(*junction);
    }
    for netline in segment.netlines.iter().filter(|l| !netlines.contains(&l.uuid)) {
        let mut positions = Vec::with_capacity(2);
        for anchor in [&netline.start, &netline.end] {
            if let AnchorRef::Pad { device, pad } = anchor {
                if let Some(pin) = schematic.pin_anchor(device, pad) {
                    splitter.add_pin(pin);
                }
            }
            positions.push(
                schematic
                    .anchor_position(segment, anchor)
                    .ok_or(EditError::UnresolvedAnchor(*anchor))?,
            );
        }
        splitter.add_netline(netline.clone(), positions[0], positions[1]);
    }
    for label in segment.netlabels.iter().filter(|l| !netlabels.contains(&l.uuid)) {
        splitter.add_netlabel(label.clone());
    }
    let subsegments = splitter.split();
    tracing::debug!(
        "Splitting schematic net segment {} into {} segment(s)",
        segment.uuid,
        subsegments.len()
    );

    group.exec_new_child_cmd(schematic, CmdSchematicNetSegmentRemove::new(segment.uuid))?;

    for sub in subsegments.iter().filter(|s| s.has_elements()) {
        let mut new_segment = SchematicNetSegment::new(segment.net_signal);
        let mut map = AnchorMap::new();
        for junction in &sub.junctions {
            let copy = Junction::new(junction.position);
            map.insert_junction(junction.uuid, copy.uuid);
            new_segment.junctions.push(copy);
        }
        {
            let resolver = map.resolver(&*schematic);
            for netline in &sub.netlines {
                new_segment.netlines.push(NetLine {
                    start: resolver.resolve_required(&netline.start)?,
                    end: resolver.resolve_required(&netline.end)?,
                    ..netline.clone()
                });
            }
        }
        new_segment.netlabels = sub.netlabels.clone();
        group.exec_new_child_cmd(schematic, CmdSchematicNetSegmentAdd::new(new_segment))?;
    }
    Ok(())
}
