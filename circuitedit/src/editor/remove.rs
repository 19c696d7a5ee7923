//! Remove selected board items
//!
//! Order of the child commands:
//! 1. net segment elements (whole segments, or splitting what remains),
//! 2. devices,
//! 3. planes, polygons, stroke texts, holes,
//! 4. library elements nothing uses anymore.
//!
//! Traces attached to pads of removed devices and traces attached to
//! selected junctions are removed along with them. Traces attached to a
//! removed via are kept; the splitter puts a junction in the via's place.

use std::collections::HashSet;
use uuid::Uuid;

use crate::cmd::{
    CmdDeviceInstanceRemove, CmdFootprintStrokeTextRemove, CmdHoleRemove, CmdNetSegmentAdd,
    CmdNetSegmentAddElements, CmdNetSegmentRemove, CmdPlaneRemove, CmdPolygonRemove,
    CmdRemoveUnusedLibraryElements, CmdStrokeTextRemove,
};
use crate::core::{EditError, EditOptions, EditResult};
use crate::model::{AnchorRef, Board, Junction, NetSegment, Trace};
use crate::resolver::AnchorMap;
use crate::splitter::BoardNetSegmentSplitter;
use crate::undo::{UndoCommand, UndoCommandGroup};

use super::BoardSelection;

pub struct CmdRemoveBoardItems {
    group: UndoCommandGroup<Board>,
    selection: BoardSelection,
    options: EditOptions,
}

impl CmdRemoveBoardItems {
    pub fn new(selection: BoardSelection) -> Self {
        Self::with_options(selection, EditOptions::default())
    }

    pub fn with_options(selection: BoardSelection, options: EditOptions) -> Self {
        Self {
            group: UndoCommandGroup::new("Remove Board Items"),
            selection,
            options,
        }
    }
}

impl UndoCommand<Board> for CmdRemoveBoardItems {
    fn text(&self) -> &str {
        "Remove Board Items"
    }

    fn perform_execute(&mut self, board: &mut Board) -> EditResult<bool> {
        let selection = &self.selection;
        let options = &self.options;
        self.group
            .execute_atomically(board, |group, board| remove_items(group, board, selection, options))
    }

    fn perform_undo(&mut self, board: &mut Board) -> EditResult<()> {
        self.group.undo_children(board)
    }

    fn perform_redo(&mut self, board: &mut Board) -> EditResult<()> {
        self.group.redo_children(board)
    }
}

/// What to remove from one net segment.
#[derive(Debug, Default)]
struct NetSegmentItems {
    junctions: HashSet<Uuid>,
    vias: HashSet<Uuid>,
    traces: HashSet<Uuid>,
}

impl NetSegmentItems {
    fn is_empty(&self) -> bool {
        self.junctions.is_empty() && self.vias.is_empty() && self.traces.is_empty()
    }
}

fn remove_items(
    group: &mut UndoCommandGroup<Board>,
    board: &mut Board,
    selection: &BoardSelection,
    options: &EditOptions,
) -> EditResult<()> {
    selection.validate(board)?;

    // also remove all traces attached to removed devices
    let mut traces: HashSet<Uuid> = selection.traces.clone();
    for component in &selection.devices {
        traces.extend(board.traces_of_device(component).iter().map(|t| t.uuid));
    }

    let segments: Vec<NetSegment> = board.net_segments.clone();
    for segment in &segments {
        let items = NetSegmentItems {
            junctions: segment
                .junctions
                .iter()
                .map(|j| j.uuid)
                .filter(|u| selection.junctions.contains(u))
                .collect(),
            vias: segment
                .vias
                .iter()
                .map(|v| v.uuid)
                .filter(|u| selection.vias.contains(u))
                .collect(),
            traces: segment
                .traces
                .iter()
                .filter(|t| {
                    traces.contains(&t.uuid)
                        || [t.start, t.end].iter().any(|a| match a {
                            AnchorRef::Junction(j) => selection.junctions.contains(j),
                            _ => false,
                        })
                })
                .map(|t| t.uuid)
                .collect(),
        };
        if items.is_empty() {
            continue;
        }

        let remove_all_vias = items.vias.len() == segment.vias.len();
        let remove_all_traces = items.traces.len() == segment.traces.len();
        if remove_all_vias && remove_all_traces {
            tracing::debug!("Removing whole net segment {}", segment.uuid);
            group.exec_new_child_cmd(board, CmdNetSegmentRemove::new(segment.uuid))?;
        } else {
            split_up_net_segment(group, board, segment, &items, options)?;
        }
    }

    let devices: Vec<Uuid> = board
        .devices
        .iter()
        .map(|d| d.component)
        .filter(|c| selection.devices.contains(c))
        .collect();
    for component in devices {
        group.exec_new_child_cmd(board, CmdDeviceInstanceRemove::new(component))?;
    }

    for uuid in selected_in(board.planes.iter().map(|p| p.uuid), &selection.planes) {
        group.exec_new_child_cmd(board, CmdPlaneRemove::new(uuid))?;
    }

    for uuid in selected_in(board.polygons.iter().map(|p| p.uuid), &selection.polygons) {
        group.exec_new_child_cmd(board, CmdPolygonRemove::new(uuid))?;
    }

    for uuid in selected_in(board.stroke_texts.iter().map(|t| t.uuid), &selection.stroke_texts) {
        group.exec_new_child_cmd(board, CmdStrokeTextRemove::new(uuid))?;
    }
    // removed devices took their texts with them, only surviving ones remain
    let footprint_texts: Vec<(Uuid, Uuid)> = board
        .devices
        .iter()
        .flat_map(|d| d.stroke_texts.iter().map(move |t| (d.component, t.uuid)))
        .filter(|(_, t)| selection.stroke_texts.contains(t))
        .collect();
    for (device, text) in footprint_texts {
        group.exec_new_child_cmd(board, CmdFootprintStrokeTextRemove::new(device, text))?;
    }

    for uuid in selected_in(board.holes.iter().map(|h| h.uuid), &selection.holes) {
        group.exec_new_child_cmd(board, CmdHoleRemove::new(uuid))?;
    }

    if group.child_count() > 0 && options.remove_unused_library_elements {
        group.exec_new_child_cmd(board, CmdRemoveUnusedLibraryElements::new())?;
    }

    tracing::debug!("Removed board items with {} command(s)", group.child_count());
    Ok(())
}

fn selected_in(all: impl Iterator<Item = Uuid>, selected: &HashSet<Uuid>) -> Vec<Uuid> {
    all.filter(|u| selected.contains(u)).collect()
}

fn split_up_net_segment(
    group: &mut UndoCommandGroup<Board>,
    board: &mut Board,
    segment: &NetSegment,
    items: &NetSegmentItems,
    options: &EditOptions,
) -> EditResult<()> {
    // determine all resulting sub-segments
    let mut splitter = BoardNetSegmentSplitter::new();
    for junction in segment.junctions.iter().filter(|j| !items.junctions.contains(&j.uuid)) {
        splitter.add_junction(*junction);
    }
    for via in segment.vias.iter().filter(|v| !items.vias.contains(&v.uuid)) {
        splitter.add_via(via.clone());
    }
    for trace in segment.traces.iter().filter(|t| !items.traces.contains(&t.uuid)) {
        let mut positions = Vec::with_capacity(2);
        for anchor in [&trace.start, &trace.end] {
            if let AnchorRef::Pad { device, pad } = anchor {
                if let Some(pad) = board.pad_anchor(device, pad) {
                    splitter.add_pad(pad);
                }
            }
            positions.push(
                board
                    .anchor_position(segment, anchor)
                    .ok_or(EditError::UnresolvedAnchor(*anchor))?,
            );
        }
        splitter.add_trace(trace.clone(), positions[0], positions[1]);
    }
    let subsegments = splitter.split();
    tracing::debug!(
        "Splitting net segment {} into {} segment(s)",
        segment.uuid,
        subsegments.len()
    );

    // remove the whole segment, then add the pieces
    group.exec_new_child_cmd(board, CmdNetSegmentRemove::new(segment.uuid))?;

    for sub in subsegments.iter().filter(|s| s.has_elements()) {
        let new_segment = NetSegment::new(segment.net_signal);
        let new_uuid = new_segment.uuid;
        group.exec_new_child_cmd(board, CmdNetSegmentAdd::new(new_segment))?;

        let mut cmd = CmdNetSegmentAddElements::new(new_uuid);
        let mut map = AnchorMap::new();
        for junction in &sub.junctions {
            let copy = Junction::new(junction.position);
            map.insert_junction(junction.uuid, copy.uuid);
            cmd.add_junction(copy);
        }
        for via in &sub.vias {
            let copy = if options.keep_via_uuids_on_split {
                via.clone()
            } else {
                via.with_uuid(Uuid::new_v4())
            };
            map.insert_via(via.uuid, copy.uuid);
            cmd.add_via(copy);
        }
        {
            let resolver = map.resolver(&*board);
            for trace in &sub.traces {
                cmd.add_trace(Trace {
                    start: resolver.resolve_required(&trace.start)?,
                    end: resolver.resolve_required(&trace.end)?,
                    ..trace.clone()
                });
            }
        }
        group.exec_new_child_cmd(board, cmd)?;
    }
    Ok(())
}
