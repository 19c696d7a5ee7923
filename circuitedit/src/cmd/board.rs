//! Board commands that do more than add or remove one list element.

use uuid::Uuid;

use crate::core::{EditError, EditResult};
use crate::model::{Board, Junction, LibDevice, LibPackage, StrokeText, Trace, Via};
use crate::undo::UndoCommand;

use super::items::validate_net_segment;

/// Adds junctions, vias and traces to an existing net segment.
pub struct CmdNetSegmentAddElements {
    segment: Uuid,
    junctions: Vec<Junction>,
    vias: Vec<Via>,
    traces: Vec<Trace>,
}

impl CmdNetSegmentAddElements {
    pub fn new(segment: Uuid) -> Self {
        Self {
            segment,
            junctions: Vec::new(),
            vias: Vec::new(),
            traces: Vec::new(),
        }
    }

    pub fn add_junction(&mut self, junction: Junction) {
        self.junctions.push(junction);
    }

    pub fn add_via(&mut self, via: Via) {
        self.vias.push(via);
    }

    pub fn add_trace(&mut self, trace: Trace) {
        self.traces.push(trace);
    }

    pub fn is_empty(&self) -> bool {
        self.junctions.is_empty() && self.vias.is_empty() && self.traces.is_empty()
    }

    fn add(&self, board: &mut Board) -> EditResult<()> {
        let segment = board.net_segment(&self.segment).ok_or(EditError::ElementNotFound {
            kind: "net segment",
            uuid: self.segment,
        })?;
        let mut updated = segment.clone();
        updated.junctions.extend(self.junctions.iter().copied());
        updated.vias.extend(self.vias.iter().cloned());
        updated.traces.extend(self.traces.iter().cloned());
        validate_net_segment(board, &updated)?;

        if let Some(segment) = board.net_segment_mut(&self.segment) {
            *segment = updated;
        }
        Ok(())
    }
}

impl UndoCommand<Board> for CmdNetSegmentAddElements {
    fn text(&self) -> &str {
        "Add net segment elements"
    }

    fn perform_execute(&mut self, board: &mut Board) -> EditResult<bool> {
        self.add(board)?;
        Ok(!self.is_empty())
    }

    fn perform_undo(&mut self, board: &mut Board) -> EditResult<()> {
        let segment = board
            .net_segment_mut(&self.segment)
            .ok_or(EditError::ElementNotFound {
                kind: "net segment",
                uuid: self.segment,
            })?;
        segment
            .traces
            .retain(|t| !self.traces.iter().any(|o| o.uuid == t.uuid));
        segment
            .vias
            .retain(|v| !self.vias.iter().any(|o| o.uuid == v.uuid));
        segment
            .junctions
            .retain(|j| !self.junctions.iter().any(|o| o.uuid == j.uuid));
        Ok(())
    }

    fn perform_redo(&mut self, board: &mut Board) -> EditResult<()> {
        self.add(board)
    }
}

/// Removes a stroke text from a device footprint.
pub struct CmdFootprintStrokeTextRemove {
    device: Uuid,
    text: Uuid,
    removed: Option<(usize, StrokeText)>,
}

impl CmdFootprintStrokeTextRemove {
    pub fn new(device: Uuid, text: Uuid) -> Self {
        Self {
            device,
            text,
            removed: None,
        }
    }

    fn remove(&mut self, board: &mut Board) -> EditResult<()> {
        let device = board.device_mut(&self.device).ok_or(EditError::ElementNotFound {
            kind: "device",
            uuid: self.device,
        })?;
        let index = device
            .stroke_texts
            .iter()
            .position(|t| t.uuid == self.text)
            .ok_or(EditError::ElementNotFound {
                kind: "stroke text",
                uuid: self.text,
            })?;
        self.removed = Some((index, device.stroke_texts.remove(index)));
        Ok(())
    }
}

impl UndoCommand<Board> for CmdFootprintStrokeTextRemove {
    fn text(&self) -> &str {
        "Remove footprint stroke text"
    }

    fn perform_execute(&mut self, board: &mut Board) -> EditResult<bool> {
        self.remove(board)?;
        Ok(true)
    }

    fn perform_undo(&mut self, board: &mut Board) -> EditResult<()> {
        let (index, text) = self
            .removed
            .take()
            .ok_or_else(|| EditError::logic("stroke text was not removed"))?;
        let device = board.device_mut(&self.device).ok_or(EditError::ElementNotFound {
            kind: "device",
            uuid: self.device,
        })?;
        let index = index.min(device.stroke_texts.len());
        device.stroke_texts.insert(index, text);
        Ok(())
    }

    fn perform_redo(&mut self, board: &mut Board) -> EditResult<()> {
        self.remove(board)
    }
}

/// Purges library devices no placed device uses, then packages no library
/// device uses.
#[derive(Default)]
pub struct CmdRemoveUnusedLibraryElements {
    removed_devices: Vec<(usize, LibDevice)>,
    removed_packages: Vec<(usize, LibPackage)>,
}

impl CmdRemoveUnusedLibraryElements {
    pub fn new() -> Self {
        Self::default()
    }

    fn remove(&mut self, board: &mut Board) {
        self.removed_devices.clear();
        self.removed_packages.clear();

        let mut i = 0;
        while i < board.library.devices.len() {
            let uuid = board.library.devices[i].uuid;
            if board.devices.iter().any(|d| d.lib_device == uuid) {
                i += 1;
            } else {
                self.removed_devices.push((i, board.library.devices.remove(i)));
            }
        }

        let mut i = 0;
        while i < board.library.packages.len() {
            let uuid = board.library.packages[i].uuid;
            if board.library.devices.iter().any(|d| d.package == uuid) {
                i += 1;
            } else {
                self.removed_packages.push((i, board.library.packages.remove(i)));
            }
        }

        if !self.removed_devices.is_empty() || !self.removed_packages.is_empty() {
            tracing::debug!(
                "Removed {} unused library device(s) and {} package(s)",
                self.removed_devices.len(),
                self.removed_packages.len()
            );
        }
    }
}

impl UndoCommand<Board> for CmdRemoveUnusedLibraryElements {
    fn text(&self) -> &str {
        "Remove unused library elements"
    }

    fn perform_execute(&mut self, board: &mut Board) -> EditResult<bool> {
        self.remove(board);
        Ok(!self.removed_devices.is_empty() || !self.removed_packages.is_empty())
    }

    fn perform_undo(&mut self, board: &mut Board) -> EditResult<()> {
        for (index, package) in self.removed_packages.drain(..).rev() {
            let index = index.min(board.library.packages.len());
            board.library.packages.insert(index, package);
        }
        for (index, device) in self.removed_devices.drain(..).rev() {
            let index = index.min(board.library.devices.len());
            board.library.devices.insert(index, device);
        }
        Ok(())
    }

    fn perform_redo(&mut self, board: &mut Board) -> EditResult<()> {
        self.remove(board);
        Ok(())
    }
}
