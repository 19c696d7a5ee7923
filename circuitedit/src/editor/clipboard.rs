//! Board clipboard payload
//!
//! A self-contained snapshot of copied board elements, keyed by their
//! original ids. Positions are absolute; the paste command applies its own
//! offset.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{EditError, EditResult};
use crate::model::{
    AnchorRef, Board, ConnectStyle, FootprintPad, Hole, Junction, LibDevice, LibPackage,
    Point, Polygon, StrokeText, Trace, Via,
};
use crate::splitter::BoardNetSegmentSplitter;

use super::BoardSelection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardDevice {
    pub component: Uuid,
    pub lib_device: Uuid,
    pub lib_footprint: Uuid,
    pub position: Point,
    pub rotation: f64,
    pub mirrored: bool,
    pub pads: Vec<FootprintPad>,
    pub stroke_texts: Vec<StrokeText>,
}

/// A connected piece of copied wiring. Traces reference junctions and vias
/// of this segment, or pads of copied devices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardNetSegment {
    pub net_name: String,
    pub junctions: Vec<Junction>,
    pub vias: Vec<Via>,
    pub traces: Vec<Trace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardPlane {
    pub uuid: Uuid,
    pub layer: String,
    pub net_signal_name: String,
    pub outline: Vec<Point>,
    pub min_width: f64,
    pub min_clearance: f64,
    pub keep_orphans: bool,
    pub priority: i32,
    pub connect_style: ConnectStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardClipboardData {
    pub board: Uuid,
    pub cursor_position: Point,
    #[serde(default)]
    pub library_devices: Vec<LibDevice>,
    #[serde(default)]
    pub library_packages: Vec<LibPackage>,
    #[serde(default)]
    pub devices: Vec<ClipboardDevice>,
    #[serde(default)]
    pub net_segments: Vec<ClipboardNetSegment>,
    #[serde(default)]
    pub planes: Vec<ClipboardPlane>,
    #[serde(default)]
    pub polygons: Vec<Polygon>,
    #[serde(default)]
    pub stroke_texts: Vec<StrokeText>,
    #[serde(default)]
    pub holes: Vec<Hole>,
}

impl BoardClipboardData {
    pub fn new(board: Uuid, cursor_position: Point) -> Self {
        Self {
            board,
            cursor_position,
            library_devices: Vec::new(),
            library_packages: Vec::new(),
            devices: Vec::new(),
            net_segments: Vec::new(),
            planes: Vec::new(),
            polygons: Vec::new(),
            stroke_texts: Vec::new(),
            holes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
            && self.net_segments.is_empty()
            && self.planes.is_empty()
            && self.polygons.is_empty()
            && self.stroke_texts.is_empty()
            && self.holes.is_empty()
    }

    pub fn library_device(&self, uuid: &Uuid) -> Option<&LibDevice> {
        self.library_devices.iter().find(|d| &d.uuid == uuid)
    }

    pub fn library_package(&self, uuid: &Uuid) -> Option<&LibPackage> {
        self.library_packages.iter().find(|p| &p.uuid == uuid)
    }

    pub fn to_json(&self) -> EditResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> EditResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Builds clipboard data from a board selection.
pub struct BoardClipboardDataBuilder<'a> {
    board: &'a Board,
}

impl<'a> BoardClipboardDataBuilder<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }

    pub fn generate(
        &self,
        selection: &BoardSelection,
        cursor_position: Point,
    ) -> EditResult<BoardClipboardData> {
        selection.validate(self.board)?;
        let mut data = BoardClipboardData::new(self.board.uuid, cursor_position);

        for device in self.board.devices.iter().filter(|d| selection.devices.contains(&d.component)) {
            self.copy_library_elements(&mut data, &device.lib_device)?;
            data.devices.push(ClipboardDevice {
                component: device.component,
                lib_device: device.lib_device,
                lib_footprint: device.lib_footprint,
                position: device.position,
                rotation: device.rotation,
                mirrored: device.mirrored,
                pads: device.pads.clone(),
                stroke_texts: device.stroke_texts.clone(),
            });
        }

        self.copy_net_segments(&mut data, selection)?;

        for plane in self.board.planes.iter().filter(|p| selection.planes.contains(&p.uuid)) {
            data.planes.push(ClipboardPlane {
                uuid: plane.uuid,
                layer: plane.layer.clone(),
                net_signal_name: self.net_signal_name(&plane.net_signal)?,
                outline: plane.outline.clone(),
                min_width: plane.min_width,
                min_clearance: plane.min_clearance,
                keep_orphans: plane.keep_orphans,
                priority: plane.priority,
                connect_style: plane.connect_style,
            });
        }

        data.polygons.extend(
            self.board
                .polygons
                .iter()
                .filter(|p| selection.polygons.contains(&p.uuid))
                .cloned(),
        );
        data.stroke_texts.extend(
            self.board
                .stroke_texts
                .iter()
                .filter(|t| selection.stroke_texts.contains(&t.uuid))
                .cloned(),
        );
        data.holes.extend(
            self.board
                .holes
                .iter()
                .filter(|h| selection.holes.contains(&h.uuid))
                .cloned(),
        );

        tracing::debug!(
            "Copied {} device(s), {} net segment(s)",
            data.devices.len(),
            data.net_segments.len()
        );
        Ok(data)
    }

    fn copy_library_elements(&self, data: &mut BoardClipboardData, lib_device: &Uuid) -> EditResult<()> {
        let device = self.board.library.device(lib_device).ok_or(EditError::ElementNotFound {
            kind: "library device",
            uuid: *lib_device,
        })?;
        if data.library_device(&device.uuid).is_none() {
            data.library_devices.push(device.clone());
        }
        let package = self.board.library.package(&device.package).ok_or(EditError::ElementNotFound {
            kind: "library package",
            uuid: device.package,
        })?;
        if data.library_package(&package.uuid).is_none() {
            data.library_packages.push(package.clone());
        }
        Ok(())
    }

    /// Copies the selected vias and traces of every segment, split into
    /// connected pieces. Vias which are not selected and pads of devices
    /// which are not selected are replaced by junctions.
    fn copy_net_segments(&self, data: &mut BoardClipboardData, selection: &BoardSelection) -> EditResult<()> {
        for segment in &self.board.net_segments {
            let vias: Vec<&Via> = segment
                .vias
                .iter()
                .filter(|v| selection.vias.contains(&v.uuid))
                .collect();
            let traces: Vec<&Trace> = segment
                .traces
                .iter()
                .filter(|t| selection.traces.contains(&t.uuid))
                .collect();
            if vias.is_empty() && traces.is_empty() {
                continue;
            }

            let mut splitter = BoardNetSegmentSplitter::new();
            for junction in &segment.junctions {
                splitter.add_junction(*junction);
            }
            for via in vias {
                splitter.add_via(via.clone());
            }
            for trace in traces {
                let mut positions = Vec::with_capacity(2);
                for anchor in [&trace.start, &trace.end] {
                    if let AnchorRef::Pad { device, pad } = anchor {
                        if selection.devices.contains(device) {
                            if let Some(pad) = self.board.pad_anchor(device, pad) {
                                splitter.add_pad(pad);
                            }
                        }
                    }
                    positions.push(
                        self.board
                            .anchor_position(segment, anchor)
                            .ok_or(EditError::UnresolvedAnchor(*anchor))?,
                    );
                }
                splitter.add_trace(trace.clone(), positions[0], positions[1]);
            }

            let net_name = self.net_signal_name(&segment.net_signal)?;
            for sub in splitter.split().into_iter().filter(|s| s.has_elements()) {
                data.net_segments.push(ClipboardNetSegment {
                    net_name: net_name.clone(),
                    junctions: sub.junctions,
                    vias: sub.vias,
                    traces: sub.traces,
                });
            }
        }
        Ok(())
    }

    fn net_signal_name(&self, uuid: &Uuid) -> EditResult<String> {
        self.board
            .circuit
            .net_signal(uuid)
            .map(|s| s.name.clone())
            .ok_or(EditError::ElementNotFound {
                kind: "net signal",
                uuid: *uuid,
            })
    }
}
