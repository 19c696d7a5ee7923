//! Paste clipboard content onto a board
//!
//! - Devices are only pasted if their component exists in the circuit and
//!   no device for that component is on the board yet.
//! - Every pasted element gets a new id and is moved by the paste offset.
//! - Traces may only attach to pads of devices pasted by the same command.
//!   A trace bound to any other pad is a logic fault.
//! - Net signals are looked up by name and created if missing.

use std::collections::HashSet;
use uuid::Uuid;

use crate::cmd::{
    CmdDeviceInstanceAdd, CmdHoleAdd, CmdLibDeviceAdd, CmdLibPackageAdd, CmdNetClassAdd,
    CmdNetSegmentAdd, CmdNetSegmentAddElements, CmdNetSignalAdd, CmdPlaneAdd, CmdPolygonAdd,
    CmdStrokeTextAdd,
};
use crate::core::{EditError, EditOptions, EditResult};
use crate::model::geometry::translated;
use crate::model::{
    Board, Device, Hole, Junction, NetClass, NetSegment, NetSignal, Plane, Point, Polygon,
    StrokeText, Trace, Via,
};
use crate::resolver::{AnchorMap, PadLookup};
use crate::undo::{UndoCommand, UndoCommandGroup};

use super::clipboard::{BoardClipboardData, ClipboardDevice};

pub struct CmdPasteBoardItems {
    group: UndoCommandGroup<Board>,
    data: BoardClipboardData,
    offset: Point,
    options: EditOptions,
}

impl CmdPasteBoardItems {
    pub fn new(data: BoardClipboardData, offset: Point) -> Self {
        Self::with_options(data, offset, EditOptions::default())
    }

    pub fn with_options(data: BoardClipboardData, offset: Point, options: EditOptions) -> Self {
        Self {
            group: UndoCommandGroup::new("Paste Board Elements"),
            data,
            offset,
            options,
        }
    }
}

impl UndoCommand<Board> for CmdPasteBoardItems {
    fn text(&self) -> &str {
        "Paste Board Elements"
    }

    fn perform_execute(&mut self, board: &mut Board) -> EditResult<bool> {
        let data = &self.data;
        let offset = self.offset;
        let options = &self.options;
        self.group.execute_atomically(board, |group, board| {
            let mut paste = Paste {
                group,
                data,
                offset,
                options,
            };
            paste.run(board)
        })
    }

    fn perform_undo(&mut self, board: &mut Board) -> EditResult<()> {
        self.group.undo_children(board)
    }

    fn perform_redo(&mut self, board: &mut Board) -> EditResult<()> {
        self.group.redo_children(board)
    }
}

/// Pads of devices placed by this paste.
struct PastedPads<'a> {
    board: &'a Board,
    devices: &'a HashSet<Uuid>,
}

impl PadLookup for PastedPads<'_> {
    fn has_pad(&self, device: &Uuid, pad: &Uuid) -> bool {
        self.devices.contains(device) && self.board.has_pad(device, pad)
    }
}

struct Paste<'a> {
    group: &'a mut UndoCommandGroup<Board>,
    data: &'a BoardClipboardData,
    offset: Point,
    options: &'a EditOptions,
}

impl Paste<'_> {
    fn run(&mut self, board: &mut Board) -> EditResult<()> {
        let data = self.data;
        let mut pasted_devices = HashSet::new();
        for dev in &data.devices {
            if board.circuit.component(&dev.component).is_none() {
                tracing::debug!("Component {} not in circuit, skipping device", dev.component);
                continue;
            }
            if board.device(&dev.component).is_some() {
                tracing::debug!("Device for {} already on board, skipping", dev.component);
                continue;
            }
            self.paste_device(board, dev)?;
            pasted_devices.insert(dev.component);
        }

        for seg in &data.net_segments {
            if seg.junctions.is_empty() && seg.vias.is_empty() && seg.traces.is_empty() {
                tracing::debug!("Skipping empty net segment of \"{}\"", seg.net_name);
                continue;
            }
            let net_signal = self.get_or_create_net_signal(board, &seg.net_name)?;
            let segment = NetSegment::new(net_signal);
            let segment_uuid = segment.uuid;
            self.group.exec_new_child_cmd(board, CmdNetSegmentAdd::new(segment))?;

            let mut cmd = CmdNetSegmentAddElements::new(segment_uuid);
            let mut map = AnchorMap::new();
            for via in &seg.vias {
                let copy = Via {
                    uuid: Uuid::new_v4(),
                    position: via.position + self.offset,
                    ..via.clone()
                };
                map.insert_via(via.uuid, copy.uuid);
                cmd.add_via(copy);
            }
            for junction in &seg.junctions {
                let copy = Junction::new(junction.position + self.offset);
                map.insert_junction(junction.uuid, copy.uuid);
                cmd.add_junction(copy);
            }
            {
                let pads = PastedPads {
                    board: &*board,
                    devices: &pasted_devices,
                };
                let resolver = map.resolver(&pads);
                for trace in &seg.traces {
                    if !board.has_layer(&trace.layer) {
                        return Err(EditError::UnknownLayer(trace.layer.clone()));
                    }
                    cmd.add_trace(Trace {
                        uuid: Uuid::new_v4(),
                        start: resolver.resolve_required(&trace.start)?,
                        end: resolver.resolve_required(&trace.end)?,
                        ..trace.clone()
                    });
                }
            }
            self.group.exec_new_child_cmd(board, cmd)?;
        }

        for plane in &data.planes {
            let net_signal = self.get_or_create_net_signal(board, &plane.net_signal_name)?;
            let copy = Plane {
                uuid: Uuid::new_v4(),
                layer: plane.layer.clone(),
                net_signal,
                outline: translated(&plane.outline, self.offset),
                min_width: plane.min_width,
                min_clearance: plane.min_clearance,
                keep_orphans: plane.keep_orphans,
                priority: plane.priority,
                connect_style: plane.connect_style,
            };
            self.group.exec_new_child_cmd(board, CmdPlaneAdd::new(copy))?;
        }

        for polygon in &data.polygons {
            let copy = Polygon {
                uuid: Uuid::new_v4(),
                path: translated(&polygon.path, self.offset),
                ..polygon.clone()
            };
            self.group.exec_new_child_cmd(board, CmdPolygonAdd::new(copy))?;
        }

        for text in &data.stroke_texts {
            let copy = self.moved_text(text);
            self.group.exec_new_child_cmd(board, CmdStrokeTextAdd::new(copy))?;
        }

        for hole in &data.holes {
            let copy = Hole {
                uuid: Uuid::new_v4(),
                position: hole.position + self.offset,
                ..hole.clone()
            };
            self.group.exec_new_child_cmd(board, CmdHoleAdd::new(copy))?;
        }

        tracing::debug!(
            "Pasted {} device(s) with {} command(s)",
            pasted_devices.len(),
            self.group.child_count()
        );
        Ok(())
    }

    fn paste_device(&mut self, board: &mut Board, dev: &ClipboardDevice) -> EditResult<()> {
        // copy library device and package into the project if missing
        let package = match board.library.device(&dev.lib_device) {
            Some(lib_device) => lib_device.package,
            None => {
                let lib_device = self
                    .data
                    .library_device(&dev.lib_device)
                    .cloned()
                    .ok_or(EditError::ElementNotFound {
                        kind: "library device",
                        uuid: dev.lib_device,
                    })?;
                let package = lib_device.package;
                self.group.exec_new_child_cmd(board, CmdLibDeviceAdd::new(lib_device))?;
                package
            }
        };
        if board.library.package(&package).is_none() {
            let lib_package = self
                .data
                .library_package(&package)
                .cloned()
                .ok_or(EditError::ElementNotFound {
                    kind: "library package",
                    uuid: package,
                })?;
            self.group.exec_new_child_cmd(board, CmdLibPackageAdd::new(lib_package))?;
        }

        let device = Device {
            component: dev.component,
            lib_device: dev.lib_device,
            lib_footprint: dev.lib_footprint,
            position: dev.position + self.offset,
            rotation: dev.rotation,
            mirrored: dev.mirrored,
            pads: dev.pads.clone(),
            stroke_texts: dev.stroke_texts.iter().map(|t| self.moved_text(t)).collect(),
        };
        self.group.exec_new_child_cmd(board, CmdDeviceInstanceAdd::new(device))?;
        Ok(())
    }

    fn moved_text(&self, text: &StrokeText) -> StrokeText {
        StrokeText {
            uuid: Uuid::new_v4(),
            position: text.position + self.offset,
            ..text.clone()
        }
    }

    fn get_or_create_net_signal(&mut self, board: &mut Board, name: &str) -> EditResult<Uuid> {
        if let Some(signal) = board.circuit.net_signal_by_name(name) {
            return Ok(signal.uuid);
        }

        let class_name = &self.options.default_net_class_name;
        let net_class = match board.circuit.net_class_by_name(class_name) {
            Some(class) => class.uuid,
            None => {
                let class = NetClass::new(class_name.as_str());
                let uuid = class.uuid;
                self.group.exec_new_child_cmd(board, CmdNetClassAdd::new(class))?;
                uuid
            }
        };

        tracing::debug!("Creating net signal \"{}\"", name);
        let signal = NetSignal::new(name, net_class);
        let uuid = signal.uuid;
        self.group.exec_new_child_cmd(board, CmdNetSignalAdd::new(signal))?;
        Ok(uuid)
    }
}
