//! Board model
//!
//! In-memory representation of one board: placed devices, net segments
//! (junctions, vias and the traces between them) and the free items
//! (planes, polygons, stroke texts, holes). The board also owns the circuit
//! and project library it was created for, so that a single `&mut Board`
//! is everything a command needs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::anchor::{AnchorRef, Junction, PadAnchor, Via};
use super::circuit::{Circuit, ProjectLibrary};
use super::geometry::Point;

/// A copper trace between two anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub uuid: Uuid,
    pub layer: String,
    /// Width (mm)
    pub width: f64,
    pub start: AnchorRef,
    pub end: AnchorRef,
}

impl Trace {
    pub fn new(layer: impl Into<String>, width: f64, start: AnchorRef, end: AnchorRef) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            layer: layer.into(),
            width,
            start,
            end,
        }
    }

    pub fn is_attached_to(&self, anchor: &AnchorRef) -> bool {
        &self.start == anchor || &self.end == anchor
    }
}

/// A connected piece of wiring belonging to one net signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetSegment {
    pub uuid: Uuid,
    pub net_signal: Uuid,
    pub junctions: Vec<Junction>,
    pub vias: Vec<Via>,
    pub traces: Vec<Trace>,
}

impl NetSegment {
    pub fn new(net_signal: Uuid) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            net_signal,
            junctions: Vec::new(),
            vias: Vec::new(),
            traces: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.junctions.is_empty() && self.vias.is_empty() && self.traces.is_empty()
    }

    pub fn junction(&self, uuid: &Uuid) -> Option<&Junction> {
        self.junctions.iter().find(|j| &j.uuid == uuid)
    }

    pub fn via(&self, uuid: &Uuid) -> Option<&Via> {
        self.vias.iter().find(|v| &v.uuid == uuid)
    }

    pub fn trace(&self, uuid: &Uuid) -> Option<&Trace> {
        self.traces.iter().find(|t| &t.uuid == uuid)
    }

    /// Position of a junction or via owned by this segment.
    pub fn owned_anchor_position(&self, anchor: &AnchorRef) -> Option<Point> {
        match anchor {
            AnchorRef::Junction(uuid) => self.junction(uuid).map(|j| j.position),
            AnchorRef::Via(uuid) => self.via(uuid).map(|v| v.position),
            AnchorRef::Pad { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintPad {
    pub uuid: Uuid,
    /// Position relative to the device origin, before rotation/mirroring.
    pub offset: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeText {
    pub uuid: Uuid,
    pub layer: String,
    pub text: String,
    pub position: Point,
    pub height: f64,
}

/// A device placed on the board for one circuit component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// The component this device is placed for; identifies the device.
    pub component: Uuid,
    pub lib_device: Uuid,
    pub lib_footprint: Uuid,
    pub position: Point,
    /// Rotation in degrees, counter-clockwise.
    pub rotation: f64,
    pub mirrored: bool,
    pub pads: Vec<FootprintPad>,
    pub stroke_texts: Vec<StrokeText>,
}

impl Device {
    pub fn pad(&self, uuid: &Uuid) -> Option<&FootprintPad> {
        self.pads.iter().find(|p| &p.uuid == uuid)
    }

    pub fn pad_position(&self, uuid: &Uuid) -> Option<Point> {
        let pad = self.pad(uuid)?;
        let offset = if self.mirrored {
            pad.offset.mirrored_horizontally()
        } else {
            pad.offset
        };
        Some(self.position + offset.rotated(self.rotation))
    }

    pub fn pad_anchors(&self) -> impl Iterator<Item = PadAnchor> + '_ {
        self.pads.iter().filter_map(move |pad| {
            self.pad_position(&pad.uuid).map(|position| PadAnchor {
                device: self.component,
                pad: pad.uuid,
                position,
            })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectStyle {
    None,
    #[default]
    Thermal,
    Solid,
}

/// A copper fill area bound to a net signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub uuid: Uuid,
    pub layer: String,
    pub net_signal: Uuid,
    pub outline: Vec<Point>,
    pub min_width: f64,
    pub min_clearance: f64,
    pub keep_orphans: bool,
    pub priority: i32,
    pub connect_style: ConnectStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub uuid: Uuid,
    pub layer: String,
    pub width: f64,
    pub filled: bool,
    pub path: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub uuid: Uuid,
    pub position: Point,
    pub diameter: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub uuid: Uuid,
    pub name: String,
    /// Names of the layers traces, planes and texts may live on.
    pub layers: Vec<String>,
    pub circuit: Circuit,
    pub library: ProjectLibrary,
    pub devices: Vec<Device>,
    pub net_segments: Vec<NetSegment>,
    pub planes: Vec<Plane>,
    pub polygons: Vec<Polygon>,
    pub stroke_texts: Vec<StrokeText>,
    pub holes: Vec<Hole>,
}

impl Board {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            layers: vec!["top_cu".to_string(), "bot_cu".to_string()],
            circuit: Circuit::default(),
            library: ProjectLibrary::default(),
            devices: Vec::new(),
            net_segments: Vec::new(),
            planes: Vec::new(),
            polygons: Vec::new(),
            stroke_texts: Vec::new(),
            holes: Vec::new(),
        }
    }

    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|l| l == name)
    }

    /// Device placed for the given component.
    pub fn device(&self, component: &Uuid) -> Option<&Device> {
        self.devices.iter().find(|d| &d.component == component)
    }

    pub fn device_mut(&mut self, component: &Uuid) -> Option<&mut Device> {
        self.devices.iter_mut().find(|d| &d.component == component)
    }

    pub fn net_segment(&self, uuid: &Uuid) -> Option<&NetSegment> {
        self.net_segments.iter().find(|s| &s.uuid == uuid)
    }

    pub fn net_segment_mut(&mut self, uuid: &Uuid) -> Option<&mut NetSegment> {
        self.net_segments.iter_mut().find(|s| &s.uuid == uuid)
    }

    pub fn pad_anchor(&self, device: &Uuid, pad: &Uuid) -> Option<PadAnchor> {
        let dev = self.device(device)?;
        dev.pad_position(pad).map(|position| PadAnchor {
            device: *device,
            pad: *pad,
            position,
        })
    }

    /// Position of a pad, or of a junction/via owned by `segment`.
    pub fn anchor_position(&self, segment: &NetSegment, anchor: &AnchorRef) -> Option<Point> {
        match anchor {
            AnchorRef::Pad { device, pad } => self.device(device)?.pad_position(pad),
            _ => segment.owned_anchor_position(anchor),
        }
    }

    /// Segment owning the given via.
    pub fn segment_of_via(&self, via: &Uuid) -> Option<&NetSegment> {
        self.net_segments.iter().find(|s| s.via(via).is_some())
    }

    pub fn segment_of_trace(&self, trace: &Uuid) -> Option<&NetSegment> {
        self.net_segments.iter().find(|s| s.trace(trace).is_some())
    }

    pub fn segment_of_junction(&self, junction: &Uuid) -> Option<&NetSegment> {
        self.net_segments.iter().find(|s| s.junction(junction).is_some())
    }

    /// All traces attached to any pad of the given device.
    pub fn traces_of_device(&self, component: &Uuid) -> Vec<&Trace> {
        self.net_segments
            .iter()
            .flat_map(|s| s.traces.iter())
            .filter(|t| {
                [t.start, t.end]
                    .iter()
                    .any(|a| matches!(a, AnchorRef::Pad { device, .. } if device == component))
            })
            .collect()
    }

    /// Device owning the given footprint stroke text.
    pub fn device_of_stroke_text(&self, text: &Uuid) -> Option<&Device> {
        self.devices
            .iter()
            .find(|d| d.stroke_texts.iter().any(|t| &t.uuid == text))
    }
}
