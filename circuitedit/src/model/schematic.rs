//! Schematic model
//!
//! Same wiring graph as on boards, without vias: net lines connect junctions
//! and symbol pins (referenced as `AnchorRef::Pad { device: component, pad:
//! pin }`). Net labels annotate segments.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::anchor::{AnchorRef, Junction, PadAnchor};
use super::circuit::Circuit;
use super::geometry::Point;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetLine {
    pub uuid: Uuid,
    pub width: f64,
    pub start: AnchorRef,
    pub end: AnchorRef,
}

impl NetLine {
    pub fn new(start: AnchorRef, end: AnchorRef) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            width: 0.15875,
            start,
            end,
        }
    }

    pub fn is_attached_to(&self, anchor: &AnchorRef) -> bool {
        &self.start == anchor || &self.end == anchor
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetLabel {
    pub uuid: Uuid,
    pub position: Point,
    pub rotation: f64,
}

impl NetLabel {
    pub fn new(position: Point) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            position,
            rotation: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchematicNetSegment {
    pub uuid: Uuid,
    pub net_signal: Uuid,
    pub junctions: Vec<Junction>,
    pub netlines: Vec<NetLine>,
    pub netlabels: Vec<NetLabel>,
}

impl SchematicNetSegment {
    pub fn new(net_signal: Uuid) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            net_signal,
            junctions: Vec::new(),
            netlines: Vec::new(),
            netlabels: Vec::new(),
        }
    }

    pub fn junction(&self, uuid: &Uuid) -> Option<&Junction> {
        self.junctions.iter().find(|j| &j.uuid == uuid)
    }

    pub fn netline(&self, uuid: &Uuid) -> Option<&NetLine> {
        self.netlines.iter().find(|l| &l.uuid == uuid)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolPin {
    pub uuid: Uuid,
    pub offset: Point,
}

/// A symbol placed for one circuit component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub component: Uuid,
    pub position: Point,
    pub rotation: f64,
    pub pins: Vec<SymbolPin>,
}

impl Symbol {
    pub fn pin_position(&self, pin: &Uuid) -> Option<Point> {
        self.pins
            .iter()
            .find(|p| &p.uuid == pin)
            .map(|p| self.position + p.offset.rotated(self.rotation))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schematic {
    pub uuid: Uuid,
    pub name: String,
    pub circuit: Circuit,
    pub symbols: Vec<Symbol>,
    pub net_segments: Vec<SchematicNetSegment>,
}

impl Schematic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            circuit: Circuit::default(),
            symbols: Vec::new(),
            net_segments: Vec::new(),
        }
    }

    pub fn symbol(&self, component: &Uuid) -> Option<&Symbol> {
        self.symbols.iter().find(|s| &s.component == component)
    }

    pub fn net_segment(&self, uuid: &Uuid) -> Option<&SchematicNetSegment> {
        self.net_segments.iter().find(|s| &s.uuid == uuid)
    }

    pub fn pin_anchor(&self, component: &Uuid, pin: &Uuid) -> Option<PadAnchor> {
        let symbol = self.symbol(component)?;
        symbol.pin_position(pin).map(|position| PadAnchor {
            device: *component,
            pad: *pin,
            position,
        })
    }

    /// Position of a pin, or of a junction owned by `segment`.
    pub fn anchor_position(&self, segment: &SchematicNetSegment, anchor: &AnchorRef) -> Option<Point> {
        match anchor {
            AnchorRef::Junction(uuid) => segment.junction(uuid).map(|j| j.position),
            AnchorRef::Pad { device, pad } => self.symbol(device)?.pin_position(pad),
            AnchorRef::Via(_) => None,
        }
    }
}
