//! Anchors are the points wires attach to.
//!
//! A trace (board) or net line (schematic) always connects two anchors. An
//! anchor is referenced by an [`AnchorRef`]; the referenced element is either
//! a junction or a via owned by a net segment, or a pad owned by a device.
//! On schematics the `Pad` variant refers to a symbol pin.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::geometry::Point;

/// Stable reference to an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorRef {
    Junction(Uuid),
    Via(Uuid),
    /// Pad `pad` of the device placed for component `device`.
    Pad { device: Uuid, pad: Uuid },
}

impl AnchorRef {
    pub fn pad(device: Uuid, pad: Uuid) -> Self {
        AnchorRef::Pad { device, pad }
    }

    pub fn is_junction(&self) -> bool {
        matches!(self, AnchorRef::Junction(_))
    }
}

impl fmt::Display for AnchorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorRef::Junction(uuid) => write!(f, "junction {}", uuid),
            AnchorRef::Via(uuid) => write!(f, "via {}", uuid),
            AnchorRef::Pad { device, pad } => write!(f, "pad {} of {}", pad, device),
        }
    }
}

/// A bare wire point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Junction {
    pub uuid: Uuid,
    pub position: Point,
}

impl Junction {
    pub fn new(position: Point) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViaShape {
    #[default]
    Round,
    Square,
    Octagon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Via {
    pub uuid: Uuid,
    pub position: Point,
    pub shape: ViaShape,
    /// Outer diameter (mm)
    pub size: f64,
    /// Drill diameter (mm)
    pub drill: f64,
}

impl Via {
    pub fn new(position: Point, size: f64, drill: f64) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            position,
            shape: ViaShape::Round,
            size,
            drill,
        }
    }

    /// Same via with another identity.
    pub fn with_uuid(&self, uuid: Uuid) -> Self {
        Self {
            uuid,
            ..self.clone()
        }
    }
}

/// A pad seen from the wiring graph: its position comes from the owning
/// device and is read-only here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PadAnchor {
    pub device: Uuid,
    pub pad: Uuid,
    pub position: Point,
}

/// An anchor together with its data, as fed into the splitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Anchor {
    Junction(Junction),
    Via(Via),
    Pad(PadAnchor),
}

impl Anchor {
    pub fn anchor_ref(&self) -> AnchorRef {
        match self {
            Anchor::Junction(j) => AnchorRef::Junction(j.uuid),
            Anchor::Via(v) => AnchorRef::Via(v.uuid),
            Anchor::Pad(p) => AnchorRef::pad(p.device, p.pad),
        }
    }

    pub fn position(&self) -> Point {
        match self {
            Anchor::Junction(j) => j.position,
            Anchor::Via(v) => v.position,
            Anchor::Pad(p) => p.position,
        }
    }

    /// Whether the anchor is physically meaningful without any wire.
    pub fn is_standalone(&self) -> bool {
        match self {
            Anchor::Junction(_) => false,
            Anchor::Via(_) | Anchor::Pad(_) => true,
        }
    }
}
