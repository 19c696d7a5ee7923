//! Anchor Resolver
//!
//! Maps anchor references of a source graph (a segment before a split, or a
//! clipboard payload) to the anchors created for them in the destination
//! graph. Junctions and vias are looked up in per-operation tables filled
//! while the new anchors are created; pads are looked up live, because pads
//! belong to devices and are never recreated by a split or paste.

use std::collections::HashMap;
use uuid::Uuid;

use crate::core::{EditError, EditResult};
use crate::model::{AnchorRef, Board, Schematic};

/// Live lookup of pads by (component, pad).
pub trait PadLookup {
    fn has_pad(&self, device: &Uuid, pad: &Uuid) -> bool;
}

impl PadLookup for Board {
    fn has_pad(&self, device: &Uuid, pad: &Uuid) -> bool {
        self.device(device).and_then(|d| d.pad(pad)).is_some()
    }
}

impl PadLookup for Schematic {
    fn has_pad(&self, device: &Uuid, pad: &Uuid) -> bool {
        self.symbol(device)
            .map(|s| s.pins.iter().any(|p| &p.uuid == pad))
            .unwrap_or(false)
    }
}

/// Identity tables of one split or paste operation.
#[derive(Debug, Clone, Default)]
pub struct AnchorMap {
    junctions: HashMap<Uuid, Uuid>,
    vias: HashMap<Uuid, Uuid>,
}

impl AnchorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_junction(&mut self, old: Uuid, new: Uuid) {
        self.junctions.insert(old, new);
    }

    pub fn insert_via(&mut self, old: Uuid, new: Uuid) {
        self.vias.insert(old, new);
    }

    pub fn resolver<'a, P: PadLookup + ?Sized>(&'a self, pads: &'a P) -> AnchorResolver<'a, P> {
        AnchorResolver { map: self, pads }
    }
}

pub struct AnchorResolver<'a, P: PadLookup + ?Sized> {
    map: &'a AnchorMap,
    pads: &'a P,
}

impl<'a, P: PadLookup + ?Sized> AnchorResolver<'a, P> {
    pub fn resolve(&self, anchor: &AnchorRef) -> Option<AnchorRef> {
        match anchor {
            AnchorRef::Junction(uuid) => self.map.junctions.get(uuid).map(|u| AnchorRef::Junction(*u)),
            AnchorRef::Via(uuid) => self.map.vias.get(uuid).map(|u| AnchorRef::Via(*u)),
            AnchorRef::Pad { device, pad } => {
                if self.pads.has_pad(device, pad) {
                    Some(*anchor)
                } else {
                    None
                }
            }
        }
    }

    /// Like [`resolve`](Self::resolve), but an unresolvable anchor is a
    /// logic fault.
    pub fn resolve_required(&self, anchor: &AnchorRef) -> EditResult<AnchorRef> {
        self.resolve(anchor)
            .ok_or(EditError::UnresolvedAnchor(*anchor))
    }
}
