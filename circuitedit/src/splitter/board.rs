use crate::model::{Anchor, Junction, PadAnchor, Point, Trace, Via};

use super::NetSegmentSplitter;

/// A resulting board sub-segment.
#[derive(Debug, Clone, Default)]
pub struct BoardSegment {
    pub junctions: Vec<Junction>,
    pub vias: Vec<Via>,
    /// Pads the traces of this segment attach to. Pads belong to their
    /// device, not to the segment.
    pub pads: Vec<PadAnchor>,
    pub traces: Vec<Trace>,
}

impl BoardSegment {
    /// Whether the segment owns anything a net segment would store.
    pub fn has_elements(&self) -> bool {
        !(self.junctions.is_empty() && self.vias.is_empty() && self.traces.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoardNetSegmentSplitter {
    inner: NetSegmentSplitter<Trace>,
}

impl BoardNetSegmentSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_junction(&mut self, junction: Junction) {
        self.inner.add_anchor(Anchor::Junction(junction));
    }

    pub fn add_via(&mut self, via: Via) {
        self.inner.add_anchor(Anchor::Via(via));
    }

    pub fn add_pad(&mut self, pad: PadAnchor) {
        self.inner.add_anchor(Anchor::Pad(pad));
    }

    pub fn add_trace(&mut self, trace: Trace, start_position: Point, end_position: Point) {
        self.inner.add_edge(trace, start_position, end_position);
    }

    pub fn split(&self) -> Vec<BoardSegment> {
        self.inner
            .split()
            .into_iter()
            .map(|seg| {
                let mut out = BoardSegment {
                    traces: seg.edges,
                    ..Default::default()
                };
                for anchor in seg.anchors {
                    match anchor {
                        Anchor::Junction(j) => out.junctions.push(j),
                        Anchor::Via(v) => out.vias.push(v),
                        Anchor::Pad(p) => out.pads.push(p),
                    }
                }
                out
            })
            .collect()
    }
}
