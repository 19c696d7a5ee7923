use crate::model::{Anchor, Junction, NetLabel, NetLine, PadAnchor, Point};

use super::{NetSegmentSplitter, SplitSegment};

#[derive(Debug, Clone, Default)]
pub struct SchematicSegment {
    pub junctions: Vec<Junction>,
    /// Symbol pins the net lines of this segment attach to.
    pub pins: Vec<PadAnchor>,
    pub netlines: Vec<NetLine>,
    pub netlabels: Vec<NetLabel>,
}

impl SchematicSegment {
    pub fn has_elements(&self) -> bool {
        !(self.junctions.is_empty() && self.netlines.is_empty())
    }
}

/// Schematic variant of the splitter. Net labels follow the sub-segment
/// with the anchor nearest to the label; the first sub-segment wins ties.
#[derive(Debug, Clone, Default)]
pub struct SchematicNetSegmentSplitter {
    inner: NetSegmentSplitter<NetLine>,
    netlabels: Vec<NetLabel>,
}

impl SchematicNetSegmentSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_junction(&mut self, junction: Junction) {
        self.inner.add_anchor(Anchor::Junction(junction));
    }

    pub fn add_pin(&mut self, pin: PadAnchor) {
        self.inner.add_anchor(Anchor::Pad(pin));
    }

    pub fn add_netline(&mut self, netline: NetLine, start_position: Point, end_position: Point) {
        self.inner.add_edge(netline, start_position, end_position);
    }

    pub fn add_netlabel(&mut self, netlabel: NetLabel) {
        self.netlabels.push(netlabel);
    }

    /// Labels are dropped if nothing is left to attach them to.
    pub fn split(&self) -> Vec<SchematicSegment> {
        let segments = self.inner.split();
        let mut out: Vec<SchematicSegment> = segments
            .iter()
            .map(|seg| {
                let mut s = SchematicSegment {
                    netlines: seg.edges.clone(),
                    ..Default::default()
                };
                for anchor in &seg.anchors {
                    match anchor {
                        Anchor::Junction(j) => s.junctions.push(*j),
                        Anchor::Pad(p) => s.pins.push(*p),
                        Anchor::Via(_) => {}
                    }
                }
                s
            })
            .collect();

        for label in &self.netlabels {
            match nearest_segment(&label.position, &segments) {
                Some(i) => out[i].netlabels.push(label.clone()),
                None => tracing::debug!("Dropping net label {}: no segment left", label.uuid),
            }
        }
        out
    }
}

fn nearest_segment<E>(position: &Point, segments: &[SplitSegment<E>]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, seg) in segments.iter().enumerate() {
        let Some(distance) = seg.distance_to(position) else {
            continue;
        };
        // strict comparison keeps the first segment on ties
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}
