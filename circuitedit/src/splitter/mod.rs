//! Net Segment Splitter
//!
//! Partitions a working set of anchors and wires into maximal connected
//! components. The working set is whatever survives an edit (or whatever
//! part of a segment is being copied), so a wire may reference an anchor
//! that is not part of the set anymore. Such an endpoint is replaced by a
//! freshly synthesized junction at the endpoint's former position, so no
//! wire is ever lost.
//!
//! Components made of a single junction without any wire carry no
//! electrical meaning and are dropped. A lone via or pad is kept.
//!
//! The algorithm is shared between boards ([`BoardNetSegmentSplitter`]) and
//! schematics ([`SchematicNetSegmentSplitter`]); both are thin wrappers
//! around [`NetSegmentSplitter`].

pub mod board;
pub mod schematic;

pub use board::{BoardNetSegmentSplitter, BoardSegment};
pub use schematic::{SchematicNetSegmentSplitter, SchematicSegment};

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Bfs;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::model::{Anchor, AnchorRef, Junction, NetLine, Point, Trace};

/// A wire between two anchors, as seen by the splitter.
pub trait NetEdge: Clone {
    fn uuid(&self) -> Uuid;
    fn endpoints(&self) -> (AnchorRef, AnchorRef);
    fn set_endpoints(&mut self, start: AnchorRef, end: AnchorRef);
}

impl NetEdge for Trace {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn endpoints(&self) -> (AnchorRef, AnchorRef) {
        (self.start, self.end)
    }

    fn set_endpoints(&mut self, start: AnchorRef, end: AnchorRef) {
        self.start = start;
        self.end = end;
    }
}

impl NetEdge for NetLine {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn endpoints(&self) -> (AnchorRef, AnchorRef) {
        (self.start, self.end)
    }

    fn set_endpoints(&mut self, start: AnchorRef, end: AnchorRef) {
        self.start = start;
        self.end = end;
    }
}

/// One connected component.
#[derive(Debug, Clone)]
pub struct SplitSegment<E> {
    /// Anchors in input order, synthesized junctions last.
    pub anchors: Vec<Anchor>,
    /// Wires in input order, endpoints already substituted.
    pub edges: Vec<E>,
}

impl<E> SplitSegment<E> {
    pub fn contains_anchor(&self, anchor: &AnchorRef) -> bool {
        self.anchors.iter().any(|a| &a.anchor_ref() == anchor)
    }

    /// Smallest distance from `point` to any anchor of the segment.
    pub fn distance_to(&self, point: &Point) -> Option<f64> {
        self.anchors
            .iter()
            .map(|a| a.position().distance_to(point))
            .min_by(|a, b| a.total_cmp(b))
    }
}

#[derive(Debug, Clone)]
pub struct NetSegmentSplitter<E> {
    anchors: Vec<Anchor>,
    anchor_refs: HashSet<AnchorRef>,
    edges: Vec<E>,
    endpoint_positions: HashMap<AnchorRef, Point>,
}

impl<E: NetEdge> Default for NetSegmentSplitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: NetEdge> NetSegmentSplitter<E> {
    pub fn new() -> Self {
        Self {
            anchors: Vec::new(),
            anchor_refs: HashSet::new(),
            edges: Vec::new(),
            endpoint_positions: HashMap::new(),
        }
    }

    /// Add an anchor to the working set. Adding the same anchor twice has no
    /// effect.
    pub fn add_anchor(&mut self, anchor: Anchor) {
        if self.anchor_refs.insert(anchor.anchor_ref()) {
            self.anchors.push(anchor);
        }
    }

    /// Add a wire together with the current positions of its endpoints. The
    /// positions are only used if an endpoint has to be synthesized.
    pub fn add_edge(&mut self, edge: E, start_position: Point, end_position: Point) {
        let (start, end) = edge.endpoints();
        self.endpoint_positions.entry(start).or_insert(start_position);
        self.endpoint_positions.entry(end).or_insert(end_position);
        self.edges.push(edge);
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn split(&self) -> Vec<SplitSegment<E>> {
        let mut anchors = self.anchors.clone();
        let mut edges = self.edges.clone();
        self.insert_missing_anchors(&mut anchors, &mut edges);

        let index: HashMap<AnchorRef, usize> = anchors
            .iter()
            .enumerate()
            .map(|(i, a)| (a.anchor_ref(), i))
            .collect();

        let mut graph: UnGraph<usize, usize> =
            UnGraph::with_capacity(anchors.len(), edges.len());
        let nodes: Vec<NodeIndex> = (0..anchors.len()).map(|i| graph.add_node(i)).collect();
        for (i, edge) in edges.iter().enumerate() {
            let (start, end) = edge.endpoints();
            // every endpoint is in the index after insert_missing_anchors()
            if let (Some(&a), Some(&b)) = (index.get(&start), index.get(&end)) {
                graph.add_edge(nodes[a], nodes[b], i);
            }
        }

        let mut visited = vec![false; anchors.len()];
        let mut segments = Vec::new();
        for &start in &nodes {
            if visited[graph[start]] {
                continue;
            }
            let mut anchor_ids = Vec::new();
            let mut edge_ids = Vec::new();
            let mut bfs = Bfs::new(&graph, start);
            while let Some(node) = bfs.next(&graph) {
                visited[graph[node]] = true;
                anchor_ids.push(graph[node]);
                edge_ids.extend(graph.edges(node).map(|e| *e.weight()));
            }
            anchor_ids.sort_unstable();
            edge_ids.sort_unstable();
            edge_ids.dedup();

            if edge_ids.is_empty() && !anchor_ids.iter().any(|&i| anchors[i].is_standalone()) {
                tracing::debug!("Dropping floating junction {}", anchors[anchor_ids[0]].anchor_ref());
                continue;
            }
            segments.push(SplitSegment {
                anchors: anchor_ids.iter().map(|&i| anchors[i].clone()).collect(),
                edges: edge_ids.iter().map(|&i| edges[i].clone()).collect(),
            });
        }
        segments
    }

    fn insert_missing_anchors(&self, anchors: &mut Vec<Anchor>, edges: &mut [E]) {
        let mut replacements: HashMap<AnchorRef, AnchorRef> = HashMap::new();
        for edge in edges.iter_mut() {
            let (start, end) = edge.endpoints();
            let start = self.insert_missing_anchor(start, anchors, &mut replacements);
            let end = self.insert_missing_anchor(end, anchors, &mut replacements);
            edge.set_endpoints(start, end);
        }
    }

    fn insert_missing_anchor(
        &self,
        anchor: AnchorRef,
        anchors: &mut Vec<Anchor>,
        replacements: &mut HashMap<AnchorRef, AnchorRef>,
    ) -> AnchorRef {
        if let Some(replacement) = replacements.get(&anchor) {
            return *replacement;
        }
        if self.anchor_refs.contains(&anchor) {
            return anchor;
        }
        let position = self
            .endpoint_positions
            .get(&anchor)
            .copied()
            .unwrap_or_default();
        let junction = Junction::new(position);
        tracing::debug!("Replacing missing {} by junction {}", anchor, junction.uuid);
        let replacement = AnchorRef::Junction(junction.uuid);
        anchors.push(Anchor::Junction(junction));
        replacements.insert(anchor, replacement);
        replacement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PadAnchor, Via};
    use std::collections::HashSet;

    fn junction(x: f64) -> Junction {
        Junction::new(Point::new(x, 0.0))
    }

    fn trace(a: &Anchor, b: &Anchor) -> Trace {
        Trace::new("top_cu", 0.25, a.anchor_ref(), b.anchor_ref())
    }

    fn splitter(anchors: &[Anchor], traces: &[Trace]) -> NetSegmentSplitter<Trace> {
        let mut splitter = NetSegmentSplitter::new();
        for anchor in anchors {
            splitter.add_anchor(anchor.clone());
        }
        for t in traces {
            splitter.add_edge(t.clone(), Point::default(), Point::default());
        }
        splitter
    }

    /// A, B, C, D on a line with traces A-B, B-C, C-D.
    fn chain(d: Anchor) -> (Vec<Anchor>, Vec<Trace>) {
        let a = Anchor::Junction(junction(0.0));
        let b = Anchor::Junction(junction(1.0));
        let c = Anchor::Junction(junction(2.0));
        let traces = vec![trace(&a, &b), trace(&b, &c), trace(&c, &d)];
        (vec![a, b, c, d], traces)
    }

    #[test]
    fn test_connected_set_is_not_split() {
        let (anchors, traces) = chain(Anchor::Junction(junction(3.0)));
        let segments = splitter(&anchors, &traces).split();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].anchors.len(), 4);
        assert_eq!(segments[0].edges.len(), 3);
    }

    #[test]
    fn test_removed_junction_drops_floating_junction() {
        let (anchors, traces) = chain(Anchor::Junction(junction(3.0)));
        // C and its incident traces are gone
        let kept = [anchors[0].clone(), anchors[1].clone(), anchors[3].clone()];
        let segments = splitter(&kept, &traces[..1]).split();

        assert_eq!(segments.len(), 1);
        assert!(segments[0].contains_anchor(&anchors[0].anchor_ref()));
        assert!(segments[0].contains_anchor(&anchors[1].anchor_ref()));
        assert!(!segments[0].contains_anchor(&anchors[3].anchor_ref()));
        assert_eq!(segments[0].edges.len(), 1);
    }

    #[test]
    fn test_lone_via_survives() {
        let via = Via::new(Point::new(3.0, 0.0), 0.8, 0.3);
        let (anchors, traces) = chain(Anchor::Via(via.clone()));
        let kept = [anchors[0].clone(), anchors[1].clone(), anchors[3].clone()];
        let segments = splitter(&kept, &traces[..1]).split();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].anchors.len(), 2);
        assert_eq!(segments[1].anchors, vec![Anchor::Via(via)]);
        assert!(segments[1].edges.is_empty());
    }

    #[test]
    fn test_lone_pad_survives() {
        let pad = Anchor::Pad(PadAnchor {
            device: Uuid::new_v4(),
            pad: Uuid::new_v4(),
            position: Point::new(5.0, 5.0),
        });
        let segments = splitter(&[pad.clone()], &[]).split();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].anchors, vec![pad]);
    }

    #[test]
    fn test_missing_anchor_is_synthesized_once() {
        // two traces meeting at a via which is not part of the working set
        let via = Via::new(Point::new(5.0, 5.0), 0.8, 0.3);
        let a = Anchor::Junction(junction(0.0));
        let b = Anchor::Junction(junction(10.0));
        let mut splitter = NetSegmentSplitter::new();
        splitter.add_anchor(a.clone());
        splitter.add_anchor(b.clone());
        let t1 = Trace::new("top_cu", 0.25, a.anchor_ref(), AnchorRef::Via(via.uuid));
        let t2 = Trace::new("top_cu", 0.25, AnchorRef::Via(via.uuid), b.anchor_ref());
        splitter.add_edge(t1, a.position(), via.position);
        splitter.add_edge(t2, via.position, b.position());

        let segments = splitter.split();
        assert_eq!(segments.len(), 1, "Traces must stay connected");
        let seg = &segments[0];
        assert_eq!(seg.anchors.len(), 3);
        let synthesized = seg.anchors.last().expect("synthesized junction");
        assert!(matches!(synthesized, Anchor::Junction(_)));
        assert_eq!(synthesized.position(), via.position);
        assert!(seg
            .edges
            .iter()
            .all(|t| !t.is_attached_to(&AnchorRef::Via(via.uuid))));
    }

    #[test]
    fn test_duplicate_anchor_added_once() {
        let a = Anchor::Junction(junction(0.0));
        let b = Anchor::Junction(junction(1.0));
        let mut splitter = NetSegmentSplitter::new();
        splitter.add_anchor(a.clone());
        splitter.add_anchor(a.clone());
        splitter.add_anchor(b.clone());
        splitter.add_edge(trace(&a, &b), a.position(), b.position());
        assert_eq!(splitter.anchor_count(), 2);

        // known anchors are never replaced by synthesized ones
        let segments = splitter.split();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].anchors, vec![a, b]);
    }

    #[test]
    fn test_partition_property() {
        // Pseudo-random graphs, deterministic seed.
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = |m: usize| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed % m as u64) as usize
        };

        for _ in 0..50 {
            let n = 2 + next(12);
            let anchors: Vec<Anchor> = (0..n)
                .map(|i| {
                    if next(4) == 0 {
                        Anchor::Via(Via::new(Point::new(i as f64, 0.0), 0.8, 0.3))
                    } else {
                        Anchor::Junction(junction(i as f64))
                    }
                })
                .collect();
            let traces: Vec<Trace> = (0..next(2 * n))
                .map(|_| trace(&anchors[next(n)], &anchors[next(n)]))
                .collect();

            let segments = splitter(&anchors, &traces).split();

            let mut seen_anchors = HashSet::new();
            let mut seen_edges = HashSet::new();
            for seg in &segments {
                for a in &seg.anchors {
                    assert!(seen_anchors.insert(a.anchor_ref()), "anchor in two segments");
                }
                for e in &seg.edges {
                    assert!(seen_edges.insert(e.uuid), "edge in two segments");
                    assert!(seg.contains_anchor(&e.start));
                    assert!(seg.contains_anchor(&e.end));
                }
            }
            assert_eq!(seen_edges.len(), traces.len());
            for anchor in &anchors {
                let degree = traces
                    .iter()
                    .filter(|t| t.is_attached_to(&anchor.anchor_ref()))
                    .count();
                let kept = seen_anchors.contains(&anchor.anchor_ref());
                assert_eq!(kept, degree > 0 || anchor.is_standalone());
            }
        }
    }
}
