use circuitedit::prelude::*;
use circuitedit::BoardNetSegmentSplitter;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// A ladder of `n` rungs: two rails of junctions joined at every step.
fn ladder(n: usize) -> (Vec<Junction>, Vec<Trace>) {
    let mut junctions: Vec<Junction> = Vec::with_capacity(2 * n);
    let mut traces = Vec::with_capacity(3 * n);
    for i in 0..n {
        let x = i as f64;
        let top = Junction::new(Point::new(x, 0.0));
        let bottom = Junction::new(Point::new(x, 1.0));
        traces.push(Trace::new(
            "top_cu",
            0.2,
            AnchorRef::Junction(top.uuid),
            AnchorRef::Junction(bottom.uuid),
        ));
        if i > 0 {
            let prev_top = junctions[2 * (i - 1)];
            let prev_bottom = junctions[2 * (i - 1) + 1];
            for (a, b) in [(prev_top, top), (prev_bottom, bottom)] {
                traces.push(Trace::new(
                    "top_cu",
                    0.2,
                    AnchorRef::Junction(a.uuid),
                    AnchorRef::Junction(b.uuid),
                ));
            }
        }
        junctions.push(top);
        junctions.push(bottom);
    }
    (junctions, traces)
}

fn bench_split_ladder(c: &mut Criterion) {
    let (junctions, traces) = ladder(500);
    let positions: std::collections::HashMap<_, _> =
        junctions.iter().map(|j| (AnchorRef::Junction(j.uuid), j.position)).collect();

    c.bench_function("split_ladder_500", |b| {
        b.iter(|| {
            let mut splitter = BoardNetSegmentSplitter::new();
            for junction in &junctions {
                splitter.add_junction(*junction);
            }
            // drop every seventh trace to cut the ladder into pieces
            for (_, trace) in traces.iter().enumerate().filter(|(i, _)| i % 7 != 0) {
                splitter.add_trace(trace.clone(), positions[&trace.start], positions[&trace.end]);
            }
            black_box(splitter.split())
        });
    });
}

fn bench_split_missing_anchors(c: &mut Criterion) {
    let (junctions, traces) = ladder(500);
    let positions: std::collections::HashMap<_, _> =
        junctions.iter().map(|j| (AnchorRef::Junction(j.uuid), j.position)).collect();

    c.bench_function("split_synthesize_500", |b| {
        b.iter(|| {
            let mut splitter = BoardNetSegmentSplitter::new();
            // no anchors at all: every endpoint gets synthesized
            for trace in &traces {
                splitter.add_trace(trace.clone(), positions[&trace.start], positions[&trace.end]);
            }
            black_box(splitter.split())
        });
    });
}

criterion_group!(benches, bench_split_ladder, bench_split_missing_anchors);
criterion_main!(benches);
