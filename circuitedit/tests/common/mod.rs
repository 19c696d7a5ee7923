//! Shared board fixtures for the integration tests

#![allow(dead_code)]

use circuitedit::prelude::*;
use std::collections::BTreeSet;
use uuid::Uuid;

pub const LAYER: &str = "top_cu";

/// A board with one net class, one `GND` net signal and library entries
/// for a two-pad device.
pub struct Fixture {
    pub board: Board,
    pub gnd: Uuid,
    pub lib_device: Uuid,
    pub lib_package: Uuid,
}

impl Fixture {
    pub fn new() -> Self {
        let mut board = Board::new("fixture");
        let class = NetClass::new("default");
        let gnd = NetSignal::new("GND", class.uuid);
        let package = LibPackage {
            uuid: Uuid::new_v4(),
            name: "R0603".to_string(),
        };
        let device = LibDevice {
            uuid: Uuid::new_v4(),
            name: "Resistor".to_string(),
            package: package.uuid,
        };
        let gnd_uuid = gnd.uuid;
        let (lib_device, lib_package) = (device.uuid, package.uuid);
        board.circuit.net_classes.push(class);
        board.circuit.net_signals.push(gnd);
        board.library.devices.push(device);
        board.library.packages.push(package);
        Self {
            board,
            gnd: gnd_uuid,
            lib_device,
            lib_package,
        }
    }

    /// Place a device with pads at `position ± (1, 0)`. Returns the
    /// component and the two pad ids.
    pub fn add_device(&mut self, name: &str, position: Point) -> (Uuid, Uuid, Uuid) {
        let component = ComponentInstance::new(name);
        let (pad1, pad2) = (Uuid::new_v4(), Uuid::new_v4());
        self.board.devices.push(Device {
            component: component.uuid,
            lib_device: self.lib_device,
            lib_footprint: Uuid::new_v4(),
            position,
            rotation: 0.0,
            mirrored: false,
            pads: vec![
                FootprintPad {
                    uuid: pad1,
                    offset: Point::new(-1.0, 0.0),
                },
                FootprintPad {
                    uuid: pad2,
                    offset: Point::new(1.0, 0.0),
                },
            ],
            stroke_texts: vec![StrokeText {
                uuid: Uuid::new_v4(),
                layer: LAYER.to_string(),
                text: name.to_string(),
                position: position + Point::new(0.0, 2.0),
                height: 1.0,
            }],
        });
        let uuid = component.uuid;
        self.board.circuit.components.push(component);
        (uuid, pad1, pad2)
    }

    pub fn push_segment(&mut self, segment: NetSegment) -> Uuid {
        let uuid = segment.uuid;
        self.board.net_segments.push(segment);
        uuid
    }
}

pub fn trace(start: AnchorRef, end: AnchorRef) -> Trace {
    Trace::new(LAYER, 0.25, start, end)
}

pub fn junction_trace(a: &Junction, b: &Junction) -> Trace {
    trace(AnchorRef::Junction(a.uuid), AnchorRef::Junction(b.uuid))
}

/// A straight chain of junctions `A–B–C–D` on the `GND` net.
pub struct Chain {
    pub segment: Uuid,
    pub junctions: [Junction; 4],
    pub traces: [Trace; 3],
}

pub fn chain(fixture: &mut Fixture) -> Chain {
    let junctions = [0.0, 10.0, 20.0, 30.0].map(|x| Junction::new(Point::new(x, 0.0)));
    let traces = [
        junction_trace(&junctions[0], &junctions[1]),
        junction_trace(&junctions[1], &junctions[2]),
        junction_trace(&junctions[2], &junctions[3]),
    ];
    let mut segment = NetSegment::new(fixture.gnd);
    segment.junctions.extend(junctions);
    segment.traces.extend(traces.iter().cloned());
    let uuid = fixture.push_segment(segment);
    Chain {
        segment: uuid,
        junctions,
        traces,
    }
}

/// Id-independent description of the wiring of a board: for every segment
/// the set of its traces, each given by the positions of its endpoints.
pub fn topology(board: &Board) -> BTreeSet<Vec<String>> {
    board
        .net_segments
        .iter()
        .map(|segment| {
            let mut wires: Vec<String> = segment
                .traces
                .iter()
                .map(|t| {
                    let a = board.anchor_position(segment, &t.start);
                    let b = board.anchor_position(segment, &t.end);
                    format!("{:?}-{:?}", a, b)
                })
                .collect();
            wires.extend(segment.vias.iter().map(|v| format!("via {:?}", v.position)));
            wires.sort();
            wires
        })
        .collect()
}

/// Every trace of every segment ends at an anchor that exists.
pub fn assert_connected(board: &Board) {
    for segment in &board.net_segments {
        for trace in &segment.traces {
            for anchor in [&trace.start, &trace.end] {
                assert!(
                    board.anchor_position(segment, anchor).is_some(),
                    "trace {} of segment {} has dangling endpoint {}",
                    trace.uuid,
                    segment.uuid,
                    anchor
                );
            }
        }
    }
}
