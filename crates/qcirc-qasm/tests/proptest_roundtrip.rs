//! Property-based tests for text round trips.
//!
//! Tests that graph → text → graph preserves every node's kind, qubits and
//! parameters for graphs that contain no accidental fusion pattern.

use std::f64::consts::PI;

use proptest::prelude::*;
use qcirc_ir::{CircuitGraph, ClbitId, NoiseChannel, Operation, QubitId, StandardGate, StepScheduler};
use qcirc_qasm::{decode, decode_with_report, encode, format_param, parse_param};

/// Angles that exercise the π table, plain decimals and values that need an
/// exponent.
fn arb_angle() -> impl Strategy<Value = f64> {
    prop_oneof![
        (-8_i32..=8).prop_map(|k| f64::from(k) * PI / 4.0),
        -10.0_f64..10.0,
        (-1.0_f64..1.0, -300_i32..=300).prop_map(|(m, e)| m * 10_f64.powi(e)),
    ]
}

fn arb_single(num_qubits: u32) -> impl Strategy<Value = Operation> {
    let fixed = prop::sample::select(vec![
        StandardGate::I,
        StandardGate::H,
        StandardGate::X,
        StandardGate::Y,
        StandardGate::Z,
        StandardGate::S,
        StandardGate::T,
        StandardGate::SX,
    ]);
    let rotating = prop::sample::select(vec![
        StandardGate::RX,
        StandardGate::RY,
        StandardGate::RZ,
        StandardGate::P,
        StandardGate::U1,
        StandardGate::U2,
        StandardGate::U3,
    ]);
    prop_oneof![
        (fixed, 0..num_qubits, any::<bool>()).prop_map(|(gate, q, adjoint)| if adjoint {
            Operation::adjoint(gate, QubitId(q))
        } else {
            Operation::gate(gate, QubitId(q))
        }),
        (rotating, 0..num_qubits, prop::collection::vec(arb_angle(), 3)).prop_map(
            |(gate, q, mut params)| {
                params.truncate(gate.num_params());
                Operation::rotation(gate, QubitId(q), params)
            }
        ),
    ]
}

fn arb_operation(num_qubits: u32) -> impl Strategy<Value = Operation> {
    let pair = (0..num_qubits, 0..num_qubits).prop_filter("distinct qubits", |(a, b)| a != b);
    let two_qubit = prop::sample::select(vec![
        StandardGate::CX,
        StandardGate::CY,
        StandardGate::CZ,
        StandardGate::CH,
        StandardGate::Swap,
        StandardGate::CRX,
        StandardGate::CRY,
        StandardGate::CRZ,
        StandardGate::CU1,
    ]);

    prop_oneof![
        4 => arb_single(num_qubits),
        2 => (two_qubit, pair.clone(), arb_angle()).prop_map(|(gate, (c, t), theta)| {
            if gate.is_parameterized() {
                Operation::controlled_param(gate, QubitId(c), QubitId(t), theta)
            } else {
                Operation::controlled(gate, QubitId(c), QubitId(t))
            }
        }),
        1 => (0..num_qubits).prop_map(|q| Operation::Measure { qubit: QubitId(q) }),
        1 => pair.clone().prop_map(|(s, t)| Operation::MeasureControlledX {
            source: QubitId(s),
            target: QubitId(t),
        }),
        1 => (0..num_qubits).prop_map(|q| Operation::Reset { qubit: QubitId(q) }),
        1 => Just(Operation::Barrier),
        1 => (0..num_qubits, 0_u32..4, arb_angle()).prop_map(|(q, bit, theta)| {
            Operation::Conditional {
                bit: ClbitId(bit),
                op: Box::new(Operation::rotation(StandardGate::RZ, QubitId(q), vec![theta])),
            }
        }),
        1 => (0..num_qubits, prop::option::of(0.0_f64..0.5)).prop_map(|(q, p)| {
            Operation::Noise {
                channel: NoiseChannel::Depolarizing,
                target: QubitId(q),
                probability: p,
            }
        }),
    ]
}

/// A graph scheduled the way the decoder schedules.
fn arb_graph() -> impl Strategy<Value = (u32, Vec<Operation>)> {
    (3_u32..=5).prop_flat_map(|num_qubits| {
        (
            Just(num_qubits),
            prop::collection::vec(arb_operation(num_qubits), 0..=20),
        )
    })
}

fn build(num_qubits: u32, ops: &[Operation]) -> CircuitGraph {
    let mut graph = CircuitGraph::with_min_size(num_qubits, 0);
    let mut scheduler = StepScheduler::new();
    for op in ops {
        let step = scheduler.schedule(op);
        graph.add_node(op.clone(), step);
    }
    graph
}

fn same_operation(a: &Operation, b: &Operation) -> bool {
    a.label() == b.label()
        && a.qubits() == b.qubits()
        && a.classical_bit() == b.classical_bit()
        && a.is_adjoint() == b.is_adjoint()
        && a.params().len() == b.params().len()
        && a.params()
            .iter()
            .zip(b.params())
            .all(|(x, y)| (x - y).abs() <= 1e-9 * x.abs().max(1.0))
}

proptest! {
    /// decode(encode(g)) keeps count, order, kind, qubits and parameters.
    #[test]
    fn test_roundtrip_preserves_operations((num_qubits, ops) in arb_graph()) {
        let graph = build(num_qubits, &ops);
        let text = encode(&graph);
        let decoded = decode_with_report(&text);

        prop_assert!(decoded.skipped.is_empty(), "skipped: {:?}", decoded.skipped);
        prop_assert_eq!(decoded.graph.len(), graph.len());
        prop_assert_eq!(decoded.graph.qubit_count(), graph.qubit_count());

        let before = graph.nodes_by_step();
        let after = decoded.graph.nodes_by_step();
        for (a, b) in before.iter().zip(after.iter()) {
            prop_assert!(same_operation(&a.op, &b.op), "{:?} != {:?}", a.op, b.op);
            prop_assert_eq!(a.step, b.step);
        }
    }

    /// Encoding the same graph twice gives identical text, and re-encoding a
    /// decoded graph is a fixed point.
    #[test]
    fn test_encoding_is_deterministic((num_qubits, ops) in arb_graph()) {
        let graph = build(num_qubits, &ops);
        let first = encode(&graph);
        prop_assert_eq!(&first, &encode(&graph));
        prop_assert_eq!(&first, &encode(&decode(&first)));
    }

    /// Decoded graphs always satisfy the structural invariants.
    #[test]
    fn test_decoded_graph_integrity((num_qubits, ops) in arb_graph()) {
        let graph = decode(&encode(&build(num_qubits, &ops)));
        prop_assert!(graph.verify_integrity().is_ok());
    }

    /// Formatted parameters parse back to the same value.
    #[test]
    fn test_format_param_roundtrip(value in arb_angle()) {
        let parsed = parse_param(&format_param(value)).unwrap();
        prop_assert!(
            (parsed - value).abs() <= 1e-9 * value.abs().max(1.0),
            "{} -> {}",
            value,
            parsed
        );
    }

    /// The decoder never panics on arbitrary input.
    #[test]
    fn test_decode_arbitrary_text(text in "[ -~\n]{0,200}") {
        let decoded = decode_with_report(&text);
        prop_assert!(decoded.graph.verify_integrity().is_ok());
    }
}
