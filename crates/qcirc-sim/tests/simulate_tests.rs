//! Simulation of decoded circuits.

use proptest::prelude::*;
use qcirc_ir::{CircuitGraph, Operation, QubitId, StandardGate, StepScheduler};
use qcirc_qasm::decode;
use qcirc_sim::{Simulator, probabilities, simulate};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-10
}

#[test]
fn test_bell_from_text() {
    let graph = decode("qreg q[2];\nh q[0];\ncx q[0], q[1];\nmeasure q[0] -> c[0];\n");
    let amps = simulate(&graph, None).unwrap();
    assert_eq!(amps.len(), 4);
    assert!(approx(amps[0].re, std::f64::consts::FRAC_1_SQRT_2));
    assert!(approx(amps[3].re, std::f64::consts::FRAC_1_SQRT_2));

    for p in probabilities(&amps) {
        assert!(approx(p.p0, 0.5));
        assert!(approx(p.p1, 0.5));
    }
}

#[test]
fn test_x_flips_single_qubit() {
    let graph = decode("x q[0];\n");
    let amps = simulate(&graph, None).unwrap();
    assert_eq!(amps.len(), 2);
    assert!(approx(amps[0].norm(), 0.0));
    assert!(approx(amps[1].re, 1.0));
}

#[test]
fn test_ghz_step_by_step() {
    let graph = decode("h q[0];\ncx q[0], q[1];\ncx q[1], q[2];\n");
    assert_eq!(graph.max_step(), Some(2));

    let after_h = simulate(&graph, Some(0)).unwrap();
    let marginals = probabilities(&after_h);
    assert!(approx(marginals[0].p1, 0.5));
    assert!(approx(marginals[2].p1, 0.0));

    let full = simulate(&graph, Some(2)).unwrap();
    assert!(approx(full[0b000].norm_sqr(), 0.5));
    assert!(approx(full[0b111].norm_sqr(), 0.5));
}

#[test]
fn test_reset_after_entanglement() {
    let graph = decode("h q[0];\ncx q[0], q[1];\nreset q[0];\n");
    let amps = simulate(&graph, None).unwrap();
    // Projected onto q0 = 0 and renormalized: only |00⟩ survives.
    assert!(approx(amps[0].norm_sqr(), 1.0));
}

#[test]
fn test_interference_cancels() {
    let graph = decode("h q[0];\nh q[0];\n");
    let amps = simulate(&graph, None).unwrap();
    assert!(approx(amps[0].re, 1.0));
    assert!(approx(amps[1].norm(), 0.0));
}

#[test]
fn test_probabilities_of_odd_length() {
    assert!(probabilities(&[]).is_empty());
}

fn arb_unitary(num_qubits: u32) -> impl Strategy<Value = Operation> {
    let single = prop::sample::select(vec![
        StandardGate::H,
        StandardGate::X,
        StandardGate::Y,
        StandardGate::S,
        StandardGate::T,
        StandardGate::SX,
        StandardGate::SY,
    ]);
    let rotation = prop::sample::select(vec![
        StandardGate::RX,
        StandardGate::RY,
        StandardGate::RZ,
        StandardGate::U3,
    ]);
    let two = prop::sample::select(vec![
        StandardGate::CX,
        StandardGate::CY,
        StandardGate::CZ,
        StandardGate::CH,
        StandardGate::Swap,
        StandardGate::CRY,
        StandardGate::CU1,
    ]);
    let pair = (0..num_qubits, 0..num_qubits).prop_filter("distinct", |(a, b)| a != b);

    prop_oneof![
        (single, 0..num_qubits, any::<bool>()).prop_map(|(g, q, adj)| if adj {
            Operation::adjoint(g, QubitId(q))
        } else {
            Operation::gate(g, QubitId(q))
        }),
        (rotation, 0..num_qubits, prop::collection::vec(-6.3_f64..6.3, 3))
            .prop_map(|(g, q, params)| Operation::rotation(g, QubitId(q), params)),
        (two, pair, -6.3_f64..6.3).prop_map(|(g, (c, t), theta)| {
            if g.is_parameterized() {
                Operation::controlled_param(g, QubitId(c), QubitId(t), theta)
            } else {
                Operation::controlled(g, QubitId(c), QubitId(t))
            }
        }),
    ]
}

proptest! {
    /// Unitary circuits keep the state normalized.
    #[test]
    fn test_unitaries_preserve_norm(
        ops in (1_u32..=4).prop_flat_map(|n| prop::collection::vec(arb_unitary(n), 0..30))
    ) {
        let mut graph = CircuitGraph::new();
        let mut scheduler = StepScheduler::new();
        for op in ops {
            let step = scheduler.schedule(&op);
            graph.add_node(op, step);
        }
        let state = Simulator::new().run(&graph).unwrap();
        prop_assert!((state.norm() - 1.0).abs() < 1e-9);

        for p in state.qubit_probabilities() {
            prop_assert!((p.p0 + p.p1 - 1.0).abs() < 1e-9);
        }
    }
}
