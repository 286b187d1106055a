//! Graph to text.

use std::fmt::Write;

use qcirc_ir::{CircuitGraph, GateNode, Operation, QubitId};

use crate::param::{format_param, format_params};

/// Encode a graph as `OpenQASM` 2.0 source.
///
/// Output is deterministic: nodes are written in ascending step order with
/// ties in insertion order, one line per node (two for a fused
/// measurement).
pub fn encode(graph: &CircuitGraph) -> String {
    let mut emitter = Emitter::new();
    emitter.emit_header();
    emitter.emit_registers(graph.qubit_count(), graph.clbit_count());
    for node in graph.nodes_by_step() {
        emitter.emit_node(node);
    }
    emitter.finish()
}

/// Incremental writer for the text form.
///
/// Barriers span the whole quantum register declared by
/// [`emit_registers`](Self::emit_registers), or `q[0]` when no register has
/// been declared.
#[derive(Debug, Default)]
pub struct Emitter {
    output: String,
    num_qubits: u32,
}

impl Emitter {
    /// Create an empty emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the version and include lines followed by a blank line.
    pub fn emit_header(&mut self) {
        self.writeln("OPENQASM 2.0;");
        self.writeln("include \"qelib1.inc\";");
        self.writeln("");
    }

    /// Write the register declarations followed by a blank line.
    ///
    /// Both registers are declared with at least one element.
    pub fn emit_registers(&mut self, num_qubits: u32, num_clbits: u32) {
        self.num_qubits = num_qubits.max(1);
        self.writeln(&format!("qreg q[{}];", self.num_qubits));
        self.writeln(&format!("creg c[{}];", num_clbits.max(1)));
        self.writeln("");
    }

    /// Write the statement(s) for one node.
    pub fn emit_node(&mut self, node: &GateNode) {
        match &node.op {
            Operation::Barrier => {
                let register: Vec<QubitId> = (0..self.num_qubits.max(1)).map(QubitId).collect();
                let qubits = self.emit_qubits(&register);
                self.writeln(&format!("barrier {qubits};"));
            }
            Operation::Noise {
                channel,
                target,
                probability,
            } => {
                let mut line = format!("// noise {channel} q[{}]", target.0);
                if let Some(p) = probability {
                    let _ = write!(line, " param={}", format_param(*p));
                }
                self.writeln(&line);
            }
            Operation::MeasureControlledX { source, target } => {
                self.writeln(&format!("measure q[{0}] -> c[{0}];", source.0));
                self.writeln(&format!("if (c[{}]==1) x q[{}];", source.0, target.0));
            }
            Operation::Conditional { bit, op } => {
                let inner = self.statement(op);
                self.writeln(&format!("if (c[{}]==1) {inner}", bit.0));
            }
            op => {
                let statement = self.statement(op);
                self.writeln(&statement);
            }
        }
    }

    /// Take the text written so far.
    pub fn finish(self) -> String {
        self.output
    }

    /// One-line statement for an operation.
    #[allow(clippy::unused_self)]
    fn statement(&self, op: &Operation) -> String {
        match op {
            Operation::Gate { target, .. } => format!("{} q[{}];", op.name(), target.0),
            Operation::Rotation {
                gate,
                target,
                params,
            } => {
                let padded: Vec<f64> = (0..gate.num_params().max(params.len()))
                    .map(|i| params.get(i).copied().unwrap_or(0.0))
                    .collect();
                format!("{}({}) q[{}];", op.name(), format_params(&padded), target.0)
            }
            Operation::Controlled {
                gate,
                control,
                target,
                param,
            } => {
                if gate.is_parameterized() {
                    format!(
                        "{}({}) q[{}], q[{}];",
                        op.name(),
                        format_param(param.unwrap_or(0.0)),
                        control.0,
                        target.0
                    )
                } else {
                    format!("{} q[{}], q[{}];", op.name(), control.0, target.0)
                }
            }
            Operation::MultiControlled {
                controls, target, ..
            } => {
                let mut qubits = controls.clone();
                qubits.push(*target);
                format!("{} {};", op.name(), self.emit_qubits(&qubits))
            }
            Operation::Measure { qubit } => format!("measure q[{0}] -> c[{0}];", qubit.0),
            Operation::Reset { qubit } => format!("reset q[{}];", qubit.0),
            Operation::MeasureControlledX { source, target } => {
                format!("measure q[{0}] -> c[{0}]; if (c[{0}]==1) x q[{1}];", source.0, target.0)
            }
            Operation::Barrier => "barrier;".into(),
            Operation::Conditional { bit, op } => {
                format!("if (c[{}]==1) {}", bit.0, self.statement(op))
            }
            Operation::Noise { channel, target, .. } => {
                format!("// noise {channel} q[{}]", target.0)
            }
        }
    }

    #[allow(clippy::unused_self)]
    fn emit_qubits(&self, qubits: &[QubitId]) -> String {
        qubits
            .iter()
            .map(|q| format!("q[{}]", q.0))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcirc_ir::{ClbitId, NoiseChannel, StandardGate};
    use std::f64::consts::PI;

    const HEADER: &str = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\n\n";

    fn body(graph: &CircuitGraph) -> Vec<String> {
        encode(graph)
            .lines()
            .skip(6)
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_empty_graph() {
        let text = encode(&CircuitGraph::new());
        assert_eq!(text, format!("{HEADER}qreg q[1];\ncreg c[1];\n\n"));
    }

    #[test]
    fn test_bell_pair() {
        let mut graph = CircuitGraph::new();
        graph.add_gate(StandardGate::H, QubitId(0), 0);
        graph.add_controlled(StandardGate::CX, QubitId(0), QubitId(1), None, 1);
        graph.add_measure(QubitId(0), 2);
        graph.add_measure(QubitId(1), 2);

        assert_eq!(
            encode(&graph),
            format!(
                "{HEADER}qreg q[2];\ncreg c[2];\n\nh q[0];\ncx q[0], q[1];\n\
                 measure q[0] -> c[0];\nmeasure q[1] -> c[1];\n"
            )
        );
    }

    #[test]
    fn test_grouped_by_step() {
        let mut graph = CircuitGraph::new();
        graph.add_gate(StandardGate::X, QubitId(0), 1);
        graph.add_gate(StandardGate::H, QubitId(1), 0);
        graph.add_gate(StandardGate::Z, QubitId(2), 1);
        assert_eq!(body(&graph), vec!["h q[1];", "x q[0];", "z q[2];"]);
    }

    #[test]
    fn test_gate_lowering() {
        let mut graph = CircuitGraph::new();
        graph.add_adjoint(StandardGate::T, QubitId(0), 0);
        graph.add_rotation(StandardGate::RX, QubitId(1), vec![PI / 2.0], 0);
        graph.add_rotation(StandardGate::U3, QubitId(2), vec![PI], 0);
        graph.add_controlled(StandardGate::CRZ, QubitId(0), QubitId(1), Some(-PI / 4.0), 1);
        graph.add_controlled(StandardGate::CU1, QubitId(1), QubitId(2), None, 2);
        graph.add_toffoli(QubitId(0), QubitId(1), QubitId(2), 3);
        graph.add_multi_controlled(
            StandardGate::Z,
            vec![QubitId(0), QubitId(1), QubitId(2)],
            QubitId(3),
            4,
        );
        graph.add_reset(QubitId(3), 5);

        assert_eq!(
            body(&graph),
            vec![
                "tdg q[0];",
                "rx(pi/2) q[1];",
                "u3(pi, 0, 0) q[2];",
                "crz(-pi/4) q[0], q[1];",
                "cu1(0) q[1], q[2];",
                "ccx q[0], q[1], q[2];",
                "cccz q[0], q[1], q[2], q[3];",
                "reset q[3];",
            ]
        );
    }

    #[test]
    fn test_measurement_and_conditionals() {
        let mut graph = CircuitGraph::new();
        graph.add_measure_x(QubitId(0), QubitId(1), 0);
        graph
            .add_conditional(ClbitId(2), Operation::rotation(StandardGate::RY, QubitId(1), vec![0.5]), 1)
            .unwrap();

        let text = encode(&graph);
        assert!(text.contains("qreg q[2];\ncreg c[3];"));
        assert_eq!(
            body(&graph),
            vec![
                "measure q[0] -> c[0];",
                "if (c[0]==1) x q[1];",
                "if (c[2]==1) ry(0.5) q[1];",
            ]
        );
    }

    #[test]
    fn test_barrier_and_noise() {
        let mut graph = CircuitGraph::with_min_size(3, 0);
        graph.add_gate(StandardGate::H, QubitId(0), 0);
        graph.add_barrier(1);
        graph.add_noise(NoiseChannel::Depolarizing, QubitId(2), Some(0.01), 2);
        graph.add_noise(NoiseChannel::PhaseFlip, QubitId(1), None, 3);

        assert_eq!(
            body(&graph),
            vec![
                "h q[0];",
                "barrier q[0], q[1], q[2];",
                "// noise depolarizing q[2] param=0.01",
                "// noise phase_flip q[1]",
            ]
        );
    }

    #[test]
    fn test_barrier_spans_register_at_encode_time() {
        let mut graph = CircuitGraph::new();
        graph.add_gate(StandardGate::H, QubitId(0), 0);
        graph.add_barrier(1);
        graph.add_gate(StandardGate::H, QubitId(2), 2);

        let text = encode(&graph);
        assert!(text.contains("qreg q[3];"));
        assert_eq!(body(&graph), vec!["h q[0];", "barrier q[0], q[1], q[2];", "h q[2];"]);
    }

    #[test]
    fn test_barrier_on_empty_register() {
        let mut graph = CircuitGraph::new();
        graph.add_barrier(0);
        assert_eq!(body(&graph), vec!["barrier q[0];"]);
    }
}
