//! Text to graph.
//!
//! Decoding is lenient: a line that cannot be parsed or lowered is skipped
//! and recorded in the [`Decoded`] report, and the remaining lines still
//! build the graph.
//!
//! # Measurement fusion
//!
//! A `measure` line immediately followed by `if (<bit>==1) x <qubit>;`, where
//! `<bit>` resolves to the bit just written and `<qubit>` differs from the
//! measured one, decodes as a single measurement-controlled X. Only the raw
//! next line is inspected: a blank line, a comment or any other statement in
//! between prevents fusion. The encoder writes the same two lines for a fused
//! node, so a separately authored measure and conditional X written back to
//! back also come out fused.

use qcirc_ir::{CircuitGraph, ClbitId, NoiseChannel, Operation, QubitId, StandardGate, StepScheduler};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::ast::{Application, NoiseAnnotation, RegRef, Statement};
use crate::error::{ParseError, ParseResult};
use crate::parser::{parse_line, parse_noise_comment};

/// A line the decoder could not use.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line: usize,
    /// The trimmed line text.
    pub text: String,
    /// Why it was skipped.
    pub reason: ParseError,
}

/// Result of a decode: the graph plus every line that was skipped.
#[derive(Debug, Clone)]
pub struct Decoded {
    /// The decoded graph.
    pub graph: CircuitGraph,
    /// Lines left out of the graph.
    pub skipped: Vec<SkippedLine>,
}

/// Decode text into a graph, skipping lines that cannot be used.
pub fn decode(source: &str) -> CircuitGraph {
    decode_with_report(source).graph
}

/// Decode text into a graph and report skipped lines.
pub fn decode_with_report(source: &str) -> Decoded {
    let lines: Vec<&str> = source.lines().map(str::trim).collect();
    let mut decoder = Decoder::default();

    let mut i = 0;
    while i < lines.len() {
        let line = i + 1;
        let text = lines[i];
        i += 1;

        if text.is_empty() {
            continue;
        }

        if let Some(comment) = text.strip_prefix("//") {
            match parse_noise_comment(comment, line).and_then(|n| decoder.lower_noise(&n)) {
                Ok(op) => decoder.place(op),
                Err(ParseError::NotNoise) => {}
                Err(reason) => decoder.skip(line, text, reason),
            }
            continue;
        }

        let statement = match parse_line(text, line) {
            Ok(Some(statement)) => statement,
            Ok(None) => continue,
            Err(reason) => {
                decoder.skip(line, text, reason);
                continue;
            }
        };

        if let Statement::Measure { qubit, bit } = &statement {
            if let Some(fused) = lines.get(i).and_then(|next| decoder.fuse(qubit, bit, next, i + 1)) {
                decoder.place(fused);
                i += 1;
                continue;
            }
        }

        match decoder.lower(statement) {
            Ok(Some(op)) => decoder.place(op),
            Ok(None) => {}
            Err(reason) => decoder.skip(line, text, reason),
        }
    }

    debug!(
        nodes = decoder.graph.len(),
        qubits = decoder.graph.qubit_count(),
        skipped = decoder.skipped.len(),
        "decoded circuit"
    );

    Decoded {
        graph: decoder.graph,
        skipped: decoder.skipped,
    }
}

/// Declared registers, each mapped to a contiguous range of the flat index
/// space in declaration order.
#[derive(Debug, Default)]
struct RegisterMap {
    offsets: FxHashMap<String, u32>,
    total: u32,
}

impl RegisterMap {
    /// Declare a register and return the new total size.
    fn declare(&mut self, name: &str, size: u32) -> u32 {
        self.offsets.insert(name.to_string(), self.total);
        self.total = self.total.saturating_add(size);
        self.total
    }

    fn offset(&self, name: &str) -> Option<u32> {
        self.offsets.get(name).copied()
    }
}

#[derive(Debug, Default)]
struct Decoder {
    graph: CircuitGraph,
    scheduler: StepScheduler,
    qregs: RegisterMap,
    cregs: RegisterMap,
    skipped: Vec<SkippedLine>,
}

impl Decoder {
    fn place(&mut self, op: Operation) {
        let step = self.scheduler.schedule(&op);
        self.graph.add_node(op, step);
    }

    fn skip(&mut self, line: usize, text: &str, reason: ParseError) {
        debug!(line, reason = %reason, "skipping line");
        self.skipped.push(SkippedLine {
            line,
            text: text.to_string(),
            reason,
        });
    }

    /// Resolve a qubit operand. Undeclared registers use the raw index.
    fn resolve_qubit(&self, operand: &RegRef) -> ParseResult<QubitId> {
        let index = operand
            .index
            .ok_or_else(|| ParseError::MissingIndex(operand.register.clone()))?;
        let offset = self.qregs.offset(&operand.register).unwrap_or(0);
        offset
            .checked_add(index)
            .map(QubitId)
            .ok_or(ParseError::IndexOutOfRange(u64::from(index)))
    }

    /// Resolve a classical-bit reference.
    ///
    /// A declared register maps to its offset plus the index. An undeclared
    /// register spelled `c<N>` maps to bit `N` and ignores the index; anything
    /// else undeclared maps to the index alone.
    fn resolve_clbit(&self, bit: &RegRef) -> ClbitId {
        let index = bit.index.unwrap_or(0);
        if let Some(offset) = self.cregs.offset(&bit.register) {
            return ClbitId(offset.saturating_add(index));
        }
        let numbered = bit
            .register
            .strip_prefix('c')
            .and_then(|n| n.parse::<u32>().ok());
        ClbitId(numbered.unwrap_or(index))
    }

    /// Try to fuse a measurement with the line that follows it.
    fn fuse(&self, qubit: &RegRef, bit: &RegRef, next: &str, line: usize) -> Option<Operation> {
        let Ok(Some(Statement::Conditional { bit: cond, apply, .. })) = parse_line(next, line) else {
            return None;
        };
        if apply.name != "x" || apply.operands.len() != 1 {
            return None;
        }
        if apply.params.as_ref().is_some_and(|p| !p.is_empty()) {
            return None;
        }
        if self.resolve_clbit(&cond) != self.resolve_clbit(bit) {
            return None;
        }

        let source = self.resolve_qubit(qubit).ok()?;
        let target = self.resolve_qubit(&apply.operands[0]).ok()?;
        if source == target {
            return None;
        }
        debug!(line, %source, %target, "fused measurement with conditional x");
        Some(Operation::MeasureControlledX { source, target })
    }

    /// Lower a statement. Declarations return `None` after updating the
    /// register maps.
    fn lower(&mut self, statement: Statement) -> ParseResult<Option<Operation>> {
        let op = match statement {
            Statement::Version(_) | Statement::Include(_) => return Ok(None),
            Statement::QReg { name, size } => {
                let total = self.qregs.declare(&name, size);
                self.graph.reserve_qubits(total);
                return Ok(None);
            }
            Statement::CReg { name, size } => {
                let total = self.cregs.declare(&name, size);
                self.graph.reserve_clbits(total);
                return Ok(None);
            }
            Statement::Reset(qubit) => Operation::Reset {
                qubit: self.resolve_qubit(&qubit)?,
            },
            Statement::Barrier(_) => Operation::Barrier,
            Statement::Measure { qubit, .. } => Operation::Measure {
                qubit: self.resolve_qubit(&qubit)?,
            },
            Statement::Conditional { bit, value, apply } => {
                if value != 1 {
                    debug!(value, "conditional value other than 1 treated as 1");
                }
                Operation::Conditional {
                    bit: self.resolve_clbit(&bit),
                    op: Box::new(self.lower_application(&apply)?),
                }
            }
            Statement::Apply(apply) => self.lower_application(&apply)?,
        };
        Ok(Some(op))
    }

    /// Lower a gate application through the gate catalog. The operand count
    /// selects single-qubit, two-qubit or multi-controlled lowering.
    fn lower_application(&self, apply: &Application) -> ParseResult<Operation> {
        let qubits = apply
            .operands
            .iter()
            .map(|operand| self.resolve_qubit(operand))
            .collect::<ParseResult<Vec<_>>>()?;

        for (i, q) in qubits.iter().enumerate() {
            if qubits[..i].contains(q) {
                return Err(ParseError::DuplicateQubit(q.0));
            }
        }

        let name = apply.name.to_ascii_lowercase();
        let params = apply.params.clone().unwrap_or_default();

        match qubits.as_slice() {
            [] => Err(ParseError::WrongQubitCount {
                gate: name,
                expected: 1,
                got: 0,
            }),
            [target] => lower_single(&name, params, *target),
            [control, target] => lower_two(&name, params, *control, *target),
            [controls @ .., target] => {
                let gate = name
                    .strip_prefix(&"c".repeat(controls.len()))
                    .and_then(StandardGate::from_name)
                    .filter(|g| g.num_qubits() == 1 && !g.is_parameterized())
                    .ok_or_else(|| ParseError::UnknownGate(name.clone()))?;
                reject_params(&name, &params, 0)?;
                Ok(Operation::MultiControlled {
                    gate,
                    controls: controls.to_vec(),
                    target: *target,
                })
            }
        }
    }

    fn lower_noise(&self, noise: &NoiseAnnotation) -> ParseResult<Operation> {
        Ok(Operation::Noise {
            channel: NoiseChannel::from_name(&noise.channel),
            target: self.resolve_qubit(&noise.qubit)?,
            probability: noise.param,
        })
    }
}

fn lower_single(name: &str, params: Vec<f64>, target: QubitId) -> ParseResult<Operation> {
    let (gate, adjoint) = match StandardGate::from_name(name) {
        Some(gate) => (gate, false),
        None => name
            .strip_suffix("dg")
            .and_then(StandardGate::from_name)
            .filter(StandardGate::has_adjoint)
            .map(|gate| (gate, true))
            .ok_or_else(|| ParseError::UnknownGate(name.to_string()))?,
    };

    if gate.num_qubits() != 1 {
        return Err(ParseError::WrongQubitCount {
            gate: name.to_string(),
            expected: gate.num_qubits() as usize,
            got: 1,
        });
    }

    if gate.is_parameterized() {
        reject_params(name, &params, gate.num_params())?;
        Ok(Operation::Rotation {
            gate,
            target,
            params,
        })
    } else {
        reject_params(name, &params, 0)?;
        Ok(Operation::Gate {
            gate,
            target,
            adjoint,
        })
    }
}

fn lower_two(
    name: &str,
    params: Vec<f64>,
    control: QubitId,
    target: QubitId,
) -> ParseResult<Operation> {
    let gate = StandardGate::from_name(name)
        .ok_or_else(|| ParseError::UnknownGate(name.to_string()))?;
    if gate.num_qubits() != 2 {
        return Err(ParseError::WrongQubitCount {
            gate: name.to_string(),
            expected: gate.num_qubits() as usize,
            got: 2,
        });
    }
    reject_params(name, &params, gate.num_params())?;
    Ok(Operation::Controlled {
        gate,
        control,
        target,
        param: params
            .first()
            .copied()
            .or_else(|| gate.is_parameterized().then_some(0.0)),
    })
}

/// Fail when more than `max` parameters were supplied.
fn reject_params(name: &str, params: &[f64], max: usize) -> ParseResult<()> {
    if params.len() > max {
        return Err(ParseError::WrongParameterCount {
            gate: name.to_string(),
            expected: max,
            got: params.len(),
        });
    }
    Ok(())
}
