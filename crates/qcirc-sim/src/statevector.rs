//! Statevector simulation engine.
//!
//! Amplitude index `i` is the basis state whose qubit `q` value is bit `q`
//! of `i`. Every transform walks the pairs of indices that differ only in the
//! target bit, optionally restricted to indices whose control bits are set.

use std::collections::BTreeMap;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

use num_complex::Complex64;
use qcirc_ir::{Operation, StandardGate};
use rand::Rng;
use serde::Serialize;
use tracing::{trace, warn};

use crate::error::{SimError, SimResult};

/// A 2×2 complex matrix, row major.
pub type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Marginal probabilities of one qubit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QubitProbability {
    /// Probability of reading 0.
    pub p0: f64,
    /// Probability of reading 1.
    pub p1: f64,
}

/// One basis state with non-negligible weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasisState {
    /// Index into the amplitude array.
    pub index: usize,
    /// Qubit values, qubit 0 first.
    pub bits: String,
    /// The complex amplitude.
    pub amplitude: Complex64,
    /// `|amplitude|²`.
    pub probability: f64,
    /// Argument of the amplitude in `(-π, π]`.
    pub phase: f64,
    /// Number of qubits reading 1.
    pub hamming_weight: u32,
}

/// A statevector representing a quantum state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![ZERO; size];
        amplitudes[0] = ONE;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Wrap an existing amplitude array. The length must be a power of two.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        if !amplitudes.len().is_power_of_two() {
            return Err(SimError::InvalidLength(amplitudes.len()));
        }
        let num_qubits = amplitudes.len().trailing_zeros() as usize;
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consume the statevector, returning its amplitudes.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Apply one operation.
    ///
    /// Measurements, fused measurements, classically controlled operations,
    /// barriers and noise annotations leave the state untouched. Operations
    /// naming a qubit outside the state are skipped.
    pub fn apply(&mut self, op: &Operation) {
        if let Some(q) = op.qubits().iter().find(|q| q.index() >= self.num_qubits) {
            warn!(qubit = %q, num_qubits = self.num_qubits, "operation outside state, skipped");
            return;
        }
        trace!(op = %op.label(), qubits = ?op.qubits(), "apply");

        match op {
            Operation::Gate {
                gate,
                target,
                adjoint,
            } => self.apply_fixed(*gate, target.index(), *adjoint),
            Operation::Rotation { gate, target, .. } => {
                let q = target.index();
                match gate {
                    StandardGate::RX => self.apply_rx(q, op.param(0)),
                    StandardGate::RY => self.apply_ry(q, op.param(0)),
                    StandardGate::RZ => self.apply_rz(q, op.param(0)),
                    StandardGate::P | StandardGate::U1 => self.apply_phase(q, op.param(0)),
                    _ => {
                        let params = [op.param(0), op.param(1), op.param(2)];
                        if let Some(m) = matrix(*gate, &params, false) {
                            self.apply_single(q, &m);
                        }
                    }
                }
            }
            Operation::Controlled {
                gate,
                control,
                target,
                param,
            } => {
                let (c, t) = (control.index(), target.index());
                match gate {
                    StandardGate::CX => self.apply_cx(c, t),
                    StandardGate::CZ => self.apply_cz(c, t),
                    StandardGate::Swap => self.apply_swap(c, t),
                    _ => {
                        let theta = param.unwrap_or(0.0);
                        if let Some(m) = gate.base().and_then(|b| matrix(b, &[theta], false)) {
                            self.apply_controlled(&[c], t, &m);
                        }
                    }
                }
            }
            Operation::MultiControlled {
                gate,
                controls,
                target,
            } => {
                if let Some(m) = matrix(*gate, &[], false) {
                    let controls: Vec<usize> = controls.iter().map(|q| q.index()).collect();
                    self.apply_controlled(&controls, target.index(), &m);
                }
            }
            Operation::Reset { qubit } => self.reset(qubit.index()),
            Operation::Measure { .. }
            | Operation::MeasureControlledX { .. }
            | Operation::Barrier
            | Operation::Conditional { .. }
            | Operation::Noise { .. } => {}
        }
    }

    fn apply_fixed(&mut self, gate: StandardGate, qubit: usize, adjoint: bool) {
        match gate {
            StandardGate::I => {}
            StandardGate::H => self.apply_h(qubit),
            StandardGate::X => self.apply_x(qubit),
            StandardGate::Y => self.apply_y(qubit),
            StandardGate::Z => self.apply_z(qubit),
            StandardGate::S if adjoint => self.apply_sdg(qubit),
            StandardGate::S => self.apply_s(qubit),
            StandardGate::T if adjoint => self.apply_tdg(qubit),
            StandardGate::T => self.apply_t(qubit),
            other => {
                if let Some(m) = matrix(other, &[], adjoint) {
                    self.apply_single(qubit, &m);
                }
            }
        }
    }

    // =========================================================================
    // Single-qubit transforms
    // =========================================================================

    /// Hadamard.
    pub fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.dim() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = FRAC_1_SQRT_2 * (a + b);
                self.amplitudes[j] = FRAC_1_SQRT_2 * (a - b);
            }
        }
    }

    /// Pauli X: swap each pair.
    pub fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.dim() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    /// Pauli Y: swap each pair with phases `(+i, -i)`.
    ///
    /// The pair `(a, b)` becomes `(i·b, -i·a)`, which is the textbook Y up
    /// to a global phase of -1.
    pub fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.dim() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                self.amplitudes[i] = I * self.amplitudes[j];
                self.amplitudes[j] = -I * a;
            }
        }
    }

    /// Pauli Z.
    pub fn apply_z(&mut self, qubit: usize) {
        self.multiply_where_set(qubit, -ONE);
    }

    /// S: multiply the `1` half by `i`.
    pub fn apply_s(&mut self, qubit: usize) {
        self.multiply_where_set(qubit, I);
    }

    /// S†: multiply the `1` half by `-i`.
    pub fn apply_sdg(&mut self, qubit: usize) {
        self.multiply_where_set(qubit, -I);
    }

    /// T: multiply the `1` half by `e^{iπ/4}`.
    pub fn apply_t(&mut self, qubit: usize) {
        self.multiply_where_set(qubit, Complex64::from_polar(1.0, PI / 4.0));
    }

    /// T†: multiply the `1` half by `e^{-iπ/4}`.
    pub fn apply_tdg(&mut self, qubit: usize) {
        self.multiply_where_set(qubit, Complex64::from_polar(1.0, -PI / 4.0));
    }

    fn multiply_where_set(&mut self, qubit: usize, factor: Complex64) {
        let mask = 1 << qubit;
        for i in 0..self.dim() {
            if i & mask != 0 {
                self.amplitudes[i] *= factor;
            }
        }
    }

    /// X rotation.
    pub fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let neg_i_s = Complex64::new(0.0, -s);
        for i in 0..self.dim() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    /// Y rotation.
    pub fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..self.dim() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    /// Z rotation: `e^{-iθ/2}` on the `0` half, `e^{iθ/2}` on the `1` half.
    pub fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for i in 0..self.dim() {
            if i & mask == 0 {
                self.amplitudes[i] *= phase_0;
            } else {
                self.amplitudes[i] *= phase_1;
            }
        }
    }

    /// Phase gate (P, U1). Applied as a Z rotation, so it differs from
    /// `diag(1, e^{iθ})` by the global phase `e^{-iθ/2}`.
    pub fn apply_phase(&mut self, qubit: usize, theta: f64) {
        self.apply_rz(qubit, theta);
    }

    /// Apply an arbitrary single-qubit matrix.
    pub fn apply_single(&mut self, qubit: usize, m: &Matrix2) {
        self.apply_controlled(&[], qubit, m);
    }

    // =========================================================================
    // Multi-qubit transforms
    // =========================================================================

    /// Controlled X.
    pub fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.dim() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    /// Controlled Z.
    pub fn apply_cz(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.dim() {
            if (i & ctrl_mask != 0) && (i & tgt_mask != 0) {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    /// Exchange two qubits.
    pub fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..self.dim() {
            if (i & mask1 != 0) && (i & mask2 == 0) {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    /// Apply `m` to `target` on every pair whose control bits are all set.
    pub fn apply_controlled(&mut self, controls: &[usize], target: usize, m: &Matrix2) {
        let ctrl_mask: usize = controls.iter().fold(0, |acc, c| acc | (1 << c));
        let tgt_mask = 1 << target;
        for i in 0..self.dim() {
            if (i & tgt_mask == 0) && (i & ctrl_mask == ctrl_mask) {
                let j = i | tgt_mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
                self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    /// Project onto the `0` half of `qubit` and renormalize.
    ///
    /// The `0` half is divided by the square root of its probability mass
    /// (left as is when that mass is zero) and the `1` half is zeroed.
    pub fn reset(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let prob0: f64 = self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask == 0)
            .map(|(_, a)| a.norm_sqr())
            .sum();

        let norm = if prob0 > 0.0 { prob0.sqrt() } else { 1.0 };
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == 0 {
                *amp /= norm;
            } else {
                *amp = ZERO;
            }
        }
    }

    // =========================================================================
    // Readout
    // =========================================================================

    /// `|amplitude|²` for every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Per-qubit marginal probabilities.
    pub fn qubit_probabilities(&self) -> Vec<QubitProbability> {
        marginals(&self.amplitudes, self.num_qubits)
    }

    /// Basis states whose probability exceeds `threshold`, by index.
    pub fn basis_states(&self, threshold: f64) -> Vec<BasisState> {
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(_, a)| a.norm_sqr() > threshold)
            .map(|(index, a)| BasisState {
                index,
                bits: self.bitstring(index),
                amplitude: *a,
                probability: a.norm_sqr(),
                phase: a.arg(),
                hamming_weight: index.count_ones(),
            })
            .collect()
    }

    /// Euclidean norm of the state.
    pub fn norm(&self) -> f64 {
        self.probabilities().iter().sum::<f64>().sqrt()
    }

    /// Qubit values of a basis index, qubit 0 first.
    pub fn bitstring(&self, index: usize) -> String {
        (0..self.num_qubits)
            .map(|q| if index & (1 << q) != 0 { '1' } else { '0' })
            .collect()
    }

    /// Draw `shots` measurement outcomes of every qubit.
    ///
    /// The state is not collapsed; each shot samples the same distribution.
    pub fn sample<R: Rng>(&self, shots: usize, rng: &mut R) -> BTreeMap<String, usize> {
        let cumulative: Vec<f64> = self
            .amplitudes
            .iter()
            .scan(0.0, |acc, a| {
                *acc += a.norm_sqr();
                Some(*acc)
            })
            .collect();
        let total = cumulative.last().copied().unwrap_or(0.0);

        let mut counts = BTreeMap::new();
        for _ in 0..shots {
            let r: f64 = rng.r#gen::<f64>() * total;
            let outcome = cumulative
                .partition_point(|c| *c <= r)
                .min(self.amplitudes.len() - 1);
            *counts.entry(self.bitstring(outcome)).or_insert(0) += 1;
        }
        counts
    }
}

/// Per-qubit marginals of an amplitude array over `num_qubits` qubits.
pub(crate) fn marginals(amplitudes: &[Complex64], num_qubits: usize) -> Vec<QubitProbability> {
    let mut probs = vec![QubitProbability { p0: 0.0, p1: 0.0 }; num_qubits];
    for (i, amp) in amplitudes.iter().enumerate() {
        let p = amp.norm_sqr();
        for (q, prob) in probs.iter_mut().enumerate() {
            if i & (1 << q) != 0 {
                prob.p1 += p;
            } else {
                prob.p0 += p;
            }
        }
    }
    probs
}

/// The matrix of a single-qubit catalog gate.
///
/// Missing parameters read as zero. Returns `None` for two-qubit kinds.
/// Y here is the textbook `[[0, -i], [i, 0]]`.
pub fn matrix(gate: StandardGate, params: &[f64], adjoint: bool) -> Option<Matrix2> {
    let p = |i: usize| params.get(i).copied().unwrap_or(0.0);
    let half = 0.5;
    let m = match gate {
        StandardGate::I => [[ONE, ZERO], [ZERO, ONE]],
        StandardGate::H => {
            let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
            [[h, h], [h, -h]]
        }
        StandardGate::X => [[ZERO, ONE], [ONE, ZERO]],
        StandardGate::Y => [[ZERO, -I], [I, ZERO]],
        StandardGate::Z => [[ONE, ZERO], [ZERO, -ONE]],
        StandardGate::S | StandardGate::SZ => [[ONE, ZERO], [ZERO, I]],
        StandardGate::T => [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, PI / 4.0)]],
        StandardGate::SX => {
            let a = Complex64::new(half, half);
            let b = Complex64::new(half, -half);
            [[a, b], [b, a]]
        }
        StandardGate::SY => {
            let a = Complex64::new(half, half);
            [[a, -a], [a, a]]
        }
        StandardGate::RX => {
            let (c, s) = ((p(0) / 2.0).cos(), (p(0) / 2.0).sin());
            [
                [Complex64::new(c, 0.0), Complex64::new(0.0, -s)],
                [Complex64::new(0.0, -s), Complex64::new(c, 0.0)],
            ]
        }
        StandardGate::RY => {
            let (c, s) = ((p(0) / 2.0).cos(), (p(0) / 2.0).sin());
            [
                [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
                [Complex64::new(s, 0.0), Complex64::new(c, 0.0)],
            ]
        }
        StandardGate::RZ => [
            [Complex64::from_polar(1.0, -p(0) / 2.0), ZERO],
            [ZERO, Complex64::from_polar(1.0, p(0) / 2.0)],
        ],
        StandardGate::P | StandardGate::U1 => {
            [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, p(0))]]
        }
        StandardGate::U2 => u3(PI / 2.0, p(0), p(1)),
        StandardGate::U3 => u3(p(0), p(1), p(2)),
        _ => return None,
    };
    Some(if adjoint { dagger(&m) } else { m })
}

fn u3(theta: f64, phi: f64, lambda: f64) -> Matrix2 {
    let c = (theta / 2.0).cos();
    let s = (theta / 2.0).sin();
    [
        [Complex64::new(c, 0.0), -Complex64::from_polar(s, lambda)],
        [
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        ],
    ]
}

fn dagger(m: &Matrix2) -> Matrix2 {
    [
        [m[0][0].conj(), m[1][0].conj()],
        [m[0][1].conj(), m[1][1].conj()],
    ]
}
