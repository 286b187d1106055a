//! Dependency graph of circuit operations.

use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::noise::NoiseChannel;
use crate::operation::Operation;
use crate::qubit::{ClbitId, QubitId};

/// Identifier of a node, derived from its kind, target and step.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap an existing id string.
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn derive(op: &Operation, step: u32) -> Self {
        match op.target() {
            Some(target) => NodeId(format!("{}_q{}_s{step}", op.label(), target.0)),
            None => NodeId(format!("{}_s{step}", op.label())),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId(id.to_string())
    }
}

/// One operation placed in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateNode {
    /// Unique id within the graph.
    pub id: NodeId,
    /// The operation.
    pub op: Operation,
    /// Scheduling layer.
    pub step: u32,
    /// Nodes this one must follow, without duplicates.
    pub dependencies: Vec<NodeId>,
    /// Qubits the node was threaded on when added. Equals the operation's
    /// roles except for barriers, which span the register at insertion.
    wires: Vec<QubitId>,
    /// Insertion counter.
    seq: u64,
}

impl GateNode {
    /// Insertion rank. Later nodes have larger values.
    #[inline]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The qubits this node occupies for dependency tracking.
    pub fn wires(&self) -> &[QubitId] {
        &self.wires
    }

    /// Whether the node occupies `qubit` within its step.
    pub fn occupies(&self, qubit: QubitId) -> bool {
        matches!(self.op, Operation::Barrier) || self.op.qubits().contains(&qubit)
    }

    /// Whether the node blocks other operations on its qubits at its step.
    pub fn is_exclusive(&self) -> bool {
        matches!(self.op, Operation::Barrier) || self.op.is_multi_qubit()
    }
}

/// Circuit graph: an arena of [`GateNode`]s keyed by id.
///
/// Dependencies are stored as id lists and never as references, so removing
/// a node cannot leave an alias behind. A per-qubit frontier remembers the
/// most recently added node on each qubit; new nodes depend on the frontier
/// entries of the qubits they touch.
///
/// Qubit and classical-bit counts are derived from the nodes, floored by a
/// caller-supplied minimum.
#[derive(Debug, Clone, Default)]
pub struct CircuitGraph {
    nodes: FxHashMap<NodeId, GateNode>,
    frontier: FxHashMap<QubitId, NodeId>,
    min_qubits: u32,
    min_clbits: u32,
    touched_qubits: u32,
    touched_clbits: u32,
    next_seq: u64,
}

impl CircuitGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph reporting at least the given register sizes.
    pub fn with_min_size(num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            min_qubits: num_qubits,
            min_clbits: num_clbits,
            ..Self::default()
        }
    }

    /// Number of qubits: the largest index referenced plus one, or the
    /// minimum if larger.
    pub fn qubit_count(&self) -> u32 {
        self.touched_qubits.max(self.min_qubits)
    }

    /// Number of classical bits, derived like [`qubit_count`](Self::qubit_count).
    pub fn clbit_count(&self) -> u32 {
        self.touched_clbits.max(self.min_clbits)
    }

    /// Raise the reported qubit count floor.
    pub fn reserve_qubits(&mut self, num_qubits: u32) {
        self.min_qubits = self.min_qubits.max(num_qubits);
    }

    /// Raise the reported classical-bit count floor.
    pub fn reserve_clbits(&mut self, num_clbits: u32) {
        self.min_clbits = self.min_clbits.max(num_clbits);
    }

    /// Shrink or grow the register to `num_qubits`.
    ///
    /// Every node referencing a vanishing index is removed. Returns the
    /// number of removed nodes.
    pub fn set_min_qubits(&mut self, num_qubits: u32) -> usize {
        let mut removed = 0;
        for q in num_qubits..self.qubit_count() {
            removed += self.remove_nodes_on_qubit(QubitId(q));
        }
        self.min_qubits = num_qubits;
        removed
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node.
    pub fn get(&self, id: &NodeId) -> Option<&GateNode> {
        self.nodes.get(id)
    }

    /// Whether a node with this id exists.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Iterate nodes in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &GateNode> {
        self.nodes.values()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> Vec<&GateNode> {
        let mut nodes: Vec<_> = self.nodes.values().collect();
        nodes.sort_by_key(|n| n.seq);
        nodes
    }

    /// The most recently added node on `qubit`.
    pub fn frontier(&self, qubit: QubitId) -> Option<&NodeId> {
        self.frontier.get(&qubit)
    }

    /// Remove every node. Minimum sizes are kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.frontier.clear();
        self.touched_qubits = 0;
        self.touched_clbits = 0;
    }

    /// Add an operation at `step` and return its id.
    ///
    /// The node depends on the frontier entry of every qubit it touches and
    /// becomes the new frontier of those qubits. A barrier touches every
    /// qubit of the register as it is at insertion; qubits that first appear
    /// later are not ordered against it. Never fails: indices beyond the
    /// current counts grow them.
    pub fn add_node(&mut self, op: Operation, step: u32) -> NodeId {
        let id = self.unique_id(NodeId::derive(&op, step));

        let wires: Vec<QubitId> = if matches!(op, Operation::Barrier) {
            (0..self.qubit_count()).map(QubitId).collect()
        } else {
            op.qubits()
        };

        let mut dependencies: Vec<NodeId> = Vec::new();
        for q in &wires {
            if let Some(dep) = self.frontier.get(q) {
                if !dependencies.contains(dep) {
                    dependencies.push(dep.clone());
                }
            }
        }

        for q in &wires {
            self.frontier.insert(*q, id.clone());
        }
        if let Some(max) = op.qubits().iter().map(|q| q.0.saturating_add(1)).max() {
            self.touched_qubits = self.touched_qubits.max(max);
        }
        if let Some(bit) = op.classical_bit() {
            self.touched_clbits = self.touched_clbits.max(bit.0.saturating_add(1));
        }

        trace!(id = %id, step, deps = dependencies.len(), "added node");

        let node = GateNode {
            id: id.clone(),
            op,
            step,
            dependencies,
            wires,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.nodes.insert(id.clone(), node);
        id
    }

    fn unique_id(&self, base: NodeId) -> NodeId {
        if !self.nodes.contains_key(&base) {
            return base;
        }
        (2u32..)
            .map(|n| NodeId(format!("{}#{n}", base.0)))
            .find(|candidate| !self.nodes.contains_key(candidate))
            .unwrap_or(base)
    }

    /// Add a fixed single-qubit gate.
    pub fn add_gate(&mut self, gate: StandardGate, target: QubitId, step: u32) -> NodeId {
        self.add_node(Operation::gate(gate, target), step)
    }

    /// Add the adjoint of a fixed single-qubit gate.
    pub fn add_adjoint(&mut self, gate: StandardGate, target: QubitId, step: u32) -> NodeId {
        self.add_node(Operation::adjoint(gate, target), step)
    }

    /// Add a parameterized single-qubit gate.
    pub fn add_rotation(
        &mut self,
        gate: StandardGate,
        target: QubitId,
        params: Vec<f64>,
        step: u32,
    ) -> NodeId {
        self.add_node(Operation::rotation(gate, target, params), step)
    }

    /// Add a two-qubit gate, with a parameter for controlled rotations.
    pub fn add_controlled(
        &mut self,
        gate: StandardGate,
        control: QubitId,
        target: QubitId,
        param: Option<f64>,
        step: u32,
    ) -> NodeId {
        let op = Operation::Controlled {
            gate,
            control,
            target,
            param,
        };
        self.add_node(op, step)
    }

    /// Add a Toffoli gate.
    pub fn add_toffoli(&mut self, c0: QubitId, c1: QubitId, target: QubitId, step: u32) -> NodeId {
        self.add_node(Operation::toffoli(c0, c1, target), step)
    }

    /// Add a multi-controlled single-qubit gate.
    pub fn add_multi_controlled(
        &mut self,
        gate: StandardGate,
        controls: Vec<QubitId>,
        target: QubitId,
        step: u32,
    ) -> NodeId {
        let op = Operation::MultiControlled {
            gate,
            controls,
            target,
        };
        self.add_node(op, step)
    }

    /// Add a measurement.
    pub fn add_measure(&mut self, qubit: QubitId, step: u32) -> NodeId {
        self.add_node(Operation::Measure { qubit }, step)
    }

    /// Add a measurement-controlled X.
    pub fn add_measure_x(&mut self, source: QubitId, target: QubitId, step: u32) -> NodeId {
        self.add_node(Operation::MeasureControlledX { source, target }, step)
    }

    /// Add a reset.
    pub fn add_reset(&mut self, qubit: QubitId, step: u32) -> NodeId {
        self.add_node(Operation::Reset { qubit }, step)
    }

    /// Add a classically controlled unitary.
    pub fn add_conditional(&mut self, bit: ClbitId, op: Operation, step: u32) -> IrResult<NodeId> {
        let op = Operation::conditional(bit, op)?;
        Ok(self.add_node(op, step))
    }

    /// Add a noise annotation.
    pub fn add_noise(
        &mut self,
        channel: NoiseChannel,
        target: QubitId,
        probability: Option<f64>,
        step: u32,
    ) -> NodeId {
        let op = Operation::Noise {
            channel,
            target,
            probability,
        };
        self.add_node(op, step)
    }

    /// Add a barrier at `step`, replacing any barrier already there.
    pub fn add_barrier(&mut self, step: u32) -> NodeId {
        let existing: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.step == step && matches!(n.op, Operation::Barrier))
            .map(|n| n.id.clone())
            .collect();
        for id in existing {
            self.remove_node(&id);
        }
        self.add_node(Operation::Barrier, step)
    }

    /// Place an operation the way an editor does.
    ///
    /// Refuses with `None` when [`can_place_at`](Self::can_place_at) rejects
    /// the operation's qubits. Otherwise the single-qubit nodes currently
    /// occupying those qubits at `step` are replaced.
    pub fn place(&mut self, op: Operation, step: u32) -> Option<NodeId> {
        if matches!(op, Operation::Barrier) {
            return Some(self.add_barrier(step));
        }
        let qubits = op.qubits();
        if !self.can_place_at(step, &qubits) {
            debug!(step, op = %op.name(), "placement rejected");
            return None;
        }
        for q in &qubits {
            self.remove_node_at(step, *q);
        }
        Some(self.add_node(op, step))
    }

    /// Remove a node.
    ///
    /// The id is dropped from every other node's dependency list. The
    /// removed node's dependents are not reconnected to its dependencies,
    /// so the ordering constraint it carried is lost.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<GateNode> {
        let removed = self.nodes.remove(id)?;

        for node in self.nodes.values_mut() {
            node.dependencies.retain(|dep| dep != id);
        }

        for q in &removed.wires {
            if self.frontier.get(q) == Some(id) {
                let latest = self
                    .nodes
                    .values()
                    .filter(|n| n.wires.contains(q))
                    .max_by_key(|n| n.seq)
                    .map(|n| n.id.clone());
                match latest {
                    Some(latest) => self.frontier.insert(*q, latest),
                    None => self.frontier.remove(q),
                };
            }
        }

        self.recount();
        debug!(id = %id, "removed node");
        Some(removed)
    }

    fn recount(&mut self) {
        self.touched_qubits = self
            .nodes
            .values()
            .flat_map(|n| n.op.qubits())
            .map(|q| q.0.saturating_add(1))
            .max()
            .unwrap_or(0);
        self.touched_clbits = self
            .nodes
            .values()
            .filter_map(|n| n.op.classical_bit())
            .map(|c| c.0.saturating_add(1))
            .max()
            .unwrap_or(0);
    }

    /// The node occupying `qubit` at `step`. A barrier occupies every qubit
    /// of its step.
    pub fn node_at(&self, step: u32, qubit: QubitId) -> Option<&GateNode> {
        self.nodes
            .values()
            .filter(|n| n.step == step && n.occupies(qubit))
            .min_by_key(|n| n.seq)
    }

    /// Whether an operation on `qubits` may be placed at `step`.
    ///
    /// Rejects qubits already held at that step by a barrier or by a node
    /// with two or more qubits. Qubits held by a single-qubit node are
    /// accepted; placement replaces that node.
    pub fn can_place_at(&self, step: u32, qubits: &[QubitId]) -> bool {
        !self
            .nodes
            .values()
            .filter(|n| n.step == step && n.is_exclusive())
            .any(|n| qubits.iter().any(|q| n.occupies(*q)))
    }

    /// Remove the node occupying `qubit` at `step`.
    pub fn remove_node_at(&mut self, step: u32, qubit: QubitId) -> Option<GateNode> {
        let id = self.node_at(step, qubit)?.id.clone();
        self.remove_node(&id)
    }

    /// Remove every node referencing `qubit` in any role. Barriers are kept.
    pub fn remove_nodes_on_qubit(&mut self, qubit: QubitId) -> usize {
        let ids: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.op.qubits().contains(&qubit))
            .map(|n| n.id.clone())
            .collect();
        for id in &ids {
            self.remove_node(id);
        }
        ids.len()
    }

    /// Nodes at `step`, in insertion order.
    pub fn nodes_at_step(&self, step: u32) -> Vec<&GateNode> {
        let mut nodes: Vec<_> = self.nodes.values().filter(|n| n.step == step).collect();
        nodes.sort_by_key(|n| n.seq);
        nodes
    }

    /// Nodes referencing `qubit`, ordered by step then insertion.
    pub fn nodes_on_qubit(&self, qubit: QubitId) -> Vec<&GateNode> {
        let mut nodes: Vec<_> = self
            .nodes
            .values()
            .filter(|n| n.op.qubits().contains(&qubit))
            .collect();
        nodes.sort_by_key(|n| (n.step, n.seq));
        nodes
    }

    /// The largest step in use.
    pub fn max_step(&self) -> Option<u32> {
        self.nodes.values().map(|n| n.step).max()
    }

    /// Nodes sorted by step, ties kept in insertion order.
    pub fn nodes_by_step(&self) -> Vec<&GateNode> {
        let mut nodes = self.nodes();
        nodes.sort_by_key(|n| n.step);
        nodes
    }

    /// Depth-first order in which every node follows its dependencies.
    ///
    /// Roots (nodes without dependencies) are visited first, then any node
    /// still unvisited. Branch order follows insertion but callers needing a
    /// canonical order should stable-sort the result by step.
    pub fn topological_sort(&self) -> Vec<NodeId> {
        let ordered = self.nodes();
        let mut visited: FxHashSet<&NodeId> = FxHashSet::default();
        let mut result = Vec::with_capacity(ordered.len());

        let roots = ordered.iter().filter(|n| n.dependencies.is_empty());
        for start in roots.chain(ordered.iter()) {
            if visited.contains(&start.id) {
                continue;
            }
            // (node, dependencies already pushed)
            let mut stack: Vec<(&GateNode, bool)> = vec![(*start, false)];
            while let Some((node, expanded)) = stack.pop() {
                if expanded {
                    result.push(node.id.clone());
                    continue;
                }
                if !visited.insert(&node.id) {
                    continue;
                }
                stack.push((node, true));
                for dep in node.dependencies.iter().rev() {
                    if let Some(dep_node) = self.nodes.get(dep) {
                        if !visited.contains(&dep_node.id) {
                            stack.push((dep_node, false));
                        }
                    }
                }
            }
        }
        result
    }

    /// Verify the structural integrity of the graph.
    ///
    /// Checks that:
    /// - Every dependency names a node in the graph
    /// - No operation names a qubit twice
    /// - Every node's step is at least its dependencies' steps
    /// - Nodes sharing a step use disjoint qubits
    /// - The dependency relation is acyclic
    pub fn verify_integrity(&self) -> IrResult<()> {
        let ordered = self.nodes();

        for node in &ordered {
            for dep in &node.dependencies {
                let Some(dep_node) = self.nodes.get(dep) else {
                    return Err(IrError::DanglingDependency {
                        node: node.id.clone(),
                        missing: dep.clone(),
                    });
                };
                if dep_node.step > node.step {
                    return Err(IrError::StepOrder {
                        node: node.id.clone(),
                        step: node.step,
                        dependency: dep.clone(),
                        dependency_step: dep_node.step,
                    });
                }
            }
            if let Some(qubit) = node.op.duplicate_qubit() {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: Some(node.op.name()),
                });
            }
        }

        let mut occupancy: FxHashMap<(u32, QubitId), &NodeId> = FxHashMap::default();
        for node in &ordered {
            for q in node.op.qubits() {
                if let Some(first) = occupancy.insert((node.step, q), &node.id) {
                    return Err(IrError::StepConflict {
                        step: node.step,
                        qubit: q,
                        first: first.clone(),
                        second: node.id.clone(),
                    });
                }
            }
        }

        let mut graph: DiGraph<&NodeId, ()> = DiGraph::new();
        let indices: FxHashMap<&NodeId, NodeIndex> = ordered
            .iter()
            .map(|n| (&n.id, graph.add_node(&n.id)))
            .collect();
        for node in &ordered {
            for dep in &node.dependencies {
                graph.add_edge(indices[dep], indices[&node.id], ());
            }
        }
        petgraph::algo::toposort(&graph, None)
            .map(|_| ())
            .map_err(|cycle| IrError::Cycle(graph[cycle.node_id()].clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    #[test]
    fn test_empty_graph() {
        let graph = CircuitGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.qubit_count(), 0);
        assert_eq!(graph.clbit_count(), 0);
        assert_eq!(graph.max_step(), None);

        let sized = CircuitGraph::with_min_size(3, 2);
        assert_eq!(sized.qubit_count(), 3);
        assert_eq!(sized.clbit_count(), 2);
    }

    #[test]
    fn test_node_ids() {
        let mut graph = CircuitGraph::new();
        let h = graph.add_gate(StandardGate::H, q(0), 0);
        let m = graph.add_measure(q(1), 2);
        let b = graph.add_barrier(3);
        assert_eq!(h.as_str(), "H_q0_s0");
        assert_eq!(m.as_str(), "MEASURE_q1_s2");
        assert_eq!(b.as_str(), "BARRIER_s3");
    }

    #[test]
    fn test_colliding_ids_stay_unique() {
        let mut graph = CircuitGraph::new();
        let a = graph.add_gate(StandardGate::X, q(0), 0);
        let b = graph.add_gate(StandardGate::X, q(0), 0);
        assert_ne!(a, b);
        assert_eq!(b.as_str(), "X_q0_s0#2");
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_dependencies_follow_frontier() {
        let mut graph = CircuitGraph::new();
        let h0 = graph.add_gate(StandardGate::H, q(0), 0);
        let h1 = graph.add_gate(StandardGate::H, q(1), 0);
        let cx = graph.add_controlled(StandardGate::CX, q(0), q(1), None, 1);

        assert!(graph.get(&h0).unwrap().dependencies.is_empty());
        assert_eq!(graph.get(&cx).unwrap().dependencies, vec![h0, h1]);
        assert_eq!(graph.frontier(q(0)), Some(&cx));
        assert_eq!(graph.frontier(q(1)), Some(&cx));
        assert_eq!(graph.qubit_count(), 2);
    }

    #[test]
    fn test_counts_grow() {
        let mut graph = CircuitGraph::new();
        graph.add_gate(StandardGate::X, q(4), 0);
        assert_eq!(graph.qubit_count(), 5);
        assert_eq!(graph.clbit_count(), 0);

        graph.add_measure(q(2), 1);
        assert_eq!(graph.clbit_count(), 3);

        let x = Operation::gate(StandardGate::X, q(0));
        graph.add_conditional(ClbitId(6), x, 2).unwrap();
        assert_eq!(graph.clbit_count(), 7);

        graph.add_measure_x(q(3), q(0), 3);
        assert_eq!(graph.clbit_count(), 7);
    }

    #[test]
    fn test_empty_params_tolerated() {
        let mut graph = CircuitGraph::new();
        let id = graph.add_rotation(StandardGate::U3, q(0), Vec::new(), 0);
        let node = graph.get(&id).unwrap();
        assert_eq!(node.op.param(1), 0.0);
    }

    #[test]
    fn test_remove_node_does_not_reconnect() {
        let mut graph = CircuitGraph::new();
        let a = graph.add_gate(StandardGate::H, q(0), 0);
        let b = graph.add_gate(StandardGate::X, q(0), 1);
        let c = graph.add_gate(StandardGate::Z, q(0), 2);

        let removed = graph.remove_node(&b).unwrap();
        assert_eq!(removed.id, b);
        assert!(graph.get(&c).unwrap().dependencies.is_empty());
        assert!(graph.get(&a).is_some());
        assert_eq!(graph.frontier(q(0)), Some(&c));
        assert!(graph.remove_node(&b).is_none());
    }

    #[test]
    fn test_remove_frontier_node_restores_previous() {
        let mut graph = CircuitGraph::new();
        let a = graph.add_gate(StandardGate::H, q(0), 0);
        let b = graph.add_gate(StandardGate::X, q(0), 1);
        graph.remove_node(&b);
        assert_eq!(graph.frontier(q(0)), Some(&a));

        let c = graph.add_gate(StandardGate::Y, q(0), 1);
        assert_eq!(graph.get(&c).unwrap().dependencies, vec![a.clone()]);

        graph.remove_node(&c);
        graph.remove_node(&a);
        assert_eq!(graph.frontier(q(0)), None);
        assert_eq!(graph.qubit_count(), 0);
    }

    #[test]
    fn test_can_place_at() {
        let mut graph = CircuitGraph::new();
        graph.add_controlled(StandardGate::CX, q(0), q(1), None, 0);
        graph.add_gate(StandardGate::H, q(2), 0);

        assert!(!graph.can_place_at(0, &[q(0)]));
        assert!(!graph.can_place_at(0, &[q(1)]));
        // occupied by a single-qubit gate only
        assert!(graph.can_place_at(0, &[q(2)]));
        assert!(graph.can_place_at(0, &[q(3)]));
        assert!(graph.can_place_at(1, &[q(0)]));
    }

    #[test]
    fn test_can_place_rejects_barrier_step() {
        let mut graph = CircuitGraph::with_min_size(2, 0);
        graph.add_barrier(1);
        assert!(!graph.can_place_at(1, &[q(0)]));
        assert!(!graph.can_place_at(1, &[q(7)]));
        assert!(graph.can_place_at(0, &[q(0)]));
    }

    #[test]
    fn test_place_replaces_single_qubit_node() {
        let mut graph = CircuitGraph::new();
        let h = graph.add_gate(StandardGate::H, q(0), 0);
        let x = graph.place(Operation::gate(StandardGate::X, q(0)), 0).unwrap();
        assert!(graph.get(&h).is_none());
        assert!(graph.get(&x).is_some());
        assert_eq!(graph.len(), 1);

        graph.add_controlled(StandardGate::CZ, q(1), q(2), None, 1);
        assert!(graph.place(Operation::gate(StandardGate::X, q(1)), 1).is_none());
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_add_barrier_replaces_existing() {
        let mut graph = CircuitGraph::with_min_size(2, 0);
        graph.add_barrier(1);
        graph.add_barrier(1);
        assert_eq!(graph.nodes_at_step(1).len(), 1);
    }

    #[test]
    fn test_barrier_spans_register() {
        let mut graph = CircuitGraph::new();
        let h0 = graph.add_gate(StandardGate::H, q(0), 0);
        let h1 = graph.add_gate(StandardGate::H, q(1), 0);
        let b = graph.add_barrier(1);
        let x = graph.add_gate(StandardGate::X, q(1), 2);

        assert_eq!(graph.get(&b).unwrap().dependencies, vec![h0, h1]);
        assert_eq!(graph.get(&x).unwrap().dependencies, vec![b.clone()]);
        assert_eq!(graph.node_at(1, q(0)).map(|n| &n.id), Some(&b));
    }

    #[test]
    fn test_remove_node_at() {
        let mut graph = CircuitGraph::new();
        graph.add_gate(StandardGate::H, q(0), 0);
        let cx = graph.add_controlled(StandardGate::CX, q(0), q(1), None, 1);

        assert!(graph.remove_node_at(0, q(1)).is_none());
        let removed = graph.remove_node_at(1, q(1)).unwrap();
        assert_eq!(removed.id, cx);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_remove_nodes_on_qubit() {
        let mut graph = CircuitGraph::new();
        graph.add_gate(StandardGate::H, q(0), 0);
        graph.add_controlled(StandardGate::CX, q(0), q(2), None, 1);
        graph.add_measure_x(q(2), q(1), 2);
        graph.add_gate(StandardGate::X, q(1), 3);
        graph.add_barrier(4);

        assert_eq!(graph.remove_nodes_on_qubit(q(2)), 2);
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.qubit_count(), 2);
    }

    #[test]
    fn test_set_min_qubits() {
        let mut graph = CircuitGraph::with_min_size(4, 0);
        graph.add_gate(StandardGate::H, q(0), 0);
        graph.add_gate(StandardGate::H, q(3), 0);
        graph.add_controlled(StandardGate::CX, q(0), q(2), None, 1);

        assert_eq!(graph.set_min_qubits(2), 2);
        assert_eq!(graph.qubit_count(), 2);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_topological_sort() {
        let mut graph = CircuitGraph::new();
        let h0 = graph.add_gate(StandardGate::H, q(0), 0);
        let h1 = graph.add_gate(StandardGate::H, q(1), 0);
        let cx = graph.add_controlled(StandardGate::CX, q(0), q(1), None, 1);
        let x = graph.add_gate(StandardGate::X, q(1), 2);

        let order = graph.topological_sort();
        assert_eq!(order.len(), 4);
        let pos = |id: &NodeId| order.iter().position(|o| o == id).unwrap();
        assert!(pos(&h0) < pos(&cx));
        assert!(pos(&h1) < pos(&cx));
        assert!(pos(&cx) < pos(&x));
    }

    #[test]
    fn test_topological_sort_after_removal() {
        let mut graph = CircuitGraph::new();
        graph.add_gate(StandardGate::H, q(0), 0);
        let mid = graph.add_gate(StandardGate::X, q(0), 1);
        graph.add_gate(StandardGate::Z, q(0), 2);
        graph.remove_node(&mid);
        assert_eq!(graph.topological_sort().len(), 2);
    }

    #[test]
    fn test_nodes_by_step_is_stable() {
        let mut graph = CircuitGraph::new();
        let a = graph.add_gate(StandardGate::X, q(1), 1);
        let b = graph.add_gate(StandardGate::H, q(0), 0);
        let c = graph.add_gate(StandardGate::Y, q(0), 1);
        let order: Vec<_> = graph.nodes_by_step().into_iter().map(|n| n.id.clone()).collect();
        assert_eq!(order, vec![b, a, c]);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut graph = CircuitGraph::new();
        let h = graph.add_gate(StandardGate::H, q(0), 0);
        let snapshot = graph.clone();
        graph.remove_node(&h);
        graph.add_gate(StandardGate::X, q(3), 0);

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.get(&h).is_some());
        assert_eq!(snapshot.qubit_count(), 1);
        assert_eq!(snapshot.frontier(q(0)), Some(&h));
    }

    #[test]
    fn test_verify_integrity() {
        let mut graph = CircuitGraph::new();
        graph.add_gate(StandardGate::H, q(0), 0);
        graph.add_gate(StandardGate::H, q(1), 0);
        graph.add_controlled(StandardGate::CX, q(0), q(1), None, 1);
        assert!(graph.verify_integrity().is_ok());

        graph.add_gate(StandardGate::X, q(1), 1);
        assert!(matches!(
            graph.verify_integrity(),
            Err(IrError::StepConflict { .. })
        ));
    }

    #[test]
    fn test_verify_integrity_step_order() {
        let mut graph = CircuitGraph::new();
        graph.add_gate(StandardGate::H, q(0), 5);
        graph.add_gate(StandardGate::X, q(0), 2);
        assert!(matches!(
            graph.verify_integrity(),
            Err(IrError::StepOrder { .. })
        ));
    }

    #[test]
    fn test_verify_integrity_duplicate_qubit() {
        let mut graph = CircuitGraph::new();
        graph.add_controlled(StandardGate::CX, q(1), q(1), None, 0);
        assert!(matches!(
            graph.verify_integrity(),
            Err(IrError::DuplicateQubit { .. })
        ));
    }

    #[test]
    fn test_barrier_wires_fixed_at_insertion() {
        let mut graph = CircuitGraph::new();
        graph.add_gate(StandardGate::H, QubitId(0), 0);
        let barrier = graph.add_barrier(1);
        assert_eq!(graph.get(&barrier).unwrap().wires(), &[QubitId(0)]);

        let later = graph.add_gate(StandardGate::H, QubitId(2), 2);
        assert!(graph.get(&later).unwrap().dependencies.is_empty());

        let after = graph.add_gate(StandardGate::X, QubitId(0), 3);
        assert_eq!(graph.get(&after).unwrap().dependencies, vec![barrier]);
    }
}
