use rand::Rng;
use tracing::trace;

use crate::activation::sigmoid;
use crate::error::{KvolveError, Result};
use crate::graph::dot::{self, NODE_COLOR};
use crate::network::connection::Connection;
use crate::network::source::{NodeId, SignalSource, Signals, SourceRef};

/// Where a node stands in the compute/commit protocol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeState {
    /// Nothing pending; `update()` would fail.
    Idle,
    /// Computed but not yet committed.
    Computed(f64),
}

/// Weighted sum of its fan-in plus bias, squashed through a sigmoid.
///
/// Evaluation is split in two: `compute()` only produces a pending value and
/// `update()` makes it visible. A network computes a whole level before
/// committing any of it, so no node sees a sibling's value from the same pass.
#[derive(Debug, Clone)]
pub struct ComputedNode {
    id: NodeId,
    connections: Vec<Connection>,
    bias: f64,
    value: f64,
    state: NodeState,
}

impl ComputedNode {
    pub fn new(connections: Vec<Connection>, bias: f64) -> ComputedNode {
        ComputedNode {
            id: NodeId::next(),
            connections,
            bias,
            value: 0.0,
            state: NodeState::Idle,
        }
    }

    /// One connection per source with weights and bias drawn from [0, 1).
    pub fn random<R: Rng + ?Sized>(sources: &[SourceRef], rng: &mut R) -> ComputedNode {
        let connections = sources
            .iter()
            .map(|&source| Connection::new(source, rng.gen::<f64>()))
            .collect();
        ComputedNode::new(connections, rng.gen::<f64>())
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Committed value; 0 until the first commit.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Pending value, if computed and not yet committed.
    pub fn pending(&self) -> Option<f64> {
        match self.state {
            NodeState::Idle => None,
            NodeState::Computed(v) => Some(v),
        }
    }

    /// `Σ weight * source + bias` over the sources' committed values.
    pub fn pre_activation(&self, signals: &Signals<'_>) -> f64 {
        self.connections
            .iter()
            .map(|c| c.signal(signals.value(c.source())))
            .sum::<f64>()
            + self.bias
    }

    /// Stores `sigmoid(pre_activation)` as the pending value. Overwrites any
    /// earlier pending value; the committed value is left alone.
    pub fn compute(&mut self, signals: &Signals<'_>) {
        let next = sigmoid(self.pre_activation(signals));
        trace!(node = %self.id, pending = next, "computed");
        self.state = NodeState::Computed(next);
    }

    /// Commits the pending value.
    pub fn update(&mut self) -> Result<()> {
        match self.state {
            NodeState::Computed(next) => {
                self.value = next;
                self.state = NodeState::Idle;
                Ok(())
            }
            NodeState::Idle => Err(KvolveError::InvalidState { node: self.id }),
        }
    }

    /// `"<id>" [label="<bias>\n<value>", color=<color>]`, blue by default.
    pub fn graph_node(&self, color: Option<&str>) -> String {
        dot::node_statement(
            self.id,
            &[dot::number(self.bias), dot::number(self.value)],
            color.unwrap_or(NODE_COLOR),
        )
    }

    /// One edge statement per incoming connection, in fan-in order.
    pub fn graph_edges(&self, signals: &Signals<'_>) -> Vec<String> {
        self.connections
            .iter()
            .map(|c| c.graph_edge(signals.id(c.source()), self.id))
            .collect()
    }
}

impl SignalSource for ComputedNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn value(&self) -> f64 {
        self.value
    }
}
