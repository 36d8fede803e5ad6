use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::network::input::InputTerminal;
use crate::network::neuron::ComputedNode;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique identifier of a terminal or computed node.
///
/// Ids are handed out in increasing order at construction time and only
/// serve as stable names in the graph export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocates the next id.
    pub fn next() -> NodeId {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Address of a signal source inside a network's arenas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceRef {
    /// Index into the input terminal list.
    Input(usize),
    /// Index into the computed node list.
    Node(usize),
}

/// Anything exposing a current readable scalar.
pub trait SignalSource {
    fn id(&self) -> NodeId;
    fn value(&self) -> f64;
}

/// Read-only view over the sources a node may pull from.
///
/// During a pass the network hands each node a view whose `nodes` slice ends
/// right before the node itself, so only earlier nodes are reachable.
#[derive(Clone, Copy)]
pub struct Signals<'a> {
    inputs: &'a [InputTerminal],
    nodes: &'a [ComputedNode],
}

impl<'a> Signals<'a> {
    pub fn new(inputs: &'a [InputTerminal], nodes: &'a [ComputedNode]) -> Signals<'a> {
        Signals { inputs, nodes }
    }

    /// Resolves a reference, or `None` if it points outside this view.
    pub fn get(&self, source: SourceRef) -> Option<&'a dyn SignalSource> {
        match source {
            SourceRef::Input(i) => self.inputs.get(i).map(|t| t as &dyn SignalSource),
            SourceRef::Node(i) => self.nodes.get(i).map(|n| n as &dyn SignalSource),
        }
    }

    /// Committed value of `source`.
    ///
    /// # Panics
    /// If `source` is outside this view. `Network::new` rejects such
    /// references, so this only fires for hand-assembled views.
    pub fn value(&self, source: SourceRef) -> f64 {
        self.resolve(source).value()
    }

    /// Export id of `source`. Panics like [`Signals::value`].
    pub fn id(&self, source: SourceRef) -> NodeId {
        self.resolve(source).id()
    }

    fn resolve(&self, source: SourceRef) -> &'a dyn SignalSource {
        match self.get(source) {
            Some(s) => s,
            None => panic!("{:?} is outside the visible sources", source),
        }
    }
}
