use crate::graph::dot;
use crate::network::source::{NodeId, SourceRef};

/// Weighted edge from a signal source into the node that owns it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    source: SourceRef,
    weight: f64,
}

impl Connection {
    pub fn new(source: SourceRef, weight: f64) -> Connection {
        Connection { source, weight }
    }

    pub fn source(&self) -> SourceRef {
        self.source
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Contribution of this edge given the source's current value.
    pub fn signal(&self, source_value: f64) -> f64 {
        source_value * self.weight
    }

    /// `"<source-id>" -> "<target-id>" [label="<weight>"]`
    pub fn graph_edge(&self, source_id: NodeId, target_id: NodeId) -> String {
        dot::edge_statement(source_id, target_id, self.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_scales_by_weight() {
        let c = Connection::new(SourceRef::Input(0), -0.5);
        assert_eq!(c.signal(2.0), -1.0);
        assert_eq!(c.source(), SourceRef::Input(0));
    }

    #[test]
    fn test_graph_edge_uses_two_decimals() {
        let from = NodeId::next();
        let to = NodeId::next();
        let c = Connection::new(SourceRef::Node(0), 0.123);
        assert_eq!(
            c.graph_edge(from, to),
            format!("\"{}\" -> \"{}\" [label=\"0.12\"]", from, to)
        );
    }
}
