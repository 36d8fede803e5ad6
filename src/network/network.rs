use tracing::debug;

use crate::error::{KvolveError, Result};
use crate::graph::dot::{FOOTER, HEADER};
use crate::network::input::InputTerminal;
use crate::network::neuron::ComputedNode;
use crate::network::source::{Signals, SourceRef};

/// Input terminals plus every computed node, flattened in topological order.
#[derive(Debug, Clone)]
pub struct Network {
    inputs: Vec<InputTerminal>,
    nodes: Vec<ComputedNode>,
    /// Node positions grouped by depth; a level only reads terminals and
    /// earlier levels.
    levels: Vec<Vec<usize>>,
}

impl Network {
    /// Assembles a network from hand-built parts.
    ///
    /// Every `SourceRef::Input(i)` must name an existing terminal and every
    /// `SourceRef::Node(j)` held by the node at position `i` must satisfy
    /// `j < i`; anything else is a `ForwardReference`.
    pub fn new(inputs: Vec<InputTerminal>, nodes: Vec<ComputedNode>) -> Result<Network> {
        let mut depth = vec![0usize; nodes.len()];

        for (position, node) in nodes.iter().enumerate() {
            let mut deepest = 0;
            for connection in node.connections() {
                match connection.source() {
                    SourceRef::Input(i) if i < inputs.len() => {}
                    SourceRef::Node(j) if j < position => deepest = deepest.max(depth[j]),
                    reference => {
                        return Err(KvolveError::ForwardReference { node: position, reference });
                    }
                }
            }
            depth[position] = deepest + 1;
        }

        let level_count = depth.iter().copied().max().unwrap_or(0);
        let mut levels = vec![Vec::new(); level_count];
        for (position, d) in depth.iter().enumerate() {
            levels[d - 1].push(position);
        }

        Ok(Network { inputs, nodes, levels })
    }

    pub fn inputs(&self) -> &[InputTerminal] {
        &self.inputs
    }

    pub fn input_mut(&mut self, index: usize) -> Option<&mut InputTerminal> {
        self.inputs.get_mut(index)
    }

    /// Sets every terminal at once; `values` must match the terminal count.
    pub fn set_inputs(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.inputs.len() {
            return Err(KvolveError::InvalidArgument(format!(
                "expected {} input values, got {}",
                self.inputs.len(),
                values.len()
            )));
        }
        for (terminal, &v) in self.inputs.iter_mut().zip(values) {
            terminal.set(v);
        }
        Ok(())
    }

    pub fn nodes(&self) -> &[ComputedNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&ComputedNode> {
        self.nodes.get(index)
    }

    /// Committed value of every computed node, in stored order.
    pub fn values(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.value()).collect()
    }

    pub fn levels(&self) -> &[Vec<usize>] {
        &self.levels
    }

    /// One full forward pass.
    ///
    /// Level by level: every node of the level computes from the values
    /// committed so far, then every node of the level commits.
    pub fn compute(&mut self) -> Result<()> {
        for level in &self.levels {
            for &position in level {
                let (before, rest) = self.nodes.split_at_mut(position);
                rest[0].compute(&Signals::new(&self.inputs, before));
            }
            for &position in level {
                self.nodes[position].update()?;
            }
        }
        debug!(
            nodes = self.nodes.len(),
            levels = self.levels.len(),
            "network pass complete"
        );
        Ok(())
    }

    /// Graphviz description of the current structure and values.
    pub fn export_graph(&self) -> String {
        let mut rows = vec![HEADER.to_string()];
        rows.extend(self.inputs.iter().map(|t| t.graph_node()));
        for (position, node) in self.nodes.iter().enumerate() {
            let signals = Signals::new(&self.inputs, &self.nodes[..position]);
            rows.push(node.graph_node(None));
            rows.extend(node.graph_edges(&signals));
        }
        rows.push(FOOTER.to_string());
        rows.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::sigmoid;
    use crate::graph::check_syntax;
    use crate::network::connection::Connection;
    use approx::assert_relative_eq;

    fn chain() -> Network {
        // input -> a -> b
        let inputs = vec![InputTerminal::new(1.0)];
        let a = ComputedNode::new(vec![Connection::new(SourceRef::Input(0), 2.0)], -1.0);
        let b = ComputedNode::new(vec![Connection::new(SourceRef::Node(0), 1.0)], 0.0);
        Network::new(inputs, vec![a, b]).unwrap()
    }

    #[test]
    fn test_levels_follow_depth() {
        let inputs = vec![InputTerminal::new(0.0)];
        let nodes = vec![
            ComputedNode::new(vec![Connection::new(SourceRef::Input(0), 1.0)], 0.0),
            ComputedNode::new(vec![Connection::new(SourceRef::Input(0), 1.0)], 0.0),
            ComputedNode::new(vec![Connection::new(SourceRef::Node(0), 1.0)], 0.0),
            ComputedNode::new(Vec::new(), 0.0),
        ];
        let network = Network::new(inputs, nodes).unwrap();
        assert_eq!(network.levels(), &[vec![0, 1, 3], vec![2]]);
    }

    #[test]
    fn test_forward_reference_is_rejected() {
        let nodes = vec![
            ComputedNode::new(vec![Connection::new(SourceRef::Node(1), 1.0)], 0.0),
            ComputedNode::new(Vec::new(), 0.0),
        ];
        let err = Network::new(Vec::new(), nodes).unwrap_err();
        assert!(matches!(
            err,
            KvolveError::ForwardReference { node: 0, reference: SourceRef::Node(1) }
        ));
    }

    #[test]
    fn test_self_reference_is_rejected() {
        let nodes = vec![ComputedNode::new(vec![Connection::new(SourceRef::Node(0), 1.0)], 0.0)];
        assert!(Network::new(Vec::new(), nodes).is_err());
    }

    #[test]
    fn test_missing_input_is_rejected() {
        let nodes = vec![ComputedNode::new(vec![Connection::new(SourceRef::Input(2), 1.0)], 0.0)];
        let err = Network::new(vec![InputTerminal::new(0.0)], nodes).unwrap_err();
        assert!(matches!(err, KvolveError::ForwardReference { node: 0, .. }));
    }

    #[test]
    fn test_values_before_first_pass_are_zero() {
        let network = chain();
        assert_eq!(network.values(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_pass_propagates_through_chain() {
        let mut network = chain();
        network.compute().unwrap();

        let a = sigmoid(2.0 - 1.0);
        assert_relative_eq!(network.values()[0], a);
        assert_relative_eq!(network.values()[1], sigmoid(a));
        assert!(network.nodes().iter().all(|n| n.pending().is_none()));
    }

    #[test]
    fn test_consecutive_passes_are_idempotent() {
        let mut network = chain();
        network.compute().unwrap();
        let first = network.values();
        network.compute().unwrap();
        assert_eq!(network.values(), first);
    }

    #[test]
    fn test_set_inputs_checks_length() {
        let mut network = chain();
        assert!(matches!(
            network.set_inputs(&[1.0, 2.0]),
            Err(KvolveError::InvalidArgument(_))
        ));
        network.set_inputs(&[-3.0]).unwrap();
        assert_eq!(network.inputs()[0].value(), -3.0);
    }

    #[test]
    fn test_input_mut() {
        let mut network = chain();
        network.input_mut(0).unwrap().set(0.5);
        assert_eq!(network.inputs()[0].value(), 0.5);
        assert!(network.input_mut(1).is_none());
    }

    #[test]
    fn test_export_graph_layout() {
        let network = chain();
        let text = network.export_graph();
        let lines: Vec<&str> = text.lines().collect();

        let input = network.inputs()[0].id();
        let a = network.nodes()[0].id();
        let b = network.nodes()[1].id();
        assert_eq!(
            lines,
            vec![
                "digraph {rankdir=LR".to_string(),
                format!("\"{}\" [label=\"1.00\", color=green]", input),
                format!("\"{}\" [label=\"-1.00\\n0.00\", color=blue]", a),
                format!("\"{}\" -> \"{}\" [label=\"2.00\"]", input, a),
                format!("\"{}\" [label=\"0.00\\n0.00\", color=blue]", b),
                format!("\"{}\" -> \"{}\" [label=\"1.00\"]", a, b),
                "}".to_string(),
            ]
        );
        assert!(check_syntax(&text).is_ok());
    }

    #[test]
    fn test_export_graph_does_not_mutate() {
        let mut network = chain();
        network.compute().unwrap();
        let before = network.values();
        let first = network.export_graph();
        assert_eq!(network.export_graph(), first);
        assert_eq!(network.values(), before);
    }

    #[test]
    fn test_empty_network() {
        let mut network = Network::new(Vec::new(), Vec::new()).unwrap();
        network.compute().unwrap();
        assert_eq!(network.export_graph(), "digraph {rankdir=LR\n}");
    }
}
