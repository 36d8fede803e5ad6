use crate::graph::dot::{self, INPUT_COLOR};
use crate::network::source::{NodeId, SignalSource};

/// Externally settable input of a network.
#[derive(Debug, Clone)]
pub struct InputTerminal {
    id: NodeId,
    value: f64,
}

impl InputTerminal {
    pub fn new(initial_value: f64) -> InputTerminal {
        InputTerminal { id: NodeId::next(), value: initial_value }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Replaces the current value. Non-finite values are accepted as-is.
    pub fn set(&mut self, value: f64) {
        self.value = value;
    }

    /// `"<id>" [label="<value>", color=green]`
    pub fn graph_node(&self) -> String {
        dot::node_statement(self.id, &[dot::number(self.value)], INPUT_COLOR)
    }
}

impl SignalSource for InputTerminal {
    fn id(&self) -> NodeId {
        self.id
    }

    fn value(&self) -> f64 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_value() {
        let mut input = InputTerminal::new(0.0);
        input.set(3.5);
        assert_eq!(input.value(), 3.5);
        input.set(f64::INFINITY);
        assert_eq!(input.value(), f64::INFINITY);
    }

    #[test]
    fn test_graph_node_is_green() {
        let input = InputTerminal::new(0.456);
        assert_eq!(
            input.graph_node(),
            format!("\"{}\" [label=\"0.46\", color=green]", input.id())
        );
    }
}
