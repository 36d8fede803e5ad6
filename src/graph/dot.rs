use crate::network::source::NodeId;

pub const HEADER: &str = "digraph {rankdir=LR";
pub const FOOTER: &str = "}";

/// Color of input terminals.
pub const INPUT_COLOR: &str = "green";
/// Color of computed nodes when the caller does not pick one.
pub const NODE_COLOR: &str = "blue";

/// Every numeric label is printed with exactly two decimals.
pub fn number(x: f64) -> String {
    format!("{:.2}", x)
}

/// `"<id>" [label="<line>\n<line>", color=<color>]`
///
/// Label lines are joined with the two-character `\n` escape that Graphviz
/// turns into a line break.
pub fn node_statement(id: NodeId, label_lines: &[String], color: &str) -> String {
    format!(
        "\"{}\" [label=\"{}\", color={}]",
        id,
        label_lines.join("\\n"),
        color
    )
}

/// `"<from>" -> "<to>" [label="<weight>"]`
pub fn edge_statement(from: NodeId, to: NodeId, weight: f64) -> String {
    format!("\"{}\" -> \"{}\" [label=\"{}\"]", from, to, number(weight))
}
