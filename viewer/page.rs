//! Page renderer for the viewer.
//!
//! A single HTML template with `{{TOKEN}}` placeholders, loaded at compile
//! time and filled from the current state.

use kvolve::render::Canvas;

use crate::state::ViewerState;

const TEMPLATE: &str = include_str!("assets/viewer.html");

pub fn render_page(state: &ViewerState) -> String {
    let canvas = Canvas::default();
    let values = state
        .network
        .values()
        .iter()
        .map(|v| format!("{:.2}", v))
        .collect::<Vec<_>>()
        .join(", ");

    TEMPLATE
        .replace("{{WIDTH}}", &canvas.width.to_string())
        .replace("{{HEIGHT}}", &canvas.height.to_string())
        .replace("{{SCALE}}", &canvas.scale.to_string())
        .replace("{{INPUTS}}", &state.network.inputs().len().to_string())
        .replace("{{NODES}}", &state.network.nodes().len().to_string())
        .replace("{{VALUES}}", &escape_html(&values))
        .replace("{{GRAPH}}", &escape_html(&state.network.export_graph()))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
