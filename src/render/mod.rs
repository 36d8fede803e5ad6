//! Collaborators that turn network and grid state into images.

pub mod graphviz;
pub mod grid;

pub use graphviz::{render_png, RenderOptions};
pub use grid::{animate, random_frame, AnimationConfig, Canvas, GridColor, GridFrame, GridItem};
