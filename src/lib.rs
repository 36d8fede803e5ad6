pub mod activation;
pub mod error;
pub mod graph;
pub mod network;
pub mod render;

// Convenience re-exports
pub use activation::sigmoid;
pub use error::{KvolveError, Result};
pub use network::{
    build_feed_forward, ComputedNode, Connection, InputTerminal, Network, NodeId, NodeState,
    SignalSource, Signals, SourceRef, TopologySpec,
};
pub use render::{render_png, RenderOptions};
