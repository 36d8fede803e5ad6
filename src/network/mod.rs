pub mod builder;
pub mod connection;
pub mod input;
pub mod network;
pub mod neuron;
pub mod source;
pub mod spec;

pub use builder::build_feed_forward;
pub use connection::Connection;
pub use input::InputTerminal;
pub use network::Network;
pub use neuron::{ComputedNode, NodeState};
pub use source::{NodeId, SignalSource, Signals, SourceRef};
pub use spec::TopologySpec;
