use rand::Rng;
use tracing::debug;

use crate::error::Result;
use crate::network::input::InputTerminal;
use crate::network::network::Network;
use crate::network::neuron::ComputedNode;
use crate::network::source::SourceRef;

/// Builds `inputs -> hidden -> output`, each layer fully connected to the
/// previous one, with weights and biases drawn from [0, 1).
///
/// Terminals start at 0. The node list is the hidden layer followed by the
/// output layer. Any size may be zero; output nodes without a hidden layer
/// have an empty fan-in and evaluate to `sigmoid(bias)`.
pub fn build_feed_forward<R: Rng + ?Sized>(
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    rng: &mut R,
) -> Result<Network> {
    let inputs: Vec<InputTerminal> = (0..input_size).map(|_| InputTerminal::new(0.0)).collect();

    let input_refs: Vec<SourceRef> = (0..input_size).map(SourceRef::Input).collect();
    let hidden_refs: Vec<SourceRef> = (0..hidden_size).map(SourceRef::Node).collect();

    let mut nodes = Vec::with_capacity(hidden_size + output_size);
    nodes.extend((0..hidden_size).map(|_| ComputedNode::random(&input_refs, &mut *rng)));
    nodes.extend((0..output_size).map(|_| ComputedNode::random(&hidden_refs, &mut *rng)));

    debug!(input_size, hidden_size, output_size, "built feed-forward network");
    Network::new(inputs, nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::sigmoid;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_layer_shapes() {
        let mut rng = StdRng::seed_from_u64(1);
        let network = build_feed_forward(3, 5, 2, &mut rng).unwrap();

        assert_eq!(network.inputs().len(), 3);
        assert_eq!(network.nodes().len(), 7);
        for hidden in &network.nodes()[..5] {
            let sources: Vec<SourceRef> = hidden.connections().iter().map(|c| c.source()).collect();
            assert_eq!(sources, (0..3).map(SourceRef::Input).collect::<Vec<_>>());
        }
        for output in &network.nodes()[5..] {
            let sources: Vec<SourceRef> = output.connections().iter().map(|c| c.source()).collect();
            assert_eq!(sources, (0..5).map(SourceRef::Node).collect::<Vec<_>>());
        }
        assert_eq!(network.levels().len(), 2);
    }

    #[test]
    fn test_inputs_start_at_zero() {
        let mut rng = StdRng::seed_from_u64(2);
        let network = build_feed_forward(4, 1, 1, &mut rng).unwrap();
        assert!(network.inputs().iter().all(|t| t.value() == 0.0));
    }

    #[test]
    fn test_same_seed_same_parameters() {
        let a = build_feed_forward(2, 3, 1, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = build_feed_forward(2, 3, 1, &mut StdRng::seed_from_u64(9)).unwrap();
        for (x, y) in a.nodes().iter().zip(b.nodes()) {
            assert_eq!(x.bias(), y.bias());
            assert_eq!(x.connections(), y.connections());
        }
    }

    #[test]
    fn test_zero_sizes_are_allowed() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut network = build_feed_forward(0, 0, 0, &mut rng).unwrap();
        network.compute().unwrap();
        assert!(network.nodes().is_empty());
        assert!(network.inputs().is_empty());
    }

    #[test]
    fn test_no_hidden_layer_outputs_sigmoid_of_bias() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut network = build_feed_forward(3, 0, 2, &mut rng).unwrap();
        network.set_inputs(&[5.0, -7.0, 0.3]).unwrap();
        network.compute().unwrap();

        for node in network.nodes() {
            assert!(node.connections().is_empty());
            assert_relative_eq!(node.value(), sigmoid(node.bias()));
        }
    }
}
