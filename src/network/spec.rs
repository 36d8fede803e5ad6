use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{KvolveError, Result};
use crate::network::builder::build_feed_forward;
use crate::network::network::Network;

/// Serializable description of a feed-forward topology.
///
/// Sizes are signed so that a hand-edited file with a negative size is
/// reported as `InvalidArgument` instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologySpec {
    /// Human-readable name, also used as the default output file stem.
    pub name: String,
    pub input_size: i64,
    pub hidden_size: i64,
    pub output_size: i64,
    /// Fixed seed for reproducible weights; fresh entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for TopologySpec {
    fn default() -> Self {
        TopologySpec {
            name: "kvolve".to_string(),
            input_size: 3,
            hidden_size: 5,
            output_size: 2,
            seed: None,
        }
    }
}

impl TopologySpec {
    /// Validated `(input, hidden, output)` sizes.
    pub fn layer_sizes(&self) -> Result<(usize, usize, usize)> {
        Ok((
            layer_size("input_size", self.input_size)?,
            layer_size("hidden_size", self.hidden_size)?,
            layer_size("output_size", self.output_size)?,
        ))
    }

    /// RNG seeded from `seed`, or from entropy.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Validates the sizes, then builds a random network.
    pub fn build(&self) -> Result<Network> {
        let (input, hidden, output) = self.layer_sizes()?;
        build_feed_forward(input, hidden, output, &mut self.rng())
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        info!(path, "saved topology spec");
        Ok(())
    }

    /// Deserializes a `TopologySpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<TopologySpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

fn layer_size(field: &str, size: i64) -> Result<usize> {
    usize::try_from(size).map_err(|_| {
        KvolveError::InvalidArgument(format!("{} must be non-negative, got {}", field, size))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_demo_topology() {
        let spec = TopologySpec::default();
        assert_eq!(spec.layer_sizes().unwrap(), (3, 5, 2));
    }

    #[test]
    fn test_negative_size_is_invalid_argument() {
        let spec = TopologySpec { hidden_size: -1, ..TopologySpec::default() };
        let err = spec.build().unwrap_err();
        match err {
            KvolveError::InvalidArgument(msg) => assert!(msg.contains("hidden_size")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_sizes_build() {
        let spec = TopologySpec {
            input_size: 0,
            hidden_size: 0,
            output_size: 0,
            ..TopologySpec::default()
        };
        let network = spec.build().unwrap();
        assert!(network.nodes().is_empty());
    }

    #[test]
    fn test_seeded_build_is_reproducible() {
        let spec = TopologySpec { seed: Some(42), ..TopologySpec::default() };
        let a = spec.build().unwrap();
        let b = spec.build().unwrap();
        let biases = |n: &Network| n.nodes().iter().map(|x| x.bias()).collect::<Vec<_>>();
        assert_eq!(biases(&a), biases(&b));
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("topology.json");
        let path = path.to_str().unwrap();

        let spec = TopologySpec {
            name: "tiny".to_string(),
            input_size: 2,
            hidden_size: 1,
            output_size: 1,
            seed: Some(5),
        };
        spec.save_json(path).unwrap();
        assert_eq!(TopologySpec::load_json(path).unwrap(), spec);
    }

    #[test]
    fn test_seed_is_optional_in_json() {
        let json = r#"{"name":"n","input_size":1,"hidden_size":1,"output_size":1}"#;
        let spec: TopologySpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.seed, None);
    }
}
