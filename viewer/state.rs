use std::sync::{Arc, Mutex};

use kvolve::render::GridFrame;
use kvolve::Network;
use rand::rngs::StdRng;
use rand::Rng;

/// Everything the request handlers share.
pub struct ViewerState {
    pub network: Network,
    /// Drives input randomization; separate from the animation's RNG.
    pub rng: StdRng,
    /// Most recent frame produced by the animation thread.
    pub frame: Option<GridFrame>,
    /// Set once the animation has delivered its last frame.
    pub finished: bool,
}

impl ViewerState {
    pub fn new(network: Network, rng: StdRng) -> Self {
        ViewerState { network, rng, frame: None, finished: false }
    }

    /// Sets every input terminal to a fresh random value and runs one pass.
    ///
    /// Callers hold the state lock for the whole call, so no reader sees a
    /// half-evaluated network.
    pub fn randomize_inputs(&mut self) -> kvolve::Result<()> {
        let values: Vec<f64> = (0..self.network.inputs().len())
            .map(|_| self.rng.gen::<f64>())
            .collect();
        self.network.set_inputs(&values)?;
        self.network.compute()
    }
}

/// Shared state type — an `Arc<Mutex<ViewerState>>` passed to every handler.
pub type SharedState = Arc<Mutex<ViewerState>>;
