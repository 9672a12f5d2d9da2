//! The feed-forward policy network.
//!
//! Two hidden dense layers of width 128 with ReLU, followed by a 4096-way
//! output layer. The forward pass returns raw logits; the cross-entropy loss
//! and the predictor apply their own normalization.

use candle_core::Tensor;
use candle_nn::{Linear, Module, VarBuilder};
use fianchetto::{FEATURE_SIZE, MOVE_INDEX_COUNT};

pub const HIDDEN_SIZE: usize = 128;

pub struct PolicyNetwork {
    fc1: Linear,
    fc2: Linear,
    out: Linear,
}

impl PolicyNetwork {
    pub fn new(vb: VarBuilder) -> candle_core::Result<Self> {
        let fc1 = candle_nn::linear(FEATURE_SIZE, HIDDEN_SIZE, vb.pp("fc1"))?;
        let fc2 = candle_nn::linear(HIDDEN_SIZE, HIDDEN_SIZE, vb.pp("fc2"))?;
        let out = candle_nn::linear(HIDDEN_SIZE, MOVE_INDEX_COUNT, vb.pp("out"))?;
        Ok(PolicyNetwork { fc1, fc2, out })
    }

    /// Maps a `(batch, 768)` feature tensor to `(batch, 4096)` logits.
    pub fn forward(&self, features: &Tensor) -> candle_core::Result<Tensor> {
        let x = self.fc1.forward(features)?.relu()?;
        let x = self.fc2.forward(&x)?.relu()?;
        self.out.forward(&x)
    }
}
