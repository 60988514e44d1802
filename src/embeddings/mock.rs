// Copyright (c) 2025 ReSys
// SPDX-License-Identifier: BUSL-1.1

//! Synthetic embedding generator used when no real encoder is available.
//!
//! Output is structurally valid (correct length, finite floats) but
//! semantically meaningless. Values are drawn fresh on every call, so two
//! calls with identical input produce different vectors. Downstream
//! consumers must treat mock output as non-comparable noise and check the
//! mode reported by /health before trusting any vector.

use rand::Rng;

#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dimension: usize,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns a vector of `dimension` values drawn independently and
    /// uniformly from [0, 1).
    pub fn generate(&self) -> Vec<f32> {
        let mut rng = rand::thread_rng();
        (0..self.dimension).map(|_| rng.gen::<f32>()).collect()
    }
}
