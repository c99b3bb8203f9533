//! Embedding provider abstraction.
//!
//! `Embedder` mirrors the `LlmProvider` enum-dispatch idiom: one variant
//! per backend, no trait objects. The only built-in backend is
//! [`HashEmbedder`], a deterministic digest-derived placeholder; a real
//! model slots in as a new variant without touching the matcher.
//!
//! The contract downstream code relies on is determinism and fixed
//! length, not the derivation: identical input text always yields a
//! bit-identical vector of exactly `dim` components, across calls and
//! across process restarts.

use sha2::{Digest, Sha256};

/// All available embedding backends.
#[derive(Debug, Clone)]
pub enum Embedder {
    Hash(HashEmbedder),
}

impl Embedder {
    /// Deterministic placeholder embedder with the given dimension.
    pub fn hash(dim: usize) -> Self {
        Embedder::Hash(HashEmbedder::new(dim))
    }

    /// Embed `text` into a fixed-length vector.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        match self {
            Embedder::Hash(e) => e.embed(text),
        }
    }

    /// The fixed output dimension D.
    pub fn dim(&self) -> usize {
        match self {
            Embedder::Hash(e) => e.dim,
        }
    }
}

/// Placeholder embedding derived from chained SHA-256 digests.
///
/// Block `i` of the output is `SHA-256(i_le || text)`; blocks are
/// concatenated and truncated to `dim` bytes, each scaled by 1/255 into
/// `[0, 1]`. Pure function of the input bytes — no randomness, no
/// external state.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.dim);
        let mut counter: u32 = 0;
        while out.len() < self.dim {
            let mut hasher = Sha256::new();
            hasher.update(counter.to_le_bytes());
            hasher.update(text.as_bytes());
            let digest = hasher.finalize();
            for byte in digest {
                if out.len() == self.dim {
                    break;
                }
                out.push(byte as f32 / 255.0);
            }
            counter += 1;
        }
        out
    }
}
