//! Cosine similarity between embedding vectors.

/// Guards the division when either vector has zero magnitude.
const EPSILON: f32 = 1e-8;

/// Cosine similarity: `dot(a, b) / (‖a‖·‖b‖ + ε)`.
///
/// Symmetric in its arguments. With the nonnegative placeholder
/// embedding the result lands in `[0, 1]`; a real embedding backend can
/// produce negative components, so callers must treat `[-1, 1]` as the
/// general range.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must share a dimension");

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt() + EPSILON)
}
