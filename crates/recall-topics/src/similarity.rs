//! Vector similarity functions.
//!
//! Pure Rust implementation shared by the topic graph and retrieval.
//! Unlike most geometry helpers this never panics on mismatched
//! dimensions: heterogeneous vector history is an expected state of a
//! long-lived memory store, so callers get a neutral score instead of a
//! crash.

/// Cosine similarity between two vectors.
///
/// Returns a value in [-1.0, 1.0]. A zero-norm vector or mismatched
/// dimensions yield 0.0 rather than dividing by zero or panicking.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
