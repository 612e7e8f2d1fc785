//! Logit postprocessing and label ranking.

use ndarray::ArrayD;

/// Map logits to a probability distribution over the same index space.
///
/// The maximum logit is subtracted before exponentiating so large logits
/// cannot overflow. Outputs are non-negative and sum to 1 within
/// floating-point tolerance.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Flatten a raw model output and turn it into class probabilities.
pub fn postprocess(output: &ArrayD<f32>) -> Vec<f32> {
    let flat: Vec<f32> = output.iter().copied().collect();
    softmax(&flat)
}

/// Index of the highest probability, or `None` for an empty distribution.
pub fn argmax(probabilities: &[f32]) -> Option<usize> {
    probabilities
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(index, _)| index)
}

/// Indices of the `k` highest probabilities, ordered by descending probability.
///
/// Ranking is a full stable ascending sort of the index space, reversed and
/// truncated; exact ties therefore come out in descending index order, which
/// is a deterministic tie-break.
pub fn top_k(probabilities: &[f32], k: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..probabilities.len()).collect();
    indices.sort_by(|&a, &b| probabilities[a].total_cmp(&probabilities[b]));
    indices.reverse();
    indices.truncate(k);
    indices
}
