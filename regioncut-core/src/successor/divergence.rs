//! Kullback–Leibler divergence over raw, non-negative feature vectors.

use crate::error::FeatureError;

/// Divergence value plus the number of terms skipped for lack of support.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Divergence {
    pub(crate) value: f64,
    pub(crate) skipped: usize,
}

/// Computes `KL(p‖q) = Σ p_i ln(p_i / q_i)` without normalising either side.
///
/// Terms with `p_i == 0` contribute nothing. Terms with `p_i > 0` and
/// `q_i == 0` are skipped and counted rather than treated as infinite.
pub(crate) fn kl_divergence(p: &[f64], q: &[f64]) -> Result<Divergence, FeatureError> {
    if p.len() != q.len() {
        return Err(FeatureError::DimensionMismatch {
            left: p.len(),
            right: q.len(),
        });
    }
    if p.is_empty() {
        return Err(FeatureError::ZeroDimension);
    }

    let mut value = 0.0;
    let mut skipped = 0;
    for (&pi, &qi) in p.iter().zip(q) {
        if pi == 0.0 {
            continue;
        }
        if qi == 0.0 {
            skipped += 1;
            continue;
        }
        value += pi * (pi / qi).ln();
    }
    Ok(Divergence { value, skipped })
}

/// Symmetrised divergence `KL(p‖q) + KL(q‖p)`.
pub(crate) fn symmetric_kl(p: &[f64], q: &[f64]) -> Result<Divergence, FeatureError> {
    let forward = kl_divergence(p, q)?;
    let backward = kl_divergence(q, p)?;
    Ok(Divergence {
        value: forward.value + backward.value,
        skipped: forward.skipped + backward.skipped,
    })
}
