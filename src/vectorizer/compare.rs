use num::Num;

use crate::utils::math::vector::ZeroSpVec;

/// Cosine similarity.
/// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
///
/// Returns 0.0 when either side is the zero vector, so scores are never NaN.
pub fn cosine_similarity<N>(a: &ZeroSpVec<N>, b: &ZeroSpVec<N>) -> f64
where
    N: Num + Copy + Into<f64>,
{
    cosine_from_norms(a.dot(b), a.norm(), b.norm())
}

/// Cosine similarity from a dot product and both norms, for callers that
/// already know the norms. 0.0 when either norm is 0.
#[inline]
pub fn cosine_from_norms(dot: f64, norm_a: f64, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_direction_scores_one() {
        let a = ZeroSpVec::from_entries(4, vec![(0, 1.0f64), (3, 2.0)]);
        let b = ZeroSpVec::from_entries(4, vec![(0, 2.0f64), (3, 4.0)]);
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn disjoint_and_zero_vectors_score_zero() {
        let a = ZeroSpVec::from_entries(4, vec![(0, 1.0f32)]);
        let b = ZeroSpVec::from_entries(4, vec![(1, 1.0f32)]);
        let zero = ZeroSpVec::zeros(4);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
        assert_eq!(cosine_similarity(&a, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn symmetric() {
        let a = ZeroSpVec::from_entries(5, vec![(0, 0.2f32), (2, 0.9), (4, 0.1)]);
        let b = ZeroSpVec::from_entries(5, vec![(1, 0.4f32), (2, 0.3), (4, 0.8)]);
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }
}
