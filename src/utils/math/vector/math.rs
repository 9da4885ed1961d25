use std::cmp::Ordering;

use num::{Num, NumCast};

use super::ZeroSpVec;

impl<N> ZeroSpVec<N>
where
    N: Num + Copy + Into<f64>,
{
    /// Dot product, accumulated in f64.
    ///
    /// Walks both index lists once (merge join), so the cost is
    /// `O(nnz(self) + nnz(other))`.
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        debug_assert_eq!(
            self.len(),
            other.len(),
            "Vectors must be of the same length to compute dot product."
        );
        let (a_inds, a_vals) = (&self.inds, &self.vals);
        let (b_inds, b_vals) = (&other.inds, &other.vals);
        let mut result = 0_f64;
        let mut i = 0;
        let mut j = 0;
        while i < a_inds.len() && j < b_inds.len() {
            match a_inds[i].cmp(&b_inds[j]) {
                Ordering::Equal => {
                    let (a, b): (f64, f64) = (a_vals[i].into(), b_vals[j].into());
                    result += a * b;
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        result
    }

    /// Squared L2 norm.
    ///
    /// Squares are summed smallest first, so two vectors holding the same
    /// multiset of values get bit-identical norms regardless of where the
    /// values sit.
    pub fn norm_sq(&self) -> f64 {
        let mut squares: Vec<f64> = self
            .vals
            .iter()
            .map(|&v| {
                let v: f64 = v.into();
                v * v
            })
            .collect();
        squares.sort_by(f64::total_cmp);
        squares.into_iter().sum()
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm_sq().sqrt()
    }
}

impl<N> ZeroSpVec<N>
where
    N: Num + Copy + Into<f64> + NumCast,
{
    /// Scale to unit L2 norm. All-zero vectors are left unchanged.
    pub fn l2_normalize(&mut self) {
        let norm = self.norm();
        if norm == 0.0 {
            return;
        }
        for val in self.vals.iter_mut() {
            let v: f64 = (*val).into();
            let scaled = v / norm;
            *val = <N as NumCast>::from(scaled).unwrap_or_else(N::zero);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_only_counts_shared_indices() {
        let a = ZeroSpVec::from_entries(5, vec![(0, 1.0f32), (2, 2.0), (4, 3.0)]);
        let b = ZeroSpVec::from_entries(5, vec![(2, 4.0f32), (3, 7.0), (4, 1.0)]);
        assert_eq!(a.dot(&b), 11.0);
        assert_eq!(a.dot(&b), b.dot(&a));
    }

    #[test]
    fn norm_is_position_independent() {
        let a = ZeroSpVec::from_entries(6, vec![(0, 0.3f32), (1, 0.7), (5, 0.1)]);
        let b = ZeroSpVec::from_entries(6, vec![(2, 0.1f32), (3, 0.3), (4, 0.7)]);
        assert_eq!(a.norm_sq().to_bits(), b.norm_sq().to_bits());
    }

    #[test]
    fn normalize_gives_unit_length() {
        let mut v = ZeroSpVec::from_entries(3, vec![(0, 3.0f64), (2, 4.0)]);
        v.l2_normalize();
        assert!((v.norm() - 1.0).abs() < 1e-12);
        assert_eq!(v.get(0), Some(0.6));

        let mut zero: ZeroSpVec<f64> = ZeroSpVec::zeros(3);
        zero.l2_normalize();
        assert_eq!(zero.nnz(), 0);
    }
}
