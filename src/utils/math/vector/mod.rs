pub mod math;
pub mod serde;

use std::fmt::{self, Debug};

use num::Num;

use crate::utils::sort::radix_sort_u32_soa;

/// Sparse vector that treats zero as the implicit element.
///
/// Holds parallel `inds` / `vals` arrays for the non-zero entries and the
/// logical length. Entries are kept sorted by index ascending with no
/// duplicate indices; every index is `< len`.
#[derive(Clone, PartialEq)]
pub struct ZeroSpVec<N> {
    len: usize,
    inds: Vec<u32>,
    vals: Vec<N>,
}

impl<N> ZeroSpVec<N> {
    #[inline]
    pub fn shrink_to_fit(&mut self) {
        self.inds.shrink_to_fit();
        self.vals.shrink_to_fit();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// number of stored (non-zero) entries
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    /// Iterate the non-zero entries as `(index, &value)`, index ascending.
    #[inline]
    pub fn raw_iter(&self) -> ZeroSpVecRawIter<'_, N> {
        ZeroSpVecRawIter { vec: self, pos: 0 }
    }
}

impl<N> ZeroSpVec<N>
where
    N: Num + Copy,
{
    #[inline]
    pub fn new() -> Self {
        ZeroSpVec {
            len: 0,
            inds: Vec::new(),
            vals: Vec::new(),
        }
    }

    /// All-zero vector of logical length `len`.
    #[inline]
    pub fn zeros(len: usize) -> Self {
        ZeroSpVec {
            len,
            inds: Vec::new(),
            vals: Vec::new(),
        }
    }

    /// Build from unordered `(index, value)` entries.
    /// Zero values are dropped; indices must be unique and `< len`.
    pub fn from_entries(len: usize, entries: impl IntoIterator<Item = (u32, N)>) -> Self
    where
        N: Default,
    {
        let (mut inds, mut vals): (Vec<u32>, Vec<N>) = entries
            .into_iter()
            .filter(|(_, v)| !v.is_zero())
            .unzip();
        radix_sort_u32_soa(&mut inds, &mut vals);
        debug_assert!(inds.windows(2).all(|w| w[0] < w[1]), "duplicate index");
        debug_assert!(inds.last().map_or(true, |&i| (i as usize) < len), "index out of range");
        ZeroSpVec { len, inds, vals }
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<N> {
        if index >= self.len {
            return None;
        }
        match self.inds.binary_search(&(index as u32)) {
            Ok(pos) => Some(self.vals[pos]),
            Err(_) => Some(N::zero()),
        }
    }

    /// Multiply every stored entry by the dense weight at its index.
    pub fn scale_by(&mut self, weights: &[N]) {
        for (ind, val) in self.inds.iter().zip(self.vals.iter_mut()) {
            *val = *val * weights.get(*ind as usize).copied().unwrap_or_else(N::zero);
        }
    }
}

impl<N> Default for ZeroSpVec<N>
where
    N: Num + Copy,
{
    #[inline]
    fn default() -> Self {
        ZeroSpVec::new()
    }
}

impl<N: Debug> Debug for ZeroSpVec<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.debug_map().entries(self.inds.iter().zip(self.vals.iter())).finish()
        } else {
            f.debug_struct("ZeroSpVec")
                .field("len", &self.len)
                .field("nnz", &self.inds.len())
                .finish()
        }
    }
}

pub struct ZeroSpVecRawIter<'a, N> {
    vec: &'a ZeroSpVec<N>,
    pos: usize,
}

impl<'a, N> Iterator for ZeroSpVecRawIter<'a, N> {
    type Item = (usize, &'a N);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let index = *self.vec.inds.get(self.pos)?;
        let value = &self.vec.vals[self.pos];
        self.pos += 1;
        Some((index as usize, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.vec.inds.len() - self.pos;
        (rest, Some(rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_see_implicit_zeros() {
        let v = ZeroSpVec::from_entries(4, vec![(3, 2.0f32), (1, 1.5), (2, 0.0)]);
        assert_eq!(v.len(), 4);
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.get(0), Some(0.0));
        assert_eq!(v.get(1), Some(1.5));
        assert_eq!(v.get(4), None);
        assert_eq!(v.raw_iter().map(|(i, _)| i).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn from_entries_sorts_and_drops_zeros() {
        let v = ZeroSpVec::from_entries(10, vec![(7, 1.0f64), (2, 3.0), (5, 0.0)]);
        let entries: Vec<(usize, f64)> = v.raw_iter().map(|(i, x)| (i, *x)).collect();
        assert_eq!(entries, vec![(2, 3.0), (7, 1.0)]);
        assert_eq!(v.len(), 10);
    }

    #[test]
    fn scale_by_uses_dense_weights() {
        let mut v = ZeroSpVec::from_entries(3, vec![(0, 2.0f32), (2, 1.0)]);
        v.scale_by(&[0.5, 9.0, 4.0]);
        assert_eq!(v.get(0), Some(1.0));
        assert_eq!(v.get(2), Some(4.0));
    }
}
