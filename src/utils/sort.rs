/// Stable LSD radix sort of parallel `inds` / `vals` arrays by `inds`.
///
/// Equal indices keep their input order. All four byte histograms are
/// collected in one scan, and a byte position where every key falls into the
/// same bucket is skipped. Vocabulary indices rarely use the upper bytes, so
/// most sorts run one or two passes.
pub fn radix_sort_u32_soa<N: Copy + Default>(inds: &mut [u32], vals: &mut [N]) {
    assert_eq!(inds.len(), vals.len(), "inds and vals must pair up");
    let n = inds.len();
    if n < 2 {
        return;
    }
    if n <= 32 {
        insertion_sort_u32_soa(inds, vals);
        return;
    }

    let mut histograms = [[0usize; 256]; 4];
    for &key in inds.iter() {
        for (byte, histogram) in histograms.iter_mut().enumerate() {
            histogram[digit(key, byte)] += 1;
        }
    }

    let mut scratch_inds = vec![0u32; n];
    let mut scratch_vals = vec![N::default(); n];
    // true while the sorted data sits in the scratch buffers
    let mut in_scratch = false;

    for (byte, histogram) in histograms.iter().enumerate() {
        if histogram.iter().any(|&c| c == n) {
            continue;
        }
        let mut offsets = [0usize; 256];
        let mut next = 0;
        for (offset, &count) in offsets.iter_mut().zip(histogram.iter()) {
            *offset = next;
            next += count;
        }

        let (src_i, src_v, dst_i, dst_v): (&[u32], &[N], &mut [u32], &mut [N]) = if in_scratch {
            (scratch_inds.as_slice(), scratch_vals.as_slice(), &mut *inds, &mut *vals)
        } else {
            (&*inds, &*vals, scratch_inds.as_mut_slice(), scratch_vals.as_mut_slice())
        };
        for (&key, &val) in src_i.iter().zip(src_v) {
            let slot = &mut offsets[digit(key, byte)];
            dst_i[*slot] = key;
            dst_v[*slot] = val;
            *slot += 1;
        }
        in_scratch = !in_scratch;
    }

    if in_scratch {
        inds.copy_from_slice(&scratch_inds);
        vals.copy_from_slice(&scratch_vals);
    }
}

#[inline]
fn digit(key: u32, byte: usize) -> usize {
    ((key >> (byte * 8)) & 0xFF) as usize
}

fn insertion_sort_u32_soa<N: Copy>(inds: &mut [u32], vals: &mut [N]) {
    for i in 1..inds.len() {
        let (key, val) = (inds[i], vals[i]);
        let mut hole = i;
        while hole > 0 && inds[hole - 1] > key {
            inds[hole] = inds[hole - 1];
            vals[hole] = vals[hole - 1];
            hole -= 1;
        }
        inds[hole] = key;
        vals[hole] = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn std_stable(inds: &[u32]) -> (Vec<u32>, Vec<usize>) {
        let mut pairs: Vec<(u32, usize)> = inds.iter().copied().zip(0..).collect();
        pairs.sort_by_key(|&(key, _)| key);
        pairs.into_iter().unzip()
    }

    #[test]
    fn trivial_inputs() {
        let (mut inds, mut vals): (Vec<u32>, Vec<f32>) = (vec![], vec![]);
        radix_sort_u32_soa(&mut inds, &mut vals);
        assert!(inds.is_empty());

        let (mut inds, mut vals) = (vec![9u32], vec![0.5f32]);
        radix_sort_u32_soa(&mut inds, &mut vals);
        assert_eq!((inds, vals), (vec![9], vec![0.5]));
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let mut inds: Vec<u32> = (0..100).map(|i| [7, 300, 7, 70_000][i % 4]).collect();
        let mut vals: Vec<usize> = (0..100).collect();
        let expected = std_stable(&inds);
        radix_sort_u32_soa(&mut inds, &mut vals);
        assert_eq!((inds, vals), expected);
    }

    proptest! {
        #[test]
        fn agrees_with_std_stable_sort(keys in prop::collection::vec(any::<u32>(), 0..400)) {
            let mut inds = keys.clone();
            let mut vals: Vec<usize> = (0..keys.len()).collect();
            radix_sort_u32_soa(&mut inds, &mut vals);
            prop_assert_eq!((inds, vals), std_stable(&keys));
        }

        #[test]
        fn agrees_on_small_key_ranges(keys in prop::collection::vec(0u32..512, 33..200)) {
            let mut inds = keys.clone();
            let mut vals: Vec<usize> = (0..keys.len()).collect();
            radix_sort_u32_soa(&mut inds, &mut vals);
            prop_assert_eq!((inds, vals), std_stable(&keys));
        }
    }
}
