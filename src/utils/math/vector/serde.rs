use serde::de::Error as DeError;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ZeroSpVec;

impl<N> Serialize for ZeroSpVec<N>
where
    N: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // fields: len, inds, vals
        let mut state = serializer.serialize_struct("ZeroSpVec", 3)?;
        state.serialize_field("len", &(self.len as u64))?;
        state.serialize_field("inds", &self.inds)?;
        state.serialize_field("vals", &self.vals)?;
        state.end()
    }
}

impl<'de, N> Deserialize<'de> for ZeroSpVec<N>
where
    N: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ZeroSpVecData<N> {
            len: u64,
            inds: Vec<u32>,
            vals: Vec<N>,
        }

        let data = ZeroSpVecData::<N>::deserialize(deserializer)?;
        let len = usize::try_from(data.len).map_err(D::Error::custom)?;
        if data.inds.len() != data.vals.len() {
            return Err(D::Error::custom("ZeroSpVec: inds and vals length mismatch"));
        }
        if !data.inds.windows(2).all(|w| w[0] < w[1]) {
            return Err(D::Error::custom("ZeroSpVec: indices not strictly ascending"));
        }
        if data.inds.last().is_some_and(|&i| i as usize >= len) {
            return Err(D::Error::custom("ZeroSpVec: index out of range"));
        }
        Ok(ZeroSpVec {
            len,
            inds: data.inds,
            vals: data.vals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cbor_roundtrip_is_exact() {
        let v = ZeroSpVec::from_entries(8, vec![(6, 0.125f32), (1, 0.3)]);
        let bytes = serde_cbor::to_vec(&v).unwrap();
        let back: ZeroSpVec<f32> = serde_cbor::from_slice(&bytes).unwrap();
        assert!(back == v);
    }

    #[test]
    fn rejects_unsorted_or_out_of_range_indices() {
        #[derive(Serialize)]
        struct Raw {
            len: u64,
            inds: Vec<u32>,
            vals: Vec<f32>,
        }
        let unsorted = serde_cbor::to_vec(&Raw { len: 4, inds: vec![2, 1], vals: vec![1.0, 1.0] }).unwrap();
        assert!(serde_cbor::from_slice::<ZeroSpVec<f32>>(&unsorted).is_err());

        let out_of_range = serde_cbor::to_vec(&Raw { len: 2, inds: vec![5], vals: vec![1.0] }).unwrap();
        assert!(serde_cbor::from_slice::<ZeroSpVec<f32>>(&out_of_range).is_err());

        let mismatch = serde_cbor::to_vec(&Raw { len: 4, inds: vec![1], vals: vec![] }).unwrap();
        assert!(serde_cbor::from_slice::<ZeroSpVec<f32>>(&mismatch).is_err());
    }
}
