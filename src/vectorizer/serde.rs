//! Model persistence.
//!
//! A model is written as one CBOR document:
//! `{ format_version, model: { analyzer, vocabulary, idf, documents, items } }`.
//! Loading checks the version first, then decodes and validates the model.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use ::serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{ModelLoadError, RecommenderError, Result},
    vectorizer::{tfidf::TFIDFEngine, FittedModel, Weight},
};

/// Bumped whenever the persisted layout changes.
pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct ModelArtifactRef<'a, M> {
    format_version: u32,
    model: &'a M,
}

#[derive(Deserialize)]
struct ModelArtifactHeader {
    format_version: u32,
    model: serde_cbor::Value,
}

impl<N, E> FittedModel<N, E>
where
    N: Weight + Serialize + DeserializeOwned,
    E: TFIDFEngine<N> + Send + Sync,
{
    /// Encode the model into `writer`.
    pub fn to_writer<W: Write>(&self, writer: W) -> std::result::Result<(), serde_cbor::Error> {
        serde_cbor::to_writer(
            writer,
            &ModelArtifactRef {
                format_version: MODEL_FORMAT_VERSION,
                model: self,
            },
        )
    }

    /// Write the model to `path`, creating parent directories.
    ///
    /// The file is written next to the target and renamed into place, so a
    /// reader never sees a half-written model.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let save_err = |message: String| RecommenderError::ModelSave {
            path: path.to_path_buf(),
            message,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| save_err(e.to_string()))?;
        }
        let tmp = path.with_extension("tmp");
        let file = File::create(&tmp).map_err(|e| save_err(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer).map_err(|e| save_err(e.to_string()))?;
        writer.flush().map_err(|e| save_err(e.to_string()))?;
        drop(writer);
        fs::rename(&tmp, path).map_err(|e| save_err(e.to_string()))?;
        info!(path = %path.display(), summary = %self.summary(), "model saved");
        Ok(())
    }

    /// Decode a model from `reader` and check its consistency.
    pub fn from_reader<R: Read>(reader: R) -> std::result::Result<Self, ModelLoadError> {
        let header: ModelArtifactHeader = serde_cbor::from_reader(reader)?;
        if header.format_version != MODEL_FORMAT_VERSION {
            return Err(ModelLoadError::UnsupportedVersion {
                found: header.format_version,
                expected: MODEL_FORMAT_VERSION,
            });
        }
        let model: Self = serde_cbor::value::from_value(header.model)?;
        model.check_consistency()?;
        Ok(model)
    }

    /// Load a model written by [`FittedModel::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_reader(BufReader::new(file))?;
        info!(path = %path.display(), summary = %model.summary(), "model loaded");
        Ok(model)
    }

    fn check_consistency(&self) -> std::result::Result<(), ModelLoadError> {
        let terms = self.vocabulary.len();
        if self.documents.len() != self.items.len() {
            return Err(ModelLoadError::Corrupt(format!(
                "{} vectors for {} catalog rows",
                self.documents.len(),
                self.items.len()
            )));
        }
        if self.idf.doc_num != self.items.len() as u64 {
            return Err(ModelLoadError::Corrupt(format!(
                "idf fitted on {} rows, model has {}",
                self.idf.doc_num,
                self.items.len()
            )));
        }
        if self.idf.idf_vec.len() != terms {
            return Err(ModelLoadError::Corrupt(format!(
                "{} idf weights for {} terms",
                self.idf.idf_vec.len(),
                terms
            )));
        }
        if let Some(row) = self.documents.iter().position(|d| d.tf_vec.len() != terms) {
            return Err(ModelLoadError::Corrupt(format!(
                "row {row} has dimension {} instead of {terms}",
                self.documents[row].tf_vec.len()
            )));
        }
        if let Some(row) = self
            .documents
            .iter()
            .position(|d| d.norm.to_bits() != d.tf_vec.norm().to_bits())
        {
            return Err(ModelLoadError::Corrupt(format!("row {row} has a stale norm")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::{fit_model, tests::sample_items, FittedModel};

    #[test]
    fn save_then_load_gives_identical_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("cb_tfidf.cbor");
        let model = fit_model(sample_items(), 5000).unwrap();
        model.save(&path).unwrap();

        let loaded: FittedModel = FittedModel::load(&path).unwrap();
        assert_eq!(loaded.items(), model.items());
        assert_eq!(loaded.vocabulary(), model.vocabulary());
        assert_eq!(loaded.idf(), model.idf());
        assert_eq!(loaded.documents(), model.documents());
        assert_eq!(loaded.analyzer(), model.analyzer());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn missing_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FittedModel::<f32>::load(dir.path().join("nope.cbor")).unwrap_err();
        assert!(matches!(err, RecommenderError::ModelLoad(ModelLoadError::Io { .. })));
    }

    #[test]
    fn garbage_is_decode_error() {
        let err = FittedModel::<f32>::from_reader(&b"not a model"[..]).unwrap_err();
        assert!(matches!(err, ModelLoadError::Decode(_)));
    }

    #[test]
    fn wrong_version_is_rejected() {
        let model = fit_model(sample_items(), 5000).unwrap();
        let bytes = serde_cbor::to_vec(&ModelArtifactRef {
            format_version: MODEL_FORMAT_VERSION + 1,
            model: &model,
        })
        .unwrap();
        let err = FittedModel::<f32>::from_reader(&bytes[..]).unwrap_err();
        assert!(matches!(err, ModelLoadError::UnsupportedVersion { .. }));
    }

    #[test]
    fn misaligned_rows_are_corrupt() {
        let model = fit_model(sample_items(), 5000).unwrap();
        let items = model.items()[..2].to_vec();
        let misaligned: FittedModel = FittedModel::from_parts(
            model.analyzer().clone(),
            model.vocabulary().clone(),
            model.idf().clone(),
            model.documents().to_vec(),
            items,
        );
        let mut bytes = Vec::new();
        misaligned.to_writer(&mut bytes).unwrap();
        let err = FittedModel::<f32>::from_reader(&bytes[..]).unwrap_err();
        assert!(matches!(err, ModelLoadError::Corrupt(_)));
    }

    #[test]
    fn tampered_norm_is_corrupt() {
        let model = fit_model(sample_items(), 5000).unwrap();
        let mut documents = model.documents().to_vec();
        documents[1].norm = 2.0;
        let tampered: FittedModel = FittedModel::from_parts(
            model.analyzer().clone(),
            model.vocabulary().clone(),
            model.idf().clone(),
            documents,
            model.items().to_vec(),
        );
        let mut bytes = Vec::new();
        tampered.to_writer(&mut bytes).unwrap();
        let err = FittedModel::<f32>::from_reader(&bytes[..]).unwrap_err();
        assert!(matches!(err, ModelLoadError::Corrupt(_)));
    }

    #[test]
    fn idf_row_count_mismatch_is_corrupt() {
        let model = fit_model(sample_items(), 5000).unwrap();
        let mut idf = model.idf().clone();
        idf.doc_num = 7;
        let stale: FittedModel = FittedModel::from_parts(
            model.analyzer().clone(),
            model.vocabulary().clone(),
            idf,
            model.documents().to_vec(),
            model.items().to_vec(),
        );
        let mut bytes = Vec::new();
        stale.to_writer(&mut bytes).unwrap();
        let err = FittedModel::<f32>::from_reader(&bytes[..]).unwrap_err();
        assert!(matches!(err, ModelLoadError::Corrupt(_)));
    }
}
