// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 tweetkit contributors

//! Four-artifact persistence for a trained model bundle
//!
//! A trained classifier is reusable once four things are on disk:
//! 1. the tokenizer state (`tokenizer.bin`)
//! 2. the model architecture (`model.json`)
//! 3. the model weights (`model.weights`)
//! 4. the maximum sequence length (`maxlen.json`)
//!
//! `ModelStore` sequences those four save/load steps under a directory
//! prefix. The tokenizer and model are opaque collaborators behind the
//! `TokenizerState` and `PersistableModel` traits; their on-disk formats are
//! owned by the implementors. The first failing step aborts the sequence and
//! artifacts already written stay on disk (no rollback).

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

const TOKENIZER_FILE: &str = "tokenizer.bin";
const ARCHITECTURE_FILE: &str = "model.json";
const WEIGHTS_FILE: &str = "model.weights";
const MAXLEN_FILE: &str = "maxlen.json";

/// Serializable tokenizer state. The blob format is the implementor's own.
pub trait TokenizerState: Sized {
    /// Serialize the full tokenizer state to bytes.
    fn to_bytes(&self) -> Result<Vec<u8>>;

    /// Reconstruct the tokenizer from bytes produced by `to_bytes`.
    fn from_bytes(bytes: &[u8]) -> Result<Self>;
}

/// A model whose architecture and weights persist separately: the
/// architecture as a JSON description, the weights as an opaque blob loaded
/// back into the rebuilt model.
pub trait PersistableModel: Sized {
    /// Describe the architecture as JSON text.
    fn architecture_json(&self) -> Result<String>;

    /// Rebuild an unweighted model from its architecture description.
    fn from_architecture_json(json: &str) -> Result<Self>;

    /// Serialize the current weights to bytes.
    fn weights(&self) -> Result<Vec<u8>>;

    /// Load weights produced by `weights` into this model.
    fn load_weights(&mut self, bytes: &[u8]) -> Result<()>;
}

/// Stores and restores a (tokenizer, model, max_len) bundle as four
/// artifacts under a directory prefix.
#[derive(Debug, Clone)]
pub struct ModelStore {
    store_path: PathBuf,
}

impl ModelStore {
    /// A store rooted at `store_path`. The directory is not created here; a
    /// missing directory surfaces as an I/O error on the first write.
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        let store_path = store_path.into();
        tracing::debug!("ModelStore created at {}", store_path.display());
        Self { store_path }
    }

    fn artifact(&self, name: &str) -> PathBuf {
        self.store_path.join(name)
    }

    /// Write the four artifacts in order: tokenizer, architecture, weights,
    /// max_len. Fails fast on the first error; earlier artifacts stay.
    pub fn store<T, M>(&self, tokenizer: &T, model: &M, max_len: usize) -> Result<()>
    where
        T: TokenizerState,
        M: PersistableModel,
    {
        let path = self.artifact(TOKENIZER_FILE);
        let bytes = tokenizer
            .to_bytes()
            .context("Failed to serialize tokenizer")?;
        fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Saved tokenizer to {}", path.display());

        let path = self.artifact(ARCHITECTURE_FILE);
        let json = model
            .architecture_json()
            .context("Failed to serialize model architecture")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Saved model architecture to {}", path.display());

        let path = self.artifact(WEIGHTS_FILE);
        let weights = model.weights().context("Failed to serialize model weights")?;
        fs::write(&path, weights)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Saved model weights to {}", path.display());

        let path = self.artifact(MAXLEN_FILE);
        let json = serde_json::to_string(&max_len).context("Failed to serialize max_len")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Saved max_len to {}", path.display());

        Ok(())
    }

    /// Read the four artifacts back and rebuild the bundle: the tokenizer
    /// from its blob, the model from architecture then weights, max_len
    /// from JSON.
    pub fn restore<T, M>(&self) -> Result<(T, M, usize)>
    where
        T: TokenizerState,
        M: PersistableModel,
    {
        let path = self.artifact(TOKENIZER_FILE);
        let bytes =
            fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        let tokenizer = T::from_bytes(&bytes).context("Failed to deserialize tokenizer")?;
        tracing::info!("Loaded tokenizer from {}", path.display());

        let path = self.artifact(ARCHITECTURE_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut model =
            M::from_architecture_json(&json).context("Failed to rebuild model architecture")?;
        tracing::info!("Loaded model architecture from {}", path.display());

        let path = self.artifact(WEIGHTS_FILE);
        let weights =
            fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        model
            .load_weights(&weights)
            .context("Failed to load model weights")?;
        tracing::info!("Loaded model weights from {}", path.display());

        let path = self.artifact(MAXLEN_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let max_len: usize = serde_json::from_str(&json).context("Failed to parse max_len")?;
        tracing::info!("Loaded max_len from {}", path.display());

        Ok((tokenizer, model, max_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct StubTokenizer {
        vocab: Vec<(String, u32)>,
        oov_token: String,
    }

    impl TokenizerState for StubTokenizer {
        fn to_bytes(&self) -> Result<Vec<u8>> {
            Ok(serde_json::to_vec(self)?)
        }

        fn from_bytes(bytes: &[u8]) -> Result<Self> {
            Ok(serde_json::from_slice(bytes)?)
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct StubModel {
        layers: Vec<String>,
        weights: Vec<f32>,
    }

    impl PersistableModel for StubModel {
        fn architecture_json(&self) -> Result<String> {
            Ok(serde_json::to_string(&self.layers)?)
        }

        fn from_architecture_json(json: &str) -> Result<Self> {
            Ok(Self {
                layers: serde_json::from_str(json)?,
                weights: Vec::new(),
            })
        }

        fn weights(&self) -> Result<Vec<u8>> {
            Ok(bincode::serialize(&self.weights)?)
        }

        fn load_weights(&mut self, bytes: &[u8]) -> Result<()> {
            self.weights = bincode::deserialize(bytes)?;
            Ok(())
        }
    }

    fn stub_bundle() -> (StubTokenizer, StubModel) {
        let tokenizer = StubTokenizer {
            vocab: vec![("xurl".to_string(), 1), ("xatp".to_string(), 2)],
            oov_token: "<oov>".to_string(),
        };
        let model = StubModel {
            layers: vec!["embedding".to_string(), "lstm".to_string(), "dense".to_string()],
            weights: vec![0.25, -1.5, 3.75, 0.0],
        };
        (tokenizer, model)
    }

    #[test]
    fn test_store_restore_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ModelStore::new(dir.path());
        let (tokenizer, model) = stub_bundle();

        store.store(&tokenizer, &model, 128).expect("store succeeds");
        let (restored_tokenizer, restored_model, max_len): (StubTokenizer, StubModel, usize) =
            store.restore().expect("restore succeeds");

        assert_eq!(restored_tokenizer, tokenizer);
        assert_eq!(restored_model, model);
        assert_eq!(max_len, 128);
    }

    #[test]
    fn test_store_writes_four_artifacts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ModelStore::new(dir.path());
        let (tokenizer, model) = stub_bundle();

        store.store(&tokenizer, &model, 60).expect("store succeeds");

        for name in ["tokenizer.bin", "model.json", "model.weights", "maxlen.json"] {
            assert!(dir.path().join(name).exists(), "{} missing", name);
        }
    }

    #[test]
    fn test_store_fails_on_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ModelStore::new(dir.path().join("not_created"));
        let (tokenizer, model) = stub_bundle();

        assert!(store.store(&tokenizer, &model, 60).is_err());
    }

    #[test]
    fn test_restore_fails_on_empty_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ModelStore::new(dir.path());

        let result: Result<(StubTokenizer, StubModel, usize)> = store.restore();
        assert!(result.is_err());
    }

    #[test]
    fn test_restore_fails_fast_on_missing_weights() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ModelStore::new(dir.path());
        let (tokenizer, model) = stub_bundle();

        store.store(&tokenizer, &model, 60).expect("store succeeds");
        std::fs::remove_file(dir.path().join("model.weights")).expect("remove weights");

        let result: Result<(StubTokenizer, StubModel, usize)> = store.restore();
        assert!(result.is_err());
    }

    #[test]
    fn test_restore_fails_on_corrupt_scalar() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ModelStore::new(dir.path());
        let (tokenizer, model) = stub_bundle();

        store.store(&tokenizer, &model, 60).expect("store succeeds");
        std::fs::write(dir.path().join("maxlen.json"), "not a number").expect("corrupt scalar");

        let result: Result<(StubTokenizer, StubModel, usize)> = store.restore();
        assert!(result.is_err());
    }
}
