//! Candle-backed sequence classifier.
//!
//! A model artifact is a directory with two files:
//! - `config.json`: a `ClassifierConfig`
//! - `model.safetensors`: the weights
//!
//! ## Architecture
//! ```text
//! ids (batch, max_len)
//!   -> embedding            (batch, max_len, embedding_dim)
//!   -> global average | lstm (batch, embedding_dim | hidden_size)
//!   -> dense                (batch, 1)
//!   -> sigmoid
//! ```
//!
//! Tensor names: `embedding.weight`, `lstm.{weight_ih_l0, weight_hh_l0,
//! bias_ih_l0, bias_hh_l0}`, `dense.weight`, `dense.bias`.

use crate::error::{Result, SentimentError};
use crate::model::SentimentModel;
use candle_core::{DType, Device, Tensor};
use candle_nn::{Embedding, LSTMConfig, Linear, Module, RNN, VarBuilder, LSTM};
use pipeline::PaddedBatch;
use review_data::UNKNOWN_ID;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_FILE: &str = "config.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";
pub const DEFAULT_MAX_LEN: usize = 200;

/// Layer between the embedding and the output unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceLayer {
    /// Mean of the embeddings over every position, padding included
    #[default]
    GlobalAverage,
    /// Single-layer LSTM; its last hidden state feeds the output unit
    Lstm,
}

/// Shape of a classifier artifact, stored as `config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Rows in the embedding table
    pub vocab_size: usize,
    pub embedding_dim: usize,
    /// LSTM state size; ignored by `GlobalAverage`
    #[serde(default)]
    pub hidden_size: usize,
    #[serde(default = "default_max_len")]
    pub max_len: usize,
    #[serde(default)]
    pub layer: SequenceLayer,
}

fn default_max_len() -> usize {
    DEFAULT_MAX_LEN
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(SentimentError::InvalidConfig { reason });

        if self.vocab_size <= UNKNOWN_ID as usize {
            return invalid(format!(
                "vocab_size must be greater than {}, got {}",
                UNKNOWN_ID, self.vocab_size
            ));
        }
        if self.embedding_dim == 0 {
            return invalid("embedding_dim must be positive".to_string());
        }
        if self.max_len == 0 {
            return invalid("max_len must be positive".to_string());
        }
        if self.layer == SequenceLayer::Lstm && self.hidden_size == 0 {
            return invalid("hidden_size must be positive for an lstm layer".to_string());
        }
        Ok(())
    }

    fn output_features(&self) -> usize {
        match self.layer {
            SequenceLayer::GlobalAverage => self.embedding_dim,
            SequenceLayer::Lstm => self.hidden_size,
        }
    }
}

/// Paths of one model artifact
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub dir: PathBuf,
    pub config_path: PathBuf,
    pub weights_path: PathBuf,
}

impl ModelFiles {
    /// Locate the artifact files, failing if any of them is missing
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let files = Self {
            dir: dir.to_path_buf(),
            config_path: dir.join(CONFIG_FILE),
            weights_path: dir.join(WEIGHTS_FILE),
        };

        for path in [&files.dir, &files.config_path, &files.weights_path] {
            if !path.exists() {
                return Err(SentimentError::ModelNotFound {
                    path: path.display().to_string(),
                });
            }
        }
        Ok(files)
    }
}

enum SequenceBody {
    GlobalAverage,
    Lstm(LSTM),
}

/// Embedding + pooling + sigmoid classifier
pub struct SequenceClassifier {
    name: String,
    config: ClassifierConfig,
    embedding: Embedding,
    body: SequenceBody,
    dense: Linear,
    device: Device,
}

impl SequenceClassifier {
    /// Load an artifact from disk. Any missing file, unreadable config or
    /// weight that does not match the config is an error here, never later.
    pub fn load(files: &ModelFiles) -> Result<Self> {
        let path = files.dir.display().to_string();
        let load_error = |reason: String| SentimentError::ModelLoad {
            path: path.clone(),
            reason,
        };

        let raw = fs::read_to_string(&files.config_path)
            .map_err(|e| load_error(format!("reading {}: {}", CONFIG_FILE, e)))?;
        let config: ClassifierConfig = serde_json::from_str(&raw)
            .map_err(|e| load_error(format!("parsing {}: {}", CONFIG_FILE, e)))?;

        let device = Device::Cpu;
        // SAFETY: the weights file is mmap'd and must not be modified while
        // the model is alive.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[&files.weights_path], DType::F32, &device)
        }
        .map_err(|e| load_error(format!("reading {}: {}", WEIGHTS_FILE, e)))?;

        let classifier = Self::from_var_builder(path.clone(), config, vb)?;
        info!(
            "Loaded {:?} classifier from {} (vocab {}, width {})",
            classifier.config.layer, path, classifier.config.vocab_size, classifier.config.max_len
        );
        Ok(classifier)
    }

    /// Build the network from already-resolved weights
    pub fn from_var_builder(
        name: impl Into<String>,
        config: ClassifierConfig,
        vb: VarBuilder,
    ) -> Result<Self> {
        config.validate()?;
        let name = name.into();
        let device = vb.device().clone();
        let load_error = |e: candle_core::Error| SentimentError::ModelLoad {
            path: name.clone(),
            reason: e.to_string(),
        };

        let embedding = candle_nn::embedding(
            config.vocab_size,
            config.embedding_dim,
            vb.pp("embedding"),
        )
        .map_err(load_error)?;

        let body = match config.layer {
            SequenceLayer::GlobalAverage => SequenceBody::GlobalAverage,
            SequenceLayer::Lstm => SequenceBody::Lstm(
                candle_nn::lstm(
                    config.embedding_dim,
                    config.hidden_size,
                    LSTMConfig::default(),
                    vb.pp("lstm"),
                )
                .map_err(load_error)?,
            ),
        };

        let dense =
            candle_nn::linear(config.output_features(), 1, vb.pp("dense")).map_err(load_error)?;

        Ok(Self {
            name,
            config,
            embedding,
            body,
            dense,
            device,
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    fn forward(&self, batch: &PaddedBatch) -> candle_core::Result<Tensor> {
        let vocab_size = self.config.vocab_size;
        let mut clamped = 0usize;
        let ids: Vec<u32> = batch
            .as_slice()
            .iter()
            .map(|&id| {
                if (id as usize) < vocab_size {
                    id
                } else {
                    clamped += 1;
                    UNKNOWN_ID
                }
            })
            .collect();
        if clamped > 0 {
            debug!("{} token ids beyond vocab_size {} mapped to unknown", clamped, vocab_size);
        }

        let input = Tensor::from_vec(ids, (batch.batch_size(), batch.max_len()), &self.device)?;
        let embedded = self.embedding.forward(&input)?;

        let features = match &self.body {
            SequenceBody::GlobalAverage => embedded.mean(1)?,
            SequenceBody::Lstm(lstm) => {
                let states = lstm.seq(&embedded)?;
                states
                    .last()
                    .map(|state| state.h().clone())
                    .ok_or_else(|| candle_core::Error::Msg("empty input sequence".to_string()))?
            }
        };

        let logits = self.dense.forward(&features)?;
        candle_nn::ops::sigmoid(&logits)?.squeeze(1)
    }
}

impl SentimentModel for SequenceClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_len(&self) -> usize {
        self.config.max_len
    }

    fn predict(&self, batch: &PaddedBatch) -> Result<Vec<f32>> {
        if batch.max_len() != self.config.max_len {
            return Err(SentimentError::prediction(format!(
                "batch width {} does not match model width {}",
                batch.max_len(),
                self.config.max_len
            )));
        }
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        self.forward(batch)
            .and_then(|scores| scores.to_vec1::<f32>())
            .map_err(SentimentError::prediction)
    }
}
