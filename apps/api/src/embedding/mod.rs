/// Embedding service — the single owner of the sentence-embedding model.
///
/// The model is loaded lazily on first use and then reused for the life of the
/// process. `EmbeddingService` is built once in `main` and shared as `Arc<dyn Embedder>`;
/// nothing else constructs a `TextEmbedding`.
use std::str::FromStr;
use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("embedding inference failed: {0}")]
    Inference(String),

    #[error("embedding model returned no vector")]
    EmptyOutput,
}

/// Turns a document into a fixed-dimension vector.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Supported sentence-embedding models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelChoice {
    #[default]
    AllMiniLmL6V2,
    AllMiniLmL12V2,
    BgeSmallEnV15,
}

impl ModelChoice {
    pub fn name(&self) -> &'static str {
        match self {
            ModelChoice::AllMiniLmL6V2 => "all-MiniLM-L6-v2",
            ModelChoice::AllMiniLmL12V2 => "all-MiniLM-L12-v2",
            ModelChoice::BgeSmallEnV15 => "bge-small-en-v1.5",
        }
    }

    fn model(&self) -> EmbeddingModel {
        match self {
            ModelChoice::AllMiniLmL6V2 => EmbeddingModel::AllMiniLML6V2,
            ModelChoice::AllMiniLmL12V2 => EmbeddingModel::AllMiniLML12V2,
            ModelChoice::BgeSmallEnV15 => EmbeddingModel::BGESmallENV15,
        }
    }
}

impl FromStr for ModelChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let wanted = lowered
            .strip_prefix("sentence-transformers/")
            .unwrap_or(lowered.as_str());
        [
            ModelChoice::AllMiniLmL6V2,
            ModelChoice::AllMiniLmL12V2,
            ModelChoice::BgeSmallEnV15,
        ]
        .into_iter()
        .find(|choice| choice.name().to_lowercase() == wanted)
        .ok_or_else(|| format!("unknown embedding model '{s}'"))
    }
}

/// Lazily-initialized handle to the embedding model.
pub struct EmbeddingService {
    choice: ModelChoice,
    model: Mutex<Option<TextEmbedding>>,
}

impl EmbeddingService {
    /// Cheap: does not touch the model. Call [`ensure_loaded`](Self::ensure_loaded) to warm up.
    pub fn new(choice: ModelChoice) -> Self {
        Self {
            choice,
            model: Mutex::new(None),
        }
    }

    /// Loads the model if it is not loaded yet. Safe to call any number of times;
    /// after the first success every call reuses the same instance.
    pub fn ensure_loaded(&self) -> Result<(), EmbeddingError> {
        self.with_model(|_| Ok(()))
    }

    fn with_model<F, T>(&self, f: F) -> Result<T, EmbeddingError>
    where
        F: FnOnce(&mut TextEmbedding) -> Result<T, EmbeddingError>,
    {
        let mut guard = self
            .model
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if guard.is_none() {
            info!("Loading embedding model {}", self.choice.name());
            let options =
                InitOptions::new(self.choice.model()).with_show_download_progress(false);
            let model = TextEmbedding::try_new(options)
                .map_err(|e| EmbeddingError::ModelUnavailable(e.to_string()))?;
            *guard = Some(model);
        }
        match guard.as_mut() {
            Some(model) => f(model),
            None => Err(EmbeddingError::ModelUnavailable(
                "model slot empty after initialization".to_string(),
            )),
        }
    }
}

impl Embedder for EmbeddingService {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.with_model(|model| {
            let mut vectors = model
                .embed(vec![text], None)
                .map_err(|e| EmbeddingError::Inference(e.to_string()))?;
            let vector = vectors.pop().ok_or(EmbeddingError::EmptyOutput)?;
            debug!("Embedded {} chars into {} dims", text.len(), vector.len());
            Ok(vector)
        })
    }
}
