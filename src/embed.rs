use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use hf_hub::api::sync::ApiBuilder;
use model2vec_rs::model::StaticModel;
use tracing::info;

use crate::error::{Error, Result};

/// Text to vector capability the pipeline depends on.
pub trait Embed {
    fn model_name(&self) -> &str;

    /// Fixed output length for every call on this instance.
    fn dimensions(&self) -> usize;

    fn embed(&mut self, text: &str) -> Result<Vec<f32>>;

    fn embed_batch(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelChoice {
    #[default]
    MiniLM,
    BgeSmall,
    BgeBase,
    Potion,
}

impl ModelChoice {
    pub const ALL: [ModelChoice; 4] = [
        ModelChoice::MiniLM,
        ModelChoice::BgeSmall,
        ModelChoice::BgeBase,
        ModelChoice::Potion,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ModelChoice::MiniLM => "all-minilm-l6-v2",
            ModelChoice::BgeSmall => "bge-small-en-v1.5",
            ModelChoice::BgeBase => "bge-base-en-v1.5",
            ModelChoice::Potion => "potion-base-8m",
        }
    }

    pub fn repo(self) -> &'static str {
        match self {
            ModelChoice::MiniLM => "sentence-transformers/all-MiniLM-L6-v2",
            ModelChoice::BgeSmall => "BAAI/bge-small-en-v1.5",
            ModelChoice::BgeBase => "BAAI/bge-base-en-v1.5",
            ModelChoice::Potion => "minishlab/potion-base-8M",
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ModelChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        ModelChoice::ALL
            .into_iter()
            .find(|m| m.id().eq_ignore_ascii_case(wanted) || m.repo().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnsupportedModel(s.to_string()))
    }
}

/// Files a model2vec model directory needs.
const STATIC_MODEL_FILES: [&str; 3] = ["config.json", "tokenizer.json", "model.safetensors"];

/// Fetches a model2vec repo into `cache_dir` (reusing cached files) and
/// returns the local snapshot directory.
pub fn resolve_static_model(repo: &str, cache_dir: &Path) -> Result<PathBuf> {
    let load_err = |message: String| Error::ModelLoad {
        model: repo.to_string(),
        message,
    };
    let api = ApiBuilder::new()
        .with_cache_dir(cache_dir.to_path_buf())
        .with_progress(false)
        .build()
        .map_err(|e| load_err(e.to_string()))?;
    let repo_api = api.model(repo.to_string());

    let mut snapshot = None;
    for file in STATIC_MODEL_FILES {
        let path = repo_api
            .get(file)
            .map_err(|e| load_err(format!("{file}: {e}")))?;
        snapshot = path.parent().map(Path::to_path_buf);
    }
    snapshot.ok_or_else(|| load_err("empty model snapshot".to_string()))
}

enum Backend {
    FastEmbed(TextEmbedding),
    Static(StaticModel),
}

pub struct EmbedderHandle {
    backend: Backend,
    name: String,
    dims: usize,
}

impl EmbedderHandle {
    pub fn new() -> Result<Self> {
        Self::with_model(ModelChoice::default(), None)
    }

    /// Loads the model once and probes its output dimensionality.
    pub fn with_model(choice: ModelChoice, cache_dir: Option<PathBuf>) -> Result<Self> {
        let load_err = |e: &dyn fmt::Display| Error::ModelLoad {
            model: choice.repo().to_string(),
            message: e.to_string(),
        };

        let mut backend = match choice {
            ModelChoice::Potion => {
                let source = match &cache_dir {
                    Some(dir) => resolve_static_model(choice.repo(), dir)?
                        .to_string_lossy()
                        .into_owned(),
                    None => choice.repo().to_string(),
                };
                let model = StaticModel::from_pretrained(source.as_str(), None, None, None)
                    .map_err(|e| load_err(&e))?;
                Backend::Static(model)
            }
            _ => {
                let model = match choice {
                    ModelChoice::BgeSmall => EmbeddingModel::BGESmallENV15,
                    ModelChoice::BgeBase => EmbeddingModel::BGEBaseENV15,
                    _ => EmbeddingModel::AllMiniLML6V2,
                };
                let mut options = InitOptions::new(model).with_show_download_progress(false);
                if let Some(dir) = cache_dir {
                    options = options.with_cache_dir(dir);
                }
                Backend::FastEmbed(TextEmbedding::try_new(options).map_err(|e| load_err(&e))?)
            }
        };

        let dims = backend
            .encode(&["dimension_check"])
            .map_err(|message| Error::ModelLoad {
                model: choice.repo().to_string(),
                message,
            })?
            .first()
            .map(|vec| vec.len())
            .filter(|len| *len > 0)
            .ok_or_else(|| Error::ModelLoad {
                model: choice.repo().to_string(),
                message: "no embedding returned".to_string(),
            })?;

        info!(model = choice.repo(), dims, "embedding model loaded");
        Ok(Self {
            backend,
            name: choice.repo().to_string(),
            dims,
        })
    }
}

impl Backend {
    fn encode(&mut self, texts: &[&str]) -> std::result::Result<Vec<Vec<f32>>, String> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        match self {
            Backend::FastEmbed(model) => model
                .embed(texts.to_vec(), None)
                .map_err(|e| e.to_string()),
            Backend::Static(model) => {
                let input: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
                Ok(model.encode_with_args(&input, Some(512), 64))
            }
        }
    }
}

impl Embed for EmbedderHandle {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn embed(&mut self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| Error::Embed {
                row: 0,
                message: "no embedding returned".to_string(),
            })
    }

    fn embed_batch(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let vectors = self.backend.encode(texts).map_err(|message| Error::Embed {
            row: 0,
            message,
        })?;
        if vectors.len() != texts.len() {
            return Err(Error::Embed {
                row: 0,
                message: format!(
                    "model returned {} embeddings for {} inputs",
                    vectors.len(),
                    texts.len()
                ),
            });
        }
        Ok(vectors)
    }
}
