//! Local NLI inference via ONNX Runtime.
//!
//! Runs a cross-encoder NLI model over (premise, hypothesis) pairs. The
//! default model is the multilingual mDeBERTa-v3 XNLI checkpoint, which
//! handles the French narratives common in MT799 traffic.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use tokenizers::TruncationParams;
use tracing::debug;

use super::Device;
use super::traits::NliProvider;
use crate::error::{AnalyzerError, Result};
use crate::types::NliResult;

/// Longest (premise, hypothesis) encoding fed to the model, in tokens.
pub const MAX_SEQUENCE_LENGTH: usize = 512;

/// Label order of MNLI/XNLI checkpoints fine-tuned by MoritzLaurer.
const XNLI_LABELS: [&str; 3] = ["entailment", "neutral", "contradiction"];
/// Label order of the sentence-transformers cross-encoders.
const CROSS_ENCODER_LABELS: [&str; 3] = ["contradiction", "entailment", "neutral"];

/// Supported local NLI models.
#[derive(Debug, Clone)]
pub enum LocalNliModel {
    /// MoritzLaurer/mDeBERTa-v3-base-mnli-xnli: multilingual (100 languages).
    MDebertaV3BaseXnli,
    /// cross-encoder/nli-deberta-v3-base: English, good balance of speed/accuracy.
    NliDebertaV3Base,
    /// cross-encoder/nli-deberta-v3-small: English, faster, slightly less accurate.
    NliDebertaV3Small,
    /// Custom model from local paths.
    Custom {
        model_path: PathBuf,
        tokenizer_path: PathBuf,
        /// Output class names in logit order.
        labels: Vec<String>,
        /// Whether the exported graph takes a `token_type_ids` input.
        token_type_ids: bool,
    },
}

impl Default for LocalNliModel {
    fn default() -> Self {
        Self::MDebertaV3BaseXnli
    }
}

impl LocalNliModel {
    /// Parse a config value (`"mdeberta-v3-base-xnli"`, `"nli-deberta-v3-base"`,
    /// `"nli-deberta-v3-small"`).
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "mdeberta-v3-base-xnli" => Ok(Self::MDebertaV3BaseXnli),
            "nli-deberta-v3-base" => Ok(Self::NliDebertaV3Base),
            "nli-deberta-v3-small" => Ok(Self::NliDebertaV3Small),
            other => Err(AnalyzerError::Configuration(format!(
                "unknown local NLI model '{other}'"
            ))),
        }
    }

    /// Get the HuggingFace repo ID for this model.
    pub fn repo_id(&self) -> Option<&'static str> {
        match self {
            Self::MDebertaV3BaseXnli => Some("MoritzLaurer/mDeBERTa-v3-base-mnli-xnli"),
            Self::NliDebertaV3Base => Some("cross-encoder/nli-deberta-v3-base"),
            Self::NliDebertaV3Small => Some("cross-encoder/nli-deberta-v3-small"),
            Self::Custom { .. } => None,
        }
    }

    /// Get the model name for display.
    pub fn name(&self) -> &str {
        match self {
            Self::MDebertaV3BaseXnli => "mdeberta-v3-base-xnli",
            Self::NliDebertaV3Base => "nli-deberta-v3-base",
            Self::NliDebertaV3Small => "nli-deberta-v3-small",
            Self::Custom { model_path, .. } => model_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("custom"),
        }
    }

    /// Resolve model and tokenizer paths, downloading if needed.
    fn resolve_paths(&self, cache_dir: &Path) -> Result<(PathBuf, PathBuf)> {
        match self {
            Self::Custom {
                model_path,
                tokenizer_path,
                ..
            } => Ok((model_path.clone(), tokenizer_path.clone())),
            _ => {
                let repo_id = self.repo_id().ok_or_else(|| {
                    AnalyzerError::Configuration(format!("no repository for {}", self.name()))
                })?;
                download_model(repo_id, cache_dir)
            }
        }
    }
}

/// Information about an NLI model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NliModelInfo {
    /// Model name.
    pub name: String,
    /// Output class names in logit order.
    pub labels: Vec<String>,
    /// Whether `token_type_ids` is fed to the session.
    pub uses_token_type_ids: bool,
}

impl NliModelInfo {
    fn index_of(&self, class: &str) -> Result<usize> {
        self.labels
            .iter()
            .position(|l| l.eq_ignore_ascii_case(class))
            .ok_or_else(|| {
                AnalyzerError::Configuration(format!(
                    "model {} has no '{class}' output class",
                    self.name
                ))
            })
    }
}

impl From<&LocalNliModel> for NliModelInfo {
    fn from(model: &LocalNliModel) -> Self {
        let (labels, uses_token_type_ids): (Vec<String>, bool) = match model {
            LocalNliModel::MDebertaV3BaseXnli => {
                (XNLI_LABELS.iter().map(|s| s.to_string()).collect(), false)
            }
            LocalNliModel::NliDebertaV3Base | LocalNliModel::NliDebertaV3Small => (
                CROSS_ENCODER_LABELS.iter().map(|s| s.to_string()).collect(),
                true,
            ),
            LocalNliModel::Custom {
                labels,
                token_type_ids,
                ..
            } => (labels.clone(), *token_type_ids),
        };
        Self {
            name: model.name().to_string(),
            labels,
            uses_token_type_ids,
        }
    }
}

/// Local NLI engine using ONNX Runtime.
///
/// Inference needs `&mut self`; share it through [`LocalNliProvider`].
pub struct OnnxNliProvider {
    session: Session,
    tokenizer: tokenizers::Tokenizer,
    model_info: NliModelInfo,
}

impl OnnxNliProvider {
    /// Create a new provider with the specified model.
    ///
    /// Downloads the model into `cache_dir` (or the default cache) if needed.
    pub fn new(model: LocalNliModel, device: Device, cache_dir: Option<&Path>) -> Result<Self> {
        let cache_dir = cache_dir.map(Path::to_path_buf).unwrap_or_else(default_cache_dir);
        let (model_path, tokenizer_path) = model.resolve_paths(&cache_dir)?;

        let session = build_session(&model_path, &device)?;
        let mut tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            AnalyzerError::Configuration(format!("Failed to load tokenizer: {}", e))
        })?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| {
                AnalyzerError::Configuration(format!("Failed to configure truncation: {}", e))
            })?;

        let model_info = NliModelInfo::from(&model);
        // Fail at startup, not on the first message.
        for class in ["entailment", "contradiction", "neutral"] {
            model_info.index_of(class)?;
        }

        debug!(model = %model_info.name, device = device.name(), "loaded NLI model");

        Ok(Self {
            session,
            tokenizer,
            model_info,
        })
    }

    /// Run NLI inference on a single premise-hypothesis pair.
    pub fn infer_nli(&mut self, premise: &str, hypothesis: &str) -> Result<NliResult> {
        let (input_ids, attention_mask, token_type_ids) = self.encode_pair(premise, hypothesis)?;

        let type_ids = self
            .model_info
            .uses_token_type_ids
            .then_some(token_type_ids.as_slice());
        let outputs = self.run_inference(&input_ids, &attention_mask, type_ids)?;
        let logits = outputs
            .first()
            .ok_or_else(|| AnalyzerError::Inference("empty logits batch".to_string()))?;
        scores_to_result(logits, &self.model_info)
    }

    /// Get model information.
    pub fn model_info(&self) -> &NliModelInfo {
        &self.model_info
    }

    /// Encode a premise-hypothesis pair for the model.
    fn encode_pair(
        &self,
        premise: &str,
        hypothesis: &str,
    ) -> Result<(Vec<i64>, Vec<i64>, Vec<i64>)> {
        let encoding = self
            .tokenizer
            .encode((premise, hypothesis), true)
            .map_err(|e| AnalyzerError::Inference(format!("Tokenization failed: {}", e)))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let token_type_ids: Vec<i64> = encoding
            .get_type_ids()
            .iter()
            .map(|&t| t as i64)
            .collect();

        Ok((input_ids, attention_mask, token_type_ids))
    }

    /// Run the ONNX session.
    fn run_inference(
        &mut self,
        input_ids: &[i64],
        attention_mask: &[i64],
        token_type_ids: Option<&[i64]>,
    ) -> Result<Vec<Vec<f32>>> {
        use ort::value::TensorRef;

        let seq_len = input_ids.len();
        let shape = [1_usize, seq_len];

        let input_ids_tensor = TensorRef::from_array_view((shape, input_ids)).map_err(|e| {
            AnalyzerError::Inference(format!("Failed to create input_ids tensor: {}", e))
        })?;

        let attention_mask_tensor =
            TensorRef::from_array_view((shape, attention_mask)).map_err(|e| {
                AnalyzerError::Inference(format!("Failed to create attention_mask tensor: {}", e))
            })?;

        let outputs = if let Some(type_ids) = token_type_ids {
            let token_type_ids_tensor =
                TensorRef::from_array_view((shape, type_ids)).map_err(|e| {
                    AnalyzerError::Inference(format!(
                        "Failed to create token_type_ids tensor: {}",
                        e
                    ))
                })?;
            self.session
                .run(ort::inputs![
                    "input_ids" => input_ids_tensor,
                    "attention_mask" => attention_mask_tensor,
                    "token_type_ids" => token_type_ids_tensor,
                ])
                .map_err(|e| AnalyzerError::Inference(format!("ONNX inference failed: {}", e)))?
        } else {
            self.session
                .run(ort::inputs![
                    "input_ids" => input_ids_tensor,
                    "attention_mask" => attention_mask_tensor,
                ])
                .map_err(|e| AnalyzerError::Inference(format!("ONNX inference failed: {}", e)))?
        };

        let logits = outputs
            .get("logits")
            .ok_or_else(|| AnalyzerError::Inference("No logits output found".to_string()))?;

        // try_extract_tensor returns (&Shape, &[T])
        let (tensor_shape, logits_data) = logits
            .try_extract_tensor::<f32>()
            .map_err(|e| AnalyzerError::Inference(format!("Failed to extract logits: {}", e)))?;

        let batch_size = tensor_shape[0] as usize;
        let num_labels = tensor_shape[1] as usize;

        let mut results = Vec::with_capacity(batch_size);
        for i in 0..batch_size {
            let start = i * num_labels;
            let end = start + num_labels;
            results.push(logits_data[start..end].to_vec());
        }

        Ok(results)
    }
}

/// Async [`NliProvider`] over a shared [`OnnxNliProvider`].
///
/// Inference runs on tokio's blocking pool. Calls are serialized by the
/// session mutex, so the provider does not advertise concurrency.
pub struct LocalNliProvider {
    engine: Arc<Mutex<OnnxNliProvider>>,
    name: String,
}

impl LocalNliProvider {
    /// Load the model and wrap it for async use.
    pub fn new(model: LocalNliModel, device: Device, cache_dir: Option<&Path>) -> Result<Self> {
        let engine = OnnxNliProvider::new(model, device, cache_dir)?;
        Ok(Self::from_engine(engine))
    }

    /// Wrap an already-loaded engine.
    pub fn from_engine(engine: OnnxNliProvider) -> Self {
        let name = format!("onnx-nli:{}", engine.model_info().name);
        Self {
            engine: Arc::new(Mutex::new(engine)),
            name,
        }
    }
}

#[async_trait]
impl NliProvider for LocalNliProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn infer_nli(&self, premise: &str, hypothesis: &str) -> Result<NliResult> {
        let engine = Arc::clone(&self.engine);
        let premise = premise.to_owned();
        let hypothesis = hypothesis.to_owned();

        tokio::task::spawn_blocking(move || {
            let mut engine = engine.lock().map_err(|e| {
                AnalyzerError::OracleUnavailable(format!("NLI session lock poisoned: {}", e))
            })?;
            engine.infer_nli(&premise, &hypothesis)
        })
        .await
        .map_err(|e| AnalyzerError::OracleUnavailable(format!("NLI task failed: {}", e)))?
    }
}

/// Convert logits to NliResult with softmax probabilities.
fn scores_to_result(logits: &[f32], model_info: &NliModelInfo) -> Result<NliResult> {
    if logits.len() != model_info.labels.len() {
        return Err(AnalyzerError::Inference(format!(
            "Expected {} logits, got {}",
            model_info.labels.len(),
            logits.len()
        )));
    }

    let probs = softmax(logits);

    let entailment = probs[model_info.index_of("entailment")?];
    let contradiction = probs[model_info.index_of("contradiction")?];
    let neutral = probs[model_info.index_of("neutral")?];

    Ok(NliResult::from_probabilities(
        entailment,
        contradiction,
        neutral,
    ))
}

/// Softmax function.
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|x| x / sum).collect()
}

/// Build an ONNX session with the appropriate execution provider.
fn build_session(model_path: &Path, device: &Device) -> Result<Session> {
    let builder = Session::builder()
        .map_err(|e| {
            AnalyzerError::Configuration(format!("Failed to create session builder: {}", e))
        })?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| {
            AnalyzerError::Configuration(format!("Failed to set optimization level: {}", e))
        })?;

    let builder = match device {
        Device::Cpu => builder,
        #[cfg(feature = "cuda")]
        Device::Cuda { device_id } => {
            use ort::execution_providers::CUDAExecutionProvider;
            builder
                .with_execution_providers([CUDAExecutionProvider::default()
                    .with_device_id(*device_id as i32)
                    .build()])
                .map_err(|e| {
                    AnalyzerError::Configuration(format!("Failed to configure CUDA: {}", e))
                })?
        }
    };

    builder
        .commit_from_file(model_path)
        .map_err(|e| AnalyzerError::Configuration(format!("Failed to load ONNX model: {}", e)))
}

/// Default cache directory for downloaded models.
pub fn default_cache_dir() -> PathBuf {
    std::env::var("MT799_CACHE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("mt799")
                .join("models")
        })
}

/// Download model and tokenizer from HuggingFace Hub.
fn download_model(repo_id: &str, cache_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    use hf_hub::api::sync::ApiBuilder;

    let api = ApiBuilder::new()
        .with_cache_dir(cache_dir.to_path_buf())
        .build()
        .map_err(|e| {
            AnalyzerError::Configuration(format!("Failed to initialize HF Hub API: {}", e))
        })?;

    let repo = api.model(repo_id.to_string());

    let model_path = repo.get("onnx/model.onnx").map_err(|e| {
        AnalyzerError::Configuration(format!("Failed to download ONNX model: {}", e))
    })?;

    let tokenizer_path = repo.get("tokenizer.json").map_err(|e| {
        AnalyzerError::Configuration(format!("Failed to download tokenizer: {}", e))
    })?;

    Ok((model_path, tokenizer_path))
}
