//! DistilBERT sequence classifiers loaded with Candle
//!
//! Weights come either from a local directory or from the HuggingFace Hub
//! and are memory-mapped from `model.safetensors`. The classification head
//! must be present in the checkpoint; a model without one fails to load
//! instead of producing random scores.

use crate::model_config::{ModelSource, ModelSpec};
use std::path::{Path, PathBuf};
use sunsights_core::Result;

#[cfg(feature = "ml-models")]
use crate::classifier::{
    run_blocking, ClassificationMetadata, ClassificationResult, Classifier, ClassifierTier,
};
#[cfg(feature = "ml-models")]
use candle_core::{DType, Device, IndexOp, Tensor, D};
#[cfg(feature = "ml-models")]
use candle_nn::{Linear, Module, VarBuilder};
#[cfg(feature = "ml-models")]
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
#[cfg(feature = "ml-models")]
use std::sync::Arc;
#[cfg(feature = "ml-models")]
use std::time::Instant;
#[cfg(feature = "ml-models")]
use tokenizers::{Tokenizer, TruncationDirection};

/// Directory the Hub downloads are cached in
pub fn model_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sunsights/models")
}

/// Load a DistilBERT classifier described by `spec`.
///
/// Blocking: may download weights and always reads them from disk.
#[cfg(feature = "ml-models")]
pub fn load_distilbert(spec: &ModelSpec) -> Result<Box<dyn Classifier>> {
    let source = spec.source.as_ref().ok_or_else(|| {
        sunsights_core::Error::config(format!("Model '{}' has no source", spec.name))
    })?;
    let model_path = resolve_model_path(source)?;

    let tokenizer = load_tokenizer(&model_path)?;

    let config_path = model_path.join("config.json");
    let config_str = std::fs::read_to_string(&config_path).map_err(|e| {
        sunsights_core::Error::classifier(format!(
            "Failed to read config {}: {e}",
            config_path.display()
        ))
    })?;
    let config_json: serde_json::Value = serde_json::from_str(&config_str).map_err(|e| {
        sunsights_core::Error::classifier(format!("Failed to parse config JSON: {e}"))
    })?;

    let hidden_size = config_json
        .get("dim")
        .or_else(|| config_json.get("hidden_size"))
        .and_then(|v| v.as_u64())
        .unwrap_or(768) as usize;

    let labels = if spec.labels.is_empty() {
        labels_from_config(&config_json)?
    } else {
        spec.labels.clone()
    };

    let distilbert_config: DistilBertConfig = serde_json::from_str(&config_str)
        .map_err(|e| sunsights_core::Error::classifier(format!("Failed to parse config: {e}")))?;

    let device = get_device(&spec.inference.device)?;
    let vb = load_var_builder(&model_path, &device)?;

    let model = DistilBertModel::load(vb.pp("distilbert"), &distilbert_config).map_err(|e| {
        sunsights_core::Error::classifier(format!("Failed to load DistilBERT model: {e}"))
    })?;

    let pre_classifier = candle_nn::linear(hidden_size, hidden_size, vb.pp("pre_classifier")).ok();
    if pre_classifier.is_some() {
        tracing::debug!(hidden_size, "Loaded pre_classifier layer");
    }

    let classifier =
        candle_nn::linear(hidden_size, labels.len(), vb.pp("classifier")).map_err(|e| {
            sunsights_core::Error::classifier(format!(
                "Checkpoint has no classification head for {} labels: {e}",
                labels.len()
            ))
        })?;

    let name = if spec.name.is_empty() {
        "distilbert".to_string()
    } else {
        spec.name.clone()
    };

    tracing::info!(model = %name, ?labels, "Loaded DistilBERT classifier");

    Ok(Box::new(DistilBertSequenceClassifier {
        name,
        labels,
        network: Arc::new(DistilBertNetwork {
            tokenizer,
            model,
            pre_classifier,
            classifier,
            device,
            max_length: spec.inference.max_length,
        }),
    }))
}

#[cfg(not(feature = "ml-models"))]
pub fn load_distilbert(spec: &ModelSpec) -> Result<Box<dyn crate::classifier::Classifier>> {
    Err(sunsights_core::Error::classifier(format!(
        "Model '{}' requires the 'ml-models' feature",
        spec.name
    )))
}

fn resolve_model_path(source: &ModelSource) -> Result<PathBuf> {
    match source {
        ModelSource::Local { path } => {
            if !path.exists() {
                return Err(sunsights_core::Error::classifier(format!(
                    "Model path does not exist: {}",
                    path.display()
                )));
            }
            verify_model_dir(path)?;
            Ok(path.clone())
        }
        ModelSource::HuggingFace { repo, revision } => download_from_huggingface(repo, revision),
    }
}

#[cfg(feature = "ml-models")]
fn download_from_huggingface(repo: &str, revision: &str) -> Result<PathBuf> {
    tracing::info!(repo, revision, "Downloading model from HuggingFace");

    let api = hf_hub::api::sync::ApiBuilder::new()
        .with_cache_dir(model_cache_dir())
        .with_progress(false)
        .build()
        .map_err(|e| {
            sunsights_core::Error::classifier(format!("Failed to initialize HuggingFace API: {e}"))
        })?;

    let repo_obj = api.repo(hf_hub::Repo::with_revision(
        repo.to_string(),
        hf_hub::RepoType::Model,
        revision.to_string(),
    ));

    repo_obj.get("model.safetensors").map_err(|e| {
        sunsights_core::Error::classifier(format!("Failed to download model.safetensors: {e}"))
    })?;

    let mut found_tokenizer = false;
    for file in ["tokenizer.json", "vocab.txt"] {
        match repo_obj.get(file) {
            Ok(_) => {
                tracing::debug!("Found tokenizer file: {}", file);
                found_tokenizer = true;
            }
            Err(_) => tracing::debug!("File not found: {}", file),
        }
    }
    if !found_tokenizer {
        return Err(sunsights_core::Error::classifier(
            "No tokenizer found (tried tokenizer.json, vocab.txt)",
        ));
    }

    let config_path = repo_obj.get("config.json").map_err(|e| {
        sunsights_core::Error::classifier(format!("Failed to download config.json: {e}"))
    })?;

    let model_dir = config_path
        .parent()
        .ok_or_else(|| sunsights_core::Error::classifier("Invalid cache path"))?;

    tracing::info!("Model available at: {}", model_dir.display());
    Ok(model_dir.to_path_buf())
}

#[cfg(not(feature = "ml-models"))]
fn download_from_huggingface(_repo: &str, _revision: &str) -> Result<PathBuf> {
    Err(sunsights_core::Error::classifier(
        "HuggingFace download requires 'ml-models' feature",
    ))
}

/// Ordered labels from a HuggingFace `id2label` map
fn labels_from_config(config_json: &serde_json::Value) -> Result<Vec<String>> {
    let id2label = config_json
        .get("id2label")
        .and_then(|v| v.as_object())
        .ok_or_else(|| {
            sunsights_core::Error::classifier("No labels configured and config.json has no id2label")
        })?;

    let mut labels = id2label
        .iter()
        .map(|(id, label)| {
            let id: usize = id.parse().map_err(|_| {
                sunsights_core::Error::classifier(format!("Invalid id2label key '{id}'"))
            })?;
            let label = label.as_str().ok_or_else(|| {
                sunsights_core::Error::classifier(format!("id2label[{id}] is not a string"))
            })?;
            Ok((id, label.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    labels.sort_by_key(|(id, _)| *id);
    Ok(labels.into_iter().map(|(_, label)| label).collect())
}

/// Check a model directory has everything [`load_distilbert`] reads
pub fn verify_model_dir(path: &Path) -> Result<()> {
    for file in ["config.json", "model.safetensors"] {
        if !path.join(file).exists() {
            return Err(sunsights_core::Error::classifier(format!(
                "{file} not found in {}",
                path.display()
            )));
        }
    }
    if !path.join("tokenizer.json").exists() && !path.join("vocab.txt").exists() {
        return Err(sunsights_core::Error::classifier(format!(
            "No tokenizer found in {} (tried tokenizer.json, vocab.txt)",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(feature = "ml-models")]
fn get_device(device_str: &str) -> Result<Device> {
    match device_str.to_lowercase().as_str() {
        "cuda" | "cuda:0" => Device::new_cuda(0).map_err(|e| {
            sunsights_core::Error::classifier(format!("Failed to initialize CUDA: {e}"))
        }),
        "mps" | "metal" => Device::new_metal(0).map_err(|e| {
            sunsights_core::Error::classifier(format!("Failed to initialize Metal: {e}"))
        }),
        _ => Ok(Device::Cpu),
    }
}

#[cfg(feature = "ml-models")]
fn load_var_builder(model_path: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let weights_path = model_path.join("model.safetensors");
    if !weights_path.exists() {
        return Err(sunsights_core::Error::classifier(format!(
            "model.safetensors not found in {}",
            model_path.display()
        )));
    }

    // SAFETY: the weights file is not modified while mapped.
    let vb = unsafe {
        VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device).map_err(|e| {
            sunsights_core::Error::classifier(format!("Failed to load weights: {e}"))
        })?
    };

    Ok(vb)
}

#[cfg(feature = "ml-models")]
fn load_tokenizer(model_path: &Path) -> Result<Tokenizer> {
    let tokenizer_json_path = model_path.join("tokenizer.json");
    if tokenizer_json_path.exists() {
        tracing::debug!("Loading tokenizer from tokenizer.json");
        return Tokenizer::from_file(&tokenizer_json_path).map_err(|e| {
            sunsights_core::Error::classifier(format!("Failed to load tokenizer.json: {e}"))
        });
    }

    let vocab_path = model_path.join("vocab.txt");
    if vocab_path.exists() {
        tracing::debug!("Building tokenizer from vocab.txt");

        use tokenizers::models::wordpiece::WordPiece;
        use tokenizers::normalizers::BertNormalizer;
        use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
        use tokenizers::processors::bert::BertProcessing;

        let wordpiece = WordPiece::from_file(vocab_path.to_string_lossy().as_ref())
            .unk_token("[UNK]".to_string())
            .build()
            .map_err(|e| {
                sunsights_core::Error::classifier(format!("Failed to build WordPiece model: {e}"))
            })?;

        let mut tokenizer = Tokenizer::new(wordpiece);
        tokenizer.with_normalizer(Some(BertNormalizer::default()));
        tokenizer.with_pre_tokenizer(Some(BertPreTokenizer));

        let sep = ("[SEP]".to_string(), 102);
        let cls = ("[CLS]".to_string(), 101);
        tokenizer.with_post_processor(Some(BertProcessing::new(sep, cls)));

        return Ok(tokenizer);
    }

    Err(sunsights_core::Error::classifier(format!(
        "No tokenizer found in {} (tried tokenizer.json, vocab.txt)",
        model_path.display()
    )))
}

#[cfg(feature = "ml-models")]
struct DistilBertSequenceClassifier {
    name: String,
    labels: Vec<String>,
    network: Arc<DistilBertNetwork>,
}

/// Tokenizer and weights, shared with blocking inference tasks
#[cfg(feature = "ml-models")]
struct DistilBertNetwork {
    tokenizer: Tokenizer,
    model: DistilBertModel,
    pre_classifier: Option<Linear>,
    classifier: Linear,
    device: Device,
    max_length: usize,
}

#[cfg(feature = "ml-models")]
impl DistilBertNetwork {
    fn probabilities(&self, text: &str) -> Result<Vec<f32>> {
        let candle_err = |stage: &str, e: candle_core::Error| {
            sunsights_core::Error::classifier(format!("{stage}: {e}"))
        };

        let mut encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| sunsights_core::Error::classifier(format!("Tokenization failed: {e}")))?;
        encoding.truncate(self.max_length, 0, TruncationDirection::Right);

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
        let input_ids = Tensor::new(input_ids.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| candle_err("Failed to create input tensor", e))?;

        // DistilBERT masks positions where the mask is 1
        let mask: Vec<u8> = encoding
            .get_attention_mask()
            .iter()
            .map(|&x| u8::from(x == 0))
            .collect();
        let attention_mask = Tensor::new(mask.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| candle_err("Failed to create attention mask", e))?;

        let hidden_states = self
            .model
            .forward(&input_ids, &attention_mask)
            .map_err(|e| candle_err("Model forward pass failed", e))?;

        let cls_embedding = hidden_states
            .i((0, 0, ..))
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| candle_err("Failed to get CLS token", e))?;

        let pooled = match &self.pre_classifier {
            Some(pre_classifier) => pre_classifier
                .forward(&cls_embedding)
                .and_then(|t| t.relu())
                .map_err(|e| candle_err("Pre-classifier failed", e))?,
            None => cls_embedding,
        };

        let logits = self
            .classifier
            .forward(&pooled)
            .map_err(|e| candle_err("Classification head failed", e))?;

        candle_nn::ops::softmax(&logits, D::Minus1)
            .and_then(|t| t.squeeze(0))
            .and_then(|t| t.to_vec1::<f32>())
            .map_err(|e| candle_err("Softmax failed", e))
    }
}

#[cfg(feature = "ml-models")]
#[async_trait::async_trait]
impl Classifier for DistilBertSequenceClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();

        let network = Arc::clone(&self.network);
        let text = text.to_string();
        let probs = run_blocking(&self.name, move || network.probabilities(&text)).await?;

        let (best, score) = probs
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .ok_or_else(|| sunsights_core::Error::classifier("Model produced no scores"))?;

        let label = self
            .labels
            .get(best)
            .cloned()
            .unwrap_or_else(|| format!("LABEL_{best}"));

        let all_scores = self
            .labels
            .iter()
            .zip(&probs)
            .map(|(label, p)| (label.clone(), *p))
            .collect();

        Ok(ClassificationResult {
            label,
            score,
            metadata: ClassificationMetadata {
                model: Some(self.name.clone()),
                all_scores: Some(all_scores),
            },
            latency_us: start.elapsed().as_micros() as u64,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tier(&self) -> ClassifierTier {
        ClassifierTier::B
    }
}
