// Local ONNX moderation classifier using KoalaAI/Text-Moderation.
//
// Runs entirely on the local CPU — no API calls, no network dependency after
// the one-time model download. The model is a multi-label sequence classifier
// over nine moderation categories; logits go through a sigmoid to give
// independent 0-1 scores per label.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::debug;

use super::traits::TextClassifier;

/// Raw labels output by KoalaAI/Text-Moderation, in the order the model
/// returns them (the id2label order from the model config).
const LABEL_ORDER: [&str; 9] = ["S", "H", "V", "HR", "SH", "S3", "H2", "V2", "OK"];

/// Maximum input length in tokens; longer texts are truncated here so that
/// callers never have to care about the model's sequence limit.
const MAX_SEQUENCE_LENGTH: usize = 512;

/// Local ONNX-based moderation classifier. Holds the model session behind
/// Arc<Mutex> so inference can be offloaded to spawn_blocking without
/// blocking the async runtime.
pub struct OnnxClassifier {
    // Arc+Mutex because:
    // 1. ort::Session::run takes &mut self, so we need interior mutability
    // 2. spawn_blocking requires 'static, so we need Arc for shared ownership
    // 3. We need Send+Sync for the TextClassifier trait
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
}

impl OnnxClassifier {
    /// Load the ONNX model and tokenizer from the given directory.
    ///
    /// Expects `model.onnx` and `tokenizer.json` to exist in `model_dir`.
    /// Call `download::download_model()` first if they don't.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            anyhow::bail!(
                "Model file not found: {}\nRun `palisade download-model` to download it.",
                model_path.display()
            );
        }
        if !tokenizer_path.exists() {
            anyhow::bail!(
                "Tokenizer file not found: {}\nRun `palisade download-model` to download it.",
                tokenizer_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        debug!("Loaded ONNX moderation model from {}", model_dir.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
        })
    }
}

#[async_trait]
impl TextClassifier for OnnxClassifier {
    /// Tokenize the text (truncated to the model limit), run one forward
    /// pass, apply sigmoid to the logits, and zip with the label order.
    ///
    /// The CPU-bound tokenization and inference are offloaded to
    /// spawn_blocking so they don't block the tokio async runtime.
    async fn classify(&self, text: &str) -> Result<HashMap<String, f32>> {
        // Clone Arc handles for the spawn_blocking closure ('static requirement)
        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let text = text.to_string();

        tokio::task::spawn_blocking(move || {
            let encoding = tokenizer
                .encode(text.as_str(), true)
                .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

            let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
            let attention_mask: Vec<i64> = encoding
                .get_attention_mask()
                .iter()
                .map(|&m| m as i64)
                .collect();
            let seq_len = input_ids.len();

            // Shape: [1, seq_len] — single-text inference, no padding needed.
            let shape = [1i64, seq_len as i64];
            let input_ids_tensor = Tensor::from_array((shape, input_ids))
                .context("Failed to create input_ids tensor")?;
            let attention_mask_tensor = Tensor::from_array((shape, attention_mask))
                .context("Failed to create attention_mask tensor")?;

            let logits = {
                let mut session = session
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

                let outputs = session
                    .run(ort::inputs! {
                        "input_ids" => input_ids_tensor,
                        "attention_mask" => attention_mask_tensor
                    })
                    .context("ONNX inference failed")?;

                // Output shape: [1, 9] — raw logits (pre-sigmoid)
                let (_out_shape, data) = outputs[0]
                    .try_extract_tensor::<f32>()
                    .context("Failed to extract output tensor")?;

                data.to_vec()
            };

            if logits.len() < LABEL_ORDER.len() {
                anyhow::bail!(
                    "Model output has {} logits, expected {}",
                    logits.len(),
                    LABEL_ORDER.len()
                );
            }

            let scores: HashMap<String, f32> = LABEL_ORDER
                .iter()
                .zip(logits.iter())
                .map(|(&label, &logit)| (label.to_string(), sigmoid(logit)))
                .collect();

            debug!(labels = scores.len(), "scored text");
            Ok(scores)
        })
        .await
        .context("spawn_blocking panicked")?
    }
}

/// Sigmoid activation: maps any real number to (0, 1).
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_zero_is_half() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn sigmoid_saturates() {
        assert!(sigmoid(10.0) > 0.999);
        assert!(sigmoid(-10.0) < 0.001);
    }

    #[test]
    fn sigmoid_output_in_unit_interval() {
        for logit in [-50.0, -3.2, -0.1, 0.0, 0.7, 4.5, 50.0] {
            let s = sigmoid(logit);
            assert!((0.0..=1.0).contains(&s), "sigmoid({logit}) = {s}");
        }
    }

    #[test]
    fn label_order_matches_model_output_width() {
        assert_eq!(LABEL_ORDER.len(), 9, "model outputs 9 categories");
    }

    #[test]
    fn labels_are_unique() {
        let mut labels: Vec<_> = LABEL_ORDER.to_vec();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), LABEL_ORDER.len());
    }
}
