// Classifier trait — the swap-ready abstraction.
//
// The default implementation runs a local ONNX moderation model
// (KoalaAI/Text-Moderation). Unit tests swap in deterministic stubs.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

/// Trait for scoring text against moderation labels. Implementations must be
/// async because inference is offloaded off the calling task (and remote
/// backends would need HTTP calls).
#[async_trait]
pub trait TextClassifier: Send + Sync {
    /// Score a single text, returning the model's raw label for each category
    /// mapped to an independent probability in [0, 1]. The scores are
    /// per-label sigmoids, not a normalized distribution.
    ///
    /// Overlong input is truncated to the model's maximum sequence length by
    /// the implementation.
    async fn classify(&self, text: &str) -> Result<HashMap<String, f32>>;
}
