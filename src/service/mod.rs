// Moderation service — orchestrates classifier calls and rate tracking.
//
// The service owns the request-rate tracker and an injected classifier.
// Every moderation call counts toward the tracked rate, including calls
// where inference fails: the rate reflects incoming load, not successful
// completions.

pub mod categories;
pub mod lifecycle;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::warn;

use crate::classifier::TextClassifier;
use crate::rate::RateTracker;

/// Content moderation over an injected classifier, with request-rate
/// tracking. One instance is shared process-wide (see [`lifecycle`]) because
/// the loaded model is memory-heavy and must not be duplicated.
pub struct ModerationService {
    classifier: Arc<dyn TextClassifier>,
    tracker: RateTracker,
}

impl ModerationService {
    pub fn new(classifier: Arc<dyn TextClassifier>) -> Self {
        Self {
            classifier,
            tracker: RateTracker::new(),
        }
    }

    /// Score `text` against the moderation categories.
    ///
    /// The request is recorded in the rate tracker before inference runs, so
    /// a failed classification still counts as a received request. Raw model
    /// labels are re-keyed to human-readable categories; unknown labels pass
    /// through unchanged.
    pub async fn moderate_text(&self, text: &str) -> Result<HashMap<String, f32>> {
        self.tracker.record(Instant::now());

        let raw_scores = self.classifier.classify(text).await.inspect_err(|err| {
            warn!("classification failed: {err:#}");
        })?;

        Ok(raw_scores
            .into_iter()
            .map(|(label, score)| (categories::map_label(&label).to_string(), score))
            .collect())
    }

    /// Requests/second over the trailing minute.
    pub fn request_rate(&self) -> f64 {
        self.tracker.rate(Instant::now())
    }
}
