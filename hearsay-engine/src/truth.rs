//! Content fidelity estimation.
//!
//! Measures how far a retold rumor has drifted from its canonical text.
//! The default estimator is token-set Jaccard similarity; games with
//! embedding infrastructure can plug in something smarter.

use std::collections::HashSet;

/// Estimates similarity between two rumor texts.
pub trait TruthEstimator: Send + Sync {
    /// Similarity in [0, 1]; 1.0 means the retelling is faithful.
    fn similarity(&self, canonical: &str, retold: &str) -> f32;
}

/// Jaccard similarity over lowercased word sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenOverlap;

fn tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

impl TruthEstimator for TokenOverlap {
    fn similarity(&self, canonical: &str, retold: &str) -> f32 {
        let a = tokens(canonical);
        let b = tokens(retold);
        if a.is_empty() && b.is_empty() {
            return 1.0;
        }
        let intersection = a.intersection(&b).count();
        let union = a.union(&b).count();
        if union == 0 {
            0.0
        } else {
            intersection as f32 / union as f32
        }
    }
}
