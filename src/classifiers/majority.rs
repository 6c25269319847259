use crate::classifiers::classifier::{Classifier, argmax_label};
use crate::error::KnnError;
use std::collections::BTreeMap;

/// Baseline that ignores the features and always predicts the most frequent
/// training label. Its accuracy on a test set is the null accuracy.
#[derive(Clone, Debug)]
pub struct MajorityClassifier<L = usize> {
    class_counts: BTreeMap<L, usize>,
    total: usize,
    majority: Option<L>,
}

impl<L: Ord + Clone> MajorityClassifier<L> {
    pub fn new() -> Self {
        Self {
            class_counts: BTreeMap::new(),
            total: 0,
            majority: None,
        }
    }

    pub fn majority(&self) -> Option<&L> {
        self.majority.as_ref()
    }
}

impl<L: Ord + Clone> Default for MajorityClassifier<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Ord + Clone> Classifier for MajorityClassifier<L> {
    type Label = L;

    fn fit_labels(&mut self, features: &[Vec<f64>], labels: &[L]) -> Result<(), KnnError> {
        if features.len() != labels.len() {
            return Err(KnnError::invalid(format!(
                "{} feature vectors but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if labels.is_empty() {
            return Err(KnnError::InsufficientData { k: 1, available: 0 });
        }

        let mut counts = BTreeMap::new();
        for l in labels {
            *counts.entry(l.clone()).or_insert(0) += 1;
        }

        self.majority = argmax_label(&counts);
        self.class_counts = counts;
        self.total = labels.len();
        Ok(())
    }

    fn predict(&self, _query: &[f64]) -> Result<L, KnnError> {
        self.majority.clone().ok_or(KnnError::NotFitted)
    }

    fn predict_proba(&self, _query: &[f64]) -> Result<BTreeMap<L, f64>, KnnError> {
        if self.total == 0 {
            return Err(KnnError::NotFitted);
        }
        let total = self.total as f64;
        Ok(self
            .class_counts
            .iter()
            .map(|(l, &c)| (l.clone(), c as f64 / total))
            .collect())
    }
}
