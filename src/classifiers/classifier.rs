use crate::error::KnnError;
use std::collections::BTreeMap;

/// A classifier trained on a batch of labelled feature vectors.
pub trait Classifier {
    type Label: Ord + Clone;

    fn fit_labels(
        &mut self,
        features: &[Vec<f64>],
        labels: &[Self::Label],
    ) -> Result<(), KnnError>;

    fn predict(&self, query: &[f64]) -> Result<Self::Label, KnnError>;

    /// Probability per label. Every label seen at fit time is present.
    fn predict_proba(&self, query: &[f64]) -> Result<BTreeMap<Self::Label, f64>, KnnError>;

    fn predict_batch(&self, queries: &[Vec<f64>]) -> Result<Vec<Self::Label>, KnnError> {
        queries.iter().map(|q| self.predict(q)).collect()
    }
}

/// Label with the highest count; ties go to the lowest label.
pub(crate) fn argmax_label<L: Ord + Clone>(counts: &BTreeMap<L, usize>) -> Option<L> {
    let mut best: Option<(&L, usize)> = None;
    for (label, &count) in counts {
        match best {
            Some((_, c)) if c >= count => {}
            _ => best = Some((label, count)),
        }
    }
    best.map(|(l, _)| l.clone())
}
