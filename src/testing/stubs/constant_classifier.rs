use crate::classifiers::Classifier;
use crate::error::KnnError;
use std::collections::BTreeMap;

/// Always predicts the same label index, whatever it was fitted on.
pub struct ConstantClassifier {
    label: usize,
}

impl ConstantClassifier {
    pub fn new(label: usize) -> Self {
        Self { label }
    }
}

impl Classifier for ConstantClassifier {
    type Label = usize;

    fn fit_labels(&mut self, _features: &[Vec<f64>], _labels: &[usize]) -> Result<(), KnnError> {
        Ok(())
    }

    fn predict(&self, _query: &[f64]) -> Result<usize, KnnError> {
        Ok(self.label)
    }

    fn predict_proba(&self, _query: &[f64]) -> Result<BTreeMap<usize, f64>, KnnError> {
        Ok(BTreeMap::from([(self.label, 1.0)]))
    }
}
