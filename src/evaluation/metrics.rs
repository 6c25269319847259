use crate::classifiers::Classifier;
use crate::error::KnnError;
use std::collections::BTreeMap;

/// Fraction of positions where `predicted` equals `truth`.
pub fn accuracy<L: PartialEq>(predicted: &[L], truth: &[L]) -> Result<f64, KnnError> {
    if predicted.len() != truth.len() {
        return Err(KnnError::invalid(format!(
            "{} predictions for {} true labels",
            predicted.len(),
            truth.len()
        )));
    }
    if truth.is_empty() {
        return Err(KnnError::invalid("cannot score an empty set"));
    }

    let hits = predicted.iter().zip(truth).filter(|(p, t)| p == t).count();
    Ok(hits as f64 / truth.len() as f64)
}

/// Accuracy of always answering the most frequent label of `truth`.
pub fn null_accuracy<L: Ord>(truth: &[L]) -> Result<f64, KnnError> {
    if truth.is_empty() {
        return Err(KnnError::invalid("cannot score an empty set"));
    }

    let mut counts: BTreeMap<&L, usize> = BTreeMap::new();
    for l in truth {
        *counts.entry(l).or_insert(0) += 1;
    }
    let top = counts.values().copied().max().unwrap_or(0);
    Ok(top as f64 / truth.len() as f64)
}

/// Predicts every row of `features` and scores against `truth`.
pub fn score<C: Classifier>(
    classifier: &C,
    features: &[Vec<f64>],
    truth: &[C::Label],
) -> Result<f64, KnnError> {
    let predicted = classifier.predict_batch(features)?;
    accuracy(&predicted, truth)
}
