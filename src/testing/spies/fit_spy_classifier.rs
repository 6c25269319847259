use crate::classifiers::Classifier;
use crate::error::KnnError;
use std::collections::BTreeMap;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Clone, Default)]
struct Counters {
    fits: Arc<AtomicU64>,
    refits: Arc<AtomicU64>,
}

pub struct FitSpyHandle(Counters);

impl FitSpyHandle {
    pub fn fits(&self) -> u64 {
        self.0.fits.load(Ordering::Relaxed)
    }

    /// Fits on an instance that had already been fitted.
    pub fn refits(&self) -> u64 {
        self.0.refits.load(Ordering::Relaxed)
    }
}

/// Records every fit. Predicts the first training label it saw.
pub struct FitSpyClassifier {
    counters: Counters,
    first_label: Option<usize>,
}

impl FitSpyClassifier {
    pub fn new() -> (Self, FitSpyHandle) {
        let counters = Counters::default();
        (
            Self {
                counters: counters.clone(),
                first_label: None,
            },
            FitSpyHandle(counters),
        )
    }

    /// Unfitted instance reporting to the same handle.
    pub fn fresh(&self) -> Self {
        Self {
            counters: self.counters.clone(),
            first_label: None,
        }
    }
}

impl Classifier for FitSpyClassifier {
    type Label = usize;

    fn fit_labels(&mut self, _features: &[Vec<f64>], labels: &[usize]) -> Result<(), KnnError> {
        if self.first_label.is_some() {
            self.counters.refits.fetch_add(1, Ordering::Relaxed);
        }
        self.counters.fits.fetch_add(1, Ordering::Relaxed);
        self.first_label = labels.first().copied();
        Ok(())
    }

    fn predict(&self, _query: &[f64]) -> Result<usize, KnnError> {
        self.first_label.ok_or(KnnError::NotFitted)
    }

    fn predict_proba(&self, query: &[f64]) -> Result<BTreeMap<usize, f64>, KnnError> {
        Ok(BTreeMap::from([(self.predict(query)?, 1.0)]))
    }
}
