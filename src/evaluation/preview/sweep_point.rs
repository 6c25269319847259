use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Accuracy on both partitions for one value of k.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SweepPoint {
    pub k: usize,
    pub training_accuracy: f64,
    pub testing_accuracy: f64,
    /// CPU seconds spent fitting and scoring this k.
    pub seconds: f64,
}

impl SweepPoint {
    /// Training minus testing accuracy. Large gaps at small k are the
    /// overfitting end of the curve.
    pub fn generalization_gap(&self) -> f64 {
        self.training_accuracy - self.testing_accuracy
    }
}

impl Display for SweepPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "k={}, train_acc={:.6}, test_acc={:.6}, gap={:.6}, t={:.6}s",
            self.k,
            self.training_accuracy,
            self.testing_accuracy,
            self.generalization_gap(),
            self.seconds
        )
    }
}
