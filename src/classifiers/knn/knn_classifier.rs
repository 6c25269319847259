use crate::classifiers::classifier::{Classifier, argmax_label};
use crate::classifiers::knn::distance::euclidean;
use crate::core::dataset::{Dataset, matrix_width};
use crate::error::KnnError;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// One of the k training examples closest to a query.
#[derive(Clone, Debug, PartialEq)]
pub struct Neighbor<L> {
    /// Row of the example in the training set.
    pub index: usize,
    pub distance: f64,
    pub label: L,
}

/// Brute-force k-nearest-neighbours classifier over Euclidean distance.
///
/// The model is the training set itself. Neighbours are ranked by
/// `(distance, training row)`, so equal distances at the k-th boundary go to
/// the example seen first. The vote goes to the most frequent label among the
/// k neighbours, and equal counts go to the lowest label.
#[derive(Clone, Debug)]
pub struct KnnClassifier<L = usize> {
    k: usize,
    n_features: usize,
    features: Vec<Vec<f64>>,
    labels: Vec<L>,
    classes: Vec<L>,
}

impl<L: Ord + Clone> KnnClassifier<L> {
    /// An empty model. `k` is validated on fit.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            n_features: 0,
            features: Vec::new(),
            labels: Vec::new(),
            classes: Vec::new(),
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn is_fitted(&self) -> bool {
        !self.features.is_empty()
    }

    pub fn number_of_features(&self) -> usize {
        self.n_features
    }

    pub fn training_size(&self) -> usize {
        self.features.len()
    }

    /// Labels seen at fit time, in ascending order.
    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    /// Replaces the model with `features`/`labels` using `k` neighbours.
    /// On error the previous model is left untouched.
    pub fn fit(&mut self, features: &[Vec<f64>], labels: &[L], k: usize) -> Result<(), KnnError> {
        if k == 0 {
            return Err(KnnError::invalid("k must be a positive integer"));
        }
        if features.len() != labels.len() {
            return Err(KnnError::invalid(format!(
                "{} feature vectors but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if k > features.len() {
            return Err(KnnError::InsufficientData {
                k,
                available: features.len(),
            });
        }
        let n_features = matrix_width(features)?;

        let classes: BTreeSet<L> = labels.iter().cloned().collect();

        self.k = k;
        self.n_features = n_features;
        self.features = features.to_vec();
        self.labels = labels.to_vec();
        self.classes = classes.into_iter().collect();
        Ok(())
    }

    /// The k nearest training examples, closest first.
    pub fn kneighbors(&self, query: &[f64]) -> Result<Vec<Neighbor<L>>, KnnError> {
        self.check_query(query)?;

        let mut ranked: Vec<(f64, usize)> = self
            .features
            .iter()
            .enumerate()
            .map(|(i, row)| (euclidean(query, row), i))
            .collect();

        let by_rank =
            |a: &(f64, usize), b: &(f64, usize)| -> Ordering { a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)) };

        if self.k < ranked.len() {
            ranked.select_nth_unstable_by(self.k - 1, by_rank);
            ranked.truncate(self.k);
        }
        ranked.sort_unstable_by(by_rank);

        Ok(ranked
            .into_iter()
            .map(|(distance, index)| Neighbor {
                index,
                distance,
                label: self.labels[index].clone(),
            })
            .collect())
    }

    fn check_query(&self, query: &[f64]) -> Result<(), KnnError> {
        if !self.is_fitted() {
            return Err(KnnError::NotFitted);
        }
        if query.len() != self.n_features {
            return Err(KnnError::invalid(format!(
                "query has {} features, model was fitted on {}",
                query.len(),
                self.n_features
            )));
        }
        if query.iter().any(|v| !v.is_finite()) {
            return Err(KnnError::invalid("query contains a non-finite value"));
        }
        Ok(())
    }

    fn vote_counts(&self, query: &[f64]) -> Result<BTreeMap<L, usize>, KnnError> {
        let mut counts: BTreeMap<L, usize> = self.classes.iter().map(|c| (c.clone(), 0)).collect();
        for n in self.kneighbors(query)? {
            *counts.entry(n.label).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

impl KnnClassifier<usize> {
    /// Fits on a dataset's feature rows and label indices.
    pub fn fit_dataset(&mut self, dataset: &Dataset, k: usize) -> Result<(), KnnError> {
        self.fit(dataset.features(), dataset.labels(), k)
    }
}

impl<L: Ord + Clone> Classifier for KnnClassifier<L> {
    type Label = L;

    fn fit_labels(&mut self, features: &[Vec<f64>], labels: &[L]) -> Result<(), KnnError> {
        let k = self.k;
        self.fit(features, labels, k)
    }

    fn predict(&self, query: &[f64]) -> Result<L, KnnError> {
        let counts = self.vote_counts(query)?;
        argmax_label(&counts).ok_or(KnnError::NotFitted)
    }

    fn predict_proba(&self, query: &[f64]) -> Result<BTreeMap<L, f64>, KnnError> {
        let k = self.k as f64;
        Ok(self
            .vote_counts(query)?
            .into_iter()
            .map(|(label, count)| (label, count as f64 / k))
            .collect())
    }
}
