use crate::core::attributes::{NominalAttribute, NumericAttribute};
use crate::core::dataset_header::DatasetHeader;
use crate::error::KnnError;
use crate::preprocessing::ScalingTag;
use std::sync::Arc;

/// In-memory labelled table: one fixed-width feature vector per record and a
/// class index into the header's label set.
#[derive(Clone, Debug)]
pub struct Dataset {
    header: Arc<DatasetHeader>,
    features: Vec<Vec<f64>>,
    labels: Vec<usize>,
    scaling: Option<ScalingTag>,
}

impl Dataset {
    pub fn new(
        header: Arc<DatasetHeader>,
        features: Vec<Vec<f64>>,
        labels: Vec<usize>,
    ) -> Result<Self, KnnError> {
        if features.len() != labels.len() {
            return Err(KnnError::invalid(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }

        let width = header.number_of_features();
        if let Some((row, f)) = features.iter().enumerate().find(|(_, f)| f.len() != width) {
            return Err(KnnError::invalid(format!(
                "row {row} has {} features, header declares {width}",
                f.len()
            )));
        }

        let n_classes = header.number_of_classes();
        if let Some((row, &l)) = labels.iter().enumerate().find(|&(_, &l)| l >= n_classes) {
            return Err(KnnError::invalid(format!(
                "row {row} has label index {l}, label set has {n_classes} values"
            )));
        }

        Ok(Self {
            header,
            features,
            labels,
            scaling: None,
        })
    }

    /// Builds a dataset from `(features, label)` pairs, deriving the label set
    /// from the labels observed.
    pub fn from_records<S: AsRef<str>>(
        relation_name: &str,
        feature_names: &[&str],
        class_name: &str,
        records: &[(Vec<f64>, S)],
    ) -> Result<Self, KnnError> {
        let class_attribute =
            NominalAttribute::from_observed(class_name, records.iter().map(|(_, l)| l.as_ref()));

        let labels = records
            .iter()
            .map(|(_, l)| {
                class_attribute
                    .index_of_value(l.as_ref())
                    .ok_or_else(|| KnnError::invalid(format!("unknown label '{}'", l.as_ref())))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let header = DatasetHeader::new(
            relation_name.to_string(),
            feature_names.iter().copied().map(NumericAttribute::new).collect(),
            class_attribute,
        );

        let features = records.iter().map(|(f, _)| f.clone()).collect();
        Dataset::new(Arc::new(header), features, labels)
    }

    pub fn header(&self) -> &DatasetHeader {
        &self.header
    }

    pub fn shared_header(&self) -> Arc<DatasetHeader> {
        Arc::clone(&self.header)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn number_of_features(&self) -> usize {
        self.header.number_of_features()
    }

    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn label_name(&self, index: usize) -> Option<&str> {
        self.header.label(index)
    }

    pub fn scaling(&self) -> Option<ScalingTag> {
        self.scaling
    }

    /// Rows at `indices`, in that order. Shares the header and keeps the
    /// scaling tag.
    pub fn subset(&self, indices: &[usize]) -> Result<Dataset, KnnError> {
        let mut features = Vec::with_capacity(indices.len());
        let mut labels = Vec::with_capacity(indices.len());
        for &i in indices {
            if i >= self.len() {
                return Err(KnnError::invalid(format!(
                    "row index {i} out of bounds for {} rows",
                    self.len()
                )));
            }
            features.push(self.features[i].clone());
            labels.push(self.labels[i]);
        }

        Ok(Dataset {
            header: Arc::clone(&self.header),
            features,
            labels,
            scaling: self.scaling,
        })
    }

    pub(crate) fn with_scaled_features(&self, features: Vec<Vec<f64>>, tag: ScalingTag) -> Dataset {
        Dataset {
            header: Arc::clone(&self.header),
            features,
            labels: self.labels.clone(),
            scaling: Some(tag),
        }
    }
}

/// Checks that `rows` is a non-empty matrix of finite values with a common,
/// non-zero width and returns that width.
pub(crate) fn matrix_width(rows: &[Vec<f64>]) -> Result<usize, KnnError> {
    let first = rows
        .first()
        .ok_or_else(|| KnnError::invalid("feature matrix is empty"))?;
    let width = first.len();
    if width == 0 {
        return Err(KnnError::invalid("feature vectors have zero length"));
    }

    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(KnnError::invalid(format!(
                "row {i} has {} features, expected {width}",
                row.len()
            )));
        }
        if let Some(j) = row.iter().position(|v| !v.is_finite()) {
            return Err(KnnError::invalid(format!(
                "row {i}, column {j} is not a finite number"
            )));
        }
    }

    Ok(width)
}
