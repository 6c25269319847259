use crate::core::attributes::{Attribute, NominalAttribute, NumericAttribute};
use std::fmt;

/// Column layout of a [`Dataset`](crate::core::dataset::Dataset): the numeric
/// feature columns in order, plus the class attribute holding the closed
/// label set.
pub struct DatasetHeader {
    relation_name: String,
    pub features: Vec<NumericAttribute>,
    pub class_attribute: NominalAttribute,
}

impl DatasetHeader {
    pub fn new(
        relation_name: String,
        features: Vec<NumericAttribute>,
        class_attribute: NominalAttribute,
    ) -> DatasetHeader {
        DatasetHeader {
            relation_name,
            features,
            class_attribute,
        }
    }

    pub fn relation_name(&self) -> &str {
        &self.relation_name
    }

    pub fn number_of_features(&self) -> usize {
        self.features.len()
    }

    pub fn number_of_classes(&self) -> usize {
        self.class_attribute.number_of_values()
    }

    pub fn feature_at_index(&self, index: usize) -> Option<&NumericAttribute> {
        self.features.get(index)
    }

    pub fn index_of_feature(&self, name: &str) -> Option<usize> {
        self.features.iter().position(|f| f.name() == name)
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name()).collect()
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.class_attribute.value(index)
    }

    pub fn index_of_label(&self, label: &str) -> Option<usize> {
        self.class_attribute.index_of_value(label)
    }
}

impl fmt::Debug for DatasetHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetHeader")
            .field("relation_name", &self.relation_name)
            .field("n_features", &self.features.len())
            .field("n_classes", &self.class_attribute.values.len())
            .finish()
    }
}

impl fmt::Display for DatasetHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "relation {}", self.relation_name)?;
        for attr in &self.features {
            writeln!(f, "  {}", attr.summary())?;
        }
        write!(f, "  class {}", self.class_attribute.summary())
    }
}
