use crate::core::attributes::Attribute;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Closed, ordered set of categorical values.
///
/// Values are kept in natural label order (see [`compare_labels`]), so the
/// index of a value doubles as its rank: "lowest label" and "lowest index"
/// always agree.
#[derive(Clone, Debug)]
pub struct NominalAttribute {
    pub name: String,
    pub values: Vec<String>,
    pub label_to_index: HashMap<String, usize>,
}

impl NominalAttribute {
    pub fn new(name: impl Into<String>) -> NominalAttribute {
        NominalAttribute {
            name: name.into(),
            values: Vec::new(),
            label_to_index: HashMap::new(),
        }
    }

    /// Builds the domain from every value observed, deduplicated and sorted.
    pub fn from_observed<'a, I>(name: impl Into<String>, observed: I) -> NominalAttribute
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = observed.into_iter().collect();
        let mut values: Vec<String> = distinct.into_iter().map(str::to_string).collect();
        values.sort_by(|a, b| compare_labels(a, b));

        let label_to_index = values
            .iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i))
            .collect();

        NominalAttribute {
            name: name.into(),
            values,
            label_to_index,
        }
    }

    pub fn index_of_value(&self, v: &str) -> Option<usize> {
        self.label_to_index.get(v).copied()
    }

    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn number_of_values(&self) -> usize {
        self.values.len()
    }
}

impl Attribute for NominalAttribute {
    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> String {
        format!("{} {{ {} }}", self.name, self.values.join(", "))
    }
}

/// Labels that parse as numbers come first, in numeric order, then every
/// other label in lexicographic order. Keeps `"2" < "10"` for integer-coded
/// classes and stays a total order when the two kinds are mixed.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
