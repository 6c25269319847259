use crate::streams::csv::csv_file_loader::CsvOptions;
use ::csv::StringRecord;
use std::io::{Error, ErrorKind};

/// Which columns of a CSV row feed the dataset.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ColumnLayout {
    pub width: usize,
    pub label_index: usize,
    pub label_name: String,
    pub feature_indices: Vec<usize>,
    pub feature_names: Vec<String>,
}

pub(super) fn parse_header(header: &StringRecord, options: &CsvOptions) -> Result<ColumnLayout, Error> {
    let names: Vec<String> = header.iter().map(str::to_string).collect();

    if names.len() < 2 {
        return Err(Error::new(
            ErrorKind::InvalidData,
            "CSV header needs at least one feature column and a label column",
        ));
    }

    let position = |wanted: &str| {
        names.iter().position(|n| n == wanted).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidData,
                format!("Column '{wanted}' not found in header"),
            )
        })
    };

    let label_index = match &options.label_column {
        Some(name) => position(name)?,
        None => names.len() - 1,
    };

    let feature_indices: Vec<usize> = match &options.feature_columns {
        Some(cols) if !cols.is_empty() => cols
            .iter()
            .map(|c| position(c))
            .collect::<Result<_, _>>()?,
        _ => (0..names.len()).filter(|&i| i != label_index).collect(),
    };

    if feature_indices.contains(&label_index) {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!(
                "Label column '{}' cannot also be a feature",
                names[label_index]
            ),
        ));
    }

    Ok(ColumnLayout {
        width: names.len(),
        label_index,
        label_name: names[label_index].clone(),
        feature_names: feature_indices.iter().map(|&i| names[i].clone()).collect(),
        feature_indices,
    })
}

pub(super) fn parse_record(
    layout: &ColumnLayout,
    record: &StringRecord,
) -> Result<(Vec<f64>, String), Error> {
    if record.len() != layout.width {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!(
                "Number of columns ({}) differs from header ({})",
                record.len(),
                layout.width
            ),
        ));
    }

    let mut features = Vec::with_capacity(layout.feature_indices.len());
    for (&idx, name) in layout.feature_indices.iter().zip(&layout.feature_names) {
        let raw = &record[idx];
        let v: f64 = raw.parse().map_err(|_| {
            Error::new(
                ErrorKind::InvalidData,
                format!("Invalid numeric value '{raw}' in column '{name}'"),
            )
        })?;
        if !v.is_finite() {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("Non-finite value '{raw}' in column '{name}'"),
            ));
        }
        features.push(v);
    }

    let label = &record[layout.label_index];
    if label.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!("Missing label in column '{}'", layout.label_name),
        ));
    }

    Ok((features, label.to_string()))
}
