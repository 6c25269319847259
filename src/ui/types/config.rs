use crate::evaluation::CurveFormat;
use crate::preprocessing::ZeroVariancePolicy;
use crate::streams::CsvOptions;
use anyhow::{Context, Result, anyhow, bail, ensure};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum_macros::{Display, EnumString};

const DEFAULT_SEED: u64 = 42;
const DEFAULT_TEST_FRACTION: f64 = 0.25;
const DEFAULT_K_VALUES: &str = "1..=25";

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ScalingMode {
    #[default]
    Standardize,
    #[serde(rename = "none")]
    #[strum(serialize = "none")]
    Unscaled,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DumpFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl From<DumpFormat> for CurveFormat {
    fn from(value: DumpFormat) -> Self {
        match value {
            DumpFormat::Csv => CurveFormat::Csv,
            DumpFormat::Tsv => CurveFormat::Tsv,
            DumpFormat::Json => CurveFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    #[schemars(
        with = "String",
        title = "Data file",
        description = "CSV file with a header row",
        extend(
            "format" = "path",
            "x-must-exist" = true,
            "x-extensions" = ["csv"]
        )
    )]
    pub data: PathBuf,

    #[schemars(
        title = "Label column",
        description = "Column holding the class label (empty = last column)"
    )]
    pub label_column: Option<String>,

    #[schemars(
        title = "Feature columns",
        description = "Comma-separated feature columns (empty = every other column)"
    )]
    pub feature_columns: Option<String>,

    #[schemars(
        title = "Skip invalid rows",
        description = "Drop rows with missing or non-numeric cells instead of failing"
    )]
    pub skip_invalid_rows: bool,

    #[schemars(
        title = "K values",
        description = "Range such as 1..=25 or 1..=25:2, or a list such as 1,3,5"
    )]
    pub k_values: String,

    #[schemars(
        title = "Test fraction",
        description = "Share of rows held out for testing",
        range(min = 0.0, max = 1.0)
    )]
    pub test_fraction: f64,

    #[schemars(title = "Seed", description = "Seed of the train/test shuffle")]
    pub seed: u64,

    #[schemars(
        title = "Scaling",
        description = "Standardize features with training-set statistics before the sweep"
    )]
    pub scaling: ScalingMode,

    #[schemars(
        title = "Zero-variance columns",
        description = "reject = fail on constant columns, center = subtract the mean only"
    )]
    pub zero_variance: ZeroVariancePolicy,

    #[schemars(
        with = "Option<String>",
        title = "Dump file",
        description = "If set, write the sweep curve to this file",
        extend("format" = "path", "x-must-exist" = false)
    )]
    pub dump_file: Option<PathBuf>,

    #[schemars(title = "Dump format", description = "csv / tsv / json")]
    pub dump_format: DumpFormat,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::new(),
            label_column: None,
            feature_columns: None,
            skip_invalid_rows: false,
            k_values: DEFAULT_K_VALUES.to_string(),
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
            scaling: ScalingMode::default(),
            zero_variance: ZeroVariancePolicy::default(),
            dump_file: None,
            dump_format: DumpFormat::default(),
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.data.as_os_str().is_empty(),
            "no data file given"
        );
        ensure!(
            self.test_fraction > 0.0 && self.test_fraction < 1.0,
            "test_fraction must be between 0 and 1, got {}",
            self.test_fraction
        );
        self.parsed_k_values()?;
        Ok(())
    }

    pub fn parsed_k_values(&self) -> Result<Vec<usize>> {
        parse_k_values(&self.k_values)
            .with_context(|| format!("invalid k values '{}'", self.k_values))
    }

    pub fn feature_column_list(&self) -> Option<Vec<String>> {
        let raw = self.feature_columns.as_deref()?;
        let cols: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if cols.is_empty() { None } else { Some(cols) }
    }

    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            label_column: self
                .label_column
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            feature_columns: self.feature_column_list(),
            skip_invalid_rows: self.skip_invalid_rows,
            ..CsvOptions::default()
        }
    }
}

/// Parses `a..=b`, `a..b`, either with an optional `:step`, or a comma list.
pub fn parse_k_values(raw: &str) -> Result<Vec<usize>> {
    let raw = raw.trim();
    if raw.is_empty() {
        bail!("empty k specification");
    }

    let parse = |s: &str| -> Result<usize> {
        s.trim()
            .parse::<usize>()
            .map_err(|_| anyhow!("'{}' is not a non-negative integer", s.trim()))
    };

    if let Some((lo, rest)) = raw.split_once("..") {
        let (range, step) = match rest.split_once(':') {
            Some((r, s)) => (r, parse(s)?),
            None => (rest, 1),
        };
        ensure!(step > 0, "step must be positive");

        let start = parse(lo)?;
        let end = match range.strip_prefix('=') {
            Some(hi) => parse(hi)?,
            None => {
                let hi = parse(range)?;
                ensure!(hi > start, "range {start}..{hi} is empty");
                hi - 1
            }
        };
        ensure!(end >= start, "range end {end} is below start {start}");
        return Ok((start..=end).step_by(step).collect());
    }

    raw.split(',').map(parse).collect()
}
