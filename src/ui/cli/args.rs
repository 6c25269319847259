use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueHint};
use serde_json::{Map, Value};

use crate::preprocessing::ZeroVariancePolicy;
use crate::ui::types::config::{DumpFormat, ScalingMode, SweepConfig};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "K-nearest-neighbors accuracy sweep over a labelled CSV file"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a sweep without the interactive wizard
    Run(RunArgs),
    /// Print the JSON schema of the sweep configuration
    Schema,
}

#[derive(Debug, Args, Default)]
pub struct RunArgs {
    /// JSON file with a (possibly partial) sweep configuration
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// CSV file with a header row
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub data: Option<PathBuf>,

    /// Label column (defaults to the last column)
    #[arg(long, value_name = "COLUMN")]
    pub label: Option<String>,

    /// Comma-separated feature columns (defaults to every other column)
    #[arg(long, value_name = "COLUMNS")]
    pub features: Option<String>,

    /// K values: 1..=25, 1..=25:2 or 1,3,5
    #[arg(long = "k", value_name = "SPEC")]
    pub k_values: Option<String>,

    /// Share of rows held out for testing
    #[arg(long, value_name = "FRACTION")]
    pub test_fraction: Option<f64>,

    /// Seed of the train/test shuffle
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Feature scaling (standardize, none)
    #[arg(long, value_name = "MODE")]
    pub scaling: Option<String>,

    /// Constant columns under standardization (reject, center)
    #[arg(long, value_name = "POLICY")]
    pub zero_variance: Option<String>,

    /// Drop unparseable rows instead of failing
    #[arg(long)]
    pub skip_invalid_rows: bool,

    /// File to dump the sweep curve after completion
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub dump_file: Option<PathBuf>,

    /// Format for the dump file (csv, tsv, json)
    #[arg(long, value_name = "FORMAT")]
    pub dump_format: Option<String>,

    /// Override configuration fields (key=value)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub overrides: Vec<KeyValue>,
}

#[derive(Clone, Debug)]
pub struct KeyValue {
    key: String,
    value: Value,
}

impl RunArgs {
    /// Layers, lowest first: defaults, `--config` file, `--set` overrides,
    /// then the explicit flags.
    pub fn into_config(self) -> Result<SweepConfig> {
        let mut value = serde_json::to_value(SweepConfig::default())?;

        if let Some(path) = &self.config {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config '{}'", path.display()))?;
            let file_value: Value = serde_json::from_str(&text)
                .with_context(|| format!("config '{}' is not valid JSON", path.display()))?;
            let Value::Object(fields) = file_value else {
                bail!("config '{}' must hold a JSON object", path.display());
            };
            let file_overrides: Vec<KeyValue> = fields
                .into_iter()
                .map(|(key, value)| KeyValue { key, value })
                .collect();
            apply_overrides(&mut value, &file_overrides)?;
        }

        apply_overrides(&mut value, &self.overrides)?;
        let flags = self.flag_overrides()?;
        apply_overrides(&mut value, &flags)?;

        let config: SweepConfig =
            serde_json::from_value(value).context("invalid sweep configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn flag_overrides(&self) -> Result<Vec<KeyValue>> {
        let mut out = Vec::new();
        let mut push = |key: &str, value: Value| {
            out.push(KeyValue {
                key: key.to_string(),
                value,
            })
        };

        if let Some(p) = &self.data {
            push("data", Value::String(p.to_string_lossy().into_owned()));
        }
        if let Some(l) = &self.label {
            push("label_column", Value::String(l.clone()));
        }
        if let Some(f) = &self.features {
            push("feature_columns", Value::String(f.clone()));
        }
        if let Some(k) = &self.k_values {
            push("k_values", Value::String(k.clone()));
        }
        if let Some(f) = self.test_fraction {
            push("test_fraction", Value::from(f));
        }
        if let Some(s) = self.seed {
            push("seed", Value::from(s));
        }
        if let Some(raw) = &self.scaling {
            let mode = parse_kind::<ScalingMode>(raw)
                .with_context(|| format!("invalid scaling '{raw}'"))?;
            push("scaling", Value::String(mode.to_string()));
        }
        if let Some(raw) = &self.zero_variance {
            let policy = parse_kind::<ZeroVariancePolicy>(raw)
                .with_context(|| format!("invalid zero-variance policy '{raw}'"))?;
            push("zero_variance", Value::String(policy.to_string()));
        }
        if self.skip_invalid_rows {
            push("skip_invalid_rows", Value::Bool(true));
        }
        if let Some(p) = &self.dump_file {
            push("dump_file", Value::String(p.to_string_lossy().into_owned()));
        }
        if let Some(raw) = &self.dump_format {
            let fmt = parse_kind::<DumpFormat>(raw)
                .with_context(|| format!("invalid dump format '{raw}'"))?;
            push("dump_format", Value::String(fmt.to_string()));
        }
        Ok(out)
    }
}

fn parse_kind<T>(raw: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let candidates = candidate_spellings(raw);
    for cand in candidates {
        if let Ok(parsed) = cand.parse::<T>() {
            return Ok(parsed);
        }
    }
    Err(anyhow!("could not parse value '{raw}'"))
}

fn candidate_spellings(input: &str) -> Vec<String> {
    let mut out = Vec::new();
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return out;
    }

    out.push(trimmed.to_string());
    out.push(trimmed.to_lowercase());
    out.push(kebab_from_token(trimmed));
    out.push(trimmed.replace('_', "-").to_lowercase());
    out.sort();
    out.dedup();
    out
}

fn kebab_from_token(token: &str) -> String {
    let mut buf = String::new();
    let mut prev_lower = false;
    for ch in token.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                buf.push('-');
            }
            buf.extend(ch.to_lowercase());
            prev_lower = false;
        } else if ch == '_' {
            buf.push('-');
            prev_lower = false;
        } else {
            buf.push(ch);
            prev_lower = ch.is_lowercase();
        }
    }
    buf
}

fn apply_overrides(target: &mut Value, overrides: &[KeyValue]) -> Result<()> {
    for kv in overrides {
        set_path(target, &kv.key, kv.value.clone())
            .with_context(|| format!("failed to set '{}'", kv.key))?;
    }
    Ok(())
}

fn set_path(target: &mut Value, path: &str, new_value: Value) -> Result<()> {
    let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
    let Some((last, parents)) = segments.split_last() else {
        bail!("empty key is not allowed");
    };

    let mut current = target;
    for seg in parents {
        current = ensure_object(current)?
            .entry((*seg).to_string())
            .or_insert(Value::Null);
    }

    let map = ensure_object(current)?;
    // `--set k_values=5` parses as a number; string fields keep their type
    let new_value = match (map.get(*last), new_value) {
        (Some(Value::String(_)), Value::Number(n)) => Value::String(n.to_string()),
        (Some(Value::String(_)), Value::Bool(b)) => Value::String(b.to_string()),
        (_, v) => v,
    };
    map.insert((*last).to_string(), new_value);
    Ok(())
}

fn ensure_object(value: &mut Value) -> Result<&mut Map<String, Value>> {
    if value.is_null() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => Ok(map),
        other => bail!("cannot set nested field on non-object value: {other:?}"),
    }
}

fn parse_key_value(raw: &str) -> Result<KeyValue, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| "expected KEY=VALUE".to_string())?;
    let key = key.trim();
    if key.is_empty() {
        return Err("key cannot be empty".to_string());
    }

    Ok(KeyValue {
        key: key.to_string(),
        value: parse_literal(value.trim()),
    })
}

fn parse_literal(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
