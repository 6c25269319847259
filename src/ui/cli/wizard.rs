use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::ui::cli::drivers::PromptDriver;
use crate::ui::types::config::SweepConfig;
use crate::ui::types::schema::{FieldKind, FieldSpec, PathRule, field_specs, schema_for};

/// Walks every field of [`SweepConfig`] and asks for it, starting from the
/// defaults.
pub fn prompt_config<D: PromptDriver>(driver: &D) -> Result<SweepConfig> {
    let schema = schema_for::<SweepConfig>();
    let specs = field_specs(&schema)?;
    let defaults = serde_json::to_value(SweepConfig::default())?;

    let mut params = Map::new();
    for s in specs {
        let init = s
            .default
            .clone()
            .filter(|v| !v.is_null())
            .or_else(|| defaults.get(&s.name).cloned());
        let value = prompt_field(driver, &s, init)?;
        params.insert(s.name.clone(), value);
    }

    let config: SweepConfig =
        serde_json::from_value(Value::Object(params)).context("wizard produced an invalid config")?;
    config.validate()?;
    Ok(config)
}

fn prompt_field<D: PromptDriver>(driver: &D, s: &FieldSpec, init: Option<Value>) -> Result<Value> {
    let help = s.description.as_deref().unwrap_or("");

    Ok(match s.kind {
        FieldKind::Boolean => {
            let def = init.and_then(|v| v.as_bool()).unwrap_or(false);
            Value::Bool(driver.ask_bool(&s.title, help, def)?)
        }

        FieldKind::String => {
            let def = init
                .as_ref()
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();

            if let Some(opts) = &s.allowed {
                let start = opts.iter().position(|o| *o == def).unwrap_or(0);
                Value::String(driver.ask_select(&s.title, help, opts, start)?)
            } else {
                let answer = match &s.path {
                    Some(rule) => prompt_path_until_ok(driver, &s.title, help, &def, rule, s.nullable)?
                        .map(|p| p.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    None => driver.ask_string(&s.title, help, &def)?,
                };
                let answer = answer.trim();
                if answer.is_empty() && s.nullable {
                    Value::Null
                } else {
                    Value::String(answer.to_string())
                }
            }
        }

        FieldKind::Integer => {
            let def = init.and_then(|v| v.as_u64()).unwrap_or(0);
            Value::from(driver.ask_u64(
                &s.title,
                help,
                def,
                s.min.map(|x| x as u64),
                s.max.map(|x| x as u64),
            )?)
        }

        FieldKind::Number => {
            let def = init.and_then(|v| v.as_f64()).unwrap_or(0.0);
            Value::from(driver.ask_f64(&s.title, help, def, s.min, s.max)?)
        }
    })
}

fn validate_path_str(input: &str, rule: &PathRule) -> Result<(), String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Path cannot be empty".into());
    }
    let p = Path::new(trimmed);

    if rule.must_exist && !p.exists() {
        return Err(format!("Path does not exist: {}", p.display()));
    }
    if p.exists() && !p.is_file() {
        return Err("Expected a file path, not a directory".into());
    }
    if !rule.extensions.is_empty() {
        match p.extension().and_then(|e| e.to_str()) {
            Some(ext) if rule.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) => {}
            _ => return Err(format!("Expected a .{} file", rule.extensions.join(" / ."))),
        }
    }
    Ok(())
}

/// Asks until the answer passes `rule`. A blank answer to an optional path
/// yields `None`.
fn prompt_path_until_ok<D: PromptDriver>(
    driver: &D,
    title: &str,
    help: &str,
    default: &str,
    rule: &PathRule,
    optional: bool,
) -> Result<Option<PathBuf>> {
    loop {
        let answer = driver.ask_string(title, help, default)?;
        if optional && answer.trim().is_empty() {
            return Ok(None);
        }
        match validate_path_str(&answer, rule) {
            Ok(()) => return Ok(Some(PathBuf::from(answer.trim()))),
            Err(msg) => eprintln!("✗ {msg}"),
        }
    }
}
