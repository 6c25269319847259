use anyhow::{Context, Result, anyhow};
use schemars::{Schema, schema_for};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
}

/// How the wizard treats a string field that names a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathRule {
    pub must_exist: bool,
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub required: bool,
    pub nullable: bool,
    pub kind: FieldKind,
    pub default: Option<Value>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub allowed: Option<Vec<String>>,
    pub path: Option<PathRule>,
}

pub fn schema_for<T: schemars::JsonSchema>() -> Schema {
    schema_for!(T)
}

/// Field specs of a flat struct schema, in declaration order.
pub fn field_specs(root: &Schema) -> Result<Vec<FieldSpec>> {
    let root_obj = root.as_object().context("root schema is not an object")?;
    let props = root_obj
        .get("properties")
        .and_then(|v| v.as_object())
        .context("root schema has no properties")?;

    let required: Vec<String> = root_obj
        .get("required")
        .and_then(|v| v.as_array())
        .map(|a| {
            a.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    let mut out = Vec::new();
    for (name, field_schema) in props {
        let field_obj = field_schema
            .as_object()
            .context("field schema not object")?;
        let target = resolve_ref_obj(root_obj, field_obj)
            .ok_or_else(|| anyhow!("failed to resolve field $ref for '{name}'"))?;

        // annotations on the field win over those on the referenced type
        let lookup = |key: &str| field_obj.get(key).or_else(|| target.get(key));

        let title = lookup("title")
            .and_then(|v| v.as_str())
            .unwrap_or(name)
            .to_string();
        let description = lookup("description")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let default = lookup("default").cloned();

        let allowed = allowed_values(target);
        let kind = match detect_field_kind(target.get("type")) {
            Some(k) => k,
            None if allowed.is_some() => FieldKind::String,
            None => continue,
        };

        let min = lookup("minimum")
            .or_else(|| lookup("exclusiveMinimum"))
            .and_then(|v| v.as_f64());
        let max = lookup("maximum")
            .or_else(|| lookup("exclusiveMaximum"))
            .and_then(|v| v.as_f64());

        let path = (lookup("format").and_then(|v| v.as_str()) == Some("path")).then(|| PathRule {
            must_exist: lookup("x-must-exist")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            extensions: lookup("x-extensions")
                .and_then(|v| v.as_array())
                .map(|a| {
                    a.iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
        });

        out.push(FieldSpec {
            name: name.clone(),
            title,
            description,
            required: required.iter().any(|r| r == name),
            nullable: is_nullable(target.get("type")),
            kind,
            default,
            min,
            max,
            allowed,
            path,
        });
    }

    Ok(out)
}

/// String values of an enum schema, written either as `enum` or as a
/// `oneOf` of documented `const` branches.
fn allowed_values(obj: &Map<String, Value>) -> Option<Vec<String>> {
    if let Some(arr) = obj.get("enum").and_then(|v| v.as_array()) {
        return Some(
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        );
    }

    let branches = obj
        .get("oneOf")
        .or_else(|| obj.get("anyOf"))
        .and_then(|v| v.as_array())?;
    let mut values = Vec::new();
    for b in branches {
        let b = b.as_object()?;
        let v = match b.get("const") {
            Some(c) => c.as_str()?,
            None => {
                let arr = b.get("enum")?.as_array()?;
                if arr.len() != 1 {
                    return None;
                }
                arr[0].as_str()?
            }
        };
        values.push(v.to_string());
    }
    Some(values)
}

/// Resolve a local $ref like "#/$defs/ScalingMode" against the root object.
/// Returns the referenced object map, or None if it can't be resolved.
fn resolve_ref_obj<'a>(
    root_obj: &'a Map<String, Value>,
    obj: &'a Map<String, Value>,
) -> Option<&'a Map<String, Value>> {
    match obj.get("$ref") {
        Some(Value::String(r)) => {
            let path = r.strip_prefix("#/")?;
            let mut cur: &Map<String, Value> = root_obj;
            for raw_seg in path.split('/') {
                // JSON Pointer unescape (~1 => /, ~0 => ~)
                let seg = raw_seg.replace("~1", "/").replace("~0", "~");
                cur = cur.get(&seg)?.as_object()?;
            }
            Some(cur)
        }
        _ => Some(obj),
    }
}

fn primitive_kind(s: &str) -> Option<FieldKind> {
    match s {
        "string" => Some(FieldKind::String),
        "integer" => Some(FieldKind::Integer),
        "number" => Some(FieldKind::Number),
        "boolean" => Some(FieldKind::Boolean),
        _ => None,
    }
}

fn detect_field_kind(ty: Option<&Value>) -> Option<FieldKind> {
    match ty {
        Some(Value::String(s)) => primitive_kind(s),
        // unions like ["string","null"] for Option<T>
        Some(Value::Array(arr)) => arr
            .iter()
            .filter_map(|v| v.as_str())
            .find_map(primitive_kind),
        _ => None,
    }
}

fn is_nullable(ty: Option<&Value>) -> bool {
    match ty {
        Some(Value::String(s)) => s == "null",
        Some(Value::Array(arr)) => arr.iter().any(|v| v.as_str() == Some("null")),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::types::config::SweepConfig;
    use serde_json::{Value, json};

    fn spec<'a>(specs: &'a [FieldSpec], name: &str) -> &'a FieldSpec {
        specs
            .iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("no spec for {name}"))
    }

    #[test]
    fn detect_field_kind_handles_all_primitives() {
        for (ty, kind) in [
            ("string", FieldKind::String),
            ("integer", FieldKind::Integer),
            ("number", FieldKind::Number),
            ("boolean", FieldKind::Boolean),
        ] {
            assert_eq!(detect_field_kind(Some(&Value::String(ty.into()))), Some(kind));
        }
        assert!(detect_field_kind(Some(&Value::String("object".into()))).is_none());
        assert!(detect_field_kind(None).is_none());
    }

    #[test]
    fn nullable_unions() {
        let a = json!(["null", "integer"]);
        let b = json!(["string", "null"]);
        assert_eq!(detect_field_kind(Some(&a)), Some(FieldKind::Integer));
        assert_eq!(detect_field_kind(Some(&b)), Some(FieldKind::String));
        assert!(is_nullable(Some(&a)));
        assert!(!is_nullable(Some(&json!("string"))));
    }

    #[test]
    fn resolve_ref_obj_follow_refs_and_unescape() {
        let root = json!({
            "$defs": {
                "a~b": { "inner/seg": { "type": "number" } }
            }
        })
        .as_object()
        .unwrap()
        .clone();

        let obj = json!({ "$ref": "#/$defs/a~0b/inner~1seg" })
            .as_object()
            .unwrap()
            .clone();
        let out = resolve_ref_obj(&root, &obj).expect("ref resolved");
        assert_eq!(out.get("type").and_then(Value::as_str), Some("number"));

        let me = json!({"type":"integer"}).as_object().unwrap().clone();
        let out = resolve_ref_obj(&root, &me).unwrap();
        assert_eq!(out.get("type").and_then(Value::as_str), Some("integer"));
    }

    #[test]
    fn allowed_values_from_enum_and_const_branches() {
        let plain = json!({ "type": "string", "enum": ["csv", "tsv"] });
        assert_eq!(
            allowed_values(plain.as_object().unwrap()),
            Some(vec!["csv".to_string(), "tsv".into()])
        );

        let documented = json!({ "oneOf": [
            { "type": "string", "const": "reject", "description": "fail" },
            { "type": "string", "enum": ["center"] }
        ]});
        assert_eq!(
            allowed_values(documented.as_object().unwrap()),
            Some(vec!["reject".to_string(), "center".into()])
        );

        let mixed = json!({ "oneOf": [ { "type": "object" } ] });
        assert!(allowed_values(mixed.as_object().unwrap()).is_none());
    }

    #[test]
    fn sweep_config_fields_are_all_promptable() {
        let root = schema_for::<SweepConfig>();
        let specs = field_specs(&root).unwrap();
        let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "data",
                "label_column",
                "feature_columns",
                "skip_invalid_rows",
                "k_values",
                "test_fraction",
                "seed",
                "scaling",
                "zero_variance",
                "dump_file",
                "dump_format",
            ]
        );

        let data = spec(&specs, "data");
        assert_eq!(data.kind, FieldKind::String);
        assert_eq!(data.title, "Data file");
        assert_eq!(
            data.path,
            Some(PathRule {
                must_exist: true,
                extensions: vec!["csv".into()]
            })
        );

        let dump = spec(&specs, "dump_file");
        assert!(dump.nullable);
        assert_eq!(dump.path.as_ref().map(|p| p.must_exist), Some(false));

        let scaling = spec(&specs, "scaling");
        assert_eq!(scaling.kind, FieldKind::String);
        assert_eq!(
            scaling.allowed,
            Some(vec!["standardize".to_string(), "none".into()])
        );
        assert_eq!(
            spec(&specs, "zero_variance").allowed,
            Some(vec!["reject".to_string(), "center".into()])
        );

        let fraction = spec(&specs, "test_fraction");
        assert_eq!(fraction.kind, FieldKind::Number);
        assert_eq!(fraction.min, Some(0.0));
        assert_eq!(fraction.max, Some(1.0));

        assert_eq!(spec(&specs, "seed").kind, FieldKind::Integer);
        assert_eq!(spec(&specs, "skip_invalid_rows").kind, FieldKind::Boolean);
        assert!(specs.iter().all(|s| !s.required));
    }

    #[test]
    fn non_struct_schema_errors() {
        let root = schema_for::<u32>();
        assert!(field_specs(&root).is_err());
    }
}
