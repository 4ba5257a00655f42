// ── Flatten / expand ──
//
// Conversion between typed attributes and FortiManager's JSON payloads.
// `flatten` reads a wire object into attributes, `expand` goes the other
// way. Both are driven purely by the schema's field table.

use std::collections::BTreeSet;

use serde_json::{Map, Value as Json};
use tracing::warn;

use crate::error::CoreError;
use crate::schema::{Field, FieldKind, ResourceSchema};
use crate::value::{Attributes, Value};

// ── Scalar helpers ───────────────────────────────────────────────────

/// Render each JSON element as a string. Nulls are dropped.
pub fn flatten_string_list(items: &[Json]) -> Vec<String> {
    items.iter().filter_map(scalar_to_string).collect()
}

/// Turn strings into a JSON array.
pub fn expand_string_list(items: &[String]) -> Json {
    Json::Array(items.iter().map(|s| Json::String(s.clone())).collect())
}

/// Normalize a list-valued wire field.
///
/// FortiManager returns multi-value options either as an array or as a
/// single space-separated string, depending on firmware and field.
pub fn convstr2list(value: &Json) -> Vec<String> {
    match value {
        Json::Null => Vec::new(),
        Json::Array(items) => flatten_string_list(items),
        Json::String(s) => s.split_whitespace().map(String::from).collect(),
        other => scalar_to_string(other).into_iter().collect(),
    }
}

/// Render an int attribute as an ID string.
pub fn get_int_key(attrs: &Attributes, key: &str) -> Option<String> {
    attrs.get(key).and_then(Value::as_int).map(|n| n.to_string())
}

/// Render a string attribute as an ID string. Empty strings are no key.
pub fn get_string_key(attrs: &Attributes, key: &str) -> Option<String> {
    attrs
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn scalar_to_string(value: &Json) -> Option<String> {
    match value {
        Json::Null => None,
        Json::String(s) => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        Json::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

// ── Flatten (wire → attributes) ──────────────────────────────────────

/// Read a wire object into attributes. Only schema fields are kept.
pub fn flatten(fields: &[Field], wire: &Map<String, Json>) -> Attributes {
    fields
        .iter()
        .filter_map(|field| {
            let raw = wire.get(field.wire_name().as_ref())?;
            let value = flatten_value(field.kind, raw)?;
            Some((field.name.to_owned(), value))
        })
        .collect()
}

fn flatten_value(kind: FieldKind, raw: &Json) -> Option<Value> {
    match kind {
        FieldKind::String => match raw {
            Json::Null => None,
            // Single-option fields sometimes come back as one-element arrays.
            Json::Array(items) => Some(Value::String(flatten_string_list(items).join(" "))),
            other => scalar_to_string(other).map(Value::String),
        },
        FieldKind::Int => match raw {
            Json::Number(n) => {
                let int = n.as_i64();
                if int.is_none() {
                    warn!(value = %n, "integer does not fit in i64, dropping");
                }
                int.map(Value::Int)
            }
            Json::String(s) => {
                let int = s.trim().parse().ok();
                if int.is_none() && !s.trim().is_empty() {
                    warn!(value = %s, "expected an integer, dropping");
                }
                int.map(Value::Int)
            }
            Json::Array(items) if items.len() == 1 => flatten_value(kind, &items[0]),
            _ => None,
        },
        FieldKind::StringSet => Some(Value::Set(
            convstr2list(raw).into_iter().collect::<BTreeSet<_>>(),
        )),
        FieldKind::StringList => Some(Value::List(convstr2list(raw))),
        FieldKind::Block(sub) => match raw {
            Json::Array(items) => Some(Value::Blocks(
                items
                    .iter()
                    .filter_map(Json::as_object)
                    .map(|obj| flatten(sub, obj))
                    .collect(),
            )),
            Json::Object(obj) => Some(Value::Blocks(vec![flatten(sub, obj)])),
            _ => None,
        },
    }
}

// ── Expand (attributes → wire) ───────────────────────────────────────

/// Build the wire payload. Only attributes that are set are sent.
pub fn expand(fields: &[Field], attrs: &Attributes) -> Map<String, Json> {
    fields
        .iter()
        .filter_map(|field| {
            let value = attrs.get(field.name)?;
            Some((field.wire_name().into_owned(), expand_value(field, value)))
        })
        .collect()
}

fn expand_value(field: &Field, value: &Value) -> Json {
    match value {
        Value::Int(n) => Json::from(*n),
        Value::String(s) => Json::String(s.clone()),
        Value::List(items) => expand_string_list(items),
        Value::Set(items) => Json::Array(items.iter().map(|s| Json::String(s.clone())).collect()),
        Value::Blocks(blocks) => {
            let sub = field.sub_fields().unwrap_or(&[]);
            Json::Array(
                blocks
                    .iter()
                    .map(|block| Json::Object(expand(sub, block)))
                    .collect(),
            )
        }
    }
}

// ── Validation ───────────────────────────────────────────────────────

/// Check user-supplied attributes against the schema and coerce each value
/// to its field kind. Unknown attributes are rejected.
pub fn conform(schema: &ResourceSchema, attrs: &Attributes) -> Result<Attributes, CoreError> {
    attrs
        .iter()
        .map(|(name, value)| {
            let field = schema.field(name).ok_or_else(|| CoreError::ValidationFailed {
                message: format!("{} has no attribute '{name}'", schema.type_name),
            })?;
            let value = value
                .conform(field.kind)
                .map_err(|reason| CoreError::ValidationFailed {
                    message: format!("{name}: {reason}"),
                })?;
            Ok((name.clone(), value))
        })
        .collect()
}

/// Every required attribute must be present.
pub fn validate_required(schema: &ResourceSchema, attrs: &Attributes) -> Result<(), CoreError> {
    let missing: Vec<&str> = schema
        .fields
        .iter()
        .filter(|f| f.required && !attrs.contains_key(f.name))
        .map(|f| f.name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::ValidationFailed {
            message: format!(
                "{} requires attribute(s): {}",
                schema.type_name,
                missing.join(", ")
            ),
        })
    }
}

/// Build attributes from a JSON object keyed by attribute names
/// (the shape of `--from-file` input).
pub fn attributes_from_json(schema: &ResourceSchema, input: &Json) -> Result<Attributes, CoreError> {
    let Json::Object(map) = input else {
        return Err(CoreError::ValidationFailed {
            message: "attributes must be an object".into(),
        });
    };

    let mut attrs = Attributes::new();
    for (name, raw) in map {
        if raw.is_null() {
            continue;
        }
        let field = schema.field(name).ok_or_else(|| CoreError::ValidationFailed {
            message: format!("{} has no attribute '{name}'", schema.type_name),
        })?;
        let value =
            Value::from_input(field.kind, raw).map_err(|reason| CoreError::ValidationFailed {
                message: format!("{name}: {reason}"),
            })?;
        attrs.insert(name.clone(), value);
    }
    Ok(attrs)
}

/// Parse a CLI assignment such as `primary=8.8.8.8`, `domain=a.example,b.example`,
/// or `free_style=[{"fosid":1,"filter":"x"}]`.
pub fn parse_assignment(schema: &ResourceSchema, raw: &str) -> Result<(String, Value), CoreError> {
    let (name, text) = raw
        .split_once('=')
        .ok_or_else(|| CoreError::ValidationFailed {
            message: format!("expected NAME=VALUE, got '{raw}'"),
        })?;
    let name = name.trim();

    let field = schema.field(name).ok_or_else(|| CoreError::ValidationFailed {
        message: format!("{} has no attribute '{name}'", schema.type_name),
    })?;

    let input = match field.kind {
        FieldKind::Block(_) => {
            serde_json::from_str(text).map_err(|e| CoreError::ValidationFailed {
                message: format!("{name}: block values must be JSON: {e}"),
            })?
        }
        FieldKind::StringSet | FieldKind::StringList if text.trim_start().starts_with('[') => {
            serde_json::from_str(text).map_err(|e| CoreError::ValidationFailed {
                message: format!("{name}: invalid JSON list: {e}"),
            })?
        }
        _ => Json::String(text.to_owned()),
    };

    let value =
        Value::from_input(field.kind, &input).map_err(|reason| CoreError::ValidationFailed {
            message: format!("{name}: {reason}"),
        })?;
    Ok((name.to_owned(), value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn dns() -> &'static ResourceSchema {
        catalog::lookup("fmgdevice_system_dns").unwrap()
    }

    #[test]
    fn convstr2list_accepts_strings_and_arrays() {
        assert_eq!(convstr2list(&json!("port1 port2")), vec!["port1", "port2"]);
        assert_eq!(convstr2list(&json!(["port1", 7])), vec!["port1", "7"]);
        assert_eq!(convstr2list(&json!(null)), Vec::<String>::new());
        assert_eq!(convstr2list(&json!(3)), vec!["3"]);
    }

    #[test]
    fn string_list_helpers() {
        assert_eq!(
            flatten_string_list(&[json!("a"), json!(null), json!(2)]),
            vec!["a", "2"]
        );
        assert_eq!(
            expand_string_list(&["a".into(), "b".into()]),
            json!(["a", "b"])
        );
    }

    #[test]
    fn key_helpers() {
        let mut attrs = Attributes::new();
        attrs.insert("fosid".into(), Value::Int(12));
        attrs.insert("name".into(), Value::String(String::new()));
        assert_eq!(get_int_key(&attrs, "fosid").as_deref(), Some("12"));
        assert_eq!(get_int_key(&attrs, "name"), None);
        assert_eq!(get_string_key(&attrs, "name"), None);
    }

    #[test]
    fn flatten_translates_wire_names_and_types() {
        let wire = json!({
            "primary": "8.8.8.8",
            "dns-cache-limit": "5000",
            "protocol": "doh cleartext",
            "server-hostname": ["b.example", "a.example"],
            "not-in-schema": "ignored"
        });
        let attrs = flatten(dns().fields, wire.as_object().unwrap());

        assert_eq!(attrs["primary"], Value::String("8.8.8.8".into()));
        assert_eq!(attrs["dns_cache_limit"], Value::Int(5000));
        assert_eq!(
            attrs["protocol"],
            Value::Set(["cleartext".to_string(), "doh".to_string()].into_iter().collect())
        );
        assert_eq!(
            attrs["server_hostname"],
            Value::List(vec!["b.example".into(), "a.example".into()])
        );
        assert!(!attrs.contains_key("not_in_schema"));
    }

    #[test]
    fn expand_sends_only_set_attributes() {
        let mut attrs = Attributes::new();
        attrs.insert("primary".into(), Value::String("1.1.1.1".into()));
        attrs.insert("timeout".into(), Value::Int(5));
        let wire = expand(dns().fields, &attrs);
        assert_eq!(
            Json::Object(wire),
            json!({ "primary": "1.1.1.1", "timeout": 5 })
        );
    }

    #[test]
    fn fosid_maps_to_wire_id_inside_blocks() {
        let schema = catalog::lookup("fmgdevice_log_syslogd_filter").unwrap();
        let (name, value) =
            parse_assignment(schema, r#"free_style=[{"fosid":1,"category":"traffic","filter":"srcip 10.0.0.1"}]"#)
                .unwrap();
        let mut attrs = Attributes::new();
        attrs.insert(name, value);
        let wire = Json::Object(expand(schema.fields, &attrs));
        assert_eq!(wire["free-style"][0]["id"], 1);
        assert_eq!(wire["free-style"][0]["category"], "traffic");

        let back = flatten(schema.fields, wire.as_object().unwrap());
        assert_eq!(back, attrs);
    }

    fn sample_attributes(fields: &[Field]) -> Attributes {
        fields
            .iter()
            .map(|field| {
                let value = match field.kind {
                    FieldKind::String => Value::String(format!("{}-value", field.name)),
                    FieldKind::Int => Value::Int(7),
                    FieldKind::StringSet => {
                        Value::Set(["b".to_string(), "a".to_string()].into_iter().collect())
                    }
                    FieldKind::StringList => Value::List(vec!["z".into(), "a".into()]),
                    FieldKind::Block(sub) => {
                        Value::Blocks(vec![sample_attributes(sub), sample_attributes(sub)])
                    }
                };
                (field.name.to_owned(), value)
            })
            .collect()
    }

    #[test]
    fn every_catalog_field_survives_expand_then_flatten() {
        for schema in catalog::all() {
            let attrs = sample_attributes(schema.fields);
            let wire = expand(schema.fields, &attrs);
            assert_eq!(wire.len(), attrs.len(), "{}: wire names collide", schema.type_name);
            assert_eq!(
                flatten(schema.fields, &wire),
                attrs,
                "{} does not round-trip",
                schema.type_name
            );
        }
    }

    #[test]
    fn out_of_range_ints_are_dropped() {
        let schema = dns();
        let wire = json!({ "timeout": u64::MAX, "dns-cache-limit": i64::MAX, "retry": "many" });
        let attrs = flatten(schema.fields, wire.as_object().unwrap());
        assert!(!attrs.contains_key("timeout"));
        assert!(!attrs.contains_key("retry"));
        assert_eq!(attrs["dns_cache_limit"], Value::Int(i64::MAX));
    }

    #[test]
    fn parse_assignment_respects_kinds() {
        assert_eq!(
            parse_assignment(dns(), "timeout=7").unwrap(),
            ("timeout".into(), Value::Int(7))
        );
        assert_eq!(
            parse_assignment(dns(), "domain=b.example,a.example").unwrap().1,
            Value::Set(["a.example".to_string(), "b.example".to_string()].into_iter().collect())
        );
        assert_eq!(
            parse_assignment(dns(), r#"server_hostname=["x","y"]"#).unwrap().1,
            Value::List(vec!["x".into(), "y".into()])
        );
        assert!(parse_assignment(dns(), "timeout=soon").is_err());
        assert!(parse_assignment(dns(), "bogus=1").is_err());
        assert!(parse_assignment(dns(), "no-equals-sign").is_err());
    }

    #[test]
    fn conform_and_required() {
        let schema = catalog::lookup("fmgdevice_router_ospf_ospfinterface_md5keys").unwrap();
        let mut attrs = Attributes::new();
        attrs.insert("fosid".into(), Value::String("3".into()));
        let err = validate_required(schema, &attrs).unwrap_err();
        assert!(err.to_string().contains("key_string"), "{err}");

        let conformed = conform(schema, &attrs).unwrap();
        assert_eq!(conformed["fosid"], Value::Int(3));

        attrs.insert("unknown".into(), Value::Int(1));
        assert!(conform(schema, &attrs).is_err());
    }

    #[test]
    fn attributes_from_json_skips_nulls() {
        let attrs =
            attributes_from_json(dns(), &json!({ "primary": "9.9.9.9", "secondary": null })).unwrap();
        assert_eq!(attrs.len(), 1);
        assert!(attributes_from_json(dns(), &json!(["not", "an", "object"])).is_err());
    }
}
