// ── Attribute values ──
//
// Typed attribute values on the resource surface. The wire side is plain
// JSON; `convert` moves between the two using the schema's field kinds.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::schema::{Field, FieldKind};

/// Attribute name → value.
pub type Attributes = BTreeMap<String, Value>;

/// A single attribute value.
///
/// Serialized untagged so state files and structured output read naturally.
/// `Set` never deserializes directly (arrays come back as `List`);
/// [`Value::conform`] restores it using the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    String(String),
    List(Vec<String>),
    Blocks(Vec<Attributes>),
    Set(BTreeSet<String>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::String(_) => "string",
            Self::List(_) => "list(string)",
            Self::Set(_) => "set(string)",
            Self::Blocks(_) => "list(block)",
        }
    }

    /// Plain JSON rendering (attribute names, not wire names).
    pub fn to_json(&self) -> Json {
        match self {
            Self::Int(n) => Json::from(*n),
            Self::String(s) => Json::from(s.as_str()),
            Self::List(items) => Json::from(items.clone()),
            Self::Set(items) => Json::from(items.iter().cloned().collect::<Vec<_>>()),
            Self::Blocks(blocks) => Json::Array(
                blocks
                    .iter()
                    .map(|b| {
                        Json::Object(b.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
                    })
                    .collect(),
            ),
        }
    }

    /// Parse user input (JSON/YAML/CLI) for an attribute of the given kind.
    pub fn from_input(kind: FieldKind, input: &Json) -> Result<Self, String> {
        match kind {
            FieldKind::String => match input {
                Json::String(s) => Ok(Self::String(s.clone())),
                Json::Number(n) => Ok(Self::String(n.to_string())),
                Json::Bool(b) => Ok(Self::String(b.to_string())),
                other => Err(format!("expected a string, got {}", json_type(other))),
            },
            FieldKind::Int => match input {
                Json::Number(n) => n
                    .as_i64()
                    .map(Self::Int)
                    .ok_or_else(|| format!("{n} is not an integer")),
                Json::String(s) => s
                    .trim()
                    .parse()
                    .map(Self::Int)
                    .map_err(|_| format!("'{s}' is not an integer")),
                other => Err(format!("expected an integer, got {}", json_type(other))),
            },
            FieldKind::StringSet => string_items(input).map(|v| Self::Set(v.into_iter().collect())),
            FieldKind::StringList => string_items(input).map(Self::List),
            FieldKind::Block(fields) => match input {
                Json::Array(items) => items
                    .iter()
                    .map(|item| block_from_input(fields, item))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Self::Blocks),
                Json::Object(_) => Ok(Self::Blocks(vec![block_from_input(fields, input)?])),
                other => Err(format!("expected a list of blocks, got {}", json_type(other))),
            },
        }
    }

    /// Re-interpret a value against its schema kind. Used after loading
    /// state, where sets come back as lists.
    pub fn conform(&self, kind: FieldKind) -> Result<Self, String> {
        Self::from_input(kind, &self.to_json())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
            Self::Set(items) => {
                write!(f, "[{}]", items.iter().cloned().collect::<Vec<_>>().join(", "))
            }
            Self::Blocks(blocks) => write!(f, "<{} block(s)>", blocks.len()),
        }
    }
}

/// Build one nested block from a JSON object keyed by attribute names.
pub(crate) fn block_from_input(fields: &[Field], input: &Json) -> Result<Attributes, String> {
    let Json::Object(map) = input else {
        return Err(format!("expected a block object, got {}", json_type(input)));
    };

    let mut attrs = Attributes::new();
    for (key, raw) in map {
        if raw.is_null() {
            continue;
        }
        let field = fields
            .iter()
            .find(|f| f.name == key)
            .ok_or_else(|| format!("unknown block attribute '{key}'"))?;
        let value = Value::from_input(field.kind, raw).map_err(|e| format!("{key}: {e}"))?;
        attrs.insert(key.clone(), value);
    }
    Ok(attrs)
}

/// Accept a JSON array of scalars, or a comma-separated string.
fn string_items(input: &Json) -> Result<Vec<String>, String> {
    match input {
        Json::Array(items) => items
            .iter()
            .map(|item| match item {
                Json::String(s) => Ok(s.clone()),
                Json::Number(n) => Ok(n.to_string()),
                other => Err(format!("list items must be strings, got {}", json_type(other))),
            })
            .collect(),
        Json::String(s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()),
        other => Err(format!("expected a list, got {}", json_type(other))),
    }
}

fn json_type(v: &Json) -> &'static str {
    match v {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
