//! Shared helpers for command handlers.

use std::collections::BTreeMap;
use std::path::Path;

use fortiform_core::convert::{attributes_from_json, parse_assignment};
use fortiform_core::{Attributes, ResourceSchema};

use crate::cli::AttributeArgs;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Parse repeated `--param NAME=VALUE` flags.
pub fn parse_params(raw: &[String]) -> Result<BTreeMap<String, String>, CliError> {
    raw.iter()
        .map(|entry| {
            let (name, value) = entry.split_once('=').ok_or_else(|| CliError::Validation {
                field: "param".into(),
                reason: format!("expected NAME=VALUE, got '{entry}'"),
            })?;
            Ok((name.trim().to_owned(), value.to_owned()))
        })
        .collect()
}

/// Read a JSON or YAML attribute file. YAML is a superset of JSON, so one
/// parser covers both.
pub fn read_attributes_file(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("{}: {e}", path.display()),
    })
}

/// Collect attributes from `--from-file` then `--set`; later wins.
pub fn collect_attributes(
    schema: &ResourceSchema,
    args: &AttributeArgs,
) -> Result<Attributes, CliError> {
    let mut attrs = match &args.from_file {
        Some(path) => attributes_from_json(schema, &read_attributes_file(path)?)?,
        None => Attributes::new(),
    };
    for raw in &args.sets {
        let (name, value) = parse_assignment(schema, raw)?;
        attrs.insert(name, value);
    }
    Ok(attrs)
}
