//! Local state inspection.

use std::collections::BTreeMap;

use serde::Serialize;
use tabled::Tabled;

use fortiform_core::{Address, Attributes, ResourceState, StateFile, Value, catalog};

use crate::cli::{GlobalOpts, StateArgs, StateCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

const MASK: &str = "(sensitive)";

// ── Views ───────────────────────────────────────────────────────────

/// A tracked object as shown to the user. Sensitive values are masked.
#[derive(Serialize)]
pub(crate) struct StateView {
    address: String,
    #[serde(rename = "type")]
    resource_type: String,
    id: String,
    params: BTreeMap<String, String>,
    attributes: Attributes,
}

impl StateView {
    pub(crate) fn new(address: &str, state: &ResourceState) -> Self {
        let schema = catalog::lookup(&state.resource_type);
        let attributes = state
            .attributes
            .iter()
            .map(|(name, value)| {
                let sensitive = schema
                    .and_then(|s| s.field(name))
                    .is_some_and(|f| f.sensitive);
                let value = if sensitive {
                    Value::String(MASK.into())
                } else {
                    value.clone()
                };
                (name.clone(), value)
            })
            .collect();

        Self {
            address: address.to_owned(),
            resource_type: state.resource_type.clone(),
            id: state.id.clone(),
            params: state.params.clone(),
            attributes,
        }
    }
}

#[derive(Tabled)]
struct StateRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Params")]
    params: String,
}

impl From<&StateView> for StateRow {
    fn from(v: &StateView) -> Self {
        Self {
            address: v.address.clone(),
            id: v.id.clone(),
            params: v
                .params
                .iter()
                .map(|(k, val)| format!("{k}={val}"))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

fn detail(v: &StateView, color: bool) -> String {
    let mut pairs = vec![
        ("Address", v.address.clone()),
        ("Type", v.resource_type.clone()),
        ("ID", v.id.clone()),
    ];
    for (k, val) in &v.params {
        pairs.push((k.as_str(), val.clone()));
    }
    let mut out = output::detail_lines(&pairs, color);

    if !v.attributes.is_empty() {
        out.push_str("\n\nAttributes:\n");
        let attrs: Vec<(&str, String)> = v
            .attributes
            .iter()
            .map(|(k, val)| (k.as_str(), display_value(val)))
            .collect();
        let body = output::detail_lines(&attrs, color);
        out.push_str(
            &body
                .lines()
                .map(|l| format!("  {l}"))
                .collect::<Vec<_>>()
                .join("\n"),
        );
    }
    out
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Blocks(_) => value.to_json().to_string(),
        other => other.to_string(),
    }
}

/// Render one tracked object in the selected format.
pub(crate) fn print_state(address: &Address, state: &ResourceState, global: &GlobalOpts) {
    let view = StateView::new(&address.to_string(), state);
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &view,
        |v| detail(v, color),
        |v| v.id.clone(),
    );
    output::print_output(&out, global.quiet);
}

pub(crate) fn not_tracked(address: &Address) -> CliError {
    CliError::NotFound {
        resource_type: "Tracked object".into(),
        identifier: address.to_string(),
        list_command: "state list".into(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: StateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::state_path(global);

    match args.command {
        StateCommand::List { resource_type } => {
            let state = StateFile::load(&path)?;
            let views: Vec<StateView> = state
                .list(resource_type.as_deref())
                .map(|(addr, s)| StateView::new(addr, s))
                .collect();
            let out = output::render_list(&global.output, &views, |v| StateRow::from(v), |v| {
                v.address.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StateCommand::Show { address } => {
            let address: Address = address.parse()?;
            let state = StateFile::load(&path)?;
            let entry = state.get(&address).ok_or_else(|| not_tracked(&address))?;
            print_state(&address, entry, global);
            Ok(())
        }

        StateCommand::Rm { address } => {
            let address: Address = address.parse()?;
            let mut state = StateFile::load(&path)?;
            if state.remove(&address).is_none() {
                return Err(not_tracked(&address));
            }
            state.save(&path)?;
            if !global.quiet {
                eprintln!("✓ {address} removed from state");
            }
            Ok(())
        }
    }
}
