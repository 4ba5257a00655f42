//! Resource catalog browsing.

use serde::Serialize;
use strum::IntoEnumIterator;
use tabled::Tabled;

use fortiform_core::{Area, Field, ResourceKind, ResourceSchema, catalog};

use crate::cli::{GlobalOpts, ResourcesArgs, ResourcesCommand};
use crate::error::CliError;
use crate::output;

// ── Views ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ResourceView {
    #[serde(rename = "type")]
    type_name: &'static str,
    title: &'static str,
    area: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mkey: Option<&'static str>,
    path: &'static str,
    description: &'static str,
    params: Vec<ParamView>,
    fields: Vec<FieldView>,
}

#[derive(Serialize)]
struct ParamView {
    name: &'static str,
    description: &'static str,
}

#[derive(Serialize)]
struct FieldView {
    name: &'static str,
    wire: String,
    #[serde(rename = "type")]
    kind: String,
    required: bool,
    sensitive: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldView>,
}

impl From<&Field> for FieldView {
    fn from(f: &Field) -> Self {
        Self {
            name: f.name,
            wire: f.wire_name().into_owned(),
            kind: f.kind.to_string(),
            required: f.required,
            sensitive: f.sensitive,
            fields: f
                .sub_fields()
                .map(|sub| sub.iter().map(FieldView::from).collect())
                .unwrap_or_default(),
        }
    }
}

impl From<&ResourceSchema> for ResourceView {
    fn from(s: &ResourceSchema) -> Self {
        let (kind, mkey) = match s.kind {
            ResourceKind::Singleton => ("singleton", None),
            ResourceKind::Table { mkey } => ("table", Some(mkey)),
        };
        Self {
            type_name: s.type_name,
            title: s.title,
            area: s.area.to_string(),
            kind,
            mkey,
            path: s.path,
            description: s.description,
            params: s
                .params
                .iter()
                .map(|p| ParamView {
                    name: p.name,
                    description: p.description,
                })
                .collect(),
            fields: s.fields.iter().map(FieldView::from).collect(),
        }
    }
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Type")]
    type_name: &'static str,
    #[tabled(rename = "Area")]
    area: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Params")]
    params: String,
}

impl From<&ResourceView> for ResourceRow {
    fn from(v: &ResourceView) -> Self {
        Self {
            type_name: v.type_name,
            area: v.area.clone(),
            kind: v
                .mkey
                .map_or_else(|| v.kind.to_owned(), |mkey| format!("table ({mkey})")),
            params: v.params.iter().map(|p| p.name).collect::<Vec<_>>().join(", "),
        }
    }
}

fn field_line(f: &FieldView, indent: usize) -> Vec<String> {
    let mut flags = Vec::new();
    if f.required {
        flags.push("required");
    }
    if f.sensitive {
        flags.push("sensitive");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    };

    let mut lines = vec![format!(
        "{:indent$}{} ({}, wire: {}){flags}",
        "", f.name, f.kind, f.wire
    )];
    for sub in &f.fields {
        lines.extend(field_line(sub, indent + 4));
    }
    lines
}

fn detail(v: &ResourceView, color: bool) -> String {
    let mut out = output::detail_lines(
        &[
            ("Type", v.type_name.to_owned()),
            ("Title", v.title.to_owned()),
            ("Area", v.area.clone()),
            ("Kind", v.kind.to_owned()),
            ("Key", v.mkey.unwrap_or("-").to_owned()),
            ("Path", v.path.to_owned()),
        ],
        color,
    );
    if !v.description.is_empty() {
        out.push_str("\n\n");
        out.push_str(v.description);
    }
    out.push_str("\n\nParameters:");
    for p in &v.params {
        out.push_str(&format!("\n  {}  {}", p.name, p.description));
    }
    out.push_str("\n\nAttributes:");
    for f in &v.fields {
        for line in field_line(f, 2) {
            out.push('\n');
            out.push_str(&line);
        }
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ResourcesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ResourcesCommand::List { area } => {
            let schemas: Vec<&ResourceSchema> = match area {
                Some(name) => {
                    let area: Area = name.parse().map_err(|_| CliError::Validation {
                        field: "area".into(),
                        reason: format!(
                            "unknown area '{name}', expected one of: {}",
                            Area::iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ")
                        ),
                    })?;
                    catalog::by_area(area).collect()
                }
                None => catalog::all().collect(),
            };
            let views: Vec<ResourceView> = schemas.into_iter().map(ResourceView::from).collect();
            let out = output::render_list(
                &global.output,
                &views,
                |v| ResourceRow::from(v),
                |v| v.type_name.to_owned(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResourcesCommand::Show { type_name } => {
            let schema = catalog::lookup(&type_name).ok_or_else(|| CliError::NotFound {
                resource_type: "Resource type".into(),
                identifier: type_name.clone(),
                list_command: "resources list".into(),
            })?;
            let view = ResourceView::from(schema);
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &view,
                |v| detail(v, color),
                |v| v.type_name.to_owned(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
