// ── Path parameters ──
//
// A paradict maps path placeholders (`device`, `vdom`, parent keys) to the
// values a user supplied. Substituting it into a schema's path template
// yields the object URL sent to FortiManager.

use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::schema::{ResourceKind, ResourceSchema};

/// Placeholder name → value.
pub type Paradict = BTreeMap<String, String>;

/// Map user-supplied parameters (keyed by parameter name) onto the schema's
/// placeholders. Every declared parameter is required and no others are
/// accepted.
pub fn build_paradict(
    schema: &ResourceSchema,
    params: &BTreeMap<String, String>,
) -> Result<Paradict, CoreError> {
    if let Some(unknown) = params.keys().find(|k| schema.param(k).is_none()) {
        return Err(CoreError::UnknownParam {
            resource: schema.type_name.into(),
            param: unknown.clone(),
        });
    }

    schema
        .params
        .iter()
        .map(|p| {
            let value = params
                .get(p.name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| CoreError::MissingParam {
                    resource: schema.type_name.into(),
                    param: p.name.into(),
                })?;
            Ok((p.placeholder.to_owned(), value.clone()))
        })
        .collect()
}

/// Escape a key for use as a single URL path segment.
pub fn escape_key(key: &str) -> String {
    key.replace('/', "\\/")
}

/// Substitute `{placeholder}` tokens in a path template.
pub fn resolve_path(
    resource: &str,
    template: &str,
    paradict: &Paradict,
) -> Result<String, CoreError> {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('}').ok_or_else(|| {
            CoreError::Internal(format!("unterminated placeholder in path '{template}'"))
        })?;
        let name = &after[..end];
        let value = paradict.get(name).ok_or_else(|| CoreError::MissingParam {
            resource: resource.into(),
            param: name.into(),
        })?;
        out.push_str(&escape_key(value));
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Path of the collection (tables) or the object itself (singletons).
pub fn collection_path(schema: &ResourceSchema, paradict: &Paradict) -> Result<String, CoreError> {
    resolve_path(schema.type_name, schema.path, paradict)
}

/// Path of one object. Tables need the object's key; singletons ignore it.
pub fn object_path(
    schema: &ResourceSchema,
    paradict: &Paradict,
    key: Option<&str>,
) -> Result<String, CoreError> {
    let base = collection_path(schema, paradict)?;
    match schema.kind {
        ResourceKind::Singleton => Ok(base),
        ResourceKind::Table { mkey } => {
            let key = key.ok_or_else(|| CoreError::MissingKey {
                resource: schema.type_name.into(),
                mkey: mkey.into(),
            })?;
            Ok(format!("{base}/{}", escape_key(key)))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog;
    use pretty_assertions::assert_eq;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn md5keys() -> &'static ResourceSchema {
        catalog::lookup("fmgdevice_router_ospf_ospfinterface_md5keys").unwrap()
    }

    #[test]
    fn nested_table_path_substitutes_every_placeholder() {
        let schema = md5keys();
        let dict = build_paradict(
            schema,
            &params(&[
                ("device_name", "FGT-01"),
                ("device_vdom", "root"),
                ("ospf_interface", "wan1"),
            ]),
        )
        .unwrap();

        assert_eq!(
            collection_path(schema, &dict).unwrap(),
            "/pm/config/device/FGT-01/vdom/root/router/ospf/ospf-interface/wan1/md5-keys"
        );
        assert_eq!(
            object_path(schema, &dict, Some("3")).unwrap(),
            "/pm/config/device/FGT-01/vdom/root/router/ospf/ospf-interface/wan1/md5-keys/3"
        );
    }

    #[test]
    fn slashes_in_values_are_escaped() {
        let schema = catalog::lookup("fmgdevice_system_dns").unwrap();
        let dict = build_paradict(schema, &params(&[("device_name", "lab/fgt")])).unwrap();
        assert_eq!(
            object_path(schema, &dict, None).unwrap(),
            "/pm/config/device/lab\\/fgt/global/system/dns"
        );
        assert_eq!(escape_key("10.0.0.0/8"), "10.0.0.0\\/8");
    }

    #[test]
    fn missing_and_unknown_params_are_rejected() {
        let schema = md5keys();
        let err = build_paradict(schema, &params(&[("device_name", "FGT-01")])).unwrap_err();
        assert!(
            matches!(err, CoreError::MissingParam { ref param, .. } if param == "device_vdom"),
            "{err}"
        );

        let err = build_paradict(
            schema,
            &params(&[
                ("device_name", "a"),
                ("device_vdom", "b"),
                ("ospf_interface", "c"),
                ("extra", "d"),
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::UnknownParam { .. }), "{err}");
    }

    #[test]
    fn table_object_path_needs_a_key() {
        let schema = md5keys();
        let dict = params(&[("device", "a"), ("vdom", "b"), ("ospf_interface", "c")]);
        assert!(matches!(
            object_path(schema, &dict, None),
            Err(CoreError::MissingKey { .. })
        ));
    }

    #[test]
    fn unresolved_placeholder_names_the_param() {
        let err = resolve_path("x", "/a/{device}/b", &Paradict::new()).unwrap_err();
        assert!(err.to_string().contains("device"), "{err}");
    }
}
