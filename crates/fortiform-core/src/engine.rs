// ── Generic CRUD engine ──
//
// One engine drives every resource in the catalog. Each operation builds
// the paradict, converts attributes with the schema's field table, issues
// the matching `ConfigApi` call, and reads the object back into state.

use std::collections::BTreeMap;
use std::future::Future;

use fortiform_api::{ConfigApi, Object};
use serde_json::Value as Json;
use tracing::{debug, info, warn};

use crate::convert::{conform, expand, flatten, get_int_key, get_string_key, validate_required};
use crate::error::{CoreError, Verb};
use crate::paradict::{build_paradict, collection_path, object_path};
use crate::schema::{FieldKind, ResourceKind, ResourceSchema};
use crate::state::ResourceState;
use crate::value::Attributes;

/// Schema-driven create/read/update/delete over any [`ConfigApi`].
pub struct Engine<C> {
    client: C,
    /// ADOM whose workspace wraps every write, when workspace mode is on.
    workspace: Option<String>,
}

impl<C: ConfigApi> Engine<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            workspace: None,
        }
    }

    /// Lock, commit and unlock `adom` around every write.
    pub fn with_workspace(mut self, adom: impl Into<String>) -> Self {
        self.workspace = Some(adom.into());
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn workspace(&self) -> Option<&str> {
        self.workspace.as_deref()
    }

    /// Create the object and return it as read back from FortiManager.
    ///
    /// `Ok(None)` means the object vanished between the write and the read.
    pub async fn create(
        &self,
        schema: &'static ResourceSchema,
        params: &BTreeMap<String, String>,
        attributes: &Attributes,
    ) -> Result<Option<ResourceState>, CoreError> {
        let written = self.create_object(schema, params, attributes).await?;
        self.read(schema, &written).await
    }

    /// Create the object without reading it back.
    ///
    /// The returned state carries the key and the submitted attributes, so
    /// callers can track the object even if the follow-up read fails.
    pub async fn create_object(
        &self,
        schema: &'static ResourceSchema,
        params: &BTreeMap<String, String>,
        attributes: &Attributes,
    ) -> Result<ResourceState, CoreError> {
        let attrs = conform(schema, attributes)?;
        validate_required(schema, &attrs)?;
        let paradict = build_paradict(schema, params)?;
        let payload = expand(schema.fields, &attrs);

        let id = self
            .in_workspace(Verb::Creating, schema, async {
                match schema.kind {
                    ResourceKind::Singleton => {
                        let url = object_path(schema, &paradict, None)?;
                        self.client
                            .set(&url, &payload)
                            .await
                            .map_err(wrap(Verb::Creating, schema))?;
                        Ok(schema.title.to_owned())
                    }
                    ResourceKind::Table { mkey } => {
                        let url = collection_path(schema, &paradict)?;
                        let echoed = self
                            .client
                            .add(&url, &payload)
                            .await
                            .map_err(wrap(Verb::Creating, schema))?;
                        key_from_response(schema, echoed.as_ref())
                            .or_else(|| key_from_attributes(schema, &attrs))
                            .ok_or_else(|| CoreError::MissingKey {
                                resource: schema.type_name.into(),
                                mkey: mkey.into(),
                            })
                    }
                }
            })
            .await?;

        info!(resource = schema.type_name, %id, "created");

        Ok(ResourceState {
            resource_type: schema.type_name.into(),
            id,
            params: params.clone(),
            attributes: attrs,
        })
    }

    /// Refresh one object. `Ok(None)` when it no longer exists, in which
    /// case the caller drops it from state.
    pub async fn read(
        &self,
        schema: &'static ResourceSchema,
        state: &ResourceState,
    ) -> Result<Option<ResourceState>, CoreError> {
        let paradict = build_paradict(schema, &state.params)?;
        let url = object_path(schema, &paradict, Some(state.id.as_str()))?;

        let Some(object) = self
            .client
            .get(&url)
            .await
            .map_err(wrap(Verb::Reading, schema))?
        else {
            warn!(resource = schema.type_name, id = %state.id, "object no longer exists");
            return Ok(None);
        };

        let mut attributes = flatten(schema.fields, &object);

        // Sensitive values come back masked.
        for field in schema.fields.iter().filter(|f| f.sensitive) {
            match state.attributes.get(field.name) {
                Some(prior) => {
                    attributes.insert(field.name.to_owned(), prior.clone());
                }
                None => {
                    attributes.remove(field.name);
                }
            }
        }

        let id = match schema.kind {
            ResourceKind::Singleton => schema.title.to_owned(),
            ResourceKind::Table { .. } => {
                key_from_attributes(schema, &attributes).unwrap_or_else(|| state.id.clone())
            }
        };

        debug!(resource = schema.type_name, %id, "read");

        Ok(Some(ResourceState {
            resource_type: schema.type_name.into(),
            id,
            params: state.params.clone(),
            attributes,
        }))
    }

    /// Apply `attributes` (the full desired set) to an existing object.
    pub async fn update(
        &self,
        schema: &'static ResourceSchema,
        prior: &ResourceState,
        attributes: &Attributes,
    ) -> Result<Option<ResourceState>, CoreError> {
        let written = self.update_object(schema, prior, attributes).await?;
        self.read(schema, &written).await
    }

    /// Write the update without reading it back. The returned state has
    /// the object's key after a possible rename.
    pub async fn update_object(
        &self,
        schema: &'static ResourceSchema,
        prior: &ResourceState,
        attributes: &Attributes,
    ) -> Result<ResourceState, CoreError> {
        let attrs = conform(schema, attributes)?;
        validate_required(schema, &attrs)?;
        let paradict = build_paradict(schema, &prior.params)?;
        let url = object_path(schema, &paradict, Some(prior.id.as_str()))?;
        let payload = expand(schema.fields, &attrs);

        self.in_workspace(Verb::Updating, schema, async {
            let result = match schema.kind {
                ResourceKind::Singleton => self.client.set(&url, &payload).await,
                ResourceKind::Table { .. } => self.client.update(&url, &payload).await,
            };
            result.map_err(wrap(Verb::Updating, schema))
        })
        .await?;

        // A changed key renames the object.
        let id = match schema.kind {
            ResourceKind::Singleton => schema.title.to_owned(),
            ResourceKind::Table { .. } => {
                key_from_attributes(schema, &attrs).unwrap_or_else(|| prior.id.clone())
            }
        };

        info!(resource = schema.type_name, %id, "updated");

        Ok(ResourceState {
            resource_type: schema.type_name.into(),
            id,
            params: prior.params.clone(),
            attributes: attrs,
        })
    }

    /// Remove the object. Singletons cannot be removed from a device, so
    /// for them this only forgets the state.
    pub async fn delete(
        &self,
        schema: &'static ResourceSchema,
        state: &ResourceState,
    ) -> Result<(), CoreError> {
        if schema.is_singleton() {
            info!(
                resource = schema.type_name,
                "singleton left on device, dropping from state only"
            );
            return Ok(());
        }

        let paradict = build_paradict(schema, &state.params)?;
        let url = object_path(schema, &paradict, Some(state.id.as_str()))?;

        self.in_workspace(Verb::Deleting, schema, async {
            match self.client.delete(&url).await {
                Ok(()) => Ok(()),
                Err(e) if e.is_not_found() => {
                    debug!(url, "already gone");
                    Ok(())
                }
                Err(e) => Err(CoreError::operation(Verb::Deleting, schema.title, e)),
            }
        })
        .await?;

        info!(resource = schema.type_name, id = %state.id, "deleted");
        Ok(())
    }

    /// Adopt an existing object by its key (ignored for singletons).
    pub async fn import(
        &self,
        schema: &'static ResourceSchema,
        params: &BTreeMap<String, String>,
        id: Option<&str>,
    ) -> Result<Option<ResourceState>, CoreError> {
        let id = match schema.kind {
            ResourceKind::Singleton => schema.title.to_owned(),
            ResourceKind::Table { mkey } => id
                .filter(|id| !id.is_empty())
                .ok_or_else(|| CoreError::MissingKey {
                    resource: schema.type_name.into(),
                    mkey: mkey.into(),
                })?
                .to_owned(),
        };

        let state = ResourceState {
            resource_type: schema.type_name.into(),
            id,
            params: params.clone(),
            attributes: Attributes::new(),
        };
        self.read(schema, &state).await
    }

    /// Run a write inside the workspace lock when workspace mode is on.
    /// Commit only after success; unlock always.
    async fn in_workspace<T>(
        &self,
        verb: Verb,
        schema: &'static ResourceSchema,
        op: impl Future<Output = Result<T, CoreError>>,
    ) -> Result<T, CoreError> {
        let Some(adom) = self.workspace.as_deref() else {
            return op.await;
        };

        self.client
            .lock_workspace(adom)
            .await
            .map_err(wrap(verb, schema))?;

        let result = match op.await {
            Ok(value) => self
                .client
                .commit_workspace(adom)
                .await
                .map(|()| value)
                .map_err(wrap(verb, schema)),
            Err(e) => Err(e),
        };

        if let Err(e) = self.client.unlock_workspace(adom).await {
            warn!(adom, error = %e, "failed to unlock workspace");
        }

        result
    }
}

fn wrap(
    verb: Verb,
    schema: &'static ResourceSchema,
) -> impl FnOnce(fortiform_api::Error) -> CoreError {
    move |e| CoreError::operation(verb, schema.title, e)
}

/// Key echoed back by `add`, e.g. `{"id": 4}` or `{"name": "vap1"}`.
fn key_from_response(schema: &ResourceSchema, echoed: Option<&Object>) -> Option<String> {
    let field = schema.mkey_field()?;
    match echoed?.get(field.wire_name().as_ref())? {
        Json::String(s) if !s.is_empty() => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn key_from_attributes(schema: &ResourceSchema, attrs: &Attributes) -> Option<String> {
    let field = schema.mkey_field()?;
    match field.kind {
        FieldKind::Int => get_int_key(attrs, field.name),
        _ => get_string_key(attrs, field.name),
    }
}
