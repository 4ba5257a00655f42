//! Create, read, update, delete and import handlers.
//!
//! Input is validated locally before any connection is made. Each handler
//! loads the state file, runs one engine operation, and saves the result.

use std::io::IsTerminal;
use std::path::PathBuf;

use tracing::warn;

use fortiform_api::JsonRpcClient;
use fortiform_core::convert::{conform, validate_required};
use fortiform_core::paradict::build_paradict;
use fortiform_core::{Address, ResourceKind, ResourceSchema, ResourceState, StateFile, catalog};
use fortiform_core::{Attributes, Engine, Provider};

use crate::cli::{AddressArgs, CreateArgs, GlobalOpts, ImportArgs, UpdateArgs};
use crate::config;
use crate::error::CliError;

use super::state_cmd::{not_tracked, print_state};
use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

struct Target {
    address: Address,
    schema: &'static ResourceSchema,
    state_path: PathBuf,
}

impl Target {
    fn resolve(raw: &str, global: &GlobalOpts) -> Result<Self, CliError> {
        let address: Address = raw.parse()?;
        let schema = catalog::lookup(&address.resource_type).ok_or_else(|| {
            CliError::NotFound {
                resource_type: "Resource type".into(),
                identifier: address.resource_type.clone(),
                list_command: "resources list".into(),
            }
        })?;
        Ok(Self {
            address,
            schema,
            state_path: config::state_path(global),
        })
    }

    fn load_state(&self) -> Result<StateFile, CliError> {
        Ok(StateFile::load(&self.state_path)?)
    }

    fn ensure_untracked(&self, state: &StateFile) -> Result<(), CliError> {
        match state.get(&self.address) {
            Some(existing) => Err(CliError::Conflict {
                resource_type: self.address.to_string(),
                identifier: existing.id.clone(),
            }),
            None => Ok(()),
        }
    }

    fn tracked(&self, state: &StateFile) -> Result<ResourceState, CliError> {
        state
            .get(&self.address)
            .cloned()
            .ok_or_else(|| not_tracked(&self.address))
    }

    /// Track a written object, then read it back. The object stays in
    /// state even when the read fails.
    async fn read_back(
        &self,
        state: &mut StateFile,
        engine: &Engine<JsonRpcClient>,
        written: ResourceState,
    ) -> Result<Option<ResourceState>, CliError> {
        state.put(&self.address, written.clone());
        state.save(&self.state_path)?;
        Ok(engine.read(self.schema, &written).await?)
    }

    /// Store the refreshed object, or drop it when FortiManager no longer
    /// has it.
    fn record(
        &self,
        state: &mut StateFile,
        result: Option<ResourceState>,
        global: &GlobalOpts,
    ) -> Result<(), CliError> {
        match result {
            Some(entry) => {
                state.put(&self.address, entry.clone());
                state.save(&self.state_path)?;
                print_state(&self.address, &entry, global);
            }
            None => {
                warn!(address = %self.address, "object no longer exists, dropping from state");
                if state.remove(&self.address).is_some() {
                    state.save(&self.state_path)?;
                }
                if !global.quiet {
                    eprintln!(
                        "! {} no longer exists on FortiManager; removed from state",
                        self.address
                    );
                }
            }
        }
        Ok(())
    }
}

/// Validate input locally so bad input fails before connecting.
fn prevalidate(
    schema: &ResourceSchema,
    params: &std::collections::BTreeMap<String, String>,
    attributes: &Attributes,
) -> Result<(), CliError> {
    build_paradict(schema, params)?;
    let attrs = conform(schema, attributes)?;
    validate_required(schema, &attrs)?;
    Ok(())
}

async fn connect(global: &GlobalOpts) -> Result<Provider, CliError> {
    let provider_config = config::resolve_provider_config(global)?;
    Provider::connect(provider_config)
        .await
        .map_err(|e| match CliError::from(e) {
            CliError::AuthFailed { message, .. } => CliError::AuthFailed {
                profile: config::active_profile_name(global, &config::load_config_or_default()),
                message,
            },
            other => other,
        })
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn create(args: CreateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let target = Target::resolve(&args.address, global)?;
    let params = util::parse_params(&args.params)?;
    let attributes = util::collect_attributes(target.schema, &args.attributes)?;
    prevalidate(target.schema, &params, &attributes)?;

    let mut state = target.load_state()?;
    target.ensure_untracked(&state)?;

    let provider = connect(global).await?;
    let engine = provider.engine();
    let result = match engine.create_object(target.schema, &params, &attributes).await {
        Ok(written) => target.read_back(&mut state, engine, written).await,
        Err(e) => Err(e.into()),
    };
    provider.disconnect().await;

    target.record(&mut state, result?, global)
}

pub async fn read(args: AddressArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let target = Target::resolve(&args.address, global)?;
    let mut state = target.load_state()?;
    let prior = target.tracked(&state)?;

    let provider = connect(global).await?;
    let result = provider.engine().read(target.schema, &prior).await;
    provider.disconnect().await;

    target.record(&mut state, result?, global)
}

pub async fn update(args: UpdateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let target = Target::resolve(&args.address, global)?;
    let mut state = target.load_state()?;
    let prior = target.tracked(&state)?;

    let mut attributes = prior.attributes.clone();
    for name in &args.unset {
        if target.schema.field(name).is_none() {
            return Err(CliError::Validation {
                field: name.clone(),
                reason: format!("{} has no such attribute", target.schema.type_name),
            });
        }
        attributes.remove(name);
    }
    attributes.extend(util::collect_attributes(target.schema, &args.attributes)?);
    prevalidate(target.schema, &prior.params, &attributes)?;

    let provider = connect(global).await?;
    let engine = provider.engine();
    let result = match engine.update_object(target.schema, &prior, &attributes).await {
        Ok(written) => target.read_back(&mut state, engine, written).await,
        Err(e) => Err(e.into()),
    };
    provider.disconnect().await;

    target.record(&mut state, result?, global)
}

pub async fn delete(args: AddressArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let target = Target::resolve(&args.address, global)?;
    let mut state = target.load_state()?;
    let prior = target.tracked(&state)?;

    if !global.yes && !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: format!("delete {}", target.address),
        });
    }
    let prompt = format!("Delete {} ({})?", target.address, prior.id);
    if !util::confirm(&prompt, global.yes)? {
        eprintln!("Aborted");
        return Ok(());
    }

    let provider = connect(global).await?;
    let result = provider.engine().delete(target.schema, &prior).await;
    provider.disconnect().await;
    result?;

    state.remove(&target.address);
    state.save(&target.state_path)?;
    if !global.quiet {
        eprintln!("✓ {} deleted", target.address);
    }
    Ok(())
}

pub async fn import(args: ImportArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let target = Target::resolve(&args.address, global)?;
    let params = util::parse_params(&args.params)?;
    build_paradict(target.schema, &params)?;

    if let ResourceKind::Table { mkey } = target.schema.kind {
        if args.id.is_none() {
            return Err(CliError::Validation {
                field: "id".into(),
                reason: format!(
                    "{} is a table keyed by {mkey}; pass the object key",
                    target.schema.type_name
                ),
            });
        }
    }

    let mut state = target.load_state()?;
    target.ensure_untracked(&state)?;

    let provider = connect(global).await?;
    let result = provider
        .engine()
        .import(target.schema, &params, args.id.as_deref())
        .await;
    provider.disconnect().await;

    match result? {
        Some(entry) => target.record(&mut state, Some(entry), global),
        None => Err(CliError::NotFound {
            resource_type: target.schema.title.into(),
            identifier: args.id.unwrap_or_else(|| target.schema.title.into()),
            list_command: format!("resources show {}", target.schema.type_name),
        }),
    }
}
