// ── Local state ──
//
// The record of what fortiform manages: one `ResourceState` per address,
// persisted as a single JSON document. A read that finds the object gone
// removes its entry.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog;
use crate::error::CoreError;
use crate::value::Attributes;

/// Default state file name, relative to the working directory.
pub const DEFAULT_STATE_FILE: &str = "fortiform.state.json";

const STATE_VERSION: u32 = 1;

// ── Address ──────────────────────────────────────────────────────────

/// `<type>.<name>`, e.g. `fmgdevice_system_dns.edge`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address {
    pub resource_type: String,
    pub name: String,
}

impl Address {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource_type, self.name)
    }
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::ValidationFailed {
            message: format!("invalid address '{s}': expected <type>.<name>"),
        };
        let (resource_type, name) = s.split_once('.').ok_or_else(invalid)?;
        if resource_type.is_empty() || name.is_empty() || name.contains('.') {
            return Err(invalid());
        }
        if catalog::lookup(resource_type).is_none() {
            return Err(CoreError::UnknownResourceType {
                type_name: resource_type.into(),
            });
        }
        Ok(Self::new(resource_type, name))
    }
}

// ── Resource state ───────────────────────────────────────────────────

/// One managed object as last seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    #[serde(default)]
    pub attributes: Attributes,
}

// ── State file ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFile {
    pub version: u32,
    /// Bumped on every save.
    pub serial: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceState>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            serial: 0,
            updated_at: None,
            resources: BTreeMap::new(),
        }
    }
}

impl StateFile {
    /// Load from disk. A missing file is an empty state.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no state file yet");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(CoreError::State {
                    message: format!("cannot read {}: {e}", path.display()),
                });
            }
        };

        let state: Self = serde_json::from_str(&text).map_err(|e| CoreError::State {
            message: format!("{} is not a valid state file: {e}", path.display()),
        })?;

        if state.version > STATE_VERSION {
            return Err(CoreError::State {
                message: format!(
                    "{} has version {}, this build understands up to {STATE_VERSION}",
                    path.display(),
                    state.version
                ),
            });
        }
        Ok(state)
    }

    /// Write to disk through a sibling temp file and a rename.
    pub fn save(&mut self, path: &Path) -> Result<(), CoreError> {
        self.serial += 1;
        self.updated_at = Some(Utc::now());

        let io_err = |e: std::io::Error| CoreError::State {
            message: format!("cannot write {}: {e}", path.display()),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let body = serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Internal(format!("state serialization: {e}")))?;

        let tmp = temp_path(path);
        std::fs::write(&tmp, body + "\n").map_err(io_err)?;
        std::fs::rename(&tmp, path).map_err(io_err)?;

        debug!(path = %path.display(), serial = self.serial, "state saved");
        Ok(())
    }

    pub fn get(&self, address: &Address) -> Option<&ResourceState> {
        self.resources.get(&address.to_string())
    }

    /// Insert or replace. Returns the previous entry.
    pub fn put(&mut self, address: &Address, state: ResourceState) -> Option<ResourceState> {
        self.resources.insert(address.to_string(), state)
    }

    pub fn remove(&mut self, address: &Address) -> Option<ResourceState> {
        self.resources.remove(&address.to_string())
    }

    /// Entries in address order, optionally limited to one resource type.
    pub fn list<'a>(
        &'a self,
        resource_type: Option<&'a str>,
    ) -> impl Iterator<Item = (&'a str, &'a ResourceState)> + 'a {
        self.resources
            .iter()
            .filter(move |(_, s)| resource_type.is_none_or(|t| s.resource_type == t))
            .map(|(addr, s)| (addr.as_str(), s))
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    fn dns_state() -> ResourceState {
        let mut attributes = Attributes::new();
        attributes.insert("primary".into(), Value::String("8.8.8.8".into()));
        ResourceState {
            resource_type: "fmgdevice_system_dns".into(),
            id: "SystemDns".into(),
            params: [("device_name".to_owned(), "FGT-01".to_owned())].into(),
            attributes,
        }
    }

    #[test]
    fn missing_file_is_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateFile::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(state, StateFile::default());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(DEFAULT_STATE_FILE);
        let addr: Address = "fmgdevice_system_dns.edge".parse().unwrap();

        let mut state = StateFile::default();
        state.put(&addr, dns_state());
        state.save(&path).unwrap();
        state.save(&path).unwrap();

        let loaded = StateFile::load(&path).unwrap();
        assert_eq!(loaded.serial, 2);
        assert_eq!(loaded.get(&addr), Some(&dns_state()));
        assert!(!temp_path(&path).exists());

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            raw["resources"]["fmgdevice_system_dns.edge"]["type"],
            "fmgdevice_system_dns"
        );
    }

    #[test]
    fn list_filters_by_type_and_remove_drops() {
        let mut state = StateFile::default();
        state.put(&Address::new("fmgdevice_system_dns", "a"), dns_state());
        let mut other = dns_state();
        other.resource_type = "fmgdevice_system_dpdk_cpus".into();
        state.put(&Address::new("fmgdevice_system_dpdk_cpus", "b"), other);

        assert_eq!(state.list(None).count(), 2);
        let only: Vec<_> = state.list(Some("fmgdevice_system_dns")).map(|(a, _)| a).collect();
        assert_eq!(only, vec!["fmgdevice_system_dns.a"]);

        assert!(state.remove(&Address::new("fmgdevice_system_dns", "a")).is_some());
        assert!(state.remove(&Address::new("fmgdevice_system_dns", "a")).is_none());
    }

    #[test]
    fn addresses_are_validated() {
        assert!("fmgdevice_system_dns".parse::<Address>().is_err());
        assert!("fmgdevice_system_dns.".parse::<Address>().is_err());
        assert!("fmgdevice_system_dns.a.b".parse::<Address>().is_err());
        assert!(matches!(
            "fmgdevice_bogus.a".parse::<Address>(),
            Err(CoreError::UnknownResourceType { .. })
        ));
    }

    #[test]
    fn newer_versions_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"version":99,"serial":1,"resources":{}}"#).unwrap();
        assert!(matches!(StateFile::load(&path), Err(CoreError::State { .. })));
    }
}
