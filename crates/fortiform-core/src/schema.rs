//! Schema table types.
//!
//! Every managed object is described by one [`ResourceSchema`]: where it
//! lives in FortiManager's object tree, which path parameters address it,
//! and how each attribute maps onto the wire. The engine is generic over
//! these descriptions; adding a resource means adding a table entry.

use std::borrow::Cow;
use std::fmt;

use strum::{Display, EnumIter, EnumString};

// ── Field kinds ──────────────────────────────────────────────────────

/// Attribute type on the resource surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Int,
    /// Unordered, deduplicated strings (FortiManager multi-select options).
    StringSet,
    /// Ordered strings.
    StringList,
    /// Shallow nested sub-table: a list of objects with their own fields.
    Block(&'static [Field]),
}

impl FieldKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::StringSet => "set(string)",
            Self::StringList => "list(string)",
            Self::Block(_) => "list(block)",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

// ── Field ────────────────────────────────────────────────────────────

/// One attribute of a resource.
///
/// The wire name defaults to the attribute name with `_` replaced by `-`
/// (`source_ip` ↔ `source-ip`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    wire: Option<&'static str>,
    pub kind: FieldKind,
    pub required: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub description: &'static str,
}

impl Field {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            wire: None,
            kind,
            required: false,
            computed: false,
            sensitive: false,
            description: "",
        }
    }

    pub const fn string(name: &'static str) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub const fn int(name: &'static str) -> Self {
        Self::new(name, FieldKind::Int)
    }

    pub const fn set(name: &'static str) -> Self {
        Self::new(name, FieldKind::StringSet)
    }

    pub const fn list(name: &'static str) -> Self {
        Self::new(name, FieldKind::StringList)
    }

    pub const fn block(name: &'static str, fields: &'static [Field]) -> Self {
        Self::new(name, FieldKind::Block(fields))
    }

    /// The generic `id` wire field, renamed so it cannot collide with the
    /// resource ID.
    pub const fn fosid() -> Self {
        Self::int("fosid").wire("id")
    }

    pub const fn wire(mut self, wire: &'static str) -> Self {
        self.wire = Some(wire);
        self
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Key used in the FortiManager JSON payload.
    pub fn wire_name(&self) -> Cow<'static, str> {
        match self.wire {
            Some(wire) => Cow::Borrowed(wire),
            None if self.name.contains('_') => Cow::Owned(self.name.replace('_', "-")),
            None => Cow::Borrowed(self.name),
        }
    }

    /// Nested fields for block attributes.
    pub fn sub_fields(&self) -> Option<&'static [Field]> {
        match self.kind {
            FieldKind::Block(fields) => Some(fields),
            _ => None,
        }
    }
}

// ── Path parameters ──────────────────────────────────────────────────

/// A path parameter: the attribute a user supplies and the `{placeholder}`
/// it fills in the schema's path template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub placeholder: &'static str,
    pub description: &'static str,
}

impl Param {
    pub const fn new(name: &'static str, placeholder: &'static str) -> Self {
        Self {
            name,
            placeholder,
            description: "",
        }
    }

    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

/// Managed device name.
pub const DEVICE: Param = Param::new("device_name", "device").describe("Managed device name");

/// VDOM on the managed device.
pub const VDOM: Param = Param::new("device_vdom", "vdom").describe("VDOM on the managed device");

// ── Resource ─────────────────────────────────────────────────────────

/// Feature area a resource belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Area {
    System,
    Router,
    Log,
    SwitchController,
    WirelessController,
}

/// How an object is addressed below its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Exactly one instance per path (e.g. `system dns`).
    Singleton,
    /// A table keyed by the named attribute (e.g. `name`, `fosid`).
    Table { mkey: &'static str },
}

/// Full description of one managed object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSchema {
    /// Resource type name, e.g. `fmgdevice_system_dns`.
    pub type_name: &'static str,
    /// Display name used in messages, e.g. `SystemDns`.
    pub title: &'static str,
    pub area: Area,
    pub description: &'static str,
    /// Path template with `{placeholder}` tokens. For tables this is the
    /// collection path; the object key is appended per object.
    pub path: &'static str,
    pub kind: ResourceKind,
    pub params: &'static [Param],
    pub fields: &'static [Field],
}

impl ResourceSchema {
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn param(&self, name: &str) -> Option<&'static Param> {
        self.params.iter().find(|p| p.name == name)
    }

    /// The key attribute for table resources.
    pub fn mkey_field(&self) -> Option<&'static Field> {
        match self.kind {
            ResourceKind::Table { mkey } => self.field(mkey),
            ResourceKind::Singleton => None,
        }
    }

    pub fn is_singleton(&self) -> bool {
        matches!(self.kind, ResourceKind::Singleton)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn wire_name_defaults_to_hyphenated() {
        assert_eq!(Field::string("source_ip").wire_name(), "source-ip");
        assert_eq!(Field::string("server").wire_name(), "server");
        assert_eq!(Field::fosid().wire_name(), "id");
        assert_eq!(Field::string("seq_num").wire("seq-num").wire_name(), "seq-num");
    }

    #[test]
    fn builders_compose() {
        const F: Field = Field::string("key_string").sensitive().required().describe("key");
        assert!(F.sensitive);
        assert!(F.required);
        assert!(!F.computed);
        assert_eq!(F.description, "key");
    }

    #[test]
    fn area_round_trips_through_strings() {
        assert_eq!(Area::SwitchController.to_string(), "switch_controller");
        assert_eq!("log".parse::<Area>().unwrap(), Area::Log);
    }
}
