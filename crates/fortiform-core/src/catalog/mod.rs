//! Resource catalog.
//!
//! Static schema tables grouped by feature area. Each area module keeps its
//! entries sorted by type name; adding a resource is adding an entry.

mod log;
mod router;
mod switch_controller;
mod system;
mod wireless_controller;

use crate::schema::{Area, ResourceSchema};

static AREAS: &[&[ResourceSchema]] = &[
    system::SCHEMAS,
    router::SCHEMAS,
    log::SCHEMAS,
    switch_controller::SCHEMAS,
    wireless_controller::SCHEMAS,
];

/// Every known resource, grouped by area.
pub fn all() -> impl Iterator<Item = &'static ResourceSchema> {
    AREAS.iter().flat_map(|area| area.iter())
}

/// Find a resource by type name (`fmgdevice_system_dns`).
pub fn lookup(type_name: &str) -> Option<&'static ResourceSchema> {
    all().find(|s| s.type_name == type_name)
}

/// Resources of one feature area.
pub fn by_area(area: Area) -> impl Iterator<Item = &'static ResourceSchema> {
    all().filter(move |s| s.area == area)
}
