use crate::schema::{Area, DEVICE, Field, ResourceKind, ResourceSchema, VDOM};

pub(super) static SCHEMAS: &[ResourceSchema] = &[
    ResourceSchema {
        type_name: "fmgdevice_switchcontroller_stormcontrolpolicy",
        title: "SwitchControllerStormControlPolicy",
        area: Area::SwitchController,
        description: "Configure FortiSwitch storm control policy to be applied on managed-switch ports.",
        path: "/pm/config/device/{device}/global/switch-controller/storm-control-policy",
        kind: ResourceKind::Table { mkey: "name" },
        params: &[DEVICE],
        fields: &[
            Field::string("name").required().describe("Storm control policy name"),
            Field::string("description"),
            Field::string("storm_control_mode"),
            Field::int("rate").describe("Threshold rate in packets per second"),
            Field::string("unknown_unicast"),
            Field::string("unknown_multicast"),
            Field::string("broadcast"),
        ],
    },
    ResourceSchema {
        type_name: "fmgdevice_switchcontroller_vlanpolicy",
        title: "SwitchControllerVlanPolicy",
        area: Area::SwitchController,
        description: "Configure VLAN policy to be applied on the managed FortiSwitch ports through dynamic-port-policy.",
        path: "/pm/config/device/{device}/vdom/{vdom}/switch-controller/vlan-policy",
        kind: ResourceKind::Table { mkey: "name" },
        params: &[DEVICE, VDOM],
        fields: &[
            Field::string("name").required().describe("VLAN policy name"),
            Field::string("description"),
            Field::list("fortilink"),
            Field::list("vlan").describe("Native VLAN to be applied"),
            Field::set("allowed_vlans"),
            Field::set("untagged_vlans"),
            Field::string("allowed_vlans_all"),
            Field::string("discard_mode"),
        ],
    },
];
